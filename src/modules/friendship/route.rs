use crate::{api::error, modules::friendship::handle::*};
use actix_web::web::{PathConfig, ServiceConfig, scope};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/friendships")
            // a malformed relationship id is a bad request, not an unknown route
            .app_data(PathConfig::default().error_handler(|err, _req| {
                error::Error::bad_request(format!("Invalid friendship id: {err}")).into()
            }))
            .service(send_friend_request)
            .service(accept_friend_request)
            .service(decline_friend_request)
            .service(remove_friendship)
            .service(get_pending_requests)
            .service(get_all_friendships)
            .service(get_accepted_friends)
            .service(get_friend_ids)
            .service(check_friendship)
            .service(check_pending_request)
            .service(get_friendship_by_id),
    );
}
