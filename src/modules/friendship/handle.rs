use actix_web::{delete, get, post, put, web};
use uuid::Uuid;

use crate::{
    api::{error, success},
    modules::friendship::{
        model::{
            ActingUserQuery, AreFriendsResponse, CheckFriendshipQuery, CheckPendingQuery,
            FriendRequestBody, FriendshipResponse, HasPendingRequestResponse,
        },
        schema::FriendshipEntity,
        service::FriendshipService,
    },
    utils::{ValidatedJson, ValidatedQuery},
};

fn to_responses(friendships: Vec<FriendshipEntity>) -> Vec<FriendshipResponse> {
    friendships.into_iter().map(FriendshipResponse::from).collect()
}

#[post("/request")]
pub async fn send_friend_request(
    friendship_service: web::Data<FriendshipService>,
    body: ValidatedJson<FriendRequestBody>,
) -> Result<success::Success<FriendshipResponse>, error::Error> {
    let FriendRequestBody { requester_id, receiver_id } = body.0;
    log::info!("Received friend request from user {requester_id} to user {receiver_id}");

    let friendship = friendship_service.send_friend_request(requester_id, receiver_id).await?;
    Ok(success::Success::created(FriendshipResponse::from(friendship)))
}

#[put("/{id:[0-9a-fA-F-]{36}}/accept")]
pub async fn accept_friend_request(
    friendship_service: web::Data<FriendshipService>,
    friendship_id: web::Path<Uuid>,
    query: ValidatedQuery<ActingUserQuery>,
) -> Result<success::Success<FriendshipResponse>, error::Error> {
    let friendship =
        friendship_service.accept_friend_request(friendship_id.into_inner(), query.0.user_id).await?;
    Ok(success::Success::ok(FriendshipResponse::from(friendship)))
}

#[put("/{id:[0-9a-fA-F-]{36}}/decline")]
pub async fn decline_friend_request(
    friendship_service: web::Data<FriendshipService>,
    friendship_id: web::Path<Uuid>,
    query: ValidatedQuery<ActingUserQuery>,
) -> Result<success::Success<FriendshipResponse>, error::Error> {
    let friendship = friendship_service
        .decline_friend_request(friendship_id.into_inner(), query.0.user_id)
        .await?;
    Ok(success::Success::ok(FriendshipResponse::from(friendship)))
}

#[delete("/{id:[0-9a-fA-F-]{36}}")]
pub async fn remove_friendship(
    friendship_service: web::Data<FriendshipService>,
    friendship_id: web::Path<Uuid>,
    query: ValidatedQuery<ActingUserQuery>,
) -> Result<success::Success<()>, error::Error> {
    friendship_service.remove_friendship(friendship_id.into_inner(), query.0.user_id).await?;
    Ok(success::Success::no_content())
}

#[get("/pending")]
pub async fn get_pending_requests(
    friendship_service: web::Data<FriendshipService>,
    query: ValidatedQuery<ActingUserQuery>,
) -> Result<success::Success<Vec<FriendshipResponse>>, error::Error> {
    let pending = friendship_service.get_pending_requests(query.0.user_id).await?;
    Ok(success::Success::ok(to_responses(pending)))
}

#[get("/all")]
pub async fn get_all_friendships(
    friendship_service: web::Data<FriendshipService>,
    query: ValidatedQuery<ActingUserQuery>,
) -> Result<success::Success<Vec<FriendshipResponse>>, error::Error> {
    let friendships = friendship_service.get_all_friendships(query.0.user_id).await?;
    Ok(success::Success::ok(to_responses(friendships)))
}

#[get("/friends")]
pub async fn get_accepted_friends(
    friendship_service: web::Data<FriendshipService>,
    query: ValidatedQuery<ActingUserQuery>,
) -> Result<success::Success<Vec<FriendshipResponse>>, error::Error> {
    let friends = friendship_service.get_accepted_friends(query.0.user_id).await?;
    Ok(success::Success::ok(to_responses(friends)))
}

#[get("/friend-ids")]
pub async fn get_friend_ids(
    friendship_service: web::Data<FriendshipService>,
    query: ValidatedQuery<ActingUserQuery>,
) -> Result<success::Success<Vec<Uuid>>, error::Error> {
    let ids = friendship_service.get_friend_ids(query.0.user_id).await?;
    Ok(success::Success::ok(ids))
}

#[get("/check")]
pub async fn check_friendship(
    friendship_service: web::Data<FriendshipService>,
    query: ValidatedQuery<CheckFriendshipQuery>,
) -> Result<success::Success<AreFriendsResponse>, error::Error> {
    let are_friends = friendship_service.are_friends(query.0.user_id1, query.0.user_id2).await?;
    Ok(success::Success::ok(AreFriendsResponse { are_friends }))
}

#[get("/check-pending")]
pub async fn check_pending_request(
    friendship_service: web::Data<FriendshipService>,
    query: ValidatedQuery<CheckPendingQuery>,
) -> Result<success::Success<HasPendingRequestResponse>, error::Error> {
    let has_pending_request =
        friendship_service.has_pending_request(query.0.requester_id, query.0.receiver_id).await?;
    Ok(success::Success::ok(HasPendingRequestResponse { has_pending_request }))
}

#[get("/{id:[0-9a-fA-F-]{36}}")]
pub async fn get_friendship_by_id(
    friendship_service: web::Data<FriendshipService>,
    friendship_id: web::Path<Uuid>,
) -> Result<success::Success<FriendshipResponse>, error::Error> {
    let friendship_id = friendship_id.into_inner();
    let friendship = friendship_service
        .get_friendship_by_id(friendship_id)
        .await?
        .ok_or_else(|| error::Error::not_found(format!("Friendship {friendship_id} not found")))?;

    Ok(success::Success::ok(FriendshipResponse::from(friendship)))
}
