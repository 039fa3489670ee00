use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::Logger, web};
use std::sync::LazyLock;

use crate::modules::friendship::service::FriendshipService;

mod api;
mod configs;
mod constants;
mod modules;
#[cfg(test)]
mod test;
mod utils;

pub static ENV: LazyLock<constants::Env> = LazyLock::new(|| {
    dotenvy::dotenv().ok();
    env_logger::init();
    log::info!("Environment variables loaded from .env file");
    constants::Env::default()
});

#[actix_web::get("/")]
async fn health_check() -> &'static str {
    "Server is running"
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    LazyLock::force(&ENV);

    let friendship_repo = configs::build_friendship_repository()
        .await
        .map_err(|e| std::io::Error::other(format!("Storage initialization error: {e}")))?;

    let friendship_service = FriendshipService::with_dependencies(friendship_repo);

    log::info!("Starting server at http://{}:{}", ENV.ip.as_str(), ENV.port);
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&ENV.frontend_url)
            .allow_any_method()
            .allow_any_header()
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(web::Data::new(friendship_service.clone()))
            .service(health_check)
            .service(web::scope("/api").configure(modules::friendship::route::configure))
    })
    .bind((ENV.ip.as_str(), ENV.port))?
    .workers(ENV.workers)
    .run()
    .await
}
