use actix_web::{App, http::StatusCode, test, web};
use serde_json::{Value, json};
use std::sync::Arc;
use uuid::Uuid;

use crate::modules::friendship::{
    model::FriendshipResponse, repository_memory::FriendshipRepositoryMemory, route,
    schema::FriendshipStatus, service::FriendshipService,
};

macro_rules! init_app {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(FriendshipService::with_dependencies(Arc::new(
                    FriendshipRepositoryMemory::new(),
                ))))
                .service(web::scope("/api").configure(route::configure)),
        )
        .await
    };
}

fn request_body(requester_id: Uuid, receiver_id: Uuid) -> Value {
    json!({ "requesterId": requester_id, "receiverId": receiver_id })
}

#[actix_web::test]
async fn test_send_request_returns_created() {
    let app = init_app!();
    let (a, b) = (Uuid::now_v7(), Uuid::now_v7());

    let req = test::TestRequest::post()
        .uri("/api/friendships/request")
        .set_json(request_body(a, b))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["requesterId"], json!(a));
    assert_eq!(body["receiverId"], json!(b));
    assert_eq!(body["status"], json!("pending"));
    assert!(body["id"].is_string());
    assert!(body["createdAt"].is_string());
}

#[actix_web::test]
async fn test_duplicate_and_self_requests_are_bad_requests() {
    let app = init_app!();
    let (a, b) = (Uuid::now_v7(), Uuid::now_v7());

    let req = test::TestRequest::post()
        .uri("/api/friendships/request")
        .set_json(request_body(a, b))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/api/friendships/request")
        .set_json(request_body(b, a))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["message"].as_str().unwrap().contains("already exists"));

    let req = test::TestRequest::post()
        .uri("/api/friendships/request")
        .set_json(request_body(a, a))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_missing_fields_are_bad_requests() {
    let app = init_app!();

    let req = test::TestRequest::post()
        .uri("/api/friendships/request")
        .set_json(json!({ "requesterId": Uuid::now_v7() }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get().uri("/api/friendships/pending").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_accept_flow() {
    let app = init_app!();
    let (a, b) = (Uuid::now_v7(), Uuid::now_v7());

    let req = test::TestRequest::post()
        .uri("/api/friendships/request")
        .set_json(request_body(a, b))
        .to_request();
    let created: FriendshipResponse = test::call_and_read_body_json(&app, req).await;

    // the requester cannot accept their own request
    let req = test::TestRequest::put()
        .uri(&format!("/api/friendships/{}/accept?userId={a}", created.id))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::put()
        .uri(&format!("/api/friendships/{}/accept?userId={b}", created.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let accepted: FriendshipResponse = test::read_body_json(resp).await;
    assert_eq!(accepted.status, FriendshipStatus::Accepted);

    let req = test::TestRequest::get()
        .uri(&format!("/api/friendships/check?userId1={b}&userId2={a}"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "areFriends": true }));

    let req = test::TestRequest::get()
        .uri(&format!("/api/friendships/friend-ids?userId={a}"))
        .to_request();
    let ids: Vec<Uuid> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(ids, vec![b]);

    let req = test::TestRequest::get()
        .uri(&format!("/api/friendships/friends?userId={b}"))
        .to_request();
    let friends: Vec<FriendshipResponse> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(friends.len(), 1);
    assert_eq!(friends[0].id, created.id);

    // terminal state
    let req = test::TestRequest::put()
        .uri(&format!("/api/friendships/{}/decline?userId={b}", created.id))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_decline_flow() {
    let app = init_app!();
    let (a, b) = (Uuid::now_v7(), Uuid::now_v7());

    let req = test::TestRequest::post()
        .uri("/api/friendships/request")
        .set_json(request_body(a, b))
        .to_request();
    let created: FriendshipResponse = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/friendships/check-pending?requesterId={a}&receiverId={b}"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "hasPendingRequest": true }));

    let req = test::TestRequest::get()
        .uri(&format!("/api/friendships/check-pending?requesterId={b}&receiverId={a}"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "hasPendingRequest": false }));

    let req = test::TestRequest::put()
        .uri(&format!("/api/friendships/{}/decline?userId={b}", created.id))
        .to_request();
    let declined: FriendshipResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(declined.status, FriendshipStatus::Declined);

    let req = test::TestRequest::get()
        .uri(&format!("/api/friendships/pending?userId={b}"))
        .to_request();
    let pending: Vec<FriendshipResponse> = test::call_and_read_body_json(&app, req).await;
    assert!(pending.is_empty());

    let req = test::TestRequest::get()
        .uri(&format!("/api/friendships/all?userId={a}"))
        .to_request();
    let all: Vec<FriendshipResponse> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].status, FriendshipStatus::Declined);

    let req = test::TestRequest::get()
        .uri(&format!("/api/friendships/check?userId1={a}&userId2={b}"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "areFriends": false }));
}

#[actix_web::test]
async fn test_remove_and_lookup() {
    let app = init_app!();
    let (a, b) = (Uuid::now_v7(), Uuid::now_v7());

    let req = test::TestRequest::post()
        .uri("/api/friendships/request")
        .set_json(request_body(a, b))
        .to_request();
    let created: FriendshipResponse = test::call_and_read_body_json(&app, req).await;

    let req =
        test::TestRequest::get().uri(&format!("/api/friendships/{}", created.id)).to_request();
    let found: FriendshipResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(found.id, created.id);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/friendships/{}?userId={}", created.id, Uuid::now_v7()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/friendships/{}?userId={b}", created.id))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    let req =
        test::TestRequest::get().uri(&format!("/api/friendships/{}", created.id)).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/friendships/{}?userId={b}", created.id))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_malformed_friendship_id_is_bad_request() {
    let app = init_app!();
    let malformed = "-".repeat(36);

    let req = test::TestRequest::put()
        .uri(&format!("/api/friendships/{malformed}/accept?userId={}", Uuid::now_v7()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["message"].as_str().unwrap().contains("Invalid friendship id"));

    let req = test::TestRequest::delete()
        .uri(&format!("/api/friendships/{malformed}?userId={}", Uuid::now_v7()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

mod pg {
    use sqlx::PgPool;
    use uuid::Uuid;

    use crate::{
        api::error::SystemError,
        modules::friendship::{
            repository::FriendshipRepository, repository_pg::FriendshipRepositoryPg,
            schema::FriendshipStatus,
        },
    };

    #[sqlx::test(migrations = "./migrations")]
    async fn test_reversed_pair_insert_conflicts(pool: PgPool) {
        let repo = FriendshipRepositoryPg::new(pool);
        let (a, b) = (Uuid::now_v7(), Uuid::now_v7());

        let created = repo.insert(&a, &b).await.unwrap();
        assert_eq!(created.status, FriendshipStatus::Pending);

        let err = repo.insert(&b, &a).await.unwrap_err();
        assert!(matches!(err, SystemError::Conflict(_)));
        assert_eq!(repo.find_by_either_participant(&a).await.unwrap().len(), 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_self_insert_violates_check(pool: PgPool) {
        let repo = FriendshipRepositoryPg::new(pool);
        let a = Uuid::now_v7();

        let err = repo.insert(&a, &a).await.unwrap_err();
        assert!(matches!(err, SystemError::BadRequest(_)));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_update_status_on_terminal_row_returns_none(pool: PgPool) {
        let repo = FriendshipRepositoryPg::new(pool);
        let (a, b) = (Uuid::now_v7(), Uuid::now_v7());
        let f = repo.insert(&a, &b).await.unwrap();

        let declined = repo
            .update_status(&f.id, FriendshipStatus::Pending, FriendshipStatus::Declined)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(declined.status, FriendshipStatus::Declined);
        assert_eq!(declined.created_at, f.created_at);

        let again = repo
            .update_status(&f.id, FriendshipStatus::Pending, FriendshipStatus::Accepted)
            .await
            .unwrap();
        assert!(again.is_none());
        assert_eq!(
            repo.find_by_id(&f.id).await.unwrap().map(|f| f.status),
            Some(FriendshipStatus::Declined)
        );
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_friend_ids_exclude_the_caller(pool: PgPool) {
        let repo = FriendshipRepositoryPg::new(pool);
        let me = Uuid::now_v7();
        let (sent_to, received_from, pending) = (Uuid::now_v7(), Uuid::now_v7(), Uuid::now_v7());

        let outgoing = repo.insert(&me, &sent_to).await.unwrap();
        let incoming = repo.insert(&received_from, &me).await.unwrap();
        repo.insert(&me, &pending).await.unwrap();
        for id in [outgoing.id, incoming.id] {
            repo.update_status(&id, FriendshipStatus::Pending, FriendshipStatus::Accepted)
                .await
                .unwrap();
        }

        let ids = repo.find_friend_ids(&me).await.unwrap();
        assert_eq!(ids, vec![sent_to, received_from]);
        assert!(!ids.contains(&me));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_delete_frees_the_pair(pool: PgPool) {
        let repo = FriendshipRepositoryPg::new(pool);
        let (a, b) = (Uuid::now_v7(), Uuid::now_v7());
        let f = repo.insert(&a, &b).await.unwrap();

        assert!(repo.delete(&f.id).await.unwrap());
        assert!(!repo.delete(&f.id).await.unwrap());
        assert!(repo.insert(&b, &a).await.is_ok());
    }
}
