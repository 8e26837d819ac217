use actix_web::{http::StatusCode, test::TestRequest, web, App};
use gateway_engine::{
    db_types::{DataRecord, UserRecord},
    DataApi, ProfileApi, MAX_PAGE_SIZE,
};
use serde_json::{json, Value};

use crate::{
    endpoint_tests::{
        helpers::execute,
        mocks::{test_principal, test_user, MockAuthority, MockStore},
    },
    middleware::AuthMiddlewareFactory,
    routes::{ListDataRoute, ProtectedRoute, SubmitDataRoute},
    server::json_payload_config,
};

fn authority_for(uid: &'static str) -> MockAuthority {
    let mut authority = MockAuthority::new();
    authority.expect_verify_id_token().returning(move |_| Ok(test_principal(uid)));
    authority
}

async fn get_protected(store: MockStore, uid: &'static str) -> (StatusCode, Value) {
    let app = App::new().app_data(web::Data::new(ProfileApi::new(store))).service(
        web::scope("/api")
            .wrap(AuthMiddlewareFactory::new(authority_for(uid)))
            .service(ProtectedRoute::<MockStore>::new()),
    );
    let app = actix_web::test::init_service(app).await;
    let req = TestRequest::get().uri("/api/protected").insert_header(("Authorization", "Bearer token"));
    execute(&app, req.to_request()).await
}

async fn post_data(store: MockStore, uid: &'static str, body: Value) -> (StatusCode, Value) {
    let app = App::new().app_data(json_payload_config()).app_data(web::Data::new(DataApi::new(store))).service(
        web::scope("/api")
            .wrap(AuthMiddlewareFactory::new(authority_for(uid)))
            .service(SubmitDataRoute::<MockStore>::new()),
    );
    let app = actix_web::test::init_service(app).await;
    let req =
        TestRequest::post().uri("/api/data").insert_header(("Authorization", "Bearer token")).set_json(body);
    execute(&app, req.to_request()).await
}

async fn list_data(store: MockStore, uid: &'static str) -> (StatusCode, Value) {
    let app = App::new().app_data(web::Data::new(DataApi::new(store))).service(
        web::scope("/api")
            .wrap(AuthMiddlewareFactory::new(authority_for(uid)))
            .service(ListDataRoute::<MockStore>::new()),
    );
    let app = actix_web::test::init_service(app).await;
    let req = TestRequest::get().uri("/api/data").insert_header(("Authorization", "Bearer token"));
    execute(&app, req.to_request()).await
}

#[actix_web::test]
async fn first_access_creates_the_profile() {
    let mut store = MockStore::new();
    store.expect_fetch_user().withf(|uid| uid == "alice").times(1).returning(|_| Ok(None));
    store
        .expect_create_user_if_absent()
        .withf(|user: &UserRecord| user.uid == "alice" && user.email.as_deref() == Some("alice@example.com"))
        .times(1)
        .returning(|user| Ok(user.clone()));
    let (status, body) = get_protected(store, "alice").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["uid"], "alice");
    assert_eq!(body["data"]["email"], "alice@example.com");
}

#[actix_web::test]
async fn repeat_access_reads_the_stored_profile() {
    let existing = test_user("alice");
    let created_at = existing.created_at;
    let mut store = MockStore::new();
    store.expect_fetch_user().withf(|uid| uid == "alice").times(1).returning(move |_| Ok(Some(existing.clone())));
    store.expect_create_user_if_absent().never();
    let (status, body) = get_protected(store, "alice").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["createdAt"], json!(created_at));
}

#[actix_web::test]
async fn empty_payloads_are_rejected_without_persisting() {
    let cases = [json!({}), json!({ "data": null }), json!({ "data": "" }), json!({ "data": {} }), json!({ "data": [] })];
    for payload in cases {
        let mut store = MockStore::new();
        store.expect_insert_record().never();
        let (status, body) = post_data(store, "alice", payload.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload {payload} should be rejected");
        assert_eq!(body["error"], "Bad request");
        assert_eq!(body["message"], "Data field is required");
    }
}

#[actix_web::test]
async fn unparseable_bodies_get_the_error_envelope() {
    let mut store = MockStore::new();
    store.expect_insert_record().never();
    let app = App::new().app_data(json_payload_config()).app_data(web::Data::new(DataApi::new(store))).service(
        web::scope("/api")
            .wrap(AuthMiddlewareFactory::new(authority_for("alice")))
            .service(SubmitDataRoute::<MockStore>::new()),
    );
    let app = actix_web::test::init_service(app).await;
    let req = TestRequest::post()
        .uri("/api/data")
        .insert_header(("Authorization", "Bearer token"))
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json");
    let (status, body) = execute(&app, req.to_request()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad request");
    assert!(body["message"].as_str().is_some_and(|m| m.starts_with("Invalid JSON body.")));
}

#[actix_web::test]
async fn submissions_are_stamped_with_the_caller() {
    let mut store = MockStore::new();
    store
        .expect_insert_record()
        .withf(|record: &DataRecord| record.user_id == "alice" && record.data == json!({"note": "hello"}))
        .times(1)
        .returning(|_| Ok(()));
    let (status, body) = post_data(store, "alice", json!({ "data": {"note": "hello"} })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Data saved successfully");
    assert!(body["id"].as_str().is_some_and(|id| !id.is_empty()));
}

#[actix_web::test]
async fn falsy_scalars_are_real_payloads() {
    let mut store = MockStore::new();
    store.expect_insert_record().withf(|record: &DataRecord| record.data == json!(0)).times(1).returning(|_| Ok(()));
    let (status, _) = post_data(store, "alice", json!({ "data": 0 })).await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn listings_ask_only_for_the_callers_page() {
    let records = vec![DataRecord::new("alice", json!("newest")), DataRecord::new("alice", json!("older"))];
    let expected = records.clone();
    let mut store = MockStore::new();
    store
        .expect_fetch_records_for_user()
        .withf(|uid, limit| uid == "alice" && *limit == MAX_PAGE_SIZE)
        .times(1)
        .returning(move |_, _| Ok(records.clone()));
    let (status, body) = list_data(store, "alice").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Data retrieved successfully");
    assert_eq!(body["count"], 2);
    assert_eq!(body["data"][0]["data"], "newest");
    assert_eq!(body["data"][0]["userId"], "alice");
    assert_eq!(body["data"][1]["id"], json!(expected[1].id));
}
