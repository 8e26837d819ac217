use actix_web::{http::StatusCode, test::TestRequest, web, App};
use gateway_engine::ProfileApi;
use serde_json::Value;

use crate::{
    endpoint_tests::{
        helpers::execute,
        mocks::{test_principal, test_user, MockAuthority, MockStore},
    },
    errors::AuthError,
    middleware::AuthMiddlewareFactory,
    routes::ProtectedRoute,
};

async fn get_protected(authority: MockAuthority, store: MockStore, auth_header: Option<&str>) -> (StatusCode, Value) {
    let app = App::new().app_data(web::Data::new(ProfileApi::new(store))).service(
        web::scope("/api").wrap(AuthMiddlewareFactory::new(authority)).service(ProtectedRoute::<MockStore>::new()),
    );
    let app = actix_web::test::init_service(app).await;
    let mut req = TestRequest::get().uri("/api/protected");
    if let Some(header) = auth_header {
        req = req.insert_header(("Authorization", header));
    }
    execute(&app, req.to_request()).await
}

#[actix_web::test]
async fn missing_credentials_never_reach_the_authority() {
    let mut authority = MockAuthority::new();
    authority.expect_verify_id_token().never();
    let (status, body) = get_protected(authority, MockStore::new(), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");
    assert_eq!(body["message"], "No token provided or invalid format. Expected: Bearer <token>");
}

#[actix_web::test]
async fn malformed_schemes_never_reach_the_authority() {
    for header in ["Basic abc123", "bearer abc123", "Bearer", "Bearer ", "abc123"] {
        let mut authority = MockAuthority::new();
        authority.expect_verify_id_token().never();
        let (status, body) = get_protected(authority, MockStore::new(), Some(header)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "header {header:?} should be rejected before verification");
        assert_eq!(body["error"], "Unauthorized");
    }
}

#[actix_web::test]
async fn expired_credentials_prompt_re_authentication() {
    let mut authority = MockAuthority::new();
    authority.expect_verify_id_token().times(1).returning(|_| Err(AuthError::CredentialExpired));
    let (status, body) = get_protected(authority, MockStore::new(), Some("Bearer stale-token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Token expired");
    assert_eq!(body["message"], "Your session has expired. Please sign in again.");
}

#[actix_web::test]
async fn garbage_tokens_get_a_generic_401() {
    let mut authority = MockAuthority::new();
    authority.expect_verify_id_token().times(1).returning(|_| Err(AuthError::CredentialInvalid));
    let (status, body) = get_protected(authority, MockStore::new(), Some("Bearer not.a.jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");
    assert_eq!(body["message"], "Invalid token");
}

#[actix_web::test]
async fn valid_credentials_attach_the_principal() {
    let mut authority = MockAuthority::new();
    authority
        .expect_verify_id_token()
        .withf(|token| token == "good-token")
        .times(1)
        .returning(|_| Ok(test_principal("alice")));
    let mut store = MockStore::new();
    store.expect_fetch_user().returning(|uid| Ok(Some(test_user(uid))));
    store.expect_create_user_if_absent().never();
    let (status, body) = get_protected(authority, store, Some("Bearer good-token")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "This is a protected endpoint");
    assert_eq!(body["user"]["uid"], "alice");
    assert_eq!(body["user"]["email"], "alice@example.com");
    assert_eq!(body["user"]["emailVerified"], true);
    assert_eq!(body["data"]["uid"], "alice");
}
