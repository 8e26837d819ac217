use actix_web::{
    http::{header, Method, StatusCode},
    test::TestRequest,
    web, App,
};
use gateway_engine::ProfileApi;

use crate::{
    endpoint_tests::{
        helpers::execute,
        mocks::{MockAuthority, MockStore},
    },
    middleware::{AuthMiddlewareFactory, OriginGuardFactory, OriginPolicy},
    routes::{health, ProtectedRoute},
};

const GOOD_ORIGIN: &str = "http://localhost:3000";

async fn call_health(enabled: bool, origin: Option<&str>, method: Method) -> (StatusCode, Vec<(String, String)>) {
    let policy = OriginPolicy::new([GOOD_ORIGIN]);
    let app = App::new().wrap(OriginGuardFactory::new(policy, enabled)).service(health);
    let app = actix_web::test::init_service(app).await;
    let mut req = TestRequest::default().method(method).uri("/api/health");
    if let Some(origin) = origin {
        req = req.insert_header((header::ORIGIN, origin));
    }
    match actix_web::test::try_call_service(&app, req.to_request()).await {
        Ok(res) => {
            let headers = res
                .headers()
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or_default().to_string()))
                .collect();
            (res.status(), headers)
        },
        Err(e) => (e.as_response_error().status_code(), Vec::new()),
    }
}

fn header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
}

#[actix_web::test]
async fn requests_without_an_origin_pass() {
    let (status, headers) = call_health(true, None, Method::GET).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(header(&headers, "access-control-allow-origin"), None);
}

#[actix_web::test]
async fn allowed_origins_are_reflected() {
    let (status, headers) = call_health(true, Some(GOOD_ORIGIN), Method::GET).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(header(&headers, "access-control-allow-origin"), Some(GOOD_ORIGIN));
    assert_eq!(header(&headers, "access-control-allow-credentials"), Some("true"));
    assert_eq!(header(&headers, "vary"), Some("Origin"));
}

#[actix_web::test]
async fn unknown_origins_are_denied() {
    let (status, _) = call_health(true, Some("https://evil.example.com"), Method::GET).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn preflights_are_answered_by_the_guard() {
    let (status, headers) = call_health(true, Some(GOOD_ORIGIN), Method::OPTIONS).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(header(&headers, "access-control-allow-origin"), Some(GOOD_ORIGIN));
    let methods = header(&headers, "access-control-allow-methods").unwrap_or_default();
    assert!(methods.contains("POST") && methods.contains("OPTIONS"));
    let allowed = header(&headers, "access-control-allow-headers").unwrap_or_default();
    assert!(allowed.contains("Authorization"));
}

#[actix_web::test]
async fn disabling_checks_admits_any_origin() {
    let (status, headers) = call_health(false, Some("https://evil.example.com"), Method::GET).await;
    assert_eq!(status, StatusCode::OK);
    // Headers are still reflected so that local tooling keeps working with checks off
    assert_eq!(header(&headers, "access-control-allow-origin"), Some("https://evil.example.com"));
}

#[actix_web::test]
async fn error_responses_keep_the_cors_headers() {
    let mut authority = MockAuthority::new();
    authority.expect_verify_id_token().never();
    let app = App::new()
        .wrap(OriginGuardFactory::new(OriginPolicy::new([GOOD_ORIGIN]), true))
        .app_data(web::Data::new(ProfileApi::new(MockStore::new())))
        .service(
            web::scope("/api")
                .wrap(AuthMiddlewareFactory::new(authority))
                .service(ProtectedRoute::<MockStore>::new()),
        );
    let app = actix_web::test::init_service(app).await;
    // An allowed origin, but no credentials: the 401 must still be CORS-readable
    let req = TestRequest::get().uri("/api/protected").insert_header((header::ORIGIN, GOOD_ORIGIN)).to_request();
    let res = actix_web::test::try_call_service(&app, req)
        .await
        .expect("the guard should render inner errors itself");
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let headers = res.headers();
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).and_then(|v| v.to_str().ok()),
        Some(GOOD_ORIGIN)
    );
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).and_then(|v| v.to_str().ok()),
        Some("true")
    );
    let body: serde_json::Value = actix_web::test::read_body_json(res).await;
    assert_eq!(body["error"], "Unauthorized");
}

#[actix_web::test]
async fn denials_use_the_standard_error_envelope() {
    let policy = OriginPolicy::new([GOOD_ORIGIN]);
    let app = App::new().wrap(OriginGuardFactory::new(policy, true)).service(health);
    let app = actix_web::test::init_service(app).await;
    let req = TestRequest::get().uri("/api/health").insert_header((header::ORIGIN, "https://evil.example.com"));
    let (status, body) = execute(&app, req.to_request()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Forbidden");
    assert_eq!(body["message"], "The origin policy for this server does not allow access from the specified origin");
}
