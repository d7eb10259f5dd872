use actix_web::cookie::Cookie;
use actix_web::http::header::{HeaderValue, COOKIE, SET_COOKIE};
use actix_web::http::StatusCode;
use actix_web::{test, web, App, HttpResponse};
use backend_test_support::problem_details::assert_problem_details;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use blog_backend::auth::claims::Role;
use blog_backend::auth::identity::Identity;
use blog_backend::auth::token::TokenService;
use blog_backend::config::session::SessionConfig;
use blog_backend::middleware::cookie_auth::CookieAuth;
use blog_backend::routes;
use blog_backend::state::app_state::AppState;
use serde_json::Value;

use crate::support::auth::{expired_session_cookie, principal, session_cookie, test_session_config};
use crate::support::create_test_app;

async fn home_body<S>(app: &S, req: actix_http::Request) -> String
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
{
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
        resp.headers().get(SET_COOKIE).is_none(),
        "interceptor must never write cookies"
    );
    let body = test::read_body(resp).await;
    String::from_utf8(body.to_vec()).expect("html body")
}

#[actix_web::test]
async fn no_cookie_header_renders_login() {
    let state = AppState::in_memory(&test_session_config());
    let app = create_test_app(state).with_prod_routes().build().await;

    let req = test::TestRequest::get().uri("/").to_request();
    let body = home_body(&app, req).await;

    assert!(body.contains("Login"));
    assert!(!body.contains("Welcome"));
}

#[actix_web::test]
async fn valid_cookie_renders_welcome() {
    let state = AppState::in_memory(&test_session_config());
    let cookie = session_cookie(&state, &principal("a@x.com", Role::User));
    let app = create_test_app(state).with_prod_routes().build().await;

    let req = test::TestRequest::get().uri("/").cookie(cookie).to_request();
    let body = home_body(&app, req).await;

    assert!(body.contains("Welcome, a@x.com"));
    assert!(!body.contains("Login"));
}

#[actix_web::test]
async fn email_is_escaped_in_page() {
    let state = AppState::in_memory(&test_session_config());
    let cookie = session_cookie(&state, &principal("<b>@x.com", Role::User));
    let app = create_test_app(state).with_prod_routes().build().await;

    let req = test::TestRequest::get().uri("/").cookie(cookie).to_request();
    let body = home_body(&app, req).await;

    assert!(body.contains("Welcome, &lt;b&gt;@x.com"));
}

#[actix_web::test]
async fn expired_cookie_is_anonymous() {
    let state = AppState::in_memory(&test_session_config());
    let cookie = expired_session_cookie(&state, &principal("a@x.com", Role::User));
    let app = create_test_app(state).with_prod_routes().build().await;

    let req = test::TestRequest::get().uri("/").cookie(cookie).to_request();
    let body = home_body(&app, req).await;

    assert!(body.contains("Login"));
}

#[actix_web::test]
async fn empty_and_malformed_cookie_values_are_anonymous() {
    let state = AppState::in_memory(&test_session_config());
    let app = create_test_app(state).with_prod_routes().build().await;

    for value in ["", "not-a-real-token", "a.b.c", "...."] {
        let req = test::TestRequest::get()
            .uri("/")
            .cookie(Cookie::new("token", value))
            .to_request();
        let body = home_body(&app, req).await;
        assert!(body.contains("Login"), "value {value:?} should be anonymous");
    }
}

#[actix_web::test]
async fn unparseable_cookie_header_is_anonymous() {
    let state = AppState::in_memory(&test_session_config());
    let valid = session_cookie(&state, &principal("a@x.com", Role::User));
    let app = create_test_app(state).with_prod_routes().build().await;

    // Non-UTF-8 bytes make the whole header unreadable, valid cookie included.
    let mut raw = format!("token={}; theme=", valid.value()).into_bytes();
    raw.extend_from_slice(b"\xff\xfe");
    let req = test::TestRequest::get()
        .uri("/")
        .insert_header((
            COOKIE,
            HeaderValue::from_bytes(&raw).expect("opaque header bytes"),
        ))
        .to_request();
    let body = home_body(&app, req).await;
    assert!(body.contains("Login"));
}

#[actix_web::test]
async fn nameless_cookie_pair_does_not_hide_session() {
    let state = AppState::in_memory(&test_session_config());
    let valid = session_cookie(&state, &principal("a@x.com", Role::User));
    let app = create_test_app(state).with_prod_routes().build().await;

    let req = test::TestRequest::get()
        .uri("/")
        .insert_header((COOKIE, format!("token={}; consent", valid.value())))
        .to_request();
    let body = home_body(&app, req).await;
    assert!(body.contains("Welcome, a@x.com"));
}

#[actix_web::test]
async fn escalated_role_payload_is_rejected() {
    let state = AppState::in_memory(&test_session_config());
    let cookie = session_cookie(&state, &principal("a@x.com", Role::User));
    let app = create_test_app(state).with_prod_routes().build().await;

    let segments: Vec<&str> = cookie.value().split('.').collect();
    let mut payload: Value =
        serde_json::from_slice(&URL_SAFE_NO_PAD.decode(segments[1]).unwrap()).unwrap();
    payload["role"] = Value::String("ADMIN".to_string());
    let forged = format!(
        "{}.{}.{}",
        segments[0],
        URL_SAFE_NO_PAD.encode(serde_json::to_vec(&payload).unwrap()),
        segments[2]
    );

    let req = test::TestRequest::get()
        .uri("/user/me")
        .cookie(Cookie::new("token", forged))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details(resp, StatusCode::UNAUTHORIZED, "UNAUTHORIZED").await;
}

#[actix_web::test]
async fn me_returns_verified_claims() {
    let state = AppState::in_memory(&test_session_config());
    let cookie = session_cookie(&state, &principal("root@x.com", Role::Admin));
    let app = create_test_app(state).with_prod_routes().build().await;

    let req = test::TestRequest::get()
        .uri("/user/me")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get("x-request-id").is_some());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["subject_id"], "sub-root@x.com");
    assert_eq!(body["email"], "root@x.com");
    assert_eq!(body["profile_image_ref"], "/images/default.png");
    assert_eq!(body["role"], "ADMIN");
    // Not registered in this store, only holding a signed credential.
    assert_eq!(body["full_name"], Value::Null);
}

#[actix_web::test]
async fn me_without_cookie_is_unauthorized() {
    let state = AppState::in_memory(&test_session_config());
    let app = create_test_app(state).with_prod_routes().build().await;

    let req = test::TestRequest::get().uri("/user/me").to_request();
    let resp = test::call_service(&app, req).await;
    let problem = assert_problem_details(resp, StatusCode::UNAUTHORIZED, "UNAUTHORIZED").await;
    assert_eq!(problem.detail, "Authentication required");
}

#[actix_web::test]
async fn configured_cookie_name_is_the_only_one_read() {
    let config = SessionConfig::new("custom-name-secret").with_cookie_name("blog_session");
    let state = AppState::in_memory(&config);
    let credential = state
        .tokens
        .issue(&principal("a@x.com", Role::User))
        .unwrap();
    let app = create_test_app(state).with_prod_routes().build().await;

    let req = test::TestRequest::get()
        .uri("/")
        .cookie(Cookie::new("token", credential.clone()))
        .to_request();
    assert!(home_body(&app, req).await.contains("Login"));

    let req = test::TestRequest::get()
        .uri("/")
        .cookie(Cookie::new("blog_session", credential))
        .to_request();
    assert!(home_body(&app, req).await.contains("Welcome, a@x.com"));
}

#[actix_web::test]
async fn credential_from_another_secret_is_anonymous() {
    let other = AppState::in_memory(&SessionConfig::new("some-other-deployment"));
    let foreign = session_cookie(&other, &principal("a@x.com", Role::Admin));

    let state = AppState::in_memory(&test_session_config());
    let app = create_test_app(state).with_prod_routes().build().await;

    let req = test::TestRequest::get().uri("/").cookie(foreign).to_request();
    assert!(home_body(&app, req).await.contains("Login"));
}

#[actix_web::test]
async fn identity_is_resolved_once_per_request() {
    let state = AppState::in_memory(&test_session_config());
    let cookie = session_cookie(&state, &principal("a@x.com", Role::User));
    let app = create_test_app(state)
        .with_routes(|cfg| {
            cfg.route("/whoami", web::get().to(whoami));
        })
        .build()
        .await;

    let req = test::TestRequest::get()
        .uri("/whoami")
        .cookie(cookie)
        .to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert_eq!(body, "sub-a@x.com");

    let req = test::TestRequest::get().uri("/whoami").to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert_eq!(body, "anonymous");
}

async fn whoami(identity: Identity) -> HttpResponse {
    HttpResponse::Ok().body(match identity {
        Identity::Anonymous => "anonymous".to_string(),
        Identity::Authenticated(claims) => claims.subject_id,
    })
}

#[actix_web::test]
async fn outer_interceptor_decision_stands() {
    let outer = TokenService::new(&SessionConfig::new("outer-secret"));
    let inner = TokenService::new(&SessionConfig::new("inner-secret"));
    let user = principal("a@x.com", Role::User);
    let outer_credential = outer.issue(&user).unwrap();
    let inner_credential = inner.issue(&user).unwrap();

    // The last `wrap` runs first.
    let app = test::init_service(
        App::new()
            .wrap(CookieAuth::new(inner, "token"))
            .wrap(CookieAuth::new(outer, "token"))
            .route("/whoami", web::get().to(whoami)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/whoami")
        .cookie(Cookie::new("token", outer_credential))
        .to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert_eq!(body, "sub-a@x.com");

    let req = test::TestRequest::get()
        .uri("/whoami")
        .cookie(Cookie::new("token", inner_credential))
        .to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert_eq!(body, "anonymous");
}

#[actix_web::test]
async fn identity_without_interceptor_is_internal_error() {
    let state = AppState::in_memory(&test_session_config());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details(resp, StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL").await;
}
