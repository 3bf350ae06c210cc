//! Login, registration, logout and route protection.

use reqwest::StatusCode;

use bizdesk_core::Username;

use bizdesk_integration_tests::{ADMIN_PASSWORD, ADMIN_USERNAME, TestApp, location};

#[tokio::test]
async fn test_protected_pages_redirect_to_login() {
    let app = TestApp::spawn().await;

    for path in [
        "/",
        "/products",
        "/add_product",
        "/sales_performance",
        "/add_sales",
        "/improve_sales",
        "/lowstocks",
        "/profit_and_loss",
        "/view_employees",
        "/add_employee",
    ] {
        let resp = app.get(path).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "{path} was not protected");
        assert_eq!(location(&resp), "/login", "{path} redirected elsewhere");
    }
}

#[tokio::test]
async fn test_protected_write_is_not_applied() {
    let app = TestApp::spawn().await;

    let resp = app
        .post_form(
            "/add_product",
            &[("name", "Widget"), ("category", "Tools"), ("price", "9.99"), ("stock", "3")],
        )
        .await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");
    assert_eq!(app.state.store().products().count().await, 0);
}

#[tokio::test]
async fn test_login_success_opens_dashboard() {
    let app = TestApp::spawn().await;
    app.login_as_admin().await;

    let resp = app.get("/").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("body");
    assert!(body.contains("Login successful!"));
    assert!(body.contains(&format!("Signed in as <strong>{ADMIN_USERNAME}</strong>")));
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = TestApp::spawn().await;

    let resp = app
        .post_form("/login", &[("username", ADMIN_USERNAME), ("password", "not-the-password")])
        .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.text().await.expect("body").contains("Invalid credentials"));

    let resp = app.get("/").await;
    assert_eq!(location(&resp), "/login");
}

#[tokio::test]
async fn test_login_unknown_user_looks_like_wrong_password() {
    let app = TestApp::spawn().await;

    let resp = app
        .post_form("/login", &[("username", "nobody"), ("password", ADMIN_PASSWORD)])
        .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.text().await.expect("body").contains("Invalid credentials"));
}

#[tokio::test]
async fn test_register_then_login() {
    let app = TestApp::spawn().await;

    let resp = app
        .post_form(
            "/register",
            &[
                ("username", "clerk"),
                ("password", "counter-top-9"),
                ("confirm_password", "counter-top-9"),
            ],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");
    assert!(app.page("/login").await.contains("Registration successful. Please log in."));

    // Registering does not sign the user in.
    assert_eq!(location(&app.get("/").await), "/login");

    app.login("clerk", "counter-top-9").await;
    assert_eq!(app.get("/products").await.status(), StatusCode::OK);
    let clerk = Username::parse("clerk").expect("valid username");
    assert!(app.state.store().users().exists(&clerk).await);
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let app = TestApp::spawn().await;

    let resp = app
        .post_form(
            "/register",
            &[
                ("username", ADMIN_USERNAME),
                ("password", "another-pass-1"),
                ("confirm_password", "another-pass-1"),
            ],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert!(resp.text().await.expect("body").contains("Username already exists."));

    // The original password still works.
    app.login_as_admin().await;
}

#[tokio::test]
async fn test_register_password_mismatch() {
    let app = TestApp::spawn().await;

    let resp = app
        .post_form(
            "/register",
            &[
                ("username", "clerk"),
                ("password", "counter-top-9"),
                ("confirm_password", "counter-top-8"),
            ],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(resp.text().await.expect("body").contains("Passwords do not match."));
    let clerk = Username::parse("clerk").expect("valid username");
    assert!(!app.state.store().users().exists(&clerk).await);
}

#[tokio::test]
async fn test_register_short_password() {
    let app = TestApp::spawn().await;

    let resp = app
        .post_form(
            "/register",
            &[("username", "clerk"), ("password", "short"), ("confirm_password", "short")],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(
        resp.text()
            .await
            .expect("body")
            .contains("Password must be at least 8 characters.")
    );
    let clerk = Username::parse("clerk").expect("valid username");
    assert!(!app.state.store().users().exists(&clerk).await);
}

#[tokio::test]
async fn test_logout_ends_session() {
    let app = TestApp::spawn().await;
    app.login_as_admin().await;
    assert_eq!(app.get("/").await.status(), StatusCode::OK);

    let resp = app.get("/logout").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");
    assert!(app.page("/login").await.contains("Logged out successfully!"));

    assert_eq!(location(&app.get("/").await), "/login");
}

#[tokio::test]
async fn test_logout_without_session() {
    let app = TestApp::spawn().await;

    let resp = app.get("/logout").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");
    // Anonymous visitors get no session record and no cookie.
    assert!(resp.headers().get(reqwest::header::SET_COOKIE).is_none());
    assert!(!app.page("/login").await.contains("Logged out successfully!"));
}
