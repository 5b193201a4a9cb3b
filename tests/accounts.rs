mod support;

use axum::http::{StatusCode, header};
use rust_decimal::Decimal;

use support::{TestApp, body_text};

#[tokio::test]
async fn register_creates_user_and_client() {
    let app = TestApp::new();
    let response = app
        .post_form(
            "/accounts/register/",
            None,
            "username=mila&email=mila%40example.com&password1=sturdy-pass-1&password2=sturdy-pass-1",
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).expect("location"),
        "/accounts/login/"
    );

    let directory = app.state.directory();
    let user = directory.user_by_username("mila").expect("user");
    let db = app.state.db();
    let client = db.client_by_user(user.id).expect("client row");
    assert_eq!(client.net_worth, Decimal::from(1000));
}

#[tokio::test]
async fn register_rejects_password_mismatch() {
    let app = TestApp::new();
    let response = app
        .post_form(
            "/accounts/register/",
            None,
            "username=mila&email=mila%40example.com&password1=sturdy-pass-1&password2=different-9",
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("the two password fields didn&#x27;t match"));
    assert!(app.state.directory().user_by_username("mila").is_none());
}

#[tokio::test]
async fn register_rejects_weak_password_and_bad_email() {
    let app = TestApp::new();
    let response = app
        .post_form(
            "/accounts/register/",
            None,
            "username=mila&email=not-an-email&password1=12345678&password2=12345678",
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("enter a valid email address"));
    assert!(page.contains("entirely numeric"));
}

#[tokio::test]
async fn register_rejects_duplicate_username() {
    let app = TestApp::new();
    let form =
        "username=mila&email=mila%40example.com&password1=sturdy-pass-1&password2=sturdy-pass-1";
    app.post_form("/accounts/register/", None, form).await;
    let response = app.post_form("/accounts/register/", None, form).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("already exists"));
}

#[tokio::test]
async fn login_sets_session_cookie_and_profile_renders() {
    let app = TestApp::new();
    app.post_form(
        "/accounts/register/",
        None,
        "username=mila&email=mila%40example.com&password1=sturdy-pass-1&password2=sturdy-pass-1",
    )
    .await;

    let response = app
        .post_form(
            "/accounts/login/",
            None,
            "username=mila&password=sturdy-pass-1",
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("set-cookie")
        .to_str()
        .expect("ascii")
        .to_string();
    let session = cookie
        .split(';')
        .next()
        .and_then(|pair| pair.strip_prefix("gymdesk_session="))
        .expect("session value")
        .to_string();

    let response = app.get_page("/accounts/profile/", Some(&session)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("mila"));
    assert!(page.contains("1000"));
}

#[tokio::test]
async fn login_with_wrong_password_shows_error() {
    let app = TestApp::new();
    app.session_for("mila", 1000);
    let response = app
        .post_form("/accounts/login/", None, "username=mila&password=wrong")
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("please enter a correct username and password"));
}

#[tokio::test]
async fn profile_redirects_anonymous_viewers() {
    let app = TestApp::new();
    let response = app.get_page("/accounts/profile/", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).expect("location"),
        "/accounts/login/"
    );
}

#[tokio::test]
async fn add_funds_updates_balance() {
    let app = TestApp::new();
    let session = app.session_for("mila", 1000);

    let response = app
        .post_form("/accounts/profile/", Some(&session), "money=250")
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("1250"));
}

#[tokio::test]
async fn add_funds_requires_a_positive_amount() {
    let app = TestApp::new();
    let session = app.session_for("mila", 1000);

    for form in ["money=", "money=0"] {
        let response = app.post_form("/accounts/profile/", Some(&session), form).await;
        let page = body_text(response).await;
        assert!(page.contains("an error occurred, money field was not specified!"));
    }

    let response = app
        .post_form("/accounts/profile/", Some(&session), "money=-5")
        .await;
    let page = body_text(response).await;
    assert!(page.contains("you can only add positive amount of money!"));

    let db = app.state.db();
    let directory = app.state.directory();
    let user = directory.user_by_username("mila").expect("user");
    assert_eq!(
        db.client_by_user(user.id).expect("client").net_worth,
        Decimal::from(1000)
    );
}

#[tokio::test]
async fn superuser_profile_provisions_exactly_one_client() {
    let app = TestApp::new();
    let session = app.superuser_session("root");

    app.get_page("/accounts/profile/", Some(&session)).await;
    app.get_page("/accounts/profile/", Some(&session)).await;

    let db = app.state.db();
    assert_eq!(db.clients().count(), 1);
}

#[tokio::test]
async fn logout_invalidates_the_session() {
    let app = TestApp::new();
    let session = app.session_for("mila", 1000);

    let response = app.get_page("/accounts/logout/", Some(&session)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = app.get_page("/accounts/profile/", Some(&session)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).expect("location"),
        "/accounts/login/"
    );
}
