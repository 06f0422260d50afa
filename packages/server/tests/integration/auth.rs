use serde_json::json;

use crate::common::{TestApp, routes};

mod sign_up {
    use super::*;

    #[tokio::test]
    async fn new_account_gets_a_session_and_cookie() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::SIGNUP,
                &json!({"email": "artist@example.com", "password": "secret1"}),
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["confirmation_required"], false);
        assert!(res.body["access_token"].is_string());
        assert_eq!(res.body["user"]["email"], "artist@example.com");
        assert!(res.sets_cookie("portal_session"));
    }

    #[tokio::test]
    async fn confirmation_flow_returns_no_token() {
        let app = TestApp::spawn().await;
        app.backend.set_require_confirmation(true);

        let res = app
            .post_without_token(
                routes::SIGNUP,
                &json!({"email": "artist@example.com", "password": "secret1"}),
            )
            .await;

        assert_eq!(res.status, 201);
        assert_eq!(res.body["confirmation_required"], true);
        assert!(res.body["access_token"].is_null());
        assert!(!res.sets_cookie("portal_session"));
    }

    #[tokio::test]
    async fn service_rejection_is_forwarded_verbatim() {
        let app = TestApp::spawn().await;
        let body = json!({"email": "artist@example.com", "password": "secret1"});
        app.post_without_token(routes::SIGNUP, &body).await;

        let res = app.post_without_token(routes::SIGNUP, &body).await;

        assert_eq!(res.status, 502);
        assert_eq!(res.body["code"], "BACKEND_ERROR");
        assert_eq!(res.body["message"], "User already registered");
    }

    #[tokio::test]
    async fn malformed_email_never_reaches_the_service() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::SIGNUP,
                &json!({"email": "not-an-email", "password": "secret1"}),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(app.backend.identity_calls(), 0);
    }
}

mod login {
    use super::*;

    #[tokio::test]
    async fn credentials_accepted_by_sign_up_can_sign_in_as_the_same_user() {
        let app = TestApp::spawn().await;
        let body = json!({"email": "artist@example.com", "password": "secret1"});
        let created = app.post_without_token(routes::SIGNUP, &body).await;

        let res = app.post_without_token(routes::LOGIN, &body).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["user"]["id"], created.body["user"]["id"]);
        let token = res.body["access_token"].as_str().unwrap();

        let session = app.get_with_token(routes::SESSION, token).await;
        assert_eq!(session.status, 200);
        assert_eq!(session.body["user"]["id"], created.body["user"]["id"]);
    }

    #[tokio::test]
    async fn wrong_password_shows_the_service_message() {
        let app = TestApp::spawn().await;
        app.create_authenticated_user("artist@example.com", "secret1")
            .await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"email": "artist@example.com", "password": "wrong-one"}),
            )
            .await;

        assert_eq!(res.status, 502);
        assert_eq!(res.body["message"], "Invalid login credentials");
    }

    #[tokio::test]
    async fn empty_password_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"email": "artist@example.com", "password": ""}),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["message"], "Password must not be empty");
    }
}

mod session {
    use super::*;

    #[tokio::test]
    async fn no_token_is_session_missing() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::SESSION).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "SESSION_MISSING");
    }

    #[tokio::test]
    async fn unknown_token_is_session_invalid() {
        let app = TestApp::spawn().await;

        let res = app.get_with_token(routes::SESSION, "not-a-token").await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "SESSION_INVALID");
    }

    #[tokio::test]
    async fn logout_revokes_the_token_and_clears_the_cookie() {
        let app = TestApp::spawn().await;
        let token = app
            .create_authenticated_user("artist@example.com", "secret1")
            .await;

        let res = app.post_with_token(routes::LOGOUT, &json!({}), &token).await;

        assert_eq!(res.status, 204);
        assert!(res.removed_cookies.iter().any(|c| c == "portal_session"));
        let after = app.get_with_token(routes::SESSION, &token).await;
        assert_eq!(after.status, 401);
        assert_eq!(after.body["code"], "SESSION_INVALID");
    }
}
