use ::common::models::UploadOptions;
use ::common::{AccessToken, BlobStore};

use crate::common::{PUBLIC_BASE, TestApp, routes::pages};

fn with(session: &str, extra: &str) -> String {
    if extra.is_empty() {
        session.to_string()
    } else {
        format!("{session}; {extra}")
    }
}

mod dashboard_access {
    use super::*;

    #[tokio::test]
    async fn without_a_session_redirects_to_login_and_issues_no_store_calls() {
        let app = TestApp::spawn().await;

        let res = app.get_page(pages::DASHBOARD, None).await;

        assert_eq!(res.status, 303);
        assert_eq!(res.location.as_deref(), Some(pages::LOGIN));
        assert_eq!(app.backend.identity_calls(), 0);
        assert_eq!(app.backend.record_calls(), 0);
        assert_eq!(app.backend.blob_calls(), 0);
    }

    #[tokio::test]
    async fn stale_cookie_is_cleared_on_the_way_to_login() {
        let app = TestApp::spawn().await;

        let res = app
            .get_page(pages::DASHBOARD, Some("portal_session=expired-token"))
            .await;

        assert_eq!(res.status, 303);
        assert_eq!(res.location.as_deref(), Some(pages::LOGIN));
        assert!(res.removed_cookies.iter().any(|c| c == "portal_session"));
        assert_eq!(app.backend.record_calls(), 0);
        assert_eq!(app.backend.blob_calls(), 0);
    }

    #[tokio::test]
    async fn identity_outage_keeps_the_session_cookie() {
        let app = TestApp::spawn().await;
        let session = app.sign_up_in_browser("artist@example.com", "secret1").await;

        app.backend.set_fail_identity(true);
        let res = app.get_page(pages::DASHBOARD, Some(&session)).await;

        assert_eq!(res.status, 303);
        assert_eq!(res.location.as_deref(), Some(pages::LOGIN));
        assert!(!res.removed_cookies.iter().any(|c| c == "portal_session"));
        assert!(res.sets_cookie("portal_notice"));

        app.backend.set_fail_identity(false);
        let res = app.get_page(pages::DASHBOARD, Some(&session)).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert!(res.text.contains("<h1>artist@example.com</h1>"));
    }

    #[tokio::test]
    async fn signed_in_user_sees_the_dashboard() {
        let app = TestApp::spawn().await;
        let session = app.sign_up_in_browser("artist@example.com", "secret1").await;

        let res = app.get_page(pages::DASHBOARD, Some(&session)).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert!(res.text.contains("<h1>artist@example.com</h1>"));
        assert!(res.text.contains(r#"action="/dashboard/profile""#));
        assert!(res.text.contains(r#"action="/dashboard/media/music""#));
        assert_eq!(app.backend.rows("profiles").len(), 1);
    }

    #[tokio::test]
    async fn section_shortcuts_redirect_into_the_dashboard() {
        let app = TestApp::spawn().await;

        let profile = app.get_page("/profile", None).await;
        let upload = app.get_page("/upload", None).await;

        assert_eq!(profile.status, 303);
        assert_eq!(profile.location.as_deref(), Some("/dashboard#profile"));
        assert_eq!(upload.location.as_deref(), Some("/dashboard#music"));
    }
}

mod auth_forms {
    use super::*;

    #[tokio::test]
    async fn root_and_login_render_the_login_form() {
        let app = TestApp::spawn().await;

        let root = app.get_page(pages::ROOT, None).await;
        let signup = app.get_page(pages::SIGNUP, None).await;

        assert_eq!(root.status, 200);
        assert!(root.text.contains(r#"action="/login""#));
        assert!(signup.text.contains(r#"action="/signup""#));
    }

    #[tokio::test]
    async fn failed_login_shows_the_service_message_once() {
        let app = TestApp::spawn().await;

        let res = app
            .submit_form(
                pages::LOGIN,
                &[("email", "nobody@example.com"), ("password", "whatever")],
                None,
            )
            .await;
        assert_eq!(res.status, 303);
        assert_eq!(res.location.as_deref(), Some(pages::LOGIN));

        let page = app.get_page(pages::LOGIN, Some(&res.cookie_header())).await;
        assert!(page.text.contains("Invalid login credentials"));
        assert!(page.removed_cookies.iter().any(|c| c == "portal_notice"));
    }

    #[tokio::test]
    async fn sign_up_needing_confirmation_lands_on_login_with_a_notice() {
        let app = TestApp::spawn().await;
        app.backend.set_require_confirmation(true);

        let res = app
            .submit_form(
                pages::SIGNUP,
                &[("email", "artist@example.com"), ("password", "secret1")],
                None,
            )
            .await;

        assert_eq!(res.status, 303);
        assert_eq!(res.location.as_deref(), Some(pages::LOGIN));
        assert!(!res.sets_cookie("portal_session"));
        let page = app.get_page(pages::LOGIN, Some(&res.cookie_header())).await;
        assert!(page.text.contains("Check your email to confirm your account"));
    }

    #[tokio::test]
    async fn rejected_sign_up_returns_to_the_signup_form() {
        let app = TestApp::spawn().await;

        let res = app
            .submit_form(
                pages::SIGNUP,
                &[("email", "artist@example.com"), ("password", "123")],
                None,
            )
            .await;

        assert_eq!(res.location.as_deref(), Some(pages::SIGNUP));
        let page = app.get_page(pages::SIGNUP, Some(&res.cookie_header())).await;
        assert!(page.text.contains("Password should be at least 6 characters."));
    }

    #[tokio::test]
    async fn login_form_signs_in_an_existing_account() {
        let app = TestApp::spawn().await;
        app.sign_up_in_browser("artist@example.com", "secret1").await;

        let res = app
            .submit_form(
                pages::LOGIN,
                &[("email", "artist@example.com"), ("password", "secret1")],
                None,
            )
            .await;

        assert_eq!(res.status, 303);
        assert_eq!(res.location.as_deref(), Some(pages::DASHBOARD));
        assert!(res.sets_cookie("portal_session"));
    }

    #[tokio::test]
    async fn logout_clears_the_cookie_and_revokes_the_session() {
        let app = TestApp::spawn().await;
        let session = app.sign_up_in_browser("artist@example.com", "secret1").await;

        let res = app.submit_form(pages::LOGOUT, &[], Some(&session)).await;

        assert_eq!(res.status, 303);
        assert_eq!(res.location.as_deref(), Some(pages::LOGIN));
        assert!(res.removed_cookies.iter().any(|c| c == "portal_session"));
        let after = app.get_page(pages::DASHBOARD, Some(&session)).await;
        assert_eq!(after.location.as_deref(), Some(pages::LOGIN));
    }
}

mod dashboard_forms {
    use super::*;

    #[tokio::test]
    async fn saving_the_profile_confirms_and_shows_the_new_values() {
        let app = TestApp::spawn().await;
        let session = app.sign_up_in_browser("artist@example.com", "secret1").await;

        let res = app
            .submit_form(
                pages::SAVE_PROFILE,
                &[
                    ("username", "Night Shift"),
                    ("bio", "Synths & <drums>"),
                    ("spotify", ""),
                    ("instagram", "https://instagram.com/ns"),
                    ("release_notes", "LP in autumn"),
                ],
                Some(&session),
            )
            .await;
        assert_eq!(res.status, 303);
        assert_eq!(res.location.as_deref(), Some("/dashboard#profile"));

        let page = app
            .get_page(pages::DASHBOARD, Some(&with(&session, &res.cookie_header())))
            .await;
        assert!(page.text.contains("Profile updated!"));
        assert!(page.text.contains("<h1>Night Shift</h1>"));
        assert!(page.text.contains("Synths &amp; &lt;drums&gt;"));
        assert!(page.text.contains(r#"value="https://instagram.com/ns""#));
    }

    #[tokio::test]
    async fn failed_save_shows_the_store_message() {
        let app = TestApp::spawn().await;
        let session = app.sign_up_in_browser("artist@example.com", "secret1").await;
        app.backend.set_fail_upserts(true);

        let res = app
            .submit_form(pages::SAVE_PROFILE, &[("bio", "x")], Some(&session))
            .await;

        let page = app
            .get_page(pages::DASHBOARD, Some(&with(&session, &res.cookie_header())))
            .await;
        assert!(
            page.text
                .contains("Error updating profile: Simulated record store failure")
        );
    }

    #[tokio::test]
    async fn uploaded_track_appears_with_a_player() {
        let app = TestApp::spawn().await;
        let session = app.sign_up_in_browser("artist@example.com", "secret1").await;

        let res = app
            .submit_upload(&pages::upload("music"), "song.mp3", b"mp3".to_vec(), &session)
            .await;
        assert_eq!(res.status, 303, "{}", res.text);
        assert_eq!(res.location.as_deref(), Some("/dashboard#music"));

        let page = app
            .get_page(pages::DASHBOARD, Some(&with(&session, &res.cookie_header())))
            .await;
        assert!(page.text.contains("Upload complete!"));
        assert_eq!(page.text.matches("<audio").count(), 1);
        assert!(page.text.contains("-song.mp3"));
    }

    #[tokio::test]
    async fn failed_upload_shows_the_storage_message() {
        let app = TestApp::spawn().await;
        let session = app.sign_up_in_browser("artist@example.com", "secret1").await;
        app.backend.set_fail_uploads(true);

        let res = app
            .submit_upload(
                &pages::upload("profile-picture"),
                "me.png",
                b"png".to_vec(),
                &session,
            )
            .await;

        let page = app
            .get_page(pages::DASHBOARD, Some(&with(&session, &res.cookie_header())))
            .await;
        assert!(page.text.contains("Upload error: Simulated upload failure"));
        assert!(page.text.contains("No profile picture yet"));
    }

    #[tokio::test]
    async fn tracks_fall_back_to_storage_when_the_record_has_none() {
        let app = TestApp::spawn().await;
        let session = app.sign_up_in_browser("artist@example.com", "secret1").await;
        let token = AccessToken::new(session.trim_start_matches("portal_session="));
        let user_id = app
            .get_with_token("/api/v1/auth/session", token.as_str())
            .await
            .body["user"]["id"]
            .as_str()
            .unwrap()
            .to_string();
        let path = format!("{user_id}/music/1-legacy.mp3");
        app.backend
            .upload(
                &token,
                "media",
                &path,
                b"old".to_vec(),
                &UploadOptions::default(),
            )
            .await
            .unwrap();

        let page = app.get_page(pages::DASHBOARD, Some(&session)).await;

        let url = format!("{PUBLIC_BASE}/storage/v1/object/public/media/{path}");
        assert!(page.text.contains(&url), "{}", page.text);
    }
}
