use serde_json::json;

use portal_server::config::AppConfig;

use crate::common::{PUBLIC_BASE, TestApp, routes};

mod music {
    use super::*;

    #[tokio::test]
    async fn each_upload_appends_exactly_one_track_in_order() {
        let app = TestApp::spawn().await;
        let token = app
            .create_authenticated_user("artist@example.com", "secret1")
            .await;

        let first = app
            .upload_with_token(&routes::media("music"), "intro.mp3", b"one".to_vec(), &token)
            .await;
        assert_eq!(first.status, 201, "{}", first.text);
        let second = app
            .upload_with_token(&routes::media("music"), "outro.mp3", b"two".to_vec(), &token)
            .await;
        assert_eq!(second.status, 201, "{}", second.text);

        let first_url = first.body["url"].as_str().unwrap();
        let second_url = second.body["url"].as_str().unwrap();
        assert!(first_url.starts_with(PUBLIC_BASE));
        assert!(second_url.ends_with("-outro.mp3"));
        assert_eq!(second.body["profile"]["tracks"], json!([first_url, second_url]));

        let profile = app.get_with_token(routes::PROFILE, &token).await;
        assert_eq!(profile.body["tracks"], json!([first_url, second_url]));
    }

    #[tokio::test]
    async fn objects_land_under_the_users_category_directory() {
        let app = TestApp::spawn().await;
        let token = app
            .create_authenticated_user("artist@example.com", "secret1")
            .await;
        let session = app.get_with_token(routes::SESSION, &token).await;
        let user_id = session.body["user"]["id"].as_str().unwrap().to_string();

        let res = app
            .upload_with_token(&routes::media("music"), "my song.mp3", b"abc".to_vec(), &token)
            .await;

        let path = res.body["path"].as_str().unwrap();
        assert!(path.starts_with(&format!("{user_id}/music/")), "{path}");
        assert!(path.ends_with("-my_song.mp3"), "{path}");
        assert_eq!(app.backend.object("media", path).unwrap(), b"abc");
    }

    #[tokio::test]
    async fn listing_returns_stored_tracks_with_public_urls() {
        let app = TestApp::spawn().await;
        let token = app
            .create_authenticated_user("artist@example.com", "secret1")
            .await;
        let uploaded = app
            .upload_with_token(&routes::media("music"), "a.mp3", b"a".to_vec(), &token)
            .await;
        app.upload_with_token(&routes::media("banner"), "b.png", b"b".to_vec(), &token)
            .await;

        let res = app.get_with_token(&routes::media("music"), &token).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["category"], "music");
        assert_eq!(res.body["total"], 1);
        assert_eq!(res.body["items"][0]["url"], uploaded.body["url"]);
        assert_eq!(res.body["items"][0]["path"], uploaded.body["path"]);
    }
}

mod images {
    use super::*;

    #[tokio::test]
    async fn new_profile_picture_replaces_the_previous_url() {
        let app = TestApp::spawn().await;
        let token = app
            .create_authenticated_user("artist@example.com", "secret1")
            .await;

        let first = app
            .upload_with_token(
                &routes::media("profile-picture"),
                "me.png",
                b"old".to_vec(),
                &token,
            )
            .await;
        let second = app
            .upload_with_token(
                &routes::media("profile-picture"),
                "me.png",
                b"new".to_vec(),
                &token,
            )
            .await;
        assert_eq!(second.status, 201, "{}", second.text);

        let profile = app.get_with_token(routes::PROFILE, &token).await;
        assert_eq!(profile.body["profile_pic"], second.body["url"]);
        assert_ne!(profile.body["profile_pic"], first.body["url"]);
        assert_eq!(profile.body["tracks"], json!([]));
    }

    #[tokio::test]
    async fn banner_upload_sets_the_banner_and_guesses_the_type() {
        let app = TestApp::spawn().await;
        let token = app
            .create_authenticated_user("artist@example.com", "secret1")
            .await;

        let res = app
            .upload_with_token(&routes::media("banner"), "wide.jpg", b"jpg".to_vec(), &token)
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["profile"]["banner"], res.body["url"]);
        let path = res.body["path"].as_str().unwrap();
        assert_eq!(
            app.backend.object_content_type("media", path).as_deref(),
            Some("image/jpeg")
        );
    }
}

mod failures {
    use super::*;

    #[tokio::test]
    async fn failed_upload_leaves_the_profile_unchanged() {
        let app = TestApp::spawn().await;
        let token = app
            .create_authenticated_user("artist@example.com", "secret1")
            .await;
        app.upload_with_token(&routes::media("music"), "a.mp3", b"a".to_vec(), &token)
            .await;
        let before = app.get_with_token(routes::PROFILE, &token).await;
        app.backend.set_fail_uploads(true);

        let music = app
            .upload_with_token(&routes::media("music"), "b.mp3", b"b".to_vec(), &token)
            .await;
        let picture = app
            .upload_with_token(
                &routes::media("profile-picture"),
                "me.png",
                b"p".to_vec(),
                &token,
            )
            .await;

        assert_eq!(music.status, 502);
        assert_eq!(music.body["message"], "Simulated upload failure");
        assert_eq!(picture.status, 502);
        let after = app.get_with_token(routes::PROFILE, &token).await;
        assert_eq!(after.body["tracks"], before.body["tracks"]);
        assert_eq!(after.body["profile_pic"], "");
    }

    #[tokio::test]
    async fn unknown_category_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app
            .create_authenticated_user("artist@example.com", "secret1")
            .await;

        let res = app
            .upload_with_token(&routes::media("videos"), "a.mp4", b"a".to_vec(), &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["message"], "Unknown media category 'videos'");
        assert_eq!(app.backend.blob_calls(), 0);
    }

    #[tokio::test]
    async fn body_over_the_limit_is_payload_too_large() {
        let mut config = AppConfig::default();
        config.upload.max_body_bytes = 1024;
        let app = TestApp::spawn_with_config(config).await;
        let token = app
            .create_authenticated_user("artist@example.com", "secret1")
            .await;

        let res = app
            .upload_with_token(&routes::media("music"), "big.mp3", vec![0u8; 8 * 1024], &token)
            .await;

        assert_eq!(res.status, 413, "{}", res.text);
        assert_eq!(app.backend.blob_calls(), 0);
    }

    #[tokio::test]
    async fn upload_without_session_touches_no_store() {
        let app = TestApp::spawn().await;

        let res = app
            .upload_with_token(&routes::media("music"), "a.mp3", b"a".to_vec(), "bogus")
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(app.backend.record_calls(), 0);
        assert_eq!(app.backend.blob_calls(), 0);
    }
}
