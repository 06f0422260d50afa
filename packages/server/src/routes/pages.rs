use axum::{
    Router,
    routing::{get, post},
};

use crate::config::AppConfig;
use crate::handlers::{media::upload_body_limit, pages};
use crate::state::AppState;

pub fn routes(config: &AppConfig) -> Router<AppState> {
    let forms = Router::new()
        .route("/", get(pages::login_page))
        .route("/login", get(pages::login_page).post(pages::login_submit))
        .route("/signup", get(pages::signup_page).post(pages::signup_submit))
        .route("/logout", post(pages::logout_submit))
        .route("/dashboard", get(pages::dashboard))
        .route("/dashboard/profile", post(pages::save_profile))
        .route("/profile", get(pages::profile_redirect))
        .route("/upload", get(pages::upload_redirect));

    let uploads = Router::new()
        .route("/dashboard/media/{category}", post(pages::upload_media))
        .layer(upload_body_limit(config.upload.max_body_bytes));

    forms.merge(uploads)
}
