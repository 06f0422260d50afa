use axum::response::Html;
use common::{MediaCategory, ProfileRecord};

use super::{escape, layout};

/// What the dashboard shows for one signed-in user.
pub struct DashboardView<'a> {
    pub email: Option<&'a str>,
    pub profile: &'a ProfileRecord,
    /// Track URLs in append order.
    pub tracks: &'a [String],
    pub notice: Option<&'a str>,
}

// Marks the form busy and disables its button until the next page load.
const BUSY_HANDLER: &str = "this.dataset.busy='true';this.querySelector('button').disabled=true";

fn image_or_placeholder(url: &str, class: &str, alt: &str) -> String {
    if url.is_empty() {
        format!(r#"<p class="placeholder">No {alt} yet</p>"#)
    } else {
        format!(
            r#"<img class="{class}" src="{}" alt="{alt}">"#,
            escape(url)
        )
    }
}

fn upload_form(category: MediaCategory, label: &str) -> String {
    format!(
        r#"<form method="post" action="/dashboard/media/{category}" enctype="multipart/form-data" data-busy="false" onsubmit="{BUSY_HANDLER}">
        <label for="file-{category}">{label}</label>
        <input id="file-{category}" name="file" type="file" accept="{accept}" required>
        <button type="submit">Upload</button>
    </form>"#,
        accept = category.accept(),
    )
}

fn text_input(name: &str, label: &str, value: &str, kind: &str) -> String {
    format!(
        r#"<label for="{name}">{label}</label>
        <input id="{name}" name="{name}" type="{kind}" value="{}">"#,
        escape(value)
    )
}

fn text_area(name: &str, label: &str, value: &str) -> String {
    format!(
        r#"<label for="{name}">{label}</label>
        <textarea id="{name}" name="{name}">{}</textarea>"#,
        escape(value)
    )
}

fn track_list(tracks: &[String]) -> String {
    if tracks.is_empty() {
        return r#"<p class="placeholder">No tracks uploaded yet</p>"#.into();
    }
    let items: String = tracks
        .iter()
        .map(|url| {
            let url = escape(url);
            format!(
                r#"<li><audio controls preload="none" src="{url}"></audio><br><a href="{url}">{name}</a></li>"#,
                name = url.rsplit('/').next().unwrap_or(&url)
            )
        })
        .collect();
    format!(r#"<ol class="tracks">{items}</ol>"#)
}

pub fn dashboard_page(view: &DashboardView<'_>) -> Html<String> {
    let p = view.profile;
    let heading = if p.username.is_empty() {
        view.email.unwrap_or("Your profile").to_string()
    } else {
        p.username.clone()
    };

    let body = format!(
        r#"<header>
    {banner}
    {avatar}
    <h1>{heading}</h1>
    <form method="post" action="/logout">
        <button type="submit">Sign out</button>
    </form>
</header>
<section id="profile">
    <h2>Profile</h2>
    <form method="post" action="/dashboard/profile" data-busy="false" onsubmit="{BUSY_HANDLER}">
        {username}
        {bio}
        {spotify}
        {instagram}
        {release_notes}
        <button type="submit">Save profile</button>
    </form>
</section>
<section id="media">
    <h2>Images</h2>
    {picture_form}
    {banner_form}
</section>
<section id="music">
    <h2>Music</h2>
    {music_form}
    {tracks}
</section>"#,
        banner = image_or_placeholder(&p.banner, "banner", "banner"),
        avatar = image_or_placeholder(&p.profile_pic, "avatar", "profile picture"),
        heading = escape(&heading),
        username = text_input("username", "Artist name", &p.username, "text"),
        bio = text_area("bio", "Bio", &p.bio),
        spotify = text_input("spotify", "Spotify link", &p.spotify, "url"),
        instagram = text_input("instagram", "Instagram link", &p.instagram, "url"),
        release_notes = text_area("release_notes", "Upcoming releases", &p.release_notes),
        picture_form = upload_form(MediaCategory::ProfilePicture, "Profile picture"),
        banner_form = upload_form(MediaCategory::Banner, "Banner"),
        music_form = upload_form(MediaCategory::Music, "Add a track"),
        tracks = track_list(view.tracks),
    );

    layout("Dashboard", view.notice, &body)
}
