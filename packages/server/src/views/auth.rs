use axum::response::Html;

use super::layout;

pub fn login_page(notice: Option<&str>) -> Html<String> {
    layout(
        "Sign in",
        notice,
        r#"<h1>Sign in</h1>
<section>
    <form method="post" action="/login">
        <label for="email">Email</label>
        <input id="email" name="email" type="email" autocomplete="email" required>
        <label for="password">Password</label>
        <input id="password" name="password" type="password" autocomplete="current-password" required>
        <button type="submit">Sign in</button>
    </form>
</section>
<p>No account yet? <a href="/signup">Create one</a></p>"#,
    )
}

pub fn signup_page(notice: Option<&str>) -> Html<String> {
    layout(
        "Sign up",
        notice,
        r#"<h1>Create your artist account</h1>
<section>
    <form method="post" action="/signup">
        <label for="email">Email</label>
        <input id="email" name="email" type="email" autocomplete="email" required>
        <label for="password">Password</label>
        <input id="password" name="password" type="password" autocomplete="new-password" required>
        <button type="submit">Sign up</button>
    </form>
</section>
<p>Already registered? <a href="/login">Sign in</a></p>"#,
    )
}
