//! Server-rendered HTML pages.

pub mod auth;
pub mod dashboard;

use axum::response::Html;

/// HTML-escape text for element content and quoted attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wrap a page body in the shared document shell. `notice` is shown once
/// above the body.
pub fn layout(title: &str, notice: Option<&str>, body: &str) -> Html<String> {
    let notice = notice
        .map(|n| format!(r#"<div class="notice" role="alert">{}</div>"#, escape(n)))
        .unwrap_or_default();

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} | Artist Portal</title>
    <style>
        * {{ box-sizing: border-box; }}
        body {{
            margin: 0;
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            background-color: #111;
            color: #e0e0e0;
            line-height: 1.6;
        }}
        main {{ max-width: 760px; margin: 0 auto; padding: 24px; }}
        h1, h2 {{ color: #fff; }}
        a {{ color: #8ab4f8; }}
        section {{
            background-color: #1d1d1d;
            border: 1px solid #333;
            border-radius: 8px;
            padding: 16px 20px;
            margin-bottom: 24px;
        }}
        label {{ display: block; margin-top: 12px; font-size: 14px; color: #aaa; }}
        input, textarea {{
            width: 100%;
            padding: 8px;
            background-color: #0d0d0d;
            color: #e0e0e0;
            border: 1px solid #444;
            border-radius: 4px;
        }}
        textarea {{ min-height: 96px; }}
        button {{
            margin-top: 14px;
            padding: 8px 18px;
            background-color: #1db954;
            color: #fff;
            border: none;
            border-radius: 4px;
            cursor: pointer;
        }}
        button:disabled {{ background-color: #555; cursor: wait; }}
        .notice {{
            background-color: #2a2a10;
            border: 1px solid #776;
            border-radius: 4px;
            padding: 10px 14px;
            margin-bottom: 20px;
        }}
        .banner {{ width: 100%; max-height: 220px; object-fit: cover; border-radius: 8px; }}
        .avatar {{ width: 120px; height: 120px; object-fit: cover; border-radius: 50%; }}
        .placeholder {{ color: #666; font-style: italic; }}
        .tracks li {{ margin-bottom: 12px; }}
        audio {{ width: 100%; }}
    </style>
</head>
<body>
<main>
{notice}
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
    ))
}
