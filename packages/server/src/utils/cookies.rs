//! Session and flash-notice cookies for the HTML pages.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use common::AccessToken;

use crate::config::SessionConfig;

/// One-shot message shown on the next rendered page.
pub const NOTICE_COOKIE: &str = "portal_notice";

/// Budget for the encoded notice value. Browsers drop cookies over 4096
/// bytes including name and attributes; longer messages are cut at a
/// character boundary.
const NOTICE_MAX_ENCODED: usize = 3072;

pub fn session_cookie(config: &SessionConfig, token: &AccessToken) -> Cookie<'static> {
    Cookie::build((config.cookie_name.clone(), token.as_str().to_string()))
        .path("/")
        .http_only(true)
        .secure(config.secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(config.max_age_secs))
        .build()
}

/// Expire the session cookie, whether or not this request carried it.
pub fn clear_session(jar: CookieJar, config: &SessionConfig) -> CookieJar {
    jar.add(removal(config.cookie_name.clone()))
}

fn removal(name: String) -> Cookie<'static> {
    Cookie::build((name, ""))
        .path("/")
        .max_age(time::Duration::ZERO)
        .expires(time::OffsetDateTime::UNIX_EPOCH)
        .build()
}

/// Queue a notice for the next page view.
pub fn set_notice(jar: CookieJar, message: &str) -> CookieJar {
    jar.add(
        Cookie::build((NOTICE_COOKIE, encode(message)))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .build(),
    )
}

/// Read and drop the pending notice, if any.
pub fn take_notice(jar: CookieJar) -> (CookieJar, Option<String>) {
    let notice = jar
        .get(NOTICE_COOKIE)
        .map(|c| decode(c.value()))
        .filter(|m| !m.is_empty());
    match notice {
        Some(message) => (
            jar.add(removal(NOTICE_COOKIE.to_string())),
            Some(message),
        ),
        None => (jar, None),
    }
}

// Cookie values may not hold spaces, quotes, commas or semicolons, so notices
// are percent-encoded byte by byte.
fn encode(message: &str) -> String {
    let mut out = String::with_capacity(message.len());
    let mut buf = [0u8; 4];
    for c in message.chars() {
        let mut piece = String::new();
        for &b in c.encode_utf8(&mut buf).as_bytes() {
            if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'!') {
                piece.push(b as char);
            } else {
                piece.push_str(&format!("%{b:02X}"));
            }
        }
        if out.len() + piece.len() > NOTICE_MAX_ENCODED {
            break;
        }
        out.push_str(&piece);
    }
    out
}

fn decode(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
            if let Some(b) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                out.push(b);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
