use axum::http::{header::SET_COOKIE, HeaderMap, HeaderValue};

pub const SESSION_COOKIE: &str = "token";

const EPOCH_EXPIRES: &str = "Thu, 01 Jan 1970 00:00:00 GMT";

fn cookie_header(value: &str, extra: &str, secure: bool) -> anyhow::Result<HeaderMap> {
    let mut cookie = format!("{SESSION_COOKIE}={value}; Path=/; HttpOnly{extra}");
    if secure {
        cookie.push_str("; Secure");
    }
    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, HeaderValue::from_str(&cookie)?);
    Ok(headers)
}

/// `Set-Cookie` carrying a freshly minted session token.
pub fn session_cookie(token: &str, secure: bool) -> anyhow::Result<HeaderMap> {
    cookie_header(token, "", secure)
}

/// `Set-Cookie` that overwrites the session cookie with an empty, already
/// expired value. The token itself stays valid; this only asks the client to drop it.
pub fn expired_session_cookie(secure: bool) -> anyhow::Result<HeaderMap> {
    cookie_header("", &format!("; Max-Age=0; Expires={EPOCH_EXPIRES}"), secure)
}
