use std::time::SystemTime;

/// `SameSite` cookie attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    /// Attribute is not sent.
    #[default]
    Off,
    Strict,
    Lax,
}

/// Options for setting or clearing a cookie.
///
/// The options are handed to the connection as is. How they end up on the
/// wire is up to the [`Connection`][crate::Connection] implementation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieOptions {
    pub expires: Option<SystemTime>,
    pub domain: Option<String>,
    pub http_only: bool,
    /// Seconds.
    pub max_age: Option<u64>,
    pub path: Option<String>,
    pub same_site: SameSite,
    pub secure: bool,
    pub signed: bool,
}

impl CookieOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expires(mut self, at: SystemTime) -> Self {
        self.expires = Some(at);
        self
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    pub fn max_age(mut self, seconds: u64) -> Self {
        self.max_age = Some(seconds);
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = same_site;
        self
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn signed(mut self, signed: bool) -> Self {
        self.signed = signed;
        self
    }
}

/// Render a `Set-Cookie` header value.
#[cfg(feature = "memory")]
pub(crate) fn set_cookie_value(name: &str, value: &str, options: &CookieOptions) -> String {
    let mut parts = vec![format!("{}={}", name, value)];

    if let Some(domain) = &options.domain {
        parts.push(format!("Domain={}", domain));
    }

    if let Some(path) = &options.path {
        parts.push(format!("Path={}", path));
    }

    if let Some(max_age) = options.max_age {
        parts.push(format!("Max-Age={}", max_age));
    }

    if let Some(expires) = options.expires {
        parts.push(format!("Expires={}", httpdate::fmt_http_date(expires)));
    }

    if options.http_only {
        parts.push("HttpOnly".to_string());
    }

    if options.secure {
        parts.push("Secure".to_string());
    }

    match options.same_site {
        SameSite::Off => {}
        SameSite::Strict => parts.push("SameSite=Strict".to_string()),
        SameSite::Lax => parts.push("SameSite=Lax".to_string()),
    }

    parts.join("; ")
}

/// Render a `Set-Cookie` header value that removes the cookie in the user agent.
#[cfg(feature = "memory")]
pub(crate) fn clear_cookie_value(name: &str, options: &CookieOptions) -> String {
    let mut options = options.clone();

    options.expires = Some(SystemTime::UNIX_EPOCH);
    options.max_age = None;

    if options.path.is_none() {
        options.path = Some("/".to_string());
    }

    set_cookie_value(name, "", &options)
}

#[cfg(all(test, feature = "memory"))]
mod test {
    use std::time::Duration;

    use super::*;

    #[test]
    fn plain_cookie() {
        let value = set_cookie_value("session", "abc123", &CookieOptions::new());
        assert_eq!(value, "session=abc123");
    }

    #[test]
    fn all_attributes() {
        let options = CookieOptions::new()
            .domain("a.test")
            .path("/app")
            .max_age(3600)
            .expires(SystemTime::UNIX_EPOCH + Duration::from_secs(784111777))
            .http_only(true)
            .secure(true)
            .same_site(SameSite::Strict);

        let value = set_cookie_value("session", "abc123", &options);

        assert_eq!(
            value,
            "session=abc123; Domain=a.test; Path=/app; Max-Age=3600; \
             Expires=Sun, 06 Nov 1994 08:49:37 GMT; HttpOnly; Secure; SameSite=Strict"
        );
    }

    #[test]
    fn clear_defaults_path_and_expires_at_epoch() {
        let value = clear_cookie_value("session", &CookieOptions::new().max_age(10));
        assert_eq!(
            value,
            "session=; Path=/; Expires=Thu, 01 Jan 1970 00:00:00 GMT"
        );
    }

    #[test]
    fn clear_keeps_given_path() {
        let options = CookieOptions::new().path("/app").same_site(SameSite::Lax);
        let value = clear_cookie_value("session", &options);
        assert_eq!(
            value,
            "session=; Path=/app; Expires=Thu, 01 Jan 1970 00:00:00 GMT; SameSite=Lax"
        );
    }
}
