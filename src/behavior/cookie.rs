//! Response cookies and the `cookie.*` property grammar.
//!
//! Within one section, `cookie.name` opens a new cookie and every following
//! `cookie.*` property edits the most recently opened one. [`CookieCursor`]
//! holds that "currently open" state for a single section.

use std::fmt;

use chrono::{DateTime, Datelike, Utc};

/// `SameSite` cookie policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Lax,
    Strict,
    None,
}

impl SameSite {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "lax" => Some(Self::Lax),
            "strict" => Some(Self::Strict),
            "none" => Some(Self::None),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Lax => "Lax",
            Self::Strict => "Strict",
            Self::None => "None",
        }
    }
}

/// A cookie set on every response of a behavior.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub path: Option<String>,
    pub domain: Option<String>,
    pub expires: Option<DateTime<Utc>>,
    /// Verbatim `cookie.raw_expires` text, kept for diagnostics.
    pub raw_expires: Option<String>,
    /// Positive renders as-is, negative renders `Max-Age=0`, zero is omitted.
    pub max_age: Option<i64>,
    pub secure: bool,
    pub http_only: bool,
    pub partitioned: bool,
    pub same_site: Option<SameSite>,
}

impl Cookie {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Renders the `Set-Cookie` header value.
impl fmt::Display for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value.contains([' ', ',']) {
            write!(f, "{}=\"{}\"", self.name, self.value)?;
        } else {
            write!(f, "{}={}", self.name, self.value)?;
        }

        if let Some(path) = self.path.as_deref().filter(|p| !p.is_empty()) {
            write!(f, "; Path={path}")?;
        }
        if let Some(domain) = self.domain.as_deref() {
            let domain = domain.strip_prefix('.').unwrap_or(domain);
            if !domain.is_empty() {
                write!(f, "; Domain={domain}")?;
            }
        }
        if let Some(expires) = self.expires.filter(|t| t.year() >= 1601) {
            write!(f, "; Expires={}", expires.format("%a, %d %b %Y %H:%M:%S GMT"))?;
        }
        match self.max_age {
            Some(age) if age > 0 => write!(f, "; Max-Age={age}")?,
            Some(age) if age < 0 => f.write_str("; Max-Age=0")?,
            _ => {}
        }
        if self.http_only {
            f.write_str("; HttpOnly")?;
        }
        if self.secure {
            f.write_str("; Secure")?;
        }
        if let Some(same_site) = self.same_site {
            write!(f, "; SameSite={}", same_site.as_str())?;
        }
        if self.partitioned {
            f.write_str("; Partitioned")?;
        }
        Ok(())
    }
}

/// Tracks the open cookie while one section is being compiled.
#[derive(Debug, Default)]
pub struct CookieCursor {
    open: Option<usize>,
}

impl CookieCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new cookie at the end of `cookies` and make it current.
    pub fn open(&mut self, cookies: &mut Vec<Cookie>, name: &str) {
        cookies.push(Cookie::new(name));
        self.open = Some(cookies.len() - 1);
    }

    /// The cookie subsequent attributes apply to, if one was opened.
    pub fn current<'a>(&self, cookies: &'a mut [Cookie]) -> Option<&'a mut Cookie> {
        self.open.and_then(move |index| cookies.get_mut(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_render_minimal() {
        let mut cookie = Cookie::new("foo");
        cookie.value = "bar".into();
        assert_eq!(cookie.to_string(), "foo=bar");
    }

    #[test]
    fn test_render_all_attributes() {
        let cookie = Cookie {
            name: "session".into(),
            value: "abc123".into(),
            path: Some("/".into()),
            domain: Some(".example.com".into()),
            expires: Some(Utc.with_ymd_and_hms(2030, 1, 2, 3, 4, 5).unwrap()),
            raw_expires: None,
            max_age: Some(10),
            secure: true,
            http_only: true,
            partitioned: true,
            same_site: Some(SameSite::Lax),
        };
        assert_eq!(
            cookie.to_string(),
            "session=abc123; Path=/; Domain=example.com; Expires=Wed, 02 Jan 2030 03:04:05 GMT; \
             Max-Age=10; HttpOnly; Secure; SameSite=Lax; Partitioned"
        );
    }

    #[test]
    fn test_render_quotes_values_with_spaces() {
        let mut cookie = Cookie::new("greeting");
        cookie.value = "hello world".into();
        assert_eq!(cookie.to_string(), "greeting=\"hello world\"");
    }

    #[test]
    fn test_render_max_age_variants() {
        let mut cookie = Cookie::new("a");
        cookie.max_age = Some(-5);
        assert_eq!(cookie.to_string(), "a=; Max-Age=0");
        cookie.max_age = Some(0);
        assert_eq!(cookie.to_string(), "a=");
    }

    #[test]
    fn test_same_site_parse() {
        assert_eq!(SameSite::parse("LAX"), Some(SameSite::Lax));
        assert_eq!(SameSite::parse("strict"), Some(SameSite::Strict));
        assert_eq!(SameSite::parse("None"), Some(SameSite::None));
        assert_eq!(SameSite::parse("sometimes"), None);
    }

    #[test]
    fn test_cursor_follows_latest_cookie() {
        let mut cookies = Vec::new();
        let mut cursor = CookieCursor::new();
        assert!(cursor.current(&mut cookies).is_none());

        cursor.open(&mut cookies, "first");
        cursor.current(&mut cookies).unwrap().value = "1".into();
        cursor.open(&mut cookies, "second");
        cursor.current(&mut cookies).unwrap().value = "2".into();

        assert_eq!(cookies[0].to_string(), "first=1");
        assert_eq!(cookies[1].to_string(), "second=2");
    }
}
