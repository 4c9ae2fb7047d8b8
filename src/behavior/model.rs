//! Behavior data model.
//!
//! These types are produced by the compiler and never mutated afterwards;
//! repeat consumption lives in the routing registry, not here.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use axum::http::Method;

use crate::behavior::cookie::Cookie;

/// HTTP methods a behavior can be declared for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl HttpMethod {
    /// Parse a method token, case-insensitive.
    pub fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_uppercase().as_str() {
            "GET" => Some(Self::Get),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "DELETE" => Some(Self::Delete),
            "PATCH" => Some(Self::Patch),
            "HEAD" => Some(Self::Head),
            "OPTIONS" => Some(Self::Options),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }

    /// True if the inbound request method is this method.
    pub fn matches(&self, method: &Method) -> bool {
        method.as_str() == self.as_str()
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canned response description.
///
/// Absent fields mean "not configured": the dispatcher falls back to its own
/// defaults (status 200, empty body).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseBehavior {
    pub status_code: Option<u16>,
    pub body: Option<String>,
    pub delay: Option<Duration>,
    /// Lower-case header name -> value.
    pub headers: HashMap<String, String>,
    pub cookies: Vec<Cookie>,
    pub redirect: Option<String>,
    pub stream: bool,
}

/// A response bound to one method and exact path.
#[derive(Debug, Clone, PartialEq)]
pub struct Behavior {
    pub response: ResponseBehavior,
    pub method: HttpMethod,
    pub url: String,
    /// `None` matches forever, `Some(n)` matches exactly `n` more times.
    pub repeat: Option<usize>,
}

/// The compiled output of one behavior file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BehaviorSet {
    pub default_behavior: Option<ResponseBehavior>,
    /// Declaration order; first match wins.
    pub behaviors: Vec<Behavior>,
}
