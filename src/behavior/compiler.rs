//! Compiles parsed sections into a [`BehaviorSet`].
//!
//! Compilation is all-or-nothing: the first error aborts and no partial set
//! is returned.

use axum::http::{HeaderName, HeaderValue};
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::behavior::cookie::{CookieCursor, SameSite};
use crate::behavior::duration::parse_duration;
use crate::behavior::model::{Behavior, BehaviorSet, HttpMethod, ResponseBehavior};
use crate::behavior::parser::{Property, Section, DEFAULT_SECTION};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("Malformed behavior header at line {line_index}: {line}{}", suffix(.details))]
    MalformedBehaviorHeader {
        line_index: u64,
        line: String,
        details: Option<String>,
    },

    #[error("Malformed property at line {line_index}: {line}{}", suffix(.details))]
    MalformedProperty {
        line_index: u64,
        line: String,
        details: Option<String>,
    },
}

fn suffix(details: &Option<String>) -> String {
    details.as_ref().map(|d| format!(" - {d}")).unwrap_or_default()
}

impl CompileError {
    pub fn line_index(&self) -> u64 {
        match self {
            Self::MalformedBehaviorHeader { line_index, .. } | Self::MalformedProperty { line_index, .. } => *line_index,
        }
    }

    fn header(section: &Section, details: Option<String>) -> Self {
        Self::MalformedBehaviorHeader {
            line_index: section.line_index,
            line: section.name.clone(),
            details,
        }
    }

    fn property(property: &Property, details: impl Into<String>) -> Self {
        Self::MalformedProperty {
            line_index: property.line_index,
            line: format!("{}={}", property.name, property.value),
            details: Some(details.into()),
        }
    }
}

/// Compile sections into a behavior set, stamping relative cookie expiry
/// against the current time.
pub fn compile(sections: &[Section]) -> Result<BehaviorSet, CompileError> {
    compile_at(sections, Utc::now())
}

/// Same as [`compile`] with an explicit "now" for `cookie.expires`.
pub fn compile_at(sections: &[Section], now: DateTime<Utc>) -> Result<BehaviorSet, CompileError> {
    let mut set = BehaviorSet::default();

    for section in sections {
        if section.name == DEFAULT_SECTION {
            let default = set.default_behavior.get_or_insert_with(ResponseBehavior::default);
            let mut target = Target::Default(default);
            apply_properties(&mut target, section, now)?;
        } else {
            let (method, url) = parse_behavior_header(section)?;
            let mut behavior = Behavior {
                response: ResponseBehavior::default(),
                method,
                url,
                repeat: None,
            };
            apply_properties(&mut Target::Route(&mut behavior), section, now)?;
            set.behaviors.push(behavior);
        }
    }

    Ok(set)
}

/// Where a section's properties land.
enum Target<'a> {
    Default(&'a mut ResponseBehavior),
    Route(&'a mut Behavior),
}

impl Target<'_> {
    fn response(&mut self) -> &mut ResponseBehavior {
        match self {
            Target::Default(response) => &mut **response,
            Target::Route(behavior) => &mut behavior.response,
        }
    }
}

fn parse_behavior_header(section: &Section) -> Result<(HttpMethod, String), CompileError> {
    let header = section.name.trim_matches(|c| c == '[' || c == ']');
    let Some((method, url)) = header.split_once(' ') else {
        return Err(CompileError::header(section, None));
    };

    let url = url.trim();
    if url.is_empty() || !url.starts_with('/') {
        return Err(CompileError::header(section, Some("URL cannot be empty".into())));
    }

    let method = HttpMethod::parse(method)
        .ok_or_else(|| CompileError::header(section, Some(format!("Invalid HTTP method: {method}"))))?;

    Ok((method, url.to_string()))
}

fn apply_properties(target: &mut Target<'_>, section: &Section, now: DateTime<Utc>) -> Result<(), CompileError> {
    let mut cursor = CookieCursor::new();
    for property in &section.properties {
        apply_property(target, &mut cursor, property, now)?;
    }
    Ok(())
}

fn apply_property(
    target: &mut Target<'_>,
    cursor: &mut CookieCursor,
    property: &Property,
    now: DateTime<Utc>,
) -> Result<(), CompileError> {
    let value = property.value.as_str();

    match property.name.as_str() {
        "status_code" => {
            let code = value
                .parse::<i64>()
                .ok()
                .filter(|code| (100..=599).contains(code))
                .ok_or_else(|| {
                    CompileError::property(property, "Invalid status code, must be an integer between 100 and 599")
                })?;
            target.response().status_code = Some(code as u16);
        }
        "body" => target.response().body = Some(value.to_string()),
        "delay" => {
            let delay = parse_duration(value)
                .ok()
                .and_then(|d| d.to_std().ok())
                .ok_or_else(|| CompileError::property(property, "Invalid delay, must be a non-negative duration"))?;
            target.response().delay = Some(delay);
        }
        "header" => {
            let (key, header_value) = parse_header(property)?;
            target.response().headers.insert(key, header_value);
        }
        "redirect" => {
            if HeaderValue::from_str(value).is_err() {
                return Err(CompileError::property(property, "Invalid redirect target"));
            }
            target.response().redirect = Some(value.to_string());
        }
        "stream" => target.response().stream = value.eq_ignore_ascii_case("true"),
        "repeat" => {
            let repeat = value
                .parse::<i64>()
                .ok()
                .and_then(|n| usize::try_from(n).ok())
                .ok_or_else(|| {
                    CompileError::property(property, "Invalid repeat value, must be a non-negative integer")
                })?;
            match target {
                Target::Route(behavior) => behavior.repeat = Some(repeat),
                Target::Default(_) => {
                    tracing::warn!(line = property.line_index, "repeat has no effect on the default behavior");
                }
            }
        }
        name if name.starts_with("cookie.") => apply_cookie_property(target.response(), cursor, property, now)?,
        name => return Err(CompileError::property(property, format!("Unknown property: {name}"))),
    }

    Ok(())
}

fn parse_header(property: &Property) -> Result<(String, String), CompileError> {
    let (key, value) = property
        .value
        .split_once(':')
        .ok_or_else(|| CompileError::property(property, "Invalid header format, expected 'Key: Value'"))?;

    let (key, value) = (key.trim(), value.trim());
    if key.is_empty() || value.is_empty() {
        return Err(CompileError::property(property, "Header key and value cannot be empty"));
    }

    let name = HeaderName::from_bytes(key.as_bytes())
        .map_err(|_| CompileError::property(property, format!("Invalid header name: {key}")))?;
    if HeaderValue::from_str(value).is_err() {
        return Err(CompileError::property(property, format!("Invalid header value for {key}")));
    }

    Ok((name.as_str().to_string(), value.to_string()))
}

fn apply_cookie_property(
    response: &mut ResponseBehavior,
    cursor: &mut CookieCursor,
    property: &Property,
    now: DateTime<Utc>,
) -> Result<(), CompileError> {
    let value = property.value.as_str();

    if property.name == "cookie.name" {
        cursor.open(&mut response.cookies, value);
        return Ok(());
    }

    let cookie = cursor
        .current(&mut response.cookies)
        .ok_or_else(|| CompileError::property(property, "cookie.name must be set before other cookie properties"))?;

    match property.name.as_str() {
        "cookie.value" => cookie.value = value.to_string(),
        "cookie.path" => cookie.path = Some(value.to_string()),
        "cookie.domain" => cookie.domain = Some(value.to_string()),
        "cookie.expires" => {
            let offset =
                parse_duration(value).map_err(|_| CompileError::property(property, "Invalid cookie.expires duration"))?;
            let expires = now
                .checked_add_signed(offset)
                .ok_or_else(|| CompileError::property(property, "Invalid cookie.expires duration"))?;
            cookie.expires = Some(expires);
        }
        "cookie.raw_expires" => {
            let expires = DateTime::parse_from_rfc3339(value)
                .map_err(|_| CompileError::property(property, "Invalid cookie.raw_expires RFC3339 time"))?;
            cookie.raw_expires = Some(value.to_string());
            cookie.expires = Some(expires.with_timezone(&Utc));
        }
        "cookie.max_age" => {
            let max_age = value
                .parse::<i64>()
                .map_err(|_| CompileError::property(property, "Invalid cookie.max_age integer"))?;
            cookie.max_age = Some(max_age);
        }
        "cookie.secure" => cookie.secure = value.eq_ignore_ascii_case("true"),
        "cookie.http_only" => cookie.http_only = value.eq_ignore_ascii_case("true"),
        "cookie.partitioned" => cookie.partitioned = value.eq_ignore_ascii_case("true"),
        "cookie.same_site" => {
            let same_site = SameSite::parse(value)
                .ok_or_else(|| CompileError::property(property, "Invalid cookie.same_site value"))?;
            cookie.same_site = Some(same_site);
        }
        name => {
            return Err(CompileError::property(property, format!("Unknown cookie property: {name}")));
        }
    }

    Ok(())
}
