//! Cookie Management Infrastructure
//!
//! `Set-Cookie` rendering and request cookie lookup.
//!
//! Dates are rendered from fixed English tables so the output never depends on
//! the process locale.

use std::fmt;
use std::str::FromStr;

use axum::http::{HeaderMap, HeaderValue, header};
use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::Deserialize;

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// SameSite policy for cookies
///
/// `None` leaves the attribute off entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    /// Attribute value, or `None` when the attribute is omitted
    pub fn attribute(&self) -> Option<&'static str> {
        match self {
            SameSite::Strict => Some("Strict"),
            SameSite::Lax => Some("Lax"),
            SameSite::None => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown SameSite policy `{0}` (expected strict, lax or none)")]
pub struct ParseSameSiteError(String);

impl FromStr for SameSite {
    type Err = ParseSameSiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strict" => Ok(SameSite::Strict),
            "lax" => Ok(SameSite::Lax),
            "none" => Ok(SameSite::None),
            other => Err(ParseSameSiteError(other.to_string())),
        }
    }
}

/// One `Set-Cookie` instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieDirective {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    pub expires: DateTime<Utc>,
}

impl CookieDirective {
    /// Header value for `Set-Cookie`
    pub fn to_header_value(&self) -> Option<HeaderValue> {
        HeaderValue::from_str(&self.to_string()).ok()
    }
}

impl fmt::Display for CookieDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)?;
        if !self.domain.is_empty() {
            write!(f, "; Domain={}", self.domain)?;
        }
        write!(f, "; Expires={}", http_date(self.expires))?;
        if self.http_only {
            f.write_str("; HttpOnly")?;
        }
        if !self.path.is_empty() {
            write!(f, "; Path={}", self.path)?;
        }
        if let Some(same_site) = self.same_site.attribute() {
            write!(f, "; SameSite={}", same_site)?;
        }
        if self.secure {
            f.write_str("; Secure")?;
        }
        Ok(())
    }
}

/// Render an HTTP date: `Thu, 01 Jan 1970 00:00:00 GMT`
pub fn http_date(at: DateTime<Utc>) -> String {
    format!(
        "{}, {:02} {} {:04} {:02}:{:02}:{:02} GMT",
        WEEKDAYS[at.weekday().num_days_from_monday() as usize],
        at.day(),
        MONTHS[at.month0() as usize],
        at.year(),
        at.hour(),
        at.minute(),
        at.second(),
    )
}

/// Extract a cookie value from headers
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;

            if key == name {
                Some(value.to_string())
            } else {
                None
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn directive() -> CookieDirective {
        CookieDirective {
            name: "forums_session".to_string(),
            value: "abc.def.ghi".to_string(),
            domain: "example.com".to_string(),
            path: "/".to_string(),
            secure: true,
            http_only: true,
            same_site: SameSite::Lax,
            expires: Utc.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).unwrap(),
        }
    }

    #[test]
    fn test_http_date_epoch() {
        assert_eq!(
            http_date(DateTime::UNIX_EPOCH),
            "Thu, 01 Jan 1970 00:00:00 GMT"
        );
    }

    #[test]
    fn test_http_date_pads_fields() {
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).unwrap();
        assert_eq!(http_date(at), "Tue, 05 Mar 2024 07:08:09 GMT");

        let at = Utc.with_ymd_and_hms(1999, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(http_date(at), "Fri, 31 Dec 1999 23:59:59 GMT");
    }

    #[test]
    fn test_full_directive() {
        assert_eq!(
            directive().to_string(),
            "forums_session=abc.def.ghi; Domain=example.com; \
             Expires=Tue, 05 Mar 2024 07:08:09 GMT; HttpOnly; Path=/; SameSite=Lax; Secure"
        );
    }

    #[test]
    fn test_empty_attributes_are_omitted() {
        let cookie = CookieDirective {
            domain: String::new(),
            path: String::new(),
            secure: false,
            http_only: false,
            same_site: SameSite::None,
            ..directive()
        };
        assert_eq!(
            cookie.to_string(),
            "forums_session=abc.def.ghi; Expires=Tue, 05 Mar 2024 07:08:09 GMT"
        );
    }

    #[test]
    fn test_clearing_directive() {
        let cookie = CookieDirective {
            value: String::new(),
            expires: DateTime::UNIX_EPOCH,
            same_site: SameSite::Strict,
            ..directive()
        };
        let rendered = cookie.to_string();
        assert!(rendered.starts_with("forums_session=; "));
        assert!(rendered.contains("Expires=Thu, 01 Jan 1970 00:00:00 GMT"));
        assert!(rendered.contains("SameSite=Strict"));
        assert!(cookie.to_header_value().is_some());
    }

    #[test]
    fn test_same_site_parsing() {
        assert_eq!("strict".parse::<SameSite>().unwrap(), SameSite::Strict);
        assert_eq!("lax".parse::<SameSite>().unwrap(), SameSite::Lax);
        assert_eq!("none".parse::<SameSite>().unwrap(), SameSite::None);
        assert!("Lax".parse::<SameSite>().is_err());
        assert!("".parse::<SameSite>().is_err());
    }

    #[test]
    fn test_same_site_deserialize() {
        let parsed: SameSite = serde_json::from_str("\"strict\"").unwrap();
        assert_eq!(parsed, SameSite::Strict);
        assert!(serde_json::from_str::<SameSite>("\"sometimes\"").is_err());
    }

    #[test]
    fn test_extract_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("foo=bar; session=abc123; other=xyz"),
        );

        assert_eq!(
            extract_cookie(&headers, "session"),
            Some("abc123".to_string())
        );
        assert_eq!(extract_cookie(&headers, "foo"), Some("bar".to_string()));
        assert_eq!(extract_cookie(&headers, "missing"), None);
    }

    #[test]
    fn test_extract_cookie_across_headers() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("foo=bar"));
        headers.append(header::COOKIE, HeaderValue::from_static("session=abc123"));

        assert_eq!(
            extract_cookie(&headers, "session"),
            Some("abc123".to_string())
        );
    }
}
