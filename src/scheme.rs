//! Jianshu web URL to app URL-scheme conversion.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemeError {
    #[error("not a valid URL: {0}")]
    InvalidUrl(String),

    #[error("not a Jianshu URL: {0}")]
    NotJianshu(String),

    #[error("unsupported Jianshu page: {0}")]
    UnsupportedPage(String),
}

/// Kind of page a Jianshu URL points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    User,
    Article,
    Collection,
    Notebook,
}

impl PageKind {
    fn scheme_prefix(&self) -> &'static str {
        match self {
            PageKind::User => "jianshu://u/",
            PageKind::Article => "jianshu://notes/",
            PageKind::Collection => "jianshu://c/",
            PageKind::Notebook => "jianshu://nb/",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conversion {
    pub kind: PageKind,
    pub slug: String,
    pub scheme: String,
}

fn path_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^/(u|p|c|nb)/([0-9A-Za-z]{1,16})/?$").expect("static regex is valid")
    })
}

/// Convert a Jianshu web URL into the matching app URL scheme.
pub fn convert(input: &str) -> Result<Conversion, SchemeError> {
    let url = Url::parse(input.trim()).map_err(|_| SchemeError::InvalidUrl(input.to_string()))?;

    let is_jianshu = matches!(url.scheme(), "http" | "https")
        && matches!(url.host_str(), Some("www.jianshu.com") | Some("jianshu.com"));
    if !is_jianshu {
        return Err(SchemeError::NotJianshu(input.to_string()));
    }

    let caps = path_pattern()
        .captures(url.path())
        .ok_or_else(|| SchemeError::UnsupportedPage(url.path().to_string()))?;

    let kind = match &caps[1] {
        "u" => PageKind::User,
        "p" => PageKind::Article,
        "c" => PageKind::Collection,
        _ => PageKind::Notebook,
    };
    let slug = caps[2].to_string();

    Ok(Conversion {
        kind,
        scheme: format!("{}{}", kind.scheme_prefix(), slug),
        slug,
    })
}
