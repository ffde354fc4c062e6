//! Target URL validation
//!
//! A link target must be an absolute http(s) URL with a host. Script-capable
//! schemes are rejected before parsing so they get a precise error.

use url::Url;

/// 目标 URL 最大长度
pub const MAX_TARGET_URL_LEN: usize = 2048;

#[derive(Debug, PartialEq, Eq)]
pub enum UrlValidationError {
    Empty,
    TooLong(usize),
    DangerousScheme(String),
    UnsupportedScheme(String),
    MissingHost,
    Malformed(String),
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "target URL cannot be empty"),
            Self::TooLong(len) => write!(
                f,
                "target URL is {} characters, limit is {}",
                len, MAX_TARGET_URL_LEN
            ),
            Self::DangerousScheme(scheme) => write!(f, "scheme '{}' is not allowed", scheme),
            Self::UnsupportedScheme(scheme) => write!(
                f,
                "unsupported scheme '{}': only http and https are accepted",
                scheme
            ),
            Self::MissingHost => write!(f, "target URL must include a host"),
            Self::Malformed(msg) => write!(f, "malformed target URL: {}", msg),
        }
    }
}

impl std::error::Error for UrlValidationError {}

/// 危险协议列表
const DANGEROUS_SCHEMES: &[&str] = &["javascript", "data", "file", "vbscript", "about", "blob"];

/// Validate `raw` as an absolute http(s) URL and return the parsed form.
pub fn validate_target_url(raw: &str) -> Result<Url, UrlValidationError> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(UrlValidationError::Empty);
    }
    if raw.len() > MAX_TARGET_URL_LEN {
        return Err(UrlValidationError::TooLong(raw.len()));
    }

    // 先按冒号前缀判断协议，这样 "javascript:alert(1)" 之类的输入能得到准确的错误
    if let Some((scheme, _)) = raw.split_once(':') {
        let scheme = scheme.to_ascii_lowercase();
        if DANGEROUS_SCHEMES.contains(&scheme.as_str()) {
            return Err(UrlValidationError::DangerousScheme(scheme));
        }
    }

    let parsed = Url::parse(raw).map_err(|e| UrlValidationError::Malformed(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(UrlValidationError::UnsupportedScheme(other.to_string())),
    }

    if parsed.host_str().is_none_or(|h| h.is_empty()) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(parsed)
}
