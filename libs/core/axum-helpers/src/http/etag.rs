//! Entity tags for conditional requests.
//!
//! Tags are compared with the weak comparison function: `W/"a"` and `"a"`
//! match. A row version is rendered as a weak tag of 16 lowercase hex digits.

use axum::http::HeaderValue;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityTag {
    weak: bool,
    opaque: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid entity tag: {0}")]
pub struct InvalidEntityTag(pub String);

impl EntityTag {
    pub fn weak(opaque: impl Into<String>) -> Self {
        Self {
            weak: true,
            opaque: opaque.into(),
        }
    }

    pub fn strong(opaque: impl Into<String>) -> Self {
        Self {
            weak: false,
            opaque: opaque.into(),
        }
    }

    /// Weak tag derived from a monotonically increasing row version.
    pub fn from_version(version: i64) -> Self {
        Self::weak(format!("{:016x}", version as u64))
    }

    pub fn is_weak(&self) -> bool {
        self.weak
    }

    pub fn opaque(&self) -> &str {
        &self.opaque
    }

    /// Weak comparison: opaque values equal, weakness ignored.
    pub fn weak_eq(&self, other: &EntityTag) -> bool {
        self.opaque == other.opaque
    }

    pub fn to_header_value(&self) -> HeaderValue {
        // opaque is restricted to visible ASCII by construction and parsing
        HeaderValue::from_str(&self.to_string())
            .unwrap_or_else(|_| HeaderValue::from_static("W/\"\""))
    }
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.weak {
            write!(f, "W/\"{}\"", self.opaque)
        } else {
            write!(f, "\"{}\"", self.opaque)
        }
    }
}

impl FromStr for EntityTag {
    type Err = InvalidEntityTag;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let (weak, rest) = match trimmed.strip_prefix("W/") {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let opaque = rest
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .ok_or_else(|| InvalidEntityTag(raw.to_string()))?;

        let valid = opaque
            .bytes()
            .all(|b| b == 0x21 || (0x23..=0x7e).contains(&b) || b >= 0x80);
        if !valid {
            return Err(InvalidEntityTag(raw.to_string()));
        }

        Ok(Self {
            weak,
            opaque: opaque.to_string(),
        })
    }
}

/// Parsed value of `If-Match` / `If-None-Match`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityTagList {
    /// `*`
    Any,
    Tags(Vec<EntityTag>),
}

impl EntityTagList {
    /// Parse one or more comma separated header values.
    pub fn parse<'a, I>(values: I) -> Result<Self, InvalidEntityTag>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut tags = Vec::new();

        for value in values {
            for item in split_list(value) {
                if item == "*" {
                    return Ok(Self::Any);
                }
                tags.push(item.parse()?);
            }
        }

        if tags.is_empty() {
            return Err(InvalidEntityTag(String::new()));
        }

        Ok(Self::Tags(tags))
    }

    pub fn matches(&self, current: &EntityTag) -> bool {
        match self {
            Self::Any => true,
            Self::Tags(tags) => tags.iter().any(|tag| tag.weak_eq(current)),
        }
    }
}

/// Split a header list on commas outside quoted strings.
fn split_list(value: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;

    for (idx, ch) in value.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                items.push(&value[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    items.push(&value[start..]);

    items
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}
