//! `If-Match` / `If-None-Match` extractors.

use crate::errors::AppError;
use crate::http::{EntityTag, EntityTagList};
use axum::http::{HeaderMap, HeaderName, header, request::Parts};
use axum::extract::FromRequestParts;
use std::convert::Infallible;

fn header_values(headers: &HeaderMap, name: HeaderName) -> Option<Vec<&str>> {
    let values: Vec<&str> = headers
        .get_all(name)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect();

    if values.is_empty() { None } else { Some(values) }
}

/// Required `If-Match` header listing explicit entity tags.
///
/// Rejects with 428 when the header is absent and 400 when it cannot be
/// parsed or is `*`. Extract it before the body so a missing precondition is
/// reported regardless of payload validity.
#[derive(Debug, Clone)]
pub struct IfMatch(pub Vec<EntityTag>);

impl IfMatch {
    pub fn matches(&self, current: &EntityTag) -> bool {
        self.0.iter().any(|tag| tag.weak_eq(current))
    }
}

impl<S> FromRequestParts<S> for IfMatch
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let values = header_values(&parts.headers, header::IF_MATCH).ok_or_else(|| {
            AppError::PreconditionRequired("If-Match header is required".to_string())
        })?;

        match EntityTagList::parse(values) {
            Ok(EntityTagList::Tags(tags)) => Ok(IfMatch(tags)),
            Ok(EntityTagList::Any) => Err(AppError::BadRequest(
                "If-Match must list explicit entity tags".to_string(),
            )),
            Err(e) => Err(AppError::BadRequest(e.to_string())),
        }
    }
}

/// Optional `If-None-Match` header. Unparseable values are ignored.
#[derive(Debug, Clone, Default)]
pub struct IfNoneMatch(pub Option<EntityTagList>);

impl IfNoneMatch {
    /// True when the header is present and matches `current`, i.e. the
    /// client's cached copy is still fresh.
    pub fn matches(&self, current: &EntityTag) -> bool {
        self.0.as_ref().is_some_and(|list| list.matches(current))
    }
}

impl<S> FromRequestParts<S> for IfNoneMatch
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let list = header_values(&parts.headers, header::IF_NONE_MATCH)
            .and_then(|values| EntityTagList::parse(values).ok());
        Ok(IfNoneMatch(list))
    }
}
