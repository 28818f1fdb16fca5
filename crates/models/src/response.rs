//! Transport envelopes shared by every endpoint.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Response envelope: a payload, an error, a message, or a combination.
///
/// ```json
/// { "data": { ... }, "message": "valid" }
/// { "error": "horaFin: must differ from horaInicio (18:00)" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// How an envelope failed to carry a payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    #[error("{0}")]
    Failed(String),
    #[error("response carries neither data nor error")]
    Empty,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            message: None,
        }
    }

    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            data: Some(data),
            error: None,
            message: Some(message.into()),
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(error.into()),
            message: None,
        }
    }

    /// A bare acknowledgement with no payload (e.g. after a delete).
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            data: None,
            error: None,
            message: Some(message.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Resolve the envelope. An error wins over any data sent alongside it;
    /// a message-only envelope resolves to `Ok(None)`.
    pub fn into_result(self) -> Result<Option<T>, EnvelopeError> {
        match (self.error, self.data, self.message) {
            (Some(e), _, _) => Err(EnvelopeError::Failed(e)),
            (None, Some(data), _) => Ok(Some(data)),
            (None, None, Some(_)) => Ok(None),
            (None, None, None) => Err(EnvelopeError::Empty),
        }
    }
}

/// One page of a listing plus the counters the client needs to page further.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub total_count: u64,
    /// 1-based.
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl<T> PaginatedResponse<T> {
    /// Wrap an already-selected page. `total_pages` is derived from
    /// `total_count` and `limit` (0 when `limit` is 0).
    pub fn new(data: Vec<T>, total_count: u64, page: u32, limit: u32) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            u32::try_from(total_count.div_ceil(u64::from(limit))).unwrap_or(u32::MAX)
        };
        Self {
            data,
            total_count,
            page,
            limit,
            total_pages,
        }
    }

    pub fn has_next_page(&self) -> bool {
        self.page < self.total_pages
    }
}
