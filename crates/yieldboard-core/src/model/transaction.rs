// ── Transaction log domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::Identified;

/// HTTP method recorded by the backend's request log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

/// One row of the API request log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionLog {
    pub id: i64,
    pub user_id: String,
    pub email: Option<String>,
    pub endpoint: String,
    pub http_method: HttpMethod,
    pub status_code: u16,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TransactionLog {
    pub fn is_error(&self) -> bool {
        self.status_code >= 400
    }
}

impl Identified for TransactionLog {
    type Id = i64;

    fn identity(&self) -> &i64 {
        &self.id
    }
}

/// Transaction log filters. Blank text never becomes a filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransactionFilter {
    pub user_id: Option<String>,
    pub email: Option<String>,
}

impl TransactionFilter {
    pub fn new(user_id: Option<&str>, email: Option<&str>) -> Self {
        Self {
            user_id: non_blank(user_id),
            email: non_blank(email),
        }
    }
}

fn non_blank(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_is_absent() {
        let f = TransactionFilter::new(Some("   "), Some(" ops@example.com "));
        assert_eq!(f.user_id, None);
        assert_eq!(f.email.as_deref(), Some("ops@example.com"));
        assert_eq!(TransactionFilter::new(None, Some("")), TransactionFilter::default());
    }
}
