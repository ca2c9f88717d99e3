use models::UserDraft;
use serde::{Deserialize, Serialize};

/// JSON body sent to the backend for both create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserWrite {
    pub full_name: String,
    pub email: String,
    pub is_active: bool,
}

impl From<&UserDraft> for UserWrite {
    fn from(draft: &UserDraft) -> Self {
        Self {
            full_name: draft.full_name.clone(),
            email: draft.email.clone(),
            is_active: draft.is_active,
        }
    }
}

/// Error envelope returned by the backend on non-2xx responses.
///
/// Accepts `{"detail": "..."}`, the validation form
/// `{"detail": [{"msg": "...", ...}]}`, and `{"message": "..."}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    detail: Option<Detail>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Detail {
    Text(String),
    Issues(Vec<Issue>),
    Other(serde_json::Value),
}

#[derive(Debug, Clone, Deserialize)]
struct Issue {
    msg: String,
}

impl ErrorBody {
    /// Parse an error body; anything that is not a JSON object yields `None`.
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        serde_json::from_slice(bytes).ok()
    }

    /// The human-readable message carried by the envelope, if any.
    pub fn message(&self) -> Option<String> {
        let from_detail = match &self.detail {
            Some(Detail::Text(text)) => Some(text.clone()),
            Some(Detail::Issues(issues)) => issues.first().map(|issue| issue.msg.clone()),
            Some(Detail::Other(_)) | None => None,
        };
        from_detail
            .or_else(|| self.message.clone())
            .filter(|text| !text.trim().is_empty())
    }
}
