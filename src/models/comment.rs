use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A visitor comment attached to a content record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    pub id: Uuid,
    pub content_id: Uuid,
    pub nickname: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Comment form as posted by an anonymous visitor
#[derive(Debug, Clone, Deserialize)]
pub struct NewComment {
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub text: String,
}

impl NewComment {
    /// Trims both fields; both are required
    pub fn validate(self) -> Option<Self> {
        let nickname = self.nickname.trim().to_string();
        let text = self.text.trim().to_string();
        if nickname.is_empty() || text.is_empty() {
            return None;
        }
        Some(Self { nickname, text })
    }
}

impl Comment {
    pub fn new(content_id: Uuid, input: NewComment) -> Self {
        Self {
            id: Uuid::new_v4(),
            content_id,
            nickname: input.nickname,
            text: input.text,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_trims() {
        let input = NewComment {
            nickname: "  neo ".to_string(),
            text: " whoa ".to_string(),
        };
        let valid = input.validate().unwrap();
        assert_eq!(valid.nickname, "neo");
        assert_eq!(valid.text, "whoa");
    }

    #[test]
    fn test_validate_rejects_blank_fields() {
        let input = NewComment {
            nickname: "neo".to_string(),
            text: "   ".to_string(),
        };
        assert!(input.validate().is_none());

        let input = NewComment {
            nickname: String::new(),
            text: "hello".to_string(),
        };
        assert!(input.validate().is_none());
    }
}
