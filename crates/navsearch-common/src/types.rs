//! Message domain types shared across the workspace

use serde::{Deserialize, Serialize};

/// Placeholder body stored for a message that could not be fetched after all
/// retry attempts. A record carrying this text is in a terminal
/// "content unavailable" state, not an error.
pub const FAIL_TEXT: &str = "intentionally left blank";

/// Fixed source domain hosting the message index pages and bodies.
pub const NPC_DOMAIN: &str = "http://www.public.navy.mil";

/// Category of official bulletin message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MessageType {
    Navadmin,
    Alnav,
}

impl MessageType {
    /// Canonical uppercase name used in identifiers, URLs, and storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Navadmin => "NAVADMIN",
            MessageType::Alnav => "ALNAV",
        }
    }

    /// Three-letter abbreviation used by the source site.
    pub fn code(&self) -> &'static str {
        match self {
            MessageType::Navadmin => "NAV",
            MessageType::Alnav => "ALN",
        }
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for MessageType {
    type Err = crate::NavSearchError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "NAVADMIN" => Ok(MessageType::Navadmin),
            "ALNAV" => Ok(MessageType::Alnav),
            _ => Err(crate::NavSearchError::Parse(format!(
                "Unknown message type: {}",
                s
            ))),
        }
    }
}

/// A single bulletin message record.
///
/// Created by the index scraper with `text` unset; the fetch stage fills
/// `text` with the message body or [`FAIL_TEXT`] when the body is
/// unreachable. The record id is the unique key across the system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    /// Canonical id: `{TYPE}{YY}{NNN}` (e.g., "NAVADMIN16042")
    pub id: String,
    pub message_type: MessageType,
    /// Source site abbreviation (NAV, ALN)
    pub code: String,
    /// Two-digit year
    pub year: String,
    /// Three-digit message number
    pub num: String,
    /// File extension of the source document (e.g., "txt")
    pub ext: String,
    /// Absolute URL of the plain-text body
    pub url: String,
    /// Body text; `None` before fetching
    pub text: Option<String>,
}

impl MessageRecord {
    /// True when the record holds the fetch-failure sentinel.
    pub fn is_request_fail(&self) -> bool {
        self.text.as_deref() == Some(FAIL_TEXT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_type_roundtrip() {
        assert_eq!("navadmin".parse::<MessageType>().unwrap(), MessageType::Navadmin);
        assert_eq!("ALNAV".parse::<MessageType>().unwrap(), MessageType::Alnav);
        assert!("BUPERS".parse::<MessageType>().is_err());
        assert_eq!(MessageType::Navadmin.to_string(), "NAVADMIN");
        assert_eq!(MessageType::Alnav.code(), "ALN");
    }

    #[test]
    fn test_request_fail_detection() {
        let mut record = MessageRecord {
            id: "NAVADMIN16042".to_string(),
            message_type: MessageType::Navadmin,
            code: "NAV".to_string(),
            year: "16".to_string(),
            num: "042".to_string(),
            ext: "txt".to_string(),
            url: format!("{}/NAV16042.txt", NPC_DOMAIN),
            text: None,
        };
        assert!(!record.is_request_fail());

        record.text = Some("R 121530Z JAN 16".to_string());
        assert!(!record.is_request_fail());

        record.text = Some(FAIL_TEXT.to_string());
        assert!(record.is_request_fail());
    }
}
