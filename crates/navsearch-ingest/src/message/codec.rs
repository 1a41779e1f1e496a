//! Message identifier codec
//!
//! Parses, validates, and formats structured message identifiers of the form
//! `{TYPE}{YY}{NNN}` (e.g., "NAVADMIN16042") and source paths of the form
//! `.../{CODE}{YY}{NNN}.txt` (e.g., ".../NAV16042.txt").

use navsearch_common::types::{MessageRecord, MessageType, NPC_DOMAIN};
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Two-digit year field width ("YY")
const YEAR_FORMAT_LENGTH: usize = 2;

/// Three-digit number field width ("###")
const NUM_FORMAT_LENGTH: usize = 3;

/// Fields of a parsed message identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMessageId {
    /// Message type, normalized to lowercase (e.g., "navadmin")
    pub message_type: String,
    /// Two-digit year
    pub year: String,
    /// Three-digit message number
    pub num: String,
}

/// Registry mapping the source site's 3-letter codes to message types.
///
/// New codes can be registered without touching the parsing logic; unknown
/// codes yield no type and callers treat the record as a non-fatal skip.
#[derive(Debug, Clone)]
pub struct CodeRegistry {
    codes: HashMap<String, MessageType>,
}

impl Default for CodeRegistry {
    fn default() -> Self {
        let mut registry = Self {
            codes: HashMap::new(),
        };
        registry.register("NAV", MessageType::Navadmin);
        registry.register("ALN", MessageType::Alnav);
        registry
    }
}

impl CodeRegistry {
    /// Register a source code for a message type
    pub fn register(&mut self, code: &str, message_type: MessageType) {
        self.codes.insert(code.to_uppercase(), message_type);
    }

    /// Look up the message type for a source code
    pub fn lookup(&self, code: &str) -> Option<MessageType> {
        self.codes.get(&code.to_uppercase()).copied()
    }
}

/// Build the canonical message id from its parts.
///
/// This is the single key-construction function used everywhere else.
pub fn create_message_id(message_type: &str, year: &str, num: &str) -> String {
    format!("{}{}{}", message_type, year, num)
}

/// Check whether a string is a well-formed message id.
///
/// Accepts 5 to 8 letters followed by exactly 5 digits, case-insensitive.
/// The match is stateless: each call evaluates the whole input fresh.
pub fn is_valid_message_id(id: &str) -> bool {
    static MESSAGE_ID_REGEX: OnceLock<Regex> = OnceLock::new();
    let pattern = MESSAGE_ID_REGEX.get_or_init(|| {
        // Anchored and case-insensitive; compile cannot fail for a literal
        #[allow(clippy::expect_used)]
        Regex::new(r"(?i)^[a-z]{5,8}\d{5}$").expect("valid message id pattern")
    });
    pattern.is_match(id)
}

/// Split a message id into its fields.
///
/// The leading run of non-digit characters is the type (lowercased), the
/// next two characters are the year, and the final three characters are the
/// number. Inputs should satisfy [`is_valid_message_id`]; other shapes
/// produce best-effort fields.
pub fn parse_message_id(id: &str) -> ParsedMessageId {
    // Byte offset of the first digit, so slicing stays on char boundaries
    let type_len = id.find(|c: char| c.is_ascii_digit()).unwrap_or(id.len());
    let message_type = id.get(..type_len).unwrap_or_default().to_lowercase();
    let year = id
        .get(type_len..type_len + YEAR_FORMAT_LENGTH)
        .unwrap_or_default()
        .to_string();
    let num = id
        .get(id.len().saturating_sub(NUM_FORMAT_LENGTH)..)
        .unwrap_or_default()
        .to_string();

    ParsedMessageId {
        message_type,
        year,
        num,
    }
}

/// Parse a source document path into a candidate record.
///
/// Uses the fixed source domain and the default code registry. Returns
/// `None` for unknown source codes or malformed filenames.
pub fn parse_message_uri(path: &str) -> Option<MessageRecord> {
    static DEFAULT_REGISTRY: OnceLock<CodeRegistry> = OnceLock::new();
    let registry = DEFAULT_REGISTRY.get_or_init(CodeRegistry::default);
    parse_message_uri_with(path, NPC_DOMAIN, registry)
}

/// Parse a source document path against an explicit domain and registry.
///
/// The filename segment is split into a leading non-numeric code, a
/// two-digit year, and the remaining message number; the absolute URL is
/// built by prefixing the given domain.
pub fn parse_message_uri_with(
    path: &str,
    domain: &str,
    registry: &CodeRegistry,
) -> Option<MessageRecord> {
    let filename = path.rsplit('/').next().unwrap_or(path);
    let stem = filename.split('.').next().unwrap_or(filename);
    let ext = filename.rsplit('.').next().unwrap_or_default().to_string();

    let code: String = stem.chars().take_while(|c| !c.is_ascii_digit()).collect();
    let message_type = registry.lookup(&code)?;

    let rest = stem.get(code.len()..)?;
    let year = rest.get(..YEAR_FORMAT_LENGTH)?.to_string();
    let num = rest.get(YEAR_FORMAT_LENGTH..)?.to_string();
    if num.is_empty() {
        return None;
    }

    let id = create_message_id(message_type.as_str(), &year, &num);
    let url = format!("{}{}", domain, path);

    Some(MessageRecord {
        id,
        message_type,
        code,
        year,
        num,
        ext,
        url,
        text: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_URI: &str =
        "/bupers-npc/reference/messages/Documents/NAVADMINS/NAV2016/NAV16042.txt";

    #[test]
    fn test_validates_message_ids() {
        let valid = ["NAVADMIN16042", "NAVADMIN15132", "ALNAV15088", "ALNAV16033"];
        let invalid = [
            "NAVADMIN201642", // four-character year
            "NAVADMIN1642",   // two-character num
            "NAVADMIN150T9",  // invalid num
            "NAV15123",       // type too short
        ];
        for id in valid {
            assert!(is_valid_message_id(id), "expected valid: {}", id);
        }
        for id in invalid {
            assert!(!is_valid_message_id(id), "expected invalid: {}", id);
        }
    }

    #[test]
    fn test_validation_is_stateless_across_calls() {
        // Repeated calls against the shared pattern must not carry match
        // state; every call sees the same verdict.
        for _ in 0..5 {
            assert!(is_valid_message_id("NAVADMIN16042"));
        }
    }

    #[test]
    fn test_parses_message_ids() {
        let parsed = parse_message_id("NAVADMIN16042");
        assert_eq!(
            parsed,
            ParsedMessageId {
                message_type: "navadmin".to_string(),
                year: "16".to_string(),
                num: "042".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_handles_multibyte_type_characters() {
        // Never a valid id, but best-effort parsing must not panic on a
        // multi-byte leading character
        let parsed = parse_message_id("ÑAVADMIN16042");
        assert_eq!(parsed.message_type, "ñavadmin");
        assert_eq!(parsed.year, "16");
        assert_eq!(parsed.num, "042");

        let parsed = parse_message_id("é");
        assert_eq!(parsed.message_type, "é");
        assert_eq!(parsed.year, "");
    }

    #[test]
    fn test_parses_message_uris() {
        let record = parse_message_uri(TEST_URI).unwrap();
        assert_eq!(record.id, "NAVADMIN16042");
        assert_eq!(record.message_type, MessageType::Navadmin);
        assert_eq!(record.code, "NAV");
        assert_eq!(record.year, "16");
        assert_eq!(record.num, "042");
        assert_eq!(record.ext, "txt");
        assert_eq!(record.url, format!("{}{}", NPC_DOMAIN, TEST_URI));
        assert!(record.text.is_none());
    }

    #[test]
    fn test_unknown_code_is_skipped() {
        assert!(parse_message_uri("/messages/BUP16042.txt").is_none());
    }

    #[test]
    fn test_malformed_filename_is_skipped() {
        assert!(parse_message_uri("/messages/NAV1.txt").is_none());
        assert!(parse_message_uri("/messages/NAV16.txt").is_none());
    }

    #[test]
    fn test_registry_is_extensible() {
        let mut registry = CodeRegistry::default();
        assert_eq!(registry.lookup("NAV"), Some(MessageType::Navadmin));
        assert_eq!(registry.lookup("aln"), Some(MessageType::Alnav));
        assert_eq!(registry.lookup("BUP"), None);

        registry.register("GEN", MessageType::Alnav);
        assert_eq!(registry.lookup("GEN"), Some(MessageType::Alnav));
    }

    #[test]
    fn test_create_message_id_concatenates() {
        assert_eq!(create_message_id("NAVADMIN", "16", "042"), "NAVADMIN16042");
    }
}
