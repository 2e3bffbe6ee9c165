//! Entity Extractor
//!
//! Scans raw message text for phone numbers, URLs, payment (VPA) handles,
//! and risk keywords. Extraction is a pure function of the input text:
//! additive, order-preserving (first occurrence first), and never fails.
//! Empty or malformed input yields an empty set.

use crate::models::{EntityKind, ExtractedEntity, IntentCategory};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// 10-digit mobile runs with an optional country-code prefix
    static ref PHONE_RE: Regex =
        Regex::new(r"(?:\+91|91)?[\s-]?[6789]\d{9}").expect("valid phone pattern");

    /// Scheme-prefixed URLs or bare domains with a recognized TLD
    static ref URL_RE: Regex = Regex::new(
        r"(?i)(?:https?://|www\.)\S+|(?:[a-z0-9-]+\.)+(?:com|net|org|in|xyz|top|live|app|tk|ml)\S*",
    )
    .expect("valid url pattern");

    /// `<local>@<provider>` shaped handles (VPA / UPI style)
    static ref HANDLE_RE: Regex =
        Regex::new(r"[\w.-]+@[\w.-]+").expect("valid handle pattern");
}

/// Risk keyword dictionary, grouped by the category the term signals.
/// Matched case-insensitively as substrings.
const KEYWORD_GROUPS: &[(IntentCategory, &[&str])] = &[
    (
        IntentCategory::Urgency,
        &["otp", "kyc", "expire", "block", "suspend", "urgent", "verify"],
    ),
    (
        IntentCategory::Greed,
        &["lottery", "prize", "winner", "free", "cash", "lucky"],
    ),
    (
        IntentCategory::Threat,
        &["police", "arrest", "fir", "warrant", "court", "fraud"],
    ),
];

/// Extract all recognizable entities from `text`, in order of first
/// occurrence. Duplicates are permitted; running twice on the same text
/// yields the same set in the same order.
pub fn extract_entities(text: &str) -> Vec<ExtractedEntity> {
    let mut entities: Vec<ExtractedEntity> = Vec::new();

    for m in PHONE_RE.find_iter(text) {
        entities.push(ExtractedEntity {
            kind: EntityKind::Phone,
            value: m.as_str().trim().to_string(),
            position: m.start(),
        });
    }

    for m in URL_RE.find_iter(text) {
        let trimmed = m.as_str().trim_end_matches(&['.', ',', '!', '?', ';', ':'][..]);
        if trimmed.is_empty() {
            continue;
        }
        entities.push(ExtractedEntity {
            kind: EntityKind::Url,
            value: trimmed.to_string(),
            position: m.start(),
        });
    }

    for m in HANDLE_RE.find_iter(text) {
        entities.push(ExtractedEntity {
            kind: EntityKind::PaymentHandle,
            value: m.as_str().to_string(),
            position: m.start(),
        });
    }

    let lowered = text.to_lowercase();
    for (_, keywords) in KEYWORD_GROUPS {
        for keyword in *keywords {
            if let Some(position) = lowered.find(keyword) {
                entities.push(ExtractedEntity {
                    kind: EntityKind::Keyword,
                    value: (*keyword).to_string(),
                    position,
                });
            }
        }
    }

    // Report in order of first occurrence; sort is stable so same-position
    // matches keep their kind order
    entities.sort_by_key(|e| e.position);
    entities
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds_of(entities: &[ExtractedEntity]) -> Vec<EntityKind> {
        entities.iter().map(|e| e.kind).collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(extract_entities("").is_empty());
        assert!(extract_entities("   ").is_empty());
    }

    #[test]
    fn test_no_entities() {
        let entities = extract_entities("see you at dinner tomorrow");
        assert!(entities.is_empty());
    }

    #[test]
    fn test_phone_extraction() {
        let entities = extract_entities("call me at +91 9876543210 right away");
        let phones: Vec<_> = entities
            .iter()
            .filter(|e| e.kind == EntityKind::Phone)
            .collect();
        assert_eq!(phones.len(), 1);
        assert!(phones[0].value.ends_with("9876543210"));
    }

    #[test]
    fn test_url_extraction() {
        let entities = extract_entities("click http://secure-login.xyz/verify now!");
        let urls: Vec<_> = entities
            .iter()
            .filter(|e| e.kind == EntityKind::Url)
            .collect();
        assert_eq!(urls.len(), 1);
        assert_eq!(urls[0].value, "http://secure-login.xyz/verify");
    }

    #[test]
    fn test_url_trailing_punctuation_trimmed() {
        let entities = extract_entities("visit www.lucky-draw.top, today");
        let urls: Vec<_> = entities
            .iter()
            .filter(|e| e.kind == EntityKind::Url)
            .collect();
        assert_eq!(urls.len(), 1);
        assert_eq!(urls[0].value, "www.lucky-draw.top");
    }

    #[test]
    fn test_payment_handle_extraction() {
        let entities = extract_entities("send the fee to lotterywinner@oksbi please");
        let handles: Vec<_> = entities
            .iter()
            .filter(|e| e.kind == EntityKind::PaymentHandle)
            .collect();
        assert_eq!(handles.len(), 1);
        assert_eq!(handles[0].value, "lotterywinner@oksbi");
    }

    #[test]
    fn test_keyword_extraction() {
        let entities = extract_entities("Share your OTP or the account gets blocked");
        let keywords: Vec<String> = entities
            .iter()
            .filter(|e| e.kind == EntityKind::Keyword)
            .map(|e| e.value.clone())
            .collect();
        assert!(keywords.contains(&"otp".to_string()));
        assert!(keywords.contains(&"block".to_string()));
    }

    #[test]
    fn test_order_of_first_occurrence() {
        let entities =
            extract_entities("pay kyc fee to support@payz then call 9876543210");
        let positions: Vec<usize> = entities.iter().map(|e| e.position).collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
        // Keyword appears before the handle, handle before the phone
        assert_eq!(kinds_of(&entities)[0], EntityKind::Keyword);
    }

    #[test]
    fn test_idempotent() {
        let text = "URGENT! wire to winner@lotto-pay.xyz or call 9123456780, see http://bit.ly/x";
        let first = extract_entities(text);
        let second = extract_entities(text);
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn test_duplicates_permitted() {
        let entities = extract_entities("9876543210 or 9876543210");
        let phones: Vec<_> = entities
            .iter()
            .filter(|e| e.kind == EntityKind::Phone)
            .collect();
        assert_eq!(phones.len(), 2);
    }
}
