//! Payment-handle (VPA) reputation checker

use super::tier_for_score;
use crate::models::{ExtractedEntity, ForensicFinding, RiskTier};

/// PSP providers with an established verification program
const TRUSTED_PROVIDERS: &[&str] = &["oksbi", "okicici", "okhdfcbank", "paytm", "axl"];

/// Terms scammers plant in the local part to look official or enticing
const SCAM_LOCAL_KEYWORDS: &[&str] =
    &["winner", "lottery", "prize", "offer", "kyc", "bank", "support"];

const BASE_SCORE: f32 = 0.1;
const UNCOMMON_PROVIDER_WEIGHT: f32 = 0.3;
const SCAM_KEYWORD_WEIGHT: f32 = 0.6;

/// Score a `<local>@<provider>` handle.
///
/// A handle that does not split into exactly two non-empty parts on `@`
/// is INVALID with score 0.0. Zero separators, an empty side, or two or
/// more separators are all equally malformed, never silently truncated.
pub fn check_handle(entity: &ExtractedEntity) -> ForensicFinding {
    let parts: Vec<&str> = entity.value.split('@').collect();

    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return ForensicFinding {
            entity: entity.clone(),
            score: 0.0,
            tier: RiskTier::Invalid,
            flag: "Invalid VPA Format".to_string(),
            details: vec![format!(
                "Expected exactly one '@' separating two non-empty parts, got {} part(s)",
                parts.len()
            )],
        };
    }

    let local = parts[0].to_lowercase();
    let provider = parts[1].to_lowercase();

    let mut score = BASE_SCORE;
    let mut flags: Vec<String> = Vec::new();

    if !TRUSTED_PROVIDERS.contains(&provider.as_str()) {
        score += UNCOMMON_PROVIDER_WEIGHT;
        flags.push("Uncommon PSP Handle".to_string());
    }

    if SCAM_LOCAL_KEYWORDS.iter().any(|k| local.contains(k)) {
        score += SCAM_KEYWORD_WEIGHT;
        flags.push("Malicious Keyword in Username".to_string());
    }

    let score = score.min(0.99);
    let flag = flags
        .first()
        .cloned()
        .unwrap_or_else(|| "Verified Merchant".to_string());

    ForensicFinding {
        entity: entity.clone(),
        score,
        tier: tier_for_score(score),
        flag,
        details: flags,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntityKind;

    fn handle_entity(value: &str) -> ExtractedEntity {
        ExtractedEntity {
            kind: EntityKind::PaymentHandle,
            value: value.to_string(),
            position: 0,
        }
    }

    #[test]
    fn test_scam_keyword_in_local_part() {
        let finding = check_handle(&handle_entity("lotterywinner@oksbi"));
        assert!((finding.score - 0.7).abs() < 1e-6);
        assert_eq!(finding.tier, RiskTier::High);
        assert_eq!(finding.flag, "Malicious Keyword in Username");
    }

    #[test]
    fn test_double_separator_is_invalid() {
        let finding = check_handle(&handle_entity("test@@invalid"));
        assert_eq!(finding.score, 0.0);
        assert_eq!(finding.tier, RiskTier::Invalid);
        assert_eq!(finding.flag, "Invalid VPA Format");
    }

    #[test]
    fn test_separator_count_contract() {
        // INVALID iff the split does not give exactly two non-empty parts
        let invalid = ["noseparator", "@provider", "local@", "a@b@c", "@@", ""];
        for value in invalid {
            let finding = check_handle(&handle_entity(value));
            assert_eq!(finding.tier, RiskTier::Invalid, "value: {:?}", value);
            assert_eq!(finding.score, 0.0);
        }

        let valid = check_handle(&handle_entity("shopkeeper@paytm"));
        assert_ne!(valid.tier, RiskTier::Invalid);
    }

    #[test]
    fn test_trusted_provider_clean_local() {
        let finding = check_handle(&handle_entity("shopkeeper@paytm"));
        assert!((finding.score - 0.1).abs() < 1e-6);
        assert_eq!(finding.tier, RiskTier::Low);
        assert_eq!(finding.flag, "Verified Merchant");
    }

    #[test]
    fn test_uncommon_provider() {
        let finding = check_handle(&handle_entity("shopkeeper@obscurepsp"));
        assert!((finding.score - 0.4).abs() < 1e-6);
        assert_eq!(finding.tier, RiskTier::Medium);
        assert_eq!(finding.flag, "Uncommon PSP Handle");
    }

    #[test]
    fn test_both_signals_capped() {
        let finding = check_handle(&handle_entity("kycsupport@obscurepsp"));
        // 0.1 + 0.3 + 0.6 capped at 0.99
        assert!((finding.score - 0.99).abs() < 1e-6);
        assert_eq!(finding.tier, RiskTier::High);
        assert_eq!(finding.details.len(), 2);
    }

    #[test]
    fn test_score_in_range() {
        for value in ["a@b", "winner@x", "test@@x", "kyc.bank.offer@weird"] {
            let finding = check_handle(&handle_entity(value));
            assert!(finding.score >= 0.0 && finding.score <= 1.0);
        }
    }
}
