//! Phone tracer
//!
//! Simulated HLR-style carrier/region classification from static
//! number-prefix tables. No live telecom query is ever made; an
//! unrecognized prefix falls back to UNKNOWN with a neutral score.

use super::tier_for_score;
use crate::models::{ExtractedEntity, ForensicFinding};

/// Country prefixes with documented scam-call volume
const HIGH_RISK_COUNTRY_PREFIXES: &[(&str, &str, &str, f32)] = &[
    ("92", "International VoIP", "Pakistan (High Risk Source)", 0.99),
];

/// Domestic prefixes reserved for registered telemarketing
const TELEMARKETING_PREFIXES: &[&str] = &["140"];

const DOMESTIC_COUNTRY_PREFIX: &str = "91";
const MOBILE_CARRIER: &str = "Jio / Airtel / Vi";
const NEUTRAL_SCORE: f32 = 0.1;

/// Hash buckets above this mark the number range as heavily reported
const HOTSPOT_BUCKET_THRESHOLD: u64 = 80;

/// Classify a phone-shaped entity from prefix tables alone. Never fails:
/// whatever the input, the result is a finding.
pub fn trace_number(entity: &ExtractedEntity) -> ForensicFinding {
    let digits: String = entity.value.chars().filter(|c| c.is_ascii_digit()).collect();

    let (score, carrier, region, reports) = classify_digits(&digits);

    let mut details = vec![
        format!("Carrier: {}", carrier),
        format!("Region: {}", region),
    ];
    if reports > 0 {
        details.push(format!("Reported incidents: {}", reports));
    }

    let flag = if score >= 0.9 {
        "High-Risk International Prefix"
    } else if reports > 0 {
        "Heavily Reported Number Range"
    } else if score >= 0.6 {
        if region == "International" {
            "Unverified International Number"
        } else {
            "Registered Telemarketing Prefix"
        }
    } else if carrier == "Unknown Network" {
        "Unrecognized Number Format"
    } else {
        "No Adverse Reports"
    };

    ForensicFinding {
        entity: entity.clone(),
        score,
        tier: tier_for_score(score),
        flag: flag.to_string(),
        details,
    }
}

fn classify_digits(digits: &str) -> (f32, &'static str, String, u64) {
    // International numbers carry a country prefix beyond ten digits
    if digits.len() > 10 && !digits.starts_with(DOMESTIC_COUNTRY_PREFIX) {
        for (prefix, carrier, region, score) in HIGH_RISK_COUNTRY_PREFIXES {
            if digits.starts_with(prefix) {
                return (*score, carrier, (*region).to_string(), 0);
            }
        }
        return (0.6, "Virtual Number", "International".to_string(), 0);
    }

    if digits.len() >= 10 {
        let last10 = &digits[digits.len() - 10..];

        if TELEMARKETING_PREFIXES.iter().any(|p| last10.starts_with(p)) {
            return (0.65, "Business Telemarketing", "India".to_string(), 0);
        }

        if last10.starts_with(&['6', '7', '8', '9'][..]) {
            // Deterministic bucket standing in for a reputation database
            let bucket = last10.parse::<u64>().map(|n| n % 100).unwrap_or(0);
            if bucket > HOTSPOT_BUCKET_THRESHOLD {
                return (
                    0.75,
                    MOBILE_CARRIER,
                    "Cybercrime Hotspot (Simulated)".to_string(),
                    bucket * 12,
                );
            }
            return (NEUTRAL_SCORE, MOBILE_CARRIER, "India".to_string(), 0);
        }
    }

    (NEUTRAL_SCORE, "Unknown Network", "Unknown".to_string(), 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EntityKind, RiskTier};

    fn phone_entity(value: &str) -> ExtractedEntity {
        ExtractedEntity {
            kind: EntityKind::Phone,
            value: value.to_string(),
            position: 0,
        }
    }

    #[test]
    fn test_clean_domestic_mobile() {
        // 9876543210 % 100 = 10, below the hotspot bucket
        let finding = trace_number(&phone_entity("+91 9876543210"));
        assert!((finding.score - 0.1).abs() < 1e-6);
        assert_eq!(finding.tier, RiskTier::Low);
        assert!(finding.details.iter().any(|d| d.contains("Jio / Airtel / Vi")));
    }

    #[test]
    fn test_hotspot_bucket() {
        // 9876543299 % 100 = 99, above the threshold
        let finding = trace_number(&phone_entity("9876543299"));
        assert!((finding.score - 0.75).abs() < 1e-6);
        assert_eq!(finding.tier, RiskTier::High);
        assert_eq!(finding.flag, "Heavily Reported Number Range");
        assert!(finding
            .details
            .iter()
            .any(|d| d.contains("Reported incidents")));
    }

    #[test]
    fn test_high_risk_country_prefix() {
        let finding = trace_number(&phone_entity("+92 3001234567"));
        assert!((finding.score - 0.99).abs() < 1e-6);
        assert_eq!(finding.tier, RiskTier::High);
        assert_eq!(finding.flag, "High-Risk International Prefix");
    }

    #[test]
    fn test_other_international() {
        let finding = trace_number(&phone_entity("+44 7911123456"));
        assert!((finding.score - 0.6).abs() < 1e-6);
        assert_eq!(finding.tier, RiskTier::Medium);
        assert_eq!(finding.flag, "Unverified International Number");
    }

    #[test]
    fn test_telemarketing_prefix() {
        let finding = trace_number(&phone_entity("1409876543"));
        assert!((finding.score - 0.65).abs() < 1e-6);
        assert_eq!(finding.tier, RiskTier::Medium);
        assert_eq!(finding.flag, "Registered Telemarketing Prefix");
    }

    #[test]
    fn test_unrecognized_falls_back_neutral() {
        for value in ["12345", "", "abc", "5551234"] {
            let finding = trace_number(&phone_entity(value));
            assert!((finding.score - 0.1).abs() < 1e-6, "value: {:?}", value);
            assert_eq!(finding.tier, RiskTier::Low);
            assert!(finding.details.iter().any(|d| d.contains("Unknown")));
        }
    }
}
