//! Intent Classifier
//!
//! Assigns each inbound message to one of the fixed scam categories:
//! - Urgency: pressure tactics (KYC expiry, account blocks, click-now links)
//! - Greed: lottery / prize / investment bait
//! - Threat: police, arrest, legal intimidation
//! - Safe: ordinary conversation
//!
//! The classifier is a capability interface so the pipeline stays agnostic
//! to how classification is produced; the shipped implementation is a
//! rule-encoded keyword model with softmax-normalized confidence.

use crate::error::InterceptorError;
use crate::models::{ClassificationResult, IntentCategory};
use crate::Result;

/// Capability interface for intent classification.
///
/// Implementations must be deterministic for identical input, always
/// return exactly one category from the fixed set, and report confidence
/// in [0,1] for the returned category only.
pub trait IntentClassifier: Send + Sync {
    fn classify(&self, text: &str) -> ClassificationResult;
}

/// Single-word signals, matched against whole tokens
const URGENCY_WORDS: &[(&str, f32)] = &[
    ("urgent", 0.8), ("urgently", 0.8), ("blocked", 0.8), ("block", 0.6),
    ("immediately", 0.7), ("suspend", 0.7), ("suspended", 0.7),
    ("expire", 0.6), ("expires", 0.6), ("expired", 0.6),
    ("kyc", 0.9), ("verify", 0.5), ("otp", 0.6),
    ("electricity", 0.6), ("bill", 0.5), ("tonight", 0.4),
    ("click", 0.5), ("link", 0.6), ("download", 0.7), ("update", 0.4),
    ("apk", 1.0),
];

const THREAT_WORDS: &[(&str, f32)] = &[
    ("police", 0.9), ("jail", 0.9), ("arrest", 0.9), ("arrested", 0.9),
    ("fir", 1.0), ("warrant", 1.0), ("raid", 0.8), ("tax", 0.6),
    ("customs", 0.7), ("leak", 0.8), ("kidnapped", 1.0), ("court", 0.7),
    ("cbi", 0.9), ("cyber", 0.5),
];

const GREED_WORDS: &[(&str, f32)] = &[
    ("lottery", 1.0), ("winner", 0.9), ("won", 0.8), ("win", 0.7),
    ("prize", 0.9), ("crores", 0.8), ("iphone", 0.7), ("free", 0.6),
    ("spin", 0.5), ("earn", 0.7), ("daily", 0.4), ("cash", 0.6),
    ("investment", 0.5), ("crypto", 0.6), ("double", 0.6), ("lucky", 0.7),
];

const SAFE_WORDS: &[(&str, f32)] = &[
    ("hello", 0.5), ("hi", 0.5), ("hey", 0.4), ("how", 0.3),
    ("meeting", 0.7), ("lunch", 0.8), ("dinner", 0.7), ("birthday", 0.9),
    ("tomorrow", 0.4), ("thanks", 0.6), ("okay", 0.4),
];

/// Multi-word / punctuated signals, matched as substrings
const URGENCY_PHRASES: &[(&str, f32)] = &[
    ("http", 0.8), ("bit.ly", 0.9), ("tinyurl", 0.9), (".apk", 1.0),
    (".xyz", 0.8), (".top", 0.8), ("24 hours", 0.7),
];

const THREAT_PHRASES: &[(&str, f32)] = &[
    ("legal action", 0.9), ("arrest warrant", 1.0),
];

const GREED_PHRASES: &[(&str, f32)] = &[
    ("congratulations", 0.7), ("claim your", 0.8),
];

const SAFE_PHRASES: &[(&str, f32)] = &[
    ("see you", 0.6), ("good morning", 0.5),
];

/// Rule-encoded keyword classifier.
///
/// Stands in for a trained model artifact; scoring is weighted keyword
/// presence per category with softmax normalization and a handful of
/// deterministic overrides for unambiguous signals.
pub struct KeywordModelClassifier {
    tables: [(IntentCategory, &'static [(&'static str, f32)], &'static [(&'static str, f32)]); 4],
}

impl KeywordModelClassifier {
    /// Build the classifier, validating the weight tables. An empty table
    /// is a structural fault: the pipeline must not serve requests with a
    /// category silently missing.
    pub fn new() -> Result<Self> {
        let tables = [
            (IntentCategory::Urgency, URGENCY_WORDS, URGENCY_PHRASES),
            (IntentCategory::Greed, GREED_WORDS, GREED_PHRASES),
            (IntentCategory::Threat, THREAT_WORDS, THREAT_PHRASES),
            (IntentCategory::Safe, SAFE_WORDS, SAFE_PHRASES),
        ];

        for (category, words, phrases) in &tables {
            if words.is_empty() && phrases.is_empty() {
                return Err(InterceptorError::ClassifierUnavailable(format!(
                    "No weights loaded for category {}",
                    category
                )));
            }
        }

        Ok(Self { tables })
    }

    fn score(
        text: &str,
        tokens: &[&str],
        words: &[(&str, f32)],
        phrases: &[(&str, f32)],
    ) -> f32 {
        let word_score: f32 = words
            .iter()
            .filter(|(word, _)| tokens.contains(word))
            .map(|(_, weight)| weight)
            .sum();

        let phrase_score: f32 = phrases
            .iter()
            .filter(|(phrase, _)| text.contains(phrase))
            .map(|(_, weight)| weight)
            .sum();

        word_score + phrase_score
    }
}

impl IntentClassifier for KeywordModelClassifier {
    fn classify(&self, text: &str) -> ClassificationResult {
        if text.trim().is_empty() {
            return ClassificationResult {
                category: IntentCategory::Safe,
                confidence: 0.0,
            };
        }

        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .collect();

        // Overrides for unambiguous signals
        if tokens.contains(&"fir") || tokens.contains(&"arrest") || tokens.contains(&"arrested") {
            return ClassificationResult {
                category: IntentCategory::Threat,
                confidence: 0.99,
            };
        }
        if tokens.contains(&"lottery")
            && (tokens.contains(&"win") || tokens.contains(&"won") || tokens.contains(&"winner"))
        {
            return ClassificationResult {
                category: IntentCategory::Greed,
                confidence: 0.98,
            };
        }
        if lowered.contains(".apk") {
            return ClassificationResult {
                category: IntentCategory::Urgency,
                confidence: 0.97,
            };
        }

        let scores: Vec<(IntentCategory, f32)> = self
            .tables
            .iter()
            .map(|(category, words, phrases)| {
                (*category, Self::score(&lowered, &tokens, words, phrases))
            })
            .collect();

        let (mut best_category, best_score) = scores
            .iter()
            .copied()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .unwrap_or((IntentCategory::Safe, 0.0));

        // No scam signal at all: ordinary conversation
        if best_score <= 0.0 {
            best_category = IntentCategory::Safe;
        }

        // Softmax over category scores for the confidence
        let sum_exp: f32 = scores.iter().map(|(_, s)| s.exp()).sum();
        let best_exp = scores
            .iter()
            .find(|(c, _)| *c == best_category)
            .map(|(_, s)| s.exp())
            .unwrap_or(1.0);
        let mut confidence = best_exp / sum_exp;

        // Very short messages rarely carry enough signal to act on
        if tokens.len() < 3 && best_category != IntentCategory::Safe {
            best_category = IntentCategory::Safe;
            confidence = confidence.min(0.45);
        }

        ClassificationResult {
            category: best_category,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> KeywordModelClassifier {
        KeywordModelClassifier::new().expect("weight tables present")
    }

    #[test]
    fn test_urgency_message() {
        let result = classifier().classify(
            "URGENT: your KYC will expire today and your account will be blocked immediately",
        );
        assert_eq!(result.category, IntentCategory::Urgency);
        assert!(result.confidence > 0.5);
    }

    #[test]
    fn test_threat_override() {
        let result = classifier().classify("There is an FIR against you, pay the fine");
        assert_eq!(result.category, IntentCategory::Threat);
        assert!((result.confidence - 0.99).abs() < f32::EPSILON);
    }

    #[test]
    fn test_greed_override() {
        let result = classifier().classify("You won the lottery! Claim 25 lakh today");
        assert_eq!(result.category, IntentCategory::Greed);
        assert!((result.confidence - 0.98).abs() < f32::EPSILON);
    }

    #[test]
    fn test_benign_message_is_safe() {
        let cases = vec![
            "hello, are we still on for lunch tomorrow?",
            "thanks, see you at the meeting",
            "happy birthday! dinner tonight?",
        ];
        for c in cases {
            let result = classifier().classify(c);
            assert_eq!(result.category, IntentCategory::Safe, "input: {}", c);
        }
    }

    #[test]
    fn test_short_message_calibration() {
        // A lone scam keyword is not enough signal on its own
        let result = classifier().classify("lottery");
        assert_eq!(result.category, IntentCategory::Safe);
        assert!(result.confidence <= 0.45);
    }

    #[test]
    fn test_empty_input() {
        let result = classifier().classify("");
        assert_eq!(result.category, IntentCategory::Safe);
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_deterministic() {
        let text = "your electricity bill is overdue, pay tonight or service is suspended";
        let a = classifier().classify(text);
        let b = classifier().classify(text);
        assert_eq!(a.category, b.category);
        assert_eq!(a.confidence, b.confidence);
    }

    #[test]
    fn test_confidence_in_range() {
        let cases = vec![
            "",
            "hi",
            "verify your kyc immediately or account blocked",
            "police arrest warrant court jail",
            "free cash prize lucky winner crores",
        ];
        for c in cases {
            let result = classifier().classify(c);
            assert!(result.confidence >= 0.0 && result.confidence <= 1.0, "input: {}", c);
        }
    }
}
