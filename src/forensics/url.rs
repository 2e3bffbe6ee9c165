//! URL analyzer
//!
//! Combines static reputation signals (scheme, deceptive wording,
//! abused TLDs, shorteners, raw-IP hosts) with an optional liveness
//! probe. The probe is bounded by a hard timeout; an unreachable URL is
//! scored from static signals alone and the probe outcome only ever
//! annotates the finding.

use super::tier_for_score;
use crate::config::Config;
use crate::models::{ExtractedEntity, ForensicFinding};
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Wording that impersonates banks or account flows
const DECEPTIVE_TERMS: &[&str] = &[
    "-login", "-bank", "-update", "-kyc", "verify", "secure-", "account", "bonus",
];

/// TLDs disproportionately registered for phishing campaigns
const HIGH_RISK_TLDS: &[&str] = &[
    ".xyz", ".top", ".club", ".info", ".ru", ".cn", ".live", ".app", ".tk", ".ml",
];

/// Services that hide the real destination
const URL_SHORTENERS: &[&str] = &["bit.ly", "tinyurl.com", "t.co", "cutt.ly", "is.gd"];

lazy_static! {
    static ref RAW_IP_RE: Regex =
        Regex::new(r"\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}").expect("valid ip pattern");
}

pub struct UrlAnalyzer {
    client: Option<Client>,
    probe_timeout: Duration,
}

impl UrlAnalyzer {
    pub fn new(config: &Config) -> Self {
        let client = if config.probe_enabled() {
            Client::builder()
                .timeout(config.probe_timeout)
                .redirect(reqwest::redirect::Policy::limited(3))
                .build()
                .ok()
        } else {
            None
        };

        Self {
            client,
            probe_timeout: config.probe_timeout,
        }
    }

    /// Score one URL entity. Never fails; probe errors degrade to
    /// static-only scoring.
    pub async fn analyze(&self, entity: &ExtractedEntity) -> ForensicFinding {
        let (score, mut details, flag) = static_signals(&entity.value);

        if let Some(client) = &self.client {
            details.push(self.probe(client, &entity.value).await);
        } else {
            details.push("Liveness: probe disabled".to_string());
        }

        ForensicFinding {
            entity: entity.clone(),
            score,
            tier: tier_for_score(score),
            flag,
            details,
        }
    }

    async fn probe(&self, client: &Client, url: &str) -> String {
        let target = if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("http://{}", url)
        };

        match tokio::time::timeout(self.probe_timeout, client.get(&target).send()).await {
            Ok(Ok(response)) => {
                debug!(url = %target, status = %response.status(), "Liveness probe completed");
                format!("Liveness: reachable (HTTP {})", response.status().as_u16())
            }
            Ok(Err(error)) => {
                debug!(url = %target, error = %error, "Liveness probe failed");
                "Liveness: unreachable (static signals only)".to_string()
            }
            Err(_) => {
                debug!(url = %target, "Liveness probe timed out");
                "Liveness: probe timed out (static signals only)".to_string()
            }
        }
    }
}

/// Static reputation signals for a URL: (score, details, flag)
pub fn static_signals(url: &str) -> (f32, Vec<String>, String) {
    let mut score = 0.0_f32;
    let mut details = Vec::new();
    let mut risk_flags: Vec<&'static str> = Vec::new();
    let lowered = url.to_lowercase();

    if lowered.starts_with("http://") {
        score += 0.3;
        details.push("Protocol: Insecure (HTTP)".to_string());
        risk_flags.push("Insecure Transport");
    } else if lowered.starts_with("https://") {
        details.push("Protocol: Secure (HTTPS)".to_string());
    } else {
        score += 0.2;
        details.push("Protocol: Unknown/Missing".to_string());
        risk_flags.push("Missing Scheme");
    }

    if DECEPTIVE_TERMS.iter().any(|t| lowered.contains(t)) {
        score += 0.4;
        details.push("Deceptive Terminology in URL".to_string());
        risk_flags.push("Brand Impersonation Wording");
    }

    if HIGH_RISK_TLDS.iter().any(|t| lowered.contains(t)) {
        score += 0.3;
        details.push("High-Risk TLD (Often used for Phishing)".to_string());
        risk_flags.push("Abused TLD");
    }

    if URL_SHORTENERS.iter().any(|s| lowered.contains(s)) {
        score += 0.4;
        details.push("URL Shortener Detected (Hidden Destination)".to_string());
        risk_flags.push("Shortened Link");
    }

    if RAW_IP_RE.is_match(&lowered) {
        score += 0.5;
        details.push("Host: Raw IP Address (Extremely High Risk)".to_string());
        risk_flags.push("Raw IP Host");
    }

    let score = score.min(0.99);
    let flag = match risk_flags.first() {
        Some(first) if risk_flags.len() > 1 => format!("{} (+{} more)", first, risk_flags.len() - 1),
        Some(first) => (*first).to_string(),
        None => "No Static Risk Signals".to_string(),
    };

    (score, details, flag)
}
