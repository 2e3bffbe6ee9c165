//! Core data models for the scam interceptor

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use std::fmt;

//
// ================= Enums =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum IntentCategory {
    Urgency,
    Greed,
    Threat,
    Safe,
}

impl IntentCategory {
    pub fn is_scam(&self) -> bool {
        !matches!(self, IntentCategory::Safe)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    Phone,
    Url,
    PaymentHandle,
    Keyword,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskTier {
    Low,
    Medium,
    High,
    Invalid,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EngagementStage {
    Greeting,
    Probing,
    Stalling,
    Extracting,
    Closed,
}

//
// ================= Message =================
//

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub message_id: Uuid,
    pub session_key: String,
    pub text: String,
    pub received_at: DateTime<Utc>,
}

impl Message {
    pub fn new(session_key: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            message_id: Uuid::new_v4(),
            session_key: session_key.into(),
            text: text.into(),
            received_at: Utc::now(),
        }
    }
}

//
// ================= Classification =================
//

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub category: IntentCategory,
    pub confidence: f32,
}

//
// ================= Entities =================
//

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExtractedEntity {
    pub kind: EntityKind,
    pub value: String,
    /// Byte offset of the match in the source text
    pub position: usize,
}

//
// ================= Forensics =================
//

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForensicFinding {
    pub entity: ExtractedEntity,
    pub score: f32,
    pub tier: RiskTier,
    /// One-line explanation of the tier
    pub flag: String,
    /// Individual signals that contributed to the score
    pub details: Vec<String>,
}

//
// ================= Verdict =================
//

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskVerdict {
    pub score: f32,
    pub tier: RiskTier,
    pub findings: Vec<ForensicFinding>,
}

//
// ================= Session =================
//

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub message: Message,
    pub classification: ClassificationResult,
    pub verdict: RiskVerdict,
    pub reply: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub session_id: Uuid,
    pub session_key: String,
    pub created_at: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub stage: EngagementStage,
    pub turns: Vec<Turn>,
    /// Union of all entities extracted across turns, in first-seen order
    pub intelligence: Vec<ExtractedEntity>,
    /// Consecutive turns that added nothing to the intelligence set
    pub turns_without_new_intel: u32,
    /// Consecutive turns classified SAFE
    pub safe_streak: u32,
}

impl Session {
    pub fn new(session_id: Uuid, session_key: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            session_id,
            session_key: session_key.into(),
            created_at: now,
            last_seen: now,
            stage: EngagementStage::Greeting,
            turns: Vec::new(),
            intelligence: Vec::new(),
            turns_without_new_intel: 0,
            safe_streak: 0,
        }
    }

    pub fn turn_count(&self) -> usize {
        self.turns.len()
    }

    /// Entity kinds already present in the intelligence set
    pub fn known_kinds(&self) -> Vec<EntityKind> {
        let mut kinds = Vec::new();
        for entity in &self.intelligence {
            if !kinds.contains(&entity.kind) {
                kinds.push(entity.kind);
            }
        }
        kinds
    }
}

//
// ================= Final Result =================
//

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub session_key: String,
    pub message_id: Uuid,
    pub classification: ClassificationResult,
    pub entities: Vec<ExtractedEntity>,
    pub findings: Vec<ForensicFinding>,
    pub verdict: RiskVerdict,
    pub reply: String,
    pub stage: EngagementStage,
    pub analyzed_at: DateTime<Utc>,
}

impl fmt::Display for IntentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IntentCategory::Urgency => "URGENCY",
            IntentCategory::Greed => "GREED",
            IntentCategory::Threat => "THREAT",
            IntentCategory::Safe => "SAFE",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntityKind::Phone => "PHONE",
            EntityKind::Url => "URL",
            EntityKind::PaymentHandle => "PAYMENT_HANDLE",
            EntityKind::Keyword => "KEYWORD",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskTier::Low => "LOW",
            RiskTier::Medium => "MEDIUM",
            RiskTier::High => "HIGH",
            RiskTier::Invalid => "INVALID",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for EngagementStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EngagementStage::Greeting => "greeting",
            EngagementStage::Probing => "probing",
            EngagementStage::Stalling => "stalling",
            EngagementStage::Extracting => "extracting",
            EngagementStage::Closed => "closed",
        };
        write!(f, "{}", s)
    }
}
