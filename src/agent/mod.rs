//! Main interceptor - implements the analysis pipeline
//!
//! MESSAGE → CLASSIFY + EXTRACT → FORENSICS (fan-out) → AGGREGATE → ENGAGE

use crate::aggregator::aggregate;
use crate::classifier::{IntentClassifier, KeywordModelClassifier};
use crate::config::Config;
use crate::engagement::EngagementAgent;
use crate::error::InterceptorError;
use crate::extractor::extract_entities;
use crate::forensics::ForensicEngine;
use crate::models::{AnalysisResult, EntityKind, ForensicFinding, Message};
use crate::state::{InMemorySessionStore, SessionStore};
use crate::Result;
use chrono::Utc;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Coordinates the full per-message pipeline and the per-session agent
pub struct Interceptor {
    classifier: Box<dyn IntentClassifier>,
    forensics: Arc<ForensicEngine>,
    engagement: EngagementAgent,
    sessions: Box<dyn SessionStore>,
}

impl Interceptor {
    pub fn new(
        classifier: Box<dyn IntentClassifier>,
        forensics: ForensicEngine,
        engagement: EngagementAgent,
        sessions: Box<dyn SessionStore>,
    ) -> Self {
        Self {
            classifier,
            forensics: Arc::new(forensics),
            engagement,
            sessions,
        }
    }

    /// Assemble the default pipeline. Fails only on structural faults
    /// (classifier tables unavailable), never per request.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            Box::new(KeywordModelClassifier::new()?),
            ForensicEngine::new(config),
            EngagementAgent::new(config.into()),
            Box::new(InMemorySessionStore::new(config.session_idle_timeout)),
        ))
    }

    /// Analyze one inbound message for a session and produce the full
    /// verdict plus the agent's next reply. A well-formed message always
    /// yields a complete result, even under partial internal degradation.
    pub async fn analyze(&self, session_key: &str, text: &str) -> Result<AnalysisResult> {
        if session_key.trim().is_empty() {
            return Err(InterceptorError::InvalidRequest(
                "session identifier must not be empty".to_string(),
            ));
        }

        let message = Message::new(session_key, text);

        info!(
            session_key = %session_key,
            message_id = ?message.message_id,
            chars = text.len(),
            "Interceptor: analyzing message"
        );

        // Classification and extraction are independent reads of the
        // same input
        let classification = self.classifier.classify(text);
        let entities = extract_entities(text);

        debug!(
            category = %classification.category,
            confidence = classification.confidence,
            entity_count = entities.len(),
            "Classification and extraction complete"
        );

        // One forensic task per actionable entity; keywords carry no
        // analyzer of their own
        let mut tasks = JoinSet::new();
        for (index, entity) in entities.iter().enumerate() {
            if entity.kind == EntityKind::Keyword {
                continue;
            }
            let forensics = Arc::clone(&self.forensics);
            let entity = entity.clone();
            tasks.spawn(async move { (index, forensics.analyze(&entity).await) });
        }

        let mut indexed: Vec<(usize, ForensicFinding)> = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, Some(finding))) => indexed.push((index, finding)),
                Ok((_, None)) => {}
                Err(error) => {
                    // A dropped task costs one finding, never the verdict
                    warn!(error = %error, "Forensic task failed; excluding its finding");
                }
            }
        }
        indexed.sort_by_key(|(index, _)| *index);
        let findings: Vec<ForensicFinding> = indexed.into_iter().map(|(_, f)| f).collect();

        let verdict = aggregate(&classification, findings.clone());

        debug!(
            score = verdict.score,
            tier = %verdict.tier,
            finding_count = verdict.findings.len(),
            "Verdict aggregated"
        );

        // The session mutex serializes concurrent turns for the same key
        let slot = self.sessions.get_or_create(session_key).await?;
        let mut session = slot.lock().await;
        let reply = self.engagement.advance(
            &mut session,
            message.clone(),
            classification.clone(),
            &entities,
            verdict.clone(),
        );
        let stage = session.stage;
        let intel_size = session.intelligence.len();
        drop(session);

        info!(
            session_key = %session_key,
            stage = %stage,
            intel_size = intel_size,
            "Turn complete"
        );

        Ok(AnalysisResult {
            session_key: session_key.to_string(),
            message_id: message.message_id,
            classification,
            entities,
            findings,
            verdict,
            reply,
            stage,
            analyzed_at: Utc::now(),
        })
    }

    /// Run a single forensic check outside any session (the on-demand
    /// check endpoint).
    pub async fn check_entity(&self, entity: &crate::models::ExtractedEntity) -> Option<ForensicFinding> {
        self.forensics.analyze(entity).await
    }
}
