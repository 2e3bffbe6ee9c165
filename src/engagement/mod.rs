//! Engagement agent
//!
//! The per-session state machine that decides what the decoy says next.
//! Stages move toward whatever extracts the most intelligence without
//! tipping the scammer off:
//!
//! GREETING → PROBING → STALLING ⇄ EXTRACTING → CLOSED
//!
//! Intelligence bookkeeping (the union of entities across turns) happens
//! on every call regardless of which reply template is chosen, and
//! `advance` never fails: an unrecognized stage/category combination
//! falls back to a generic stalling line.

use crate::config::Config;
use crate::models::{
    ClassificationResult, EngagementStage, ExtractedEntity, IntentCategory, Message, RiskTier,
    RiskVerdict, Session, Turn,
};
use chrono::Utc;
use tracing::debug;

/// Confidence below this keeps the scam category "ambiguous" for the
/// PROBING → STALLING move
const AMBIGUITY_CONFIDENCE: f32 = 0.75;

//
// ================= Reply Banks =================
//

const GREETING_REPLIES: &[&str] = &[
    "Hello? Who is this?",
    "Sorry, do I know you? My grandson usually saves numbers for me.",
    "Hi, I think you may have the wrong number. What is this about?",
];

const PROBING_URGENCY: &[&str] = &[
    "Oh no, which account is blocked? I have two banks and I always mix them up.",
    "Please don't cut my connection. Which office are you calling from?",
    "I am not good with these things. Can you tell me exactly what expired?",
];

const PROBING_GREED: &[&str] = &[
    "Really? I never win anything! How do I claim it?",
    "God bless you! Is it real money? What is the next step?",
    "Wow, my neighbour won once too. Where do I collect the prize?",
];

const PROBING_THREAT: &[&str] = &[
    "Please sir, I am a retired teacher. What did I do wrong?",
    "Arrest? Oh god. Which police station are you calling from?",
    "I am shaking. Can you explain the complaint slowly?",
];

const PROBING_GENERIC: &[&str] = &[
    "Sorry, who is this again? The line was not clear.",
    "I did not follow that. Can you explain from the beginning?",
];

const STALLING_URGENCY: &[&str] = &[
    "Hold on, I am looking for my glasses. Don't hang up.",
    "The app is asking for an update, it is taking very long.",
    "My battery is at 2 percent, let me find the charger first.",
];

const STALLING_GREED: &[&str] = &[
    "Wait, I am writing this down with a pencil. Go slowly please.",
    "My internet is very slow today, the page is still loading.",
    "Let me call my son first, he handles the bank things. Stay on the line.",
];

const STALLING_THREAT: &[&str] = &[
    "Please give me a minute, I need to sit down for this.",
    "My hands are trembling, let me get some water first.",
    "I am searching for my old documents, they are in the cupboard somewhere.",
];

const EXTRACTING_URGENCY: &[&str] = &[
    "Okay okay. Should I pay on this number, or do you have a UPI id?",
    "The link is not opening on my phone. Can you type the full address again?",
    "Which number should I call back if the line drops?",
];

const EXTRACTING_GREED: &[&str] = &[
    "I am ready to pay the processing fee. Where exactly do I send it?",
    "Do you have an official account number or UPI? My son will transfer.",
    "Can you send the claim website once more? I want to show my daughter.",
];

const EXTRACTING_THREAT: &[&str] = &[
    "I will pay the fine, just tell me the account or UPI id again.",
    "Should I come to the station? Give me the address and a contact number.",
    "Whom do I make the payment to? Please send the details once more.",
];

const CLOSED_REPLIES: &[&str] = &[
    "I have to go now. Goodbye.",
    "My grandson says I should not talk to strangers. Bye.",
];

const GENERIC_STALL: &[&str] = &[
    "I see. Please give me a moment.",
    "Sorry, I am a little slow with these things. Can you say that again?",
];

/// How many trailing agent replies are excluded from re-selection
const RECENT_REPLY_WINDOW: usize = 2;

//
// ================= Policy =================
//

#[derive(Debug, Clone)]
pub struct EngagementPolicy {
    pub max_silent_turns: u32,
    pub safe_streak_to_close: u32,
    pub max_turns: u32,
}

impl From<&Config> for EngagementPolicy {
    fn from(config: &Config) -> Self {
        Self {
            max_silent_turns: config.max_silent_turns,
            safe_streak_to_close: config.safe_streak_to_close,
            max_turns: config.max_turns,
        }
    }
}

//
// ================= Agent =================
//

pub struct EngagementAgent {
    policy: EngagementPolicy,
}

impl EngagementAgent {
    pub fn new(policy: EngagementPolicy) -> Self {
        Self { policy }
    }

    /// Consume one analyzed turn: merge intelligence, advance the stage,
    /// pick the next reply, and record the turn on the session.
    /// Infallible by contract.
    pub fn advance(
        &self,
        session: &mut Session,
        message: Message,
        classification: ClassificationResult,
        entities: &[ExtractedEntity],
        verdict: RiskVerdict,
    ) -> String {
        let kinds_before = session.known_kinds();
        let mut added = 0usize;

        for entity in entities {
            let already_known = session
                .intelligence
                .iter()
                .any(|known| known.kind == entity.kind && known.value == entity.value);
            if !already_known {
                session.intelligence.push(entity.clone());
                added += 1;
            }
        }

        let new_kind = session
            .known_kinds()
            .iter()
            .any(|kind| !kinds_before.contains(kind));

        if added == 0 {
            session.turns_without_new_intel += 1;
        } else {
            session.turns_without_new_intel = 0;
        }

        if classification.category == IntentCategory::Safe {
            session.safe_streak += 1;
        } else {
            session.safe_streak = 0;
        }

        let next_stage = self.next_stage(session, &classification, &verdict, new_kind);

        debug!(
            session_key = %session.session_key,
            from = %session.stage,
            to = %next_stage,
            category = %classification.category,
            new_intel = added,
            "Engagement stage transition"
        );

        let reply = select_reply(session, next_stage, classification.category);

        session.stage = next_stage;
        session.last_seen = Utc::now();
        session.turns.push(Turn {
            message,
            classification,
            verdict,
            reply: reply.clone(),
        });

        reply
    }

    fn next_stage(
        &self,
        session: &Session,
        classification: &ClassificationResult,
        verdict: &RiskVerdict,
        new_kind: bool,
    ) -> EngagementStage {
        // Terminal stage stays terminal
        if session.stage == EngagementStage::Closed {
            return EngagementStage::Closed;
        }

        // Closing conditions apply from any stage
        if session.turn_count() as u32 + 1 >= self.policy.max_turns
            || session.turns_without_new_intel >= self.policy.max_silent_turns
            || session.safe_streak >= self.policy.safe_streak_to_close
        {
            return EngagementStage::Closed;
        }

        let ambiguous =
            classification.confidence < AMBIGUITY_CONFIDENCE && verdict.tier != RiskTier::High;

        match session.stage {
            EngagementStage::Greeting => {
                if classification.category.is_scam() {
                    EngagementStage::Probing
                } else {
                    EngagementStage::Greeting
                }
            }
            EngagementStage::Probing => {
                if session.intelligence.is_empty() {
                    EngagementStage::Probing
                } else if ambiguous {
                    EngagementStage::Stalling
                } else {
                    EngagementStage::Extracting
                }
            }
            EngagementStage::Stalling => {
                if new_kind {
                    EngagementStage::Extracting
                } else {
                    EngagementStage::Stalling
                }
            }
            EngagementStage::Extracting => {
                if new_kind {
                    EngagementStage::Stalling
                } else {
                    EngagementStage::Extracting
                }
            }
            EngagementStage::Closed => EngagementStage::Closed,
        }
    }
}

//
// ================= Template Selection =================
//

fn bank_for(stage: EngagementStage, category: IntentCategory) -> &'static [&'static str] {
    match (stage, category) {
        (EngagementStage::Greeting, _) => GREETING_REPLIES,
        (EngagementStage::Probing, IntentCategory::Urgency) => PROBING_URGENCY,
        (EngagementStage::Probing, IntentCategory::Greed) => PROBING_GREED,
        (EngagementStage::Probing, IntentCategory::Threat) => PROBING_THREAT,
        (EngagementStage::Probing, IntentCategory::Safe) => PROBING_GENERIC,
        (EngagementStage::Stalling, IntentCategory::Urgency) => STALLING_URGENCY,
        (EngagementStage::Stalling, IntentCategory::Greed) => STALLING_GREED,
        (EngagementStage::Stalling, IntentCategory::Threat) => STALLING_THREAT,
        (EngagementStage::Extracting, IntentCategory::Urgency) => EXTRACTING_URGENCY,
        (EngagementStage::Extracting, IntentCategory::Greed) => EXTRACTING_GREED,
        (EngagementStage::Extracting, IntentCategory::Threat) => EXTRACTING_THREAT,
        (EngagementStage::Closed, _) => CLOSED_REPLIES,
        // Anything unmapped stalls generically rather than failing
        _ => GENERIC_STALL,
    }
}

/// Rotate through the bank by turn counter, skipping replies used in the
/// last few turns so a session never repeats itself back-to-back.
fn select_reply(session: &Session, stage: EngagementStage, category: IntentCategory) -> String {
    let bank = bank_for(stage, category);

    let recent: Vec<&str> = session
        .turns
        .iter()
        .rev()
        .take(RECENT_REPLY_WINDOW)
        .map(|turn| turn.reply.as_str())
        .collect();

    let candidates: Vec<&str> = bank
        .iter()
        .copied()
        .filter(|reply| !recent.contains(reply))
        .collect();

    let pool = if candidates.is_empty() {
        bank
    } else {
        &candidates[..]
    };

    pool[session.turn_count() % pool.len()].to_string()
}
