//! Rescue Mode session log.
//!
//! A rescue session records which teachings were viewed and whether the
//! prayer and breathing exercise were completed while the emergency screen
//! was open. Finished sessions are kept most-recent-first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::QuoteId;

/// Maximum number of finished sessions kept.
pub const RESCUE_SESSION_LIMIT: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RescueSession {
    pub id: String,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    /// Length of the session in seconds, set when it ends.
    #[serde(default)]
    pub duration_secs: Option<i64>,
    #[serde(default)]
    pub quotes_viewed: Vec<QuoteId>,
    #[serde(default)]
    pub prayer_completed: bool,
    #[serde(default)]
    pub breathing_exercise_completed: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

impl RescueSession {
    pub fn new(start_time: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            start_time,
            end_time: None,
            duration_secs: None,
            quotes_viewed: Vec::new(),
            prayer_completed: false,
            breathing_exercise_completed: false,
            notes: None,
        }
    }
}

/// The active session, if any, plus finished ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RescueLog {
    #[serde(default)]
    pub active: Option<RescueSession>,
    #[serde(default)]
    pub sessions: Vec<RescueSession>,
}

impl RescueLog {
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Open a new session, replacing any unfinished one.
    pub fn start(&mut self, now: DateTime<Utc>) -> &RescueSession {
        if let Some(abandoned) = &self.active {
            debug!(id = %abandoned.id, "replacing unfinished rescue session");
        }
        self.active.insert(RescueSession::new(now))
    }

    /// Record a viewed teaching once. Returns false when no session is active
    /// or the teaching was already recorded.
    pub fn add_quote_viewed(&mut self, id: &str) -> bool {
        match &mut self.active {
            Some(session) if !session.quotes_viewed.iter().any(|q| q == id) => {
                session.quotes_viewed.push(id.to_string());
                true
            }
            _ => false,
        }
    }

    pub fn mark_prayer_completed(&mut self) -> bool {
        match &mut self.active {
            Some(session) => {
                session.prayer_completed = true;
                true
            }
            None => false,
        }
    }

    pub fn mark_breathing_completed(&mut self) -> bool {
        match &mut self.active {
            Some(session) => {
                session.breathing_exercise_completed = true;
                true
            }
            None => false,
        }
    }

    /// Close the active session and file it. Returns the finished session.
    pub fn end(&mut self, now: DateTime<Utc>, notes: Option<String>) -> Option<&RescueSession> {
        let mut session = self.active.take()?;
        session.duration_secs = Some((now - session.start_time).num_seconds().max(0));
        session.end_time = Some(now);
        session.notes = notes;
        self.sessions.insert(0, session);
        self.sessions.truncate(RESCUE_SESSION_LIMIT);
        self.sessions.first()
    }
}
