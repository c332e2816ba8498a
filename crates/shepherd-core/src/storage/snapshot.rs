//! Serialized form of the player state.
//!
//! Everything the tracker owns durably is written as one JSON document under
//! [`PLAYER_STORAGE_KEY`]. The congratulations flag and the per-session
//! de-duplication set are not part of it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::KvStore;
use crate::catalog::QuoteId;
use crate::error::Result;
use crate::progress::{MilestoneState, ModalFlags, StreakData, DEFAULT_DAILY_GOAL};
use crate::rescue::RescueSession;

/// Namespaced key for the player snapshot.
pub const PLAYER_STORAGE_KEY: &str = "player-storage";

/// Current snapshot format.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    pub version: u32,
    #[serde(default)]
    pub favorites: Vec<QuoteId>,
    #[serde(default)]
    pub history: Vec<QuoteId>,
    pub streak_data: StreakData,
    pub daily_goal: u32,
    #[serde(default)]
    pub milestones: MilestoneState,
    /// Milestone prompts raised but not yet dismissed.
    #[serde(default)]
    pub pending_prompts: ModalFlags,
    #[serde(default)]
    pub rescue_sessions: Vec<RescueSession>,
    /// Unfinished rescue session, kept so it can be resumed after a restart.
    #[serde(default)]
    pub active_rescue_session: Option<RescueSession>,
    #[serde(default)]
    pub tiktok_mode: bool,
}

impl PersistedState {
    /// Zeroed state for a first run.
    pub fn initial(today: NaiveDate, daily_goal: u32) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            favorites: Vec::new(),
            history: Vec::new(),
            streak_data: StreakData::new(today),
            daily_goal: if daily_goal == 0 { DEFAULT_DAILY_GOAL } else { daily_goal },
            milestones: MilestoneState::default(),
            pending_prompts: ModalFlags::default(),
            rescue_sessions: Vec::new(),
            active_rescue_session: None,
            tiktok_mode: false,
        }
    }

    /// Parse a snapshot, rejecting versions this build does not understand
    /// and a zero daily goal.
    pub fn decode(raw: &str) -> Result<Self> {
        let state: PersistedState = serde_json::from_str(raw)?;
        if state.version == 0 || state.version > SNAPSHOT_VERSION {
            return Err(crate::error::CoreError::Custom(format!(
                "unsupported snapshot version {}",
                state.version
            )));
        }
        if state.daily_goal == 0 {
            return Err(crate::error::ValidationError::InvalidDailyGoal(0).into());
        }
        Ok(state)
    }

    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Load the snapshot from `store`, falling back to `initial` when it is
    /// absent, unreadable or malformed.
    pub fn load_or_initial<S: KvStore>(store: &S, today: NaiveDate, daily_goal: u32) -> Self {
        match store.load(PLAYER_STORAGE_KEY) {
            Ok(Some(raw)) => match Self::decode(&raw) {
                Ok(state) => state,
                Err(e) => {
                    warn!(error = %e, "discarding malformed player snapshot");
                    Self::initial(today, daily_goal)
                }
            },
            Ok(None) => Self::initial(today, daily_goal),
            Err(e) => {
                warn!(error = %e, "player snapshot unavailable, starting fresh");
                Self::initial(today, daily_goal)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn encode_decode_preserves_every_field() {
        let mut state = PersistedState::initial(today(), 15);
        state.favorites = vec!["q1".into()];
        state.history = vec!["q2".into(), "q1".into()];
        state.streak_data.current_streak = 3;
        state.streak_data.longest_streak = 5;
        state.streak_data.last_completed_date = Some(today());
        state.milestones.has_shown_review_modal = true;
        state.tiktok_mode = true;

        let decoded = PersistedState::decode(&state.encode().unwrap()).unwrap();
        assert_eq!(decoded, state);
    }

    #[test]
    fn missing_snapshot_yields_initial_state() {
        let store = MemoryStore::new();
        let state = PersistedState::load_or_initial(&store, today(), 10);
        assert_eq!(state, PersistedState::initial(today(), 10));
    }

    #[test]
    fn malformed_snapshot_fails_closed() {
        let store = MemoryStore::new();
        store.insert_raw(PLAYER_STORAGE_KEY, "{\"version\": 1, \"streak_data\": 42");
        let state = PersistedState::load_or_initial(&store, today(), 10);
        assert_eq!(state.streak_data.current_streak, 0);
        assert_eq!(state.daily_goal, 10);
    }

    #[test]
    fn future_version_is_rejected() {
        let mut state = PersistedState::initial(today(), 10);
        state.version = SNAPSHOT_VERSION + 1;
        let raw = serde_json::to_string(&state).unwrap();
        assert!(PersistedState::decode(&raw).is_err());
    }

    #[test]
    fn zero_goal_is_rejected() {
        let mut state = PersistedState::initial(today(), 10);
        state.daily_goal = 0;
        let raw = serde_json::to_string(&state).unwrap();
        assert!(PersistedState::decode(&raw).is_err());
    }
}
