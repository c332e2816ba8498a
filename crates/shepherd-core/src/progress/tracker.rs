//! Progress tracker: the owner of the player state.
//!
//! Wraps the pure reducer with its collaborators: a [`Clock`] for "today", a
//! [`Catalog`] for the catalog size and a [`KvStore`] that receives the
//! serialized state after every mutation. Storage failures are logged and
//! swallowed; the in-memory copy stays authoritative for the session.

use chrono::NaiveDate;
use tracing::{debug, warn};

use super::reducer::{reduce, ProgressEvent, ReduceContext, DEFAULT_DAILY_GOAL};
use super::types::{
    MilestoneState, MilestoneThresholds, Modal, ModalFlags, ProgressState, StreakData,
};
use crate::catalog::Catalog;
use crate::clock::Clock;
use crate::error::{Result, ValidationError};
use crate::events::Event;
use crate::library::{Favorites, History};
use crate::player::PlaybackEvent;
use crate::rescue::{RescueLog, RescueSession};
use crate::storage::{Config, KvStore, PersistedState, PLAYER_STORAGE_KEY, SNAPSHOT_VERSION};

/// Settings that seed a tracker but are not part of the persisted state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerOptions {
    /// Goal used when nothing has been persisted yet.
    pub default_daily_goal: u32,
    pub thresholds: MilestoneThresholds,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            default_daily_goal: DEFAULT_DAILY_GOAL,
            thresholds: MilestoneThresholds::default(),
        }
    }
}

impl From<&Config> for TrackerOptions {
    fn from(config: &Config) -> Self {
        Self {
            default_daily_goal: config.progress.daily_goal,
            thresholds: config.milestone_thresholds(),
        }
    }
}

/// Owns streak, milestone, library and rescue state for one install.
pub struct ProgressTracker<S, C, K> {
    store: S,
    clock: C,
    catalog: K,
    options: TrackerOptions,
    state: ProgressState,
    daily_goal: u32,
    favorites: Favorites,
    history: History,
    rescue: RescueLog,
    tiktok_mode: bool,
}

impl<S: KvStore, C: Clock, K: Catalog> ProgressTracker<S, C, K> {
    /// Restore from `store` (falling back to a fresh state on any problem)
    /// and apply the daily rollover.
    pub fn open(store: S, clock: C, catalog: K, options: TrackerOptions) -> Self {
        let today = clock.today();
        let snapshot = PersistedState::load_or_initial(&store, today, options.default_daily_goal);
        let mut state = ProgressState::restore(snapshot.streak_data, snapshot.milestones);
        state.modals = snapshot.pending_prompts.pending_milestones();
        let mut tracker = Self {
            store,
            clock,
            catalog,
            options,
            state,
            daily_goal: snapshot.daily_goal,
            favorites: Favorites::new(snapshot.favorites),
            history: History::new(snapshot.history),
            rescue: RescueLog {
                active: snapshot.active_rescue_session,
                sessions: snapshot.rescue_sessions,
            },
            tiktok_mode: snapshot.tiktok_mode,
        };
        tracker.reset_daily_progress_if_needed();
        tracker
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn streak(&self) -> &StreakData {
        &self.state.streak
    }

    pub fn milestones(&self) -> &MilestoneState {
        &self.state.milestones
    }

    pub fn modals(&self) -> &ModalFlags {
        &self.state.modals
    }

    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    pub fn daily_goal(&self) -> u32 {
        self.daily_goal
    }

    /// 0.0 .. 1.0 progress toward today's goal.
    pub fn today_fraction(&self) -> f64 {
        let today = &self.state.streak.today_progress;
        if today.date != self.clock.today() || self.daily_goal == 0 {
            return 0.0;
        }
        (today.quotes_listened as f64 / self.daily_goal as f64).min(1.0)
    }

    pub fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.contains(id)
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn rescue(&self) -> &RescueLog {
        &self.rescue
    }

    pub fn tiktok_mode(&self) -> bool {
        self.tiktok_mode
    }

    pub fn catalog(&self) -> &K {
        &self.catalog
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// The durable part of the state, as it would be written to the store.
    pub fn snapshot(&self) -> PersistedState {
        PersistedState {
            version: SNAPSHOT_VERSION,
            favorites: self.favorites.ids().to_vec(),
            history: self.history.ids().to_vec(),
            streak_data: self.state.streak.clone(),
            daily_goal: self.daily_goal,
            milestones: self.state.milestones,
            pending_prompts: self.state.modals.pending_milestones(),
            rescue_sessions: self.rescue.sessions.clone(),
            active_rescue_session: self.rescue.active.clone(),
            tiktok_mode: self.tiktok_mode,
        }
    }

    // ── Progress ─────────────────────────────────────────────────────

    /// Start a fresh day if the calendar date moved. Call at startup and
    /// whenever the app returns to the foreground.
    pub fn reset_daily_progress_if_needed(&mut self) -> Vec<Event> {
        self.apply(ProgressEvent::ResetIfNeeded)
    }

    /// App came back to the foreground.
    pub fn on_foreground(&mut self) -> Vec<Event> {
        self.reset_daily_progress_if_needed()
    }

    /// Count a finished play of `quote_id`.
    pub fn increment_listened_count(&mut self, quote_id: &str) -> Vec<Event> {
        self.apply(ProgressEvent::Listened(quote_id.to_string()))
    }

    /// Forget which items were counted in the current playback session.
    pub fn restart_session(&mut self) -> Vec<Event> {
        self.apply(ProgressEvent::SessionRestarted)
    }

    pub fn dismiss(&mut self, modal: Modal) -> Vec<Event> {
        self.apply(ProgressEvent::Dismiss(modal))
    }

    pub fn dismiss_congratulations_modal(&mut self) -> Vec<Event> {
        self.dismiss(Modal::Congratulations)
    }

    pub fn dismiss_share_modal(&mut self) -> Vec<Event> {
        self.dismiss(Modal::Share)
    }

    pub fn dismiss_review_modal(&mut self) -> Vec<Event> {
        self.dismiss(Modal::Review)
    }

    pub fn dismiss_donate_modal(&mut self) -> Vec<Event> {
        self.dismiss(Modal::Donate)
    }

    /// Feed a playback event: restarts clear the session set and are recorded
    /// in history, finished plays are counted.
    pub fn on_playback(&mut self, event: &PlaybackEvent) -> Vec<Event> {
        match event {
            PlaybackEvent::Started { quote_id, restarted } => {
                let events = if *restarted {
                    self.restart_session()
                } else {
                    Vec::new()
                };
                self.add_to_history(quote_id);
                events
            }
            PlaybackEvent::Finished { quote_id } => self.increment_listened_count(quote_id),
            PlaybackEvent::Paused { .. } | PlaybackEvent::Resumed { .. } => Vec::new(),
        }
    }

    /// Change the daily goal. Takes effect from the next counted play.
    ///
    /// # Errors
    /// Returns a validation error for a goal of zero.
    pub fn set_daily_goal(&mut self, goal: u32) -> Result<()> {
        if goal == 0 {
            return Err(ValidationError::InvalidDailyGoal(goal).into());
        }
        self.daily_goal = goal;
        self.persist();
        Ok(())
    }

    // ── Library ──────────────────────────────────────────────────────

    /// Returns whether `id` is a favorite afterwards.
    pub fn toggle_favorite(&mut self, id: &str) -> bool {
        let now_favorite = self.favorites.toggle(id);
        self.persist();
        now_favorite
    }

    pub fn add_to_history(&mut self, id: &str) {
        self.history.record(id);
        self.persist();
    }

    pub fn set_tiktok_mode(&mut self, enabled: bool) {
        self.tiktok_mode = enabled;
        self.persist();
    }

    // ── Rescue Mode ──────────────────────────────────────────────────

    pub fn start_rescue_mode(&mut self) -> RescueSession {
        let session = self.rescue.start(self.clock.now()).clone();
        self.persist();
        session
    }

    pub fn add_rescue_quote_viewed(&mut self, id: &str) -> bool {
        let changed = self.rescue.add_quote_viewed(id);
        if changed {
            self.persist();
        }
        changed
    }

    pub fn mark_prayer_completed(&mut self) -> bool {
        let changed = self.rescue.mark_prayer_completed();
        if changed {
            self.persist();
        }
        changed
    }

    pub fn mark_breathing_completed(&mut self) -> bool {
        let changed = self.rescue.mark_breathing_completed();
        if changed {
            self.persist();
        }
        changed
    }

    pub fn end_rescue_mode(&mut self, notes: Option<String>) -> Option<RescueSession> {
        let finished = self.rescue.end(self.clock.now(), notes).cloned();
        if finished.is_some() {
            self.persist();
        }
        finished
    }

    // ── Wipe ─────────────────────────────────────────────────────────

    /// Erase everything, milestone flags included, as on a fresh install.
    pub fn wipe(&mut self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "failed to clear store during wipe");
        }
        let fresh = PersistedState::initial(self.clock.today(), self.options.default_daily_goal);
        self.state = ProgressState::restore(fresh.streak_data, fresh.milestones);
        self.daily_goal = fresh.daily_goal;
        self.favorites = Favorites::default();
        self.history = History::default();
        self.rescue = RescueLog::default();
        self.tiktok_mode = false;
        self.persist();
    }

    // ── Internals ────────────────────────────────────────────────────

    fn context(&self, today: NaiveDate) -> ReduceContext {
        ReduceContext {
            today,
            daily_goal: self.daily_goal,
            catalog_size: self.catalog.len(),
            thresholds: self.options.thresholds,
        }
    }

    fn apply(&mut self, event: ProgressEvent) -> Vec<Event> {
        let ctx = self.context(self.clock.today());
        let events = reduce(&mut self.state, event, &ctx);
        if events.iter().any(Event::is_durable) {
            self.persist();
        }
        events
    }

    /// Write-through. Failures never reach the caller.
    fn persist(&self) {
        let encoded = match self.snapshot().encode() {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!(error = %e, "failed to encode player snapshot");
                return;
            }
        };
        match self.store.save(PLAYER_STORAGE_KEY, &encoded) {
            Ok(()) => debug!(bytes = encoded.len(), "player snapshot saved"),
            Err(e) => warn!(error = %e, "failed to persist player snapshot"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Quote, StaticCatalog};
    use crate::clock::FixedClock;
    use crate::storage::MemoryStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn catalog(n: usize) -> StaticCatalog {
        StaticCatalog::new((0..n).map(|i| Quote::new(format!("q{i}"), "text")).collect())
    }

    fn open(
        store: &MemoryStore,
        clock: FixedClock,
        catalog_size: usize,
    ) -> ProgressTracker<&MemoryStore, FixedClock, StaticCatalog> {
        ProgressTracker::open(store, clock, catalog(catalog_size), TrackerOptions::default())
    }

    fn saved(store: &MemoryStore) -> PersistedState {
        let raw = store.load(PLAYER_STORAGE_KEY).unwrap().unwrap();
        PersistedState::decode(&raw).unwrap()
    }

    #[test]
    fn open_rolls_over_a_stale_day() {
        let store = MemoryStore::new();
        let clock = FixedClock::at_date(date(2024, 1, 1));
        {
            let mut tracker = open(&store, clock.clone(), 0);
            tracker.increment_listened_count("q1");
        }
        clock.advance_days(1);
        let tracker = open(&store, clock.clone(), 0);
        assert_eq!(tracker.streak().today_progress.date, date(2024, 1, 2));
        assert_eq!(tracker.streak().today_progress.quotes_listened, 0);
        assert_eq!(tracker.streak().total_quotes_listened, 1);
    }

    #[test]
    fn every_mutation_writes_through() {
        let store = MemoryStore::new();
        let clock = FixedClock::at_date(date(2024, 1, 1));
        let mut tracker = open(&store, clock, 0);
        let before = store.write_count();
        tracker.increment_listened_count("q1");
        tracker.toggle_favorite("q1");
        tracker.set_daily_goal(5).unwrap();
        assert_eq!(store.write_count(), before + 3);

        assert_eq!(saved(&store), tracker.snapshot());
    }

    #[test]
    fn duplicate_play_does_not_write() {
        let store = MemoryStore::new();
        let clock = FixedClock::at_date(date(2024, 1, 1));
        let mut tracker = open(&store, clock, 0);
        tracker.increment_listened_count("q1");
        let before = store.write_count();
        tracker.increment_listened_count("q1");
        assert_eq!(store.write_count(), before);
    }

    #[test]
    fn persistence_failure_keeps_memory_state() {
        let store = MemoryStore::new();
        let clock = FixedClock::at_date(date(2024, 1, 1));
        let mut tracker = open(&store, clock, 0);
        store.set_fail_writes(true);
        tracker.increment_listened_count("q1");
        tracker.increment_listened_count("q2");
        assert_eq!(tracker.streak().total_quotes_listened, 2);
    }

    #[test]
    fn zero_goal_is_rejected() {
        let store = MemoryStore::new();
        let clock = FixedClock::at_date(date(2024, 1, 1));
        let mut tracker = open(&store, clock, 0);
        assert!(tracker.set_daily_goal(0).is_err());
        assert_eq!(tracker.daily_goal(), DEFAULT_DAILY_GOAL);
    }

    #[test]
    fn catalog_size_drives_donate_prompt() {
        let store = MemoryStore::new();
        let clock = FixedClock::at_date(date(2024, 1, 1));
        let mut tracker = open(&store, clock, 2);
        tracker.increment_listened_count("q0");
        assert!(!tracker.modals().show_donate_modal);
        tracker.increment_listened_count("q1");
        assert!(tracker.modals().show_donate_modal);
        tracker.dismiss_donate_modal();
        assert!(tracker.milestones().has_shown_donate_modal);
    }

    #[test]
    fn today_fraction_is_clamped() {
        let store = MemoryStore::new();
        let clock = FixedClock::at_date(date(2024, 1, 1));
        let mut tracker = open(&store, clock, 0);
        tracker.set_daily_goal(2).unwrap();
        tracker.increment_listened_count("a");
        assert!((tracker.today_fraction() - 0.5).abs() < f64::EPSILON);
        tracker.increment_listened_count("b");
        tracker.increment_listened_count("c");
        assert!((tracker.today_fraction() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn wipe_resets_milestones() {
        let store = MemoryStore::new();
        let clock = FixedClock::at_date(date(2024, 1, 1));
        let mut tracker = open(&store, clock, 0);
        for i in 0..5 {
            tracker.increment_listened_count(&format!("q{i}"));
        }
        tracker.dismiss_share_modal();
        tracker.toggle_favorite("q1");
        tracker.wipe();

        assert!(!tracker.milestones().has_shown_share_modal);
        assert_eq!(tracker.streak().total_quotes_listened, 0);
        assert!(tracker.favorites().is_empty());
        assert_eq!(tracker.state().session_count(), 0);
    }

    #[test]
    fn playback_events_feed_history_and_counts() {
        let store = MemoryStore::new();
        let clock = FixedClock::at_date(date(2024, 1, 1));
        let mut tracker = open(&store, clock, 0);

        tracker.on_playback(&PlaybackEvent::Started { quote_id: "q1".into(), restarted: true });
        tracker.on_playback(&PlaybackEvent::Finished { quote_id: "q1".into() });
        tracker.on_playback(&PlaybackEvent::Finished { quote_id: "q1".into() });
        assert_eq!(tracker.streak().total_quotes_listened, 1);
        assert_eq!(tracker.history().ids(), &["q1".to_string()]);

        tracker.on_playback(&PlaybackEvent::Started { quote_id: "q1".into(), restarted: true });
        tracker.on_playback(&PlaybackEvent::Finished { quote_id: "q1".into() });
        assert_eq!(tracker.streak().total_quotes_listened, 2);
    }

    #[test]
    fn unfinished_rescue_session_survives_reopen() {
        let store = MemoryStore::new();
        let clock = FixedClock::at_date(date(2024, 1, 1));
        {
            let mut tracker = open(&store, clock.clone(), 0);
            tracker.start_rescue_mode();
            tracker.add_rescue_quote_viewed("q3");
        }
        let mut tracker = open(&store, clock.clone(), 0);
        assert!(tracker.rescue().is_active());
        clock.advance(chrono::Duration::seconds(30));
        let finished = tracker.end_rescue_mode(None).unwrap();
        assert_eq!(finished.quotes_viewed, vec!["q3".to_string()]);
        assert_eq!(finished.duration_secs, Some(30));
    }

    #[test]
    fn pending_prompt_can_be_dismissed_after_reopen() {
        let store = MemoryStore::new();
        let clock = FixedClock::at_date(date(2024, 1, 1));
        {
            let mut tracker = open(&store, clock.clone(), 0);
            for i in 0..5 {
                tracker.increment_listened_count(&format!("q{i}"));
            }
            tracker.dismiss_congratulations_modal();
        }

        let mut tracker = open(&store, clock.clone(), 0);
        assert!(tracker.modals().show_share_modal);
        tracker.dismiss_share_modal();

        let tracker = open(&store, clock, 0);
        assert!(tracker.milestones().has_shown_share_modal);
        assert!(!tracker.modals().show_share_modal);
    }

    #[test]
    fn congratulations_flag_is_not_restored() {
        let store = MemoryStore::new();
        let clock = FixedClock::at_date(date(2024, 1, 1));
        {
            let mut tracker = open(&store, clock.clone(), 0);
            tracker.set_daily_goal(1).unwrap();
            tracker.increment_listened_count("q1");
            assert!(tracker.modals().show_congratulations_modal);
            assert!(!saved(&store).pending_prompts.show_congratulations_modal);
        }
        let tracker = open(&store, clock, 0);
        assert!(!tracker.modals().show_congratulations_modal);
    }

    #[test]
    fn dismissing_congratulations_does_not_write() {
        let store = MemoryStore::new();
        let clock = FixedClock::at_date(date(2024, 1, 1));
        let mut tracker = open(&store, clock, 0);
        tracker.set_daily_goal(1).unwrap();
        tracker.increment_listened_count("q1");
        let before = store.write_count();
        tracker.dismiss_congratulations_modal();
        assert_eq!(store.write_count(), before);
        assert!(!tracker.modals().show_congratulations_modal);
    }
}
