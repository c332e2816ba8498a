//! Daily streak and milestone reducer.
//!
//! A deterministic update over [`ProgressState`]. All inputs that come from
//! the outside world (today's date, the daily goal, the catalog size) arrive
//! in a [`ReduceContext`], so the same event sequence always yields the same
//! state.
//!
//! ## Streak rules
//!
//! ```text
//! goal newly reached today:
//!   last completed == yesterday  -> streak + 1
//!   last completed == today      -> unchanged
//!   otherwise                    -> streak = 1
//! then: days completed + 1, weekly/monthly rollup on multiples of 7/30
//! ```
//!
//! A backward jump of the device clock can reopen a day that was already
//! completed; nothing here guards against that.

use chrono::NaiveDate;
use tracing::{debug, info};

use super::types::{DailyProgress, Milestone, MilestoneThresholds, Modal, ProgressState};
use crate::catalog::QuoteId;
use crate::events::Event;

/// Default number of teachings per day.
pub const DEFAULT_DAILY_GOAL: u32 = 10;

const WEEK: u32 = 7;
const MONTH: u32 = 30;

/// External inputs for one reducer step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReduceContext {
    pub today: NaiveDate,
    pub daily_goal: u32,
    pub catalog_size: usize,
    pub thresholds: MilestoneThresholds,
}

impl ReduceContext {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            daily_goal: DEFAULT_DAILY_GOAL,
            catalog_size: 0,
            thresholds: MilestoneThresholds::default(),
        }
    }

    pub fn with_daily_goal(mut self, daily_goal: u32) -> Self {
        self.daily_goal = daily_goal;
        self
    }

    pub fn with_catalog_size(mut self, catalog_size: usize) -> Self {
        self.catalog_size = catalog_size;
        self
    }

    pub fn with_thresholds(mut self, thresholds: MilestoneThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }
}

/// Inputs the reducer understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// Start a fresh day if the calendar date changed.
    ResetIfNeeded,
    /// An item finished playing.
    Listened(QuoteId),
    /// The UI closed a dialog.
    Dismiss(Modal),
    /// Playback restarted with a new quote or playlist.
    SessionRestarted,
}

/// Apply one event to `state`, returning what happened.
pub fn reduce(state: &mut ProgressState, event: ProgressEvent, ctx: &ReduceContext) -> Vec<Event> {
    let mut events = Vec::new();
    match event {
        ProgressEvent::ResetIfNeeded => reset_if_needed(state, ctx.today, &mut events),
        ProgressEvent::Listened(quote_id) => listened(state, quote_id, ctx, &mut events),
        ProgressEvent::Dismiss(modal) => dismiss(state, modal, ctx, &mut events),
        ProgressEvent::SessionRestarted => {
            state.listened.clear();
            events.push(Event::SessionRestarted);
        }
    }
    debug_assert!(state.streak.current_streak <= state.streak.longest_streak);
    events
}

fn reset_if_needed(state: &mut ProgressState, today: NaiveDate, events: &mut Vec<Event>) {
    let from = state.streak.today_progress.date;
    if from == today {
        return;
    }
    debug!(%from, to = %today, "daily progress rolled over");
    state.streak.today_progress = DailyProgress::fresh(today);
    events.push(Event::DayRolledOver { from, to: today });
}

fn listened(
    state: &mut ProgressState,
    quote_id: QuoteId,
    ctx: &ReduceContext,
    events: &mut Vec<Event>,
) {
    if state.listened.contains(&quote_id) {
        debug!(%quote_id, "already counted in this session");
        events.push(Event::DuplicateIgnored { quote_id });
        return;
    }

    reset_if_needed(state, ctx.today, events);

    let streak = &mut state.streak;
    let was_completed = streak.today_progress.completed;
    let today_count = streak.today_progress.quotes_listened.saturating_add(1);
    streak.total_quotes_listened = streak.total_quotes_listened.saturating_add(1);
    let goal_completed = today_count >= ctx.daily_goal;

    events.push(Event::QuoteCounted {
        quote_id: quote_id.clone(),
        today_count,
        total_count: streak.total_quotes_listened,
    });

    if goal_completed && !was_completed {
        // Reaching a raised goal again today leaves the streak as it is.
        if streak.last_completed_date != Some(ctx.today) {
            streak.current_streak = if streak.last_completed_date.is_some()
                && streak.last_completed_date == ctx.today.pred_opt()
            {
                streak.current_streak.saturating_add(1)
            } else {
                1
            };
        }
        streak.total_days_completed = streak.total_days_completed.saturating_add(1);
        streak.last_completed_date = Some(ctx.today);
        streak.longest_streak = streak.longest_streak.max(streak.current_streak);

        info!(
            date = %ctx.today,
            current_streak = streak.current_streak,
            longest_streak = streak.longest_streak,
            "daily goal reached"
        );
        events.push(Event::DayCompleted {
            date: ctx.today,
            current_streak: streak.current_streak,
            longest_streak: streak.longest_streak,
        });

        if streak.current_streak > 0 {
            if streak.current_streak % WEEK == 0 {
                streak.weekly_streak = streak.weekly_streak.saturating_add(1);
                events.push(Event::WeeklyStreakReached {
                    weekly_streak: streak.weekly_streak,
                });
            }
            if streak.current_streak % MONTH == 0 {
                streak.monthly_streak = streak.monthly_streak.saturating_add(1);
                events.push(Event::MonthlyStreakReached {
                    monthly_streak: streak.monthly_streak,
                });
            }
        }

        state.modals.show_congratulations_modal = true;
        events.push(Event::ShowCongratulations);
    }

    state.streak.today_progress = DailyProgress {
        date: ctx.today,
        quotes_listened: today_count,
        completed: goal_completed,
    };

    evaluate_milestones(state, ctx, events);
    state.listened.insert(quote_id);
}

/// Whether the lifetime total has reached `milestone`'s threshold.
fn threshold_crossed(milestone: Milestone, total: u32, ctx: &ReduceContext) -> bool {
    match milestone {
        Milestone::Share => total >= ctx.thresholds.share_after,
        Milestone::Review => total >= ctx.thresholds.review_after,
        Milestone::Donate => ctx.catalog_size > 0 && total as usize >= ctx.catalog_size,
    }
}

fn evaluate_milestones(state: &mut ProgressState, ctx: &ReduceContext, events: &mut Vec<Event>) {
    let total = state.streak.total_quotes_listened;
    for milestone in Milestone::ALL {
        let modal = milestone.modal();
        if threshold_crossed(milestone, total, ctx)
            && !state.milestones.has_shown(milestone)
            && !state.modals.is_showing(modal)
        {
            debug!(?milestone, total, "milestone threshold crossed");
            state.modals.set(modal, true);
            events.push(Event::ShowMilestone { milestone });
        }
    }
}

/// Close `modal`. A milestone prompt is only marked as shown once it was
/// actually pending or its threshold has been reached.
fn dismiss(
    state: &mut ProgressState,
    modal: Modal,
    ctx: &ReduceContext,
    events: &mut Vec<Event>,
) {
    let was_showing = state.modals.is_showing(modal);
    state.modals.set(modal, false);
    if let Some(milestone) = modal.milestone() {
        let total = state.streak.total_quotes_listened;
        if was_showing || threshold_crossed(milestone, total, ctx) {
            state.milestones.mark_shown(milestone);
        } else {
            debug!(?milestone, total, "dismissed a prompt that was never due");
        }
    }
    events.push(Event::ModalDismissed { modal });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::ModalFlags;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn listen_n(state: &mut ProgressState, ctx: &ReduceContext, prefix: &str, n: usize) {
        for i in 0..n {
            reduce(state, ProgressEvent::Listened(format!("{prefix}-{i}")), ctx);
        }
    }

    #[test]
    fn reset_is_idempotent_within_a_day() {
        let mut state = ProgressState::new(date(2024, 1, 1));
        let ctx = ReduceContext::new(date(2024, 1, 2));

        let first = reduce(&mut state, ProgressEvent::ResetIfNeeded, &ctx);
        assert_eq!(first.len(), 1);
        let after_first = state.clone();

        let second = reduce(&mut state, ProgressEvent::ResetIfNeeded, &ctx);
        assert!(second.is_empty());
        assert_eq!(state, after_first);
    }

    #[test]
    fn reset_leaves_streak_fields_alone() {
        let mut state = ProgressState::new(date(2024, 1, 1));
        let ctx = ReduceContext::new(date(2024, 1, 1)).with_daily_goal(1);
        reduce(&mut state, ProgressEvent::Listened("q1".into()), &ctx);

        let next_day = ReduceContext::new(date(2024, 1, 2));
        reduce(&mut state, ProgressEvent::ResetIfNeeded, &next_day);

        assert_eq!(state.streak.current_streak, 1);
        assert_eq!(state.streak.total_quotes_listened, 1);
        assert_eq!(state.streak.today_progress, DailyProgress::fresh(date(2024, 1, 2)));
    }

    #[test]
    fn ten_distinct_quotes_complete_the_default_goal() {
        let mut state = ProgressState::new(date(2024, 1, 1));
        let ctx = ReduceContext::new(date(2024, 1, 1));
        for i in 1..=10 {
            reduce(&mut state, ProgressEvent::Listened(format!("q{i}")), &ctx);
        }

        assert_eq!(
            state.streak.today_progress,
            DailyProgress {
                date: date(2024, 1, 1),
                quotes_listened: 10,
                completed: true,
            }
        );
        assert_eq!(state.streak.current_streak, 1);
        assert_eq!(state.streak.total_days_completed, 1);
        assert!(state.modals.show_congratulations_modal);

        let before = state.streak.clone();
        reduce(&mut state, ProgressEvent::Dismiss(Modal::Congratulations), &ctx);
        assert!(!state.modals.show_congratulations_modal);
        assert_eq!(state.streak, before);
    }

    #[test]
    fn duplicate_in_session_is_ignored() {
        let mut state = ProgressState::new(date(2024, 1, 1));
        let ctx = ReduceContext::new(date(2024, 1, 1));
        reduce(&mut state, ProgressEvent::Listened("q1".into()), &ctx);
        let before = state.clone();

        let events = reduce(&mut state, ProgressEvent::Listened("q1".into()), &ctx);
        assert_eq!(events, vec![Event::DuplicateIgnored { quote_id: "q1".into() }]);
        assert_eq!(state, before);
    }

    #[test]
    fn session_restart_allows_counting_again() {
        let mut state = ProgressState::new(date(2024, 1, 1));
        let ctx = ReduceContext::new(date(2024, 1, 1));
        reduce(&mut state, ProgressEvent::Listened("q1".into()), &ctx);
        reduce(&mut state, ProgressEvent::SessionRestarted, &ctx);
        reduce(&mut state, ProgressEvent::Listened("q1".into()), &ctx);
        assert_eq!(state.streak.total_quotes_listened, 2);
    }

    #[test]
    fn consecutive_days_extend_and_gaps_restart() {
        let mut state = ProgressState::new(date(2024, 1, 1));
        let d1 = ReduceContext::new(date(2024, 1, 1)).with_daily_goal(3);
        listen_n(&mut state, &d1, "d1", 3);
        assert_eq!(state.streak.current_streak, 1);
        assert_eq!(state.streak.last_completed_date, Some(date(2024, 1, 1)));

        let d2 = ReduceContext::new(date(2024, 1, 2)).with_daily_goal(3);
        listen_n(&mut state, &d2, "d2", 3);
        assert_eq!(state.streak.current_streak, 2);

        // 2024-01-03 skipped entirely.
        let d4 = ReduceContext::new(date(2024, 1, 4)).with_daily_goal(3);
        listen_n(&mut state, &d4, "d4", 3);
        assert_eq!(state.streak.current_streak, 1);
        assert_eq!(state.streak.longest_streak, 2);
        assert_eq!(state.streak.total_days_completed, 3);
    }

    #[test]
    fn extra_plays_after_completion_do_not_extend_the_streak() {
        let mut state = ProgressState::new(date(2024, 1, 1));
        let ctx = ReduceContext::new(date(2024, 1, 1)).with_daily_goal(2);
        listen_n(&mut state, &ctx, "a", 6);
        assert_eq!(state.streak.current_streak, 1);
        assert_eq!(state.streak.total_days_completed, 1);
        assert_eq!(state.streak.today_progress.quotes_listened, 6);
    }

    #[test]
    fn congratulations_fire_only_on_the_completing_play() {
        let mut state = ProgressState::new(date(2024, 1, 1));
        let ctx = ReduceContext::new(date(2024, 1, 1)).with_daily_goal(2);
        reduce(&mut state, ProgressEvent::Listened("a".into()), &ctx);
        assert!(!state.modals.show_congratulations_modal);
        let events = reduce(&mut state, ProgressEvent::Listened("b".into()), &ctx);
        assert!(events.contains(&Event::ShowCongratulations));

        reduce(&mut state, ProgressEvent::Dismiss(Modal::Congratulations), &ctx);
        let events = reduce(&mut state, ProgressEvent::Listened("c".into()), &ctx);
        assert!(!events.contains(&Event::ShowCongratulations));
        assert!(!state.modals.show_congratulations_modal);
    }

    #[test]
    fn weekly_rollup_on_seventh_day_only() {
        let mut state = ProgressState::new(date(2024, 1, 1));
        for day in 1..=7u32 {
            let ctx = ReduceContext::new(date(2024, 1, day)).with_daily_goal(1);
            reduce(&mut state, ProgressEvent::Listened(format!("q{day}")), &ctx);
            if day < 7 {
                assert_eq!(state.streak.weekly_streak, 0, "day {day}");
            }
        }
        assert_eq!(state.streak.current_streak, 7);
        assert_eq!(state.streak.weekly_streak, 1);
        assert_eq!(state.streak.monthly_streak, 0);
    }

    #[test]
    fn monthly_rollup_after_thirty_days() {
        let mut state = ProgressState::new(date(2024, 1, 1));
        let mut day = date(2024, 1, 1);
        for i in 0..30 {
            let ctx = ReduceContext::new(day).with_daily_goal(1);
            reduce(&mut state, ProgressEvent::Listened(format!("q{i}")), &ctx);
            day = day.succ_opt().unwrap();
        }
        assert_eq!(state.streak.current_streak, 30);
        assert_eq!(state.streak.monthly_streak, 1);
        assert_eq!(state.streak.weekly_streak, 4);
    }

    #[test]
    fn same_day_recompletion_keeps_streak_but_counts_the_day() {
        let mut state = ProgressState::new(date(2024, 1, 1));
        let ctx = ReduceContext::new(date(2024, 1, 1)).with_daily_goal(1);
        reduce(&mut state, ProgressEvent::Listened("a".into()), &ctx);
        reduce(&mut state, ProgressEvent::Dismiss(Modal::Congratulations), &ctx);

        // Goal raised: the next play leaves the day incomplete.
        let raised = ctx.with_daily_goal(3);
        reduce(&mut state, ProgressEvent::Listened("b".into()), &raised);
        assert!(!state.streak.today_progress.completed);
        let events = reduce(&mut state, ProgressEvent::Listened("c".into()), &raised);

        assert!(state.streak.today_progress.completed);
        assert_eq!(state.streak.current_streak, 1);
        assert_eq!(state.streak.longest_streak, 1);
        assert_eq!(state.streak.total_days_completed, 2);
        assert!(state.modals.show_congratulations_modal);
        assert!(events.contains(&Event::ShowCongratulations));
    }

    #[test]
    fn same_day_recompletion_rechecks_weekly_rollup() {
        let mut state = ProgressState::new(date(2024, 1, 1));
        for day in 1..=7u32 {
            let ctx = ReduceContext::new(date(2024, 1, day)).with_daily_goal(1);
            reduce(&mut state, ProgressEvent::Listened(format!("q{day}")), &ctx);
        }
        assert_eq!(state.streak.weekly_streak, 1);

        let raised = ReduceContext::new(date(2024, 1, 7)).with_daily_goal(3);
        listen_n(&mut state, &raised, "extra", 2);
        assert_eq!(state.streak.current_streak, 7);
        assert_eq!(state.streak.weekly_streak, 2);
    }

    #[test]
    fn dismissing_a_prompt_before_its_threshold_keeps_it_armed() {
        let mut state = ProgressState::new(date(2024, 1, 1));
        let ctx = ReduceContext::new(date(2024, 1, 1));
        reduce(&mut state, ProgressEvent::Dismiss(Modal::Share), &ctx);
        assert!(!state.milestones.has_shown_share_modal);

        listen_n(&mut state, &ctx, "q", 10);
        assert!(state.modals.show_share_modal);
    }

    #[test]
    fn dismissing_after_threshold_without_pending_flag_marks_shown() {
        let mut state = ProgressState::new(date(2024, 1, 1));
        let ctx = ReduceContext::new(date(2024, 1, 1));
        listen_n(&mut state, &ctx, "q", 5);
        state.modals = ModalFlags::default();

        reduce(&mut state, ProgressEvent::Dismiss(Modal::Share), &ctx);
        assert!(state.milestones.has_shown_share_modal);
    }

    #[test]
    fn share_and_review_prompts_fire_once() {
        let mut state = ProgressState::new(date(2024, 1, 1));
        let ctx = ReduceContext::new(date(2024, 1, 1)).with_thresholds(MilestoneThresholds {
            share_after: 2,
            review_after: 4,
        });

        listen_n(&mut state, &ctx, "a", 2);
        assert!(state.modals.show_share_modal);
        assert!(!state.modals.show_review_modal);

        reduce(&mut state, ProgressEvent::Dismiss(Modal::Share), &ctx);
        assert!(state.milestones.has_shown_share_modal);

        listen_n(&mut state, &ctx, "b", 2);
        assert!(!state.modals.show_share_modal);
        assert!(state.modals.show_review_modal);
    }

    #[test]
    fn pending_prompt_is_not_reannounced() {
        let mut state = ProgressState::new(date(2024, 1, 1));
        let ctx = ReduceContext::new(date(2024, 1, 1));
        listen_n(&mut state, &ctx, "a", 5);
        let events = reduce(&mut state, ProgressEvent::Listened("x".into()), &ctx);
        assert!(!events
            .iter()
            .any(|e| matches!(e, Event::ShowMilestone { milestone: Milestone::Share })));
        assert!(state.modals.show_share_modal);
    }

    #[test]
    fn donate_prompt_needs_the_whole_catalog() {
        let mut state = ProgressState::new(date(2024, 1, 1));
        let ctx = ReduceContext::new(date(2024, 1, 1)).with_catalog_size(3);
        listen_n(&mut state, &ctx, "a", 2);
        assert!(!state.modals.show_donate_modal);
        reduce(&mut state, ProgressEvent::Listened("last".into()), &ctx);
        assert!(state.modals.show_donate_modal);
    }

    #[test]
    fn empty_catalog_never_asks_for_donations() {
        let mut state = ProgressState::new(date(2024, 1, 1));
        let ctx = ReduceContext::new(date(2024, 1, 1));
        listen_n(&mut state, &ctx, "a", 3);
        assert!(!state.modals.show_donate_modal);
    }
}
