use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::catalog::QuoteId;
use crate::error::ValidationError;

/// One calendar day's listening count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyProgress {
    pub date: NaiveDate,
    pub quotes_listened: u32,
    pub completed: bool,
}

impl DailyProgress {
    pub fn fresh(date: NaiveDate) -> Self {
        Self {
            date,
            quotes_listened: 0,
            completed: false,
        }
    }
}

/// Streak and lifetime counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakData {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_completed_date: Option<NaiveDate>,
    pub total_days_completed: u32,
    pub total_quotes_listened: u32,
    pub today_progress: DailyProgress,
    pub weekly_streak: u32,
    pub monthly_streak: u32,
}

impl StreakData {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            current_streak: 0,
            longest_streak: 0,
            last_completed_date: None,
            total_days_completed: 0,
            total_quotes_listened: 0,
            today_progress: DailyProgress::fresh(today),
            weekly_streak: 0,
            monthly_streak: 0,
        }
    }

    /// Repair `current_streak <= longest_streak` on data read from outside.
    pub(crate) fn normalize(&mut self) {
        self.longest_streak = self.longest_streak.max(self.current_streak);
    }
}

/// One-shot milestone flags. Never reset except by a full wipe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneState {
    pub has_shown_share_modal: bool,
    pub has_shown_review_modal: bool,
    pub has_shown_donate_modal: bool,
}

impl MilestoneState {
    pub fn has_shown(&self, milestone: Milestone) -> bool {
        match milestone {
            Milestone::Share => self.has_shown_share_modal,
            Milestone::Review => self.has_shown_review_modal,
            Milestone::Donate => self.has_shown_donate_modal,
        }
    }

    pub(crate) fn mark_shown(&mut self, milestone: Milestone) {
        match milestone {
            Milestone::Share => self.has_shown_share_modal = true,
            Milestone::Review => self.has_shown_review_modal = true,
            Milestone::Donate => self.has_shown_donate_modal = true,
        }
    }
}

/// "Show now" flags. Pending milestone prompts are persisted so another
/// process can dismiss them; the congratulations flag is not.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalFlags {
    pub show_congratulations_modal: bool,
    pub show_share_modal: bool,
    pub show_review_modal: bool,
    pub show_donate_modal: bool,
}

impl ModalFlags {
    pub fn is_showing(&self, modal: Modal) -> bool {
        match modal {
            Modal::Congratulations => self.show_congratulations_modal,
            Modal::Share => self.show_share_modal,
            Modal::Review => self.show_review_modal,
            Modal::Donate => self.show_donate_modal,
        }
    }

    /// The milestone prompts only; the congratulations dialog never outlives
    /// the session that raised it.
    pub fn pending_milestones(&self) -> Self {
        Self {
            show_congratulations_modal: false,
            ..*self
        }
    }

    pub(crate) fn set(&mut self, modal: Modal, on: bool) {
        match modal {
            Modal::Congratulations => self.show_congratulations_modal = on,
            Modal::Share => self.show_share_modal = on,
            Modal::Review => self.show_review_modal = on,
            Modal::Donate => self.show_donate_modal = on,
        }
    }
}

/// Prompts that appear at most once per install.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Milestone {
    Share,
    Review,
    Donate,
}

impl Milestone {
    pub const ALL: [Milestone; 3] = [Milestone::Share, Milestone::Review, Milestone::Donate];

    pub fn modal(self) -> Modal {
        match self {
            Milestone::Share => Modal::Share,
            Milestone::Review => Modal::Review,
            Milestone::Donate => Modal::Donate,
        }
    }
}

/// Dialogs the UI can be asked to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modal {
    Congratulations,
    Share,
    Review,
    Donate,
}

impl Modal {
    pub fn milestone(self) -> Option<Milestone> {
        match self {
            Modal::Congratulations => None,
            Modal::Share => Some(Milestone::Share),
            Modal::Review => Some(Milestone::Review),
            Modal::Donate => Some(Milestone::Donate),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Modal::Congratulations => "congratulations",
            Modal::Share => "share",
            Modal::Review => "review",
            Modal::Donate => "donate",
        }
    }
}

impl fmt::Display for Modal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Modal {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "congratulations" | "congrats" => Ok(Modal::Congratulations),
            "share" => Ok(Modal::Share),
            "review" => Ok(Modal::Review),
            "donate" => Ok(Modal::Donate),
            _ => Err(ValidationError::UnknownModal(s.to_string())),
        }
    }
}

/// Play-count thresholds for the milestone prompts.
///
/// The donate prompt has no fixed count: it fires once the lifetime total
/// reaches the catalog size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneThresholds {
    pub share_after: u32,
    pub review_after: u32,
}

impl Default for MilestoneThresholds {
    fn default() -> Self {
        Self {
            share_after: 5,
            review_after: 25,
        }
    }
}

/// Everything the reducer mutates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressState {
    pub streak: StreakData,
    pub milestones: MilestoneState,
    pub modals: ModalFlags,
    pub(crate) listened: HashSet<QuoteId>,
}

impl ProgressState {
    pub fn new(today: NaiveDate) -> Self {
        Self::restore(StreakData::new(today), MilestoneState::default())
    }

    /// State rebuilt from persisted parts. The session set starts empty.
    pub fn restore(mut streak: StreakData, milestones: MilestoneState) -> Self {
        streak.normalize();
        Self {
            streak,
            milestones,
            modals: ModalFlags::default(),
            listened: HashSet::new(),
        }
    }

    /// Whether `id` was already counted in the current playback session.
    pub fn was_counted(&self, id: &str) -> bool {
        self.listened.contains(id)
    }

    pub fn session_count(&self) -> usize {
        self.listened.len()
    }
}
