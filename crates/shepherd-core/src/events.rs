use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::progress::{Milestone, Modal};

/// Every progress state change produces one or more Events.
/// The UI reacts to them; the tracker uses them to decide whether to persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Today's progress was replaced because the calendar date moved on.
    DayRolledOver { from: NaiveDate, to: NaiveDate },
    /// A play was counted toward today and the lifetime total.
    QuoteCounted {
        quote_id: String,
        today_count: u32,
        total_count: u32,
    },
    /// The item was already counted in this playback session.
    DuplicateIgnored { quote_id: String },
    /// Today's goal was reached for the first time.
    DayCompleted {
        date: NaiveDate,
        current_streak: u32,
        longest_streak: u32,
    },
    WeeklyStreakReached { weekly_streak: u32 },
    MonthlyStreakReached { monthly_streak: u32 },
    /// UI should show the one-time congratulations dialog.
    ShowCongratulations,
    /// UI should show a milestone prompt.
    ShowMilestone { milestone: Milestone },
    ModalDismissed { modal: Modal },
    /// The per-session de-duplication set was cleared.
    SessionRestarted,
}

impl Event {
    /// Whether the event changed anything that is persisted.
    pub fn is_durable(&self) -> bool {
        !matches!(
            self,
            Event::DuplicateIgnored { .. }
                | Event::ShowCongratulations
                | Event::SessionRestarted
                | Event::ModalDismissed {
                    modal: Modal::Congratulations
                }
        )
    }
}
