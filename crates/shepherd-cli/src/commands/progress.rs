use clap::Subcommand;
use serde_json::json;
use shepherd_core::Modal;

use super::{open_tracker, print_json, CliResult, CliTracker};

#[derive(Subcommand)]
pub enum ProgressAction {
    /// Show streak, today's progress and pending prompts
    Status,
    /// Count finished plays of one or more teachings
    Listen {
        /// Teaching IDs, counted in order
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Start a fresh day if the date changed
    Reset,
    /// Dismiss a dialog (congratulations, share, review, donate)
    Dismiss { modal: Modal },
}

fn status(tracker: &CliTracker) -> serde_json::Value {
    json!({
        "daily_goal": tracker.daily_goal(),
        "today_fraction": tracker.today_fraction(),
        "streak": tracker.streak(),
        "milestones": tracker.milestones(),
        "modals": tracker.modals(),
    })
}

pub fn run(action: ProgressAction) -> CliResult {
    let mut tracker = open_tracker()?;

    match action {
        ProgressAction::Status => print_json(&status(&tracker))?,
        ProgressAction::Listen { ids } => {
            let mut events = Vec::new();
            for id in &ids {
                events.extend(tracker.increment_listened_count(id));
            }
            print_json(&json!({ "events": events, "status": status(&tracker) }))?;
        }
        ProgressAction::Reset => {
            let events = tracker.reset_daily_progress_if_needed();
            print_json(&events)?;
        }
        ProgressAction::Dismiss { modal } => {
            let events = tracker.dismiss(modal);
            print_json(&events)?;
        }
    }
    Ok(())
}
