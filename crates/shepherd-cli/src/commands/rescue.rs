use clap::Subcommand;

use super::{open_tracker, print_json, CliResult};

#[derive(Subcommand)]
pub enum RescueAction {
    /// Open a Rescue Mode session
    Start,
    /// Record a teaching viewed during the session
    View { id: String },
    /// Mark the prayer as completed
    Prayer,
    /// Mark the breathing exercise as completed
    Breathing,
    /// Close the session
    End {
        #[arg(long)]
        notes: Option<String>,
    },
    /// Print the active session and past sessions
    List,
}

pub fn run(action: RescueAction) -> CliResult {
    let mut tracker = open_tracker()?;

    let inactive = || -> CliResult { Err("no active rescue session".into()) };

    match action {
        RescueAction::Start => {
            let session = tracker.start_rescue_mode();
            print_json(&session)?;
        }
        RescueAction::View { id } => {
            if !tracker.rescue().is_active() {
                return inactive();
            }
            if !tracker.add_rescue_quote_viewed(&id) {
                println!("{id} already recorded");
            }
        }
        RescueAction::Prayer => {
            if !tracker.mark_prayer_completed() {
                return inactive();
            }
        }
        RescueAction::Breathing => {
            if !tracker.mark_breathing_completed() {
                return inactive();
            }
        }
        RescueAction::End { notes } => match tracker.end_rescue_mode(notes) {
            Some(session) => print_json(&session)?,
            None => return inactive(),
        },
        RescueAction::List => print_json(tracker.rescue())?,
    }
    Ok(())
}
