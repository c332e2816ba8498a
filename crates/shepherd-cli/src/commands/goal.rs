use clap::Subcommand;
use shepherd_core::Config;

use super::{open_tracker, CliResult};

#[derive(Subcommand)]
pub enum GoalAction {
    /// Print the current daily goal
    Get,
    /// Set the number of teachings per day
    Set { goal: u32 },
}

pub fn run(action: GoalAction) -> CliResult {
    let mut tracker = open_tracker()?;

    match action {
        GoalAction::Get => println!("{}", tracker.daily_goal()),
        GoalAction::Set { goal } => {
            let choices = Config::load_or_default().progress.goal_choices;
            if !choices.contains(&goal) {
                eprintln!("note: {goal} is not one of the suggested goals {choices:?}");
            }
            tracker.set_daily_goal(goal)?;
            println!("ok");
        }
    }
    Ok(())
}
