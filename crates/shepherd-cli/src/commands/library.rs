use clap::Subcommand;

use super::{open_tracker, print_json, CliResult};

#[derive(Subcommand)]
pub enum FavoritesAction {
    /// List favorite teaching IDs
    List,
    /// Add or remove a favorite
    Toggle { id: String },
}

pub fn run(action: FavoritesAction) -> CliResult {
    let mut tracker = open_tracker()?;

    match action {
        FavoritesAction::List => print_json(tracker.favorites())?,
        FavoritesAction::Toggle { id } => {
            if tracker.toggle_favorite(&id) {
                println!("added {id}");
            } else {
                println!("removed {id}");
            }
        }
    }
    Ok(())
}

pub fn history() -> CliResult {
    let tracker = open_tracker()?;
    print_json(tracker.history())
}
