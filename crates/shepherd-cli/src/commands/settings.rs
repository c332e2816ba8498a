use chrono::Utc;
use clap::Subcommand;
use shepherd_core::settings::RescueList;
use shepherd_core::{Database, Settings};

use super::{print_json, CliResult};

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print all settings
    Show,
    /// Toggle dark mode
    DarkMode,
    /// Toggle background music
    BackgroundMusic,
    /// Toggle daily reminders
    Notifications,
    /// Add a daily reminder
    AddReminder {
        hour: u8,
        minute: u8,
        label: String,
    },
    /// Remove a daily reminder by ID
    RemoveReminder { id: String },
    /// Enable or disable a daily reminder by ID
    ToggleReminder { id: String },
    /// Restore the default reminders
    ResetReminders,
    /// Mark onboarding as completed
    OnboardingComplete,
    /// Show onboarding again
    OnboardingReset,
    /// Sign the commitment contract
    Sign { name: String },
    /// Add an emergency contact for Rescue Mode
    AddContact { contact: String },
    /// Remove an emergency contact
    RemoveContact { contact: String },
    /// Add a custom prayer for Rescue Mode
    AddPrayer { prayer: String },
}

pub fn run(action: SettingsAction) -> CliResult {
    let db = Database::open()?;
    let mut settings = Settings::load(&db);

    match action {
        SettingsAction::Show => {
            print_json(&settings)?;
            return Ok(());
        }
        SettingsAction::DarkMode => println!("dark mode: {}", settings.toggle_dark_mode()),
        SettingsAction::BackgroundMusic => {
            println!("background music: {}", settings.toggle_background_music())
        }
        SettingsAction::Notifications => {
            println!("daily reminders: {}", settings.toggle_daily_notifications())
        }
        SettingsAction::AddReminder { hour, minute, label } => {
            let added = settings.add_notification_time(hour, minute, &label)?;
            println!("{}", added.id);
        }
        SettingsAction::RemoveReminder { id } => {
            if !settings.remove_notification_time(&id) {
                return Err(format!("no reminder with id {id}").into());
            }
        }
        SettingsAction::ToggleReminder { id } => match settings.toggle_notification_time(&id) {
            Some(enabled) => println!("{id}: {enabled}"),
            None => return Err(format!("no reminder with id {id}").into()),
        },
        SettingsAction::ResetReminders => settings.reset_to_default_times(),
        SettingsAction::OnboardingComplete => settings.complete_onboarding(),
        SettingsAction::OnboardingReset => settings.reset_onboarding(),
        SettingsAction::Sign { name } => settings.sign_contract(&name, Utc::now()),
        SettingsAction::AddContact { contact } => {
            settings.add_rescue_item(RescueList::EmergencyContacts, &contact);
        }
        SettingsAction::RemoveContact { contact } => {
            settings.remove_rescue_item(RescueList::EmergencyContacts, &contact);
        }
        SettingsAction::AddPrayer { prayer } => {
            settings.add_rescue_item(RescueList::CustomPrayers, &prayer);
        }
    }

    settings.save(&db)?;
    Ok(())
}
