//! User settings: appearance, reminder times, onboarding and the commitment
//! contract, and Rescue Mode preferences.
//!
//! Settings are persisted as one JSON document under [`SETTINGS_STORAGE_KEY`]
//! through the same [`KvStore`] as the player state. Scheduling the reminders
//! is left to the host platform; this module only keeps the list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, ValidationError};
use crate::storage::KvStore;

/// Namespaced key for the settings document.
pub const SETTINGS_STORAGE_KEY: &str = "settings-storage";

/// A daily reminder slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationTime {
    pub id: String,
    pub hour: u8,
    pub minute: u8,
    pub label: String,
    pub enabled: bool,
}

impl NotificationTime {
    fn preset(id: &str, hour: u8, label: &str) -> Self {
        Self {
            id: id.to_string(),
            hour,
            minute: 0,
            label: label.to_string(),
            enabled: true,
        }
    }
}

/// Reminder slots shipped with the app.
pub fn default_notification_times() -> Vec<NotificationTime> {
    vec![
        NotificationTime::preset("1", 8, "Morning Reflection"),
        NotificationTime::preset("2", 12, "Midday Wisdom"),
        NotificationTime::preset("3", 20, "Evening Peace"),
    ]
}

fn validate_time(hour: u8, minute: u8) -> Result<(), ValidationError> {
    if hour >= 24 || minute >= 60 {
        return Err(ValidationError::InvalidTime { hour, minute });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RescueModeSettings {
    pub enabled: bool,
    pub auto_play_audio: bool,
    pub show_breathing_exercise: bool,
    pub block_apps_enabled: bool,
    pub blocked_apps: Vec<String>,
    pub emergency_contacts: Vec<String>,
    pub custom_prayers: Vec<String>,
    pub rescue_quote_categories: Vec<String>,
}

impl Default for RescueModeSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            auto_play_audio: true,
            show_breathing_exercise: true,
            block_apps_enabled: false,
            blocked_apps: Vec::new(),
            emergency_contacts: Vec::new(),
            custom_prayers: Vec::new(),
            rescue_quote_categories: vec![
                "Temptation & Victory".to_string(),
                "Peace & Courage".to_string(),
                "Prayer & Faith".to_string(),
            ],
        }
    }
}

/// Which deduplicated list inside [`RescueModeSettings`] to edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RescueList {
    BlockedApps,
    EmergencyContacts,
    CustomPrayers,
}

impl RescueModeSettings {
    fn list_mut(&mut self, list: RescueList) -> &mut Vec<String> {
        match list {
            RescueList::BlockedApps => &mut self.blocked_apps,
            RescueList::EmergencyContacts => &mut self.emergency_contacts,
            RescueList::CustomPrayers => &mut self.custom_prayers,
        }
    }
}

/// Onboarding answers and the signed commitment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub name: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub spiritual_goals: Vec<String>,
    pub has_signed_contract: bool,
    #[serde(default)]
    pub signature_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub dark_mode: bool,
    pub background_music: bool,
    pub daily_notifications: bool,
    pub notification_times: Vec<NotificationTime>,
    pub has_completed_onboarding: bool,
    pub show_tutorial_overlays: bool,
    #[serde(default)]
    pub rescue_mode: RescueModeSettings,
    #[serde(default)]
    pub personal_info: PersonalInfo,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dark_mode: false,
            background_music: false,
            daily_notifications: true,
            notification_times: default_notification_times(),
            has_completed_onboarding: false,
            show_tutorial_overlays: true,
            rescue_mode: RescueModeSettings::default(),
            personal_info: PersonalInfo::default(),
        }
    }
}

impl Settings {
    /// Load from `store`, falling back to defaults when absent or malformed.
    pub fn load<S: KvStore>(store: &S) -> Self {
        match store.load(SETTINGS_STORAGE_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "discarding malformed settings");
                Self::default()
            }),
            Ok(None) => Self::default(),
            Err(e) => {
                warn!(error = %e, "settings unavailable, using defaults");
                Self::default()
            }
        }
    }

    /// # Errors
    /// Returns an error if the settings cannot be encoded or written.
    pub fn save<S: KvStore>(&self, store: &S) -> Result<()> {
        let raw = serde_json::to_string(self)?;
        store.save(SETTINGS_STORAGE_KEY, &raw)?;
        Ok(())
    }

    // ── Appearance ───────────────────────────────────────────────────

    pub fn toggle_dark_mode(&mut self) -> bool {
        self.dark_mode = !self.dark_mode;
        self.dark_mode
    }

    pub fn toggle_background_music(&mut self) -> bool {
        self.background_music = !self.background_music;
        self.background_music
    }

    // ── Reminders ────────────────────────────────────────────────────

    pub fn toggle_daily_notifications(&mut self) -> bool {
        self.daily_notifications = !self.daily_notifications;
        self.daily_notifications
    }

    /// Reminders that should be scheduled right now.
    pub fn active_notification_times(&self) -> Vec<&NotificationTime> {
        if !self.daily_notifications {
            return Vec::new();
        }
        self.notification_times.iter().filter(|t| t.enabled).collect()
    }

    /// # Errors
    /// Returns a validation error for an hour or minute outside a 24h clock.
    pub fn add_notification_time(
        &mut self,
        hour: u8,
        minute: u8,
        label: &str,
    ) -> Result<&NotificationTime> {
        validate_time(hour, minute)?;
        self.notification_times.push(NotificationTime {
            id: uuid::Uuid::new_v4().to_string(),
            hour,
            minute,
            label: label.to_string(),
            enabled: true,
        });
        Ok(&self.notification_times[self.notification_times.len() - 1])
    }

    pub fn remove_notification_time(&mut self, id: &str) -> bool {
        let before = self.notification_times.len();
        self.notification_times.retain(|t| t.id != id);
        self.notification_times.len() != before
    }

    pub fn toggle_notification_time(&mut self, id: &str) -> Option<bool> {
        let time = self.notification_times.iter_mut().find(|t| t.id == id)?;
        time.enabled = !time.enabled;
        Some(time.enabled)
    }

    /// # Errors
    /// Returns a validation error for an invalid time; unknown ids are ignored.
    pub fn update_notification_time(
        &mut self,
        id: &str,
        hour: u8,
        minute: u8,
        label: &str,
    ) -> Result<bool> {
        validate_time(hour, minute)?;
        match self.notification_times.iter_mut().find(|t| t.id == id) {
            Some(time) => {
                time.hour = hour;
                time.minute = minute;
                time.label = label.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn reset_to_default_times(&mut self) {
        self.notification_times = default_notification_times();
    }

    // ── Onboarding ───────────────────────────────────────────────────

    pub fn complete_onboarding(&mut self) {
        self.has_completed_onboarding = true;
        self.show_tutorial_overlays = false;
    }

    pub fn reset_onboarding(&mut self) {
        self.has_completed_onboarding = false;
        self.show_tutorial_overlays = true;
    }

    pub fn dismiss_tutorial_overlays(&mut self) {
        self.show_tutorial_overlays = false;
    }

    /// Record the commitment contract as signed by `name` at `now`.
    pub fn sign_contract(&mut self, name: &str, now: DateTime<Utc>) {
        if !name.is_empty() {
            self.personal_info.name = name.to_string();
        }
        self.personal_info.has_signed_contract = true;
        self.personal_info.signature_date = Some(now);
    }

    // ── Rescue Mode ──────────────────────────────────────────────────

    pub fn toggle_rescue_mode(&mut self) -> bool {
        self.rescue_mode.enabled = !self.rescue_mode.enabled;
        self.rescue_mode.enabled
    }

    /// Add `value` unless already present. Returns whether it was added.
    pub fn add_rescue_item(&mut self, list: RescueList, value: &str) -> bool {
        let items = self.rescue_mode.list_mut(list);
        if items.iter().any(|v| v == value) {
            return false;
        }
        items.push(value.to_string());
        true
    }

    pub fn remove_rescue_item(&mut self, list: RescueList, value: &str) -> bool {
        let items = self.rescue_mode.list_mut(list);
        let before = items.len();
        items.retain(|v| v != value);
        items.len() != before
    }
}
