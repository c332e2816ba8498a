//! # Shepherd Core Library
//!
//! State core for the Shepherd devotional listening app. The UI (or the
//! bundled CLI) only reads snapshots and invokes mutators; everything that
//! has rules lives here.
//!
//! ## Architecture
//!
//! - **Progress**: a pure reducer for the daily goal, day streak and one-shot
//!   milestone prompts, wrapped by a tracker that owns the state and writes
//!   it through to storage after every mutation
//! - **Player**: playlist navigation over an opaque audio capability,
//!   reporting playback events instead of driving navigation
//! - **Storage**: SQLite key-value store for state snapshots and TOML-based
//!   configuration
//!
//! ## Key Components
//!
//! - [`ProgressTracker`]: owner of streak, milestone, library and rescue state
//! - [`PlaybackSession`]: playlist and audio control
//! - [`Database`]: durable key-value storage
//! - [`Config`]: application configuration management

pub mod catalog;
pub mod clock;
pub mod error;
pub mod events;
pub mod library;
pub mod player;
pub mod progress;
pub mod rescue;
pub mod settings;
pub mod storage;

pub use catalog::{AudioResource, Catalog, Quote, QuoteId, StaticCatalog};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ConfigError, CoreError, PlayerError, StorageError, ValidationError};
pub use events::Event;
pub use player::{AudioPlayer, BackgroundMusic, NullPlayer, PlaybackEvent, PlaybackSession};
pub use progress::{
    DailyProgress, Milestone, MilestoneState, MilestoneThresholds, Modal, ModalFlags,
    ProgressTracker, StreakData, TrackerOptions,
};
pub use settings::Settings;
pub use storage::{Config, Database, KvStore, MemoryStore, PersistedState};
