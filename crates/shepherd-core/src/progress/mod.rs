mod reducer;
mod tracker;
mod types;

pub use reducer::{reduce, ProgressEvent, ReduceContext, DEFAULT_DAILY_GOAL};
pub use tracker::{ProgressTracker, TrackerOptions};
pub use types::{
    DailyProgress, Milestone, MilestoneState, MilestoneThresholds, Modal, ModalFlags,
    ProgressState, StreakData,
};
