mod collaborators;
mod controller;
mod state;
mod streak;
mod view;

pub use collaborators::{
    Collaborators, ProfileStore, QuestionBank, QuestionSelector, SkillModel, StorageProfileStore,
};
pub use controller::MissionController;
pub use state::{MissionEvent, MissionPhase};
pub use streak::update_streak;
pub use view::{MissionView, ProgressInfo};
