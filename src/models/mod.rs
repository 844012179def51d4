mod mode;
mod profile;
mod question;

pub use mode::{difficulty_for_position, Difficulty, Mode, DIFFICULTY_ORDER};
pub use profile::UserProfile;
pub use question::{Question, QuestionId, QuestionPool};
