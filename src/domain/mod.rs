pub mod card;
pub mod review;
pub mod topic;

pub use card::{CardStatus, WordCard, DEFAULT_EASE_FACTOR};
pub use review::{AnswerOutcome, PromptMode, SessionKind};
pub use topic::{NewTopic, Topic};
