pub mod collaborators;
pub mod controller;
pub mod error;
pub mod runner;
pub mod store;

pub use collaborators::{StatsRecorder, WordStore};
pub use controller::{
  is_answer_correct, Effect, Feedback, Phase, Prompt, SessionController, SessionSummary,
  Transition,
};
pub use error::SessionError;
pub use runner::{ChallengeHandle, SessionRunner};
pub use store::SessionStore;
