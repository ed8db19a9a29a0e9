//! Review/test session state machine.
//!
//! The controller owns the queue and the running score of one session and
//! nothing else. It never touches storage: every transition returns the
//! effects the caller has to carry out (saving a rescheduled card, recording
//! the finished session, handing off a challenge score).

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::domain::{AnswerOutcome, PromptMode, SessionKind, WordCard};
use crate::srs;

use super::error::SessionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Phase {
  /// Passive look at the whole list, review sessions only
  Study,
  Presenting { index: usize },
  Answered { index: usize, outcome: AnswerOutcome },
  Complete,
  Cancelled,
}

impl Phase {
  pub fn name(&self) -> &'static str {
    match self {
      Self::Study => "studying",
      Self::Presenting { .. } => "presenting",
      Self::Answered { .. } => "answered",
      Self::Complete => "complete",
      Self::Cancelled => "cancelled",
    }
  }

  pub fn is_finished(&self) -> bool {
    matches!(self, Self::Complete | Self::Cancelled)
  }
}

/// Side effects requested by a transition, in the order they should run
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
  /// Write the rescheduled card back to storage
  SaveCard(WordCard),
  RecordStudySession { words_studied: u32 },
  ReportChallengeScore { correct_count: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
  pub phase: Phase,
  pub effects: Vec<Effect>,
}

impl Transition {
  fn quiet(phase: Phase) -> Self {
    Self {
      phase,
      effects: Vec::new(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prompt {
  pub index: usize,
  pub total: usize,
  pub text: String,
  pub mode: PromptMode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feedback {
  pub index: usize,
  pub outcome: AnswerOutcome,
  pub expected: String,
  pub given: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
  pub correct_count: u32,
  pub wrong_count: u32,
  pub accuracy_percent: u32,
  pub missed: Vec<WordCard>,
}

#[derive(Debug, Clone)]
pub struct SessionController {
  kind: SessionKind,
  queue: Vec<WordCard>,
  phase: Phase,
  correct_count: u32,
  missed: Vec<WordCard>,
  last_given: Option<String>,
}

/// Trimmed, case-insensitive exact match
pub fn is_answer_correct(input: &str, expected: &str) -> bool {
  input.trim().to_lowercase() == expected.to_lowercase()
}

impl SessionController {
  /// Start a session of the given kind. Review sessions keep the given
  /// order for the study list; every other kind is shuffled straight away.
  pub fn start<R: Rng + ?Sized>(
    kind: SessionKind,
    mut cards: Vec<WordCard>,
    rng: &mut R,
  ) -> Result<Self, SessionError> {
    if cards.is_empty() {
      return Err(SessionError::EmptyQueue);
    }

    let phase = if kind.has_study_phase() {
      Phase::Study
    } else {
      cards.shuffle(rng);
      Phase::Presenting { index: 0 }
    };

    tracing::debug!("Starting {} session with {} words", kind.as_str(), cards.len());

    Ok(Self {
      kind,
      queue: cards,
      phase,
      correct_count: 0,
      missed: Vec::new(),
      last_given: None,
    })
  }

  pub fn review(cards: Vec<WordCard>) -> Result<Self, SessionError> {
    // The study phase never shuffles, so any rng will do here
    Self::start(SessionKind::Review, cards, &mut rand::rng())
  }

  pub fn test<R: Rng + ?Sized>(cards: Vec<WordCard>, rng: &mut R) -> Result<Self, SessionError> {
    Self::start(SessionKind::Test, cards, rng)
  }

  pub fn challenge<R: Rng + ?Sized>(
    cards: Vec<WordCard>,
    rng: &mut R,
  ) -> Result<Self, SessionError> {
    Self::start(SessionKind::Challenge, cards, rng)
  }

  pub fn listening<R: Rng + ?Sized>(
    cards: Vec<WordCard>,
    rng: &mut R,
  ) -> Result<Self, SessionError> {
    Self::start(SessionKind::Listening, cards, rng)
  }

  pub fn kind(&self) -> SessionKind {
    self.kind
  }

  pub fn phase(&self) -> Phase {
    self.phase
  }

  pub fn total(&self) -> usize {
    self.queue.len()
  }

  pub fn correct_count(&self) -> u32 {
    self.correct_count
  }

  pub fn missed(&self) -> &[WordCard] {
    &self.missed
  }

  pub fn queue(&self) -> &[WordCard] {
    &self.queue
  }

  /// The full list, only while in the study phase
  pub fn study_list(&self) -> Option<&[WordCard]> {
    match self.phase {
      Phase::Study => Some(&self.queue),
      _ => None,
    }
  }

  pub fn current_card(&self) -> Option<&WordCard> {
    match self.phase {
      Phase::Presenting { index } | Phase::Answered { index, .. } => self.queue.get(index),
      _ => None,
    }
  }

  pub fn prompt(&self) -> Option<Prompt> {
    let index = match self.phase {
      Phase::Presenting { index } | Phase::Answered { index, .. } => index,
      _ => return None,
    };
    let mode = match self.kind {
      SessionKind::Listening => PromptMode::Audio,
      _ => PromptMode::Text,
    };
    Some(Prompt {
      index,
      total: self.queue.len(),
      text: self.queue[index].front.clone(),
      mode,
    })
  }

  pub fn feedback(&self) -> Option<Feedback> {
    match self.phase {
      Phase::Answered { index, outcome } => Some(Feedback {
        index,
        outcome,
        expected: self.queue[index].back.clone(),
        given: self.last_given.clone(),
      }),
      _ => None,
    }
  }

  pub fn summary(&self) -> Option<SessionSummary> {
    if self.phase != Phase::Complete {
      return None;
    }
    let total = self.queue.len() as u32;
    let accuracy = (self.correct_count as f64 / total as f64 * 100.0).round() as u32;
    Some(SessionSummary {
      correct_count: self.correct_count,
      wrong_count: total - self.correct_count,
      accuracy_percent: accuracy,
      missed: self.missed.clone(),
    })
  }

  fn invalid(&self, action: &'static str) -> SessionError {
    SessionError::InvalidAction {
      action,
      phase: self.phase.name(),
    }
  }

  fn presenting_index(&self, action: &'static str) -> Result<usize, SessionError> {
    match self.phase {
      Phase::Presenting { index } => Ok(index),
      _ => Err(self.invalid(action)),
    }
  }

  /// Leave the study list and begin the shuffled test
  pub fn start_test<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Transition, SessionError> {
    if self.phase != Phase::Study {
      return Err(self.invalid("start the test"));
    }
    self.queue.shuffle(rng);
    self.phase = Phase::Presenting { index: 0 };
    Ok(Transition::quiet(self.phase))
  }

  pub fn submit(&mut self, input: &str, now: DateTime<Utc>) -> Result<Transition, SessionError> {
    let index = self.presenting_index("submit an answer")?;
    if input.trim().is_empty() {
      return Err(SessionError::InvalidAnswerInput);
    }

    let outcome = if is_answer_correct(input, &self.queue[index].back) {
      AnswerOutcome::Correct
    } else {
      AnswerOutcome::Wrong
    };
    Ok(self.record(index, outcome, Some(input.trim().to_string()), now))
  }

  pub fn reveal(&mut self, now: DateTime<Utc>) -> Result<Transition, SessionError> {
    let index = self.presenting_index("reveal the answer")?;
    Ok(self.record(index, AnswerOutcome::Revealed, None, now))
  }

  pub fn skip(&mut self, now: DateTime<Utc>) -> Result<Transition, SessionError> {
    let index = self.presenting_index("skip")?;
    Ok(self.record(index, AnswerOutcome::Skipped, None, now))
  }

  fn record(
    &mut self,
    index: usize,
    outcome: AnswerOutcome,
    given: Option<String>,
    now: DateTime<Utc>,
  ) -> Transition {
    let updated = srs::review_card(&self.queue[index], outcome.is_correct(), now);
    self.queue[index] = updated.clone();

    if outcome.is_correct() {
      self.correct_count += 1;
    } else {
      self.missed.push(updated.clone());
    }

    self.last_given = given;
    self.phase = Phase::Answered { index, outcome };
    Transition {
      phase: self.phase,
      effects: vec![Effect::SaveCard(updated)],
    }
  }

  /// Move past the feedback for the current word
  pub fn advance(&mut self) -> Result<Transition, SessionError> {
    let index = match self.phase {
      Phase::Answered { index, .. } => index,
      _ => return Err(self.invalid("move to the next word")),
    };
    self.last_given = None;

    if index + 1 < self.queue.len() {
      self.phase = Phase::Presenting { index: index + 1 };
      return Ok(Transition::quiet(self.phase));
    }

    self.phase = Phase::Complete;
    let mut effects = vec![Effect::RecordStudySession {
      words_studied: self.queue.len() as u32,
    }];
    if self.kind == SessionKind::Challenge {
      effects.push(Effect::ReportChallengeScore {
        correct_count: self.correct_count,
      });
    }

    tracing::debug!(
      "{} session complete: {}/{} correct",
      self.kind.as_str(),
      self.correct_count,
      self.queue.len()
    );

    Ok(Transition {
      phase: self.phase,
      effects,
    })
  }

  /// Abandon the session. Cards already answered keep their new schedule.
  pub fn cancel(&mut self) -> Result<Transition, SessionError> {
    if self.phase.is_finished() {
      return Err(self.invalid("cancel"));
    }
    self.phase = Phase::Cancelled;
    Ok(Transition::quiet(self.phase))
  }
}
