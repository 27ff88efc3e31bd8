//! Quiz session controller.
//!
//! Drives the select → present → answer → record loop over the active
//! questions. Terminal I/O and picture display sit behind the [`QuizIo`] and
//! [`PictureViewer`] traits so the loop itself stays free of side effects
//! other than the progress file.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::Result;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::model::Question;
use crate::progress::{ProgressStore, Reconciliation};
use crate::selection::select_weighted;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One event from the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A line of user input, without the trailing newline.
    Line(String),
    /// The user pressed Ctrl-C.
    Interrupted,
    /// Input ended (EOF).
    Closed,
}

/// What a line of input asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Pick the answer at this 0-based display position.
    Choose(usize),
    /// Print the question identifier.
    ShowIdentifier,
    Quit,
    /// Not a command; ask again.
    Invalid,
}

/// Interpret a line of input for a question with `answer_count` answers.
pub fn parse_command(input: &str, answer_count: usize) -> Command {
    match input.trim() {
        "q" | "quit" => Command::Quit,
        "i" | "id" => Command::ShowIdentifier,
        other => match other.parse::<usize>() {
            Ok(n) if (1..=answer_count).contains(&n) => Command::Choose(n - 1),
            _ => Command::Invalid,
        },
    }
}

// ---------------------------------------------------------------------------
// Presentation and outcome
// ---------------------------------------------------------------------------

/// Answers of one question in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    /// Index of the question in the session's question list.
    pub question_index: usize,
    /// `order[position]` is the original answer index shown at `position`.
    pub order: Vec<usize>,
    /// Display position of the correct answer (original index 0).
    pub correct_position: usize,
}

impl Presentation {
    pub fn shuffled<R: Rng + ?Sized>(question_index: usize, answer_count: usize, rng: &mut R) -> Self {
        let mut order: Vec<usize> = (0..answer_count).collect();
        order.shuffle(rng);
        let correct_position = order.iter().position(|&i| i == 0).unwrap_or(0);
        Self {
            question_index,
            order,
            correct_position,
        }
    }

    /// Answers of `question` in display order.
    pub fn answers<'q>(&'q self, question: &'q Question) -> impl Iterator<Item = &'q str> + 'q {
        self.order
            .iter()
            .filter_map(move |&i| question.answers.get(i).map(String::as_str))
    }
}

/// Why a presentation was cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CancelReason {
    Quit,
    Interrupted,
}

/// Result of asking one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Right on the first try.
    Correct,
    /// Wrong first try, then right.
    Incorrect,
    /// The user left before answering correctly; nothing is recorded.
    Cancelled(CancelReason),
}

/// Messages the controller sends back while waiting for an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    /// The choice was wrong; the correct display position is revealed.
    WrongAnswer { correct_position: usize },
    /// The identifier of the current question.
    Identifier(u32),
    /// Input was not a command.
    InvalidInput,
}

/// Terminal side of a quiz session.
pub trait QuizIo {
    /// Show a question with its answers in presentation order.
    fn present(&mut self, question: &Question, presentation: &Presentation) -> io::Result<()>;

    fn feedback(&mut self, feedback: Feedback) -> io::Result<()>;

    /// Block until the next input event.
    fn next_input(&mut self) -> io::Result<InputEvent>;
}

/// Displays question pictures. At most one picture is open at a time.
pub trait PictureViewer {
    fn show(&mut self, path: &Path) -> Result<()>;

    /// Release whatever [`PictureViewer::show`] opened. Must be idempotent.
    fn close(&mut self);
}

/// Viewer that only logs picture paths.
#[derive(Debug, Default)]
pub struct LogOnlyViewer;

impl PictureViewer for LogOnlyViewer {
    fn show(&mut self, path: &Path) -> Result<()> {
        tracing::info!("picture for this question: {}", path.display());
        Ok(())
    }

    fn close(&mut self) {}
}

/// Ask one question until it is answered correctly or the user leaves.
///
/// Only the first choice counts toward correctness; after a wrong guess the
/// user must still pick the right answer to move on.
pub fn ask<I: QuizIo + ?Sized>(
    io: &mut I,
    question: &Question,
    presentation: &Presentation,
) -> io::Result<Outcome> {
    let mut first_try = true;
    loop {
        let line = match io.next_input()? {
            InputEvent::Line(line) => line,
            InputEvent::Interrupted => return Ok(Outcome::Cancelled(CancelReason::Interrupted)),
            InputEvent::Closed => return Ok(Outcome::Cancelled(CancelReason::Quit)),
        };

        match parse_command(&line, presentation.order.len()) {
            Command::Quit => return Ok(Outcome::Cancelled(CancelReason::Quit)),
            Command::ShowIdentifier => io.feedback(Feedback::Identifier(question.identifier))?,
            Command::Invalid => io.feedback(Feedback::InvalidInput)?,
            Command::Choose(position) if position == presentation.correct_position => {
                return Ok(if first_try {
                    Outcome::Correct
                } else {
                    Outcome::Incorrect
                });
            }
            Command::Choose(_) => {
                first_try = false;
                io.feedback(Feedback::WrongAnswer {
                    correct_position: presentation.correct_position,
                })?;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Session controller
// ---------------------------------------------------------------------------

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationReason {
    /// Explicit quit command or end of input.
    Quit,
    /// Keyboard interrupt.
    Interrupted,
    /// Every active question is mastered.
    Exhausted,
}

impl From<CancelReason> for TerminationReason {
    fn from(reason: CancelReason) -> Self {
        match reason {
            CancelReason::Quit => TerminationReason::Quit,
            CancelReason::Interrupted => TerminationReason::Interrupted,
        }
    }
}

/// States of the session loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Selecting,
    Presenting(usize),
    AwaitingAnswer(Presentation),
    Recording {
        question_index: usize,
        first_try_correct: bool,
    },
    Terminating(TerminationReason),
}

/// What happened during one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Questions answered (recorded) this session.
    pub asked: usize,
    /// Of those, answered correctly on the first try.
    pub first_try_correct: usize,
    pub reason: TerminationReason,
}

/// A quiz over an owned question set, backed by a progress file.
#[derive(Debug)]
pub struct QuizSession {
    questions: Vec<Question>,
    store: ProgressStore,
    assets_dir: PathBuf,
    reconciliation: Reconciliation,
    asked: usize,
    first_try_correct: usize,
}

impl QuizSession {
    /// Load prior progress into `questions` and prepare the session.
    pub fn start(
        mut questions: Vec<Question>,
        store: ProgressStore,
        assets_dir: impl Into<PathBuf>,
    ) -> Result<Self, StoreError> {
        let reconciliation = store.load(&mut questions)?;
        Ok(Self {
            questions,
            store,
            assets_dir: assets_dir.into(),
            reconciliation,
            asked: 0,
            first_try_correct: 0,
        })
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn reconciliation(&self) -> &Reconciliation {
        &self.reconciliation
    }

    /// Run the loop until the user leaves or every question is mastered,
    /// then write all histories (orphans included) back to the store.
    ///
    /// Histories are flushed even when terminal I/O fails mid-session.
    pub fn run<I, V, R>(&mut self, io: &mut I, viewer: &mut V, rng: &mut R) -> Result<SessionSummary>
    where
        I: QuizIo + ?Sized,
        V: PictureViewer + ?Sized,
        R: Rng + ?Sized,
    {
        let outcome = self.drive(io, viewer, rng);
        viewer.close();
        self.save()?;
        let reason = outcome?;

        Ok(SessionSummary {
            asked: self.asked,
            first_try_correct: self.first_try_correct,
            reason,
        })
    }

    /// Write the current histories and orphans.
    pub fn save(&self) -> Result<(), StoreError> {
        self.store.save(&self.questions, &self.reconciliation.orphans)
    }

    fn drive<I, V, R>(&mut self, io: &mut I, viewer: &mut V, rng: &mut R) -> io::Result<TerminationReason>
    where
        I: QuizIo + ?Sized,
        V: PictureViewer + ?Sized,
        R: Rng + ?Sized,
    {
        let mut state = SessionState::Idle;
        loop {
            state = match state {
                SessionState::Idle => SessionState::Selecting,
                SessionState::Selecting => match select_weighted(&self.questions, rng) {
                    Some(idx) => SessionState::Presenting(idx),
                    None => SessionState::Terminating(TerminationReason::Exhausted),
                },
                SessionState::Presenting(idx) => {
                    viewer.close();
                    let question = &self.questions[idx];
                    if let Some(path) = question.picture_path(&self.assets_dir) {
                        self.show_picture(viewer, &path);
                    }
                    let presentation = Presentation::shuffled(idx, question.answers.len(), rng);
                    io.present(question, &presentation)?;
                    SessionState::AwaitingAnswer(presentation)
                }
                SessionState::AwaitingAnswer(presentation) => {
                    let question = &self.questions[presentation.question_index];
                    match ask(io, question, &presentation)? {
                        Outcome::Correct => SessionState::Recording {
                            question_index: presentation.question_index,
                            first_try_correct: true,
                        },
                        Outcome::Incorrect => SessionState::Recording {
                            question_index: presentation.question_index,
                            first_try_correct: false,
                        },
                        Outcome::Cancelled(reason) => SessionState::Terminating(reason.into()),
                    }
                }
                SessionState::Recording {
                    question_index,
                    first_try_correct,
                } => {
                    self.questions[question_index].record(first_try_correct);
                    self.asked += 1;
                    if first_try_correct {
                        self.first_try_correct += 1;
                    }
                    SessionState::Selecting
                }
                SessionState::Terminating(reason) => {
                    tracing::debug!(?reason, asked = self.asked, "session terminating");
                    return Ok(reason);
                }
            };
        }
    }

    fn show_picture<V: PictureViewer + ?Sized>(&self, viewer: &mut V, path: &Path) {
        if !path.exists() {
            tracing::warn!("picture not found: {}", path.display());
            return;
        }
        if let Err(e) = viewer.show(path) {
            tracing::warn!("failed to show picture {}: {e:#}", path.display());
        }
    }
}
