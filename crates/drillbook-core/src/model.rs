//! Core data model types for drillbook.
//!
//! A [`Catalog`] owns its [`Topic`]s, and each topic owns its [`Question`]s.
//! Questions are identified by their catalog `identifier`, never by position.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::weighting;

/// Number of answers every question carries.
pub const ANSWER_COUNT: usize = 4;

/// Separator used to join multi-line answer fragments.
pub const ANSWER_SEPARATOR: &str = " :: ";

/// A multiple-choice question together with its answer history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// Catalog-wide identifier, stable across catalog regenerations.
    pub identifier: u32,
    /// Name of the topic this question belongs to.
    pub topic_name: String,
    /// Display order within the topic.
    pub ordinal_in_topic: u32,
    /// The question prompt.
    pub text: String,
    /// Exactly four answers; index 0 is the correct one.
    pub answers: Vec<String>,
    /// Whether a picture resource belongs to this question.
    pub has_picture: bool,
    /// One entry per attempt, `true` when answered correctly on the first try.
    pub history: Vec<bool>,
}

impl Question {
    pub fn new(identifier: u32, topic_name: &str, ordinal_in_topic: u32, text: &str) -> Self {
        Self {
            identifier,
            topic_name: topic_name.to_string(),
            ordinal_in_topic,
            text: text.to_string(),
            answers: Vec::with_capacity(ANSWER_COUNT),
            has_picture: false,
            history: Vec::new(),
        }
    }

    /// The correct answer.
    pub fn correct_answer(&self) -> &str {
        self.answers.first().map(String::as_str).unwrap_or_default()
    }

    pub fn correct_count(&self) -> usize {
        self.history.iter().filter(|&&ok| ok).count()
    }

    pub fn false_count(&self) -> usize {
        self.history.len() - self.correct_count()
    }

    /// Correct attempts minus incorrect attempts.
    pub fn level(&self) -> i64 {
        self.correct_count() as i64 - self.false_count() as i64
    }

    /// Sampling weight derived from [`Question::level`].
    pub fn weight(&self) -> u32 {
        weighting::weight(self.level())
    }

    /// Where the picture for this question lives below `assets_dir`.
    pub fn picture_path(&self, assets_dir: &Path) -> Option<PathBuf> {
        self.has_picture
            .then(|| assets_dir.join(format!("q{}.png", self.identifier)))
    }

    /// Record the first-try outcome of one presentation.
    pub fn record(&mut self, first_try_correct: bool) {
        self.history.push(first_try_correct);
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) {}", self.identifier, self.ordinal_in_topic, self.text)
    }
}

/// Render a stored answer for display, turning joined fragments into lines.
pub fn display_answer(answer: &str) -> String {
    answer.replace(ANSWER_SEPARATOR, "\n   ")
}

/// A named group of questions, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    pub name: String,
    pub questions: Vec<Question>,
}

impl Topic {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            questions: Vec::new(),
        }
    }

    /// Whether this is a regional topic (excluded by the regional filter).
    pub fn is_regional(&self) -> bool {
        self.name.contains("Regional")
    }
}

/// The parsed question catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    /// Topics in order of first appearance.
    pub topics: Vec<Topic>,
}

impl Catalog {
    pub fn question_count(&self) -> usize {
        self.topics.iter().map(|t| t.questions.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.question_count() == 0
    }

    pub fn topic(&self, name: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.name == name)
    }

    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.topics.iter().flat_map(|t| t.questions.iter())
    }

    pub fn questions_mut(&mut self) -> impl Iterator<Item = &mut Question> {
        self.topics.iter_mut().flat_map(|t| t.questions.iter_mut())
    }

    /// Keep only the topics for which `keep` returns true. Returns the names
    /// of the removed topics.
    pub fn retain_topics<F>(&mut self, mut keep: F) -> Vec<String>
    where
        F: FnMut(&Topic) -> bool,
    {
        let mut removed = Vec::new();
        self.topics.retain(|t| {
            let kept = keep(t);
            if !kept {
                removed.push(t.name.clone());
            }
            kept
        });
        removed
    }

    /// Flatten the catalog into an owned question list, in catalog order.
    pub fn into_questions(self) -> Vec<Question> {
        self.topics
            .into_iter()
            .flat_map(|t| t.questions.into_iter())
            .collect()
    }
}

/// Per-topic question count, as reported by `validate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicSummary {
    pub name: String,
    pub question_count: usize,
    pub with_picture: usize,
}

impl From<&Topic> for TopicSummary {
    fn from(topic: &Topic) -> Self {
        Self {
            name: topic.name.clone(),
            question_count: topic.questions.len(),
            with_picture: topic.questions.iter().filter(|q| q.has_picture).count(),
        }
    }
}
