//! Catalog text parser.
//!
//! Turns the flat-text export of a question catalog into a [`Catalog`]. The
//! input is processed line by line; each normalised line is classified and
//! fed to a small state machine that tracks the open question and the answer
//! currently being accumulated.

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;

use crate::error::ParseError;
use crate::model::{Catalog, Question, Topic, ANSWER_COUNT, ANSWER_SEPARATOR};

/// Line marking a question whose picture is expected in the assets directory.
pub const PICTURE_MARKER: &str = "BILD FEHLT";

static TOPIC_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^# \d+ (.*)$").expect("topic header pattern is valid"));

static QUESTION_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+) \((\d+)\) (.*)$").expect("question header pattern is valid")
});

static ANSWER_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^□ [ABCD] (.*)$").expect("answer marker pattern is valid"));

static SPACE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" {2,}").expect("space run pattern is valid"));

/// Where the parser stands between two lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    /// No question is open; waiting for a topic or question header.
    SeekingHeader,
    /// An answer is being accumulated and may continue on the next line.
    AccumulatingAnswer,
    /// A question is open but no answer has started yet.
    BetweenAnswers,
}

/// The shape of one normalised catalog line.
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Topic(&'a str),
    Question {
        identifier: &'a str,
        ordinal: &'a str,
        text: &'a str,
    },
    Picture,
    Answer(&'a str),
    Continuation(&'a str),
}

fn classify(line: &str) -> Line<'_> {
    if let Some(caps) = TOPIC_HEADER.captures(line) {
        let name = caps.get(1).map_or("", |m| m.as_str());
        return Line::Topic(name);
    }
    if let Some(caps) = QUESTION_HEADER.captures(line) {
        return Line::Question {
            identifier: caps.get(1).map_or("", |m| m.as_str()),
            ordinal: caps.get(2).map_or("", |m| m.as_str()),
            text: caps.get(3).map_or("", |m| m.as_str()),
        };
    }
    if line == PICTURE_MARKER {
        return Line::Picture;
    }
    if let Some(caps) = ANSWER_MARKER.captures(line) {
        return Line::Answer(caps.get(1).map_or("", |m| m.as_str()));
    }
    Line::Continuation(line)
}

/// Normalise a raw line: drop a byte-order mark, turn tabs into spaces,
/// collapse runs of spaces and trim.
pub fn normalize_line(raw: &str) -> String {
    let line = raw.trim_start_matches('\u{feff}').replace('\t', " ");
    SPACE_RUNS.replace_all(&line, " ").trim().to_string()
}

/// Incremental catalog builder driven one line at a time.
#[derive(Debug, Default)]
pub struct CatalogParser {
    catalog: Catalog,
    current_topic: Option<usize>,
    question: Option<Question>,
    answer_buffer: Vec<String>,
    seen_identifiers: HashSet<u32>,
    line_number: usize,
}

impl CatalogParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ParserState {
        match (&self.question, self.answer_buffer.is_empty()) {
            (None, _) => ParserState::SeekingHeader,
            (Some(_), false) => ParserState::AccumulatingAnswer,
            (Some(_), true) => ParserState::BetweenAnswers,
        }
    }

    /// Feed one raw line.
    pub fn feed(&mut self, raw: &str) -> Result<(), ParseError> {
        self.line_number += 1;
        let line = normalize_line(raw);
        if line.is_empty() {
            return Ok(());
        }

        match classify(&line) {
            Line::Topic(name) => {
                self.close_question()?;
                self.current_topic = Some(self.topic_index(name));
            }
            Line::Question {
                identifier,
                ordinal,
                text,
            } => {
                self.close_question()?;
                self.open_question(identifier, ordinal, text, &line)?;
            }
            Line::Picture => match self.question.as_mut() {
                Some(question) => question.has_picture = true,
                None => return Err(self.no_open_question(&line)),
            },
            Line::Answer(text) => {
                if self.question.is_none() {
                    return Err(self.no_open_question(&line));
                }
                self.flush_answer();
                self.answer_buffer.push(text.to_string());
            }
            Line::Continuation(text) => match self.state() {
                ParserState::AccumulatingAnswer => self.answer_buffer.push(text.to_string()),
                ParserState::BetweenAnswers => {
                    return Err(ParseError::NoOpenAnswer {
                        line_number: self.line_number,
                        line: text.to_string(),
                    })
                }
                ParserState::SeekingHeader => return Err(self.no_open_question(&line)),
            },
        }
        Ok(())
    }

    /// Close the last question and return the catalog.
    pub fn finish(mut self) -> Result<Catalog, ParseError> {
        self.close_question()?;
        Ok(self.catalog)
    }

    fn topic_index(&mut self, name: &str) -> usize {
        if let Some(idx) = self.catalog.topics.iter().position(|t| t.name == name) {
            return idx;
        }
        self.catalog.topics.push(Topic::new(name));
        self.catalog.topics.len() - 1
    }

    fn open_question(
        &mut self,
        identifier: &str,
        ordinal: &str,
        text: &str,
        line: &str,
    ) -> Result<(), ParseError> {
        let invalid_number = || ParseError::InvalidNumber {
            line_number: self.line_number,
            line: line.to_string(),
        };
        let identifier: u32 = identifier.parse().map_err(|_| invalid_number())?;
        let ordinal: u32 = ordinal.parse().map_err(|_| invalid_number())?;

        let Some(topic_idx) = self.current_topic else {
            return Err(ParseError::QuestionOutsideTopic {
                line_number: self.line_number,
                line: line.to_string(),
            });
        };
        if !self.seen_identifiers.insert(identifier) {
            return Err(ParseError::DuplicateIdentifier {
                identifier,
                line_number: self.line_number,
            });
        }

        let topic_name = &self.catalog.topics[topic_idx].name;
        self.question = Some(Question::new(identifier, topic_name, ordinal, text));
        Ok(())
    }

    fn flush_answer(&mut self) {
        if self.answer_buffer.is_empty() {
            return;
        }
        let answer = self.answer_buffer.join(ANSWER_SEPARATOR);
        self.answer_buffer.clear();
        if let Some(question) = self.question.as_mut() {
            question.answers.push(answer);
        }
    }

    fn close_question(&mut self) -> Result<(), ParseError> {
        self.flush_answer();
        let Some(question) = self.question.take() else {
            return Ok(());
        };
        if question.answers.len() != ANSWER_COUNT {
            return Err(ParseError::WrongAnswerCount {
                identifier: question.identifier,
                text: question.text,
                found: question.answers.len(),
            });
        }
        // A question is only ever opened inside a topic.
        if let Some(topic) = self
            .current_topic
            .and_then(|idx| self.catalog.topics.get_mut(idx))
        {
            topic.questions.push(question);
        }
        Ok(())
    }

    fn no_open_question(&self, line: &str) -> ParseError {
        ParseError::NoOpenQuestion {
            line_number: self.line_number,
            line: line.to_string(),
        }
    }
}

/// Parse catalog text.
pub fn parse_catalog(content: &str) -> Result<Catalog, ParseError> {
    let mut parser = CatalogParser::new();
    for line in content.lines() {
        parser.feed(line)?;
    }
    parser.finish()
}

/// Read and parse a catalog file.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog: {}", path.display()))?;

    let catalog = parse_catalog(&content)
        .with_context(|| format!("malformed catalog: {}", path.display()))?;

    tracing::info!(
        topics = catalog.topics.len(),
        questions = catalog.question_count(),
        "loaded catalog {}",
        path.display()
    );
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_CATALOG: &str = "\u{feff}# 1 Basisfragen
1 (1) Was ist ein Kegel?
□ A Ein Zeichen
□ B Ein Schiff
□ C Ein Hafen
□ D Ein Anker
2 (2) Welche Farbe hat die Backbordseite?
BILD FEHLT
□ A Rot
□ B Grün
□ C Weiß
□ D Gelb

# 2 Navigation
7 (1)\tWo  ist   Norden?
□ A Oben
auf der Karte
□ B Unten
□ C Links
□ D Rechts
";

    #[test]
    fn parse_valid_catalog() {
        let catalog = parse_catalog(VALID_CATALOG).unwrap();
        assert_eq!(catalog.topics.len(), 2);
        assert_eq!(catalog.question_count(), 3);
        assert_eq!(
            catalog.question_count(),
            catalog.topics.iter().map(|t| t.questions.len()).sum::<usize>()
        );
        for q in catalog.questions() {
            assert_eq!(q.answers.len(), ANSWER_COUNT);
        }

        let basis = &catalog.topics[0];
        assert_eq!(basis.name, "Basisfragen");
        assert_eq!(basis.questions[0].identifier, 1);
        assert_eq!(basis.questions[0].correct_answer(), "Ein Zeichen");
        assert!(!basis.questions[0].has_picture);
        assert!(basis.questions[1].has_picture);
    }

    #[test]
    fn normalises_whitespace_and_joins_fragments() {
        let catalog = parse_catalog(VALID_CATALOG).unwrap();
        let nav = catalog.topic("Navigation").unwrap();
        let q = &nav.questions[0];
        assert_eq!(q.identifier, 7);
        assert_eq!(q.ordinal_in_topic, 1);
        assert_eq!(q.text, "Wo ist Norden?");
        assert_eq!(q.topic_name, "Navigation");
        assert_eq!(q.answers[0], "Oben :: auf der Karte");
    }

    #[test]
    fn last_question_is_flushed_at_end_of_input() {
        let catalog = parse_catalog("# 1 T\n5 (1) Q\n□ A a\n□ B b\n□ C c\n□ D d").unwrap();
        assert_eq!(catalog.question_count(), 1);
        assert_eq!(catalog.topics[0].questions[0].answers[3], "d");
    }

    #[test]
    fn three_answers_is_fatal() {
        let text = "# 1 T\n5 (1) Zu wenig?\n□ A a\n□ B b\n□ C c\n6 (2) Next\n";
        let err = parse_catalog(text).unwrap_err();
        assert_eq!(
            err,
            ParseError::WrongAnswerCount {
                identifier: 5,
                text: "Zu wenig?".into(),
                found: 3,
            }
        );
    }

    #[test]
    fn wrong_answer_count_at_end_of_input_is_fatal() {
        let text = "# 1 T\n5 (1) Q\n□ A a\n□ B b\n□ C c\n□ D d\n□ A e\n";
        let err = parse_catalog(text).unwrap_err();
        assert!(matches!(err, ParseError::WrongAnswerCount { found: 5, .. }));
    }

    #[test]
    fn continuation_without_question_is_fatal() {
        let err = parse_catalog("# 1 T\nstray line\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::NoOpenQuestion {
                line_number: 2,
                line: "stray line".into(),
            }
        );
    }

    #[test]
    fn continuation_before_first_answer_is_fatal() {
        let err = parse_catalog("# 1 T\n5 (1) Q\nmore question text\n").unwrap_err();
        assert!(matches!(err, ParseError::NoOpenAnswer { line_number: 3, .. }));
    }

    #[test]
    fn picture_marker_without_question_is_fatal() {
        let err = parse_catalog("# 1 T\nBILD FEHLT\n").unwrap_err();
        assert!(matches!(err, ParseError::NoOpenQuestion { .. }));
    }

    #[test]
    fn question_before_topic_is_fatal() {
        let err = parse_catalog("5 (1) Q\n").unwrap_err();
        assert!(matches!(err, ParseError::QuestionOutsideTopic { line_number: 1, .. }));
    }

    #[test]
    fn duplicate_identifier_is_fatal() {
        let text = "# 1 T\n5 (1) Q\n□ A a\n□ B b\n□ C c\n□ D d\n5 (2) Q\n";
        let err = parse_catalog(text).unwrap_err();
        assert_eq!(
            err,
            ParseError::DuplicateIdentifier {
                identifier: 5,
                line_number: 7,
            }
        );
    }

    #[test]
    fn oversized_identifier_is_fatal() {
        let err = parse_catalog("# 1 T\n99999999999 (1) Q\n").unwrap_err();
        assert!(matches!(err, ParseError::InvalidNumber { line_number: 2, .. }));
    }

    #[test]
    fn repeated_topic_header_appends() {
        let text = "# 1 T\n1 (1) Q\n□ A a\n□ B b\n□ C c\n□ D d\n\
                    # 2 U\n2 (1) Q\n□ A a\n□ B b\n□ C c\n□ D d\n\
                    # 1 T\n3 (2) Q\n□ A a\n□ B b\n□ C c\n□ D d\n";
        let catalog = parse_catalog(text).unwrap();
        assert_eq!(catalog.topics.len(), 2);
        assert_eq!(catalog.topic("T").unwrap().questions.len(), 2);
    }

    #[test]
    fn parser_states() {
        let mut parser = CatalogParser::new();
        assert_eq!(parser.state(), ParserState::SeekingHeader);
        parser.feed("# 1 T").unwrap();
        parser.feed("1 (1) Q").unwrap();
        assert_eq!(parser.state(), ParserState::BetweenAnswers);
        parser.feed("□ A a").unwrap();
        assert_eq!(parser.state(), ParserState::AccumulatingAnswer);
    }

    #[test]
    fn normalize_line_cleans_input() {
        assert_eq!(normalize_line("\u{feff}# 1\tTopic  name  "), "# 1 Topic name");
    }

    #[test]
    fn load_catalog_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.txt");
        std::fs::write(&path, VALID_CATALOG).unwrap();
        let catalog = load_catalog(&path).unwrap();
        assert_eq!(catalog.question_count(), 3);
    }

    #[test]
    fn load_missing_catalog_fails() {
        let err = load_catalog(Path::new("does-not-exist.txt")).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read catalog"));
    }
}
