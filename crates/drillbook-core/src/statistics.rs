//! Level distribution statistics shown before and after a quiz session.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::Question;

/// Default width of the histogram bars, in characters.
pub const DEFAULT_BAR_WIDTH: usize = 50;

/// One histogram row: how many questions sit at a given level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelRow {
    pub level: i64,
    pub count: usize,
    /// Share of all questions, 0.0..=1.0.
    pub share: f64,
}

/// Distribution of question levels across a question set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelHistogram {
    /// Total number of questions.
    pub total: usize,
    /// Rows sorted by ascending level; levels without questions are omitted.
    pub rows: Vec<LevelRow>,
}

impl LevelHistogram {
    pub fn from_questions<'a, I>(questions: I) -> Self
    where
        I: IntoIterator<Item = &'a Question>,
    {
        let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
        for q in questions {
            *counts.entry(q.level()).or_default() += 1;
        }
        let total: usize = counts.values().sum();
        let rows = counts
            .into_iter()
            .map(|(level, count)| LevelRow {
                level,
                count,
                share: count as f64 / total as f64,
            })
            .collect();
        Self { total, rows }
    }

    /// Share of questions at level 0 or below (not yet learned).
    pub fn unlearned_share(&self) -> f64 {
        self.share_where(|level| level <= 0)
    }

    /// Share of questions above level 0.
    pub fn learned_share(&self) -> f64 {
        self.share_where(|level| level > 0)
    }

    fn share_where(&self, pred: impl Fn(i64) -> bool) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let count: usize = self
            .rows
            .iter()
            .filter(|r| pred(r.level))
            .map(|r| r.count)
            .sum();
        count as f64 / self.total as f64
    }

    /// A fixed-width bar for `row`, `#` filled and space padded.
    pub fn bar(&self, row: &LevelRow, width: usize) -> String {
        let filled = if self.total == 0 {
            0
        } else {
            width * row.count / self.total
        };
        format!("{}{}", "#".repeat(filled), " ".repeat(width - filled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(identifier: u32, history: &[bool]) -> Question {
        let mut q = Question::new(identifier, "Topic", identifier, "text");
        q.history = history.to_vec();
        q
    }

    #[test]
    fn counts_by_level() {
        let questions = vec![
            question(1, &[]),
            question(2, &[]),
            question(3, &[true]),
            question(4, &[false]),
        ];
        let hist = LevelHistogram::from_questions(&questions);
        assert_eq!(hist.total, 4);
        let levels: Vec<(i64, usize)> = hist.rows.iter().map(|r| (r.level, r.count)).collect();
        assert_eq!(levels, vec![(-1, 1), (0, 2), (1, 1)]);
        assert!((hist.unlearned_share() - 0.75).abs() < 1e-9);
        assert!((hist.learned_share() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn bar_scales_to_width() {
        let questions = vec![question(1, &[]), question(2, &[true])];
        let hist = LevelHistogram::from_questions(&questions);
        let bar = hist.bar(&hist.rows[0], 10);
        assert_eq!(bar, "#####     ");
        assert_eq!(bar.len(), 10);
    }

    #[test]
    fn empty_set() {
        let hist = LevelHistogram::from_questions(&Vec::<Question>::new());
        assert_eq!(hist.total, 0);
        assert!(hist.rows.is_empty());
        assert_eq!(hist.learned_share(), 0.0);
    }

    #[test]
    fn serializes_to_json() {
        let hist = LevelHistogram::from_questions(&[question(1, &[true, true])]);
        let json = serde_json::to_string(&hist).unwrap();
        assert!(json.contains("\"level\":2"));
    }
}
