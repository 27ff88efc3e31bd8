//! Weighted random question selection.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::model::Question;

/// Pick the index of one question, weighted by [`Question::weight`].
///
/// Returns `None` when there is nothing left to drill: the set is empty or
/// every question is mastered (all weights zero).
pub fn select_weighted<R: Rng + ?Sized>(questions: &[Question], rng: &mut R) -> Option<usize> {
    let weights: Vec<u32> = questions.iter().map(Question::weight).collect();
    select_by_weights(&weights, rng)
}

/// Pick an index from raw weights; `None` if no weight is positive.
pub fn select_by_weights<R: Rng + ?Sized>(weights: &[u32], rng: &mut R) -> Option<usize> {
    let total: u64 = weights.iter().map(|&w| u64::from(w)).sum();
    if total == 0 {
        return None;
    }
    // u32 weights would overflow the u32 sum inside WeightedIndex, so widen.
    let wide: Vec<u64> = weights.iter().map(|&w| u64::from(w)).collect();
    let dist = WeightedIndex::new(&wide).ok()?;
    Some(dist.sample(rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn question(identifier: u32, history: &[bool]) -> Question {
        let mut q = Question::new(identifier, "Topic", identifier, "text");
        q.answers = vec!["a".into(), "b".into(), "c".into(), "d".into()];
        q.history = history.to_vec();
        q
    }

    #[test]
    fn empty_set_selects_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(select_weighted(&[], &mut rng), None);
    }

    #[test]
    fn all_mastered_selects_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        let mastered = vec![true; 6];
        let questions = vec![question(1, &mastered), question(2, &mastered)];
        assert_eq!(select_weighted(&questions, &mut rng), None);
    }

    #[test]
    fn mastered_questions_are_never_drawn() {
        let mut rng = StdRng::seed_from_u64(7);
        let questions = vec![
            question(1, &[true; 6]),
            question(2, &[]),
            question(3, &[true; 8]),
        ];
        for _ in 0..200 {
            assert_eq!(select_weighted(&questions, &mut rng), Some(1));
        }
    }

    #[test]
    fn wrong_answers_are_oversampled() {
        let mut rng = StdRng::seed_from_u64(42);
        // weight 150 vs weight 1
        let questions = vec![question(1, &[false; 10]), question(2, &[true; 5])];
        let mut hits = [0usize; 2];
        for _ in 0..2000 {
            let idx = select_weighted(&questions, &mut rng).unwrap();
            hits[idx] += 1;
        }
        assert!(hits[0] > hits[1] * 20, "hits: {hits:?}");
    }

    #[test]
    fn extreme_weights_do_not_overflow() {
        let mut rng = StdRng::seed_from_u64(3);
        let weights = [u32::MAX, u32::MAX, 0];
        let idx = select_by_weights(&weights, &mut rng).unwrap();
        assert!(idx < 2);
    }
}
