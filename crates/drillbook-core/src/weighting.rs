//! Weighting model: maps a question's level to a relative sampling weight.
//!
//! Weights are not probabilities; they are consumed by a weighted random
//! choice over the active question set (see [`crate::selection`]).

/// Levels above this are considered mastered and retired from rotation.
pub const MASTERY_LEVEL: i64 = 5;

/// Weight multiplier per net wrong answer.
pub const WRONG_ANSWER_FACTOR: u32 = 15;

/// Weights for levels `0..=MASTERY_LEVEL`, indexed by level.
const LEVEL_WEIGHTS: [u32; 6] = [12, 11, 5, 3, 2, 1];

/// Sampling weight for a question at `level`.
///
/// - `level > 5`: 0, the question is mastered.
/// - `level < 0`: `-level * 15`, so net-wrong questions dominate the draw.
/// - otherwise a descending table: 12, 11, 5, 3, 2, 1.
pub fn weight(level: i64) -> u32 {
    if level > MASTERY_LEVEL {
        return 0;
    }
    if level < 0 {
        let wrong = u32::try_from(level.unsigned_abs()).unwrap_or(u32::MAX);
        return wrong.saturating_mul(WRONG_ANSWER_FACTOR);
    }
    LEVEL_WEIGHTS[level as usize]
}

/// The division-based policy of older save files: `5 / max(1, level)`,
/// 0 above the mastery level.
///
/// Kept for reference when reasoning about old progress; new selections
/// always use [`weight`].
pub fn legacy_weight(level: i64) -> f64 {
    if level > MASTERY_LEVEL {
        return 0.0;
    }
    5.0 / level.max(1) as f64
}
