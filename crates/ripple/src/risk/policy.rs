//! Aggregate score policies.
//!
//! The engine combines the target's own risk with the shape of its blast
//! radius through a [`ScorePolicy`]. Swapping the policy changes the score
//! without touching traversal.

use crate::types::ImpactedFile;

/// Turns a target score and its impacted files into a 0-100 total.
pub trait ScorePolicy: Send + Sync + std::fmt::Debug {
    /// Compute the aggregate score.
    fn total_score(&self, target_score: u8, impacted: &[ImpactedFile]) -> u8;
}

/// Target score plus a breadth bonus and a proximity bonus, capped at 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultScorePolicy {
    /// Points per impacted file
    pub breadth_per_file: u32,
    /// Cap on the breadth bonus
    pub breadth_cap: u32,
    /// Points per impacted file within `proximity_window`
    pub proximity_per_file: u32,
    /// Cap on the proximity bonus
    pub proximity_cap: u32,
    /// Largest distance that counts as close
    pub proximity_window: usize,
}

impl Default for DefaultScorePolicy {
    fn default() -> Self {
        Self {
            breadth_per_file: 2,
            breadth_cap: 20,
            proximity_per_file: 3,
            proximity_cap: 15,
            proximity_window: 2,
        }
    }
}

impl ScorePolicy for DefaultScorePolicy {
    fn total_score(&self, target_score: u8, impacted: &[ImpactedFile]) -> u8 {
        let count = u32::try_from(impacted.len()).unwrap_or(u32::MAX);
        let close = u32::try_from(
            impacted
                .iter()
                .filter(|f| f.distance <= self.proximity_window)
                .count(),
        )
        .unwrap_or(u32::MAX);

        let breadth = count.saturating_mul(self.breadth_per_file).min(self.breadth_cap);
        let proximity = close
            .saturating_mul(self.proximity_per_file)
            .min(self.proximity_cap);

        let total = (u32::from(target_score) + breadth + proximity).min(100);
        u8::try_from(total).unwrap_or(100)
    }
}
