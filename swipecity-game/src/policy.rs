use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BINARY_PREVIEW_THRESHOLD, DEFAULT_COMMIT_DELAY_MS, DEFAULT_COMMIT_THRESHOLD,
    DEFAULT_EXIT_DISTANCE, DEFAULT_OCTANT_PREVIEW_THRESHOLD, DEFAULT_ROUND_BREAK_DELAY_MS,
    DEFAULT_ROUND_SIZE,
};

/// How the game leaves a round-break interstitial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RoundBreakAdvance {
    /// Wait for the player to continue.
    Manual,
    /// Continue on its own after `delay_ms`; the player may still skip ahead.
    AutoAdvance { delay_ms: u32 },
}

impl RoundBreakAdvance {
    #[must_use]
    pub const fn delay_ms(self) -> Option<u32> {
        match self {
            Self::Manual => None,
            Self::AutoAdvance { delay_ms } => Some(delay_ms),
        }
    }
}

impl Default for RoundBreakAdvance {
    fn default() -> Self {
        Self::AutoAdvance {
            delay_ms: DEFAULT_ROUND_BREAK_DELAY_MS,
        }
    }
}

/// Tunables for gestures and progression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GamePolicy {
    pub commit_threshold: f64,
    pub binary_preview_threshold: f64,
    pub octant_preview_threshold: f64,
    pub exit_distance: f64,
    pub commit_delay_ms: u32,
    /// Questions per round; a break is shown between rounds. Zero disables breaks.
    pub round_size: usize,
    pub round_break: RoundBreakAdvance,
    /// When false, fresh and restarted games open directly on the first question.
    pub intro_screen: bool,
}

impl Default for GamePolicy {
    fn default() -> Self {
        Self {
            commit_threshold: DEFAULT_COMMIT_THRESHOLD,
            binary_preview_threshold: DEFAULT_BINARY_PREVIEW_THRESHOLD,
            octant_preview_threshold: DEFAULT_OCTANT_PREVIEW_THRESHOLD,
            exit_distance: DEFAULT_EXIT_DISTANCE,
            commit_delay_ms: DEFAULT_COMMIT_DELAY_MS,
            round_size: DEFAULT_ROUND_SIZE,
            round_break: RoundBreakAdvance::default(),
            intro_screen: true,
        }
    }
}

impl GamePolicy {
    /// Load a policy from JSON, filling omitted fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Whether arriving at `next_index` should open a round break.
    #[must_use]
    pub const fn is_round_boundary(&self, next_index: usize, question_count: usize) -> bool {
        self.round_size > 0
            && next_index > 0
            && next_index < question_count
            && next_index % self.round_size == 0
    }

    /// One-based round the question at `index` belongs to.
    #[must_use]
    pub const fn round_number(&self, index: usize) -> usize {
        if self.round_size == 0 {
            return 1;
        }
        index / self.round_size + 1
    }

    #[must_use]
    pub const fn total_rounds(&self, question_count: usize) -> usize {
        if self.round_size == 0 {
            return 1;
        }
        question_count.div_ceil(self.round_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_cadence() {
        let policy = GamePolicy::default();
        let breaks: Vec<usize> = (0..=20)
            .filter(|&next| policy.is_round_boundary(next, 20))
            .collect();
        assert_eq!(breaks, vec![5, 10, 15]);
        assert_eq!(policy.round_break.delay_ms(), Some(3_000));
        assert_eq!(policy.total_rounds(20), 4);
        assert_eq!(policy.total_rounds(21), 5);
    }

    #[test]
    fn round_number_matches_ceiling_form() {
        let policy = GamePolicy::default();
        for index in 0..20 {
            assert_eq!(policy.round_number(index), (index + 1).div_ceil(5));
        }
    }

    #[test]
    fn zero_round_size_disables_breaks() {
        let policy = GamePolicy {
            round_size: 0,
            ..GamePolicy::default()
        };
        assert!(!(0..20).any(|next| policy.is_round_boundary(next, 20)));
        assert_eq!(policy.round_number(12), 1);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let policy =
            GamePolicy::from_json(r#"{"round_size": 4, "round_break": {"mode": "manual"}}"#)
                .unwrap();
        assert_eq!(policy.round_size, 4);
        assert_eq!(policy.round_break, RoundBreakAdvance::Manual);
        assert!((policy.commit_threshold - 100.0).abs() < f64::EPSILON);
        assert!(policy.intro_screen);
    }
}
