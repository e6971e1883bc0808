//! Centralized tuning constants for Swipe City game logic.
//!
//! Gesture distances are expressed in device-independent pixels. Keeping the
//! defaults together means gameplay feel can only drift through a reviewed
//! code change rather than through stray literals in the presentation layer.

// Gesture thresholds --------------------------------------------------------
pub const DEFAULT_COMMIT_THRESHOLD: f64 = 100.0;
pub const DEFAULT_BINARY_PREVIEW_THRESHOLD: f64 = 50.0;
pub const DEFAULT_OCTANT_PREVIEW_THRESHOLD: f64 = 30.0;
pub const DEFAULT_EXIT_DISTANCE: f64 = 1_500.0;
pub const DEFAULT_COMMIT_DELAY_MS: u32 = 200;
/// Fraction of the commit threshold a drag may fall short by and still commit.
/// Absorbs float rounding only; it scales with the threshold.
pub const COMMIT_RELATIVE_TOLERANCE: f64 = 1e-5;

// Octant geometry -----------------------------------------------------------
pub(crate) const OCTANT_WIDTH_DEG: f64 = 45.0;
pub(crate) const OCTANT_HALF_WIDTH_DEG: f64 = 22.5;
pub(crate) const FULL_TURN_DEG: f64 = 360.0;

// Progression ---------------------------------------------------------------
pub const DEFAULT_ROUND_SIZE: usize = 5;
pub const DEFAULT_ROUND_BREAK_DELAY_MS: u32 = 3_000;

// Persistence ---------------------------------------------------------------
/// Well-known key the saved game snapshot lives under.
pub const STORAGE_KEY: &str = "whereToMoveGameState";
