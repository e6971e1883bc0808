//! Direction classification for swipe gestures.
//!
//! Offsets follow screen coordinates: positive `dx` points right and positive
//! `dy` points *down*, so `atan2(dy, dx)` yields 0° for right, 90° for down,
//! -90° for up and ±180° for left.
//!
//! The circle is split into eight 45° sectors centred on each direction.
//! Every sector is inclusive at its lower bound and exclusive at its upper
//! bound, walking clockwise from `right = [-22.5°, 22.5°)`. `left` wraps the
//! seam and therefore covers `[157.5°, 180°] ∪ [-180°, -157.5°)`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    COMMIT_RELATIVE_TOLERANCE, FULL_TURN_DEG, OCTANT_HALF_WIDTH_DEG, OCTANT_WIDTH_DEG,
};
use crate::numbers::floor_f64_to_usize;
use crate::question::QuestionKind;

/// One of the eight compass directions a card can be swiped towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SwipeDirection {
    Up,
    UpRight,
    Right,
    DownRight,
    Down,
    DownLeft,
    Left,
    UpLeft,
}

/// Sector order starting at `right` and walking clockwise on screen.
const OCTANT_ORDER: [SwipeDirection; 8] = [
    SwipeDirection::Right,
    SwipeDirection::DownRight,
    SwipeDirection::Down,
    SwipeDirection::DownLeft,
    SwipeDirection::Left,
    SwipeDirection::UpLeft,
    SwipeDirection::Up,
    SwipeDirection::UpRight,
];

impl SwipeDirection {
    pub const ALL: [Self; 8] = [
        Self::Up,
        Self::UpRight,
        Self::Right,
        Self::DownRight,
        Self::Down,
        Self::DownLeft,
        Self::Left,
        Self::UpLeft,
    ];

    pub const BINARY: [Self; 2] = [Self::Left, Self::Right];

    /// Key used for this direction in question option maps.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::UpRight => "upRight",
            Self::Right => "right",
            Self::DownRight => "downRight",
            Self::Down => "down",
            Self::DownLeft => "downLeft",
            Self::Left => "left",
            Self::UpLeft => "upLeft",
        }
    }

    /// Angle the sector is centred on, in screen-space degrees.
    #[must_use]
    pub const fn canonical_angle_deg(self) -> f64 {
        match self {
            Self::Right => 0.0,
            Self::DownRight => 45.0,
            Self::Down => 90.0,
            Self::DownLeft => 135.0,
            Self::Left => 180.0,
            Self::UpLeft => -135.0,
            Self::Up => -90.0,
            Self::UpRight => -45.0,
        }
    }

    /// Whether the direction is meaningful for the given question kind.
    #[must_use]
    pub const fn applies_to(self, kind: QuestionKind) -> bool {
        match kind {
            QuestionKind::Binary => matches!(self, Self::Left | Self::Right),
            QuestionKind::MultiChoice => true,
        }
    }
}

impl fmt::Display for SwipeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Offset of an in-progress drag relative to where it started.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragVector {
    pub dx: f64,
    pub dy: f64,
}

impl DragVector {
    pub const ORIGIN: Self = Self { dx: 0.0, dy: 0.0 };

    #[must_use]
    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    #[must_use]
    pub fn distance(self) -> f64 {
        distance(self.dx, self.dy)
    }

    #[must_use]
    pub fn is_committable(self, threshold: f64) -> bool {
        is_committable(self.dx, self.dy, threshold)
    }

    /// Classify the vector for a question kind; `None` when no direction is defined.
    #[must_use]
    pub fn classify(self, kind: QuestionKind) -> Option<SwipeDirection> {
        match kind {
            QuestionKind::Binary => self.dx.is_finite().then(|| classify_binary(self.dx)),
            QuestionKind::MultiChoice => classify_octant(self.dx, self.dy),
        }
    }
}

/// Binary classification by the sign of `dx`.
///
/// Only a strictly positive offset is `Right`; zero (either sign) and NaN fall
/// to `Left`. Magnitude is irrelevant here; callers gate on the commit
/// threshold separately.
#[must_use]
pub fn classify_binary(dx: f64) -> SwipeDirection {
    if dx > 0.0 {
        SwipeDirection::Right
    } else {
        SwipeDirection::Left
    }
}

/// Eight-way classification of a drag offset.
///
/// Returns `None` for the zero vector and for non-finite input, neither of
/// which has a meaningful angle.
#[must_use]
pub fn classify_octant(dx: f64, dy: f64) -> Option<SwipeDirection> {
    if !dx.is_finite() || !dy.is_finite() || (dx == 0.0 && dy == 0.0) {
        return None;
    }
    Some(octant_for_angle(dy.atan2(dx).to_degrees()))
}

/// Map a screen-space angle in degrees onto its sector.
#[must_use]
pub fn octant_for_angle(angle_deg: f64) -> SwipeDirection {
    let shifted = (angle_deg + OCTANT_HALF_WIDTH_DEG).rem_euclid(FULL_TURN_DEG);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    let index = floor_f64_to_usize(shifted / OCTANT_WIDTH_DEG).min(OCTANT_ORDER.len() - 1);
    OCTANT_ORDER[index]
}

#[must_use]
pub fn distance(dx: f64, dy: f64) -> f64 {
    dx.hypot(dy)
}

/// A drag commits once its distance reaches `threshold`; anything shorter snaps back.
///
/// The comparison allows a shortfall of [`COMMIT_RELATIVE_TOLERANCE`] times the
/// threshold, so a diagonal of `(70.71, 70.71)` commits at 100 while `99.995`
/// does not.
#[must_use]
pub fn is_committable(dx: f64, dy: f64, threshold: f64) -> bool {
    distance(dx, dy) >= threshold * (1.0 - COMMIT_RELATIVE_TOLERANCE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cardinal_offsets_map_to_screen_directions() {
        assert_eq!(classify_octant(120.0, 0.0), Some(SwipeDirection::Right));
        assert_eq!(classify_octant(0.0, 120.0), Some(SwipeDirection::Down));
        assert_eq!(classify_octant(-120.0, 0.0), Some(SwipeDirection::Left));
        assert_eq!(classify_octant(0.0, -120.0), Some(SwipeDirection::Up));
        assert_eq!(classify_octant(80.0, 80.0), Some(SwipeDirection::DownRight));
        assert_eq!(classify_octant(-80.0, 80.0), Some(SwipeDirection::DownLeft));
        assert_eq!(classify_octant(-80.0, -80.0), Some(SwipeDirection::UpLeft));
        assert_eq!(classify_octant(80.0, -80.0), Some(SwipeDirection::UpRight));
    }

    #[test]
    fn sector_boundaries_are_lower_inclusive() {
        let cases = [
            (-22.5, SwipeDirection::Right),
            (22.5, SwipeDirection::DownRight),
            (67.5, SwipeDirection::Down),
            (112.5, SwipeDirection::DownLeft),
            (157.5, SwipeDirection::Left),
            (180.0, SwipeDirection::Left),
            (-180.0, SwipeDirection::Left),
            (-157.5, SwipeDirection::UpLeft),
            (-112.5, SwipeDirection::Up),
            (-67.5, SwipeDirection::UpRight),
        ];
        for (angle, expected) in cases {
            assert_eq!(octant_for_angle(angle), expected, "angle {angle}");
        }
        assert_eq!(octant_for_angle(22.499), SwipeDirection::Right);
        assert_eq!(octant_for_angle(-157.501), SwipeDirection::Left);
    }

    #[test]
    fn zero_and_non_finite_vectors_have_no_octant() {
        assert_eq!(classify_octant(0.0, 0.0), None);
        assert_eq!(classify_octant(-0.0, 0.0), None);
        assert_eq!(classify_octant(f64::NAN, 3.0), None);
        assert_eq!(classify_octant(f64::INFINITY, 3.0), None);
    }

    #[test]
    fn negative_zero_dy_on_the_left_seam_is_left() {
        assert_eq!(classify_octant(-50.0, -0.0), Some(SwipeDirection::Left));
    }

    #[test]
    fn binary_uses_sign_only() {
        assert_eq!(classify_binary(0.001), SwipeDirection::Right);
        assert_eq!(classify_binary(9_000.0), SwipeDirection::Right);
        assert_eq!(classify_binary(-0.001), SwipeDirection::Left);
        assert_eq!(classify_binary(0.0), SwipeDirection::Left);
        assert_eq!(classify_binary(-0.0), SwipeDirection::Left);
    }

    #[test]
    fn commit_threshold_is_inclusive() {
        assert!(!is_committable(99.0, 0.0, 100.0));
        assert!(!is_committable(99.9, 0.0, 100.0));
        assert!(!is_committable(99.995, 0.0, 100.0));
        assert!(is_committable(100.0, 0.0, 100.0));
        assert!(is_committable(70.71, 70.71, 100.0));
        assert!(!is_committable(0.0, 0.0, 100.0));
        assert!((distance(3.0, 4.0) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn canonical_angles_classify_to_themselves() {
        for direction in SwipeDirection::ALL {
            assert_eq!(octant_for_angle(direction.canonical_angle_deg()), direction);
        }
    }

    #[test]
    fn drag_vector_classifies_per_kind() {
        let vector = DragVector::new(-10.0, -200.0);
        assert_eq!(vector.classify(QuestionKind::Binary), Some(SwipeDirection::Left));
        assert_eq!(vector.classify(QuestionKind::MultiChoice), Some(SwipeDirection::Up));
        assert_eq!(DragVector::ORIGIN.classify(QuestionKind::MultiChoice), None);
        assert!(SwipeDirection::Left.applies_to(QuestionKind::Binary));
        assert!(!SwipeDirection::Up.applies_to(QuestionKind::Binary));
    }

    #[test]
    fn direction_keys_serialize_camel_case() {
        let json = serde_json::to_string(&SwipeDirection::DownLeft).unwrap();
        assert_eq!(json, "\"downLeft\"");
        assert_eq!(SwipeDirection::UpRight.to_string(), "upRight");
    }
}
