//! Vibration feedback for touch devices.
//!
//! Platforms without the Vibration API (desktop, iOS Safari) ignore every call.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Haptic {
    #[default]
    Light,
    Medium,
    Heavy,
    Success,
    Warning,
    Error,
}

impl Haptic {
    /// Alternating vibrate/pause durations in milliseconds.
    #[must_use]
    pub const fn pattern(self) -> &'static [u32] {
        match self {
            Self::Light => &[10],
            Self::Medium => &[20],
            Self::Heavy => &[30],
            Self::Success => &[10, 50, 10],
            Self::Warning => &[20, 50, 20],
            Self::Error => &[30, 50, 30, 50, 30],
        }
    }

    /// Feedback for a committed answer of the given question kind.
    #[must_use]
    pub const fn for_commit(kind: crate::game::QuestionKind) -> Self {
        match kind {
            crate::game::QuestionKind::Binary => Self::Light,
            crate::game::QuestionKind::MultiChoice => Self::Medium,
        }
    }
}

/// Fire a vibration pattern if the device supports it.
pub fn trigger(haptic: Haptic) {
    #[cfg(target_arch = "wasm32")]
    {
        let Some(navigator) = crate::dom::navigator() else {
            return;
        };
        let pattern = haptic.pattern();
        let accepted = if let [single] = pattern {
            navigator.vibrate_with_duration(*single)
        } else {
            let steps: js_sys::Array = pattern
                .iter()
                .map(|ms| wasm_bindgen::JsValue::from(*ms))
                .collect();
            navigator.vibrate_with_pattern(&steps)
        };
        if !accepted {
            log::debug!("Haptic feedback {haptic:?} not supported");
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = haptic;
    }
}
