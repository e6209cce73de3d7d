//! Runtime configuration for the edit session.
//!
//! Controls pick policy, input timing windows, and the command timeout.
//! Configuration can be loaded from environment variables or constructed
//! programmatically.

use core::time::Duration;
use selection::PickPolicy;
use std::env;

/// Runtime configuration for an edit session.
#[derive(Clone, Debug)]
pub struct EditorConfig {
    /// What a click does once an element is picked.
    pub pick_policy: PickPolicy,
    /// Cap on each history stack.
    pub max_history: usize,
    /// Minimum gap between hover resolutions, in milliseconds.
    pub hover_throttle_ms: u64,
    /// Grace period before an unhover takes effect, in milliseconds.
    pub mouseout_grace_ms: u64,
    /// Settle delay after a viewport resize, in milliseconds.
    pub resize_debounce_ms: u64,
    /// Upper bound on command resolution time, in milliseconds.
    pub command_timeout_ms: u64,
    /// Longest element text carried in a context snapshot, in characters.
    pub max_context_text: usize,
}

impl EditorConfig {
    /// Construct an `EditorConfig` with explicit values. Timing fields are
    /// clamped to at least 1ms.
    #[inline]
    #[must_use]
    pub const fn new(
        pick_policy: PickPolicy,
        max_history: usize,
        hover_throttle_ms: u64,
        mouseout_grace_ms: u64,
        resize_debounce_ms: u64,
        command_timeout_ms: u64,
        max_context_text: usize,
    ) -> Self {
        Self {
            pick_policy,
            max_history: if max_history < 1 { 1 } else { max_history },
            hover_throttle_ms: if hover_throttle_ms < 1 {
                1
            } else {
                hover_throttle_ms
            },
            mouseout_grace_ms: if mouseout_grace_ms < 1 {
                1
            } else {
                mouseout_grace_ms
            },
            resize_debounce_ms: if resize_debounce_ms < 1 {
                1
            } else {
                resize_debounce_ms
            },
            command_timeout_ms: if command_timeout_ms < 1 {
                1
            } else {
                command_timeout_ms
            },
            max_context_text,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// - `PEEKBERRY_SINGLE_SELECT`: set to "1" for single-select picking
    /// - `PEEKBERRY_MAX_HISTORY`: history stack cap (default: 50)
    /// - `PEEKBERRY_HOVER_THROTTLE_MS`: hover throttle window (default: 150)
    /// - `PEEKBERRY_MOUSEOUT_GRACE_MS`: unhover grace delay (default: 200)
    /// - `PEEKBERRY_RESIZE_DEBOUNCE_MS`: resize settle delay (default: 250)
    /// - `PEEKBERRY_COMMAND_TIMEOUT_MS`: command timeout (default: 30000)
    /// - `PEEKBERRY_MAX_CONTEXT_TEXT`: context text cap (default: 200)
    #[inline]
    #[must_use]
    pub fn from_env() -> Self {
        let pick_policy = if env::var("PEEKBERRY_SINGLE_SELECT").ok().as_deref() == Some("1") {
            PickPolicy::SingleSelect
        } else {
            PickPolicy::MultiSelect
        };
        let max_history = env::var("PEEKBERRY_MAX_HISTORY")
            .ok()
            .and_then(|val| val.parse::<usize>().ok())
            .unwrap_or(history::MAX_HISTORY)
            .max(1);
        let hover_throttle_ms = env::var("PEEKBERRY_HOVER_THROTTLE_MS")
            .ok()
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(150)
            .max(1);
        let mouseout_grace_ms = env::var("PEEKBERRY_MOUSEOUT_GRACE_MS")
            .ok()
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(200)
            .max(1);
        let resize_debounce_ms = env::var("PEEKBERRY_RESIZE_DEBOUNCE_MS")
            .ok()
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(250)
            .max(1);
        let command_timeout_ms = env::var("PEEKBERRY_COMMAND_TIMEOUT_MS")
            .ok()
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(30_000)
            .max(1);
        let max_context_text = env::var("PEEKBERRY_MAX_CONTEXT_TEXT")
            .ok()
            .and_then(|val| val.parse::<usize>().ok())
            .unwrap_or(200);
        Self {
            pick_policy,
            max_history,
            hover_throttle_ms,
            mouseout_grace_ms,
            resize_debounce_ms,
            command_timeout_ms,
            max_context_text,
        }
    }

    #[inline]
    #[must_use]
    pub const fn hover_throttle(&self) -> Duration {
        Duration::from_millis(self.hover_throttle_ms)
    }

    #[inline]
    #[must_use]
    pub const fn mouseout_grace(&self) -> Duration {
        Duration::from_millis(self.mouseout_grace_ms)
    }

    #[inline]
    #[must_use]
    pub const fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    #[inline]
    #[must_use]
    pub const fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self::new(
            PickPolicy::MultiSelect,
            history::MAX_HISTORY,
            150,
            200,
            250,
            30_000,
            200,
        )
    }
}
