use serde::Serialize;

use crate::error::WidgetError;
use crate::puzzle_variant::PuzzleVariant;

pub const READY_POLL_INTERVAL_MS: u32 = 100;
/// Together with the interval this caps the wait for a new widget at ~5s.
pub const READY_POLL_MAX_ATTEMPTS: u32 = 50;

/// Options a freshly constructed visualization widget is given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    pub puzzle: PuzzleVariant,
    pub alg: String,
    pub hint_facelets: &'static str,
    pub control_panel: &'static str,
    pub background: &'static str,
    pub visualization: &'static str,
}

impl WidgetConfig {
    pub fn new(puzzle: PuzzleVariant, alg: String) -> Self {
        Self {
            puzzle,
            alg,
            hint_facelets: "none",
            control_panel: "none",
            background: "none",
            visualization: "3D",
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// The third party puzzle viewer, seen from the session.
pub trait PuzzleWidget {
    /// Replace whatever is displayed with a new widget built from `config`.
    fn mount(&mut self, config: &WidgetConfig) -> Result<(), WidgetError>;

    /// Returns true once the widget can accept an algorithm and a jump-to-end
    /// command. Only the boolean outcome matters to the session.
    fn is_ready(&self) -> bool;

    /// Show the state at the end of the mounted algorithm. Best effort: the
    /// algorithm counts as set even when this fails.
    fn jump_to_end(&mut self) -> Result<(), WidgetError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Ready,
    Retry,
    Exhausted,
}

/// Counts readiness checks against [`READY_POLL_MAX_ATTEMPTS`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadinessPoll {
    attempts: u32,
}

impl ReadinessPoll {
    pub fn check(&mut self, ready: bool) -> PollOutcome {
        self.attempts += 1;
        if ready {
            PollOutcome::Ready
        } else if self.attempts >= READY_POLL_MAX_ATTEMPTS {
            PollOutcome::Exhausted
        } else {
            PollOutcome::Retry
        }
    }

    #[inline]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;

    use super::*;

    /// Records what it was asked to show. Readiness and failures are scripted.
    #[derive(Debug, Default)]
    pub struct FakeWidget {
        pub mounted: Vec<WidgetConfig>,
        pub jumps: usize,
        /// Answers for successive `is_ready` calls; ready once exhausted.
        pub readiness: VecDeque<bool>,
        pub never_ready: bool,
        pub fail_mount: bool,
        pub jump_error: Option<WidgetError>,
    }

    impl PuzzleWidget for FakeWidget {
        fn mount(&mut self, config: &WidgetConfig) -> Result<(), WidgetError> {
            if self.fail_mount {
                return Err(WidgetError::Construction("script error".to_string()));
            }
            self.mounted.push(config.clone());
            Ok(())
        }

        fn is_ready(&self) -> bool {
            !self.never_ready && self.readiness.front().copied().unwrap_or(true)
        }

        fn jump_to_end(&mut self) -> Result<(), WidgetError> {
            self.jumps += 1;
            match &self.jump_error {
                Some(error) => Err(error.clone()),
                None => Ok(()),
            }
        }
    }

    impl FakeWidget {
        /// Advance the readiness script by one check.
        pub fn tick(&mut self) {
            self.readiness.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_json() {
        let config = WidgetConfig::new(PuzzleVariant::Megaminx, "R U".to_string());
        assert_eq!(
            config.to_json().unwrap(),
            r#"{"puzzle":"megaminx","alg":"R U","hintFacelets":"none","controlPanel":"none","background":"none","visualization":"3D"}"#
        );
    }

    #[test]
    fn test_readiness_poll() {
        let mut poll = ReadinessPoll::default();
        assert_eq!(poll.check(false), PollOutcome::Retry);
        assert_eq!(poll.check(true), PollOutcome::Ready);
        assert_eq!(poll.attempts(), 2);
    }

    #[test]
    fn test_readiness_poll_gives_up() {
        let mut poll = ReadinessPoll::default();
        let outcomes: Vec<_> = (0..READY_POLL_MAX_ATTEMPTS)
            .map(|_| poll.check(false))
            .collect();
        assert!(outcomes[..outcomes.len() - 1]
            .iter()
            .all(|outcome| *outcome == PollOutcome::Retry));
        assert_eq!(outcomes.last(), Some(&PollOutcome::Exhausted));
    }
}
