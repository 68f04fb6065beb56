//! Session lifecycle: Alive -> Terminal -> (after a fixed delay) -> Alive
//!
//! The reset is a one-shot deadline stored inside the session. Dropping the
//! session drops the deadline with it, so a torn-down game can never be reset.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Lifecycle {
    /// Active gameplay
    #[default]
    Alive,
    /// Game over; the session resets once `now_ms >= reset_at_ms`
    Terminal { reset_at_ms: f64 },
}

impl Lifecycle {
    pub fn is_alive(&self) -> bool {
        matches!(self, Lifecycle::Alive)
    }

    /// Enter the terminal state. Only the first call per life cycle counts;
    /// returns whether the transition happened.
    pub fn terminate(&mut self, now_ms: f64, reset_delay_ms: f64) -> bool {
        match self {
            Lifecycle::Alive => {
                *self = Lifecycle::Terminal {
                    reset_at_ms: now_ms + reset_delay_ms,
                };
                true
            }
            Lifecycle::Terminal { .. } => false,
        }
    }

    /// True once the reset deadline has passed.
    pub fn reset_due(&self, now_ms: f64) -> bool {
        match self {
            Lifecycle::Alive => false,
            Lifecycle::Terminal { reset_at_ms } => now_ms >= *reset_at_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_transition_happens_once() {
        let mut life = Lifecycle::Alive;
        assert!(life.terminate(1000.0, 2000.0));
        // A second fatal event during the same life doesn't push the deadline out
        assert!(!life.terminate(1500.0, 2000.0));
        assert_eq!(life, Lifecycle::Terminal { reset_at_ms: 3000.0 });
    }

    #[test]
    fn test_reset_due_after_delay() {
        let mut life = Lifecycle::Alive;
        assert!(!life.reset_due(1e9));
        life.terminate(0.0, 2000.0);
        assert!(!life.reset_due(1999.9));
        assert!(life.reset_due(2000.0));
    }
}
