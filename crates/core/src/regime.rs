//! Holding-regime classification.
//!
//! Which rule set applies in a tick depends only on who is carrying what.
//! [`Regime::classify`] scans the box list once and names the answer; the
//! engine then matches on it exhaustively.

use std::fmt;

use crate::error::TransitionError;
use crate::state::{BoxHoldState, WorldState};

/// Who is carrying which box. Indices refer to [`WorldState::boxes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Regime {
    /// Nobody carries anything.
    Alone,
    /// Both agents carry this box together.
    Both(usize),
    /// Agent 1 carries `a1`, agent 2 carries a different box `a2`.
    Each { a1: usize, a2: usize },
    /// Only agent 1 carries a box; agent 2 is empty-handed.
    A1Only(usize),
    /// Only agent 2 carries a box; agent 1 is empty-handed.
    A2Only(usize),
}

impl Regime {
    /// Classify `state`, with priority Both > Each > A1Only/A2Only > Alone.
    ///
    /// # Errors
    ///
    /// [`TransitionError::MalformedState`] when two boxes share a carrier, or a
    /// jointly carried box coexists with a singly carried one.
    pub fn classify(state: &WorldState) -> Result<Self, TransitionError> {
        let mut both = None;
        let mut with_a1 = None;
        let mut with_a2 = None;

        for (idx, hold) in state.boxes.iter().enumerate() {
            let slot = match hold {
                BoxHoldState::WithBoth => &mut both,
                BoxHoldState::WithAgent1 => &mut with_a1,
                BoxHoldState::WithAgent2 => &mut with_a2,
                _ => continue,
            };
            if let Some(prev) = slot.replace(idx) {
                return Err(TransitionError::MalformedState {
                    reason: format!("boxes {prev} and {idx} are both {hold:?}"),
                });
            }
        }

        match (both, with_a1, with_a2) {
            (Some(b), None, None) => Ok(Regime::Both(b)),
            (Some(b), _, _) => Err(TransitionError::MalformedState {
                reason: format!("box {b} is carried jointly while another box is carried alone"),
            }),
            (None, Some(a1), Some(a2)) => Ok(Regime::Each { a1, a2 }),
            (None, Some(a1), None) => Ok(Regime::A1Only(a1)),
            (None, None, Some(a2)) => Ok(Regime::A2Only(a2)),
            (None, None, None) => Ok(Regime::Alone),
        }
    }

    /// The regime seen after exchanging the agents' identities.
    pub fn mirrored(self) -> Self {
        match self {
            Regime::Alone => Regime::Alone,
            Regime::Both(b) => Regime::Both(b),
            Regime::Each { a1, a2 } => Regime::Each { a1: a2, a2: a1 },
            Regime::A1Only(b) => Regime::A2Only(b),
            Regime::A2Only(b) => Regime::A1Only(b),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Regime::Alone => "alone",
            Regime::Both(_) => "both",
            Regime::Each { .. } => "each",
            Regime::A1Only(_) => "a1-only",
            Regime::A2Only(_) => "a2-only",
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Cell;
    use BoxHoldState::*;

    fn state(boxes: Vec<BoxHoldState>) -> WorldState {
        WorldState::new(boxes, Cell::new(0, 0), Cell::new(0, 0))
    }

    #[test]
    fn test_classify_each_regime() {
        assert_eq!(Regime::classify(&state(vec![AtOriginalSpot, AtGoalLocation(0)])), Ok(Regime::Alone));
        assert_eq!(Regime::classify(&state(vec![AtOriginalSpot, WithBoth])), Ok(Regime::Both(1)));
        assert_eq!(
            Regime::classify(&state(vec![WithAgent2, WithAgent1])),
            Ok(Regime::Each { a1: 1, a2: 0 })
        );
        assert_eq!(Regime::classify(&state(vec![WithAgent1, AtDropLocation(0)])), Ok(Regime::A1Only(0)));
        assert_eq!(Regime::classify(&state(vec![AtOriginalSpot, WithAgent2])), Ok(Regime::A2Only(1)));
    }

    #[test]
    fn test_classify_rejects_conflicts() {
        for boxes in [
            vec![WithBoth, WithBoth],
            vec![WithAgent1, WithAgent1],
            vec![WithAgent2, WithAgent2],
            vec![WithBoth, WithAgent1],
            vec![WithAgent2, WithBoth],
        ] {
            assert!(matches!(
                Regime::classify(&state(boxes)),
                Err(TransitionError::MalformedState { .. })
            ));
        }
    }

    #[test]
    fn test_mirrored_regime() {
        assert_eq!(Regime::A1Only(3).mirrored(), Regime::A2Only(3));
        assert_eq!(Regime::Each { a1: 0, a2: 1 }.mirrored(), Regime::Each { a1: 1, a2: 0 });
        assert_eq!(Regime::Both(2).mirrored(), Regime::Both(2));
    }
}
