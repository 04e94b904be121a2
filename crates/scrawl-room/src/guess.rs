//! Guess evaluation as an injected strategy.
//!
//! The relay does not own real scoring rules. Whatever judges a guess
//! (word matching, timing bonuses, an external service) is plugged in
//! through [`GuessPolicy`]; the relay only routes the outcome. The
//! shipped [`RandomGuessPolicy`] is an explicit stand-in.

use rand::Rng;

use crate::Room;

/// The verdict on a single guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuessOutcome {
    pub correct: bool,
    pub points: u32,
}

/// Judges a guess against the room's current state.
pub trait GuessPolicy: Send + Sync + 'static {
    fn evaluate(&self, guess: &str, room: &Room) -> GuessOutcome;
}

/// Stand-in policy: a uniformly random verdict, correct at a fixed rate
/// and worth a fixed number of points.
///
/// This is a placeholder, not game logic. A real deployment swaps in a
/// policy that knows the round's answer.
#[derive(Debug, Clone, Copy)]
pub struct RandomGuessPolicy {
    /// Probability in [0, 1] that a guess is judged correct.
    pub correct_rate: f64,
    /// Points awarded for a correct guess.
    pub points: u32,
}

impl Default for RandomGuessPolicy {
    fn default() -> Self {
        Self {
            correct_rate: 0.3,
            points: 10,
        }
    }
}

impl GuessPolicy for RandomGuessPolicy {
    fn evaluate(&self, _guess: &str, _room: &Room) -> GuessOutcome {
        let correct = rand::rng().random_bool(self.correct_rate.clamp(0.0, 1.0));
        GuessOutcome {
            correct,
            points: if correct { self.points } else { 0 },
        }
    }
}
