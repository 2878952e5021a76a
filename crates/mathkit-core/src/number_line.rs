//! Number line game engine.
//!
//! The learner's marker sits on an integer line from -10 to 10. Each round
//! the engine issues a [`Prompt`] ("Add 3", "Subtract -2", ...) whose landing
//! position is guaranteed to be on the line; the learner picks a position and
//! gets a [`MoveOutcome`] back, which also knows how to phrase the request for
//! tutor feedback.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MathKitError, Result};

/// Leftmost position on the line.
pub const MIN_POSITION: i32 = -10;

/// Rightmost position on the line.
pub const MAX_POSITION: i32 = 10;

/// Whether a prompt asks to add or subtract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveKind {
    /// Move right by the value.
    Add,
    /// Move left by the value.
    Subtract,
}

impl MoveKind {
    /// Landing position when this move is applied to `position`.
    ///
    /// Saturates at the `i32` limits; such a landing is never on the line.
    #[must_use]
    pub const fn apply(self, position: i32, value: i32) -> i32 {
        match self {
            Self::Add => position.saturating_add(value),
            Self::Subtract => position.saturating_sub(value),
        }
    }
}

impl fmt::Display for MoveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "Add"),
            Self::Subtract => write!(f, "Subtract"),
        }
    }
}

/// One instruction for the learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    /// Add or subtract.
    pub operation: MoveKind,
    /// Amount to move by; may be negative.
    pub value: i32,
}

impl Default for Prompt {
    fn default() -> Self {
        Self {
            operation: MoveKind::Add,
            value: 0,
        }
    }
}

impl Prompt {
    /// Position the learner should land on when starting from `position`.
    #[must_use]
    pub const fn expected_position(&self, position: i32) -> i32 {
        self.operation.apply(position, self.value)
    }

    /// Tutor line shown next to the line, e.g. `"Try to Add 3."`.
    #[must_use]
    pub fn instruction(&self) -> String {
        format!("Try to {} {}.", self.operation, self.value)
    }
}

/// Draws a prompt whose landing position stays on the line.
///
/// The operation is a coin flip and the value is uniform in `-10..=10`; the
/// value is then shrunk so that `expected_position(position)` is clamped to
/// `MIN_POSITION..=MAX_POSITION`.
pub fn generate_prompt<R: Rng + ?Sized>(position: i32, rng: &mut R) -> Prompt {
    let operation = if rng.gen_bool(0.5) {
        MoveKind::Add
    } else {
        MoveKind::Subtract
    };
    let raw = rng.gen_range(MIN_POSITION..=MAX_POSITION);
    let target = operation
        .apply(position, raw)
        .clamp(MIN_POSITION, MAX_POSITION);
    let value = match operation {
        MoveKind::Add => target - position,
        MoveKind::Subtract => position - target,
    };
    Prompt { operation, value }
}

/// Result of one move attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    /// Marker position before the move.
    pub from: i32,
    /// Position the learner picked.
    pub chosen: i32,
    /// Position the prompt asked for.
    pub expected: i32,
    /// The prompt that was answered.
    pub prompt: Prompt,
}

impl MoveOutcome {
    /// Returns `true` if the learner landed where the prompt asked.
    #[must_use]
    pub const fn is_correct(&self) -> bool {
        self.chosen == self.expected
    }

    /// Plain-text request for tutor feedback on this move.
    ///
    /// Correct moves ask for short praise, incorrect ones ask the tutor to
    /// guess the misunderstanding and give a hint.
    #[must_use]
    pub fn tutor_prompt(&self) -> String {
        let preamble = "You are a teacher helping a learner with the number line. \
                        Speak to them directly rather than calling them \"the student\".";
        if self.is_correct() {
            format!(
                "{preamble} Starting at {from}, they were asked to {op} {value} and moved \
                 to the correct position: {chosen}. Explain why it was correct in a \
                 friendly tone and offer praise. Keep this under 100 words.",
                from = self.from,
                op = self.prompt.operation,
                value = self.prompt.value,
                chosen = self.chosen,
            )
        } else {
            format!(
                "{preamble} Starting at {from}, they were asked to {op} {value} and moved \
                 to position {chosen}, but the correct position was {expected}. Deduce the \
                 likely misunderstanding and give a helpful hint. Keep this under 200 words.",
                from = self.from,
                op = self.prompt.operation,
                value = self.prompt.value,
                chosen = self.chosen,
                expected = self.expected,
            )
        }
    }
}

/// State of one number line game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NumberLine {
    /// Current marker position.
    pub position: i32,
    /// The prompt currently shown.
    pub prompt: Prompt,
}

impl NumberLine {
    /// Creates a game at `position` with the placeholder prompt "Add 0".
    ///
    /// # Errors
    ///
    /// Returns [`MathKitError::OutOfBounds`] if `position` is not on the line.
    pub fn starting_at(position: i32) -> Result<Self> {
        check_bounds(position)?;
        Ok(Self {
            position,
            prompt: Prompt::default(),
        })
    }

    /// Returns the game with a freshly drawn prompt for the current position.
    #[must_use]
    pub fn next_prompt<R: Rng + ?Sized>(self, rng: &mut R) -> Self {
        Self {
            prompt: generate_prompt(self.position, rng),
            ..self
        }
    }

    /// Moves the marker to `new_position` and grades the move.
    ///
    /// The returned game keeps the answered prompt; draw the next one with
    /// [`NumberLine::next_prompt`].
    ///
    /// # Errors
    ///
    /// Returns [`MathKitError::OutOfBounds`] if `new_position` is off the line.
    /// The game is not moved in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use mathkit_core::{MoveKind, NumberLine, Prompt};
    ///
    /// let game = NumberLine {
    ///     position: 2,
    ///     prompt: Prompt { operation: MoveKind::Subtract, value: 5 },
    /// };
    /// let (game, outcome) = game.attempt_move(-3).unwrap();
    /// assert!(outcome.is_correct());
    /// assert_eq!(game.position, -3);
    /// ```
    pub fn attempt_move(self, new_position: i32) -> Result<(Self, MoveOutcome)> {
        check_bounds(new_position)?;
        let outcome = MoveOutcome {
            from: self.position,
            chosen: new_position,
            expected: self.prompt.expected_position(self.position),
            prompt: self.prompt,
        };
        debug!(
            from = outcome.from,
            chosen = outcome.chosen,
            expected = outcome.expected,
            correct = outcome.is_correct(),
            "Graded number line move"
        );
        Ok((
            Self {
                position: new_position,
                ..self
            },
            outcome,
        ))
    }
}

fn check_bounds(position: i32) -> Result<()> {
    if (MIN_POSITION..=MAX_POSITION).contains(&position) {
        Ok(())
    } else {
        Err(MathKitError::out_of_bounds(
            position,
            MIN_POSITION,
            MAX_POSITION,
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_generated_prompts_stay_on_line() {
        let mut rng = StdRng::seed_from_u64(7);
        for position in MIN_POSITION..=MAX_POSITION {
            for _ in 0..200 {
                let prompt = generate_prompt(position, &mut rng);
                let expected = prompt.expected_position(position);
                assert!(
                    (MIN_POSITION..=MAX_POSITION).contains(&expected),
                    "{prompt:?} from {position} lands on {expected}"
                );
                assert!((-20..=20).contains(&prompt.value));
            }
        }
    }

    #[test]
    fn test_generated_prompts_use_both_operations() {
        let mut rng = StdRng::seed_from_u64(42);
        let prompts: Vec<_> = (0..100).map(|_| generate_prompt(0, &mut rng)).collect();
        assert!(prompts.iter().any(|p| p.operation == MoveKind::Add));
        assert!(prompts.iter().any(|p| p.operation == MoveKind::Subtract));
    }

    #[test]
    fn test_prompt_instruction() {
        let prompt = Prompt {
            operation: MoveKind::Subtract,
            value: -4,
        };
        assert_eq!(prompt.instruction(), "Try to Subtract -4.");
        assert_eq!(prompt.expected_position(1), 5);
    }

    #[test]
    fn test_attempt_move_incorrect() {
        let game = NumberLine {
            position: 0,
            prompt: Prompt {
                operation: MoveKind::Add,
                value: 4,
            },
        };
        let (game, outcome) = game.attempt_move(-4).unwrap();
        assert!(!outcome.is_correct());
        assert_eq!(outcome.expected, 4);
        assert_eq!(game.position, -4);
    }

    #[test]
    fn test_huge_prompt_values_grade_as_incorrect() {
        for (operation, value) in [
            (MoveKind::Add, i32::MAX),
            (MoveKind::Subtract, i32::MIN),
            (MoveKind::Subtract, i32::MAX),
        ] {
            let game = NumberLine {
                position: 10,
                prompt: Prompt { operation, value },
            };
            let (_, outcome) = game.attempt_move(0).unwrap();
            assert!(!outcome.is_correct());
            assert!(!(MIN_POSITION..=MAX_POSITION).contains(&outcome.expected));
        }
    }

    #[test]
    fn test_attempt_move_out_of_bounds_keeps_state() {
        let game = NumberLine::starting_at(9).unwrap();
        let err = game.attempt_move(11).unwrap_err();
        assert!(err.to_string().starts_with("Out of bounds!"));
        assert_eq!(game.position, 9);
    }

    #[test]
    fn test_starting_at_rejects_off_line() {
        assert!(NumberLine::starting_at(-11).is_err());
        assert_eq!(NumberLine::starting_at(-10).unwrap().position, -10);
    }

    #[test]
    fn test_next_prompt_keeps_position() {
        let mut rng = StdRng::seed_from_u64(1);
        let game = NumberLine::starting_at(3).unwrap().next_prompt(&mut rng);
        assert_eq!(game.position, 3);
    }

    #[test]
    fn test_tutor_prompt_wording() {
        let prompt = Prompt {
            operation: MoveKind::Add,
            value: 3,
        };
        let right = MoveOutcome {
            from: 1,
            chosen: 4,
            expected: 4,
            prompt,
        };
        let text = right.tutor_prompt();
        assert!(text.contains("correct position: 4"));
        assert!(text.contains("under 100 words"));

        let wrong = MoveOutcome { chosen: -2, ..right };
        let text = wrong.tutor_prompt();
        assert!(text.contains("moved to position -2"));
        assert!(text.contains("correct position was 4"));
        assert!(text.contains("under 200 words"));
    }
}
