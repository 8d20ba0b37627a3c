//! Error types for motion planning and turtle operations.
//!
//! Every variant is a precondition violation: the operation that returned it
//! left the turtle untouched.

use thiserror::Error;

/// Errors raised by the [`MotionEngine`](crate::MotionEngine) before any motion is applied.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum MotionError {
    /// Distance below zero. Use [`Turtle::backward`](crate::Turtle::backward) to move in reverse.
    #[error("Distance must be non-negative, got {0}")]
    NegativeDistance(f32),

    /// Distance is NaN or infinite.
    #[error("Distance must be finite, got {0}")]
    NonFiniteDistance(f32),

    /// Heading is NaN or infinite.
    #[error("Heading must be finite, got {0}")]
    NonFiniteHeading(f64),

    /// Start position has a NaN or infinite component.
    #[error("Position must be finite")]
    NonFinitePosition,

    /// The move would wrap more often than the engine allows.
    #[error("Move exceeds the wrap limit of {limit} boundary crossings")]
    WrapLimitExceeded { limit: usize },
}

/// Errors raised by [`Turtle`](crate::Turtle) operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TurtleError {
    /// Motion planning rejected the move.
    #[error(transparent)]
    Motion(#[from] MotionError),

    /// Turn or heading angle is NaN or infinite.
    #[error("Angle must be finite, got {0}")]
    NonFiniteAngle(f32),

    /// Target coordinate is NaN or infinite.
    #[error("Coordinates must be finite, got ({0}, {1})")]
    NonFiniteCoordinate(f32, f32),

    /// Line width is negative or not finite.
    #[error("Line width must be finite and non-negative, got {0}")]
    InvalidWidth(f32),

    /// Alpha is outside `0.0..=1.0`.
    #[error("Alpha must lie in 0..=1, got {0}")]
    InvalidAlpha(f32),

    /// Circle radius is negative or not finite.
    #[error("Radius must be finite and non-negative, got {0}")]
    InvalidRadius(f32),

    /// Rectangle extents are negative or not finite.
    #[error("Rectangle size must be finite and non-negative, got {0}x{1}")]
    InvalidSize(f32, f32),

    /// `random_int` called with `low > hi`.
    #[error("Empty range: low {low} is greater than hi {hi}")]
    EmptyRange { low: i64, hi: i64 },

    /// `animate` called with a zero interval.
    #[error("Animation interval must be greater than zero")]
    InvalidInterval,
}
