//! Convenience drawing built from repeated forward/turn calls.

use crate::error::TurtleError;
use crate::surface::DrawingSurface;
use crate::turtle::Turtle;
use rand::Rng;

/// Relates a circle's radius to the per-degree step of its 360-gon:
/// `step = radius / CIRCLE_STEP_DIVISOR`.
///
/// Empirical, not `180 / π`; the traced polygon is slightly larger than the
/// true circle and this value is kept for visual fidelity with existing drawings.
pub const CIRCLE_STEP_DIVISOR: f32 = 56.794;

impl<S: DrawingSurface> Turtle<S> {
    /// Runs `action` `n` times, stopping at the first error.
    pub fn repeat<F>(&mut self, n: usize, mut action: F) -> Result<(), TurtleError>
    where
        F: FnMut(&mut Self) -> Result<(), TurtleError>,
    {
        for _ in 0..n {
            action(self)?;
        }
        Ok(())
    }

    /// Traces a circle of `radius` around `(x, y)` as 360 unit turns.
    ///
    /// Starts at the leftmost point heading up and goes clockwise. Heading and
    /// the redraw flag are restored afterwards, even on error; the turtle is
    /// left where the trace ended.
    pub fn circle(&mut self, x: f32, y: f32, radius: f32) -> Result<(), TurtleError> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(TurtleError::InvalidRadius(radius));
        }
        if !x.is_finite() || !y.is_finite() {
            return Err(TurtleError::NonFiniteCoordinate(x, y));
        }

        let saved_heading = self.heading();
        let saved_redraw = self.state().redraw_on_move;
        self.redraw_on_move(false);
        self.set_heading(0.0)?;

        let traced = self.trace_circle(x, y, radius);

        self.restore_heading(saved_heading);
        self.redraw_on_move(saved_redraw);
        self.draw();
        traced
    }

    fn trace_circle(&mut self, x: f32, y: f32, radius: f32) -> Result<(), TurtleError> {
        let step = radius / CIRCLE_STEP_DIVISOR;
        self.goto(x - radius, y)?;
        self.repeat(360, |turtle| {
            turtle.forward(step)?;
            turtle.right(1.0)
        })
    }

    /// Draws a rectangle centred on `(x, y)`: `width` runs along the current
    /// heading, `height` across it.
    ///
    /// Ends at the middle of the side ahead of the centre, facing the starting
    /// direction, with the pen down.
    pub fn rectangle(&mut self, x: f32, y: f32, width: f32, height: f32) -> Result<(), TurtleError> {
        if !width.is_finite() || !height.is_finite() || width < 0.0 || height < 0.0 {
            return Err(TurtleError::InvalidSize(width, height));
        }
        self.goto(x, y)?;
        self.pen_up();
        self.forward(width / 2.0)?;
        self.left(90.0)?;
        self.pen_down();
        self.forward(height / 2.0)?;
        self.left(90.0)?;
        self.forward(width)?;
        self.left(90.0)?;
        self.forward(height)?;
        self.left(90.0)?;
        self.forward(width)?;
        self.left(90.0)?;
        self.forward(height / 2.0)?;
        self.right(90.0)
    }

    /// Uniform random integer in `low..=hi`.
    pub fn random_int(&mut self, low: i64, hi: i64) -> Result<i64, TurtleError> {
        if low > hi {
            return Err(TurtleError::EmptyRange { low, hi });
        }
        Ok(self.rng.random_range(low..=hi))
    }
}
