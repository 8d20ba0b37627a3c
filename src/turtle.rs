//! Turtle state and the core pen operations.

use crate::error::TurtleError;
use crate::motion::MotionEngine;
use crate::surface::{DrawingSurface, Rgba, SurfaceBounds};
use glam::{Affine2, Vec2};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Configuration for a [`Turtle`].
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TurtleConfig {
    /// Base width of the triangular turtle icon.
    pub icon_width: f32,
    /// Height of the icon from base to tip.
    pub icon_height: f32,
    pub icon_color: Rgba,
    /// Font handed to the image surface for [`Turtle::write`].
    pub font: String,
    /// Boundary crossings allowed in a single move before it is rejected.
    pub max_wraps: usize,
    /// Seed for [`Turtle::random_int`]. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for TurtleConfig {
    fn default() -> Self {
        Self {
            icon_width: 10.0,
            icon_height: 15.0,
            icon_color: Rgba::GREEN,
            font: String::from("10px sans-serif"),
            max_wraps: 100_000,
            seed: None,
        }
    }
}

/// The state of a 2D drawing turtle.
///
/// Coordinates are logical: origin at the surface centre, Y pointing up.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurtleState {
    pub position: Vec2,

    /// Heading in degrees, clockwise from +Y.
    ///
    /// Accumulated in `f64` and never normalised: turns arrive as `f32`, so
    /// `right(a)` followed by `left(a)` lands on the same value exactly.
    pub heading: f64,

    /// Whether motion leaves a stroke.
    pub pen_down: bool,

    /// Whether the turtle icon is drawn on the overlay.
    pub visible: bool,

    /// Whether motion wraps at the surface edges.
    pub wrap_enabled: bool,

    /// Re-render the overlay after every mutating call.
    /// Turning this off speeds up large drawings; it never changes the final state.
    pub redraw_on_move: bool,

    pub line_width: f32,
    pub color: Rgba,
}

impl Default for TurtleState {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            heading: 0.0,
            pen_down: true,
            visible: true,
            wrap_enabled: true,
            redraw_on_move: true,
            line_width: 1.0,
            color: Rgba::BLACK,
        }
    }
}

impl TurtleState {
    /// Heading in radians, folded into `[0, 2π)` before narrowing to `f32`.
    pub fn heading_radians(&self) -> f32 {
        self.normalized_heading().to_radians() as f32
    }

    /// Heading folded into `[0, 360)`.
    pub fn normalized_heading(&self) -> f64 {
        self.heading.rem_euclid(360.0)
    }
}

/// Operations an interpreter can map symbols onto.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TurtleOp {
    /// Move forward, drawing if the pen is down (`F`).
    Forward,
    /// Move forward with the pen lifted (`f`).
    Move,
    /// Turn right by the angle times the sign; `Turn(-1.0)` turns left (`-`/`+`).
    Turn(f32),
    /// Turn 180 degrees (`|`).
    TurnAround,
    PenUp,
    PenDown,
    /// Set the line width. Params: `(width)`.
    SetWidth,
    /// Set the stroke colour. Params: `(r, g, b, a)`.
    SetColor,
    /// Save the full turtle state (`[`).
    Push,
    /// Restore the most recently pushed state without drawing (`]`).
    Pop,
    /// No-op: symbol has no registered meaning.
    Ignore,
}

/// A turtle drawing onto an image surface, with its icon on a separate overlay.
///
/// Both surfaces are owned. The overlay always shows the icon on top of the
/// image's contents after a [`draw`](Self::draw).
pub struct Turtle<S: DrawingSurface> {
    image: S,
    overlay: S,
    state: TurtleState,
    config: TurtleConfig,
    engine: MotionEngine,
    pub(crate) rng: StdRng,
}

impl<S: DrawingSurface> Turtle<S> {
    /// Creates a turtle with the default configuration and resets it.
    pub fn new(image: S, overlay: S) -> Self {
        Self::with_config(image, overlay, TurtleConfig::default())
    }

    pub fn with_config(image: S, overlay: S, config: TurtleConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut turtle = Self {
            image,
            overlay,
            state: TurtleState::default(),
            engine: MotionEngine::new(config.max_wraps),
            config,
            rng,
        };
        turtle.image.set_font(&turtle.config.font);
        turtle.reset();
        turtle
    }

    pub fn state(&self) -> &TurtleState {
        &self.state
    }

    pub fn config(&self) -> &TurtleConfig {
        &self.config
    }

    pub fn position(&self) -> Vec2 {
        self.state.position
    }

    /// Heading in degrees, clockwise from +Y.
    pub fn heading(&self) -> f64 {
        self.state.heading
    }

    pub fn image(&self) -> &S {
        &self.image
    }

    pub fn overlay(&self) -> &S {
        &self.overlay
    }

    /// Gives back the `(image, overlay)` surfaces.
    pub fn into_surfaces(self) -> (S, S) {
        (self.image, self.overlay)
    }

    /// Current wrap bounds, taken from the image surface.
    pub fn bounds(&self) -> SurfaceBounds {
        self.image.bounds()
    }

    /// Restores default state, clears the image and redraws.
    pub fn reset(&mut self) {
        self.state = TurtleState::default();
        self.image.clear();
        self.draw();
        debug!("turtle reset");
    }

    /// Clears the image without moving the turtle.
    pub fn clear(&mut self) {
        self.image.clear();
        self.draw_if_enabled();
    }

    /// Redraws the overlay: the icon (when visible) above the image contents.
    pub fn draw(&mut self) {
        self.overlay.clear();
        if self.state.visible {
            let [left, right, tip] = self.icon_points();
            self.overlay.begin_path();
            self.overlay.move_to(left);
            self.overlay.line_to(right);
            self.overlay.line_to(tip);
            self.overlay.close_path();
            self.overlay.fill(self.config.icon_color);
        }
        self.overlay.composite_under(&self.image);
    }

    /// Corners of the icon triangle: base left, base right, tip.
    ///
    /// At heading 0 the tip points up; the shape turns with the heading about `position`.
    pub fn icon_points(&self) -> [Vec2; 3] {
        let pos = self.state.position;
        let half_width = self.config.icon_width / 2.0;
        let transform = Affine2::from_translation(pos)
            * Affine2::from_angle(-self.state.heading_radians())
            * Affine2::from_translation(-pos);
        [
            Vec2::new(pos.x - half_width, pos.y),
            Vec2::new(pos.x + half_width, pos.y),
            Vec2::new(pos.x, pos.y + self.config.icon_height),
        ]
        .map(|p| transform.transform_point2(p))
    }

    pub(crate) fn draw_if_enabled(&mut self) {
        if self.state.redraw_on_move {
            self.draw();
        }
    }

    /// Moves forward, wrapping at the edges when wrapping is on.
    ///
    /// Strokes the travelled segments if the pen is down. A zero distance is a no-op.
    ///
    /// # Errors
    ///
    /// Negative or non-finite distances are rejected. So is a finite move that
    /// would cross the boundary more than [`TurtleConfig::max_wraps`] times
    /// ([`MotionError::WrapLimitExceeded`](crate::MotionError::WrapLimitExceeded)),
    /// e.g. a distance of millions on a small surface.
    pub fn forward(&mut self, distance: f32) -> Result<(), TurtleError> {
        self.travel(distance, 0.0)
    }

    /// Moves in the opposite direction of the heading without turning.
    pub fn backward(&mut self, distance: f32) -> Result<(), TurtleError> {
        self.travel(distance, 180.0)
    }

    fn travel(&mut self, distance: f32, heading_offset: f32) -> Result<(), TurtleError> {
        let bounds = self.image.bounds();
        let mut start = self.state.clone();
        start.heading += f64::from(heading_offset);
        let motion = self.engine.forward(&start, distance, &bounds)?;

        if self.state.pen_down && !motion.segments.is_empty() {
            self.image.begin_path();
            for segment in &motion.segments {
                self.image.move_to(segment.from);
                self.image.line_to(segment.to);
            }
            self.image.stroke(self.state.line_width, self.state.color);
        }

        self.state.position = motion.state.position;
        self.draw_if_enabled();
        Ok(())
    }

    /// Turns clockwise by `degrees`.
    pub fn right(&mut self, degrees: f32) -> Result<(), TurtleError> {
        self.state.heading = turned(self.state.heading, degrees)?;
        self.draw_if_enabled();
        Ok(())
    }

    /// Turns counter-clockwise by `degrees`.
    pub fn left(&mut self, degrees: f32) -> Result<(), TurtleError> {
        self.state.heading = turned(self.state.heading, -degrees)?;
        self.draw_if_enabled();
        Ok(())
    }

    pub fn set_heading(&mut self, degrees: f32) -> Result<(), TurtleError> {
        check_angle(degrees)?;
        self.state.heading = f64::from(degrees);
        Ok(())
    }

    /// Puts back a heading read earlier with [`heading`](Self::heading).
    pub(crate) fn restore_heading(&mut self, heading: f64) {
        self.state.heading = heading;
    }

    /// Jumps to `(x, y)` without drawing.
    ///
    /// With wrapping on, the target is folded into the surface bounds.
    pub fn goto(&mut self, x: f32, y: f32) -> Result<(), TurtleError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(TurtleError::NonFiniteCoordinate(x, y));
        }
        let target = Vec2::new(x, y);
        self.state.position = if self.state.wrap_enabled {
            self.image.bounds().wrap_point(target)
        } else {
            target
        };
        self.draw_if_enabled();
        Ok(())
    }

    pub fn set_width(&mut self, width: f32) -> Result<(), TurtleError> {
        if !width.is_finite() || width < 0.0 {
            return Err(TurtleError::InvalidWidth(width));
        }
        self.state.line_width = width;
        Ok(())
    }

    /// Sets the stroke colour. Channels are `0..=255`, alpha `0.0..=1.0`.
    pub fn set_color(&mut self, r: u8, g: u8, b: u8, a: f32) -> Result<(), TurtleError> {
        if !(0.0..=1.0).contains(&a) {
            return Err(TurtleError::InvalidAlpha(a));
        }
        self.state.color = Rgba::new(r, g, b, a);
        Ok(())
    }

    pub fn pen_up(&mut self) {
        self.state.pen_down = false;
    }

    pub fn pen_down(&mut self) {
        self.state.pen_down = true;
    }

    pub fn set_wrap(&mut self, enabled: bool) {
        self.state.wrap_enabled = enabled;
    }

    pub fn hide_turtle(&mut self) {
        self.state.visible = false;
        self.draw_if_enabled();
    }

    pub fn show_turtle(&mut self) {
        self.state.visible = true;
        self.draw_if_enabled();
    }

    pub fn redraw_on_move(&mut self, enabled: bool) {
        self.state.redraw_on_move = enabled;
    }

    /// Writes `text` on the image at the turtle's position.
    pub fn write(&mut self, text: &str) {
        self.image.fill_text(text, self.state.position);
        self.draw_if_enabled();
    }

    pub fn set_font(&mut self, font: &str) {
        self.image.set_font(font);
    }

    /// Replaces the whole state, then redraws if enabled. Used by push/pop.
    pub(crate) fn restore(&mut self, state: TurtleState) {
        self.state = state;
        self.draw_if_enabled();
    }
}

/// `heading + degrees`, refusing to leave the heading non-finite.
fn turned(heading: f64, degrees: f32) -> Result<f64, TurtleError> {
    check_angle(degrees)?;
    let next = heading + f64::from(degrees);
    if next.is_finite() {
        Ok(next)
    } else {
        Err(TurtleError::NonFiniteAngle(degrees))
    }
}

fn check_angle(degrees: f32) -> Result<(), TurtleError> {
    if degrees.is_finite() {
        Ok(())
    } else {
        Err(TurtleError::NonFiniteAngle(degrees))
    }
}
