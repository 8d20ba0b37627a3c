//! The drawing-surface seam and a recording implementation of it.
//!
//! The turtle never touches pixels. It issues path commands in a logical frame
//! (origin at the surface centre, Y pointing up) to a [`DrawingSurface`], and
//! adapters convert to raw pixel rows with [`SurfaceBounds::to_pixel`].

use crate::motion::Segment;
use bevy_math::Rect;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A stroke/fill colour. Channels are `0..=255`, alpha is `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const BLACK: Self = Self::new(0, 0, 0, 1.0);
    pub const GREEN: Self = Self::new(0, 128, 0, 1.0);

    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Formats as a CSS colour, e.g. `rgba(255,0,0,0.5)`.
impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }
}

/// The drawable area in logical coordinates, centred on the origin.
///
/// Wrapping treats the area as half-open: `[min.x, max.x) × [min.y, max.y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceBounds {
    rect: Rect,
}

impl SurfaceBounds {
    /// Bounds of a surface `size.x` pixels wide and `size.y` pixels high.
    pub fn centered(size: Vec2) -> Self {
        Self {
            rect: Rect::from_center_size(Vec2::ZERO, size.max(Vec2::ZERO)),
        }
    }

    pub fn min_x(&self) -> f32 {
        self.rect.min.x
    }

    pub fn max_x(&self) -> f32 {
        self.rect.max.x
    }

    pub fn min_y(&self) -> f32 {
        self.rect.min.y
    }

    pub fn max_y(&self) -> f32 {
        self.rect.max.y
    }

    pub fn size(&self) -> Vec2 {
        self.rect.size()
    }

    /// Half-open containment test.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.rect.min.x
            && point.x < self.rect.max.x
            && point.y >= self.rect.min.y
            && point.y < self.rect.max.y
    }

    /// Maps `point` into the half-open bounds as if the surface were a torus.
    ///
    /// Points already inside are returned bit-for-bit unchanged.
    pub fn wrap_point(&self, point: Vec2) -> Vec2 {
        if self.contains(point) {
            return point;
        }
        let size = self.rect.size();
        Vec2::new(
            wrap_axis(point.x, self.rect.min.x, size.x),
            wrap_axis(point.y, self.rect.min.y, size.y),
        )
    }

    /// Converts a logical point to raw pixel space (origin top-left, Y down).
    pub fn to_pixel(&self, point: Vec2) -> Vec2 {
        Vec2::new(point.x - self.rect.min.x, self.rect.max.y - point.y)
    }
}

fn wrap_axis(value: f32, min: f32, extent: f32) -> f32 {
    if extent <= 0.0 {
        return min;
    }
    if value >= min && value < min + extent {
        return value;
    }
    let wrapped = min + (value - min).rem_euclid(extent);
    // rem_euclid may round up to exactly `extent`
    if wrapped >= min + extent { min } else { wrapped }
}

/// An abstract 2D canvas.
///
/// All coordinates are logical (centred, Y-up). `stroke` and `fill` consume the
/// current path; `begin_path` discards it.
pub trait DrawingSurface {
    /// Surface size in pixels.
    fn size(&self) -> Vec2;

    fn begin_path(&mut self);
    fn move_to(&mut self, point: Vec2);
    fn line_to(&mut self, point: Vec2);
    fn close_path(&mut self);

    /// Strokes the current path.
    fn stroke(&mut self, width: f32, color: Rgba);

    /// Fills the current path.
    fn fill(&mut self, color: Rgba);

    /// Erases the whole surface.
    fn clear(&mut self);

    /// Draws `text` centred on `at`, upright regardless of the Y-up frame.
    fn fill_text(&mut self, text: &str, at: Vec2);

    fn set_font(&mut self, font: &str);

    /// Draws the contents of `source` beneath what is already on this surface.
    fn composite_under(&mut self, source: &Self);

    fn bounds(&self) -> SurfaceBounds {
        SurfaceBounds::centered(self.size())
    }
}

/// One recorded call on a [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    BeginPath,
    MoveTo(Vec2),
    LineTo(Vec2),
    ClosePath,
    Stroke { width: f32, color: Rgba },
    Fill { color: Rgba },
    FillText { text: String, at: Vec2, font: String },
    /// Contents of another surface placed beneath this one.
    CompositeUnder(Vec<DrawCommand>),
}

/// A headless [`DrawingSurface`] that keeps the commands currently "on" it.
///
/// `clear` drops everything recorded so far, so [`commands`](Self::commands)
/// always describes the visible contents.
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    size: Vec2,
    font: String,
    commands: Vec<DrawCommand>,
    clears: usize,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            font: String::from("10px sans-serif"),
            commands: Vec::new(),
            clears: 0,
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of times the surface has been cleared.
    pub fn clear_count(&self) -> usize {
        self.clears
    }

    pub fn font(&self) -> &str {
        &self.font
    }

    /// Every segment that has been stroked, in drawing order.
    ///
    /// Composited layers are not included; only paths stroked on this surface.
    pub fn stroked_segments(&self) -> Vec<Segment> {
        let mut stroked = Vec::new();
        let mut path: Vec<Segment> = Vec::new();
        let mut cursor: Option<Vec2> = None;
        let mut subpath_start: Option<Vec2> = None;

        for command in &self.commands {
            match command {
                DrawCommand::BeginPath => {
                    path.clear();
                    cursor = None;
                    subpath_start = None;
                }
                DrawCommand::MoveTo(p) => {
                    cursor = Some(*p);
                    subpath_start = Some(*p);
                }
                DrawCommand::LineTo(p) => {
                    match cursor {
                        Some(from) => path.push(Segment::new(from, *p)),
                        None => subpath_start = Some(*p),
                    }
                    cursor = Some(*p);
                }
                DrawCommand::ClosePath => {
                    if let (Some(from), Some(start)) = (cursor, subpath_start) {
                        path.push(Segment::new(from, start));
                        cursor = Some(start);
                    }
                }
                DrawCommand::Stroke { .. } => stroked.extend(path.iter().copied()),
                DrawCommand::Fill { .. }
                | DrawCommand::FillText { .. }
                | DrawCommand::CompositeUnder(_) => {}
            }
        }

        stroked
    }

    /// Number of fill operations recorded.
    pub fn fill_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Fill { .. }))
            .count()
    }
}

impl DrawingSurface for RecordingSurface {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, point: Vec2) {
        self.commands.push(DrawCommand::MoveTo(point));
    }

    fn line_to(&mut self, point: Vec2) {
        self.commands.push(DrawCommand::LineTo(point));
    }

    fn close_path(&mut self) {
        self.commands.push(DrawCommand::ClosePath);
    }

    fn stroke(&mut self, width: f32, color: Rgba) {
        self.commands.push(DrawCommand::Stroke { width, color });
    }

    fn fill(&mut self, color: Rgba) {
        self.commands.push(DrawCommand::Fill { color });
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.clears += 1;
    }

    fn fill_text(&mut self, text: &str, at: Vec2) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_owned(),
            at,
            font: self.font.clone(),
        });
    }

    fn set_font(&mut self, font: &str) {
        self.font = font.to_owned();
    }

    fn composite_under(&mut self, source: &Self) {
        self.commands
            .push(DrawCommand::CompositeUnder(source.commands.clone()));
    }
}
