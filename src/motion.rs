//! Straight-line motion with optional boundary wrapping.
//!
//! [`MotionEngine::forward`] turns one move request into the ordered list of
//! segments to stroke. With wrapping on, a path that leaves the surface is cut
//! at the edge and continues from the opposite edge, as many times as the
//! distance requires.

use crate::error::MotionError;
use crate::surface::SurfaceBounds;
use crate::turtle::TurtleState;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Direction components smaller than this are treated as exactly zero, so a
/// heading of 90° moves purely along X even though `cos(90°)` is not `0.0` in `f32`.
const AXIS_EPSILON: f32 = 1e-6;

/// A straight line to stroke, in logical coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub from: Vec2,
    pub to: Vec2,
}

impl Segment {
    pub fn new(from: Vec2, to: Vec2) -> Self {
        Self { from, to }
    }

    pub fn length(&self) -> f32 {
        self.from.distance(self.to)
    }
}

/// Result of planning one forward move.
#[derive(Clone, Debug)]
pub struct Motion {
    /// Segments in travel order. Zero-length pieces are omitted.
    pub segments: Vec<Segment>,
    /// State after the move. Only the position differs from the input.
    pub state: TurtleState,
    /// Number of boundary crossings taken.
    pub wraps: usize,
}

/// Unit direction for a heading in radians, clockwise from +Y.
pub fn direction(heading: f32) -> Vec2 {
    let (sin, cos) = heading.sin_cos();
    let snap = |v: f32| if v.abs() < AXIS_EPSILON { 0.0 } else { v };
    Vec2::new(snap(sin), snap(cos))
}

/// Plans forward moves against a bounded surface.
#[derive(Clone, Copy, Debug)]
pub struct MotionEngine {
    max_wraps: usize,
}

impl Default for MotionEngine {
    fn default() -> Self {
        Self { max_wraps: 100_000 }
    }
}

impl MotionEngine {
    /// Creates an engine that refuses moves needing more than `max_wraps` crossings.
    pub fn new(max_wraps: usize) -> Self {
        Self { max_wraps }
    }

    pub fn max_wraps(&self) -> usize {
        self.max_wraps
    }

    /// Moves `state` forward by `distance` along its heading.
    ///
    /// # Wrapping
    ///
    /// When `state.wrap_enabled` is set, each iteration compares only the
    /// candidate endpoint against the bounds:
    /// 1. If the candidate lies beyond an X edge, the path is cut at that edge,
    ///    the distance to the edge is consumed, and the cursor reappears on the
    ///    opposite X edge at the same Y.
    /// 2. Otherwise the same is done for the Y edges.
    /// 3. Otherwise the remaining distance is drawn and the move ends.
    ///
    /// X is resolved before Y. When the candidate is beyond both, X still wins
    /// unless the ray meets the Y edge strictly earlier; an exact corner is
    /// resolved as an X crossing followed by a zero-length Y crossing. A heading
    /// parallel to an axis never tests the edges it cannot reach.
    ///
    /// Taking X unconditionally would cut some paths at a point off the
    /// surface and lose distance: on a 20×20 surface, from `(9, 9.5)` at 45°
    /// for distance 2, the X edge point is `(10, 10.5)` and the traced length
    /// comes to about 2.12. Picking the earlier Y edge traces exactly 2.
    ///
    /// The start position is wrapped into the bounds first, and the final
    /// position always satisfies `min <= p < max` on both axes.
    ///
    /// # Errors
    ///
    /// Besides negative and non-finite input, a move needing more than
    /// [`max_wraps`](Self::max_wraps) crossings is rejected with
    /// [`MotionError::WrapLimitExceeded`].
    pub fn forward(
        &self,
        state: &TurtleState,
        distance: f32,
        bounds: &SurfaceBounds,
    ) -> Result<Motion, MotionError> {
        if !distance.is_finite() {
            return Err(MotionError::NonFiniteDistance(distance));
        }
        if distance < 0.0 {
            return Err(MotionError::NegativeDistance(distance));
        }
        if !state.position.is_finite() {
            return Err(MotionError::NonFinitePosition);
        }
        if !state.heading.is_finite() {
            return Err(MotionError::NonFiniteHeading(state.heading));
        }

        let mut motion = Motion {
            segments: Vec::new(),
            state: state.clone(),
            wraps: 0,
        };
        if distance == 0.0 {
            return Ok(motion);
        }

        // folded before narrowing so large headings keep axis alignment exact
        let dir = direction(state.heading_radians());

        if !state.wrap_enabled {
            let to = state.position + dir * distance;
            push_segment(&mut motion.segments, state.position, to);
            motion.state.position = to;
            return Ok(motion);
        }

        let mut cursor = Cursor {
            pos: bounds.wrap_point(state.position),
            remaining: distance,
        };

        while cursor.remaining > 0.0 {
            let candidate = cursor.pos + dir * cursor.remaining;

            let Some(crossing) = next_crossing(cursor, dir, candidate, bounds) else {
                push_segment(&mut motion.segments, cursor.pos, candidate);
                cursor.pos = candidate;
                break;
            };

            motion.wraps += 1;
            if motion.wraps > self.max_wraps {
                return Err(MotionError::WrapLimitExceeded {
                    limit: self.max_wraps,
                });
            }
            trace!(from = ?cursor.pos, edge = ?crossing.edge_point, "wrap");
            push_segment(&mut motion.segments, cursor.pos, crossing.edge_point);
            cursor = crossing.after;
        }

        motion.state.position = bounds.wrap_point(cursor.pos);
        if motion.wraps > 0 {
            debug!(wraps = motion.wraps, distance, "forward wrapped");
        }
        Ok(motion)
    }
}

#[derive(Clone, Copy, Debug)]
struct Cursor {
    pos: Vec2,
    remaining: f32,
}

#[derive(Clone, Copy, Debug)]
struct Crossing {
    /// Distance travelled to reach the edge.
    travel: f32,
    edge_point: Vec2,
    after: Cursor,
}

fn push_segment(segments: &mut Vec<Segment>, from: Vec2, to: Vec2) {
    if from != to {
        segments.push(Segment::new(from, to));
    }
}

fn next_crossing(
    cursor: Cursor,
    dir: Vec2,
    candidate: Vec2,
    bounds: &SurfaceBounds,
) -> Option<Crossing> {
    let x = if dir.x == 0.0 {
        None
    } else if candidate.x > bounds.max_x() {
        Some(wrap_x(cursor, dir, bounds.max_x(), bounds.min_x()))
    } else if candidate.x < bounds.min_x() {
        Some(wrap_x(cursor, dir, bounds.min_x(), bounds.max_x()))
    } else {
        None
    };

    let y = if dir.y == 0.0 {
        None
    } else if candidate.y > bounds.max_y() {
        Some(wrap_y(cursor, dir, bounds.max_y(), bounds.min_y()))
    } else if candidate.y < bounds.min_y() {
        Some(wrap_y(cursor, dir, bounds.min_y(), bounds.max_y()))
    } else {
        None
    };

    match (x, y) {
        (Some(x), Some(y)) if y.travel < x.travel => Some(y),
        (Some(x), _) => Some(x),
        (None, y) => y,
    }
}

/// Cuts the path at the vertical edge `cut` and re-enters at `other`.
///
/// `dir.x` must be non-zero.
fn wrap_x(cursor: Cursor, dir: Vec2, cut: f32, other: f32) -> Crossing {
    let travel = ((cut - cursor.pos.x) / dir.x).abs();
    let edge_y = cursor.pos.y + dir.y * travel;
    Crossing {
        travel,
        edge_point: Vec2::new(cut, edge_y),
        after: Cursor {
            pos: Vec2::new(other, edge_y),
            remaining: (cursor.remaining - travel).max(0.0),
        },
    }
}

/// Cuts the path at the horizontal edge `cut` and re-enters at `other`.
///
/// `dir.y` must be non-zero.
fn wrap_y(cursor: Cursor, dir: Vec2, cut: f32, other: f32) -> Crossing {
    let travel = ((cut - cursor.pos.y) / dir.y).abs();
    let edge_x = cursor.pos.x + dir.x * travel;
    Crossing {
        travel,
        edge_point: Vec2::new(edge_x, cut),
        after: Cursor {
            pos: Vec2::new(edge_x, other),
            remaining: (cursor.remaining - travel).max(0.0),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> SurfaceBounds {
        SurfaceBounds::centered(Vec2::new(20.0, 20.0))
    }

    fn at(x: f32, y: f32, heading: f64) -> TurtleState {
        TurtleState {
            position: Vec2::new(x, y),
            heading,
            ..Default::default()
        }
    }

    #[test]
    fn direction_snaps_axis_headings() {
        assert_eq!(direction(90f32.to_radians()), Vec2::new(1.0, 0.0));
        assert_eq!(direction(180f32.to_radians()), Vec2::new(0.0, -1.0));
        assert_eq!(direction(0.0), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn wrap_x_teleports_to_opposite_edge() {
        let cursor = Cursor {
            pos: Vec2::new(9.0, 0.0),
            remaining: 3.0,
        };
        let c = wrap_x(cursor, Vec2::X, 10.0, -10.0);
        assert_eq!(c.travel, 1.0);
        assert_eq!(c.edge_point, Vec2::new(10.0, 0.0));
        assert_eq!(c.after.pos, Vec2::new(-10.0, 0.0));
        assert_eq!(c.after.remaining, 2.0);
    }

    #[test]
    fn wrap_y_teleports_to_opposite_edge() {
        let cursor = Cursor {
            pos: Vec2::new(2.0, -9.0),
            remaining: 4.0,
        };
        let c = wrap_y(cursor, Vec2::NEG_Y, -10.0, 10.0);
        assert_eq!(c.travel, 1.0);
        assert_eq!(c.edge_point, Vec2::new(2.0, -10.0));
        assert_eq!(c.after.pos, Vec2::new(2.0, 10.0));
        assert_eq!(c.after.remaining, 3.0);
    }

    #[test]
    fn x_crossing_wins_over_later_y_crossing() {
        // Diagonal from near the right edge: the ray meets X first.
        let cursor = Cursor {
            pos: Vec2::new(9.0, 0.0),
            remaining: 20.0,
        };
        let dir = Vec2::new(1.0, 1.0).normalize();
        let candidate = cursor.pos + dir * cursor.remaining;
        let c = next_crossing(cursor, dir, candidate, &bounds()).unwrap();
        assert_eq!(c.edge_point.x, 10.0);
    }

    #[test]
    fn earlier_y_crossing_wins_when_x_edge_point_is_off_surface() {
        let cursor = Cursor {
            pos: Vec2::new(0.0, 9.0),
            remaining: 40.0,
        };
        let dir = Vec2::new(1.0, 1.0).normalize();
        let candidate = cursor.pos + dir * cursor.remaining;
        let c = next_crossing(cursor, dir, candidate, &bounds()).unwrap();
        assert_eq!(c.edge_point.y, 10.0);
        assert_eq!(c.after.pos.y, -10.0);
    }

    #[test]
    fn diagonal_near_corner_keeps_full_distance() {
        let engine = MotionEngine::default();
        let m = engine.forward(&at(9.0, 9.5, 45.0), 2.0, &bounds()).unwrap();
        let traced: f32 = m.segments.iter().map(Segment::length).sum();
        assert!((traced - 2.0).abs() < 1e-4, "traced {traced}");
        assert_eq!(m.segments[0].to.y, 10.0);
        for s in &m.segments {
            for p in [s.from, s.to] {
                assert!(p.x.abs() <= 10.0 + 1e-4 && p.y.abs() <= 10.0 + 1e-4, "{p:?}");
            }
        }
    }

    #[test]
    fn zero_distance_is_a_no_op() {
        let engine = MotionEngine::default();
        let m = engine.forward(&at(1.0, 2.0, 30.0), 0.0, &bounds()).unwrap();
        assert!(m.segments.is_empty());
        assert_eq!(m.state.position, Vec2::new(1.0, 2.0));
    }

    #[test]
    fn rejects_bad_distances() {
        let engine = MotionEngine::default();
        let s = at(0.0, 0.0, 0.0);
        assert_eq!(
            engine.forward(&s, -1.0, &bounds()).unwrap_err(),
            MotionError::NegativeDistance(-1.0)
        );
        assert!(matches!(
            engine.forward(&s, f32::NAN, &bounds()),
            Err(MotionError::NonFiniteDistance(_))
        ));
        assert!(matches!(
            engine.forward(&s, f32::INFINITY, &bounds()),
            Err(MotionError::NonFiniteDistance(_))
        ));
    }

    #[test]
    fn rejects_non_finite_heading() {
        let engine = MotionEngine::default();
        let s = at(0.0, 0.0, f64::NAN);
        assert!(matches!(
            engine.forward(&s, 1.0, &bounds()),
            Err(MotionError::NonFiniteHeading(_))
        ));
    }

    #[test]
    fn vertical_heading_wraps_on_y_only() {
        let engine = MotionEngine::default();
        let m = engine.forward(&at(3.0, 8.0, 0.0), 5.0, &bounds()).unwrap();
        assert_eq!(m.segments.len(), 2);
        assert_eq!(m.segments[0], Segment::new(Vec2::new(3.0, 8.0), Vec2::new(3.0, 10.0)));
        assert_eq!(m.segments[1], Segment::new(Vec2::new(3.0, -10.0), Vec2::new(3.0, -7.0)));
        assert_eq!(m.state.position, Vec2::new(3.0, -7.0));
        assert_eq!(m.wraps, 1);
    }

    #[test]
    fn ending_on_max_edge_normalizes_to_min_edge() {
        let engine = MotionEngine::default();
        let m = engine.forward(&at(5.0, 0.0, 90.0), 5.0, &bounds()).unwrap();
        assert_eq!(m.segments.len(), 1);
        assert_eq!(m.state.position, Vec2::new(-10.0, 0.0));
    }

    #[test]
    fn wrap_limit_is_enforced() {
        let engine = MotionEngine::new(3);
        let err = engine
            .forward(&at(0.0, 0.0, 90.0), 1000.0, &bounds())
            .unwrap_err();
        assert_eq!(err, MotionError::WrapLimitExceeded { limit: 3 });
    }

    #[test]
    fn start_outside_bounds_is_wrapped_first() {
        let engine = MotionEngine::default();
        let m = engine.forward(&at(25.0, 0.0, 90.0), 1.0, &bounds()).unwrap();
        assert_eq!(m.segments[0].from, Vec2::new(5.0, 0.0));
        assert_eq!(m.state.position, Vec2::new(6.0, 0.0));
    }
}
