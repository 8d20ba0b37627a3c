//! # canvas-turtle
//!
//! Engine-agnostic 2D turtle graphics. A [`Turtle`] moves over a bounded
//! surface, tracing segments, and can wrap so a path leaving one edge comes
//! back in through the opposite one.
//!
//! Drawing goes through the [`DrawingSurface`] trait in a centred, Y-up frame;
//! [`RecordingSurface`] is a headless implementation that records every
//! command. The wrap algorithm itself lives in [`MotionEngine`] and works on
//! plain [`TurtleState`] values, independent of any surface.
//!
//! ```
//! use canvas_turtle::{RecordingSurface, Turtle};
//!
//! let mut turtle = Turtle::new(
//!     RecordingSurface::new(20.0, 20.0),
//!     RecordingSurface::new(20.0, 20.0),
//! );
//! turtle.goto(9.0, 0.0).unwrap();
//! turtle.right(90.0).unwrap();
//! turtle.forward(3.0).unwrap();
//!
//! // (9,0)->(10,0), then re-entered at the left edge: (-10,0)->(-8,0)
//! assert_eq!(turtle.image().stroked_segments().len(), 2);
//! assert_eq!(turtle.position(), glam::Vec2::new(-8.0, 0.0));
//! ```

pub mod error;
pub mod interpreter;
pub mod motion;
pub mod shapes;
pub mod surface;
pub mod timer;
pub mod turtle;

pub use error::*;
pub use interpreter::*;
pub use motion::*;
pub use shapes::*;
pub use surface::*;
pub use timer::*;
pub use turtle::*;
