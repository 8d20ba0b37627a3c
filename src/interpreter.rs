//! Drawing L-System output with a [`Turtle`].
//!
//! A [`TurtleInterpreter`] holds a table from symbol IDs to [`TurtleOp`]s.
//! Fill the table, then hand [`TurtleInterpreter::run`] a derived
//! [`symbios::SymbiosState`] and the turtle to draw with.

use crate::error::TurtleError;
use crate::surface::DrawingSurface;
use crate::turtle::{Turtle, TurtleOp, TurtleState};
use symbios::{SymbiosState, SymbolTable};
use tracing::{debug, warn};

/// Configuration for symbol interpretation.
#[derive(Clone, Debug)]
pub struct InterpreterConfig {
    /// Distance for `F`/`f` when no parameter is provided.
    pub step: f32,
    /// Turn angle in degrees for `+`/`-` when no parameter is provided.
    pub angle: f32,
    /// Maximum stack depth for push/pop operations.
    pub max_stack_depth: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            step: 10.0,
            angle: 90.0,
            max_stack_depth: 1024,
        }
    }
}

/// Interprets L-System output as turtle drawing commands.
pub struct TurtleInterpreter {
    op_map: Vec<TurtleOp>,
    config: InterpreterConfig,
}

impl TurtleInterpreter {
    /// An interpreter that ignores every symbol until ops are registered.
    pub fn new(config: InterpreterConfig) -> Self {
        Self {
            op_map: Vec::new(),
            config,
        }
    }

    /// Uses `map` as the op table, position `i` holding the op for symbol ID `i`.
    ///
    /// IDs past the end of `map` draw nothing.
    pub fn with_map(mut self, map: Vec<TurtleOp>) -> Self {
        self.op_map = map;
        self
    }

    /// Binds `sym_id` to `op`, overwriting any earlier binding.
    pub fn set_op(&mut self, sym_id: u16, op: TurtleOp) {
        let idx = usize::from(sym_id);
        if self.op_map.len() <= idx {
            self.op_map.resize(idx + 1, TurtleOp::Ignore);
        }
        self.op_map[idx] = op;
    }

    /// Binds the usual 2D drawing alphabet: `F f + - | u d ! ' [ ]`.
    ///
    /// `+` is a left turn and `-` a right one. Only symbols the grammar
    /// actually interned get a binding.
    pub fn populate_standard_symbols(&mut self, interner: &SymbolTable) {
        let mappings = [
            ("F", TurtleOp::Forward),
            ("f", TurtleOp::Move),
            ("+", TurtleOp::Turn(-1.0)),
            ("-", TurtleOp::Turn(1.0)),
            ("|", TurtleOp::TurnAround),
            ("u", TurtleOp::PenUp),
            ("d", TurtleOp::PenDown),
            ("!", TurtleOp::SetWidth),
            ("'", TurtleOp::SetColor),
            ("[", TurtleOp::Push),
            ("]", TurtleOp::Pop),
        ];

        for (sym, op) in mappings {
            if let Some(id) = interner.resolve_id(sym) {
                self.set_op(id, op);
            }
        }
    }

    /// Executes every symbol in `state` on `turtle`, in order.
    ///
    /// Parameters override the configured defaults: `F(len)`, `+(deg)`,
    /// `!(width)`, `'(r, g, b, a)`. A negative length moves backwards.
    /// `[` saves the full turtle state and `]` restores it without drawing.
    /// Pushes beyond `max_stack_depth` and pops on an empty stack are ignored.
    ///
    /// Stops at the first failing operation and returns its error.
    pub fn run<S: DrawingSurface>(
        &self,
        state: &SymbiosState,
        turtle: &mut Turtle<S>,
    ) -> Result<(), TurtleError> {
        let mut stack: Vec<TurtleState> = Vec::new();

        for i in 0..state.len() {
            let view = match state.get_view(i) {
                Some(v) => v,
                None => break,
            };

            let op = self
                .op_map
                .get(view.sym as usize)
                .unwrap_or(&TurtleOp::Ignore);

            let p = |idx: usize, def: f32| -> f32 {
                view.params.get(idx).map(|&x| x as f32).unwrap_or(def)
            };

            match op {
                TurtleOp::Forward => step(turtle, p(0, self.config.step))?,
                TurtleOp::Move => {
                    let pen_down = turtle.state().pen_down;
                    turtle.pen_up();
                    let moved = step(turtle, p(0, self.config.step));
                    if pen_down {
                        turtle.pen_down();
                    }
                    moved?;
                }
                TurtleOp::Turn(s) => turtle.right(p(0, self.config.angle) * s)?,
                TurtleOp::TurnAround => turtle.right(180.0)?,
                TurtleOp::PenUp => turtle.pen_up(),
                TurtleOp::PenDown => turtle.pen_down(),
                TurtleOp::SetWidth => {
                    let width = p(0, turtle.state().line_width);
                    turtle.set_width(width)?;
                }
                TurtleOp::SetColor => {
                    let current = turtle.state().color;
                    let channel = |idx: usize, def: u8| p(idx, def as f32).clamp(0.0, 255.0) as u8;
                    turtle.set_color(
                        channel(0, current.r),
                        channel(1, current.g),
                        channel(2, current.b),
                        p(3, current.a).clamp(0.0, 1.0),
                    )?;
                }
                TurtleOp::Push => {
                    if stack.len() < self.config.max_stack_depth {
                        stack.push(turtle.state().clone());
                    } else {
                        warn!(depth = stack.len(), "push dropped, stack full");
                    }
                }
                TurtleOp::Pop => match stack.pop() {
                    Some(saved) => turtle.restore(saved),
                    None => warn!(symbol = i, "pop on empty stack"),
                },
                TurtleOp::Ignore => {}
            }
        }

        debug!(symbols = state.len(), "interpretation finished");
        Ok(())
    }
}

fn step<S: DrawingSurface>(turtle: &mut Turtle<S>, len: f32) -> Result<(), TurtleError> {
    if len < 0.0 {
        turtle.backward(-len)
    } else {
        turtle.forward(len)
    }
}
