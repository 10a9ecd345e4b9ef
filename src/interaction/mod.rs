//! Interaction layer
//!
//! Everything that turns user intent (pointer drags, language-model tool
//! calls) into move requests and feeds them to the solver one at a time.

pub mod drag;
pub mod plot;
pub mod request;
pub mod session;

pub use drag::{DragController, DragState};
pub use plot::{PlotSession, STICK_FIGURE};
pub use request::{parse_tool_calls, MoveRequest, PlotArgs, ToolCall};
pub use session::PoseSession;
