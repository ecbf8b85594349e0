//! Interactive requirements diagram of an academic program.

mod component;
mod context;
pub mod details;
pub mod geometry;
pub mod layout;
pub mod mapper;
mod node;
pub mod render;
mod side_panel;
pub mod state;
pub mod types;

pub use component::ProgramMap;
pub use context::ProgramMapContext;
pub use mapper::{DiagramNode, build_program};
pub use state::{NodeId, NodeRecord, NodeRegistry};
pub use types::{Course, CourseDetails, Program};
