mod check;
mod graph;
mod plan;

pub use check::cmd_check;
pub use graph::cmd_graph;
pub use plan::cmd_plan;
