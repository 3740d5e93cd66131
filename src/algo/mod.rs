pub mod dinic;
pub mod johnson;

pub use dinic::{dinic, FlowOutcome};
pub use johnson::{johnson, PathsOutcome};
