use alloc::string::String;

use displaydoc::Display;

#[derive(Clone, Debug, PartialEq, Eq, Display)]
pub enum Error {
    /// Graph has no vertices
    EmptyGraph,
    /// Vertex {0} not found in the graph
    VertexNotFound(String),
    /// Vertex index {index} out of range for a graph with {len} vertices
    IndexOutOfRange { index: usize, len: usize },
    /// Negative-weight cycle reachable from the virtual source
    NegativeCycleDetected,
    /// Edge {source} -> {target} has no `{attribute}` attribute
    MissingAttribute {
        source: String,
        target: String,
        attribute: &'static str,
    },
    /// Edge {source} -> {target} has an invalid `{attribute}` value: {value}
    InvalidAttribute {
        source: String,
        target: String,
        attribute: &'static str,
        value: String,
    },
    /// Arithmetic overflow while accumulating flow
    ArithmeticOverflow,
}

impl core::error::Error for Error {}
