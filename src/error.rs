//! Recoverable error types for the diagram engine and the data-service client.
//!
//! Nothing here is fatal to a diagram render: callers log the error with its
//! context and keep going.

use crate::components::program_map::NodeId;

/// Failures raised while building or interacting with the node registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiagramError {
	/// A child registered before (or without) its parent.
	#[error("node `{child}` could not attach to missing parent `{parent}`")]
	OrphanParent { parent: NodeId, child: NodeId },
	/// A second parentless node was registered in the same render pass.
	#[error("node `{child}` has no parent but `{root}` is already the root")]
	DuplicateRoot { root: NodeId, child: NodeId },
	/// An id already registered under one parent was registered again under
	/// another; the first record is kept.
	#[error("node `{child}` is already under `{existing:?}` and cannot move to `{parent:?}`")]
	ConflictingParent {
		existing: Option<NodeId>,
		parent: Option<NodeId>,
		child: NodeId,
	},
	/// An interaction targeted an id the registry does not hold.
	#[error("node `{0}` is not registered")]
	UnknownNode(NodeId),
	/// A rectangle could not be measured (element not laid out yet).
	#[error("geometry unavailable for connector into `{0}`")]
	GeometryUnavailable(NodeId),
}

/// Failures of the course/program lookups against the data service.
///
/// Cloneable so it can live inside reactive resources.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
	#[error("no browser window available")]
	NoWindow,
	#[error("request to {url} failed: {message}")]
	Network { url: String, message: String },
	#[error("request to {url} returned HTTP {status}")]
	Status { url: String, status: u16 },
	#[error("could not read response body from {url}: {message}")]
	Body { url: String, message: String },
	#[error("could not decode response from {url}: {message}")]
	Decode { url: String, message: String },
}
