//! Error types for the time graph.

use thiserror::Error;

use super::config::LabelType;
use super::types::NodeId;

/// Failures that surface to the caller of the facade.
///
/// Geometry and shape-registry problems never show up here; those degrade to
/// a no-op render and a miss on hit-testing.
#[derive(Debug, Error)]
pub enum TimeGraphError {
	/// SVG and HTML labels were requested without a host to create them in.
	#[error("label type {0:?} needs a label host")]
	MissingLabelHost(LabelType),

	/// An edge named a node that is not in the graph.
	#[error("unknown node: {0}")]
	UnknownNode(NodeId),

	/// The browser refused an operation.
	#[error("host binding failed: {0}")]
	Host(String),

	/// The options could not be read.
	#[error(transparent)]
	Config(#[from] ConfigError),

	/// A label element could not be created or updated.
	#[error(transparent)]
	Label(#[from] LabelError),
}

/// Failures while reading options.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Not valid JSON, or values of the wrong type.
	#[error("invalid configuration: {0}")]
	Invalid(#[from] serde_json::Error),

	/// A layer was valid JSON but not an object.
	#[error("configuration layer must be a JSON object")]
	NotAnObject,
}

/// Failures reported by a [`LabelHost`](super::LabelHost).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelError {
	/// The host tree rejected the operation.
	#[error("label host failed: {0}")]
	Host(String),
}

/// Result alias for the facade.
pub type Result<T> = std::result::Result<T, TimeGraphError>;
