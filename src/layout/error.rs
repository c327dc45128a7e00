use thiserror::Error;

/// Reasons a clustering payload could not be decoded.
#[derive(Debug, Error)]
pub enum ClusterDataError {
	/// The text did not parse as JSON.
	#[error("clustering payload is not valid JSON: {0}")]
	Json(#[from] serde_json::Error),
	/// The payload parsed but is not an object; carries the JSON kind found.
	#[error("clustering payload must be a JSON object, got {0}")]
	NotAnObject(&'static str),
}
