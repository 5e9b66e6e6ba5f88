//! Error types for clothesline.
//!
//! Setup-time failures (bad configuration, attaching to an anchor, starting
//! the frame loop before physics is ready) are reported through these enums.
//! Degenerate geometry at runtime is never an error; those paths are no-ops.

use thiserror::Error;

/// Errors returned by [`Rope::attach`](crate::Rope::attach).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttachError {
    /// The first and last nodes are fixed anchors and never move.
    #[error("node {index} is a fixed anchor and cannot carry an attachment")]
    AnchorNode { index: usize },

    /// Node index does not exist on this rope.
    #[error("node index {index} out of range (node count: {node_count})")]
    OutOfRange { index: usize, node_count: usize },

    /// A node carries at most one attached object.
    #[error("node {index} already carries an attached object")]
    Occupied { index: usize },
}

/// Errors that can occur while building or starting a scene.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// The physics engine has not finished initializing.
    #[error("physics engine is not ready; the frame loop cannot start")]
    PhysicsNotReady,

    /// The physics engine created a rope with an unexpected number of nodes.
    #[error("physics rope has {actual} nodes, expected {expected}")]
    NodeCountMismatch { expected: usize, actual: usize },

    /// A configuration value is outside its valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Attaching an object during setup failed.
    #[error("attachment failed: {0}")]
    Attach(#[from] AttachError),
}

/// Result alias for scene setup.
pub type Result<T> = std::result::Result<T, SceneError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_error_converts_into_scene_error() {
        let err: SceneError = AttachError::Occupied { index: 7 }.into();
        assert_eq!(err, SceneError::Attach(AttachError::Occupied { index: 7 }));
        assert!(err.to_string().contains("node 7"));
    }

    #[test]
    fn test_out_of_range_message() {
        let err = AttachError::OutOfRange { index: 99, node_count: 57 };
        assert_eq!(err.to_string(), "node index 99 out of range (node count: 57)");
    }
}
