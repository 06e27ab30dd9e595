use crate::{math::Fixed, shapes::ShapeKind};
use thiserror::Error;

/// Errors surfaced by the physics pipeline.
///
/// Apart from I/O, every variant is fatal for the running session. The pipeline never tries to
/// repair inconsistent state on its own.
#[derive(Debug, Error)]
pub enum PhysicsError {
    /// The collision pair pool is too small for this tick under the fail policy.
    #[error("collision pair pool exhausted: {needed} pairs needed but only {available} available")]
    PairPoolExhausted { needed: usize, available: usize },

    /// A collider references a catalog entry that does not exist.
    #[error("body {body} references missing {kind} shape #{index}")]
    MissingShape {
        body: u32,
        kind: ShapeKind,
        index: u32,
    },

    /// A shape definition failed validation when it was added to the catalog.
    #[error("invalid {kind} shape: {reason}")]
    InvalidShape { kind: ShapeKind, reason: String },

    /// The handle does not refer to a live body.
    #[error("invalid body handle {0}")]
    InvalidBody(u32),

    /// Dynamic bodies need a positive mass.
    #[error("invalid mass {0}")]
    InvalidMass(Fixed),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid damping field: {0}")]
    InvalidDampingField(String),

    /// The handle does not refer to a damping field.
    #[error("invalid damping field handle {0}")]
    InvalidField(usize),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = PhysicsError> = std::result::Result<T, E>;

#[test]
fn test_error_messages() {
    let err = PhysicsError::PairPoolExhausted {
        needed: 12,
        available: 8,
    };
    assert_eq!(
        err.to_string(),
        "collision pair pool exhausted: 12 pairs needed but only 8 available"
    );

    let err = PhysicsError::MissingShape {
        body: 3,
        kind: ShapeKind::Polygon,
        index: 7,
    };
    assert_eq!(err.to_string(), "body 3 references missing polygon shape #7");
}
