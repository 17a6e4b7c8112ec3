//! Error types for branch construction and configuration.

use core::fmt;

/// Errors reported at construction and configuration boundaries.
///
/// The per-tick solver never returns these; it guards degenerate geometry
/// arithmetically instead.
#[derive(Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// A tunable is outside the range the simulation is defined for.
    InvalidConfiguration { field: &'static str },
    /// A branch needs at least one segment.
    InsufficientSegments,
    /// Branch length must be positive and finite.
    InvalidLength,
    /// Branch thickness must be non-negative and finite.
    InvalidThickness,
    /// Node index is out of bounds.
    NodeOutOfBounds { index: usize, count: usize },
    /// Platform index is out of bounds.
    PlatformOutOfBounds { index: usize, count: usize },
}

impl fmt::Display for PhysicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhysicsError::InvalidConfiguration { field } => {
                write!(f, "configuration value `{}` is out of range", field)
            }
            PhysicsError::InsufficientSegments => write!(f, "branch needs at least 1 segment"),
            PhysicsError::InvalidLength => write!(f, "branch length must be positive and finite"),
            PhysicsError::InvalidThickness => {
                write!(f, "branch thickness must be non-negative and finite")
            }
            PhysicsError::NodeOutOfBounds { index, count } => {
                write!(f, "node index {} out of bounds (count: {})", index, count)
            }
            PhysicsError::PlatformOutOfBounds { index, count } => {
                write!(f, "platform index {} out of bounds (count: {})", index, count)
            }
        }
    }
}
