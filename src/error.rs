use thiserror::Error;

use crate::math::vec2::Vec2;
use crate::world::BodyHandle;

/// Everything the solver can refuse or fail at.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    #[error("convex polygon needs at least 3 vertices, got {count}")]
    TooFewVertices { count: usize },
    #[error("vertex {index} has a non-finite coordinate")]
    NonFiniteVertex { index: usize },
    #[error("edge starting at vertex {index} has zero length")]
    DegenerateEdge { index: usize },
    #[error("time step must be finite and non-negative, got {0}")]
    InvalidTimeStep(f64),
    #[error("velocity must be finite, got {0}")]
    NonFiniteVelocity(Vec2),
    #[error("no body registered for {0}")]
    UnknownBody(BodyHandle),
    #[error("separation between {first} and {second} is not finite")]
    DegenerateContact { first: BodyHandle, second: BodyHandle },
}

pub type Result<T> = std::result::Result<T, PhysicsError>;
