//! Continuous collision detection for translating 2D convex polygons.
//!
//! Each pair of bodies keeps its closest features between queries
//! (Lin-Canny), predicts when the gap closes, and the [`Solver`] resolves
//! those predictions in time order before moving anything to the end of a
//! step.

pub mod collision;
pub mod debug_render;
pub mod error;
pub mod math;
pub mod objects;
pub mod shapes;
pub mod world;

// Re-export key types for easier use
pub use collision::{CollisionEvent, Contact, ContactOutcome, ImpactSchedule};
pub use debug_render::{DebugColor, DebugLine, DebugRenderer, LineRecorder};
pub use error::{PhysicsError, Result};
pub use math::{Transform, Vec2};
pub use objects::{BodyFeature, ConvexBody};
pub use shapes::ConvexPolygon;
pub use world::{BodyHandle, Solver, SolverConfig};
