use crate::math::vec2::Vec2;
use crate::world::BodyHandle;

/// A resolved collision between two bodies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    pub first: BodyHandle,
    pub second: BodyHandle,
    /// Simulation time at which the velocities were swapped.
    pub time: f64,
    /// Unit contact normal pointing from the first body towards the second.
    pub normal: Vec2,
    /// Remaining gap between the bodies when the collision fired.
    pub distance: f64,
    /// Closing speed along `normal` before the response.
    pub closing_speed: f64,
    pub first_velocity_before: Vec2,
    pub second_velocity_before: Vec2,
}
