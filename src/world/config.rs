/// Tuning knobs for [`Solver`](super::Solver).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Separation below which a closing pair counts as colliding.
    pub contact_epsilon: f64,
    /// Closing speeds at or below this are treated as separating, and the
    /// contact is not scheduled again until a velocity changes.
    pub separation_speed_epsilon: f64,
    /// Upper bound on contact updates within one `advance` call.
    pub max_events_per_step: usize,
}

impl SolverConfig {
    pub const DEFAULT_CONTACT_EPSILON: f64 = 0.05;
    pub const DEFAULT_SEPARATION_SPEED_EPSILON: f64 = 1e-9;
    pub const DEFAULT_MAX_EVENTS_PER_STEP: usize = 10_000;
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            contact_epsilon: Self::DEFAULT_CONTACT_EPSILON,
            separation_speed_epsilon: Self::DEFAULT_SEPARATION_SPEED_EPSILON,
            max_events_per_step: Self::DEFAULT_MAX_EVENTS_PER_STEP,
        }
    }
}
