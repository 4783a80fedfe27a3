pub mod contact;
pub mod event;
pub mod priority_queue;
pub mod schedule;

// Re-export key types
pub use contact::{compare_by_toi_ascending, Contact, ContactOutcome};
pub use event::CollisionEvent;
pub use priority_queue::PriorityQueue;
pub use schedule::ImpactSchedule;
