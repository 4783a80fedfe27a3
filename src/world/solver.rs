use std::fmt;

use tracing::{debug, warn};

use crate::collision::contact::{compare_by_toi_ascending, Contact, ContactOutcome};
use crate::collision::event::CollisionEvent;
use crate::collision::priority_queue::PriorityQueue;
use crate::debug_render::{DebugColor, DebugRenderer};
use crate::error::{PhysicsError, Result};
use crate::math::vec2::Vec2;
use crate::objects::{BodyFeature, ConvexBody};
use crate::world::config::SolverConfig;

/// Stable reference to a body owned by a [`Solver`]. Bodies are never
/// removed, so a handle stays valid for the life of its solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyHandle(pub(crate) usize);

impl BodyHandle {
    /// Insertion order of the body, starting at 0.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for BodyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "body #{}", self.0)
    }
}

// Half size of the cross drawn for a point feature.
const POINT_FEATURE_MARK: f64 = 0.1;

/// Event-driven solver for translating convex bodies.
///
/// Every pair of bodies has one persistent [`Contact`]. Contacts sit in a
/// queue ordered by predicted time of impact; `advance` resolves them in
/// time order and only then moves every body to the end of the step.
pub struct Solver {
    bodies: Vec<ConvexBody>,
    contacts: PriorityQueue<Contact>,
    time: f64,
    config: SolverConfig,
    // Collisions resolved during the last `advance`.
    events: Vec<CollisionEvent>,
}

impl Solver {
    pub fn new() -> Self {
        Self::with_config(SolverConfig::default())
    }

    pub fn with_config(config: SolverConfig) -> Self {
        Self {
            bodies: Vec::new(),
            contacts: PriorityQueue::new(compare_by_toi_ascending),
            time: 0.0,
            config,
            events: Vec::new(),
        }
    }

    /// Adds a body at the current simulation time and pairs it with every
    /// body already present.
    pub fn add_body(&mut self, mut body: ConvexBody) -> BodyHandle {
        body.set_last_time_updated(self.time);
        let handle = BodyHandle(self.bodies.len());

        for (index, existing) in self.bodies.iter().enumerate() {
            self.contacts
                .push(Contact::new(BodyHandle(index), existing, handle, &body));
        }
        self.bodies.push(body);

        debug!(
            body = %handle,
            time = self.time,
            contacts = self.contacts.len(),
            "body added"
        );
        handle
    }

    /// Moves the simulation forward by `dt` seconds, resolving every
    /// collision predicted to happen strictly before the new time.
    ///
    /// A contact whose geometry turns out degenerate is parked and the step
    /// still completes; the first such failure is returned afterwards.
    pub fn advance(&mut self, dt: f64) -> Result<()> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(PhysicsError::InvalidTimeStep(dt));
        }

        let target_time = self.time + dt;
        self.events.clear();

        // Time of the event being resolved. Freshly scheduled contacts are
        // evaluated here rather than at the start of the step.
        let mut clock = self.time;
        let mut first_error = None;
        let mut processed = 0;

        while self
            .contacts
            .peek()
            .is_some_and(|contact| contact.schedule().is_due_before(target_time))
        {
            if processed == self.config.max_events_per_step {
                warn!(
                    time = clock,
                    limit = self.config.max_events_per_step,
                    "event limit reached, deferring remaining contacts"
                );
                break;
            }
            let Some(mut contact) = self.contacts.pop() else {
                break;
            };
            processed += 1;

            if let Some(toi) = contact.schedule().time() {
                clock = clock.max(toi);
            }

            match contact.update(&mut self.bodies, clock, &self.config) {
                Ok(ContactOutcome::Collided(event)) => {
                    debug!(
                        first = %event.first,
                        second = %event.second,
                        time = event.time,
                        closing_speed = event.closing_speed,
                        "collision resolved, normal {}",
                        event.normal
                    );
                    // Predictions involving either body used the old velocities.
                    self.contacts.update_where(
                        |other| other.involves(event.first) || other.involves(event.second),
                        Contact::mark_for_reprocessing,
                    );
                    self.events.push(event);
                }
                Ok(ContactOutcome::Scheduled(_)) => {}
                Err(err) => {
                    warn!(time = clock, "{err}");
                    first_error.get_or_insert(err);
                }
            }
            self.contacts.push(contact);
        }

        self.time = target_time;
        for body in &mut self.bodies {
            body.advance_to_time(target_time);
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&ConvexBody> {
        self.bodies.get(handle.0)
    }

    pub fn bodies(&self) -> &[ConvexBody] {
        &self.bodies
    }

    /// Handles of every body, in insertion order.
    pub fn handles(&self) -> impl Iterator<Item = BodyHandle> {
        (0..self.bodies.len()).map(BodyHandle)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Always `n * (n - 1) / 2` for `n` bodies.
    pub fn contact_count(&self) -> usize {
        self.contacts.len()
    }

    /// All contacts, in no particular order.
    pub fn contacts(&self) -> impl Iterator<Item = &Contact> {
        self.contacts.iter()
    }

    /// The contact due soonest.
    pub fn closest_contact(&self) -> Option<&Contact> {
        self.contacts.peek()
    }

    /// Changes a body's velocity from the current time on. Every contact of
    /// that body is re-evaluated at the next `advance`.
    pub fn set_velocity(&mut self, handle: BodyHandle, velocity: Vec2) -> Result<()> {
        if !velocity.is_finite() {
            return Err(PhysicsError::NonFiniteVelocity(velocity));
        }
        let time = self.time;
        let body = self
            .bodies
            .get_mut(handle.0)
            .ok_or(PhysicsError::UnknownBody(handle))?;
        body.advance_to_time(time);
        body.set_velocity(velocity);

        self.contacts
            .update_where(|contact| contact.involves(handle), Contact::mark_for_reprocessing);
        Ok(())
    }

    pub fn collision_events(&self) -> &[CollisionEvent] {
        &self.events
    }

    /// Draws every body outline, plus the features and closest points of the
    /// contact due soonest.
    pub fn debug_draw(&self, renderer: &mut impl DebugRenderer) {
        for body in &self.bodies {
            for (start, end) in body.edges() {
                renderer.draw_line(start, end, DebugColor::WHITE);
            }
        }

        let Some(contact) = self.contacts.peek() else {
            return;
        };
        let (first, second) = contact.pair();
        let (first_feature, second_feature) = contact.features();
        draw_feature(renderer, &self.bodies[first.0], &first_feature);
        draw_feature(renderer, &self.bodies[second.0], &second_feature);

        if contact.distance().is_finite() {
            let (on_first, on_second) = contact.closest_points();
            renderer.draw_line(on_first, on_second, DebugColor::YELLOW);
        }
    }
}

fn draw_feature(renderer: &mut impl DebugRenderer, body: &ConvexBody, feature: &BodyFeature) {
    let start = body.first_point_position(feature);
    if feature.is_point() {
        renderer.draw_cross(start, POINT_FEATURE_MARK, DebugColor::RED);
    } else {
        renderer.draw_line(start, body.second_point_position(feature), DebugColor::RED);
    }
}

impl Default for Solver {
    fn default() -> Self {
        Self::new()
    }
}
