use std::cmp::Ordering;

use tracing::{trace, warn};

use crate::collision::event::CollisionEvent;
use crate::collision::schedule::ImpactSchedule;
use crate::error::{PhysicsError, Result};
use crate::math::vec2::Vec2;
use crate::objects::{BodyFeature, ConvexBody};
use crate::world::{BodyHandle, SolverConfig};

// Below this separation the direction between the closest points is noise.
const NORMAL_FALLBACK_DISTANCE: f64 = 1e-12;

/// Result of re-evaluating a contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContactOutcome {
    /// The bodies touched while closing; their velocities were swapped and
    /// the contact wants to be looked at again straight away.
    Collided(CollisionEvent),
    Scheduled(ImpactSchedule),
}

/// Closest-feature tracker for one pair of bodies (Lin-Canny).
///
/// The converged features are kept between updates so the next walk starts
/// from the previous answer.
#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    first: BodyHandle,
    second: BodyHandle,
    first_feature: BodyFeature,
    second_feature: BodyFeature,
    schedule: ImpactSchedule,
    distance: f64,
    relative_speed: f64,
    normal: Vec2,
    closest_points: (Vec2, Vec2),
    converged: bool,
}

impl Contact {
    /// New contacts are due immediately.
    pub fn new(first: BodyHandle, first_body: &ConvexBody, second: BodyHandle, second_body: &ConvexBody) -> Self {
        Self {
            first,
            second,
            first_feature: first_body.random_feature(),
            second_feature: second_body.random_feature(),
            schedule: ImpactSchedule::Reprocess,
            distance: f64::INFINITY,
            relative_speed: 0.0,
            normal: Vec2::ZERO,
            closest_points: (Vec2::ZERO, Vec2::ZERO),
            converged: false,
        }
    }

    pub fn pair(&self) -> (BodyHandle, BodyHandle) {
        (self.first, self.second)
    }

    pub fn involves(&self, body: BodyHandle) -> bool {
        self.first == body || self.second == body
    }

    pub fn features(&self) -> (BodyFeature, BodyFeature) {
        (self.first_feature, self.second_feature)
    }

    pub fn schedule(&self) -> ImpactSchedule {
        self.schedule
    }

    /// Separation measured at the last update.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Closing speed along the normal at the last update; positive when the
    /// bodies approach each other.
    pub fn relative_speed(&self) -> f64 {
        self.relative_speed
    }

    /// Unit vector from the first body's closest point towards the second's.
    pub fn normal(&self) -> Vec2 {
        self.normal
    }

    /// World-space closest points (on first, on second) at the last update.
    pub fn closest_points(&self) -> (Vec2, Vec2) {
        self.closest_points
    }

    /// False when the last feature walk ran out of budget.
    pub fn is_converged(&self) -> bool {
        self.converged
    }

    pub fn mark_for_reprocessing(&mut self) {
        self.schedule = ImpactSchedule::Reprocess;
    }

    /// Brings both bodies to `evaluation_time`, re-converges the closest
    /// features and either resolves a collision or predicts the next time
    /// of impact.
    pub fn update(
        &mut self,
        bodies: &mut [ConvexBody],
        evaluation_time: f64,
        config: &SolverConfig,
    ) -> Result<ContactOutcome> {
        let (i, j) = (self.first.index(), self.second.index());
        bodies[i].advance_to_time(evaluation_time);
        bodies[j].advance_to_time(evaluation_time);

        self.converged = self.update_current_features(&bodies[i], &bodies[j]);
        if !self.converged {
            warn!(
                first = %self.first,
                second = %self.second,
                "feature walk ran out of budget, keeping {} / {}",
                self.first_feature,
                self.second_feature
            );
        }
        self.measure(&bodies[i], &bodies[j]);

        trace!(
            first = %self.first,
            second = %self.second,
            time = evaluation_time,
            distance = self.distance,
            relative_speed = self.relative_speed,
            "contact updated: {} / {}",
            self.first_feature,
            self.second_feature
        );

        if !self.distance.is_finite() || !self.relative_speed.is_finite() {
            self.schedule = ImpactSchedule::Never;
            return Err(PhysicsError::DegenerateContact {
                first: self.first,
                second: self.second,
            });
        }

        if self.distance < config.contact_epsilon && self.relative_speed > 0.0 {
            let first_velocity_before = bodies[i].velocity();
            let second_velocity_before = bodies[j].velocity();
            bodies[i].set_velocity(second_velocity_before);
            bodies[j].set_velocity(first_velocity_before);
            self.schedule = ImpactSchedule::Reprocess;

            return Ok(ContactOutcome::Collided(CollisionEvent {
                first: self.first,
                second: self.second,
                time: evaluation_time,
                normal: self.normal,
                distance: self.distance,
                closing_speed: self.relative_speed,
                first_velocity_before,
                second_velocity_before,
            }));
        }

        self.schedule = if self.relative_speed <= config.separation_speed_epsilon {
            ImpactSchedule::Never
        } else {
            ImpactSchedule::At(evaluation_time + self.distance / self.relative_speed)
        };
        Ok(ContactOutcome::Scheduled(self.schedule))
    }

    /// Runs both single-sided walks until neither moves. Moving one side can
    /// invalidate the other, so both are attempted on every pass.
    fn update_current_features(&mut self, first: &ConvexBody, second: &ConvexBody) -> bool {
        let budget = 8 * (first.feature_count() + second.feature_count()) + 16;
        self.walk_features(first, second, budget)
    }

    /// Returns false when `budget` steps were not enough to settle.
    fn walk_features(&mut self, first: &ConvexBody, second: &ConvexBody, mut budget: usize) -> bool {
        while try_update_current_feature(first, &mut self.first_feature, second, &mut self.second_feature, &mut budget)
            | try_update_current_feature(second, &mut self.second_feature, first, &mut self.first_feature, &mut budget)
        {
            if budget == 0 {
                return false;
            }
        }
        budget > 0
    }

    fn measure(&mut self, first: &ConvexBody, second: &ConvexBody) {
        let (on_first, on_second) =
            closest_feature_points(first, &self.first_feature, second, &self.second_feature);
        let separation = on_second - on_first;

        self.distance = separation.magnitude();
        if self.distance > NORMAL_FALLBACK_DISTANCE {
            self.normal = separation / self.distance;
        } else if self.normal == Vec2::ZERO {
            self.normal = touching_normal(
                first,
                &self.first_feature,
                on_first,
                second,
                &self.second_feature,
                on_second,
            );
        }
        // Otherwise keep the normal from the previous, separated update.
        self.relative_speed = self.normal.dot(first.velocity()) - self.normal.dot(second.velocity());
        self.closest_points = (on_first, on_second);
    }
}

/// Heap order for the solver's contact queue: soonest impact on top, ties
/// broken by body pair so runs are reproducible.
pub fn compare_by_toi_ascending(a: &Contact, b: &Contact) -> Ordering {
    a.schedule
        .cmp_soonest(&b.schedule)
        .then_with(|| a.pair().cmp(&b.pair()))
}

/// One side of the Lin-Canny walk: moves `current_feature` (and, for
/// edge/edge pairs, possibly `other_feature`) towards the closest pair.
/// Returns whether anything moved.
fn try_update_current_feature(
    current: &ConvexBody,
    current_feature: &mut BodyFeature,
    other: &ConvexBody,
    other_feature: &mut BodyFeature,
    budget: &mut usize,
) -> bool {
    let mut something_updated = false;
    loop {
        if *budget == 0 {
            return something_updated;
        }

        if other_feature.is_point() {
            let other_point = other.first_point_position(other_feature);
            return current.converge_feature(current_feature, other_point, budget) || something_updated;
        }

        if current_feature.is_point() {
            let nearest = other.point_nearest_to_other(other_feature, current.first_point_position(current_feature));
            if current.try_update_to_next_feature(current_feature, nearest)
                || current.try_update_to_previous_feature(current_feature, nearest)
            {
                *budget -= 1;
                something_updated = true;
                continue;
            }
            return something_updated;
        }

        if edges_face_in_parallel(current, current_feature, other, other_feature) {
            return something_updated;
        }
        step_towards_closest_endpoint(current, current_feature, other, other_feature);
        *budget -= 1;
        something_updated = true;
    }
}

/// Edge/edge case: of the four endpoint-to-edge distances, the smallest
/// tells which edge should collapse to which of its endpoints.
fn step_towards_closest_endpoint(
    current: &ConvexBody,
    current_feature: &mut BodyFeature,
    other: &ConvexBody,
    other_feature: &mut BodyFeature,
) {
    let other_first = other.first_point_position(other_feature);
    let other_second = other.second_point_position(other_feature);
    let this_first = current.first_point_position(current_feature);
    let this_second = current.second_point_position(current_feature);

    let distances = [
        current.point_nearest_to_other(current_feature, other_first).distance(other_first),
        current.point_nearest_to_other(current_feature, other_second).distance(other_second),
        other.point_nearest_to_other(other_feature, this_first).distance(this_first),
        other.point_nearest_to_other(other_feature, this_second).distance(this_second),
    ];
    let mut closest = 0;
    for (case, distance) in distances.iter().enumerate().skip(1) {
        if *distance < distances[closest] {
            closest = case;
        }
    }

    match closest {
        0 => other.update_to_previous_feature(other_feature),
        1 => other.update_to_next_feature(other_feature),
        2 => current.update_to_previous_feature(current_feature),
        _ => current.update_to_next_feature(current_feature),
    }
}

/// Anti-parallel edges, each in front of the other and overlapping along
/// their common direction, are already a closest pair.
fn edges_face_in_parallel(
    current: &ConvexBody,
    current_feature: &BodyFeature,
    other: &ConvexBody,
    other_feature: &BodyFeature,
) -> bool {
    let (a0, a1) = (
        current.first_point_position(current_feature),
        current.second_point_position(current_feature),
    );
    let (b0, b1) = (
        other.first_point_position(other_feature),
        other.second_point_position(other_feature),
    );
    let (da, db) = (a1 - a0, b1 - b0);

    let tolerance = ConvexBody::FEATURE_EPSILON * da.magnitude() * db.magnitude();
    if da.dot(db) >= 0.0 || da.cross(db).abs() > tolerance {
        return false;
    }

    // Outward is to the left of a clockwise edge.
    let in_front = |direction: Vec2, origin: Vec2, point: Vec2| {
        direction.cross(point - origin) > -ConvexBody::FEATURE_EPSILON
    };
    if !(in_front(da, a0, b0) && in_front(da, a0, b1) && in_front(db, b0, a0) && in_front(db, b0, a1)) {
        return false;
    }

    let length_squared = da.magnitude_squared();
    let t0 = (b0 - a0).dot(da) / length_squared;
    let t1 = (b1 - a0).dot(da) / length_squared;
    t0.min(t1).max(0.0) < t0.max(t1).min(1.0)
}

/// Closest points between two features. For segments that do not cross,
/// the minimum is attained at one of the four endpoints.
fn closest_feature_points(
    first: &ConvexBody,
    first_feature: &BodyFeature,
    second: &ConvexBody,
    second_feature: &BodyFeature,
) -> (Vec2, Vec2) {
    let second_ends = [
        second.first_point_position(second_feature),
        second.second_point_position(second_feature),
    ];
    let first_ends = [
        first.first_point_position(first_feature),
        first.second_point_position(first_feature),
    ];

    let candidates = second_ends
        .iter()
        .map(|&p| (first.point_nearest_to_other(first_feature, p), p))
        .chain(
            first_ends
                .iter()
                .map(|&p| (p, second.point_nearest_to_other(second_feature, p))),
        );

    let mut best = (first_ends[0], second_ends[0]);
    let mut best_distance = f64::INFINITY;
    for (on_first, on_second) in candidates {
        let distance = on_first.distance(on_second);
        if distance < best_distance {
            best = (on_first, on_second);
            best_distance = distance;
        }
    }
    best
}

/// Normal for a pair that is already touching on its first update: the
/// face normal when the contact lies inside an edge, the direction between
/// the centers of mass otherwise.
fn touching_normal(
    first: &ConvexBody,
    first_feature: &BodyFeature,
    on_first: Vec2,
    second: &ConvexBody,
    second_feature: &BodyFeature,
    on_second: Vec2,
) -> Vec2 {
    if first_feature.is_edge() && lies_inside_edge(first, first_feature, on_first) {
        outward_normal(first, first_feature)
    } else if second_feature.is_edge() && lies_inside_edge(second, second_feature, on_second) {
        -outward_normal(second, second_feature)
    } else {
        (second.center_of_mass() - first.center_of_mass()).normalize()
    }
}

fn lies_inside_edge(body: &ConvexBody, edge: &BodyFeature, point: Vec2) -> bool {
    point.distance(body.first_point_position(edge)) > NORMAL_FALLBACK_DISTANCE
        && point.distance(body.second_point_position(edge)) > NORMAL_FALLBACK_DISTANCE
}

fn outward_normal(body: &ConvexBody, edge: &BodyFeature) -> Vec2 {
    (body.second_point_position(edge) - body.first_point_position(edge))
        .perpendicular()
        .normalize()
}
