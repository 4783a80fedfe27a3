use crate::error::Result;
use crate::math::{Transform, Vec2};
use crate::objects::feature::BodyFeature;
use crate::shapes::ConvexPolygon;

/// A rigid convex polygon moving with constant velocity.
///
/// The boundary is walked as the cyclic feature sequence
/// vertex 0, edge 0, vertex 1, edge 1, ... where edge `i` runs from vertex `i`
/// to vertex `i + 1`. `transform` always describes the body at exactly
/// `last_time_updated`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvexBody {
    polygon: ConvexPolygon,
    transform: Transform,
    velocity: Vec2, // units / second
    last_time_updated: f64,
}

impl ConvexBody {
    /// Tolerance on the outside of every Voronoi boundary test. Points on a
    /// boundary keep the current feature.
    pub const FEATURE_EPSILON: f64 = 1e-6;

    /// Creates a body at the identity transform. Vertices must be clockwise
    /// and convex; only vertex count, finiteness and edge length are checked.
    pub fn new(vertices: Vec<Vec2>) -> Result<Self> {
        Self::with_transform(vertices, Transform::identity())
    }

    pub fn with_transform(vertices: Vec<Vec2>, transform: Transform) -> Result<Self> {
        Ok(Self::from_polygon(ConvexPolygon::new(vertices)?, transform))
    }

    pub fn from_polygon(polygon: ConvexPolygon, transform: Transform) -> Self {
        Self {
            polygon,
            transform,
            velocity: Vec2::ZERO,
            last_time_updated: 0.0,
        }
    }

    /// Builder-style velocity setter for scene construction.
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn polygon(&self) -> &ConvexPolygon {
        &self.polygon
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    pub fn last_time_updated(&self) -> f64 {
        self.last_time_updated
    }

    /// Declares the current transform to be the body's pose at `time`
    /// without moving it.
    pub(crate) fn set_last_time_updated(&mut self, time: f64) {
        self.last_time_updated = time;
    }

    /// Number of features in the cycle: one vertex and one edge per vertex.
    pub fn feature_count(&self) -> usize {
        2 * self.polygon.len()
    }

    pub fn point_position(&self, local_point: Vec2) -> Vec2 {
        self.transform.apply(local_point)
    }

    pub fn vertex_position(&self, index: usize) -> Vec2 {
        self.point_position(self.polygon.vertex(index))
    }

    /// World-space center of mass.
    pub fn center_of_mass(&self) -> Vec2 {
        self.point_position(self.polygon.center_of_mass())
    }

    pub fn world_vertices(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.polygon.vertices().iter().map(|v| self.transform.apply(*v))
    }

    /// World-space edges in winding order, closing edge last.
    pub fn edges(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        (0..self.polygon.len()).map(|i| {
            (
                self.vertex_position(i),
                self.vertex_position(self.polygon.next_index(i)),
            )
        })
    }

    /// Integrates the constant velocity up to `time`. Calling it twice with
    /// the same time is a no-op; an earlier time moves the body backwards.
    pub fn advance_to_time(&mut self, time: f64) {
        let time_delta = time - self.last_time_updated;
        self.last_time_updated = time;
        self.transform.pre_translate(self.velocity * time_delta);
    }

    /// Deterministic starting feature; any feature works since the walk
    /// converges from everywhere.
    pub fn random_feature(&self) -> BodyFeature {
        BodyFeature::point(0)
    }

    pub fn first_point_position(&self, feature: &BodyFeature) -> Vec2 {
        self.vertex_position(feature.vertex)
    }

    /// Edge end point, or the vertex itself for a point feature.
    pub fn second_point_position(&self, feature: &BodyFeature) -> Vec2 {
        if feature.is_point {
            self.first_point_position(feature)
        } else {
            self.vertex_position(self.polygon.next_index(feature.vertex))
        }
    }

    /// Steps backwards if `other_point` lies outside the feature's Voronoi
    /// region on the previous side. Returns whether the feature changed.
    pub fn try_update_to_previous_feature(&self, feature: &mut BodyFeature, other_point: Vec2) -> bool {
        let current_point = self.vertex_position(feature.vertex);
        let to_other = other_point - current_point;

        if feature.is_point {
            let previous = self.polygon.previous_index(feature.vertex);
            let to_previous = self.vertex_position(previous) - current_point;
            let boundary = to_previous.perpendicular_cw();

            if to_other.cross(boundary) > -Self::FEATURE_EPSILON {
                return false;
            }
            feature.is_point = false;
            feature.vertex = previous;
            true
        } else {
            let next_point = self.vertex_position(self.polygon.next_index(feature.vertex));
            let along_edge = next_point - current_point;
            let boundary = along_edge.perpendicular();

            // Besides the start boundary, a point behind the edge line is not
            // in the edge's region either.
            if to_other.cross(boundary) > -Self::FEATURE_EPSILON
                && along_edge.cross(to_other) > -Self::FEATURE_EPSILON
            {
                return false;
            }
            feature.is_point = true;
            true
        }
    }

    /// Forward counterpart of `try_update_to_previous_feature`. It does not
    /// test the edge line itself, so the forward step must be tried first.
    pub fn try_update_to_next_feature(&self, feature: &mut BodyFeature, other_point: Vec2) -> bool {
        let current_point = self.vertex_position(feature.vertex);
        let next = self.polygon.next_index(feature.vertex);
        let next_point = self.vertex_position(next);

        if feature.is_point {
            let to_other = other_point - current_point;
            let boundary = (next_point - current_point).perpendicular();

            if boundary.cross(to_other) > -Self::FEATURE_EPSILON {
                return false;
            }
            feature.is_point = false;
            true
        } else {
            let to_other = other_point - next_point;
            let boundary = (current_point - next_point).perpendicular_cw();

            if boundary.cross(to_other) > -Self::FEATURE_EPSILON {
                return false;
            }
            feature.is_point = true;
            feature.vertex = next;
            true
        }
    }

    pub fn update_to_next_feature(&self, feature: &mut BodyFeature) {
        if feature.is_point {
            feature.is_point = false;
        } else {
            feature.is_point = true;
            feature.vertex = self.polygon.next_index(feature.vertex);
        }
    }

    pub fn update_to_previous_feature(&self, feature: &mut BodyFeature) {
        if feature.is_point {
            feature.is_point = false;
            feature.vertex = self.polygon.previous_index(feature.vertex);
        } else {
            feature.is_point = true;
        }
    }

    /// Walks `feature` forwards, then backwards, until neither direction
    /// moves it, so it ends in the feature whose Voronoi region holds
    /// `other_point`. Every step spends one unit of `budget`; the walk stops
    /// early when the budget runs out. Returns whether anything moved.
    pub fn converge_feature(&self, feature: &mut BodyFeature, other_point: Vec2, budget: &mut usize) -> bool {
        let mut moved = false;
        loop {
            let mut stepped = false;
            while *budget > 0 && self.try_update_to_next_feature(feature, other_point) {
                *budget -= 1;
                stepped = true;
            }
            while *budget > 0 && self.try_update_to_previous_feature(feature, other_point) {
                *budget -= 1;
                stepped = true;
            }
            moved |= stepped;
            if !stepped || *budget == 0 {
                return moved;
            }
        }
    }

    /// Closest point of the feature to `other_point`, in world space.
    pub fn point_nearest_to_other(&self, feature: &BodyFeature, other_point: Vec2) -> Vec2 {
        let first_point = self.first_point_position(feature);
        if feature.is_point {
            return first_point;
        }
        let second_point = self.second_point_position(feature);
        let feature_vector = second_point - first_point;
        let hypot_vector = other_point - first_point;
        let ortho_vector = feature_vector.perpendicular_cw();

        // Solve hypot = x * feature + y * ortho for x by Cramer's rule.
        let determinant = feature_vector.cross(ortho_vector);
        let x = hypot_vector.cross(ortho_vector) / determinant;

        if x <= 0.0 {
            first_point
        } else if x >= 1.0 {
            second_point
        } else {
            first_point + feature_vector * x
        }
    }
}
