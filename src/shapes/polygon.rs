use crate::error::{PhysicsError, Result};
use crate::math::vec2::Vec2;

/// A convex polygon in body-local coordinates.
///
/// Vertices are expected clockwise (y-up) and convex. Only the cheap checks
/// are enforced: vertex count, finite coordinates and non-zero edges.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvexPolygon {
    vertices: Vec<Vec2>,
    center_of_mass: Vec2,
}

impl ConvexPolygon {
    pub fn new(vertices: Vec<Vec2>) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(PhysicsError::TooFewVertices {
                count: vertices.len(),
            });
        }
        if let Some(index) = vertices.iter().position(|v| !v.is_finite()) {
            return Err(PhysicsError::NonFiniteVertex { index });
        }

        let n = vertices.len();
        for index in 0..n {
            if vertices[index] == vertices[(index + 1) % n] {
                return Err(PhysicsError::DegenerateEdge { index });
            }
        }

        let mut sum = Vec2::ZERO;
        for v in &vertices {
            sum += *v;
        }
        let center_of_mass = sum / n as f64;

        Ok(Self {
            vertices,
            center_of_mass,
        })
    }

    /// Axis-aligned rectangle centred on the local origin, wound clockwise.
    pub fn rectangle(width: f64, height: f64) -> Result<Self> {
        let (hw, hh) = (width / 2.0, height / 2.0);
        Self::new(vec![
            Vec2::new(-hw, -hh),
            Vec2::new(-hw, hh),
            Vec2::new(hw, hh),
            Vec2::new(hw, -hh),
        ])
    }

    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    pub fn vertex(&self, index: usize) -> Vec2 {
        self.vertices[index]
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Always false; construction rejects fewer than three vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn next_index(&self, index: usize) -> usize {
        if index + 1 == self.vertices.len() {
            0
        } else {
            index + 1
        }
    }

    pub fn previous_index(&self, index: usize) -> usize {
        if index == 0 {
            self.vertices.len() - 1
        } else {
            index - 1
        }
    }

    /// Plain vertex average, not the area centroid.
    pub fn center_of_mass(&self) -> Vec2 {
        self.center_of_mass
    }

    /// Shoelace area; negative for clockwise winding.
    pub fn signed_area(&self) -> f64 {
        let n = self.vertices.len();
        let twice_area: f64 = (0..n)
            .map(|i| self.vertices[i].cross(self.vertices[(i + 1) % n]))
            .sum();
        twice_area / 2.0
    }

    pub fn is_clockwise(&self) -> bool {
        self.signed_area() < 0.0
    }
}
