use std::fmt;

/// Cursor into a convex body's feature cycle.
///
/// A point feature is the vertex at `vertex`; an edge feature is the edge
/// from `vertex` to the next vertex in winding order. The cursor carries no
/// reference to its body and must be resolved against the body it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyFeature {
    pub(crate) vertex: usize,
    pub(crate) is_point: bool,
}

impl BodyFeature {
    pub fn point(vertex: usize) -> Self {
        Self {
            vertex,
            is_point: true,
        }
    }

    pub fn edge(vertex: usize) -> Self {
        Self {
            vertex,
            is_point: false,
        }
    }

    /// Anchor vertex: the vertex itself, or the edge's starting vertex.
    pub fn vertex(&self) -> usize {
        self.vertex
    }

    pub fn is_point(&self) -> bool {
        self.is_point
    }

    pub fn is_edge(&self) -> bool {
        !self.is_point
    }
}

impl fmt::Display for BodyFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_point {
            write!(f, "vertex {}", self.vertex)
        } else {
            write!(f, "edge from vertex {}", self.vertex)
        }
    }
}
