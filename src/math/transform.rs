use std::ops::Mul;

use super::vec2::Vec2;

/// Row-major 3x3 affine matrix mapping body-local points to world space.
///
/// The upper-left 2x2 block is the linear part, the third column holds the
/// translation and the last row stays `[0, 0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub m: [[f64; 3]; 3],
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    /// Rotation by `rotation` radians followed by a translation to `position`.
    pub fn new(position: Vec2, rotation: f64) -> Self {
        Self::from_translation(position) * Self::from_rotation(rotation)
    }

    pub fn identity() -> Self {
        Self::IDENTITY
    }

    pub fn from_translation(offset: Vec2) -> Self {
        Self {
            m: [[1.0, 0.0, offset.x], [0.0, 1.0, offset.y], [0.0, 0.0, 1.0]],
        }
    }

    /// Counter-clockwise rotation about the local origin.
    pub fn from_rotation(angle: f64) -> Self {
        let (sin_a, cos_a) = angle.sin_cos();
        Self {
            m: [[cos_a, -sin_a, 0.0], [sin_a, cos_a, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    /// Maps a local point to world space.
    pub fn apply(&self, point: Vec2) -> Vec2 {
        let m = &self.m;
        Vec2::new(
            m[0][0] * point.x + m[0][1] * point.y + m[0][2],
            m[1][0] * point.x + m[1][1] * point.y + m[1][2],
        )
    }

    pub fn translation(&self) -> Vec2 {
        Vec2::new(self.m[0][2], self.m[1][2])
    }

    /// Composes a translation on the left: `self = T(offset) * self`.
    pub fn pre_translate(&mut self, offset: Vec2) {
        self.m[0][2] += offset.x;
        self.m[1][2] += offset.y;
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Transform {
    type Output = Transform;

    fn mul(self, rhs: Transform) -> Transform {
        let mut out = [[0.0; 3]; 3];
        for (row, out_row) in out.iter_mut().enumerate() {
            for (col, cell) in out_row.iter_mut().enumerate() {
                *cell = (0..3).map(|k| self.m[row][k] * rhs.m[k][col]).sum();
            }
        }
        Transform { m: out }
    }
}
