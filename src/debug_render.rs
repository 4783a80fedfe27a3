//! Debug visualization.
//!
//! The solver never talks to a graphics backend directly. It describes what
//! to draw as colored line segments pushed into a [`DebugRenderer`], which a
//! host implements for whatever it renders with.

use crate::math::vec2::Vec2;

/// RGBA color, 0-255 per channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DebugColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl DebugColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Body outlines.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    /// Features tracked by the closest contact.
    pub const RED: Self = Self::new(255, 50, 50, 255);
    /// Segment between the closest points.
    pub const YELLOW: Self = Self::new(255, 255, 50, 255);
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DebugLine {
    pub start: Vec2,
    pub end: Vec2,
    pub color: DebugColor,
}

/// Sink for debug geometry.
pub trait DebugRenderer {
    fn draw_line(&mut self, start: Vec2, end: Vec2, color: DebugColor);

    /// Small axis-aligned cross, used for point features.
    fn draw_cross(&mut self, center: Vec2, half_size: f64, color: DebugColor) {
        let dx = Vec2::new(half_size, 0.0);
        let dy = Vec2::new(0.0, half_size);
        self.draw_line(center - dx, center + dx, color);
        self.draw_line(center - dy, center + dy, color);
    }
}

/// Collects lines for a frame so they can be drawn (or inspected) later.
#[derive(Clone, Debug, Default)]
pub struct LineRecorder {
    pub lines: Vec<DebugLine>,
}

impl LineRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines_with_color(&self, color: DebugColor) -> impl Iterator<Item = &DebugLine> + '_ {
        self.lines.iter().filter(move |line| line.color == color)
    }
}

impl DebugRenderer for LineRecorder {
    fn draw_line(&mut self, start: Vec2, end: Vec2, color: DebugColor) {
        self.lines.push(DebugLine { start, end, color });
    }
}
