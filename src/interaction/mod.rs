//! Caller-owned pointer and wheel state for moving and zooming a text block.
//!
//! The renderer never subscribes to input. A host forwards its own events
//! here and applies the result with [`InteractionState::apply`].

use glam::{Mat4, Vec2, Vec3};

use crate::gpu::TextBlock;

/// Wheel delta units per unit of pixel scale.
pub const WHEEL_DIVISOR: f32 = 1000.0;

/// Local units moved per pointer pixel while dragging.
pub const DRAG_FACTOR: f32 = 0.01;

#[derive(Debug, Clone, PartialEq)]
pub struct InteractionState {
    pub translation: Vec3,
    pub pixel_scale: f32,
    dragging: bool,
    last_pointer: Vec2,
}

impl InteractionState {
    pub fn new(pixel_scale: f32) -> Self {
        Self {
            translation: Vec3::ZERO,
            pixel_scale,
            dragging: false,
            last_pointer: Vec2::ZERO,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Scroll down shrinks, scroll up grows. Returns the new pixel scale.
    ///
    /// The result is not clamped; zero or negative scales are passed on.
    pub fn on_wheel(&mut self, delta_y: f32) -> f32 {
        self.pixel_scale -= delta_y / WHEEL_DIVISOR;
        self.pixel_scale
    }

    pub fn on_pointer_down(&mut self, x: f32, y: f32) {
        self.dragging = true;
        self.last_pointer = Vec2::new(x, y);
    }

    /// Returns true when the translation changed.
    pub fn on_pointer_move(&mut self, x: f32, y: f32) -> bool {
        if !self.dragging {
            return false;
        }
        let pos = Vec2::new(x, y);
        let delta = (pos - self.last_pointer) * DRAG_FACTOR;
        // Screen y grows down, local y grows up.
        self.translation.x += delta.x;
        self.translation.y -= delta.y;
        self.last_pointer = pos;
        true
    }

    pub fn on_pointer_up(&mut self) {
        self.dragging = false;
    }

    pub fn on_pointer_leave(&mut self) {
        self.dragging = false;
    }

    pub fn title_transform(&self) -> Mat4 {
        Mat4::from_translation(self.translation)
    }

    /// Push the current scale and translation into `block`.
    pub fn apply(&self, block: &mut TextBlock) {
        block.set_pixel_scale(self.pixel_scale);
        block.set_transform(self.title_transform());
    }
}

/// Translate to `position`, then rotate about X, Y and Z in that order.
///
/// Zero angles are skipped, matching a chain of individual rotations.
pub fn text_transform(position: Vec3, rotation: Vec3) -> Mat4 {
    let mut m = Mat4::from_translation(position);
    if rotation.x != 0.0 {
        m *= Mat4::from_rotation_x(rotation.x);
    }
    if rotation.y != 0.0 {
        m *= Mat4::from_rotation_y(rotation.y);
    }
    if rotation.z != 0.0 {
        m *= Mat4::from_rotation_z(rotation.z);
    }
    m
}
