//! Affine transform stack applied to committed geometry.

use kurbo::{Affine, Point, Vec2};

use crate::error::{SceneError, SceneResult, StackKind};

/// The active transform plus saved transforms.
///
/// `translate`, `scale` and `rotate` right-multiply the active transform, so
/// each new operation acts in the local frame established by the previous
/// ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformStack {
    current: Affine,
    saved: Vec<Affine>,
}

impl TransformStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Affine {
        self.current
    }

    /// Number of saved transforms.
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    pub fn push(&mut self) {
        self.saved.push(self.current);
    }

    pub fn pop(&mut self) -> SceneResult<()> {
        self.current = self
            .saved
            .pop()
            .ok_or(SceneError::StackUnderflow(StackKind::Transform))?;
        Ok(())
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.current *= Affine::translate(Vec2::new(dx, dy));
    }

    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.current *= Affine::scale_non_uniform(sx, sy);
    }

    /// Rotate by `angle` radians.
    pub fn rotate(&mut self, angle: f64) {
        self.current *= Affine::rotate(angle);
    }

    pub fn apply(&self, point: Point) -> Point {
        self.current * point
    }

    pub fn is_identity(&self) -> bool {
        self.current == Affine::IDENTITY
    }
}
