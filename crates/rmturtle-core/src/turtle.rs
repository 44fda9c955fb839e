//! Turtle cursor and open path buffer.
//!
//! The turtle stores path points untransformed; the caller bakes in a
//! transform when the path is committed as a stroke.

use kurbo::{Point, Vec2};
use std::f64::consts::TAU;
use std::mem;

use crate::document::Tool;
use crate::error::{SceneError, SceneResult, StackKind};
use crate::geometry;
use crate::scene::StrokePoint;

#[derive(Debug, Clone, Copy, PartialEq)]
struct SavedState {
    position: Point,
    heading: f64,
    pen_down: bool,
    tool: Option<Tool>,
}

/// Cursor state: position, heading in `[0, 2π)`, pen flag and open path.
#[derive(Debug, Clone, PartialEq)]
pub struct Turtle {
    position: Point,
    heading: f64,
    pen_down: bool,
    path: Vec<StrokePoint>,
    saved: Vec<SavedState>,
}

impl Default for Turtle {
    fn default() -> Self {
        Self::new()
    }
}

impl Turtle {
    /// Turtle at the origin facing +x with the pen down.
    pub fn new() -> Self {
        Self {
            position: Point::ZERO,
            heading: 0.0,
            pen_down: true,
            path: Vec::new(),
            saved: Vec::new(),
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// Heading in radians.
    pub fn heading(&self) -> f64 {
        self.heading
    }

    pub fn is_pen_down(&self) -> bool {
        self.pen_down
    }

    pub fn path(&self) -> &[StrokePoint] {
        &self.path
    }

    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Teleport without drawing; the open path is discarded.
    pub fn move_to(&mut self, position: Point) {
        self.position = position;
        self.path.clear();
    }

    /// Place the cursor without touching the path.
    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub fn forward(&mut self, distance: f64, tool: &Tool) {
        let target = self.position + Vec2::from_angle(self.heading) * distance;
        self.draw_to(target, tool);
    }

    /// Move to `target`, extending the path when the pen is down.
    pub fn line_to(&mut self, target: Point, tool: &Tool) {
        self.draw_to(target, tool);
    }

    fn draw_to(&mut self, target: Point, tool: &Tool) {
        if self.pen_down {
            self.seed(tool);
        }
        self.position = target;
        if self.pen_down {
            self.path.push(tool.stamp(target));
        }
    }

    fn seed(&mut self, tool: &Tool) {
        if self.path.is_empty() {
            self.path.push(tool.stamp(self.position));
        }
    }

    /// Turn by `angle` radians; negative turns the other way.
    pub fn rotate(&mut self, angle: f64) {
        self.set_heading(self.heading + angle);
    }

    pub fn set_heading(&mut self, angle: f64) {
        let heading = angle.rem_euclid(TAU);
        // rem_euclid can round up to exactly TAU for tiny negative inputs
        self.heading = if heading >= TAU { 0.0 } else { heading };
    }

    pub fn pen_down(&mut self, tool: &Tool) {
        self.pen_down = true;
        self.seed(tool);
    }

    pub fn pen_up(&mut self) {
        self.pen_down = false;
    }

    /// Start a fresh path at the cursor, regardless of the pen state.
    pub fn begin_path(&mut self, tool: &Tool) {
        self.path.clear();
        self.path.push(tool.stamp(self.position));
    }

    /// Append a copy of the first point if the path does not already end
    /// there. The cursor stays where it was.
    pub fn close_path(&mut self, tool: &Tool) {
        let (Some(first), Some(last)) = (self.path.first(), self.path.last()) else {
            return;
        };
        if !first.same_position(last) {
            let start = first.position();
            self.path.push(tool.stamp(start));
        }
    }

    pub fn quad_to(&mut self, control: Point, end: Point, samples: usize, tool: &Tool) {
        let start = self.curve_start(tool);
        let points = geometry::sample_quad(start, control, end, samples);
        self.extend_curve(points, tool);
    }

    pub fn cubic_to(&mut self, c1: Point, c2: Point, end: Point, samples: usize, tool: &Tool) {
        let start = self.curve_start(tool);
        let points = geometry::sample_cubic(start, c1, c2, end, samples);
        self.extend_curve(points, tool);
    }

    fn curve_start(&mut self, tool: &Tool) -> Point {
        if self.path.is_empty() {
            self.begin_path(tool);
        }
        self.path
            .last()
            .map(StrokePoint::position)
            .unwrap_or(self.position)
    }

    fn extend_curve(&mut self, points: Vec<Point>, tool: &Tool) {
        if let Some(&end) = points.last() {
            self.position = end;
        }
        self.path.extend(points.into_iter().map(|p| tool.stamp(p)));
    }

    /// Save position, heading, pen state and optionally a tool.
    pub fn push(&mut self, tool: Option<Tool>) {
        self.saved.push(SavedState {
            position: self.position,
            heading: self.heading,
            pen_down: self.pen_down,
            tool,
        });
    }

    /// Restore the last saved state and return the tool saved with it.
    ///
    /// The open path is cleared so the restored cursor never connects back
    /// to where the turtle was.
    pub fn pop(&mut self) -> SceneResult<Option<Tool>> {
        let state = self
            .saved
            .pop()
            .ok_or(SceneError::StackUnderflow(StackKind::Turtle))?;
        self.position = state.position;
        self.heading = state.heading;
        self.pen_down = state.pen_down;
        self.path.clear();
        Ok(state.tool)
    }

    /// Hand over the open path, leaving it empty.
    pub fn take_path(&mut self) -> Vec<StrokePoint> {
        mem::take(&mut self.path)
    }
}
