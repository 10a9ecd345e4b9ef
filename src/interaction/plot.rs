use glam::Vec3;
use serde_json::Value;

use crate::error::RequestError;
use crate::grid::{tool_definition, GridBox, Provider};

use super::request::parse_tool_calls;

/// Stick figure shown before the first response, in scene space.
pub const STICK_FIGURE: [Vec3; 13] = [
    Vec3::new(0.0, 2.0, 1.25),
    Vec3::new(0.0, 1.0, 1.25),
    Vec3::new(-0.75, 1.0, 1.25),
    Vec3::new(0.75, 1.0, 1.25),
    Vec3::new(-0.75, 0.0, 1.25),
    Vec3::new(0.75, 0.0, 1.25),
    Vec3::new(0.0, -1.0, 1.25),
    Vec3::new(-0.75, -1.0, 1.25),
    Vec3::new(0.75, -1.0, 1.25),
    Vec3::new(-0.75, -3.0, 1.25),
    Vec3::new(0.75, -3.0, 1.25),
    Vec3::new(-0.75, -2.0, 1.25),
    Vec3::new(0.75, -2.0, 1.25),
];

/// A set of free points a language model redraws wholesale, one `plot`
/// call per point. No skeleton is involved.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSession {
    points: Vec<Vec3>,
    grid: GridBox,
}

impl Default for PlotSession {
    fn default() -> Self {
        Self::new(STICK_FIGURE.to_vec())
    }
}

impl PlotSession {
    pub fn new(points: Vec<Vec3>) -> Self {
        Self {
            points,
            grid: GridBox::default(),
        }
    }

    pub fn with_grid(mut self, grid: GridBox) -> Self {
        self.grid = grid;
        self
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn grid(&self) -> &GridBox {
        &self.grid
    }

    pub fn tool_definition(&self, provider: Provider) -> Value {
        tool_definition(provider, &self.grid)
    }

    /// Current points mirrored back into the model's frame, the state sent
    /// along with the next prompt.
    pub fn model_state(&self) -> Vec<[f32; 3]> {
        self.points.iter().map(|p| [-p.x, p.y, p.z]).collect()
    }

    /// Replaces the point set with one point per call, in call order. A
    /// malformed batch leaves the current points in place.
    pub fn apply_tool_calls(&mut self, json: &str) -> Result<&[Vec3], RequestError> {
        let calls = parse_tool_calls(json)?;
        self.points = calls.iter().map(|args| args.scene_point()).collect();
        log::debug!("plotted {} points", self.points.len());
        Ok(&self.points)
    }

    pub fn reset(&mut self) {
        self.points = STICK_FIGURE.to_vec();
    }
}
