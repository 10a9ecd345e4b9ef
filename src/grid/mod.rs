//! Bounded plotting grid the interaction layer snaps targets onto.
//!
//! The grid is a box centred on the origin, cut into equal sections along
//! each axis. Valid coordinates are the box boundaries and the interior cut
//! positions. The pose solver never consults the grid.

mod schema;

use std::fmt;

use glam::{UVec3, Vec3};
use serde::{Deserialize, Serialize};

pub use schema::{
    pose_tool_definition, tool_definition, tool_schema, Provider, PLOT_TOOL_DESCRIPTION,
    PLOT_TOOL_NAME,
};

pub const DEFAULT_TOLERANCE: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisInfo {
    pub domain: (f32, f32),
    pub step: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridBox {
    pub size: Vec3,
    pub sections: UVec3,
}

impl Default for GridBox {
    fn default() -> Self {
        Self {
            size: Vec3::new(3.0, 6.0, 5.0),
            sections: UVec3::new(4, 6, 4),
        }
    }
}

impl GridBox {
    pub fn new(size: Vec3, sections: UVec3) -> Self {
        Self { size, sections }
    }

    pub fn axis_info(&self, axis: Axis) -> AxisInfo {
        let dimension = self.size[axis.index()];
        let sections = self.sections[axis.index()];
        AxisInfo {
            domain: (-dimension / 2.0, dimension / 2.0),
            step: dimension / sections as f32,
        }
    }

    /// Sorted valid values along one axis.
    pub fn positions(&self, axis: Axis) -> Vec<f32> {
        generate_positions(self.size[axis.index()], self.sections[axis.index()])
    }

    pub fn intersection_points(&self) -> Vec<Vec3> {
        let xs = self.positions(Axis::X);
        let ys = self.positions(Axis::Y);
        let zs = self.positions(Axis::Z);

        let mut points = Vec::with_capacity(xs.len() * ys.len() * zs.len());
        for &x in &xs {
            for &y in &ys {
                for &z in &zs {
                    points.push(Vec3::new(x, y, z));
                }
            }
        }
        points
    }

    pub fn is_valid(&self, point: Vec3, tolerance: f32) -> bool {
        Axis::ALL
            .iter()
            .all(|&axis| is_value_valid(point[axis.index()], &self.positions(axis), tolerance))
    }

    pub fn did_you_mean(&self, point: Vec3, tolerance: f32) -> Suggestion {
        let mut closest = point;
        let mut axes = [None, None, None];

        for axis in Axis::ALL {
            let value = point[axis.index()];
            let valid = self.positions(axis);
            if is_value_valid(value, &valid, tolerance) {
                continue;
            }
            let nearest = find_closest(value, &valid, 2);
            if let Some(&best) = nearest.first() {
                closest[axis.index()] = best;
            }
            axes[axis.index()] = Some(AxisHint {
                invalid: value,
                closest: nearest,
            });
        }

        Suggestion { closest, axes }
    }

    /// Nearest valid grid point; already valid coordinates are kept as is.
    pub fn snap(&self, point: Vec3) -> Vec3 {
        self.did_you_mean(point, DEFAULT_TOLERANCE).closest
    }
}

/// Boundaries plus interior cuts, ascending.
pub fn generate_positions(dimension: f32, sections: u32) -> Vec<f32> {
    let half = dimension / 2.0;
    let mut positions = vec![-half, half];
    for i in 1..sections {
        positions.push(-half + dimension * i as f32 / sections as f32);
    }
    positions.sort_by(f32::total_cmp);
    positions
}

fn is_value_valid(value: f32, valid: &[f32], tolerance: f32) -> bool {
    valid.iter().any(|v| (v - value).abs() <= tolerance)
}

fn find_closest(target: f32, valid: &[f32], max_count: usize) -> Vec<f32> {
    let mut sorted = valid.to_vec();
    sorted.sort_by(|a, b| (a - target).abs().total_cmp(&(b - target).abs()));
    sorted.truncate(max_count);
    sorted
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisHint {
    pub invalid: f32,
    /// Nearest valid values, closest first.
    pub closest: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub closest: Vec3,
    pub axes: [Option<AxisHint>; 3],
}

impl Suggestion {
    pub fn is_valid(&self) -> bool {
        self.axes.iter().all(Option::is_none)
    }

    pub fn hint(&self, axis: Axis) -> Option<&AxisHint> {
        self.axes[axis.index()].as_ref()
    }
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            return write!(f, "Coordinates are valid!");
        }

        writeln!(f, "Invalid coordinates detected:")?;
        for axis in Axis::ALL {
            if let Some(hint) = self.hint(axis) {
                let closest: Vec<String> = hint.closest.iter().map(|v| v.to_string()).collect();
                writeln!(
                    f,
                    "{}: {} -> closest: [{}]",
                    axis.label(),
                    hint.invalid,
                    closest.join(", ")
                )?;
            }
        }
        write!(
            f,
            "Suggested: ({}, {}, {})",
            self.closest.x, self.closest.y, self.closest.z
        )
    }
}
