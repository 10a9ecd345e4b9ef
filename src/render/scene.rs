use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};

use crate::grid::{Axis, GridBox};
use crate::ik::{Pose, Skeleton};
use crate::interaction::DragState;

pub const JOINT_RADIUS: f32 = 0.05;
pub const BONE_RADIUS: f32 = 0.02;
pub const POINT_RADIUS: f32 = 0.08;

/// Colours cycled over plotted points, in plot order.
pub const PLOT_PALETTE: [u32; 12] = [
    0xff0000, 0x00ff00, 0x0000ff, 0xffff00, 0xff00ff, 0x00ffff, 0xff8800, 0x0088ff, 0x8800ff,
    0x00ff88, 0xff0088, 0x880000,
];

/// Per-draw record in the layout a uniform or instance buffer expects.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Instance {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

impl Instance {
    pub fn new(model: Mat4, color: [f32; 4]) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color,
        }
    }

    pub fn translation(&self) -> Vec3 {
        Mat4::from_cols_array_2d(&self.model).w_axis.truncate()
    }
}

/// Which unit mesh an instance scales: a sphere for joints and points, a
/// Y-up cylinder for bones, a unit quad for grid planes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceKind {
    Joint,
    Bone,
    GridPlane,
    Point,
}

pub fn rgb(hex: u32) -> [f32; 4] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        1.0,
    ]
}

const DEFAULT_JOINT_COLOR: u32 = 0x4ecdc4;
const DRAGGING_COLOR: u32 = 0xff6b6b;
const BONE_COLOR: u32 = 0x95a5a6;

fn region_color(name: &str) -> u32 {
    match name {
        "head" => 0xf94144,
        "neck" => 0xf8961e,
        "spine" => 0xf3722c,
        "pelvis" => 0x90be6d,
        "leftShoulder" | "rightShoulder" => 0x577590,
        "leftHip" | "rightHip" => 0x43aa8b,
        _ => DEFAULT_JOINT_COLOR,
    }
}

/// Maps the unit Y-up cylinder onto the segment `start..end`.
pub fn bone_transform(start: Vec3, end: Vec3) -> Mat4 {
    let direction = end - start;
    let length = direction.length();

    if length < 0.0001 {
        return Mat4::from_translation(start);
    }

    let up = direction / length;
    let right = if up.y.abs() < 0.999 {
        Vec3::Y.cross(up).normalize()
    } else {
        Vec3::X.cross(up).normalize()
    };
    let forward = up.cross(right);

    let center = (start + end) / 2.0;

    Mat4::from_cols(
        right.extend(0.0),
        (up * length).extend(0.0),
        forward.extend(0.0),
        center.extend(1.0),
    )
}

/// Joint markers followed by one cylinder per bone.
pub fn skeleton_instances(
    skeleton: &Skeleton,
    pose: &Pose,
    drag: &DragState,
) -> Vec<(InstanceKind, Instance)> {
    let topology = skeleton.topology();
    let mut instances = Vec::with_capacity(topology.joint_count() + topology.bones().len());

    for (joint, position) in pose.iter() {
        if !topology.contains(joint) {
            break;
        }
        let color = if drag.is_dragging_joint(joint) {
            rgb(DRAGGING_COLOR)
        } else {
            rgb(region_color(topology.name(joint)))
        };
        let model = Mat4::from_translation(position) * Mat4::from_scale(Vec3::splat(JOINT_RADIUS));
        instances.push((InstanceKind::Joint, Instance::new(model, color)));
    }

    for bone in topology.bones() {
        let (Some(start), Some(end)) = (pose.try_get(bone.a), pose.try_get(bone.b)) else {
            continue;
        };
        let model = bone_transform(start, end) * Mat4::from_scale(Vec3::new(BONE_RADIUS, 1.0, BONE_RADIUS));
        instances.push((InstanceKind::Bone, Instance::new(model, rgb(BONE_COLOR))));
    }

    instances
}

/// One marker per plotted point, colour `i` taken from `palette` cyclically.
/// An empty palette falls back to the joint colour.
pub fn point_instances(points: &[Vec3], palette: &[u32]) -> Vec<(InstanceKind, Instance)> {
    points
        .iter()
        .enumerate()
        .map(|(i, &point)| {
            let color = palette
                .get(i % palette.len().max(1))
                .copied()
                .unwrap_or(DEFAULT_JOINT_COLOR);
            let model = Mat4::from_translation(point) * Mat4::from_scale(Vec3::splat(POINT_RADIUS));
            (InstanceKind::Point, Instance::new(model, rgb(color)))
        })
        .collect()
}

/// Translucent slicing planes at each interior cut of the grid box, red for
/// X cuts, green for Y, blue for Z.
pub fn grid_instances(grid: &GridBox, opacity: f32) -> Vec<(InstanceKind, Instance)> {
    let mut instances = Vec::new();
    let size = grid.size;

    for axis in Axis::ALL {
        let positions = grid.positions(axis);
        let interior = positions.iter().skip(1).take(positions.len().saturating_sub(2));
        let (rotation, extent, color) = match axis {
            Axis::X => (
                Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
                Vec3::new(size.z, size.y, 1.0),
                [1.0, 0.0, 0.0, opacity],
            ),
            Axis::Y => (
                Quat::from_rotation_x(std::f32::consts::FRAC_PI_2),
                Vec3::new(size.x, size.z, 1.0),
                [0.0, 1.0, 0.0, opacity],
            ),
            Axis::Z => (
                Quat::IDENTITY,
                Vec3::new(size.x, size.y, 1.0),
                [0.0, 0.0, 1.0, opacity],
            ),
        };

        for &offset in interior {
            let mut translation = Vec3::ZERO;
            translation[axis.index()] = offset;
            let model = Mat4::from_scale_rotation_translation(extent, rotation, translation);
            instances.push((InstanceKind::GridPlane, Instance::new(model, color)));
        }
    }

    instances
}
