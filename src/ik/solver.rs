use super::joint::JointId;
use super::pose::Pose;
use super::skeleton::Skeleton;
use crate::error::SolveError;
use crate::math::{distance, reach};
use glam::Vec3;

pub const DEFAULT_ITERATIONS: u32 = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct SolveResult {
    pub pose: Pose,
    pub iterations: u32,
    /// Distance from the moved joint to its target after the last pass.
    pub final_distance: f32,
    /// Worst bone-length deviation of the returned pose.
    pub max_length_error: f32,
}

/// Tree relaxation that moves one joint and drags the rest of the skeleton
/// along while keeping every hierarchy bone at its rest length.
///
/// Each iteration pins the moved joint to the target, walks its parent chain
/// up to the root re-attaching each parent at rest length, then pushes every
/// child out from its parent depth-first from the root. The root is not
/// anchored.
pub struct FabrikSolver;

impl FabrikSolver {
    pub fn solve(
        skeleton: &Skeleton,
        pose: &Pose,
        moved: JointId,
        target: Vec3,
        iterations: u32,
    ) -> Result<Pose, SolveError> {
        Self::solve_detailed(skeleton, pose, moved, target, iterations).map(|r| r.pose)
    }

    pub fn solve_named(
        skeleton: &Skeleton,
        pose: &Pose,
        moved: &str,
        target: Vec3,
        iterations: u32,
    ) -> Result<Pose, SolveError> {
        let joint = skeleton.resolve(moved)?;
        Self::solve(skeleton, pose, joint, target, iterations)
    }

    pub fn solve_detailed(
        skeleton: &Skeleton,
        pose: &Pose,
        moved: JointId,
        target: Vec3,
        iterations: u32,
    ) -> Result<SolveResult, SolveError> {
        skeleton.check_joint(moved)?;
        skeleton.check_pose(pose)?;
        if iterations == 0 {
            return Err(SolveError::ZeroIterations);
        }
        if !target.is_finite() {
            return Err(SolveError::NonFiniteTarget(target.to_array()));
        }

        let mut positions = pose.positions().to_vec();
        let order = skeleton.topology().depth_first();

        for _ in 0..iterations {
            positions[moved.index()] = target;
            Self::upward_pass(skeleton, &mut positions, moved);
            Self::downward_pass(skeleton, &mut positions, &order);
        }

        let pose = Pose::from_positions(positions);
        let final_distance = distance(pose.get(moved), target);
        let max_length_error = skeleton.max_length_error(&pose);

        log::trace!(
            "solved {} in {} iterations: target distance {:.2e}, length error {:.2e}",
            skeleton.topology().name(moved),
            iterations,
            final_distance,
            max_length_error
        );

        Ok(SolveResult {
            pose,
            iterations,
            final_distance,
            max_length_error,
        })
    }

    /// Re-attaches each ancestor of `moved` to the already fixed child below
    /// it, keeping the direction towards the ancestor's previous position.
    fn upward_pass(skeleton: &Skeleton, positions: &mut [Vec3], moved: JointId) {
        let topology = skeleton.topology();
        let mut current = moved;
        while let Some(parent) = topology.parent(current) {
            let length = skeleton.parent_length(current);
            positions[parent.index()] =
                reach(positions[current.index()], positions[parent.index()], length);
            current = parent;
        }
    }

    /// Pushes every child out from its parent. `order` is a pre-order walk,
    /// so each parent is final before its children are placed.
    fn downward_pass(skeleton: &Skeleton, positions: &mut [Vec3], order: &[JointId]) {
        let topology = skeleton.topology();
        for &joint in order {
            if let Some(parent) = topology.parent(joint) {
                let length = skeleton.parent_length(joint);
                positions[joint.index()] =
                    reach(positions[parent.index()], positions[joint.index()], length);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ik::joint::Humanoid;
    use approx::assert_relative_eq;

    fn three_chain() -> Skeleton {
        Skeleton::builder()
            .root("root", Vec3::ZERO)
            .child("mid", Vec3::new(0.0, 1.0, 0.0), "root")
            .child("tip", Vec3::new(0.0, 2.0, 0.0), "mid")
            .build()
            .unwrap()
    }

    #[test]
    fn test_three_joint_chain_follows_tip() {
        let skeleton = three_chain();
        let root = skeleton.joint("root").unwrap();
        let mid = skeleton.joint("mid").unwrap();
        let tip = skeleton.joint("tip").unwrap();
        let target = Vec3::new(1.0, 2.0, 0.0);

        let pose = FabrikSolver::solve(&skeleton, &skeleton.rest_pose(), tip, target, 3).unwrap();

        assert_relative_eq!(pose.get(mid).distance(pose.get(tip)), 1.0, epsilon = 1e-5);
        assert_relative_eq!(pose.get(root).distance(pose.get(mid)), 1.0, epsilon = 1e-5);
        // The root is free, so the chain is dragged until the tip sits on target.
        assert!(pose.get(tip).distance(target) < 1e-4);
    }

    #[test]
    fn test_upward_pass_only_touches_ancestors() {
        let skeleton = Skeleton::humanoid().unwrap();
        let rest = skeleton.rest_pose();
        let wrist = Humanoid::LeftWrist.id();

        let mut positions = rest.positions().to_vec();
        positions[wrist.index()] = Vec3::new(-0.9, 1.0, 0.2);
        FabrikSolver::upward_pass(&skeleton, &mut positions, wrist);

        let chain: Vec<JointId> = std::iter::once(wrist)
            .chain(skeleton.topology().ancestors(wrist))
            .collect();
        for joint in skeleton.topology().joints() {
            let moved = positions[joint.index()] != rest.get(joint);
            if !chain.contains(&joint) {
                assert!(!moved, "{} moved during upward pass", skeleton.topology().name(joint));
            }
        }
        assert!(positions[Humanoid::LeftElbow.id().index()] != rest.get(Humanoid::LeftElbow.id()));
    }

    #[test]
    fn test_moving_root_moves_everything() {
        let skeleton = Skeleton::humanoid().unwrap();
        let rest = skeleton.rest_pose();
        let pelvis = Humanoid::Pelvis.id();

        let pose = FabrikSolver::solve(&skeleton, &rest, pelvis, Vec3::new(0.5, 0.0, 0.0), 1).unwrap();

        for joint in skeleton.topology().joints() {
            assert!(
                pose.get(joint).distance(rest.get(joint)) > 1e-6,
                "{} did not move",
                skeleton.topology().name(joint)
            );
        }
        assert_eq!(pose.get(pelvis), Vec3::new(0.5, 0.0, 0.0));
    }

    #[test]
    fn test_rejects_bad_requests() {
        let skeleton = three_chain();
        let rest = skeleton.rest_pose();

        assert_eq!(
            FabrikSolver::solve(&skeleton, &rest, JointId(7), Vec3::ZERO, 3),
            Err(SolveError::JointOutOfRange { id: 7, count: 3 })
        );
        assert_eq!(
            FabrikSolver::solve_named(&skeleton, &rest, "elbow", Vec3::ZERO, 3),
            Err(SolveError::UnknownJoint("elbow".to_owned()))
        );
        assert_eq!(
            FabrikSolver::solve(&skeleton, &rest, JointId(0), Vec3::ZERO, 0),
            Err(SolveError::ZeroIterations)
        );
        assert!(matches!(
            FabrikSolver::solve(&skeleton, &rest, JointId(0), Vec3::splat(f32::INFINITY), 3),
            Err(SolveError::NonFiniteTarget(_))
        ));

        let humanoid = Skeleton::humanoid().unwrap();
        assert_eq!(
            FabrikSolver::solve(&humanoid, &rest, JointId(0), Vec3::ZERO, 3),
            Err(SolveError::PoseMismatch { expected: 16, got: 3 })
        );
    }

    #[test]
    fn test_input_pose_is_not_mutated() {
        let skeleton = three_chain();
        let rest = skeleton.rest_pose();
        let before = rest.clone();
        let tip = skeleton.joint("tip").unwrap();

        let _ = FabrikSolver::solve(&skeleton, &rest, tip, Vec3::new(2.0, 0.0, 0.0), 3).unwrap();
        assert_eq!(rest, before);
    }

    #[test]
    fn test_rejects_non_finite_pose() {
        let skeleton = three_chain();
        let mut positions = skeleton.rest_pose().into_positions();
        positions[1] = Vec3::new(0.0, f32::NAN, 0.0);
        let broken = Pose::from_positions(positions);
        let tip = skeleton.joint("tip").unwrap();

        assert_eq!(
            FabrikSolver::solve(&skeleton, &broken, tip, Vec3::X, 3),
            Err(SolveError::NonFinitePosition("mid".to_owned()))
        );
    }

    #[test]
    fn test_coincident_joints_do_not_panic() {
        let skeleton = three_chain();
        let collapsed = skeleton
            .initial_pose(skeleton.topology().joints().map(|j| (j, Vec3::ZERO)))
            .unwrap();
        let tip = skeleton.joint("tip").unwrap();

        let result =
            FabrikSolver::solve_detailed(&skeleton, &collapsed, tip, Vec3::ZERO, 3).unwrap();
        for (_, p) in result.pose.iter() {
            assert!(p.is_finite());
        }
    }

    #[test]
    fn test_detailed_report() {
        let skeleton = Skeleton::humanoid().unwrap();
        let rest = skeleton.rest_pose();
        let target = Vec3::new(-0.8, 0.6, 0.1);

        let result = FabrikSolver::solve_detailed(
            &skeleton,
            &rest,
            Humanoid::LeftWrist.id(),
            target,
            DEFAULT_ITERATIONS,
        )
        .unwrap();

        assert_eq!(result.iterations, DEFAULT_ITERATIONS);
        assert!(result.max_length_error < 1e-5);
        assert_relative_eq!(
            result.final_distance,
            result.pose.get(Humanoid::LeftWrist.id()).distance(target)
        );
    }
}
