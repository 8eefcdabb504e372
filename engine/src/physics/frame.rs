//! Frame Composer
//!
//! A [`Pose`] is a position plus a unit rotation. Poses are immutable values:
//! every operation returns a new pose.
//!
//! Composition follows the "local offset expressed in a base frame" reading:
//! `compose(local, base)` is the absolute frame you get by placing `local`
//! inside `base`. Chained offsets are associative, so a column segment can be
//! placed relative to its column base which is itself placed in the row frame.
//!
//! # Example
//!
//! ```ignore
//! use terremoto_engine::physics::{Pose, Vec3, compose};
//!
//! let base = Pose::from_translation(Vec3::new(2.0, 0.0, 4.0));
//! let centroid = compose(Pose::from_translation(Vec3::new(0.0, 1.0, 0.0)), base);
//! assert_eq!(centroid.position(), Vec3::new(2.0, 1.0, 4.0));
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::{Quat, Vec3};

/// Squared-length tolerance below which a quaternion cannot be normalized.
const DEGENERATE_ROTATION_EPSILON: f64 = 1e-24;

/// Position + orientation of a rigid frame.
///
/// The rotation is always a unit quaternion. Constructors normalize their
/// input; a zero or non-finite rotation falls back to identity. Poses read
/// from serialized data are checked instead, see [`Pose::try_new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPose")]
pub struct Pose {
    position: Vec3,
    rotation: Quat,
}

/// Unvalidated serde shape of a pose.
#[derive(Deserialize)]
struct RawPose {
    position: Vec3,
    rotation: Quat,
}

#[derive(Debug, Error, PartialEq)]
pub enum PoseError {
    #[error("pose position is not finite")]
    NonFinitePosition,
    #[error("pose rotation is zero or not finite")]
    DegenerateRotation,
}

impl TryFrom<RawPose> for Pose {
    type Error = PoseError;

    fn try_from(raw: RawPose) -> Result<Self, Self::Error> {
        Pose::try_new(raw.position, raw.rotation)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Pose {
    /// Origin with no rotation.
    pub const IDENTITY: Pose = Pose {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    /// Create a pose, normalizing the rotation.
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation: normalize_rotation(rotation),
        }
    }

    /// Create a pose, rejecting a non-finite position or a rotation that
    /// cannot be normalized.
    pub fn try_new(position: Vec3, rotation: Quat) -> Result<Self, PoseError> {
        if !position.is_finite() {
            return Err(PoseError::NonFinitePosition);
        }
        if !is_normalizable(rotation) {
            return Err(PoseError::DegenerateRotation);
        }
        Ok(Self::new(position, rotation))
    }

    /// Pure translation.
    pub fn from_translation(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// Convenience for `from_translation(Vec3::new(x, y, z))`.
    pub fn from_xyz(x: f64, y: f64, z: f64) -> Self {
        Self::from_translation(Vec3::new(x, y, z))
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Same orientation, different position.
    pub fn with_position(self, position: Vec3) -> Self {
        Self { position, ..self }
    }

    /// Map a point from this frame's local coordinates to the parent frame.
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.rotation * local
    }

    /// Rotate a direction (velocity, acceleration) into the parent frame.
    pub fn transform_vector(&self, local: Vec3) -> Vec3 {
        self.rotation * local
    }

    /// Map a parent-frame point into this frame's local coordinates.
    pub fn inverse_transform_point(&self, point: Vec3) -> Vec3 {
        self.rotation.inverse() * (point - self.position)
    }

    /// Rotate a parent-frame direction into this frame's local axes.
    pub fn inverse_transform_vector(&self, vector: Vec3) -> Vec3 {
        self.rotation.inverse() * vector
    }

    /// The pose that undoes this one: `compose(p.inverse(), p) == IDENTITY`.
    pub fn inverse(&self) -> Pose {
        let rotation = self.rotation.inverse();
        Pose {
            position: rotation * -self.position,
            rotation,
        }
    }

    /// This pose expressed in the local frame of `reference`.
    pub fn relative_to(&self, reference: &Pose) -> Pose {
        compose(*self, reference.inverse())
    }
}

/// Place `local_offset` inside `base` and return the absolute frame.
///
/// `position = base.position + base.rotation * local.position`,
/// `rotation = base.rotation * local.rotation`.
///
/// Exact for an identity offset: no renormalization happens here, so
/// `compose(Pose::IDENTITY, base) == base` bit for bit.
pub fn compose(local_offset: Pose, base: Pose) -> Pose {
    Pose {
        position: base.position + base.rotation * local_offset.position,
        rotation: base.rotation * local_offset.rotation,
    }
}

fn is_normalizable(rotation: Quat) -> bool {
    let length_squared = rotation.length_squared();
    length_squared.is_finite() && length_squared >= DEGENERATE_ROTATION_EPSILON
}

fn normalize_rotation(rotation: Quat) -> Quat {
    if !is_normalizable(rotation) {
        return Quat::IDENTITY;
    }
    if rotation.is_normalized() {
        return rotation;
    }
    rotation / rotation.length()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn assert_vec_close(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-12, "{a:?} != {b:?}");
    }

    fn assert_pose_close(a: Pose, b: Pose) {
        assert_vec_close(a.position(), b.position());
        // q and -q are the same rotation
        let dot = a.rotation().dot(b.rotation()).abs();
        assert!((dot - 1.0).abs() < 1e-12, "{a:?} != {b:?}");
    }

    fn sample_poses() -> [Pose; 3] {
        [
            Pose::new(Vec3::new(1.0, 2.0, 3.0), Quat::from_rotation_y(0.3)),
            Pose::new(
                Vec3::new(-0.5, 0.25, 4.0),
                Quat::from_axis_angle(Vec3::new(1.0, 1.0, 0.0).normalize(), 1.1),
            ),
            Pose::new(Vec3::new(0.0, -3.0, 0.7), Quat::from_rotation_z(-2.0)),
        ]
    }

    #[test]
    fn identity_offset_is_exact() {
        for base in sample_poses() {
            assert_eq!(compose(Pose::IDENTITY, base), base);
        }
    }

    #[test]
    fn composition_is_associative() {
        let [a, b, c] = sample_poses();
        let right = compose(a, compose(b, c));
        let left = compose(compose(a, b), c);
        assert_pose_close(left, right);
    }

    #[test]
    fn offset_is_expressed_in_base_frame() {
        let base = Pose::new(Vec3::new(10.0, 0.0, 0.0), Quat::from_rotation_y(FRAC_PI_2));
        let local = Pose::from_xyz(1.0, 0.0, 0.0);
        let absolute = compose(local, base);
        // +X rotated a quarter turn about Y lands on -Z
        assert_vec_close(absolute.position(), Vec3::new(10.0, 0.0, -1.0));
    }

    #[test]
    fn inverse_cancels() {
        for pose in sample_poses() {
            assert_pose_close(compose(pose.inverse(), pose), Pose::IDENTITY);
            assert_pose_close(compose(pose, pose.inverse()), Pose::IDENTITY);
        }
    }

    #[test]
    fn relative_to_recovers_local_offset() {
        let [local, base, _] = sample_poses();
        let absolute = compose(local, base);
        assert_pose_close(absolute.relative_to(&base), local);
    }

    #[test]
    fn point_round_trip_through_frame() {
        let [pose, _, _] = sample_poses();
        let p = Vec3::new(0.3, -1.2, 5.0);
        assert_vec_close(pose.inverse_transform_point(pose.transform_point(p)), p);
    }

    #[test]
    fn constructor_normalizes_rotation() {
        let pose = Pose::new(Vec3::ZERO, Quat::from_xyzw(0.0, 2.0, 0.0, 2.0));
        assert!(pose.rotation().is_normalized());
    }

    #[test]
    fn degenerate_rotation_falls_back_to_identity() {
        let pose = Pose::new(Vec3::ONE, Quat::from_xyzw(0.0, 0.0, 0.0, 0.0));
        assert_eq!(pose.rotation(), Quat::IDENTITY);
        let pose = Pose::new(Vec3::ONE, Quat::from_xyzw(f64::NAN, 0.0, 0.0, 1.0));
        assert_eq!(pose.rotation(), Quat::IDENTITY);
    }

    #[test]
    fn pose_json_round_trip_keeps_unit_rotation() {
        let json = r#"{"position":[1.0,2.0,3.0],"rotation":[0.0,0.0,0.0,3.0]}"#;
        let pose: Pose = serde_json::from_str(json).unwrap();
        assert_eq!(pose.position(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(pose.rotation(), Quat::IDENTITY);
    }

    #[test]
    fn corrupt_pose_json_is_rejected() {
        let json = r#"{"position":[1.0,2.0,3.0],"rotation":[0.0,0.0,0.0,0.0]}"#;
        let err = serde_json::from_str::<Pose>(json).unwrap_err();
        assert!(err.to_string().contains("rotation"), "{err}");
    }

    #[test]
    fn try_new_checks_inputs() {
        assert_eq!(
            Pose::try_new(Vec3::ONE, Quat::from_xyzw(0.0, 0.0, 0.0, 0.0)),
            Err(PoseError::DegenerateRotation)
        );
        assert_eq!(
            Pose::try_new(Vec3::new(f64::NAN, 0.0, 0.0), Quat::IDENTITY),
            Err(PoseError::NonFinitePosition)
        );
        let pose = Pose::try_new(Vec3::ONE, Quat::from_xyzw(0.0, 0.0, 0.0, 2.0)).unwrap();
        assert_eq!(pose.rotation(), Quat::IDENTITY);
    }
}
