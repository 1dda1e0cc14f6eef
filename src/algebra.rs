use nalgebra::{UnitQuaternion, Vector3};

/// Converts a set of Euler angles (roll, pitch, yaw) into a unit quaternion
/// in scalar-first component order, as consumed by the beam loader.
pub fn euler_to_quat(euler: &Vector3<f64>) -> [f64; 4] {
    let q = UnitQuaternion::from_euler_angles(euler[0], euler[1], euler[2]);
    [q.w, q.i, q.j, q.k]
}

/// Converts a scalar-first unit quaternion into Euler angles
/// (roll, pitch, yaw) in radians.
pub fn quat_to_euler(quat: &[f64; 4]) -> Vector3<f64> {
    let [q0, q1, q2, q3] = *quat;

    let roll = (2.0 * (q0 * q1 + q2 * q3)).atan2(1.0 - 2.0 * (q1 * q1 + q2 * q2));
    let pitch = (2.0 * (q0 * q2 - q1 * q3)).asin();
    let yaw = (2.0 * (q0 * q3 + q1 * q2)).atan2(1.0 - 2.0 * (q2 * q2 + q3 * q3));

    Vector3::new(roll, pitch, yaw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn identity_quaternion_has_zero_attitude() {
        let euler = quat_to_euler(&[1.0, 0.0, 0.0, 0.0]);

        assert_relative_eq!(euler[0], 0.0);
        assert_relative_eq!(euler[1], 0.0);
        assert_relative_eq!(euler[2], 0.0);
    }

    #[test]
    fn zero_attitude_round_trips() {
        let quat = euler_to_quat(&Vector3::zeros());
        let euler = quat_to_euler(&quat);

        assert_relative_eq!(quat[0], 1.0);
        assert_relative_eq!(euler.norm(), 0.0);
    }

    #[test]
    fn pitch_only_attitude_round_trips() {
        let alpha = 6.796482976011756e-3;
        let quat = euler_to_quat(&Vector3::new(0.0, alpha, 0.0));
        let euler = quat_to_euler(&quat);

        assert_relative_eq!(euler[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(euler[1], alpha, epsilon = 1e-12);
        assert_relative_eq!(euler[2], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn general_attitude_round_trips() {
        let angles = Vector3::new(0.05, -0.12, 0.3);
        let euler = quat_to_euler(&euler_to_quat(&angles));

        assert_relative_eq!(euler[0], angles[0], epsilon = 1e-12);
        assert_relative_eq!(euler[1], angles[1], epsilon = 1e-12);
        assert_relative_eq!(euler[2], angles[2], epsilon = 1e-12);
    }
}
