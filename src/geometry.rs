//! Small geometric helpers shared by the assignment passes.

use glam::Vec3;

/// Angle between two direction vectors, in degrees.
///
/// Returns `None` when either vector is degenerate (zero length or
/// non-finite), so callers can treat broken geometry as "no measurement"
/// instead of propagating NaN into comparisons.
pub fn vector_angle_deg(u: Vec3, v: Vec3) -> Option<f32> {
    let (u, v) = (u.try_normalize()?, v.try_normalize()?);
    let cos = u.dot(v).clamp(-1.0, 1.0);
    let angle = cos.acos().to_degrees();
    angle.is_finite().then_some(angle)
}

/// Dihedral (torsion) angle defined by four points, in degrees, signed
/// per the usual IUPAC convention (positive = clockwise looking down the
/// `p1`→`p2` axis).
pub fn dihedral_deg(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3) -> Option<f32> {
    let b1 = p1 - p0;
    let b2 = p2 - p1;
    let b3 = p3 - p2;

    let n1 = b1.cross(b2);
    let n2 = b2.cross(b3);

    let axis = b2.try_normalize()?;
    let sin = n1.cross(n2).dot(axis);
    let cos = n1.dot(n2);

    let angle = sin.atan2(cos).to_degrees();
    angle.is_finite().then_some(angle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angle_between_orthogonal_vectors() {
        let a = vector_angle_deg(Vec3::X, Vec3::Y).unwrap();
        assert!((a - 90.0).abs() < 1e-4);
    }

    #[test]
    fn angle_of_degenerate_vector_is_none() {
        assert!(vector_angle_deg(Vec3::ZERO, Vec3::X).is_none());
        assert!(vector_angle_deg(Vec3::X, Vec3::new(f32::NAN, 0.0, 0.0)).is_none());
    }

    #[test]
    fn dihedral_cis_is_zero() {
        let a = dihedral_deg(
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::ZERO,
            Vec3::X,
            Vec3::new(1.0, 1.0, 0.0),
        )
        .unwrap();
        assert!(a.abs() < 1e-4);
    }

    #[test]
    fn dihedral_trans_is_180() {
        let a = dihedral_deg(
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::ZERO,
            Vec3::X,
            Vec3::new(1.0, -1.0, 0.0),
        )
        .unwrap();
        assert!((a.abs() - 180.0).abs() < 1e-4);
    }

    #[test]
    fn dihedral_sign_convention() {
        // Fourth point rotated +90 degrees out of the plane.
        let a = dihedral_deg(
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::ZERO,
            Vec3::X,
            Vec3::new(1.0, 0.0, 1.0),
        )
        .unwrap();
        assert!((a - 90.0).abs() < 1e-4);
    }
}
