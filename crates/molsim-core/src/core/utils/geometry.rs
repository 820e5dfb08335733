use nalgebra::{Point3, Vector3};

/// Angle at `vertex` between the rays to `a` and `b`, in radians.
pub fn bond_angle(a: &Point3<f64>, vertex: &Point3<f64>, b: &Point3<f64>) -> f64 {
    let u = a - vertex;
    let v = b - vertex;
    let denom = u.norm() * v.norm();
    if denom < f64::EPSILON {
        return 0.0;
    }
    (u.dot(&v) / denom).clamp(-1.0, 1.0).acos()
}

/// Signed dihedral angle of the chain `i-j-k-l`, in radians within `(-pi, pi]`.
///
/// Uses the IUPAC convention: the trans (anti) arrangement is `pi`.
pub fn dihedral_angle(i: &Point3<f64>, j: &Point3<f64>, k: &Point3<f64>, l: &Point3<f64>) -> f64 {
    let r_ij = i - j;
    let r_kj = k - j;
    let r_kl = k - l;
    let m = r_ij.cross(&r_kj);
    let n = r_kj.cross(&r_kl);
    signed_angle(&m, &n, &r_ij)
}

/// Angle between the plane normals `m` and `n`, signed by the side of `n` on
/// which `r_ij` lies.
pub(crate) fn signed_angle(m: &Vector3<f64>, n: &Vector3<f64>, r_ij: &Vector3<f64>) -> f64 {
    let angle = m.angle(n);
    if r_ij.dot(n) < 0.0 { -angle } else { angle }
}

/// True when the three points lie on one line within `tolerance` (sine of the angle).
pub fn is_collinear(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>, tolerance: f64) -> bool {
    let u = a - b;
    let v = c - b;
    let denom = u.norm() * v.norm();
    if denom < f64::EPSILON {
        return true;
    }
    u.cross(&v).norm() / denom < tolerance
}
