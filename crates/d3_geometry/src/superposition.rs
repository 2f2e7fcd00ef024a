//! Least-squares rigid superposition (Kabsch algorithm).
//!
//! Both point sets are centred on their centroids, the cross-covariance
//! `C = mobileᵀ · target` is decomposed as `C = V·S·Wᵀ`, and the optimal
//! rotation is assembled from `V` and `Wᵀ`. If `det(V)·det(W) < 0` the
//! column of `V` belonging to the smallest singular value is negated, which
//! turns an improper solution (a reflection) into the best proper rotation.

use nalgebra::{Matrix3, Point3, Rotation3, Vector3};

use crate::GeometryError;

/// Singular values below this fraction of the largest one count as zero.
const RANK_TOLERANCE: f64 = 1e-10;

fn check_pairing(mobile: &[Point3<f64>], target: &[Point3<f64>]) -> Result<(), GeometryError> {
    if mobile.len() != target.len() {
        return Err(GeometryError::LengthMismatch {
            mobile: mobile.len(),
            target: target.len(),
        });
    }
    if mobile.is_empty() {
        return Err(GeometryError::EmptyPointSet);
    }
    Ok(())
}

/// Arithmetic mean of a non-empty point set.
pub fn centroid(points: &[Point3<f64>]) -> Point3<f64> {
    let sum = points.iter().map(|p| p.coords).sum::<Vector3<f64>>();
    Point3::from(sum / points.len().max(1) as f64)
}

/// Cross-covariance of the centred point sets.
fn covariance(mobile: &[Point3<f64>], target: &[Point3<f64>]) -> Matrix3<f64> {
    let mobile_center = centroid(mobile);
    let target_center = centroid(target);
    let mut covariance = Matrix3::zeros();
    for (m, t) in mobile.iter().zip(target) {
        covariance += (m - mobile_center) * (t - target_center).transpose();
    }
    covariance
}

fn covariance_rank(singular: &Vector3<f64>) -> usize {
    let largest = singular.max();
    if largest <= f64::EPSILON {
        0
    } else {
        singular.iter().filter(|&&s| s > RANK_TOLERANCE * largest).count()
    }
}

/// The rotation that, applied to the centred `mobile` points, best matches
/// the centred `target` points in the least-squares sense.
///
/// The result is always a proper rotation (`det = +1`). Point sets whose
/// covariance has rank below two (a single point, or collinear points)
/// admit infinitely many optimal rotations and yield
/// [`GeometryError::Degenerate`].
pub fn compute_optimal_rotation(
    mobile: &[Point3<f64>],
    target: &[Point3<f64>],
) -> Result<Rotation3<f64>, GeometryError> {
    check_pairing(mobile, target)?;
    let svd = covariance(mobile, target).svd(true, true);
    let singular = svd.singular_values;
    let rank = covariance_rank(&singular);
    if rank < 2 {
        return Err(GeometryError::Degenerate { rank });
    }

    let (Some(mut v), Some(w_t)) = (svd.u, svd.v_t) else {
        return Err(GeometryError::Degenerate { rank });
    };

    if v.determinant() * w_t.determinant() < 0.0 {
        let smallest = singular.imin();
        v.column_mut(smallest).neg_mut();
    }

    // `v * w_t` rotates row vectors; its transpose rotates column vectors.
    let rotation = (v * w_t).transpose();
    Ok(Rotation3::from_matrix_unchecked(rotation))
}

/// Rotates `mobile` about its centroid onto `target` and moves it to the
/// target centroid.
pub fn superimpose(
    mobile: &[Point3<f64>],
    target: &[Point3<f64>],
) -> Result<Vec<Point3<f64>>, GeometryError> {
    let rotation = compute_optimal_rotation(mobile, target)?;
    let mobile_center = centroid(mobile);
    let target_center = centroid(target);
    Ok(mobile.iter()
        .map(|p| target_center + rotation * (p - mobile_center))
        .collect())
}

/// Root-mean-square deviation of paired points, without any alignment.
pub fn rmsd(a: &[Point3<f64>], b: &[Point3<f64>]) -> Result<f64, GeometryError> {
    check_pairing(a, b)?;
    let sum_sq: f64 = a.iter().zip(b)
        .map(|(p, q)| (p - q).norm_squared())
        .sum();
    Ok((sum_sq / a.len() as f64).sqrt())
}

/// Minimal RMSD over all rigid motions, from the centred spreads and the
/// singular values of the covariance. The optimal rotation need not be
/// unique for this to be defined.
fn rmsd_from_spread(mobile: &[Point3<f64>], target: &[Point3<f64>]) -> f64 {
    let mobile_center = centroid(mobile);
    let target_center = centroid(target);
    let spread: f64 = mobile.iter().map(|m| (m - mobile_center).norm_squared()).sum::<f64>()
        + target.iter().map(|t| (t - target_center).norm_squared()).sum::<f64>();
    let overlap = covariance(mobile, target).singular_values().sum();
    ((spread - 2.0 * overlap).max(0.0) / mobile.len() as f64).sqrt()
}

/// RMSD after optimally superimposing `mobile` onto `target`.
///
/// A single point or collinear points still have a well defined minimum
/// (zero for one point), even though their rotation is not unique.
pub fn aligned_rmsd(mobile: &[Point3<f64>], target: &[Point3<f64>]) -> Result<f64, GeometryError> {
    match superimpose(mobile, target) {
        Ok(aligned) => rmsd(target, &aligned),
        Err(GeometryError::Degenerate { .. }) => Ok(rmsd_from_spread(mobile, target)),
        Err(e) => Err(e),
    }
}
