//! Coordinate geometry: dihedrals and RMSD.

use dihedra_core::{DihedraError, Result};

use crate::types::Point3D;

/// Dihedral (torsion) angle in degrees defined by four points.
///
/// The sign follows the IUPAC convention: looking down the p2→p3 bond, a
/// clockwise rotation of p1 onto p4 is positive. The result lies in
/// (-180, 180].
pub fn dihedral_points(p1: &Point3D, p2: &Point3D, p3: &Point3D, p4: &Point3D) -> f64 {
    let b1 = p2.sub(p1);
    let b2 = p3.sub(p2);
    let b3 = p4.sub(p3);

    let n1 = b1.cross(&b2);
    let n2 = b2.cross(&b3);
    let m1 = n1.cross(&b2.unit());

    let x = n1.dot(&n2);
    let y = m1.dot(&n2);

    let d = (-y).atan2(x).to_degrees();
    // atan2 returns -180 for the (x<0, y=+0) edge; fold it onto +180
    if d <= -180.0 {
        d + 360.0
    } else {
        d
    }
}

/// RMSD between two equal-length slices of points, without superposition.
///
/// # Errors
///
/// Returns an error if the slices differ in length or are empty.
pub fn rmsd_points(points1: &[Point3D], points2: &[Point3D]) -> Result<f64> {
    if points1.len() != points2.len() {
        return Err(DihedraError::InvalidInput(format!(
            "point set sizes differ: {} vs {}",
            points1.len(),
            points2.len()
        )));
    }
    if points1.is_empty() {
        return Err(DihedraError::InvalidInput(
            "cannot compute RMSD of empty point sets".into(),
        ));
    }
    let sum: f64 = points1
        .iter()
        .zip(points2.iter())
        .map(|(a, b)| {
            let d = a.sub(b);
            d.dot(&d)
        })
        .sum();
    Ok((sum / points1.len() as f64).sqrt())
}
