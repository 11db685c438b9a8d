//! Circular statistics on angles measured in degrees.
//!
//! Dihedral angles wrap at ±180°, so the separation between two measurements
//! is the shorter of the two arcs joining them. Inputs may use either the
//! ±180° or the 0–360° convention; only angular position matters.

/// Minimal rotational distance between two angles, in degrees.
///
/// Equivalent to `|((a - b + 180) mod 360) - 180|`, evaluated on `|a - b|` so
/// that swapping the arguments yields a bit-identical result. The output lies
/// in `[0, 180]` for every finite input. NaN and infinite inputs produce NaN.
///
/// # Examples
///
/// ```
/// use dihedra_stats::circular::circular_delta;
///
/// assert_eq!(circular_delta(10.0, 350.0), 20.0);
/// assert_eq!(circular_delta(0.0, 180.0), 180.0);
/// assert_eq!(circular_delta(-170.0, 170.0), 20.0);
/// ```
pub fn circular_delta(a: f64, b: f64) -> f64 {
    let d = (a - b).abs() % 360.0;
    if d > 180.0 {
        360.0 - d
    } else {
        d
    }
}
