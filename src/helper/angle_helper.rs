use crate::utils::coordinate::Point2D;

/// try_angle_at_vertex calculates the interior angle ABC in degrees.
///
/// The angle is taken at vertex `b` between the rays b→a and b→c.
/// Returns `None` when either ray has zero length.
///
/// # Arguments
/// * `a` - Point2D at the end of the first ray
/// * `b` - Point2D of the vertex
/// * `c` - Point2D at the end of the second ray
///
/// # Returns
/// * `Option<f64>` in [0, 180]
pub fn try_angle_at_vertex(a: Point2D, b: Point2D, c: Point2D) -> Option<f64> {
    let ba = a.to_vector() - b.to_vector();
    let bc = c.to_vector() - b.to_vector();

    let mag = ba.norm() * bc.norm();
    if mag == 0.0 {
        return None
    }

    // floating point can push the ratio slightly outside the acos domain
    let cos_angle = (ba.dot(&bc) / mag).clamp(-1.0, 1.0);
    Some(cos_angle.acos().to_degrees())
}

/// angle_at_vertex calculates the interior angle ABC in degrees.
///
/// Degenerate input (a == b or c == b) yields 0.
pub fn angle_at_vertex(a: Point2D, b: Point2D, c: Point2D) -> f64 {
    try_angle_at_vertex(a, b, c).unwrap_or(0.0)
}

/// signed_tilt returns the tilt of segment a→b from the vertical axis in degrees.
///
/// Computed as `atan2(bx - ax, by - ay)`, so the result lies in (-180, 180].
pub fn signed_tilt(a: Point2D, b: Point2D) -> f64 {
    let deg = (b.x - a.x).atan2(b.y - a.y).to_degrees();
    // atan2(-0.0, negative) is -180
    if deg <= -180.0 {
        deg + 360.0
    } else {
        deg
    }
}

/// distance returns the Euclidean distance between two points.
pub fn distance(a: Point2D, b: Point2D) -> f64 {
    (b.to_vector() - a.to_vector()).norm()
}
