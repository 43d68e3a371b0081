use nalgebra::Vector2;

/// z-component of the 3D cross product of two planar vectors.
#[inline]
pub fn cross(a: Vector2<f64>, b: Vector2<f64>) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Half-plane test over the three directed edges of a CCW triangle.
/// Points on the boundary count as inside.
pub fn point_in_triangle(tri: [Vector2<f64>; 3], p: Vector2<f64>) -> bool {
    (0..3).all(|j| {
        let start = tri[j];
        let end = tri[(j + 1) % 3];
        cross(end - start, p - start) >= 0.0
    })
}

/// Twice the unsigned area of a triangle.
#[inline]
pub fn triangle_area2(tri: [Vector2<f64>; 3]) -> f64 {
    cross(tri[1] - tri[0], tri[2] - tri[0]).abs()
}

#[inline]
pub fn centroid(tri: [Vector2<f64>; 3]) -> Vector2<f64> {
    (tri[0] + tri[1] + tri[2]) / 3.0
}
