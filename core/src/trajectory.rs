//! Random spawn points and headings on the play plane.

use crate::math::{Vec3, Viewport};
use crate::rng::SeededRng;

/// Uniform unit vector, drawn as a normalized point inside the unit circle.
pub fn unit_circle(rng: &mut SeededRng) -> (f32, f32) {
    loop {
        let x = rng.range_f32(-1.0, 1.0);
        let y = rng.range_f32(-1.0, 1.0);
        let len_sq = x * x + y * y;
        if len_sq > 1e-6 && len_sq <= 1.0 {
            let len = len_sq.sqrt();
            return (x / len, y / len);
        }
    }
}

/// Point on the ellipse traced by the viewport edges, pushed out by `scale`.
pub fn ring_point(rng: &mut SeededRng, viewport: Viewport, scale: f32) -> Vec3 {
    let (x, y) = unit_circle(rng);
    Vec3::planar(x * viewport.half_width, y * viewport.half_height) * scale
}

/// Heading from `position` toward the field center.
pub fn inward(position: Vec3) -> Vec3 {
    (-position).normalized()
}

pub fn horizontal_direction(rng: &mut SeededRng) -> Vec3 {
    let (x, z) = unit_circle(rng);
    Vec3::planar(x, z)
}

/// Per-axis tumble in degrees/sec; heavier rocks spin slower.
pub fn random_spin(rng: &mut SeededRng, max_deg: f32, mass: f32) -> Vec3 {
    let spin = Vec3::new(
        rng.range_f32(0.0, max_deg),
        rng.range_f32(0.0, max_deg),
        rng.range_f32(0.0, max_deg),
    );
    spin * (1.0 / mass)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_points_sit_on_the_scaled_ellipse() {
        let mut rng = SeededRng::new(7);
        let viewport = Viewport::new(80.0, 45.0);
        for _ in 0..256 {
            let p = ring_point(&mut rng, viewport, 2.4);
            let ex = p.x / (80.0 * 2.4);
            let ez = p.z / (45.0 * 2.4);
            assert!((ex * ex + ez * ez - 1.0).abs() < 1e-3);
            assert_eq!(p.y, 0.0);
        }
    }

    #[test]
    fn inward_points_at_origin() {
        let heading = inward(Vec3::planar(10.0, 0.0));
        assert!((heading.x + 1.0).abs() < 1e-6);
        assert_eq!(inward(Vec3::ZERO), Vec3::ZERO);
    }
}
