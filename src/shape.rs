use cgmath::{InnerSpace, Vector2};

/// A filled region described by its signed distance field.
///
/// Coordinates are continuous pixel space: pixel `(x, y)` spans
/// `[x, x + 1) × [y, y + 1)` and is sampled at its center.
pub trait Shape {
    /// Distance from `p` to the outline, negative inside.
    fn signed_distance(&self, p: Vector2<f32>) -> f32;

    /// Axis-aligned bounds as `(min, max)`.
    fn bounds(&self) -> (Vector2<f32>, Vector2<f32>);
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RoundedRect {
    min: Vector2<f32>,
    max: Vector2<f32>,
    radius: f32,
}

impl RoundedRect {
    pub fn new(min: Vector2<f32>, max: Vector2<f32>, radius: f32) -> Self {
        let half = (max - min) / 2.0;
        // radius can never exceed half of the shorter side
        let radius = radius.max(0.0).min(half.x.min(half.y));
        Self { min, max, radius }
    }

    /// Rectangle covering a `size`×`size` canvas minus `padding` on every side.
    pub fn inset(size: u32, padding: f32, radius: f32) -> Self {
        let size = size as f32;
        Self::new(
            Vector2::new(padding, padding),
            Vector2::new(size - padding, size - padding),
            radius,
        )
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl Shape for RoundedRect {
    fn signed_distance(&self, p: Vector2<f32>) -> f32 {
        let center = (self.min + self.max) / 2.0;
        let half = (self.max - self.min) / 2.0;
        let d = p - center;
        let q = Vector2::new(
            d.x.abs() - (half.x - self.radius),
            d.y.abs() - (half.y - self.radius),
        );
        let outside = Vector2::new(q.x.max(0.0), q.y.max(0.0)).magnitude();
        let inside = q.x.max(q.y).min(0.0);
        outside + inside - self.radius
    }

    fn bounds(&self) -> (Vector2<f32>, Vector2<f32>) {
        (self.min, self.max)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Circle {
    center: Vector2<f32>,
    radius: f32,
}

impl Circle {
    pub fn new(center: Vector2<f32>, radius: f32) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
        }
    }

    /// Circle centered on a `size`×`size` canvas.
    pub fn centered(size: u32, radius: f32) -> Self {
        let c = size as f32 / 2.0;
        Self::new(Vector2::new(c, c), radius)
    }

    pub fn center(&self) -> Vector2<f32> {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl Shape for Circle {
    fn signed_distance(&self, p: Vector2<f32>) -> f32 {
        (p - self.center).magnitude() - self.radius
    }

    fn bounds(&self) -> (Vector2<f32>, Vector2<f32>) {
        let r = Vector2::new(self.radius, self.radius);
        (self.center - r, self.center + r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounded_rect_sign() {
        let rect = RoundedRect::inset(256, 10.0, 40.0);
        assert!(rect.signed_distance(Vector2::new(128.0, 128.0)) < 0.0);
        assert!(rect.signed_distance(Vector2::new(20.0, 128.0)) < 0.0);
        assert!(rect.signed_distance(Vector2::new(5.0, 128.0)) > 0.0);
        // straight edge is exactly at the padding
        assert!((rect.signed_distance(Vector2::new(10.0, 128.0))).abs() < 1e-4);
    }

    #[test]
    fn rounded_rect_corner_is_cut() {
        let rect = RoundedRect::inset(256, 10.0, 40.0);
        // inside the bounding box but outside the arc
        assert!(rect.signed_distance(Vector2::new(12.0, 12.0)) > 0.0);
        // arc center is 40px in from both edges
        let d = rect.signed_distance(Vector2::new(50.0, 50.0));
        assert!((d + 40.0).abs() < 1e-4);
    }

    #[test]
    fn rounded_rect_radius_is_clamped() {
        let rect = RoundedRect::new(Vector2::new(0.0, 0.0), Vector2::new(20.0, 10.0), 50.0);
        assert_eq!(rect.radius(), 5.0);
    }

    #[test]
    fn circle_distance() {
        let circle = Circle::centered(256, 68.0);
        assert_eq!(circle.center(), Vector2::new(128.0, 128.0));
        assert_eq!(circle.signed_distance(Vector2::new(128.0, 128.0)), -68.0);
        assert_eq!(circle.signed_distance(Vector2::new(128.0 + 70.0, 128.0)), 2.0);
        let (min, max) = circle.bounds();
        assert_eq!(min, Vector2::new(60.0, 60.0));
        assert_eq!(max, Vector2::new(196.0, 196.0));
    }
}
