//! Physical body of a simulated car
//!
//! Friction, steering and acceleration decay are applied every tick. The
//! body is the ground truth the sensor observes; nothing in here knows about
//! estimation.

use crate::types::geometry::{Extent, Point2, Rect};

/// Per-tick friction applied to the speed.
pub const DEFAULT_FRICTION: f64 = 0.008;
const ACCEL_DECAY: f64 = 0.9;
const STEERING_DECAY: f64 = 0.7;

/// Car sprite footprint in multiples of the display scale.
const CAR_FOOTPRINT: (f64, f64) = (3.0, 5.0);
/// Wreck footprint in multiples of the display scale.
const CRASH_FOOTPRINT: (f64, f64) = (8.0, 8.0);

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub position: Point2,
    pub velocity: Point2,
    pub speed: f64,
    pub accel: f64,
    pub rotation_angle: f64,
    pub steering_angle: f64,
    pub friction_coef: f64,
    pub reverse: bool,
    scale: f64,
    crashed_at: Option<f64>,
}

impl Body {
    /// A stationary body at `position`.
    pub fn new(position: Point2, scale: f64) -> Self {
        Self {
            position,
            velocity: Point2::default(),
            speed: 0.0,
            accel: 0.0,
            rotation_angle: 0.0,
            steering_angle: 0.0,
            friction_coef: DEFAULT_FRICTION,
            reverse: false,
            scale,
            crashed_at: None,
        }
    }

    pub fn with_accel(mut self, accel: f64) -> Self {
        self.accel = accel;
        self
    }

    pub fn with_rotation(mut self, rotation_angle: f64) -> Self {
        self.rotation_angle = rotation_angle;
        self
    }

    pub fn with_steering(mut self, steering_angle: f64) -> Self {
        self.steering_angle = steering_angle;
        self
    }

    pub fn with_velocity(mut self, velocity: Point2) -> Self {
        self.velocity = velocity;
        self.speed = velocity.norm();
        self
    }

    /// Advances the kinematics by one tick.
    pub fn advance(&mut self) {
        self.position = self.position + self.velocity;

        let direction = if self.reverse { -1.0 } else { 1.0 };
        self.speed = self.velocity.norm() * direction;
        self.speed += self.accel;
        self.speed *= 1.0 - self.friction_coef;

        self.velocity = Point2::new(
            self.speed * self.rotation_angle.cos(),
            self.speed * self.rotation_angle.sin(),
        );
        self.rotation_angle += self.steering_angle * self.speed;
        self.accel *= ACCEL_DECAY;
        self.steering_angle *= STEERING_DECAY;
    }

    /// Current footprint; wrecks are larger than intact cars.
    pub fn size(&self) -> Extent {
        let (w, h) = if self.is_crashed() {
            CRASH_FOOTPRINT
        } else {
            CAR_FOOTPRINT
        };
        Extent::new(w * self.scale, h * self.scale)
    }

    /// Axis-aligned bounding box centred on the position.
    pub fn edges(&self) -> Rect {
        Rect::centered(self.position, self.size())
    }

    /// Marks the body crashed at `now`. Returns `false` if it already was.
    pub fn mark_crashed(&mut self, now: f64) -> bool {
        if self.crashed_at.is_some() {
            return false;
        }
        self.crashed_at = Some(now);
        true
    }

    #[inline]
    pub fn is_crashed(&self) -> bool {
        self.crashed_at.is_some()
    }

    #[inline]
    pub fn crashed_at(&self) -> Option<f64> {
        self.crashed_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stationary_body_stays_put() {
        let mut body = Body::new(Point2::new(100.0, 100.0), 10.0);
        for _ in 0..10 {
            body.advance();
        }
        assert_eq!(body.position, Point2::new(100.0, 100.0));
    }

    #[test]
    fn test_acceleration_moves_along_heading() {
        let mut body = Body::new(Point2::new(0.0, 0.0), 10.0).with_accel(1.0);
        body.advance();
        // First tick only builds speed; position moves on the next one
        assert_eq!(body.position, Point2::new(0.0, 0.0));
        assert!((body.speed - 0.992).abs() < 1e-12);
        assert!((body.accel - 0.9).abs() < 1e-12);

        body.advance();
        assert!((body.position.x - 0.992).abs() < 1e-12);
        assert!(body.position.y.abs() < 1e-12);
    }

    #[test]
    fn test_friction_slows_coasting_body() {
        let mut body =
            Body::new(Point2::new(0.0, 0.0), 10.0).with_velocity(Point2::new(5.0, 0.0));
        body.advance();
        assert!(body.speed < 5.0);
        assert!(body.speed > 4.9);
    }

    #[test]
    fn test_crash_enlarges_footprint_once() {
        let mut body = Body::new(Point2::new(50.0, 50.0), 10.0);
        assert_eq!(body.size(), Extent::new(30.0, 50.0));
        assert_eq!(body.edges().as_tuple(), (35.0, 25.0, 30.0, 50.0));

        assert!(body.mark_crashed(1.5));
        assert!(!body.mark_crashed(2.0));
        assert_eq!(body.crashed_at(), Some(1.5));
        assert_eq!(body.size(), Extent::new(80.0, 80.0));
    }
}
