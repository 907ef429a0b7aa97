//! Driver commands
//!
//! Keyboard handling lives outside this crate. Whatever issues commands
//! (a human, a test, or the collision-avoidance logic) goes through
//! [`apply_control`].

use super::body::Body;

const ACCEL_INCREMENT: f64 = 0.12;
const BRAKE_ACCEL: f64 = 0.4;
const STEERING_INCREMENT: f64 = 0.009;
const MAX_ACCEL: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlCommand {
    Accelerate,
    Decelerate,
    SteerLeft,
    SteerRight,
    Brake,
}

/// Applies one command to the body's acceleration or steering.
pub fn apply_control(body: &mut Body, command: ControlCommand) {
    match command {
        ControlCommand::Accelerate => {
            if body.speed > 0.0 {
                body.reverse = false;
                body.accel += ACCEL_INCREMENT;
            } else {
                body.accel += BRAKE_ACCEL;
            }
            body.accel = body.accel.min(MAX_ACCEL);
        }
        ControlCommand::Decelerate => {
            if body.speed < 0.0 {
                body.reverse = true;
                body.accel -= ACCEL_INCREMENT;
            } else {
                body.accel -= BRAKE_ACCEL;
            }
            body.accel = body.accel.max(-MAX_ACCEL);
        }
        ControlCommand::SteerRight => body.steering_angle += STEERING_INCREMENT,
        ControlCommand::SteerLeft => body.steering_angle -= STEERING_INCREMENT,
        ControlCommand::Brake => {
            // Oppose the motion, never push a stopped car backwards
            body.accel = if body.speed == 0.0 {
                0.0
            } else {
                -body.speed.signum() * BRAKE_ACCEL.min(MAX_ACCEL)
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::geometry::Point2;

    fn moving(speed: f64) -> Body {
        let mut body = Body::new(Point2::new(0.0, 0.0), 10.0);
        body.speed = speed;
        body
    }

    #[test]
    fn test_accelerate_is_capped() {
        let mut body = moving(1.0);
        for _ in 0..10 {
            apply_control(&mut body, ControlCommand::Accelerate);
        }
        assert!((body.accel - MAX_ACCEL).abs() < 1e-12);
        assert!(!body.reverse);
    }

    #[test]
    fn test_decelerate_from_standstill() {
        let mut body = moving(0.0);
        apply_control(&mut body, ControlCommand::Decelerate);
        assert!((body.accel + BRAKE_ACCEL).abs() < 1e-12);

        apply_control(&mut body, ControlCommand::Decelerate);
        assert!((body.accel + MAX_ACCEL).abs() < 1e-12);
    }

    #[test]
    fn test_steering() {
        let mut body = moving(1.0);
        apply_control(&mut body, ControlCommand::SteerRight);
        apply_control(&mut body, ControlCommand::SteerRight);
        apply_control(&mut body, ControlCommand::SteerLeft);
        assert!((body.steering_angle - STEERING_INCREMENT).abs() < 1e-12);
    }

    #[test]
    fn test_brake_opposes_motion() {
        let mut forward = moving(3.0);
        apply_control(&mut forward, ControlCommand::Brake);
        assert!(forward.accel < 0.0);

        let mut backward = moving(-3.0);
        apply_control(&mut backward, ControlCommand::Brake);
        assert!(backward.accel > 0.0);

        let mut stopped = moving(0.0);
        stopped.accel = 0.3;
        apply_control(&mut stopped, ControlCommand::Brake);
        assert_eq!(stopped.accel, 0.0);
    }

    #[test]
    fn test_braking_slows_the_body() {
        let mut body = Body::new(Point2::new(0.0, 0.0), 10.0).with_velocity(Point2::new(4.0, 0.0));
        let mut coasting = body.clone();

        for _ in 0..5 {
            apply_control(&mut body, ControlCommand::Brake);
            body.advance();
            coasting.advance();
        }
        assert!(body.speed < coasting.speed);
    }
}
