//! Ballistic aiming
//!
//! Used by idle mode and the native demo to pick a launch direction that
//! drops the ball into the hoop at a fixed launch speed.

use glam::{Vec2, Vec3};

/// Unit launch direction from `origin` that passes through `target` at
/// `speed` under `gravity` (along -Y). Picks the high arc so the ball comes
/// down steeply through the rim. `None` when the target is out of range or
/// directly above/below the origin.
pub fn solve_launch(origin: Vec3, target: Vec3, speed: f32, gravity: f32) -> Option<Vec3> {
    let delta = target - origin;
    let horizontal = Vec2::new(delta.x, delta.z);
    let distance = horizontal.length();
    if distance < 1e-4 || speed <= 0.0 || gravity <= 0.0 {
        return None;
    }

    let v2 = speed * speed;
    let disc = v2 * v2 - gravity * (gravity * distance * distance + 2.0 * delta.y * v2);
    if disc < 0.0 {
        return None;
    }

    let angle = ((v2 + disc.sqrt()) / (gravity * distance)).atan();
    let flat = horizontal / distance;
    Some(Vec3::new(flat.x * angle.cos(), angle.sin(), flat.y * angle.cos()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{GRAVITY, LAUNCH_SPEED};
    use crate::scene::Scene;

    fn flight_time(origin: Vec3, target: Vec3, dir: Vec3, speed: f32) -> Option<f32> {
        let distance = Vec2::new(target.x - origin.x, target.z - origin.z).length();
        let horizontal_speed = Vec2::new(dir.x, dir.z).length() * speed;
        (horizontal_speed > 1e-6).then(|| distance / horizontal_speed)
    }

    #[test]
    fn test_solution_hits_target() {
        let scene = Scene::standard();
        let origin = scene.launch_origin;
        let target = scene.swish_target();

        let dir = solve_launch(origin, target, LAUNCH_SPEED, GRAVITY).expect("hoop in range");
        assert!((dir.length() - 1.0).abs() < 1e-5);

        let t = flight_time(origin, target, dir, LAUNCH_SPEED).unwrap();
        let v = dir * LAUNCH_SPEED;
        let landed = origin + v * t - Vec3::Y * 0.5 * GRAVITY * t * t;
        assert!(landed.distance(target) < 1e-3, "missed by {}", landed.distance(target));

        // Coming down at the hoop
        assert!(v.y - GRAVITY * t < 0.0);
    }

    #[test]
    fn test_out_of_range() {
        assert!(solve_launch(Vec3::ZERO, Vec3::new(0.0, 0.0, -100.0), 5.0, GRAVITY).is_none());
    }

    #[test]
    fn test_straight_up_is_none() {
        assert!(solve_launch(Vec3::ZERO, Vec3::Y * 3.0, 10.0, GRAVITY).is_none());
    }
}
