//! Court layout
//!
//! Pure data describing the static scene. The host page builds meshes and
//! physics colliders from it; the simulation only needs the trigger boxes
//! and the launch origin. Units are meters, +Y up, the player faces -Z.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::sim::trigger::RegionId;

/// Rim center (regulation 10 ft)
pub const HOOP_CENTER: Vec3 = Vec3::new(0.0, 3.05, -5.0);
/// Distance from rim center to the center of each rim sphere
pub const RIM_RADIUS: f32 = 0.23;
/// Spheres used to approximate the rim torus
pub const RIM_SPHERE_COUNT: usize = 16;
pub const RIM_SPHERE_RADIUS: f32 = 0.02;

/// Trigger sits just below the rim plane and inside the ring so that only
/// balls actually going through the hoop touch it
pub const TRIGGER_DROP: f32 = 0.12;
pub const TRIGGER_HALF_EXTENTS: Vec3 = Vec3::new(0.14, 0.04, 0.14);
/// Region id of the single hoop
pub const HOOP_REGION: RegionId = 0;

pub const BACKBOARD_HALF_EXTENTS: Vec3 = Vec3::new(0.9, 0.525, 0.025);
/// Gap between the back of the rim and the board face
pub const BACKBOARD_GAP: f32 = 0.15;

pub const POLE_RADIUS: f32 = 0.08;
pub const GROUND_HALF_SIZE: f32 = 20.0;

/// Where launched balls appear (just below and in front of the camera)
pub const LAUNCH_ORIGIN: Vec3 = Vec3::new(0.0, 1.5, 2.5);

/// Hex RGB colors
pub mod palette {
    pub const SKY: u32 = 0x87ceeb;
    pub const GROUND: u32 = 0x3b7d3b;
    pub const POLE: u32 = 0x555555;
    pub const BACKBOARD: u32 = 0xffffff;
    pub const BACKBOARD_FRAME: u32 = 0xd62828;
    pub const RIM: u32 = 0xff6600;
    pub const BALL: u32 = 0xe07b39;
    /// Recolor applied once a ball scores
    pub const BALL_SCORED: u32 = 0x22c55e;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cuboid {
    pub center: Vec3,
    pub half_extents: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cylinder {
    /// Center of the bottom cap
    pub base: Vec3,
    pub radius: f32,
    pub height: f32,
}

/// Axis-aligned sensor volume
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriggerBox {
    pub region: RegionId,
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl TriggerBox {
    /// Sphere-vs-AABB overlap
    pub fn overlaps(&self, point: Vec3, radius: f32) -> bool {
        let min = self.center - self.half_extents;
        let max = self.center + self.half_extents;
        let closest = point.clamp(min, max);
        closest.distance_squared(point) <= radius * radius
    }
}

/// Perspective camera
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub position: Vec3,
    pub look_at: Vec3,
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// World-space unit ray through a point in normalized device
    /// coordinates (x right, y up, both in -1..=1)
    pub fn ray_direction(&self, ndc_x: f32, ndc_y: f32, aspect: f32) -> Vec3 {
        let forward = (self.look_at - self.position).normalize_or(Vec3::NEG_Z);
        let right = forward.cross(Vec3::Y).normalize_or(Vec3::X);
        let up = right.cross(forward);
        let half_height = (self.fov_y_degrees.to_radians() * 0.5).tan();

        (forward + right * ndc_x * half_height * aspect + up * ndc_y * half_height)
            .normalize_or(forward)
    }
}

/// Evenly spaced spheres on a horizontal circle
pub fn hoop_ring_spheres(
    center: Vec3,
    ring_radius: f32,
    count: usize,
    sphere_radius: f32,
) -> Vec<Sphere> {
    let count = count.max(3);
    (0..count)
        .map(|i| {
            let theta = i as f32 / count as f32 * std::f32::consts::TAU;
            Sphere {
                center: center + Vec3::new(theta.cos(), 0.0, theta.sin()) * ring_radius,
                radius: sphere_radius,
            }
        })
        .collect()
}

/// Everything the host needs to build the court
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    /// Ground plane height and half size (square)
    pub ground_y: f32,
    pub ground_half_size: f32,
    pub pole: Cylinder,
    pub backboard: Cuboid,
    pub hoop_center: Vec3,
    pub rim: Vec<Sphere>,
    pub triggers: Vec<TriggerBox>,
    pub camera: Camera,
    pub launch_origin: Vec3,
    pub colors: SceneColors,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneColors {
    pub sky: u32,
    pub ground: u32,
    pub pole: u32,
    pub backboard: u32,
    pub backboard_frame: u32,
    pub rim: u32,
    pub ball: u32,
    pub ball_scored: u32,
}

impl Default for SceneColors {
    fn default() -> Self {
        Self {
            sky: palette::SKY,
            ground: palette::GROUND,
            pole: palette::POLE,
            backboard: palette::BACKBOARD,
            backboard_frame: palette::BACKBOARD_FRAME,
            rim: palette::RIM,
            ball: palette::BALL,
            ball_scored: palette::BALL_SCORED,
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::standard()
    }
}

impl Scene {
    /// Single hoop facing the player
    pub fn standard() -> Self {
        let board_z = HOOP_CENTER.z - RIM_RADIUS - BACKBOARD_GAP - BACKBOARD_HALF_EXTENTS.z;
        // Lower edge of the board a little under the rim
        let board_y = HOOP_CENTER.y - 0.15 + BACKBOARD_HALF_EXTENTS.y;
        let backboard = Cuboid {
            center: Vec3::new(HOOP_CENTER.x, board_y, board_z),
            half_extents: BACKBOARD_HALF_EXTENTS,
        };

        let pole_z = board_z - BACKBOARD_HALF_EXTENTS.z - POLE_RADIUS;
        let pole = Cylinder {
            base: Vec3::new(HOOP_CENTER.x, 0.0, pole_z),
            radius: POLE_RADIUS,
            height: board_y,
        };

        let trigger = TriggerBox {
            region: HOOP_REGION,
            center: HOOP_CENTER - Vec3::Y * TRIGGER_DROP,
            half_extents: TRIGGER_HALF_EXTENTS,
        };

        Self {
            ground_y: 0.0,
            ground_half_size: GROUND_HALF_SIZE,
            pole,
            backboard,
            hoop_center: HOOP_CENTER,
            rim: hoop_ring_spheres(HOOP_CENTER, RIM_RADIUS, RIM_SPHERE_COUNT, RIM_SPHERE_RADIUS),
            triggers: vec![trigger],
            camera: Camera {
                position: Vec3::new(0.0, 1.7, 3.0),
                look_at: HOOP_CENTER,
                fov_y_degrees: 60.0,
                near: 0.1,
                far: 100.0,
            },
            launch_origin: LAUNCH_ORIGIN,
            colors: SceneColors::default(),
        }
    }

    /// Trigger volume for a region
    pub fn trigger(&self, region: RegionId) -> Option<&TriggerBox> {
        self.triggers.iter().find(|t| t.region == region)
    }

    /// Aim point for a clean swish: a little above the trigger so the ball
    /// is already falling when it reaches it
    pub fn swish_target(&self) -> Vec3 {
        self.hoop_center + Vec3::Y * 0.05
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            log::error!("Scene serialization failed: {}", e);
            String::from("{}")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_spheres_on_circle() {
        let spheres = hoop_ring_spheres(HOOP_CENTER, RIM_RADIUS, RIM_SPHERE_COUNT, RIM_SPHERE_RADIUS);
        assert_eq!(spheres.len(), RIM_SPHERE_COUNT);
        for sphere in &spheres {
            assert!((sphere.center.y - HOOP_CENTER.y).abs() < 1e-6);
            assert!((sphere.center.distance(HOOP_CENTER) - RIM_RADIUS).abs() < 1e-5);
            assert_eq!(sphere.radius, RIM_SPHERE_RADIUS);
        }
        // Neighbors are equally spaced
        let gap = spheres[0].center.distance(spheres[1].center);
        let last_gap = spheres[RIM_SPHERE_COUNT - 1].center.distance(spheres[0].center);
        assert!((gap - last_gap).abs() < 1e-5);
    }

    #[test]
    fn test_ring_needs_three_spheres() {
        assert_eq!(hoop_ring_spheres(Vec3::ZERO, 1.0, 0, 0.1).len(), 3);
    }

    #[test]
    fn test_ball_fits_through_rim() {
        use crate::consts::BALL_RADIUS;
        assert!(RIM_RADIUS - RIM_SPHERE_RADIUS > BALL_RADIUS);
    }

    #[test]
    fn test_trigger_below_rim_and_inside_ring() {
        let scene = Scene::standard();
        let trigger = scene.trigger(HOOP_REGION).expect("hoop trigger");
        assert!(trigger.center.y + trigger.half_extents.y < HOOP_CENTER.y);
        assert!(trigger.half_extents.x < RIM_RADIUS - RIM_SPHERE_RADIUS);
        assert!(trigger.half_extents.z < RIM_RADIUS - RIM_SPHERE_RADIUS);
    }

    #[test]
    fn test_trigger_overlap() {
        let trigger = Scene::standard().triggers[0];
        assert!(trigger.overlaps(trigger.center, 0.01));
        // Touching the top face from above
        let above = trigger.center + Vec3::Y * (trigger.half_extents.y + 0.1);
        assert!(trigger.overlaps(above, 0.11));
        assert!(!trigger.overlaps(above, 0.09));
        assert!(!trigger.overlaps(trigger.center + Vec3::X * 2.0, 0.12));
    }

    #[test]
    fn test_backboard_behind_rim() {
        let scene = Scene::standard();
        let front = scene.backboard.center.z + scene.backboard.half_extents.z;
        assert!(front < HOOP_CENTER.z - RIM_RADIUS);
        assert!(scene.pole.base.z < scene.backboard.center.z);
    }

    #[test]
    fn test_center_ray_is_forward() {
        let camera = Scene::standard().camera;
        let dir = camera.ray_direction(0.0, 0.0, 16.0 / 9.0);
        let forward = (camera.look_at - camera.position).normalize();
        assert!(dir.distance(forward) < 1e-5);

        let right = camera.ray_direction(1.0, 0.0, 1.0);
        assert!(right.x > 0.0);
        let up = camera.ray_direction(0.0, 1.0, 1.0);
        assert!(up.y > dir.y);
    }

    #[test]
    fn test_scene_json_has_rim() {
        let json = Scene::standard().to_json();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["rim"].as_array().map(|a| a.len()), Some(RIM_SPHERE_COUNT));
        assert_eq!(value["colors"]["ball_scored"], palette::BALL_SCORED);
    }
}
