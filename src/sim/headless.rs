//! Headless collision feed
//!
//! Stand-in for the browser physics engine when running natively or in
//! tests. Balls are point masses under gravity that bounce on the ground;
//! nothing else collides. Sensor overlaps are tracked per body and reported
//! as enter/exit samples exactly as the physics host's sensor callbacks
//! would deliver them.

use std::collections::BTreeSet;

use glam::Vec3;

use super::state::{GameEvent, LaunchRequest};
use super::trigger::{BodyId, CollisionSample, RegionId};
use crate::consts::*;
use crate::scene::{Scene, TriggerBox};

/// Below this bounce speed the ball comes to rest
const REST_SPEED: f32 = 0.2;

#[derive(Debug, Clone)]
pub struct HeadlessBody {
    pub id: BodyId,
    pub pos: Vec3,
    pub vel: Vec3,
    pub radius: f32,
}

#[derive(Debug, Clone)]
pub struct HeadlessWorld {
    bodies: Vec<HeadlessBody>,
    triggers: Vec<TriggerBox>,
    ground_y: f32,
    half_size: f32,
    gravity: f32,
    restitution: f32,
    /// (body, region) pairs overlapping after the last step
    overlaps: BTreeSet<(BodyId, RegionId)>,
    /// Bodies dropped by the world itself, not yet reported
    removed: Vec<BodyId>,
}

impl HeadlessWorld {
    pub fn new(scene: &Scene) -> Self {
        Self {
            bodies: Vec::new(),
            triggers: scene.triggers.clone(),
            ground_y: scene.ground_y,
            half_size: scene.ground_half_size,
            gravity: GRAVITY,
            restitution: BALL_RESTITUTION,
            overlaps: BTreeSet::new(),
            removed: Vec::new(),
        }
    }

    pub fn bodies(&self) -> &[HeadlessBody] {
        &self.bodies
    }

    pub fn body(&self, id: BodyId) -> Option<&HeadlessBody> {
        self.bodies.iter().find(|b| b.id == id)
    }

    pub fn spawn(&mut self, request: &LaunchRequest) {
        self.bodies.push(HeadlessBody {
            id: request.body,
            pos: request.origin,
            vel: request.velocity(),
            radius: BALL_RADIUS,
        });
    }

    pub fn despawn(&mut self, id: BodyId) {
        self.bodies.retain(|b| b.id != id);
        self.overlaps.retain(|&(body, _)| body != id);
    }

    /// Mirror spawn/despawn events coming out of the game state
    pub fn apply(&mut self, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::BallLaunched(request) => self.spawn(request),
                GameEvent::BallDespawned { ball } => self.despawn(*ball),
                _ => {}
            }
        }
    }

    /// Advance all bodies by `dt` and report sensor edges
    pub fn step(&mut self, dt: f32) -> Vec<CollisionSample> {
        let accel = Vec3::NEG_Y * self.gravity;
        let mut samples = Vec::new();

        for body in &mut self.bodies {
            // Exact for constant acceleration
            body.pos += body.vel * dt + accel * (0.5 * dt * dt);
            body.vel += accel * dt;

            let floor = self.ground_y + body.radius;
            if body.pos.y < floor {
                body.pos.y = floor;
                if body.vel.y < 0.0 {
                    body.vel.y = -body.vel.y * self.restitution;
                    if body.vel.y < REST_SPEED {
                        body.vel.y = 0.0;
                    }
                }
            }

            for trigger in &self.triggers {
                let key = (body.id, trigger.region);
                let inside = trigger.overlaps(body.pos, body.radius);
                let was_inside = self.overlaps.contains(&key);
                if inside && !was_inside {
                    self.overlaps.insert(key);
                    samples.push(CollisionSample::enter(body.id, trigger.region, body.vel.y));
                } else if !inside && was_inside {
                    self.overlaps.remove(&key);
                    samples.push(CollisionSample::exit(body.id, trigger.region, body.vel.y));
                }
            }
        }

        // Off the court
        let half_size = self.half_size;
        let lost: Vec<BodyId> = self
            .bodies
            .iter()
            .filter(|b| b.pos.x.abs() > half_size || b.pos.z.abs() > half_size)
            .map(|b| b.id)
            .collect();
        for id in lost {
            log::debug!("Body {} left the court", id);
            self.despawn(id);
            self.removed.push(id);
        }

        samples
    }

    /// Bodies that left the court since the last call, for
    /// `TickInput::removed`
    pub fn drain_removed(&mut self) -> Vec<BodyId> {
        std::mem::take(&mut self.removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::HOOP_REGION;
    use crate::sim::trigger::SampleKind;

    fn drop_from(pos: Vec3) -> LaunchRequest {
        LaunchRequest {
            body: 1,
            origin: pos,
            impulse: Vec3::ZERO,
        }
    }

    #[test]
    fn test_drop_through_trigger_reports_enter_then_exit() {
        let scene = Scene::standard();
        let mut world = HeadlessWorld::new(&scene);
        world.spawn(&drop_from(scene.hoop_center + Vec3::Y * 0.5));

        let mut samples = Vec::new();
        for _ in 0..240 {
            samples.extend(world.step(SIM_DT));
        }

        assert_eq!(samples.len(), 2, "{:?}", samples);
        assert_eq!(samples[0].kind, SampleKind::Enter);
        assert_eq!(samples[1].kind, SampleKind::Exit);
        assert!(samples.iter().all(|s| s.region == HOOP_REGION && s.body == 1));
        assert!(samples.iter().all(|s| s.vertical_velocity < 0.0));
    }

    #[test]
    fn test_ball_bounces_and_settles() {
        let scene = Scene::standard();
        let mut world = HeadlessWorld::new(&scene);
        world.spawn(&drop_from(Vec3::new(2.0, 2.0, 0.0)));

        let mut max_after_bounce = 0.0f32;
        let mut bounced = false;
        for _ in 0..(120 * 10) {
            world.step(SIM_DT);
            let body = world.body(1).unwrap();
            assert!(body.pos.y >= BALL_RADIUS - 1e-6);
            if body.vel.y > 0.0 {
                bounced = true;
            }
            if bounced {
                max_after_bounce = max_after_bounce.max(body.pos.y);
            }
        }
        assert!(bounced);
        assert!(max_after_bounce < 2.0);
        assert_eq!(world.body(1).unwrap().vel.y, 0.0);
    }

    #[test]
    fn test_off_court_bodies_removed() {
        let scene = Scene::standard();
        let mut world = HeadlessWorld::new(&scene);
        world.spawn(&LaunchRequest {
            body: 3,
            origin: Vec3::new(scene.ground_half_size - 0.1, 1.0, 0.0),
            impulse: Vec3::X * BALL_MASS * 10.0,
        });
        for _ in 0..60 {
            world.step(SIM_DT);
        }
        assert!(world.bodies().is_empty());
        assert_eq!(world.drain_removed(), vec![3]);
        assert!(world.drain_removed().is_empty());
    }

    #[test]
    fn test_apply_mirrors_events() {
        let scene = Scene::standard();
        let mut world = HeadlessWorld::new(&scene);
        let request = drop_from(Vec3::ONE);
        world.apply(&[GameEvent::BallLaunched(request)]);
        assert_eq!(world.bodies().len(), 1);
        world.apply(&[GameEvent::BallDespawned { ball: 1 }]);
        assert!(world.bodies().is_empty());
        // Ordered removals are not echoed back
        assert!(world.drain_removed().is_empty());
    }
}
