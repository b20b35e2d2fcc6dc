//! Game state and outbound events
//!
//! `GameState` is the single owner of everything that changes during a
//! round. The host reads it through `hud()` and `drain_events()`; only the
//! clock, score tracker and trigger mutate their own fields.

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::{RoundClock, RoundState};
use super::score::{Score, ScoreTracker};
use super::trigger::{BasketMade, BodyId, CollisionSample, Occupancy, ScoringTrigger};
use crate::consts::*;
use crate::scene::Scene;
use crate::settings::Settings;

/// A launched ball the round knows about
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: BodyId,
    /// Already recolored for a basket
    pub scored: bool,
}

/// Body spawn order handed to the physics host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaunchRequest {
    pub body: BodyId,
    pub origin: Vec3,
    /// Initial impulse (mass * velocity)
    pub impulse: Vec3,
}

impl LaunchRequest {
    pub fn velocity(&self) -> Vec3 {
        self.impulse / BALL_MASS
    }
}

/// Things the host has to react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    RoundStarted { duration_secs: u32 },
    BallLaunched(LaunchRequest),
    /// Host should remove the physics body
    BallDespawned { ball: BodyId },
    BasketMade(BasketMade),
    /// One-shot recolor of a ball that scored
    MarkScored { ball: BodyId },
    TimeLeftChanged { time_left_secs: u32 },
    GameOver { score: Score },
}

/// Read-only view for the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hud {
    pub score: Score,
    pub time_left_secs: u32,
    pub game_over: bool,
    pub balls_in_play: usize,
}

/// Round rules copied out of the player settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundRules {
    pub round_duration_secs: u32,
    pub launch_speed: f32,
    pub launch_spread: f32,
    pub launch_cooldown_secs: f32,
    pub max_balls: usize,
    pub occupancy: Occupancy,
}

impl Default for RoundRules {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for RoundRules {
    fn from(settings: &Settings) -> Self {
        Self {
            round_duration_secs: settings.round_duration_secs,
            launch_speed: settings.launch_speed,
            launch_spread: settings.launch_spread,
            launch_cooldown_secs: settings.launch_cooldown_secs,
            max_balls: settings.max_balls,
            occupancy: settings.occupancy,
        }
    }
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    /// Fresh generator for the next draw; each call uses a new stream
    pub fn next_rng(&mut self) -> Pcg32 {
        let rng = Pcg32::new(self.seed, self.stream);
        self.stream += 1;
        rng
    }

    pub fn reset(&mut self) {
        self.stream = 0;
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng_state: RngState,
    pub rules: RoundRules,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Seconds since round start
    pub elapsed_secs: f64,
    /// Seconds until the next launch is allowed
    pub launch_cooldown: f32,
    pub last_launch_secs: Option<f64>,
    /// Launched balls, oldest first
    pub balls: Vec<Ball>,
    pub launch_origin: Vec3,
    /// Where idle mode aims
    pub hoop_target: Vec3,
    clock: RoundClock,
    round: RoundState,
    score: ScoreTracker,
    trigger: ScoringTrigger,
    #[serde(skip)]
    events: Vec<GameEvent>,
    /// Next body ID
    next_id: BodyId,
}

impl GameState {
    /// Create a new game state and start the first round
    pub fn new(seed: u64, settings: &Settings, scene: &Scene) -> Self {
        let rules = RoundRules::from(settings);
        let clock = RoundClock::new(rules.round_duration_secs);
        let round = clock.state();

        let mut state = Self {
            seed,
            rng_state: RngState::new(seed),
            rules,
            time_ticks: 0,
            elapsed_secs: 0.0,
            launch_cooldown: 0.0,
            last_launch_secs: None,
            balls: Vec::new(),
            launch_origin: scene.launch_origin,
            hoop_target: scene.swish_target(),
            clock,
            round,
            score: ScoreTracker::new(),
            trigger: ScoringTrigger::new(rules.occupancy),
            events: Vec::new(),
            next_id: 1,
        };
        state.events.push(GameEvent::RoundStarted {
            duration_secs: rules.round_duration_secs,
        });
        state
    }

    /// Default settings and court
    pub fn with_seed(seed: u64) -> Self {
        Self::new(seed, &Settings::default(), &Scene::standard())
    }

    /// Allocate a new body ID
    pub fn next_entity_id(&mut self) -> BodyId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Reset clock, score and trigger for another round. Balls still in
    /// the world are despawned.
    pub fn new_round(&mut self) {
        for ball in self.balls.drain(..) {
            self.events.push(GameEvent::BallDespawned { ball: ball.id });
        }
        self.clock.reset();
        self.round = self.clock.state();
        self.score.reset();
        self.trigger.reset();
        self.rng_state.reset();
        self.elapsed_secs = 0.0;
        self.time_ticks = 0;
        self.launch_cooldown = 0.0;
        self.last_launch_secs = None;
        self.events.push(GameEvent::RoundStarted {
            duration_secs: self.rules.round_duration_secs,
        });
        log::info!("New round ({}s)", self.rules.round_duration_secs);
    }

    /// Sample the round clock, queueing countdown and game-over events
    pub fn advance_clock(&mut self, elapsed_secs: f64) -> RoundState {
        let prev = self.round;
        self.round = self.clock.tick(elapsed_secs);

        if self.round.time_left_secs != prev.time_left_secs {
            self.events.push(GameEvent::TimeLeftChanged {
                time_left_secs: self.round.time_left_secs,
            });
        }
        if self.round.game_over && !prev.game_over {
            self.events.push(GameEvent::GameOver {
                score: self.score.value(),
            });
        }
        self.round
    }

    /// Build a launch toward `aim`. Refused once the round is over or while
    /// the launch cooldown runs.
    pub fn launch(&mut self, aim: Vec3) -> Option<LaunchRequest> {
        if self.clock.is_over() {
            log::debug!("Launch ignored: round over");
            return None;
        }
        if self.launch_cooldown > 0.0 {
            return None;
        }

        let spread = self.rules.launch_spread;
        let jitter = if spread > 0.0 {
            let mut rng = self.rng_state.next_rng();
            Vec3::new(
                rng.random_range(-spread..=spread),
                rng.random_range(-spread..=spread),
                rng.random_range(-spread..=spread),
            )
        } else {
            Vec3::ZERO
        };
        let dir = (aim.normalize_or(Vec3::NEG_Z) + jitter).normalize_or(Vec3::NEG_Z);

        let body = self.next_entity_id();
        let request = LaunchRequest {
            body,
            origin: self.launch_origin,
            impulse: dir * self.rules.launch_speed * BALL_MASS,
        };

        self.balls.push(Ball {
            id: body,
            scored: false,
        });
        self.events.push(GameEvent::BallLaunched(request));
        self.launch_cooldown = self.rules.launch_cooldown_secs;
        self.last_launch_secs = Some(self.elapsed_secs);

        while self.balls.len() > self.rules.max_balls {
            let oldest = self.balls.remove(0);
            self.trigger.forget(oldest.id);
            self.events.push(GameEvent::BallDespawned { ball: oldest.id });
        }

        Some(request)
    }

    /// Feed one sensor sample to the scoring trigger. Samples are dropped
    /// once the round is over.
    pub fn observe(&mut self, sample: &CollisionSample) -> Option<BasketMade> {
        if self.clock.is_over() {
            log::debug!("Sample ignored: round over ({:?})", sample);
            return None;
        }

        let made = self.trigger.observe(sample, &mut self.score)?;
        log::info!("Basket! ball {} score {}", made.body, made.score);
        self.events.push(GameEvent::BasketMade(made));

        match self.balls.iter_mut().find(|b| b.id == made.body) {
            Some(ball) if !ball.scored => {
                ball.scored = true;
                self.events.push(GameEvent::MarkScored { ball: ball.id });
            }
            Some(_) => {}
            None => log::debug!("Basket by unknown body {}", made.body),
        }

        Some(made)
    }

    /// The host removed a body on its own (left the court, fell asleep).
    /// Returns whether the ball was still registered.
    pub fn remove_ball(&mut self, id: BodyId) -> bool {
        self.trigger.forget(id);
        let Some(index) = self.balls.iter().position(|b| b.id == id) else {
            return false;
        };
        self.balls.remove(index);
        log::debug!("Ball {} removed by host", id);
        true
    }

    pub fn score(&self) -> Score {
        self.score.value()
    }

    pub fn round(&self) -> RoundState {
        self.round
    }

    pub fn is_over(&self) -> bool {
        self.clock.is_over()
    }

    pub fn trigger(&self) -> &ScoringTrigger {
        &self.trigger
    }

    pub fn hud(&self) -> Hud {
        Hud {
            score: self.score.value(),
            time_left_secs: self.round.time_left_secs,
            game_over: self.round.game_over,
            balls_in_play: self.balls.len(),
        }
    }

    /// Take all queued events (oldest first)
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
