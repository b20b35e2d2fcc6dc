//! Deterministic simulation module
//!
//! All round logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies
//!
//! Real ball physics belongs to the host; it reports trigger overlaps as
//! `CollisionSample`s. `headless` provides a simple stand-in for tests and
//! the native build.

pub mod aim;
pub mod clock;
pub mod headless;
pub mod score;
pub mod state;
pub mod tick;
pub mod trigger;

pub use aim::solve_launch;
pub use clock::{RoundClock, RoundPhase, RoundState};
pub use headless::HeadlessWorld;
pub use score::{Score, ScoreTracker};
pub use state::{Ball, GameEvent, GameState, Hud, LaunchRequest, RoundRules};
pub use tick::{TickInput, tick};
pub use trigger::{
    BasketMade, BodyId, CollisionSample, Occupancy, RegionId, SampleKind, ScoringTrigger,
};
