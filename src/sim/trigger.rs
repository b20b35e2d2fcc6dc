//! Made-basket detection
//!
//! A trigger region sits just under the rim. The physics host reports when a
//! ball starts and stops overlapping it, along with the ball's vertical
//! velocity at that moment. A ball that enters while falling and leaves
//! without bouncing back up has gone through the hoop.
//!
//! The two thresholds differ: arming needs `vy < 0`, scoring
//! accepts `vy < 1` on the way out so a ball that clips the net and slows
//! (or barely rebounds) still counts, while a ball popping back up through
//! the region does not.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::score::{Score, ScoreTracker};
use crate::consts::{ARM_VELOCITY_MAX, SCORE_EXIT_VELOCITY_MAX};

/// Physics body handle assigned at launch
pub type BodyId = u32;
/// Trigger region handle (one per hoop)
pub type RegionId = u32;

/// Overlap edge reported by the physics host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SampleKind {
    Enter,
    Exit,
}

/// One sensor callback from the physics host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionSample {
    pub body: BodyId,
    pub region: RegionId,
    /// Y component of the body's linear velocity (positive is up)
    pub vertical_velocity: f32,
    pub kind: SampleKind,
}

impl CollisionSample {
    pub fn enter(body: BodyId, region: RegionId, vertical_velocity: f32) -> Self {
        Self {
            body,
            region,
            vertical_velocity,
            kind: SampleKind::Enter,
        }
    }

    pub fn exit(body: BodyId, region: RegionId, vertical_velocity: f32) -> Self {
        Self {
            body,
            region,
            vertical_velocity,
            kind: SampleKind::Exit,
        }
    }
}

/// How many candidates a region tracks at once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Occupancy {
    /// One candidate per region; the latest entry replaces any other
    #[default]
    Single,
    /// Every body is tracked independently
    PerBody,
}

/// Successful pass through a region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasketMade {
    pub region: RegionId,
    pub body: BodyId,
    /// Score after the increment
    pub score: Score,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum ArmState {
    Single(Option<BodyId>),
    PerBody(BTreeSet<BodyId>),
}

impl ArmState {
    fn new(occupancy: Occupancy) -> Self {
        match occupancy {
            Occupancy::Single => ArmState::Single(None),
            Occupancy::PerBody => ArmState::PerBody(BTreeSet::new()),
        }
    }

    fn arm(&mut self, body: BodyId) {
        match self {
            ArmState::Single(candidate) => *candidate = Some(body),
            ArmState::PerBody(armed) => {
                armed.insert(body);
            }
        }
    }

    fn disarm(&mut self, body: BodyId) {
        match self {
            ArmState::Single(candidate) => *candidate = None,
            ArmState::PerBody(armed) => {
                armed.remove(&body);
            }
        }
    }

    /// Consume the arm flag for `body`. A body that is not the tracked
    /// candidate leaves the state untouched.
    fn take(&mut self, body: BodyId) -> bool {
        match self {
            ArmState::Single(candidate) => {
                if *candidate == Some(body) {
                    *candidate = None;
                    true
                } else {
                    false
                }
            }
            ArmState::PerBody(armed) => armed.remove(&body),
        }
    }

    fn is_armed(&self, body: BodyId) -> bool {
        match self {
            ArmState::Single(candidate) => *candidate == Some(body),
            ArmState::PerBody(armed) => armed.contains(&body),
        }
    }
}

/// Per-region arm flags fed by sensor samples
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringTrigger {
    occupancy: Occupancy,
    regions: BTreeMap<RegionId, ArmState>,
}

impl Default for ScoringTrigger {
    fn default() -> Self {
        Self::new(Occupancy::default())
    }
}

impl ScoringTrigger {
    pub fn new(occupancy: Occupancy) -> Self {
        Self {
            occupancy,
            regions: BTreeMap::new(),
        }
    }

    pub fn occupancy(&self) -> Occupancy {
        self.occupancy
    }

    /// Evaluate one sample, incrementing `score` on a made basket
    pub fn observe(
        &mut self,
        sample: &CollisionSample,
        score: &mut ScoreTracker,
    ) -> Option<BasketMade> {
        let vy = sample.vertical_velocity;
        match sample.kind {
            SampleKind::Enter => {
                let occupancy = self.occupancy;
                let region = self
                    .regions
                    .entry(sample.region)
                    .or_insert_with(|| ArmState::new(occupancy));
                // NaN fails the comparison and disarms
                if vy < ARM_VELOCITY_MAX {
                    region.arm(sample.body);
                } else {
                    region.disarm(sample.body);
                }
                None
            }
            SampleKind::Exit => {
                let armed = self
                    .regions
                    .get_mut(&sample.region)
                    .is_some_and(|region| region.take(sample.body));
                if !armed {
                    log::debug!(
                        "Exit without armed entry (body {}, region {})",
                        sample.body,
                        sample.region
                    );
                    return None;
                }
                if vy < SCORE_EXIT_VELOCITY_MAX {
                    let score = score.increment();
                    Some(BasketMade {
                        region: sample.region,
                        body: sample.body,
                        score,
                    })
                } else {
                    log::debug!("Rebound rejected (body {}, vy {:.2})", sample.body, vy);
                    None
                }
            }
        }
    }

    /// Whether `body` is currently a scoring candidate in `region`
    pub fn is_armed(&self, region: RegionId, body: BodyId) -> bool {
        self.regions
            .get(&region)
            .is_some_and(|state| state.is_armed(body))
    }

    /// Drop a body from every region (e.g. it was despawned mid-pass)
    pub fn forget(&mut self, body: BodyId) {
        for region in self.regions.values_mut() {
            region.take(body);
        }
    }

    /// Clear all arm flags
    pub fn reset(&mut self) {
        self.regions.clear();
    }
}
