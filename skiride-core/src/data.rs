use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

pub const SKIER_ID_RANGE: RangeInclusive<u32> = 1..=100_000;
pub const RESORT_ID_RANGE: RangeInclusive<u32> = 1..=10;
pub const LIFT_ID_RANGE: RangeInclusive<u32> = 1..=40;
pub const TIME_RANGE: RangeInclusive<u32> = 1..=360;

/// A single lift ride, as posted to the ingestion endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RideEvent {
    pub skier_id: u32,
    pub resort_id: u32,
    pub lift_id: u32,
    pub season_id: u32,
    pub day_id: u32,
    /// Minute within the ski day.
    pub time: u32,
}

impl RideEvent {
    /// A random ride for the given season and day.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, season_id: u32, day_id: u32) -> Self {
        Self {
            skier_id: rng.gen_range(SKIER_ID_RANGE),
            resort_id: rng.gen_range(RESORT_ID_RANGE),
            lift_id: rng.gen_range(LIFT_ID_RANGE),
            season_id,
            day_id,
            time: rng.gen_range(TIME_RANGE),
        }
    }
}
