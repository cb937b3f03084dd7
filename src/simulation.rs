//! Arrival and delay simulation.
//!
//! There is no live feed behind this demo; arrival times and delay events are
//! drawn from bounded random ranges over the startup stop snapshot. Callers
//! pass the random source in so tests can seed it.

use chrono::{DateTime, Duration, Local};
use rand::Rng;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::providers::datasets::Stop;

/// Upper bound (inclusive) on a simulated arrival delay, in minutes.
pub const MAX_ARRIVAL_DELAY_MINUTES: i64 = 15;
/// Upper bound (inclusive) on a simulated disruption delay, in minutes.
pub const MAX_DISRUPTION_DELAY_MINUTES: i64 = 20;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("no stops are loaded")]
    EmptyStopList,
}

/// A simulated disruption at one stop. Generated fresh per call, never stored.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DelayEvent {
    pub stop_name: String,
    pub delay_minutes: i64,
}

/// Estimate when the next bus reaches `stop_name`.
///
/// Draws a delay in `[0, 15]` minutes from the current wall-clock time and
/// returns the fixed sentence shown to riders, with the time in 12-hour form.
pub fn estimate_arrival<R: Rng>(stop_name: &str, rng: &mut R) -> String {
    estimate_arrival_at(stop_name, Local::now(), rng)
}

fn estimate_arrival_at<R: Rng>(stop_name: &str, now: DateTime<Local>, rng: &mut R) -> String {
    let delay = rng.gen_range(0..=MAX_ARRIVAL_DELAY_MINUTES);
    let estimated = now + Duration::minutes(delay);
    format!(
        "The bus at {} is expected to arrive around {}.",
        stop_name,
        estimated.format("%I:%M %p")
    )
}

/// Pick one stop uniformly at random and give it a delay in `[0, 20]` minutes.
pub fn simulate_delay<R: Rng>(stops: &[Stop], rng: &mut R) -> Result<DelayEvent, SimulationError> {
    if stops.is_empty() {
        return Err(SimulationError::EmptyStopList);
    }
    let stop = &stops[rng.gen_range(0..stops.len())];
    let delay_minutes = rng.gen_range(0..=MAX_DISRUPTION_DELAY_MINUTES);

    Ok(DelayEvent {
        stop_name: stop.stop_name.clone(),
        delay_minutes,
    })
}
