use rand::Rng;
use std::ops::RangeInclusive;
use tracing::{debug, info, trace, warn};

use crate::config::constant::{
    CAPACITY_RANGE, MAX_PLACEMENT_ATTEMPTS, MAX_SAFE_ZONES, MIN_SAFE_ZONES, MIN_SEPARATION_DEG,
    OFFSET_HALF_WIDTH_DEG,
};
use crate::domain::types::{Coordinate, SafeZone};

/// Default number of zones drawn per search.
pub fn default_count_range() -> RangeInclusive<usize> {
    MIN_SAFE_ZONES..=MAX_SAFE_ZONES
}

/// Generates synthetic safe zones scattered around `base`.
///
/// The target count is drawn from `count_range`. Each slot gets up to
/// `MAX_PLACEMENT_ATTEMPTS` tries to land more than `MIN_SEPARATION_DEG` (planar)
/// from every zone accepted so far; a slot that runs out of tries is dropped, so
/// the result may be shorter than the drawn count. Zones are named after their
/// slot (`Safe Zone {i}`, 1-indexed), not their acceptance order.
pub fn generate<R: Rng + ?Sized>(
    base: Coordinate,
    count_range: RangeInclusive<usize>,
    rng: &mut R,
) -> Vec<SafeZone> {
    if count_range.is_empty() {
        warn!("Empty safe zone count range {:?}, nothing to generate", count_range);
        return vec![];
    }

    let target = rng.gen_range(count_range);
    debug!(
        "Generating {} safe zones around ({}, {})",
        target,
        base.lng(),
        base.lat()
    );

    let mut safe_zones: Vec<SafeZone> = Vec::with_capacity(target);
    for slot in 1..=target {
        match place_candidate(base, &safe_zones, rng) {
            Some(location) => {
                let capacity = rng.gen_range(CAPACITY_RANGE);
                safe_zones.push(SafeZone {
                    name: format!("Safe Zone {}", slot),
                    location,
                    capacity,
                });
            }
            None => {
                debug!(
                    "Slot {} dropped after {} placement attempts",
                    slot, MAX_PLACEMENT_ATTEMPTS
                );
            }
        }
    }

    info!(
        "Generated {} of {} requested safe zones",
        safe_zones.len(),
        target
    );
    safe_zones
}

fn place_candidate<R: Rng + ?Sized>(
    base: Coordinate,
    accepted: &[SafeZone],
    rng: &mut R,
) -> Option<Coordinate> {
    for attempt in 1..=MAX_PLACEMENT_ATTEMPTS {
        let lng = base.lng() + rng.gen_range(-OFFSET_HALF_WIDTH_DEG..OFFSET_HALF_WIDTH_DEG);
        let lat = base.lat() + rng.gen_range(-OFFSET_HALF_WIDTH_DEG..OFFSET_HALF_WIDTH_DEG);

        // Near the poles/antimeridian the square pokes outside valid ranges.
        let candidate = match Coordinate::new(lng, lat) {
            Ok(c) => c,
            Err(e) => {
                trace!("Attempt {} rejected: {}", attempt, e);
                continue;
            }
        };

        let far_enough = accepted
            .iter()
            .all(|zone| zone.location.planar_distance(&candidate) > MIN_SEPARATION_DEG);
        if far_enough {
            trace!("Candidate accepted on attempt {}", attempt);
            return Some(candidate);
        }
    }
    None
}
