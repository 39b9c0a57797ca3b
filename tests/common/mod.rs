#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use evac::{Coordinate, Directions, Error, Geocoder, Result, RoutingService, SafeZone};

/// In-memory routing service. Destinations listed in `failing` error out,
/// everything else gets a straight two-point path.
#[derive(Default)]
pub struct MockRouter {
    failing: Vec<Coordinate>,
    degenerate: Vec<Coordinate>,
    calls: Mutex<Vec<Coordinate>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_for(mut self, to: Coordinate) -> Self {
        self.failing.push(to);
        self
    }

    pub fn degenerate_for(mut self, to: Coordinate) -> Self {
        self.degenerate.push(to);
        self
    }

    pub fn calls(&self) -> Vec<Coordinate> {
        self.calls.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl RoutingService for MockRouter {
    async fn route(&self, from: Coordinate, to: Coordinate) -> Result<Directions> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.calls.lock().unwrap().push(to);

        // Give any concurrent caller a chance to overlap.
        tokio::task::yield_now().await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.contains(&to) {
            return Err(Error::Provider {
                provider: "mock",
                status: 502,
            });
        }
        if self.degenerate.contains(&to) {
            return Ok(Directions {
                path: vec![to],
                distance_meters: 0.0,
                duration_seconds: 0.0,
            });
        }
        Ok(Directions {
            path: vec![from, to],
            distance_meters: 1500.0,
            duration_seconds: 1100.0,
        })
    }
}

#[derive(Default)]
pub struct MockGeocoder {
    places: HashMap<String, Coordinate>,
    lookups: AtomicUsize,
}

impl MockGeocoder {
    pub fn with_place(mut self, name: &str, at: Coordinate) -> Self {
        self.places.insert(name.to_string(), at);
        self
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl Geocoder for MockGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<Coordinate>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.places.get(query).copied())
    }
}

pub fn coord(lng: f64, lat: f64) -> Coordinate {
    Coordinate::new(lng, lat).unwrap()
}

pub fn zone(name: &str, lng: f64, lat: f64) -> SafeZone {
    SafeZone {
        name: name.to_string(),
        location: coord(lng, lat),
        capacity: 30,
    }
}
