use rand_chacha::ChaCha8Rng;
use std::ops::RangeInclusive;
use tracing::{debug, info, warn};

use crate::domain::types::{Coordinate, RouteResult, SafeZone};
use crate::error::{Error, Result};
use crate::generator::{default_count_range, generate};
use crate::input::{parse_location_input, resolve};
use crate::routing::{find_route_guarded, Geocoder, RoutingService, SearchGeneration, SearchToken};

/// A route query detached from the session, so it can be awaited while the
/// session keeps accepting new searches.
#[derive(Debug, Clone)]
pub struct RouteRequest {
    token: SearchToken,
    origin: Option<Coordinate>,
    candidates: Vec<SafeZone>,
}

impl RouteRequest {
    pub fn token(&self) -> &SearchToken {
        &self.token
    }

    pub async fn run<S: RoutingService>(&self, router: &S) -> Result<RouteResult> {
        find_route_guarded(self.origin, &self.candidates, router, Some(&self.token)).await
    }
}

/// Search state behind the map view: the last resolved location, its safe
/// zones and the route currently shown.
pub struct EvacuationSession<G, S> {
    geocoder: G,
    router: S,
    rng: ChaCha8Rng,
    count_range: RangeInclusive<usize>,
    generation: SearchGeneration,
    last_location: Option<Coordinate>,
    safe_zones: Vec<SafeZone>,
    current_route: Option<RouteResult>,
}

impl<G: Geocoder, S: RoutingService> EvacuationSession<G, S> {
    pub fn new(geocoder: G, router: S, rng: ChaCha8Rng) -> Self {
        EvacuationSession {
            geocoder,
            router,
            rng,
            count_range: default_count_range(),
            generation: SearchGeneration::new(),
            last_location: None,
            safe_zones: vec![],
            current_route: None,
        }
    }

    pub fn with_count_range(mut self, count_range: RangeInclusive<usize>) -> Self {
        self.count_range = count_range;
        self
    }

    pub fn last_location(&self) -> Option<Coordinate> {
        self.last_location
    }

    pub fn safe_zones(&self) -> &[SafeZone] {
        &self.safe_zones
    }

    pub fn current_route(&self) -> Option<&RouteResult> {
        self.current_route.as_ref()
    }

    /// Resolves `input` and replaces the safe zones with a fresh set around it.
    pub async fn submit_location(&mut self, input: &str) -> Result<&[SafeZone]> {
        let query = parse_location_input(input)?;
        let location = resolve(&query, &self.geocoder).await?;
        Ok(self.search_around(location))
    }

    /// Same as [`submit_location`](Self::submit_location) for a device-supplied position.
    pub fn use_current_location(&mut self, location: Coordinate) -> &[SafeZone] {
        self.search_around(location)
    }

    fn search_around(&mut self, location: Coordinate) -> &[SafeZone] {
        let token = self.generation.advance();
        debug!("Starting search generation {}", token.generation());

        self.safe_zones = generate(location, self.count_range.clone(), &mut self.rng);
        self.last_location = Some(location);
        self.current_route = None;
        info!("{} Safe Zones Available!", self.safe_zones.len());
        &self.safe_zones
    }

    /// Resolves `input` without generating zones or touching the current search.
    pub async fn show_location_only(&self, input: &str) -> Result<Coordinate> {
        let query = parse_location_input(input)?;
        resolve(&query, &self.geocoder).await
    }

    pub fn center(&self) -> Result<Coordinate> {
        self.last_location.ok_or(Error::NoLocationSelected)
    }

    /// Snapshots the current search for a route query; any older query goes stale.
    pub fn begin_route(&self) -> RouteRequest {
        RouteRequest {
            token: self.generation.advance(),
            origin: self.last_location,
            candidates: self.safe_zones.clone(),
        }
    }

    /// Stores `result` unless a newer search started after `token` was issued.
    pub fn commit_route(&mut self, token: &SearchToken, result: RouteResult) -> Result<&RouteResult> {
        if !token.is_current() {
            warn!(
                "Discarding route to {} from stale search generation {}",
                result.target.name,
                token.generation()
            );
            return Err(Error::StaleSearch);
        }
        info!("{}", result.summary());
        Ok(&*self.current_route.insert(result))
    }

    pub async fn route_to_nearest_shelter(&mut self) -> Result<&RouteResult> {
        let request = self.begin_route();
        let result = request.run(&self.router).await?;
        self.commit_route(request.token(), result)
    }

    pub fn clear(&mut self) {
        self.generation.advance();
        self.last_location = None;
        self.safe_zones.clear();
        self.current_route = None;
        info!("Search cleared");
    }
}
