use itertools::Itertools;
use tracing::{debug, info, info_span, warn, Instrument};

use super::generation::SearchToken;
use super::service::RoutingService;
use crate::config::constant::ARRIVAL_THRESHOLD_DEG;
use crate::domain::types::{Coordinate, RouteResult, SafeZone};
use crate::error::{Error, NotFound, Result};

/// Where a nearest-shelter search currently stands.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchState {
    /// The candidate at this index (in nearest-first order) is next.
    Pending(usize),
    Succeeded(RouteResult),
    Exhausted,
}

/// Sequential nearest-first route search over a set of shelters.
///
/// Each [`step`](RouteSearch::step) issues at most one request, so there is
/// never more than one routing call in flight.
pub struct RouteSearch<'a, S> {
    origin: Coordinate,
    ordered: Vec<(f64, &'a SafeZone)>,
    service: &'a S,
    state: SearchState,
    attempts: usize,
}

impl<'a, S: RoutingService> RouteSearch<'a, S> {
    pub fn new(origin: Coordinate, candidates: &'a [SafeZone], service: &'a S) -> Self {
        let ordered: Vec<(f64, &SafeZone)> = candidates
            .iter()
            .map(|zone| (origin.planar_distance(&zone.location), zone))
            .sorted_by(|a, b| a.0.total_cmp(&b.0))
            .collect();
        let state = if ordered.is_empty() {
            SearchState::Exhausted
        } else {
            SearchState::Pending(0)
        };

        RouteSearch {
            origin,
            ordered,
            service,
            state,
            attempts: 0,
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, SearchState::Pending(_))
    }

    /// Number of routing requests issued so far.
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    /// Advances the search by one candidate.
    pub async fn step(&mut self) {
        let index = match self.state {
            SearchState::Pending(index) => index,
            _ => return,
        };
        let Some(&(distance, zone)) = self.ordered.get(index) else {
            self.state = SearchState::Exhausted;
            return;
        };
        let next = if index + 1 < self.ordered.len() {
            SearchState::Pending(index + 1)
        } else {
            SearchState::Exhausted
        };

        if distance < ARRIVAL_THRESHOLD_DEG {
            debug!(
                "Skipping {} ({:.6} deg away), already there",
                zone.name, distance
            );
            self.state = next;
            return;
        }

        self.attempts += 1;
        debug!("Requesting route to {} ({:.4} deg away)", zone.name, distance);
        match self.service.route(self.origin, zone.location).await {
            Ok(directions) if directions.path.len() >= 2 => {
                info!(
                    "Found route to {} ({:.0} m, {:.0} s)",
                    zone.name, directions.distance_meters, directions.duration_seconds
                );
                self.state =
                    SearchState::Succeeded(RouteResult::from_directions(zone.clone(), directions));
            }
            Ok(directions) => {
                warn!(
                    "Degenerate route to {} ({} points), trying next shelter",
                    zone.name,
                    directions.path.len()
                );
                self.state = next;
            }
            Err(e) => {
                warn!("Routing to {} failed: {}, trying next shelter", zone.name, e);
                self.state = next;
            }
        }
    }

    /// Drives the search to completion, stopping early if `token` goes stale.
    pub async fn run(mut self, token: Option<&SearchToken>) -> Result<RouteResult> {
        while self.is_pending() {
            if token.is_some_and(|t| !t.is_current()) {
                info!("Route search superseded after {} attempts", self.attempts);
                return Err(Error::StaleSearch);
            }
            self.step().await;
        }
        self.into_outcome().map_err(Error::from)
    }

    pub fn into_outcome(self) -> std::result::Result<RouteResult, NotFound> {
        match self.state {
            SearchState::Succeeded(result) => Ok(result),
            _ => Err(NotFound::NoAccessibleRoute),
        }
    }
}

/// Finds a route from `origin` to the nearest reachable shelter.
///
/// Candidates are ordered by planar distance and tried one at a time; a failed or
/// degenerate response moves on to the next shelter rather than aborting.
pub async fn find_route<S: RoutingService>(
    origin: Option<Coordinate>,
    candidates: &[SafeZone],
    service: &S,
) -> std::result::Result<RouteResult, NotFound> {
    match find_route_guarded(origin, candidates, service, None).await {
        Ok(result) => Ok(result),
        Err(Error::NotFound(reason)) => Err(reason),
        // Without a token the search cannot go stale.
        Err(_) => Err(NotFound::NoAccessibleRoute),
    }
}

/// Same as [`find_route`], but abandons the search as soon as `token` is superseded.
pub async fn find_route_guarded<S: RoutingService>(
    origin: Option<Coordinate>,
    candidates: &[SafeZone],
    service: &S,
    token: Option<&SearchToken>,
) -> Result<RouteResult> {
    let Some(origin) = origin else {
        warn!("No origin for route search");
        return Err(NotFound::NoCandidates.into());
    };
    if candidates.is_empty() {
        warn!("No safe zones to route to");
        return Err(NotFound::NoCandidates.into());
    }

    let span = info_span!(
        "find_route",
        lng = origin.lng(),
        lat = origin.lat(),
        candidates = candidates.len()
    );
    async move {
        let result = RouteSearch::new(origin, candidates, service).run(token).await;
        if let Err(Error::NotFound(reason)) = &result {
            warn!("Route search finished: {}", reason);
        }
        result
    }
    .instrument(span)
    .await
}
