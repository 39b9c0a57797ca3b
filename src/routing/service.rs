use std::future::Future;

use crate::domain::types::{Coordinate, Directions};
use crate::error::{Error, Result};

/// Something that can compute a travel path between two points.
pub trait RoutingService {
    fn route(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> impl Future<Output = Result<Directions>> + Send;
}

/// Resolves free-text place names to the first matching coordinate.
pub trait Geocoder {
    fn geocode(&self, query: &str) -> impl Future<Output = Result<Option<Coordinate>>> + Send;
}

// An unconfigured collaborator fails every call.
impl<S: RoutingService + Sync> RoutingService for Option<S> {
    async fn route(&self, from: Coordinate, to: Coordinate) -> Result<Directions> {
        match self {
            Some(service) => service.route(from, to).await,
            None => Err(Error::MissingAccessToken { provider: "routing" }),
        }
    }
}

impl<G: Geocoder + Sync> Geocoder for Option<G> {
    async fn geocode(&self, query: &str) -> Result<Option<Coordinate>> {
        match self {
            Some(geocoder) => geocoder.geocode(query).await,
            None => Err(Error::MissingAccessToken {
                provider: "geocoding",
            }),
        }
    }
}
