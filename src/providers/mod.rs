pub mod mapbox;
pub mod osrm;

use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info, trace};

use crate::config::constant::REQUEST_TIMEOUT_SECS;
use crate::config::Settings;
use crate::domain::types::{Coordinate, Directions};
use crate::error::{Error, Result};
use crate::routing::RoutingService;

pub use mapbox::{MapboxDirections, MapboxGeocoder};
pub use osrm::OsrmDirections;

/// Routing backend selected from [`Settings::routing_provider`].
#[derive(Debug, Clone)]
pub enum RoutingProvider {
    Mapbox(MapboxDirections),
    Osrm(OsrmDirections),
}

impl RoutingProvider {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        info!("Using routing provider '{}'", settings.routing_provider);
        match settings.routing_provider.as_str() {
            "mapbox" => Ok(RoutingProvider::Mapbox(MapboxDirections::from_settings(
                settings,
            )?)),
            "osrm" => Ok(RoutingProvider::Osrm(OsrmDirections::from_settings(
                settings,
            ))),
            other => {
                error!("Unknown routing provider: {}", other);
                Err(Error::UnknownProvider {
                    name: other.to_string(),
                })
            }
        }
    }
}

impl RoutingService for RoutingProvider {
    async fn route(&self, from: Coordinate, to: Coordinate) -> Result<Directions> {
        match self {
            RoutingProvider::Mapbox(p) => p.route(from, to).await,
            RoutingProvider::Osrm(p) => p.route(from, to).await,
        }
    }
}

pub(crate) fn http_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .unwrap_or_else(|e| {
            error!("Failed to build HTTP client with timeout: {}, using defaults", e);
            Client::new()
        })
}

/// Sends `request` and returns the body, mapping non-2xx statuses to [`Error::Provider`].
pub(crate) async fn fetch_text(provider: &'static str, request: RequestBuilder) -> Result<String> {
    let response = request.send().await.map_err(|e| {
        error!("{} request failed: {}", provider, e);
        Error::Http(e)
    })?;

    let status = response.status();
    debug!(
        "Received response from {}: HTTP {} ({} bytes)",
        provider,
        status,
        response.content_length().unwrap_or(0)
    );
    if !status.is_success() {
        error!(
            "{} returned HTTP {}: {}",
            provider,
            status,
            status.canonical_reason().unwrap_or("Unknown")
        );
        return Err(Error::Provider {
            provider,
            status: status.as_u16(),
        });
    }

    let text = response.text().await?;
    trace!("{} response size: {} bytes", provider, text.len());
    Ok(text)
}

/// Converts a GeoJSON `[lng, lat]` position into a validated coordinate.
pub(crate) fn position_to_coordinate(provider: &'static str, position: &[f64]) -> Result<Coordinate> {
    match position {
        [lng, lat, ..] => Coordinate::new(*lng, *lat),
        _ => Err(Error::MalformedResponse {
            provider,
            message: format!("position with {} values", position.len()),
        }),
    }
}

#[derive(Debug, Deserialize)]
struct DirectionsBody {
    code: Option<String>,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<RouteBody>,
}

#[derive(Debug, Deserialize)]
struct RouteBody {
    geometry: GeometryBody,
    distance: f64,
    duration: f64,
}

#[derive(Debug, Deserialize)]
struct GeometryBody {
    coordinates: Vec<Vec<f64>>,
}

/// Parses a GeoJSON directions payload (Mapbox and OSRM share the shape) into the first route.
pub(crate) fn parse_directions(provider: &'static str, text: &str) -> Result<Directions> {
    let body: DirectionsBody = serde_json::from_str(text).map_err(|e| {
        error!(
            "Failed to parse {} JSON: {} (first 200 chars: {})",
            provider,
            e,
            text.chars().take(200).collect::<String>()
        );
        Error::Json(e)
    })?;

    if let Some(code) = body.code.as_deref().filter(|c| *c != "Ok") {
        return Err(Error::MalformedResponse {
            provider,
            message: format!(
                "code {}: {}",
                code,
                body.message.as_deref().unwrap_or("no message")
            ),
        });
    }

    let Some(route) = body.routes.into_iter().next() else {
        return Err(Error::MalformedResponse {
            provider,
            message: "no routes in response".to_string(),
        });
    };

    let path = route
        .geometry
        .coordinates
        .iter()
        .map(|position| position_to_coordinate(provider, position))
        .collect::<Result<Vec<Coordinate>>>()?;
    debug!(
        "Parsed {} route: {} points, {:.0} m, {:.0} s",
        provider,
        path.len(),
        route.distance,
        route.duration
    );

    Ok(Directions {
        path,
        distance_meters: route.distance,
        duration_seconds: route.duration,
    })
}
