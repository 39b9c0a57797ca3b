use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, error, info, trace};

use super::{fetch_text, http_client, parse_directions, position_to_coordinate};
use crate::config::Settings;
use crate::domain::types::{Coordinate, Directions};
use crate::error::{Error, Result};
use crate::routing::{Geocoder, RoutingService};

const PROVIDER: &str = "Mapbox";

fn access_token(settings: &Settings) -> Result<String> {
    settings
        .mapbox_access_token
        .clone()
        .ok_or(Error::MissingAccessToken { provider: PROVIDER })
}

/// Forward geocoding through the Mapbox places API.
#[derive(Debug, Clone)]
pub struct MapboxGeocoder {
    client: Client,
    base_url: String,
    access_token: String,
}

impl MapboxGeocoder {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(MapboxGeocoder {
            client: http_client(),
            base_url: settings.mapbox_geocoding_url.clone(),
            access_token: access_token(settings)?,
        })
    }

    fn query_url(&self, query: &str) -> Result<Url> {
        let bad_base = |reason: String| {
            Error::InvalidInput(format!("geocoding URL {}: {}", self.base_url, reason))
        };
        let mut url = Url::parse(&self.base_url).map_err(|e| bad_base(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| bad_base("cannot be a base".to_string()))?
            .push(&format!("{}.json", query));
        Ok(url)
    }
}

impl Geocoder for MapboxGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<Coordinate>> {
        let url = self.query_url(query)?;
        trace!("Geocoding '{}' via {}", query, url);

        let request = self
            .client
            .get(url)
            .query(&[("access_token", self.access_token.as_str()), ("limit", "1")]);
        let text = fetch_text(PROVIDER, request).await?;
        let found = parse_geocoding(&text)?;
        match found {
            Some(c) => info!("Geocoded '{}' to ({}, {})", query, c.lng(), c.lat()),
            None => info!("No geocoding match for '{}'", query),
        }
        Ok(found)
    }
}

#[derive(Debug, Deserialize)]
struct GeocodingBody {
    #[serde(default)]
    features: Vec<FeatureBody>,
}

#[derive(Debug, Deserialize)]
struct FeatureBody {
    center: Vec<f64>,
}

/// First feature's `center` as a coordinate, or `None` when nothing matched.
pub(crate) fn parse_geocoding(text: &str) -> Result<Option<Coordinate>> {
    let body: GeocodingBody = serde_json::from_str(text).map_err(|e| {
        error!("Failed to parse {} geocoding JSON: {}", PROVIDER, e);
        Error::Json(e)
    })?;
    debug!("Geocoding returned {} features", body.features.len());

    body.features
        .first()
        .map(|feature| position_to_coordinate(PROVIDER, &feature.center))
        .transpose()
}

/// Walking directions through the Mapbox directions API.
#[derive(Debug, Clone)]
pub struct MapboxDirections {
    client: Client,
    base_url: String,
    access_token: String,
}

impl MapboxDirections {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(MapboxDirections {
            client: http_client(),
            base_url: settings.mapbox_directions_url.clone(),
            access_token: access_token(settings)?,
        })
    }
}

impl RoutingService for MapboxDirections {
    async fn route(&self, from: Coordinate, to: Coordinate) -> Result<Directions> {
        let url = format!(
            "{}/{},{};{},{}",
            self.base_url.trim_end_matches('/'),
            from.lng(),
            from.lat(),
            to.lng(),
            to.lat()
        );
        trace!("Requesting Mapbox directions: {}", url);

        let request = self.client.get(&url).query(&[
            ("access_token", self.access_token.as_str()),
            ("geometries", "geojson"),
        ]);
        let text = fetch_text(PROVIDER, request).await?;
        parse_directions(PROVIDER, &text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        Settings {
            mapbox_access_token: Some("pk.test".to_string()),
            ..Settings::default()
        }
    }

    #[test]
    fn parses_first_feature_center() {
        let text = r#"{
            "type": "FeatureCollection",
            "features": [
                {"place_name": "New Delhi, Delhi, India", "center": [77.209, 28.6139]},
                {"place_name": "Delhi Cantonment", "center": [77.13, 28.59]}
            ]
        }"#;
        let found = parse_geocoding(text).unwrap();
        assert_eq!(found, Some(Coordinate::new(77.209, 28.6139).unwrap()));
    }

    #[test]
    fn no_features_is_no_match() {
        assert_eq!(parse_geocoding(r#"{"features": []}"#).unwrap(), None);
        assert_eq!(parse_geocoding(r#"{"message": "Not Found"}"#).unwrap(), None);
    }

    #[test]
    fn query_is_percent_encoded_into_the_path() {
        let geocoder = MapboxGeocoder::from_settings(&settings()).unwrap();
        let url = geocoder.query_url("New Delhi/India").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.mapbox.com/geocoding/v5/mapbox.places/New%20Delhi%2FIndia.json"
        );
    }

    #[test]
    fn clients_need_a_token() {
        assert!(matches!(
            MapboxGeocoder::from_settings(&Settings::default()),
            Err(Error::MissingAccessToken { .. })
        ));
        assert!(MapboxDirections::from_settings(&settings()).is_ok());
    }
}
