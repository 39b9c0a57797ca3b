use tracing::{debug, info};

use crate::domain::types::Coordinate;
use crate::error::{Error, Result};
use crate::routing::Geocoder;

/// What a free-text location box resolved to before any network call.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    /// Literal `longitude,latitude` input.
    Coordinates(Coordinate),
    /// A place name to geocode.
    Place(String),
}

/// Validates and classifies a location search string.
///
/// Anything containing a comma must be exactly `longitude,latitude`; everything
/// else is treated as a place name of at least two characters. `<` and `>` are
/// stripped before either check.
pub fn parse_location_input(input: &str) -> Result<LocationQuery> {
    let cleaned: String = input.trim().chars().filter(|c| !matches!(c, '<' | '>')).collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return Err(Error::EmptyInput);
    }

    if cleaned.contains(',') {
        let parts: Vec<&str> = cleaned.split(',').map(str::trim).collect();
        let [lng, lat] = parts.as_slice() else {
            return Err(Error::InvalidInput(
                "coordinates must be in format: longitude,latitude".to_string(),
            ));
        };
        let (Ok(lng), Ok(lat)) = (lng.parse::<f64>(), lat.parse::<f64>()) else {
            return Err(Error::InvalidInput("invalid coordinate values".to_string()));
        };
        debug!("Parsed coordinate input ({}, {})", lng, lat);
        return Coordinate::new(lng, lat).map(LocationQuery::Coordinates);
    }

    if cleaned.chars().count() < 2 {
        return Err(Error::InvalidInput(
            "location name must be at least 2 characters long".to_string(),
        ));
    }
    Ok(LocationQuery::Place(cleaned.to_string()))
}

/// Turns a query into coordinates, geocoding place names.
pub async fn resolve<G: Geocoder>(query: &LocationQuery, geocoder: &G) -> Result<Coordinate> {
    match query {
        LocationQuery::Coordinates(c) => Ok(*c),
        LocationQuery::Place(name) => match geocoder.geocode(name).await? {
            Some(c) => {
                info!("Resolved '{}' to ({}, {})", name, c.lng(), c.lat());
                Ok(c)
            }
            None => Err(Error::LocationNotFound {
                query: name.clone(),
            }),
        },
    }
}
