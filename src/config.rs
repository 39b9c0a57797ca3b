use dotenv::dotenv;
use std::env;
use tracing::{debug, warn};

pub mod constant {
    use std::ops::RangeInclusive;

    pub const MIN_SAFE_ZONES: usize = 3;
    pub const MAX_SAFE_ZONES: usize = 8;
    pub const MAX_PLACEMENT_ATTEMPTS: usize = 50;
    /// Half-width (degrees) of the square that safe zones are drawn from.
    pub const OFFSET_HALF_WIDTH_DEG: f64 = 0.1;
    /// Planar separation (degrees) between any two zones of one generation.
    pub const MIN_SEPARATION_DEG: f64 = 0.05;
    pub const CAPACITY_RANGE: RangeInclusive<u32> = 10..=59;

    /// Candidates closer than this (~20m) are treated as "already there".
    pub const ARRIVAL_THRESHOLD_DEG: f64 = 0.0002;

    pub const DEFAULT_ROUTING_PROVIDER: &str = "mapbox";
    pub const MAPBOX_GEOCODING_URL: &str = "https://api.mapbox.com/geocoding/v5/mapbox.places";
    pub const MAPBOX_DIRECTIONS_URL: &str = "https://api.mapbox.com/directions/v5/mapbox/walking";
    pub const OSRM_ROUTE_URL: &str = "https://router.project-osrm.org/route/v1/foot";
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
}

/// Runtime settings for the external collaborators, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub mapbox_access_token: Option<String>,
    pub routing_provider: String,
    pub mapbox_geocoding_url: String,
    pub mapbox_directions_url: String,
    pub osrm_base_url: String,
    pub contact_email: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            mapbox_access_token: None,
            routing_provider: constant::DEFAULT_ROUTING_PROVIDER.to_string(),
            mapbox_geocoding_url: constant::MAPBOX_GEOCODING_URL.to_string(),
            mapbox_directions_url: constant::MAPBOX_DIRECTIONS_URL.to_string(),
            osrm_base_url: constant::OSRM_ROUTE_URL.to_string(),
            contact_email: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        dotenv().ok();
        let defaults = Settings::default();

        let mapbox_access_token = non_empty_var("MAPBOX_ACCESS_TOKEN");
        if mapbox_access_token.is_none() {
            warn!("MAPBOX_ACCESS_TOKEN not set, geocoding and Mapbox directions are unavailable");
        }

        let settings = Settings {
            mapbox_access_token,
            routing_provider: non_empty_var("ROUTING_PROVIDER")
                .map(|p| p.to_lowercase())
                .unwrap_or(defaults.routing_provider),
            mapbox_geocoding_url: non_empty_var("MAPBOX_GEOCODING_URL")
                .unwrap_or(defaults.mapbox_geocoding_url),
            mapbox_directions_url: non_empty_var("MAPBOX_DIRECTIONS_URL")
                .unwrap_or(defaults.mapbox_directions_url),
            osrm_base_url: non_empty_var("OSRM_BASE_URL").unwrap_or(defaults.osrm_base_url),
            contact_email: non_empty_var("EVAC_CONTACT_EMAIL"),
        };
        debug!(
            "Loaded settings: provider={}, osrm={}",
            settings.routing_provider, settings.osrm_base_url
        );
        settings
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_public_endpoints() {
        let settings = Settings::default();
        assert_eq!(settings.routing_provider, "mapbox");
        assert!(settings.osrm_base_url.contains("router.project-osrm.org"));
        assert!(settings.mapbox_access_token.is_none());
    }

    #[test]
    fn placement_window_is_wider_than_separation() {
        assert!(constant::OFFSET_HALF_WIDTH_DEG * 2.0 > constant::MIN_SEPARATION_DEG);
        assert!(constant::MIN_SAFE_ZONES <= constant::MAX_SAFE_ZONES);
    }
}
