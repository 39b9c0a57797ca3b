use reqwest::Client;
use tracing::{debug, info, trace, warn};

use super::{fetch_text, http_client, parse_directions};
use crate::config::Settings;
use crate::domain::types::{Coordinate, Directions};
use crate::error::Result;
use crate::routing::RoutingService;

const PROVIDER: &str = "OSRM";

/// Point-to-point routing against an OSRM `route` service.
#[derive(Debug, Clone)]
pub struct OsrmDirections {
    client: Client,
    base_url: String,
    user_agent: Option<String>,
}

impl OsrmDirections {
    pub fn from_settings(settings: &Settings) -> Self {
        let base_url = settings.osrm_base_url.trim_end_matches('/').to_string();
        let is_public_osrm = base_url.contains("router.project-osrm.org");

        // The public demo server rejects anonymous clients.
        let user_agent = if is_public_osrm {
            let agent = settings
                .contact_email
                .as_deref()
                .map(|email| format!("evac/0.1 ({})", email.trim()))
                .unwrap_or_else(|| "evac/0.1 (no-email-configured@example.com)".to_string());
            info!("Using public OSRM, added User-Agent: {}", agent);
            Some(agent)
        } else {
            info!("Using self-hosted OSRM at {}", base_url);
            None
        };

        OsrmDirections {
            client: http_client(),
            base_url,
            user_agent,
        }
    }

    fn route_url(&self, from: Coordinate, to: Coordinate) -> String {
        // OSRM wants longitude,latitude in that order
        format!(
            "{}/{},{};{},{}?geometries=geojson&overview=full",
            self.base_url,
            from.lng(),
            from.lat(),
            to.lng(),
            to.lat()
        )
    }
}

impl RoutingService for OsrmDirections {
    async fn route(&self, from: Coordinate, to: Coordinate) -> Result<Directions> {
        let url = self.route_url(from, to);
        debug!("Built OSRM URL: {} ({} chars)", url, url.len());

        let mut request = self.client.get(&url);
        if let Some(agent) = &self.user_agent {
            request = request.header("User-Agent", agent);
        }

        let text = fetch_text(PROVIDER, request).await?;
        if text.contains("TooBig") {
            warn!("OSRM rejected request as too large");
        }
        trace!("OSRM body: {}", text.chars().take(200).collect::<String>());
        parse_directions(PROVIDER, &text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords() -> (Coordinate, Coordinate) {
        (
            Coordinate::new(103.8519, 1.2903).unwrap(),
            Coordinate::new(103.8198, 1.3521).unwrap(),
        )
    }

    #[test]
    fn public_server_gets_a_user_agent() {
        let settings = Settings {
            contact_email: Some(" ops@example.org ".to_string()),
            ..Settings::default()
        };
        let osrm = OsrmDirections::from_settings(&settings);
        assert_eq!(osrm.user_agent.as_deref(), Some("evac/0.1 (ops@example.org)"));
    }

    #[test]
    fn self_hosted_server_is_anonymous_and_lng_first() {
        let settings = Settings {
            osrm_base_url: "http://localhost:5000/route/v1/foot/".to_string(),
            ..Settings::default()
        };
        let osrm = OsrmDirections::from_settings(&settings);
        assert!(osrm.user_agent.is_none());

        let (from, to) = coords();
        assert_eq!(
            osrm.route_url(from, to),
            "http://localhost:5000/route/v1/foot/103.8519,1.2903;103.8198,1.3521?geometries=geojson&overview=full"
        );
    }

    #[test]
    fn osrm_error_code_is_rejected() {
        let text = r#"{"code": "NoSegment", "message": "Could not find a matching segment for any coordinate."}"#;
        assert!(parse_directions(PROVIDER, text).is_err());
    }
}
