use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Typed "no route" outcomes of a nearest-shelter search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NotFound {
    /// No origin was known, or there were no shelters to try.
    #[error("no candidates")]
    NoCandidates,

    /// Every shelter was tried and none produced a usable path.
    #[error("no accessible route")]
    NoAccessibleRoute,
}

#[derive(Debug, Error)]
pub enum Error {
    /// Search text was blank after trimming.
    #[error("location input cannot be empty")]
    EmptyInput,

    #[error("invalid location input: {0}")]
    InvalidInput(String),

    /// Longitude/latitude outside the valid ranges (or not finite).
    #[error("invalid coordinates ({lng}, {lat}): {reason}")]
    InvalidCoordinates {
        lng: f64,
        lat: f64,
        reason: &'static str,
    },

    /// Geocoding returned no match for the query.
    #[error("location not found: {query}")]
    LocationNotFound { query: String },

    #[error("no location selected yet")]
    NoLocationSelected,

    #[error("{provider} requires an access token")]
    MissingAccessToken { provider: &'static str },

    #[error("unknown routing provider: {name}")]
    UnknownProvider { name: String },

    /// Non-success HTTP status from an external service.
    #[error("{provider} returned HTTP {status}")]
    Provider { provider: &'static str, status: u16 },

    #[error("malformed response from {provider}: {message}")]
    MalformedResponse {
        provider: &'static str,
        message: String,
    },

    /// A newer search started while this one was in flight.
    #[error("search was superseded by a newer one")]
    StaleSearch,

    #[error(transparent)]
    NotFound(#[from] NotFound),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_messages_match_the_reported_reasons() {
        assert_eq!(NotFound::NoCandidates.to_string(), "no candidates");
        assert_eq!(NotFound::NoAccessibleRoute.to_string(), "no accessible route");

        let wrapped: Error = NotFound::NoAccessibleRoute.into();
        assert_eq!(wrapped.to_string(), "no accessible route");
    }
}
