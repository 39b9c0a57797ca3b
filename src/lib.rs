//! Safe-zone generation and nearest-shelter routing for emergency response.
//!
//! [`generator::generate`] scatters candidate shelters around a location and
//! [`routing::find_route`] walks them nearest-first until a routing service
//! returns a usable path.

pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod export;
pub mod generator;
pub mod input;
pub mod providers;
pub mod routing;
pub mod session;

pub use domain::types::{Coordinate, Directions, RouteResult, SafeZone};
pub use error::{Error, NotFound, Result};
pub use generator::generate;
pub use routing::{find_route, Geocoder, RoutingService};
pub use session::EvacuationSession;
