pub mod finder;
pub mod generation;
pub mod service;

pub use finder::{find_route, find_route_guarded, RouteSearch, SearchState};
pub use generation::{SearchGeneration, SearchToken};
pub use service::{Geocoder, RoutingService};
