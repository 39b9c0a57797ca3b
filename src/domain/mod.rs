pub mod types;

pub use types::{Coordinate, Directions, RouteResult, SafeZone};
