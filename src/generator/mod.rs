pub mod safe_zones;

pub use safe_zones::{default_count_range, generate};
