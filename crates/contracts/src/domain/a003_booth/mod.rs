pub mod aggregate;
pub mod occupancy;

pub use aggregate::*;
pub use occupancy::*;
