//! Endpoint-specific API implementations
//!
//! | Module | Google Maps endpoint |
//! |--------|----------------------|
//! | `distance_matrix` | `distancematrix/json` |
//! | `geocode` | `geocode/json` |

pub mod distance_matrix;
pub mod geocode;

pub use distance_matrix::DistanceMatrixApi;
pub use geocode::GeocodeApi;
