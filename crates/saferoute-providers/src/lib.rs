//! SafeRoute providers - clients for the external collaborators
//!
//! The routing provider supplies candidate geometries, the geocoder turns
//! free text into coordinates and the incident store supplies crowd-reported
//! points. Each one sits behind a trait so the server can swap in stubs.

pub mod error;
pub mod geocoding;
pub mod incidents;
pub mod routing;

pub use error::ProviderError;
pub use geocoding::{Geocoder, NominatimClient};
pub use incidents::{FirestoreClient, IncidentSource};
pub use routing::{OsrmClient, RoutingProvider};

use std::time::Duration;

pub(crate) const USER_AGENT: &str = concat!("saferoute/", env!("CARGO_PKG_VERSION"));

pub(crate) fn http_client() -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .user_agent(USER_AGENT)
        .build()
        .map_err(ProviderError::transport("http client"))
}
