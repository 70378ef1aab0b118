//! Nominatim-compatible geocoder.

use crate::error::{check_status, ProviderError};
use futures::future::BoxFuture;
use saferoute_core::geocode::{PlaceSource, ResolvedPlace};
use saferoute_core::models::Coordinate;
use serde::Deserialize;

const SERVICE: &str = "geocoder";

/// Resolves free-text place names the local resolver could not.
pub trait Geocoder: Send + Sync {
    fn geocode<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<ResolvedPlace, ProviderError>>;
}

/// Nominatim returns coordinates as strings.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

/// Decode a `search?format=json` response, taking the first hit.
pub fn parse_nominatim_search(query: &str, body: &str) -> Result<ResolvedPlace, ProviderError> {
    let places: Vec<NominatimPlace> =
        serde_json::from_str(body).map_err(|e| ProviderError::malformed(SERVICE, e))?;
    let place = places
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::PlaceNotFound(query.to_string()))?;

    let lat: f64 = place
        .lat
        .parse()
        .map_err(|_| ProviderError::malformed(SERVICE, format!("bad latitude '{}'", place.lat)))?;
    let lon: f64 = place
        .lon
        .parse()
        .map_err(|_| ProviderError::malformed(SERVICE, format!("bad longitude '{}'", place.lon)))?;
    let coordinate = Coordinate::new(lat, lon);
    if !coordinate.is_valid() {
        return Err(ProviderError::malformed(
            SERVICE,
            format!("coordinates out of range ({lat}, {lon})"),
        ));
    }

    Ok(ResolvedPlace {
        query: query.to_string(),
        coordinate,
        source: PlaceSource::External,
        matched: place.display_name,
    })
}

pub struct NominatimClient {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderError> {
        Ok(Self {
            client: crate::http_client()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn search(&self, query: &str) -> Result<ResolvedPlace, ProviderError> {
        let url = format!("{}/search", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(ProviderError::transport(SERVICE))?;
        let response = check_status(SERVICE, response).await?;
        let body = response
            .text()
            .await
            .map_err(ProviderError::transport(SERVICE))?;

        let place = parse_nominatim_search(query, &body)?;
        tracing::debug!(
            "Geocoded '{}' to ({}, {})",
            query,
            place.coordinate.lat,
            place.coordinate.lon
        );
        Ok(place)
    }
}

impl Geocoder for NominatimClient {
    fn geocode<'a>(
        &'a self,
        query: &'a str,
    ) -> BoxFuture<'a, Result<ResolvedPlace, ProviderError>> {
        Box::pin(self.search(query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_first_result() {
        let body = r#"[
            {"lat": "18.9219", "lon": "72.8346", "display_name": "Gateway of India, Mumbai"},
            {"lat": "0", "lon": "0"}
        ]"#;
        let place = parse_nominatim_search("gateway of india", body).unwrap();
        assert_eq!(place.coordinate, Coordinate::new(18.9219, 72.8346));
        assert_eq!(place.source, PlaceSource::External);
        assert_eq!(place.matched.as_deref(), Some("Gateway of India, Mumbai"));
    }

    #[test]
    fn empty_result_is_not_found() {
        let err = parse_nominatim_search("atlantis", "[]").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn rejects_unparseable_coordinates() {
        let err = parse_nominatim_search("x", r#"[{"lat": "north", "lon": "1"}]"#).unwrap_err();
        assert!(matches!(err, ProviderError::Malformed { .. }));
        let err = parse_nominatim_search("x", r#"[{"lat": "95", "lon": "1"}]"#).unwrap_err();
        assert!(matches!(err, ProviderError::Malformed { .. }));
    }
}
