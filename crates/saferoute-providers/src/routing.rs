//! OSRM-compatible routing client.

use crate::error::ProviderError;
use futures::future::BoxFuture;
use saferoute_core::models::{Coordinate, Route, RoutePoint};
use serde::Deserialize;

const SERVICE: &str = "routing provider";

/// Supplies candidate route geometries between two coordinates.
pub trait RoutingProvider: Send + Sync {
    fn routes(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> BoxFuture<'_, Result<Vec<Route>, ProviderError>>;
}

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: OsrmGeometry,
    /// meters
    distance: f64,
    /// seconds
    duration: f64,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>,
}

/// Decode a `route/v1` response body with GeoJSON geometries.
pub fn parse_osrm_routes(body: &str) -> Result<Vec<Route>, ProviderError> {
    let response: OsrmResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::malformed(SERVICE, e))?;

    if response.code != "Ok" {
        let reason = response.message.unwrap_or(response.code);
        return Err(ProviderError::NoRoutes(reason));
    }
    if response.routes.is_empty() {
        return Err(ProviderError::NoRoutes("empty route list".to_string()));
    }

    Ok(response
        .routes
        .into_iter()
        .map(|route| {
            Route::new(
                route
                    .geometry
                    .coordinates
                    .into_iter()
                    .map(RoutePoint::from)
                    .collect(),
                route.distance / 1000.0,
                route.duration / 60.0,
            )
        })
        .collect())
}

/// HTTP client for an OSRM `route/v1` endpoint.
pub struct OsrmClient {
    client: reqwest::Client,
    base_url: String,
    profile: String,
}

impl OsrmClient {
    pub fn new(
        base_url: impl Into<String>,
        profile: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: crate::http_client()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            profile: profile.into(),
        })
    }

    fn route_url(&self, origin: Coordinate, destination: Coordinate) -> String {
        format!(
            "{}/route/v1/{}/{},{};{},{}",
            self.base_url, self.profile, origin.lon, origin.lat, destination.lon, destination.lat
        )
    }

    async fn fetch_routes(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Vec<Route>, ProviderError> {
        let url = self.route_url(origin, destination);
        tracing::debug!("Requesting routes: {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("alternatives", "true"),
                ("geometries", "geojson"),
                ("overview", "full"),
            ])
            .send()
            .await
            .map_err(ProviderError::transport(SERVICE))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(ProviderError::transport(SERVICE))?;

        // OSRM reports NoRoute, NoSegment and friends as 400 with a JSON envelope.
        let routes = match parse_osrm_routes(&body) {
            Err(ProviderError::Malformed { .. }) if !status.is_success() => {
                return Err(ProviderError::Status {
                    service: SERVICE,
                    status: status.as_u16(),
                    body,
                });
            }
            parsed => parsed?,
        };
        tracing::info!("Routing provider returned {} route(s)", routes.len());
        Ok(routes)
    }
}

impl RoutingProvider for OsrmClient {
    fn routes(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> BoxFuture<'_, Result<Vec<Route>, ProviderError>> {
        Box::pin(self.fetch_routes(origin, destination))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_units_and_keeps_lon_lat_order() {
        let body = r#"{
            "code": "Ok",
            "routes": [
                {"geometry": {"type": "LineString", "coordinates": [[77.2, 28.6], [77.21, 28.61]]},
                 "distance": 2500.0, "duration": 1800.0},
                {"geometry": {"type": "LineString", "coordinates": [[77.2, 28.6], [77.22, 28.6]]},
                 "distance": 3000.0, "duration": 2100.0}
            ]
        }"#;
        let routes = parse_osrm_routes(body).unwrap();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].distance_km, 2.5);
        assert_eq!(routes[0].duration_min, 30.0);
        assert_eq!(routes[0].geometry[1], RoutePoint::new(77.21, 28.61));
    }

    #[test]
    fn no_route_code_is_not_found() {
        let err = parse_osrm_routes(r#"{"code": "NoRoute", "message": "Impossible route"}"#)
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("Impossible route"));

        let err = parse_osrm_routes(r#"{"code": "Ok", "routes": []}"#).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn garbage_is_malformed() {
        let err = parse_osrm_routes("<html>").unwrap_err();
        assert!(matches!(err, ProviderError::Malformed { .. }));
        assert!(!err.is_not_found());
    }

    /// Serve a single canned HTTP response on a local port.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let headers = format!(
                "content-type: application/json\r\ncontent-length: {}\r\nconnection: close",
                body.len()
            );
            let response = format!("HTTP/1.1 {status_line}\r\n{headers}\r\n\r\n{body}");
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn bad_request_with_no_route_code_is_not_found() {
        let url = serve_once(
            "400 Bad Request",
            r#"{"code":"NoRoute","message":"Impossible route between points"}"#,
        )
        .await;
        let client = OsrmClient::new(url, "foot").unwrap();
        let err = client
            .routes(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 1.0))
            .await
            .unwrap_err();
        assert!(err.is_not_found(), "unexpected error: {err}");
        assert!(err.to_string().contains("Impossible route between points"));
    }

    #[tokio::test]
    async fn server_error_without_envelope_is_status() {
        let url = serve_once("503 Service Unavailable", "upstream down").await;
        let client = OsrmClient::new(url, "foot").unwrap();
        let err = client
            .routes(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 1.0))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Status { status: 503, .. }));
        assert!(!err.is_not_found());
    }

    #[tokio::test]
    async fn ok_response_is_parsed() {
        let url = serve_once(
            "200 OK",
            r#"{"code":"Ok","routes":[{"geometry":{"coordinates":[[0.0,0.0],[0.01,0.0]]},
                "distance":1000.0,"duration":600.0}]}"#,
        )
        .await;
        let client = OsrmClient::new(url, "foot").unwrap();
        let routes = client
            .routes(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 0.01))
            .await
            .unwrap();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].distance_km, 1.0);
        assert_eq!(routes[0].duration_min, 10.0);
    }

    #[test]
    fn builds_lon_lat_url() {
        let client = OsrmClient::new("https://router.example/", "foot").unwrap();
        let url = client.route_url(Coordinate::new(28.6, 77.2), Coordinate::new(19.0, 72.8));
        assert_eq!(url, "https://router.example/route/v1/foot/77.2,28.6;72.8,19");
    }
}
