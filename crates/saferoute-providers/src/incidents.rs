//! Crowd-reported incidents from a Firestore-compatible document store.
//!
//! Reports become ordinary `incident` records. They are returned raw so the
//! catalog validates them exactly like static entries.

use crate::error::{check_status, ProviderError};
use futures::future::BoxFuture;
use saferoute_core::models::{Category, RawPointOfInterest};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

const SERVICE: &str = "incident store";
const COLLECTION: &str = "incidentReports";
const PAGE_SIZE: &str = "300";
const MAX_PAGES: usize = 20;

/// Source of crowd-reported incident points.
pub trait IncidentSource: Send + Sync {
    fn fetch_incidents(&self) -> BoxFuture<'_, Result<Vec<RawPointOfInterest>, ProviderError>>;
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<Document>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Document {
    name: String,
    #[serde(default)]
    fields: HashMap<String, Value>,
}

/// Unwrap a Firestore typed value (`{"doubleValue": 1.5}` and friends).
fn number_field(fields: &HashMap<String, Value>, key: &str) -> Option<f64> {
    let value = fields.get(key)?;
    if let Some(v) = value.get("doubleValue").and_then(Value::as_f64) {
        return Some(v);
    }
    match value.get("integerValue")? {
        Value::String(s) => s.parse().ok(),
        other => other.as_f64(),
    }
}

fn string_field(fields: &HashMap<String, Value>, key: &str) -> Option<String> {
    fields
        .get(key)?
        .get("stringValue")?
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn document_to_record(document: Document) -> RawPointOfInterest {
    let doc_id = document
        .name
        .rsplit('/')
        .next()
        .unwrap_or(document.name.as_str())
        .to_string();
    let fields = &document.fields;

    let incident_type = string_field(fields, "incidentType");
    let location = string_field(fields, "location");
    let title = match (incident_type, location) {
        (Some(kind), Some(place)) => Some(format!("{kind} near {place}")),
        (Some(kind), None) => Some(kind),
        (None, Some(place)) => Some(format!("Reported incident near {place}")),
        (None, None) => Some("Reported incident".to_string()),
    };

    RawPointOfInterest {
        id: Some(format!("report-{doc_id}")),
        lat: number_field(fields, "latitude"),
        lon: number_field(fields, "longitude"),
        category: Some(Category::Incident.as_str().to_string()),
        title,
        description: string_field(fields, "description"),
        filler: false,
    }
}

/// Decode one page of a `documents` list response.
pub fn parse_incident_page(
    body: &str,
) -> Result<(Vec<RawPointOfInterest>, Option<String>), ProviderError> {
    let page: ListDocumentsResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::malformed(SERVICE, e))?;
    let records = page.documents.into_iter().map(document_to_record).collect();
    Ok((records, page.next_page_token.filter(|t| !t.is_empty())))
}

/// Firestore REST client for the incident report collection.
pub struct FirestoreClient {
    client: reqwest::Client,
    base_url: String,
    project: String,
}

impl FirestoreClient {
    pub fn new(
        base_url: impl Into<String>,
        project: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: crate::http_client()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            project: project.into(),
        })
    }

    fn collection_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/databases/(default)/documents/{}",
            self.base_url, self.project, COLLECTION
        )
    }

    async fn list_all(&self) -> Result<Vec<RawPointOfInterest>, ProviderError> {
        let url = self.collection_url();
        let mut records = Vec::new();
        let mut page_token: Option<String> = None;

        for _ in 0..MAX_PAGES {
            let mut request = self.client.get(&url).query(&[("pageSize", PAGE_SIZE)]);
            if let Some(token) = page_token.as_deref() {
                request = request.query(&[("pageToken", token)]);
            }
            let response = request
                .send()
                .await
                .map_err(ProviderError::transport(SERVICE))?;
            let response = check_status(SERVICE, response).await?;
            let body = response
                .text()
                .await
                .map_err(ProviderError::transport(SERVICE))?;

            let (page, next) = parse_incident_page(&body)?;
            records.extend(page);
            match next {
                Some(token) => page_token = Some(token),
                None => return Ok(records),
            }
        }

        tracing::warn!(
            "Incident store still paginating after {} pages; using {} records",
            MAX_PAGES,
            records.len()
        );
        Ok(records)
    }
}

impl IncidentSource for FirestoreClient {
    fn fetch_incidents(&self) -> BoxFuture<'_, Result<Vec<RawPointOfInterest>, ProviderError>> {
        Box::pin(self.list_all())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_reports_to_incident_records() {
        let body = r#"{
            "documents": [{
                "name": "projects/p/databases/(default)/documents/incidentReports/abc123",
                "fields": {
                    "latitude": {"doubleValue": 28.63},
                    "longitude": {"integerValue": "77"},
                    "incidentType": {"stringValue": "Harassment"},
                    "location": {"stringValue": "Karol Bagh"},
                    "description": {"stringValue": "Reported after dark"},
                    "severity": {"stringValue": "high"}
                }
            }],
            "nextPageToken": "next"
        }"#;
        let (records, next) = parse_incident_page(body).unwrap();
        assert_eq!(next.as_deref(), Some("next"));

        let record = &records[0];
        assert_eq!(record.id.as_deref(), Some("report-abc123"));
        assert_eq!(record.lat, Some(28.63));
        assert_eq!(record.lon, Some(77.0));
        assert_eq!(record.category.as_deref(), Some("incident"));
        assert_eq!(record.title.as_deref(), Some("Harassment near Karol Bagh"));
        assert_eq!(record.description.as_deref(), Some("Reported after dark"));
    }

    #[test]
    fn missing_coordinates_are_left_for_validation() {
        let body = r#"{"documents": [{"name": "x/incidentReports/d1", "fields": {}}]}"#;
        let (records, next) = parse_incident_page(body).unwrap();
        assert!(next.is_none());
        assert_eq!(records[0].lat, None);
        assert_eq!(records[0].title.as_deref(), Some("Reported incident"));

        let (catalog, rejected) = saferoute_core::Catalog::load(records);
        assert!(catalog.is_empty());
        assert_eq!(rejected.len(), 1);
    }

    #[test]
    fn empty_collection_has_no_documents_key() {
        let (records, next) = parse_incident_page("{}").unwrap();
        assert!(records.is_empty());
        assert!(next.is_none());
    }
}
