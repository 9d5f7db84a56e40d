//! HTTP API Client
//!
//! Functions for communicating with the growth-tracking REST API.
//! Authenticated calls carry a bearer token; a 401 from any of them maps
//! to [`ApiError::Unauthorized`] so call sites can drop the session.

use chrono::{DateTime, Utc};
use gloo_net::http::{Request, RequestBuilder, Response};

use crate::growth::percentile::{GrowthCurve, GrowthCurvePoint};
use crate::state::global::{Subject, WeightRecord};

/// Default API base URL
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Get the API base URL from local storage or use default
pub fn get_api_base() -> String {
    let url = if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            if let Ok(Some(url)) = storage.get_item("sprout_api_url") {
                url
            } else {
                DEFAULT_API_BASE.to_string()
            }
        } else {
            DEFAULT_API_BASE.to_string()
        }
    } else {
        DEFAULT_API_BASE.to_string()
    };
    // Normalize: remove trailing slash
    url.trim_end_matches('/').to_string()
}

/// Errors surfaced to the UI, grouped by how they are handled.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// Invalid or expired token; drops the whole session.
    #[error("not authorized")]
    Unauthorized,
    /// Connectivity or CORS failure before any response arrived.
    #[error("cannot reach the server: {0}")]
    Network(String),
    /// Server-reported failure, detail surfaced verbatim.
    #[error("{detail}")]
    Server { status: u16, detail: String },
    /// Response arrived but was not the shape we expected.
    #[error("unexpected response: {0}")]
    Decode(String),
}

/// Error body used by the API (FastAPI-style `detail`).
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

async fn error_from(response: Response) -> ApiError {
    if response.status() == 401 {
        return ApiError::Unauthorized;
    }

    let status = response.status();
    let detail = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.detail.or(body.message))
        .unwrap_or_else(|| format!("HTTP {status}"));
    ApiError::Server { status, detail }
}

fn network(e: gloo_net::Error) -> ApiError {
    ApiError::Network(e.to_string())
}

fn decode(e: gloo_net::Error) -> ApiError {
    ApiError::Decode(e.to_string())
}

fn bearer(builder: RequestBuilder, token: &str) -> RequestBuilder {
    builder.header("Authorization", &format!("Bearer {token}"))
}

// ============ Request/Response Types ============

#[derive(Debug, serde::Serialize)]
struct TokenRequest {
    email: String,
    password: String,
}

#[derive(Debug, serde::Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Body for creating a weight record. Weights travel as whole grams.
#[derive(Clone, Debug, serde::Serialize)]
pub struct WeightDraft {
    pub weight_g: u32,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Partial update; absent fields are left untouched by the server.
#[derive(Clone, Debug, Default, serde::Serialize)]
pub struct WeightPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_g: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct GrowthCurveResponse {
    curve_data: Vec<GrowthCurvePoint>,
}

/// Full assessment for a single record, including the WHO reference
/// range. Exposed by the API but not consumed by the main flow.
#[allow(dead_code)]
#[derive(Debug, serde::Deserialize)]
pub struct WeightAssessment {
    pub weight_id: String,
    pub weight_g: u32,
    pub age_in_days: i64,
    pub gender: String,
    pub percentile: f64,
    pub z_score: f64,
    pub assessment: String,
    pub message: String,
    pub reference_range: ReferenceRange,
}

#[allow(dead_code)]
#[derive(Debug, serde::Deserialize)]
pub struct ReferenceRange {
    pub p3: f64,
    pub p15: f64,
    pub p50: f64,
    pub p85: f64,
    pub p97: f64,
}

/// Kilograms as entered in the form to whole grams on the wire.
pub fn kg_to_grams(weight_kg: f64) -> u32 {
    (weight_kg * 1000.0).round() as u32
}

// ============ API Functions ============

/// Exchange credentials for an access token
pub async fn login(email: &str, password: &str) -> Result<String, ApiError> {
    let api_base = get_api_base();

    let response = Request::post(&format!("{api_base}/auth/token"))
        .json(&TokenRequest {
            email: email.to_string(),
            password: password.to_string(),
        })
        .map_err(decode)?
        .send()
        .await
        .map_err(network)?;

    if !response.ok() {
        return Err(error_from(response).await);
    }

    let token: TokenResponse = response.json().await.map_err(decode)?;
    Ok(token.access_token)
}

/// Fetch the subjects the signed-in user may track
pub async fn fetch_subjects(token: &str) -> Result<Vec<Subject>, ApiError> {
    let api_base = get_api_base();

    let response = bearer(Request::get(&format!("{api_base}/v1/babies")), token)
        .send()
        .await
        .map_err(network)?;

    if !response.ok() {
        return Err(error_from(response).await);
    }

    response.json().await.map_err(decode)
}

/// Fetch all weight records for a subject
pub async fn fetch_weights(
    token: &str,
    subject_id: &str,
    include_assessment: bool,
) -> Result<Vec<WeightRecord>, ApiError> {
    let api_base = get_api_base();
    let url = format!(
        "{api_base}/v1/babies/{subject_id}/weights?include_assessment={include_assessment}"
    );

    let response = bearer(Request::get(&url), token)
        .send()
        .await
        .map_err(network)?;

    if !response.ok() {
        return Err(error_from(response).await);
    }

    response.json().await.map_err(decode)
}

/// Create a weight record
pub async fn create_weight(
    token: &str,
    subject_id: &str,
    draft: &WeightDraft,
) -> Result<WeightRecord, ApiError> {
    let api_base = get_api_base();

    let response = bearer(
        Request::post(&format!("{api_base}/v1/babies/{subject_id}/weights")),
        token,
    )
    .json(draft)
    .map_err(decode)?
    .send()
    .await
    .map_err(network)?;

    if !response.ok() {
        return Err(error_from(response).await);
    }

    response.json().await.map_err(decode)
}

/// Partially update a weight record
pub async fn update_weight(
    token: &str,
    subject_id: &str,
    weight_id: &str,
    patch: &WeightPatch,
) -> Result<WeightRecord, ApiError> {
    let api_base = get_api_base();

    let response = bearer(
        Request::put(&format!(
            "{api_base}/v1/babies/{subject_id}/weights/{weight_id}"
        )),
        token,
    )
    .json(patch)
    .map_err(decode)?
    .send()
    .await
    .map_err(network)?;

    if !response.ok() {
        return Err(error_from(response).await);
    }

    response.json().await.map_err(decode)
}

/// Delete a weight record. Success is signaled by status only.
pub async fn delete_weight(
    token: &str,
    subject_id: &str,
    weight_id: &str,
) -> Result<(), ApiError> {
    let api_base = get_api_base();

    let response = bearer(
        Request::delete(&format!(
            "{api_base}/v1/babies/{subject_id}/weights/{weight_id}"
        )),
        token,
    )
    .send()
    .await
    .map_err(network)?;

    if !response.ok() {
        return Err(error_from(response).await);
    }

    Ok(())
}

/// Fetch the WHO reference table for a subject
pub async fn fetch_growth_curve(
    token: &str,
    subject_id: &str,
    from_month: u32,
    to_month: u32,
) -> Result<GrowthCurve, ApiError> {
    let api_base = get_api_base();
    let url = format!(
        "{api_base}/v1/babies/{subject_id}/growth-curve?from_month={from_month}&to_month={to_month}"
    );

    let response = bearer(Request::get(&url), token)
        .send()
        .await
        .map_err(network)?;

    if !response.ok() {
        return Err(error_from(response).await);
    }

    let curve: GrowthCurveResponse = response.json().await.map_err(decode)?;
    Ok(GrowthCurve::new(curve.curve_data))
}

/// Fetch the full assessment for one record. Not used by the main flow.
#[allow(dead_code)]
pub async fn fetch_assessment(
    token: &str,
    subject_id: &str,
    weight_id: &str,
) -> Result<WeightAssessment, ApiError> {
    let api_base = get_api_base();
    let url = format!("{api_base}/v1/babies/{subject_id}/weights/{weight_id}/assessment");

    let response = bearer(Request::get(&url), token)
        .send()
        .await
        .map_err(network)?;

    if !response.ok() {
        return Err(error_from(response).await);
    }

    response.json().await.map_err(decode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    /// In-memory double with the same CRUD semantics as the remote API.
    struct MockApi {
        next_id: u32,
        records: Vec<WeightRecord>,
    }

    impl MockApi {
        fn new() -> Self {
            Self {
                next_id: 1,
                records: Vec::new(),
            }
        }

        fn list(&self) -> Vec<WeightRecord> {
            self.records.clone()
        }

        fn create(&mut self, draft: &WeightDraft) -> WeightRecord {
            let record = WeightRecord {
                weight_id: format!("w{}", self.next_id),
                weight_g: draft.weight_g,
                timestamp: draft.timestamp,
                note: draft.note.clone(),
                assessment: None,
            };
            self.next_id += 1;
            self.records.push(record.clone());
            record
        }

        fn update(&mut self, weight_id: &str, patch: &WeightPatch) -> Option<WeightRecord> {
            let record = self
                .records
                .iter_mut()
                .find(|r| r.weight_id == weight_id)?;
            if let Some(weight_g) = patch.weight_g {
                record.weight_g = weight_g;
            }
            if let Some(timestamp) = patch.timestamp {
                record.timestamp = timestamp;
            }
            if let Some(note) = &patch.note {
                record.note = Some(note.clone());
            }
            Some(record.clone())
        }

        fn delete(&mut self, weight_id: &str) -> bool {
            let before = self.records.len();
            self.records.retain(|r| r.weight_id != weight_id);
            self.records.len() < before
        }
    }

    fn draft(weight_kg: f64) -> WeightDraft {
        WeightDraft {
            weight_g: kg_to_grams(weight_kg),
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap(),
            note: None,
        }
    }

    #[test]
    fn kilogram_entry_round_trips_through_grams() {
        let mut api = MockApi::new();
        let created = api.create(&draft(3.5));
        assert_eq!(created.weight_g, 3500);

        let fetched = &api.list()[0];
        assert_eq!(fetched.display_kg(), "3.50");
    }

    #[test]
    fn created_records_show_up_in_subsequent_lists() {
        let mut api = MockApi::new();
        api.create(&draft(3.5));
        api.create(&draft(4.2));

        let listed = api.list();
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().any(|r| r.weight_g == 4200));
    }

    #[test]
    fn deleted_records_disappear_from_subsequent_lists() {
        let mut api = MockApi::new();
        let keep = api.create(&draft(3.5));
        let gone = api.create(&draft(4.2));

        assert!(api.delete(&gone.weight_id));

        let listed = api.list();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].weight_id, keep.weight_id);
        assert!(!api.delete(&gone.weight_id));
    }

    #[test]
    fn partial_update_leaves_other_fields_alone() {
        let mut api = MockApi::new();
        let created = api.create(&WeightDraft {
            note: Some("first bath day".to_string()),
            ..draft(3.5)
        });

        let updated = api
            .update(
                &created.weight_id,
                &WeightPatch {
                    weight_g: Some(3650),
                    ..WeightPatch::default()
                },
            )
            .unwrap();

        assert_eq!(updated.weight_g, 3650);
        assert_eq!(updated.timestamp, created.timestamp);
        assert_eq!(updated.note.as_deref(), Some("first bath day"));
    }

    #[test]
    fn rounding_is_to_the_nearest_gram() {
        assert_eq!(kg_to_grams(3.4995), 3500);
        assert_eq!(kg_to_grams(0.0014), 1);
        assert_eq!(kg_to_grams(12.3456), 12346);
    }

    #[test]
    fn patch_serializes_only_provided_fields() {
        let patch = WeightPatch {
            weight_g: Some(3650),
            ..WeightPatch::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({ "weight_g": 3650 }));
    }
}
