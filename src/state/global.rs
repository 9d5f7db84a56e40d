//! Global Application State
//!
//! Reactive state management using Leptos signals, plus the dashboard
//! load flow shared by every component that mutates records.

use chrono::{DateTime, NaiveDate, Utc};
use leptos::*;

use crate::api::{self, ApiError};
use crate::growth::percentile::GrowthCurve;
use crate::growth::series::MAX_REFERENCE_MONTH;
use crate::state::session::{self, Session};

/// Global application state provided to all components
#[derive(Clone)]
pub struct GlobalState {
    /// Auth token and selected subject, mirrored to local storage
    pub session: RwSignal<Session>,
    /// Subjects the signed-in user may track
    pub subjects: RwSignal<Vec<Subject>>,
    /// Weight records for the selected subject
    pub records: RwSignal<Vec<WeightRecord>>,
    /// WHO reference table for the selected subject
    pub curve: RwSignal<Option<GrowthCurve>>,
    /// Monotonic counter; only the latest load may apply its result
    pub load_generation: RwSignal<u64>,
    /// Global loading state
    pub loading: RwSignal<bool>,
    /// Record being edited in the form, if any
    pub editing: RwSignal<Option<WeightRecord>>,
    /// Whether the record form modal is open
    pub form_open: RwSignal<bool>,
    /// Error message to display
    pub error: RwSignal<Option<String>>,
    /// Success message (for toasts)
    pub success: RwSignal<Option<String>>,
}

/// Subject (infant) returned by the API
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Subject {
    pub baby_id: String,
    pub name: String,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Option<String>,
}

/// A single weight record. Immutable once fetched; mutations go through
/// the API and are followed by a re-fetch.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct WeightRecord {
    pub weight_id: String,
    pub weight_g: u32,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub assessment: Option<AssessmentBrief>,
}

impl WeightRecord {
    pub fn weight_kg(&self) -> f64 {
        self.weight_g as f64 / 1000.0
    }

    /// Two-decimal kilogram display, e.g. "3.50".
    pub fn display_kg(&self) -> String {
        format!("{:.2}", self.weight_kg())
    }
}

/// Growth assessment embedded in a weight record
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct AssessmentBrief {
    pub percentile: f64,
    pub assessment: AssessmentCategory,
    pub message: String,
}

/// Weight-for-age category derived from the percentile
#[derive(Clone, Copy, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum AssessmentCategory {
    SeverelyUnderweight,
    Underweight,
    Normal,
    Overweight,
    SeverelyOverweight,
    Unknown,
}

impl From<String> for AssessmentCategory {
    fn from(value: String) -> Self {
        match value.as_str() {
            "severely_underweight" => AssessmentCategory::SeverelyUnderweight,
            "underweight" => AssessmentCategory::Underweight,
            "normal" => AssessmentCategory::Normal,
            "overweight" => AssessmentCategory::Overweight,
            "severely_overweight" => AssessmentCategory::SeverelyOverweight,
            _ => AssessmentCategory::Unknown,
        }
    }
}

impl AssessmentCategory {
    pub fn label(&self) -> &'static str {
        match self {
            AssessmentCategory::SeverelyUnderweight => "Severely underweight",
            AssessmentCategory::Underweight => "Underweight",
            AssessmentCategory::Normal => "Normal range",
            AssessmentCategory::Overweight => "Overweight",
            AssessmentCategory::SeverelyOverweight => "Severely overweight",
            AssessmentCategory::Unknown => "Unknown",
        }
    }

    /// Text color class by severity.
    pub fn tone_class(&self) -> &'static str {
        match self {
            AssessmentCategory::Normal => "text-green-400",
            AssessmentCategory::Underweight | AssessmentCategory::Overweight => "text-yellow-400",
            AssessmentCategory::SeverelyUnderweight | AssessmentCategory::SeverelyOverweight => {
                "text-red-400"
            }
            AssessmentCategory::Unknown => "text-gray-400",
        }
    }
}

/// Provide global state to the component tree
pub fn provide_global_state() {
    let state = GlobalState {
        session: create_rw_signal(session::load()),
        subjects: create_rw_signal(Vec::new()),
        records: create_rw_signal(Vec::new()),
        curve: create_rw_signal(None),
        load_generation: create_rw_signal(0),
        loading: create_rw_signal(false),
        editing: create_rw_signal(None),
        form_open: create_rw_signal(false),
        error: create_rw_signal(None),
        success: create_rw_signal(None),
    };

    provide_context(state);
}

impl GlobalState {
    /// Mutate the session and persist the result wholesale.
    pub fn update_session(&self, f: impl FnOnce(&mut Session)) {
        self.session.update(f);
        self.session.with_untracked(session::store);
    }

    /// Drop the session after the server rejected our token.
    pub fn expire_session(&self) {
        self.update_session(Session::sign_out);
        self.show_error("Your session has expired, please sign in again");
    }

    /// The currently selected subject, if it is in the fetched list.
    pub fn selected_subject(&self) -> Option<Subject> {
        let id = self.session.with(|s| s.subject_id().map(str::to_string))?;
        self.subjects
            .with(|list| list.iter().find(|s| s.baby_id == id).cloned())
    }

    pub fn birth_date(&self) -> Option<NaiveDate> {
        self.selected_subject()?.birth_date
    }

    /// Most recent record by measurement time.
    pub fn latest_record(&self) -> Option<WeightRecord> {
        self.records
            .with(|records| records.iter().max_by_key(|r| r.timestamp).cloned())
    }

    /// Start a new load; older in-flight loads become stale.
    fn begin_load(&self) -> u64 {
        self.load_generation.update(|g| *g += 1);
        self.load_generation.get_untracked()
    }

    fn is_current(&self, generation: u64) -> bool {
        self.load_generation.get_untracked() == generation
    }

    /// Re-fetch records and the reference curve for the selected
    /// subject. A result is only applied if no newer load has started
    /// since; a 401 anywhere drops the session.
    pub fn refresh_dashboard(&self) {
        let Some(token) = self.session.with_untracked(|s| s.token().map(str::to_string)) else {
            return;
        };
        let Some(subject_id) = self
            .session
            .with_untracked(|s| s.subject_id().map(str::to_string))
        else {
            self.records.set(Vec::new());
            self.curve.set(None);
            return;
        };

        let generation = self.begin_load();
        self.loading.set(true);

        let state = self.clone();
        spawn_local(async move {
            match api::fetch_weights(&token, &subject_id, true).await {
                Ok(records) => {
                    // The reference table only lines up with a true age
                    // axis, so skip it without a birth date. Its failure
                    // degrades the chart, never the records.
                    let has_birth_date = state
                        .subjects
                        .with_untracked(|list| {
                            list.iter()
                                .find(|s| s.baby_id == subject_id)
                                .map(|s| s.birth_date.is_some())
                        })
                        .unwrap_or(false);

                    let curve = if has_birth_date {
                        match api::fetch_growth_curve(
                            &token,
                            &subject_id,
                            0,
                            MAX_REFERENCE_MONTH as u32,
                        )
                        .await
                        {
                            Ok(curve) => Some(curve),
                            Err(ApiError::Unauthorized) => {
                                state.expire_session();
                                state.loading.set(false);
                                return;
                            }
                            Err(e) => {
                                web_sys::console::warn_1(
                                    &format!("growth curve unavailable: {e}").into(),
                                );
                                None
                            }
                        }
                    } else {
                        None
                    };

                    if state.is_current(generation) {
                        state.records.set(records);
                        state.curve.set(curve);
                        state.loading.set(false);
                    }
                }
                Err(ApiError::Unauthorized) => {
                    state.expire_session();
                    state.loading.set(false);
                }
                Err(e) => {
                    if state.is_current(generation) {
                        state.show_error(&e.to_string());
                        state.loading.set(false);
                    }
                }
            }
        });
    }

    /// Show a success message (auto-clears after timeout)
    pub fn show_success(&self, message: &str) {
        self.success.set(Some(message.to_string()));

        let success_signal = self.success;
        gloo_timers::callback::Timeout::new(3000, move || {
            success_signal.set(None);
        })
        .forget();
    }

    /// Show an error message (auto-clears after timeout)
    pub fn show_error(&self, message: &str) {
        self.error.set(Some(message.to_string()));

        let error_signal = self.error;
        gloo_timers::callback::Timeout::new(5000, move || {
            error_signal.set(None);
        })
        .forget();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_converts_to_two_decimal_kilograms() {
        let record = WeightRecord {
            weight_id: "w1".to_string(),
            weight_g: 3500,
            timestamp: Utc::now(),
            note: None,
            assessment: None,
        };
        assert_eq!(record.weight_kg(), 3.5);
        assert_eq!(record.display_kg(), "3.50");
    }

    #[test]
    fn assessment_categories_use_snake_case_wire_names() {
        let parsed: AssessmentCategory =
            serde_json::from_str("\"severely_underweight\"").unwrap();
        assert_eq!(parsed, AssessmentCategory::SeverelyUnderweight);

        let parsed: AssessmentCategory = serde_json::from_str("\"normal\"").unwrap();
        assert_eq!(parsed, AssessmentCategory::Normal);
    }

    #[test]
    fn unknown_category_falls_back() {
        let parsed: AssessmentCategory = serde_json::from_str("\"stunted\"").unwrap();
        assert_eq!(parsed, AssessmentCategory::Unknown);
    }

    #[test]
    fn record_deserializes_with_embedded_assessment() {
        let json = r#"{
            "weight_id": "w1",
            "baby_id": "b1",
            "weight_g": 5600,
            "timestamp": "2024-03-01T08:30:00Z",
            "note": "after feeding",
            "assessment": {
                "percentile": 52.4,
                "assessment": "normal",
                "message": "Weight is within the normal range"
            }
        }"#;
        let record: WeightRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.weight_g, 5600);
        let assessment = record.assessment.unwrap();
        assert_eq!(assessment.assessment, AssessmentCategory::Normal);
        assert!((assessment.percentile - 52.4).abs() < 1e-9);
    }
}
