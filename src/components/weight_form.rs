//! Weight Record Form
//!
//! Modal form for creating and editing records. Weights are entered in
//! kilograms and sent as whole grams; timestamps are entered in local
//! time and sent as UTC.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use leptos::*;

use crate::api::{self, ApiError, WeightDraft, WeightPatch};
use crate::state::global::GlobalState;

/// Create/edit modal. Mounted fresh each time it opens, so the signals
/// initialize from the record under edit (if any) exactly once.
#[component]
pub fn WeightForm() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let editing = state.editing.get_untracked();
    let weight_id = editing.as_ref().map(|r| r.weight_id.clone());
    let title = if weight_id.is_some() {
        "Edit weight record"
    } else {
        "New weight record"
    };

    let (weight_kg, set_weight_kg) = create_signal(
        editing
            .as_ref()
            .map(|r| r.display_kg())
            .unwrap_or_default(),
    );
    let (measured_at, set_measured_at) = create_signal(
        editing
            .as_ref()
            .map(|r| to_local_input(r.timestamp))
            .unwrap_or_else(|| to_local_input(Utc::now())),
    );
    let (note, set_note) = create_signal(
        editing
            .and_then(|r| r.note)
            .unwrap_or_default(),
    );
    let (submitting, set_submitting) = create_signal(false);
    let (form_error, set_form_error) = create_signal(None::<String>);

    let state_for_close = state.clone();
    let close = move |_| {
        state_for_close.form_open.set(false);
        state_for_close.editing.set(None);
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let weight_g = match parse_weight_kg(&weight_kg.get()) {
            Ok(grams) => grams,
            Err(e) => {
                set_form_error.set(Some(e));
                return;
            }
        };
        let timestamp = match parse_local_timestamp(&measured_at.get()) {
            Ok(ts) => ts,
            Err(e) => {
                set_form_error.set(Some(e));
                return;
            }
        };
        let note = Some(note.get().trim().to_string()).filter(|n| !n.is_empty());

        set_form_error.set(None);
        set_submitting.set(true);

        let weight_id = weight_id.clone();
        let state = state.clone();
        spawn_local(async move {
            let session = state.session.get_untracked();
            let (Some(token), Some(subject_id)) = (session.token(), session.subject_id()) else {
                set_submitting.set(false);
                return;
            };

            let result = match &weight_id {
                Some(weight_id) => api::update_weight(
                    token,
                    subject_id,
                    weight_id,
                    &WeightPatch {
                        weight_g: Some(weight_g),
                        timestamp: Some(timestamp),
                        note,
                    },
                )
                .await
                .map(|_| ()),
                None => api::create_weight(
                    token,
                    subject_id,
                    &WeightDraft {
                        weight_g,
                        timestamp,
                        note,
                    },
                )
                .await
                .map(|_| ()),
            };

            match result {
                Ok(()) => {
                    state.form_open.set(false);
                    state.editing.set(None);
                    state.show_success("Record saved");
                    state.refresh_dashboard();
                }
                Err(ApiError::Unauthorized) => {
                    state.form_open.set(false);
                    state.editing.set(None);
                    state.expire_session();
                }
                Err(e) => set_form_error.set(Some(e.to_string())),
            }
            set_submitting.set(false);
        });
    };

    view! {
        <div class="fixed inset-0 z-40 bg-black/60 flex items-center justify-center px-4">
            <div class="bg-gray-800 rounded-xl p-6 w-full max-w-md border border-gray-700">
                <h2 class="text-xl font-semibold mb-4">{title}</h2>

                <form on:submit=on_submit class="space-y-4">
                    <div>
                        <label class="block text-sm text-gray-400 mb-2">"Weight (kg)"</label>
                        <input
                            type="number"
                            step="0.01"
                            min="0"
                            placeholder="3.50"
                            prop:value=move || weight_kg.get()
                            on:input=move |ev| set_weight_kg.set(event_target_value(&ev))
                            class="w-full bg-gray-700 rounded-lg px-4 py-3 text-white
                                   border border-gray-600 focus:border-green-500 focus:outline-none"
                        />
                    </div>

                    <div>
                        <label class="block text-sm text-gray-400 mb-2">"Measured at"</label>
                        <input
                            type="datetime-local"
                            prop:value=move || measured_at.get()
                            on:input=move |ev| set_measured_at.set(event_target_value(&ev))
                            class="w-full bg-gray-700 rounded-lg px-4 py-3 text-white
                                   border border-gray-600 focus:border-green-500 focus:outline-none"
                        />
                    </div>

                    <div>
                        <label class="block text-sm text-gray-400 mb-2">"Note (optional)"</label>
                        <textarea
                            rows="2"
                            prop:value=move || note.get()
                            on:input=move |ev| set_note.set(event_target_value(&ev))
                            class="w-full bg-gray-700 rounded-lg px-4 py-3 text-white
                                   border border-gray-600 focus:border-green-500 focus:outline-none"
                        />
                    </div>

                    {move || form_error.get().map(|e| view! {
                        <p class="text-red-400 text-sm">{e}</p>
                    })}

                    <div class="flex justify-end space-x-2">
                        <button
                            type="button"
                            on:click=close
                            class="px-4 py-2 bg-gray-700 hover:bg-gray-600 rounded-lg transition-colors"
                        >
                            "Cancel"
                        </button>
                        <button
                            type="submit"
                            disabled=move || submitting.get()
                            class="px-4 py-2 bg-green-700 hover:bg-green-600 disabled:bg-gray-600
                                   disabled:cursor-not-allowed rounded-lg font-semibold transition-colors"
                        >
                            {move || if submitting.get() { "Saving..." } else { "Save" }}
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}

/// Parse a kilogram entry into whole grams.
fn parse_weight_kg(input: &str) -> Result<u32, String> {
    let weight_kg: f64 = input
        .trim()
        .parse()
        .map_err(|_| "Enter the weight in kilograms, e.g. 3.50".to_string())?;
    if !weight_kg.is_finite() || weight_kg <= 0.0 {
        return Err("Weight must be greater than zero".to_string());
    }
    if weight_kg >= 100.0 {
        return Err("Weight must be below 100 kg".to_string());
    }
    Ok(api::kg_to_grams(weight_kg))
}

/// Parse a `datetime-local` value into UTC.
fn parse_local_timestamp(input: &str) -> Result<DateTime<Utc>, String> {
    let naive = NaiveDateTime::parse_from_str(input.trim(), "%Y-%m-%dT%H:%M")
        .map_err(|_| "Enter a valid measurement time".to_string())?;
    Local
        .from_local_datetime(&naive)
        .single()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| "Enter a valid measurement time".to_string())
}

/// Render a UTC timestamp into the `datetime-local` input format.
fn to_local_input(timestamp: DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%Y-%m-%dT%H:%M")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kilograms_parse_to_whole_grams() {
        assert_eq!(parse_weight_kg("3.5"), Ok(3500));
        assert_eq!(parse_weight_kg(" 4.25 "), Ok(4250));
        assert_eq!(parse_weight_kg("3.4995"), Ok(3500));
    }

    #[test]
    fn non_positive_and_absurd_weights_are_rejected() {
        assert!(parse_weight_kg("0").is_err());
        assert!(parse_weight_kg("-1.2").is_err());
        assert!(parse_weight_kg("250").is_err());
        assert!(parse_weight_kg("abc").is_err());
        assert!(parse_weight_kg("").is_err());
    }

    #[test]
    fn local_timestamp_round_trips() {
        let input = "2024-03-15T12:30";
        let parsed = parse_local_timestamp(input).unwrap();
        assert_eq!(to_local_input(parsed), input);
    }

    #[test]
    fn garbage_timestamps_are_rejected() {
        assert!(parse_local_timestamp("yesterday").is_err());
        assert!(parse_local_timestamp("2024-13-40T99:99").is_err());
    }
}
