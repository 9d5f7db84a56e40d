//! Weight Record List
//!
//! Record rows with edit and delete actions, newest first.

use leptos::*;

use crate::api::{self, ApiError};
use crate::state::global::{GlobalState, WeightRecord};

/// Record list for the selected subject
#[component]
pub fn WeightList() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    view! {
        <div class="space-y-2">
            {move || {
                let mut records = state.records.get();
                records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

                if records.is_empty() {
                    view! {
                        <p class="text-gray-400 text-center py-8">
                            "No weight records yet - add the first one to see the curve."
                        </p>
                    }.into_view()
                } else {
                    records.into_iter().map(|record| {
                        view! { <WeightRow record=record /> }
                    }).collect_view()
                }
            }}
        </div>
    }
}

/// A single record row
#[component]
fn WeightRow(record: WeightRecord) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let measured_at = record
        .timestamp
        .with_timezone(&chrono::Local)
        .format("%Y-%m-%d %H:%M")
        .to_string();
    let weight_label = format!("{} kg", record.display_kg());
    let note = record.note.clone();
    let assessment = record.assessment.clone();

    let record_for_edit = record.clone();
    let state_for_edit = state.clone();
    let on_edit = move |_| {
        state_for_edit.editing.set(Some(record_for_edit.clone()));
        state_for_edit.form_open.set(true);
    };

    let weight_id = record.weight_id.clone();
    let state_for_delete = state;
    let on_delete = move |_| {
        let confirmed = web_sys::window()
            .and_then(|w| w.confirm_with_message("Delete this weight record?").ok())
            .unwrap_or(false);
        if !confirmed {
            return;
        }

        let weight_id = weight_id.clone();
        let state = state_for_delete.clone();
        spawn_local(async move {
            let session = state.session.get_untracked();
            let (Some(token), Some(subject_id)) = (session.token(), session.subject_id()) else {
                return;
            };

            match api::delete_weight(token, subject_id, &weight_id).await {
                Ok(()) => {
                    state.show_success("Record deleted");
                    state.refresh_dashboard();
                }
                Err(ApiError::Unauthorized) => state.expire_session(),
                Err(e) => state.show_error(&e.to_string()),
            }
        });
    };

    view! {
        <div class="flex items-center justify-between bg-gray-800 rounded-lg px-4 py-3 border border-gray-700">
            <div>
                <div class="text-sm text-gray-400">{measured_at}</div>
                <div class="flex items-center space-x-3 mt-1">
                    <span class="font-semibold">{weight_label}</span>
                    {note.map(|n| view! {
                        <span class="text-sm text-gray-400">{n}</span>
                    })}
                    {assessment.map(|a| view! {
                        <span class=format!("text-sm {}", a.assessment.tone_class())>
                            {format!("{} ({:.0}%)", a.assessment.label(), a.percentile)}
                        </span>
                    })}
                </div>
            </div>

            <div class="flex items-center space-x-2">
                <button
                    on:click=on_edit
                    class="px-3 py-1 bg-gray-700 hover:bg-gray-600 rounded text-sm transition-colors"
                >
                    "Edit"
                </button>
                <button
                    on:click=on_delete
                    class="px-3 py-1 bg-red-900 hover:bg-red-800 text-red-200 rounded text-sm transition-colors"
                >
                    "Delete"
                </button>
            </div>
        </div>
    }
}
