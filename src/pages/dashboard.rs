//! Dashboard Page
//!
//! Subject selection, growth chart, latest assessment, and record list.

use leptos::*;

use crate::api::{self, ApiError};
use crate::components::{
    AssessmentCard, ChartSkeleton, GrowthChart, ListSkeleton, WeightForm, WeightList,
};
use crate::state::global::GlobalState;

/// Dashboard page component
#[component]
pub fn Dashboard() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    // Fetch subjects on mount, restore the remembered selection if it
    // still exists, then load that subject's data.
    let state_for_mount = state.clone();
    create_effect(move |_| {
        let state = state_for_mount.clone();
        let Some(token) = state
            .session
            .with_untracked(|s| s.token().map(str::to_string))
        else {
            return;
        };

        spawn_local(async move {
            match api::fetch_subjects(&token).await {
                Ok(subjects) => {
                    let remembered = state
                        .session
                        .with_untracked(|s| s.subject_id().map(str::to_string));
                    let selection =
                        remembered.filter(|id| subjects.iter().any(|s| &s.baby_id == id));

                    state.subjects.set(subjects);
                    state.update_session(|s| s.select_subject(selection));
                    state.refresh_dashboard();
                }
                Err(ApiError::Unauthorized) => state.expire_session(),
                Err(e) => state.show_error(&e.to_string()),
            }
        });
    });

    let state_for_selected = state.clone();
    let has_selection = create_memo(move |_| {
        state_for_selected
            .session
            .with(|s| s.subject_id().is_some())
    });

    let state_for_view = state.clone();
    let state_for_form = state.clone();
    let state_for_add = state;

    let on_add = move |_| {
        state_for_add.editing.set(None);
        state_for_add.form_open.set(true);
    };

    view! {
        <div class="space-y-8">
            // Page header with subject selection
            <div class="flex flex-wrap items-center justify-between gap-4">
                <div>
                    <h1 class="text-3xl font-bold">"Growth Dashboard"</h1>
                    <p class="text-gray-400 mt-1">"Weight against the WHO reference curves"</p>
                </div>

                <SubjectPicker />
            </div>

            {move || {
                if !has_selection.get() {
                    view! {
                        <section class="bg-gray-800 rounded-xl p-10 text-center text-gray-400">
                            "Choose a subject to see their growth curve."
                        </section>
                    }.into_view()
                } else {
                    let state = state_for_view.clone();
                    let state_for_list = state.clone();
                    view! {
                        // Growth chart
                        <section class="bg-gray-800 rounded-xl p-6">
                            <h2 class="text-xl font-semibold mb-4">"Growth curve"</h2>
                            {move || {
                                if state.loading.get() {
                                    view! { <ChartSkeleton /> }.into_view()
                                } else {
                                    view! { <GrowthChart /> }.into_view()
                                }
                            }}
                        </section>

                        // Latest assessment
                        <AssessmentCard />

                        // Record list
                        <section class="bg-gray-800 rounded-xl p-6">
                            <div class="flex items-center justify-between mb-4">
                                <h2 class="text-xl font-semibold">"Records"</h2>
                                <button
                                    on:click=on_add.clone()
                                    class="px-4 py-2 bg-green-700 hover:bg-green-600 rounded-lg
                                           font-medium transition-colors"
                                >
                                    "Add record"
                                </button>
                            </div>
                            {move || {
                                if state_for_list.loading.get() {
                                    view! { <ListSkeleton /> }.into_view()
                                } else {
                                    view! { <WeightList /> }.into_view()
                                }
                            }}
                        </section>
                    }.into_view()
                }
            }}

            // Record form modal
            {move || state_for_form.form_open.get().then(|| view! { <WeightForm /> })}
        </div>
    }
}

/// Subject dropdown plus refresh, mirroring the remembered selection
#[component]
fn SubjectPicker() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let state_for_value = state.clone();
    let selected = move || {
        state_for_value
            .session
            .with(|s| s.subject_id().unwrap_or("").to_string())
    };

    let state_for_change = state.clone();
    let on_change = move |ev: web_sys::Event| {
        let subject_id = event_target_value(&ev);
        state_for_change.update_session(|s| s.select_subject(Some(subject_id)));
        state_for_change.refresh_dashboard();
    };

    let state_for_refresh = state.clone();
    let on_refresh = move |_| state_for_refresh.refresh_dashboard();

    let subjects = state.subjects;
    view! {
        <div class="flex items-center space-x-2">
            <select
                on:change=on_change
                prop:value=selected
                class="bg-gray-700 rounded-lg px-4 py-2 text-white
                       border border-gray-600 focus:border-green-500 focus:outline-none"
            >
                <option value="">"-- choose a subject --"</option>
                {move || {
                    subjects.get()
                        .into_iter()
                        .map(|subject| {
                            let label = match subject.birth_date {
                                Some(birth) => format!("{} ({})", subject.name, birth),
                                None => subject.name.clone(),
                            };
                            view! {
                                <option value=subject.baby_id.clone()>{label}</option>
                            }
                        })
                        .collect_view()
                }}
            </select>

            <button
                on:click=on_refresh
                class="px-4 py-2 bg-gray-700 hover:bg-gray-600 rounded-lg transition-colors"
            >
                "Refresh"
            </button>
        </div>
    }
}
