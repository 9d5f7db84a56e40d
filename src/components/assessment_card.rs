//! Assessment Card
//!
//! Shows the growth assessment embedded in the most recent record.

use leptos::*;

use crate::state::global::GlobalState;

/// Latest-assessment panel; hidden when the newest record carries none.
#[component]
pub fn AssessmentCard() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    view! {
        {move || {
            let assessment = state.latest_record().and_then(|r| r.assessment);
            assessment.map(|a| {
                let tone = a.assessment.tone_class();
                view! {
                    <section class="bg-gray-800 rounded-xl p-6">
                        <h2 class="text-xl font-semibold mb-4">"Latest assessment"</h2>
                        <div class="grid grid-cols-2 gap-4">
                            <div>
                                <div class="text-sm text-gray-400">"Percentile"</div>
                                <div class=format!("text-2xl font-bold {}", tone)>
                                    {format!("{:.0}%", a.percentile)}
                                </div>
                            </div>
                            <div>
                                <div class="text-sm text-gray-400">"Category"</div>
                                <div class=format!("text-2xl font-bold {}", tone)>
                                    {a.assessment.label()}
                                </div>
                            </div>
                            <div class="col-span-2">
                                <div class="text-sm text-gray-400">"Advice"</div>
                                <p class="text-gray-200 mt-1">{a.message}</p>
                            </div>
                        </div>
                    </section>
                }
            })
        }}
    }
}
