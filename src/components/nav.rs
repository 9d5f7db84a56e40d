//! Navigation Component
//!
//! Header bar with brand and sign-out.

use leptos::*;

use crate::state::global::GlobalState;
use crate::state::session::Session;

/// Navigation header component
#[component]
pub fn Nav() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let signed_in = {
        let state = state.clone();
        move || state.session.with(|s| s.signed_in())
    };

    let state_for_sign_out = state;
    let on_sign_out = move |_| {
        state_for_sign_out.update_session(Session::sign_out);
        state_for_sign_out.subjects.set(Vec::new());
        state_for_sign_out.records.set(Vec::new());
        state_for_sign_out.curve.set(None);
    };

    view! {
        <nav class="bg-gray-800 border-b border-gray-700">
            <div class="container mx-auto px-4">
                <div class="flex items-center justify-between h-16">
                    // Logo and brand
                    <div class="flex items-center space-x-3">
                        <span class="text-2xl">"🌱"</span>
                        <span class="text-xl font-bold text-white">"Sprout"</span>
                    </div>

                    {move || signed_in().then(|| view! {
                        <button
                            on:click=on_sign_out.clone()
                            class="px-4 py-2 rounded-lg text-gray-300 hover:text-white
                                   hover:bg-gray-700 transition-colors"
                        >
                            "Sign out"
                        </button>
                    })}
                </div>
            </div>
        </nav>
    }
}
