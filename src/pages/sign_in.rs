//! Sign-in Page
//!
//! Credential form; a successful login starts the session and returns
//! to the dashboard.

use leptos::*;
use leptos_router::use_navigate;

use crate::api::{self, ApiError};
use crate::state::global::GlobalState;

/// Sign-in page component
#[component]
pub fn SignIn() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let (email, set_email) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (submitting, set_submitting) = create_signal(false);
    let (form_error, set_form_error) = create_signal(None::<String>);

    let navigate = use_navigate();
    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let email = email.get();
        let password = password.get();
        if email.trim().is_empty() || password.is_empty() {
            set_form_error.set(Some("Enter your email and password".to_string()));
            return;
        }

        set_form_error.set(None);
        set_submitting.set(true);

        let state = state.clone();
        let navigate = navigate.clone();
        spawn_local(async move {
            match api::login(email.trim(), &password).await {
                Ok(token) => {
                    state.update_session(|s| s.sign_in(token));
                    navigate("/", Default::default());
                }
                Err(ApiError::Unauthorized) => {
                    set_form_error.set(Some("Invalid email or password".to_string()));
                }
                Err(e) => set_form_error.set(Some(e.to_string())),
            }
            set_submitting.set(false);
        });
    };

    view! {
        <div class="flex justify-center pt-16">
            <div class="bg-gray-800 rounded-xl p-8 w-full max-w-sm border border-gray-700">
                <h1 class="text-2xl font-bold mb-1">"Sign in"</h1>
                <p class="text-gray-400 text-sm mb-6">"Track your little one's growth"</p>

                <form on:submit=on_submit class="space-y-4">
                    <div>
                        <label class="block text-sm text-gray-400 mb-2">"Email"</label>
                        <input
                            type="email"
                            prop:value=move || email.get()
                            on:input=move |ev| set_email.set(event_target_value(&ev))
                            class="w-full bg-gray-700 rounded-lg px-4 py-3 text-white
                                   border border-gray-600 focus:border-green-500 focus:outline-none"
                        />
                    </div>

                    <div>
                        <label class="block text-sm text-gray-400 mb-2">"Password"</label>
                        <input
                            type="password"
                            prop:value=move || password.get()
                            on:input=move |ev| set_password.set(event_target_value(&ev))
                            class="w-full bg-gray-700 rounded-lg px-4 py-3 text-white
                                   border border-gray-600 focus:border-green-500 focus:outline-none"
                        />
                    </div>

                    {move || form_error.get().map(|e| view! {
                        <p class="text-red-400 text-sm">{e}</p>
                    })}

                    <button
                        type="submit"
                        disabled=move || submitting.get()
                        class="w-full bg-green-700 hover:bg-green-600 disabled:bg-gray-600
                               disabled:cursor-not-allowed rounded-lg py-3 font-semibold
                               transition-colors flex items-center justify-center space-x-2"
                    >
                        {move || if submitting.get() {
                            view! {
                                <div class="loading-spinner w-5 h-5" />
                                <span>"Signing in..."</span>
                            }.into_view()
                        } else {
                            view! {
                                <span>"Sign in"</span>
                            }.into_view()
                        }}
                    </button>
                </form>
            </div>
        </div>
    }
}
