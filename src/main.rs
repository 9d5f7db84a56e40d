//! Sprout Dashboard
//!
//! Infant growth tracking dashboard built with Leptos (WASM).
//!
//! # Features
//!
//! - Weight records with create/edit/delete
//! - Growth chart against the WHO percentile curves
//! - Per-record growth assessments
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles
//! to WebAssembly. It is a pure presentation layer over a remote JSON
//! API; all records and reference data live server-side.

use leptos::*;

mod api;
mod app;
mod components;
mod growth;
mod pages;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    // Mount the app to the document body
    mount_to_body(|| view! { <app::App /> });
}
