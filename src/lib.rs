pub mod api;
pub mod app;
pub mod auth;
pub mod components;
pub mod config;
pub mod deeplink;
pub mod feedback;
pub mod models;
pub mod pages;
pub mod supabase;
pub mod utils;

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    use crate::app::*;

    console_error_panic_hook::set_once();
    utils::panic_hook::init();

    leptos::mount_to_body(App);
}
