#![cfg(target_arch = "wasm32")]

use gloo_timers::future::sleep;
use leptos::*;
use phenohunt_web::components::app_banner::{AppBanner, BANNER_DISMISSED_KEY};
use phenohunt_web::config::DeepLinkConfig;
use phenohunt_web::deeplink::browser::{current_platform, WindowHost};
use phenohunt_web::deeplink::{Cancel, HandoffHost, Platform};
use phenohunt_web::utils::storage::{BrowserStorage, KeyValueStore};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn session_storage_round_trip() {
    let store = BrowserStorage::session();
    store.remove("phenohunt-test-key");
    assert_eq!(store.get("phenohunt-test-key"), None);

    store.set("phenohunt-test-key", "1");
    assert_eq!(store.get("phenohunt-test-key").as_deref(), Some("1"));
    // Local and session storage are separate areas.
    assert_eq!(BrowserStorage::local().get("phenohunt-test-key"), None);

    store.remove("phenohunt-test-key");
    assert_eq!(store.get("phenohunt-test-key"), None);
}

#[wasm_bindgen_test]
fn removing_keys_leaves_other_entries() {
    let store = BrowserStorage::local();
    store.set("phenohunt-keep", "1");
    store.remove("phenohunt-never-set");
    store.remove("phenohunt-never-set");
    assert_eq!(store.get("phenohunt-keep").as_deref(), Some("1"));

    store.remove("phenohunt-keep");
    assert_eq!(store.get("phenohunt-keep"), None);
}

#[wasm_bindgen_test]
fn headless_browser_is_not_ios() {
    assert_eq!(current_platform(), Platform::Other);
}

#[wasm_bindgen_test]
async fn timer_fires_unless_cancelled() {
    let host = WindowHost;
    let fired = Rc::new(Cell::new(0));

    let counter = Rc::clone(&fired);
    let _kept = host.start_timer(Duration::from_millis(10), Box::new(move || counter.set(counter.get() + 1)));

    let counter = Rc::clone(&fired);
    let cancelled = host.start_timer(Duration::from_millis(10), Box::new(move || counter.set(counter.get() + 10)));
    if let Some(timer) = cancelled {
        timer.cancel();
    }

    sleep(Duration::from_millis(50)).await;
    assert_eq!(fired.get(), 1);
    assert!(!host.page_hidden());
}

#[wasm_bindgen_test]
async fn banner_stays_hidden_off_ios() {
    BrowserStorage::session().remove(BANNER_DISMISSED_KEY);

    let document = web_sys::window().unwrap().document().unwrap();
    let container = document.create_element("div").unwrap();
    document.body().unwrap().append_child(&container).unwrap();

    mount_to(
        container.clone().unchecked_into(),
        || view! { <AppBanner config=DeepLinkConfig::default()/> },
    );
    sleep(Duration::from_millis(20)).await;

    assert!(container.query_selector(".app-banner").unwrap().is_none());
    container.remove();
}
