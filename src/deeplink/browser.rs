use super::{Cancel, HandoffHost};
use gloo_timers::callback::Timeout;
use leptos::logging::warn;
use leptos::leptos_dom::helpers::{window_event_listener_untyped, WindowListenerHandle};
use std::time::Duration;

/// [`HandoffHost`] over the real window. Only construct this in the browser.
#[derive(Clone, Copy, Debug, Default)]
pub struct WindowHost;

struct TimerGuard(Timeout);

impl Cancel for TimerGuard {
    fn cancel(self: Box<Self>) {
        // Dropping a gloo Timeout clears it.
        drop(self.0);
    }
}

struct ListenerGuard(WindowListenerHandle);

impl Cancel for ListenerGuard {
    fn cancel(self: Box<Self>) {
        self.0.remove();
    }
}

impl HandoffHost for WindowHost {
    fn user_agent(&self) -> String {
        gloo_utils::window().navigator().user_agent().unwrap_or_default()
    }

    fn page_hidden(&self) -> bool {
        gloo_utils::document().hidden()
    }

    fn navigate(&self, url: &str) {
        open_url(url);
    }

    fn start_timer(&self, delay: Duration, on_fire: Box<dyn FnOnce()>) -> Option<Box<dyn Cancel>> {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        Some(Box::new(TimerGuard(Timeout::new(millis, on_fire))))
    }

    fn watch_hidden(&self, on_hidden: Box<dyn Fn()>) -> Option<Box<dyn Cancel>> {
        // visibilitychange bubbles from the document up to the window.
        let handle = window_event_listener_untyped("visibilitychange", move |_| {
            if gloo_utils::document().hidden() {
                on_hidden();
            }
        });
        Some(Box::new(ListenerGuard(handle)))
    }
}

/// Full-page navigation, leaving the client-side router.
pub fn open_url(url: &str) {
    if let Err(e) = gloo_utils::window().location().set_href(url) {
        warn!("[DEEPLINK] Navigation to {} failed: {:?}", url, e);
    }
}

pub fn current_platform() -> super::Platform {
    super::Platform::detect(&WindowHost.user_agent())
}
