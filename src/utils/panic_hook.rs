use std::panic;
use leptos::logging::log;

/// Sets up a custom panic hook that adds context to Leptos owner disposal panics
pub fn set_custom_panic_hook() {
    let previous_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        // Call the previous hook first
        previous_hook(panic_info);

        let message = if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else {
            "Unknown panic".to_string()
        };

        if message.contains("OwnerDisposed") {
            log!("[PANIC] Leptos owner disposal detected. Likely causes on this site:");
            log!("[PANIC] 1. A backend response arrived after the page navigated away");
            log!("[PANIC] 2. The app-handoff fallback timer fired after the page was torn down");
            if let Some(location) = panic_info.location() {
                log!("[PANIC] at {}:{}", location.file(), location.line());
            }
        }
    }));
}

/// Call once at startup, after `console_error_panic_hook::set_once`
pub fn init() {
    log!("[PANIC_HOOK] Setting up custom panic hook");
    set_custom_panic_hook();
}
