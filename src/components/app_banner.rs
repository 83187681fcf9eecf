use crate::config::DeepLinkConfig;
use crate::deeplink::browser::{current_platform, open_url};
use crate::utils::storage::{BrowserStorage, KeyValueStore};
use leptos::*;

pub const BANNER_DISMISSED_KEY: &str = "app-banner-dismissed";

/// Whether the banner should show for this platform and tab.
pub fn banner_visible(has_native_app: bool, store: &impl KeyValueStore) -> bool {
    has_native_app && store.get(BANNER_DISMISSED_KEY).is_none()
}

pub fn dismiss_banner(store: &impl KeyValueStore) {
    store.set(BANNER_DISMISSED_KEY, "true");
}

/// "Get the App" strip across the top of every page on iOS.
#[component]
pub fn AppBanner(config: DeepLinkConfig) -> impl IntoView {
    let (show, set_show) = create_signal(false);
    let (icon_failed, set_icon_failed) = create_signal(false);

    // Decided once after mount; the server always renders it hidden.
    create_effect(move |_| {
        set_show.set(banner_visible(
            current_platform().has_native_app(),
            &BrowserStorage::session(),
        ));
    });

    let store_url = config.app_store_url.clone();
    let open_store = move |_: ev::MouseEvent| open_url(&store_url);
    let dismiss = move |_: ev::MouseEvent| {
        dismiss_banner(&BrowserStorage::session());
        set_show.set(false);
    };

    view! {
        <Show when=move || show.get()>
            <div class="app-banner">
                <div class="app-banner-info">
                    <img
                        src="/app-icon.png"
                        alt="Phenohunt"
                        class="app-banner-icon"
                        class:hidden=move || icon_failed.get()
                        on:error=move |_| set_icon_failed.set(true)
                    />
                    <div>
                        <div class="app-banner-title">"Phenohunt"</div>
                        <div class="app-banner-subtitle">"Get the full experience"</div>
                    </div>
                </div>
                <div class="app-banner-actions">
                    <button class="app-banner-cta" on:click=open_store.clone()>"Get the App"</button>
                    <button class="app-banner-close" aria-label="Dismiss" on:click=dismiss>"×"</button>
                </div>
            </div>
        </Show>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::storage::MemoryStore;

    #[test]
    fn banner_only_on_ios_until_dismissed() {
        let store = MemoryStore::new();
        assert!(!banner_visible(false, &store));
        assert!(banner_visible(true, &store));
        dismiss_banner(&store);
        assert!(!banner_visible(true, &store));
        assert_eq!(store.get(BANNER_DISMISSED_KEY).as_deref(), Some("true"));
    }
}
