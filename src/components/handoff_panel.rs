use crate::config::DeepLinkConfig;
use crate::deeplink::browser::{current_platform, WindowHost};
use crate::deeplink::{resolve, DeepLinkTargets, HandoffRace, Platform, Resolution};
use leptos::*;
use std::cell::RefCell;
use std::rc::Rc;

/// Tries to open `targets` in the app on mount and always leaves a way to the App Store.
#[component]
pub fn HandoffPanel(config: DeepLinkConfig, targets: DeepLinkTargets) -> impl IntoView {
    let (platform, set_platform) = create_signal(Platform::Other);
    let race: Rc<RefCell<Option<HandoffRace>>> = Rc::new(RefCell::new(None));

    {
        let race = Rc::clone(&race);
        let targets = targets.clone();
        create_effect(move |_| {
            set_platform.set(current_platform());
            if race.borrow().is_some() {
                return;
            }
            if let Resolution::Racing(attempt) = resolve(Rc::new(WindowHost), &config, &targets) {
                *race.borrow_mut() = Some(attempt);
            }
        });
    }

    // Leaving the page releases the timer and the visibility listener.
    on_cleanup(move || {
        race.borrow_mut().take();
    });

    let custom_scheme = targets.custom_scheme.clone();
    let app_store = targets.app_store.clone();

    view! {
        <div class="handoff">
            {move || if platform.get().has_native_app() {
                view! {
                    <a href=custom_scheme.clone() rel="external" class="button-primary">"Open in Phenohunt"</a>
                    <br/>
                    <a href=app_store.clone() rel="external" class="button-secondary">"Get the App"</a>
                }.into_view()
            } else {
                view! {
                    <a href=app_store.clone() rel="external" class="button-primary">"Download Phenohunt for iOS"</a>
                    <p class="open-app-text">"Phenohunt is currently available for iPhone and iPad."</p>
                }.into_view()
            }}
        </div>
    }
}
