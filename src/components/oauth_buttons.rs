use crate::auth::{oauth_failure_message, start_oauth};
use crate::supabase::{OAuthProvider, SupabaseClient};
use leptos::logging::warn;
use leptos::*;

fn provider_label(provider: OAuthProvider) -> &'static str {
    match provider {
        OAuthProvider::Apple => "Apple",
        OAuthProvider::Google => "Google",
    }
}

/// Apple and Google buttons shared by the sign-in and sign-up pages.
/// `action` is the verb used in labels and errors ("sign in", "sign up").
#[component]
pub fn OAuthButtons(
    client: SupabaseClient,
    target: String,
    action: &'static str,
    pending: RwSignal<Option<OAuthProvider>>,
    set_error: WriteSignal<Option<String>>,
    #[prop(into)] disabled: Signal<bool>,
) -> impl IntoView {
    let start = move |provider: OAuthProvider| {
        set_error.set(None);
        pending.set(Some(provider));
        let location = gloo_utils::window().location();
        let result = location
            .origin()
            .map(|origin| start_oauth(&client, provider, &origin, &target))
            .and_then(|url| location.set_href(&url));
        if let Err(e) = result {
            warn!("[AUTH] Could not start {} sign-in: {:?}", provider.as_str(), e);
            set_error.set(Some(oauth_failure_message(provider, action)));
            pending.set(None);
        }
    };

    let (busy_label, idle_prefix) = if action == "sign up" {
        ("Signing up...", "Sign up with")
    } else {
        ("Signing in...", "Continue with")
    };

    let button = move |provider: OAuthProvider, start: Box<dyn Fn(OAuthProvider)>| {
        view! {
            <button
                type="button"
                class=format!("oauth-btn oauth-{}", provider.as_str())
                disabled=move || disabled.get() || pending.get().is_some()
                on:click=move |_| start(provider)
            >
                {move || if pending.get() == Some(provider) {
                    busy_label.to_string()
                } else {
                    format!("{} {}", idle_prefix, provider_label(provider))
                }}
            </button>
        }
    };

    view! {
        <div class="oauth-section">
            {button(OAuthProvider::Apple, Box::new(start.clone()))}
            {button(OAuthProvider::Google, Box::new(start))}
        </div>
    }
}
