use crate::app::{use_site_context, with_site, Site};
use crate::supabase::AuthGateway;
use leptos::*;
use leptos_router::*;

#[component]
pub fn HomePage() -> impl IntoView {
    with_site(|site| view! { <Home site=site/> })
}

#[component]
fn Home(site: Site) -> impl IntoView {
    let (account, set_account) = create_signal(None::<String>);
    let ctx = use_site_context();

    {
        let client = site.client.clone();
        // Browser-only: the session lives in local storage.
        create_effect(move |_| {
            if let Some(ctx) = ctx {
                ctx.session_epoch.get();
            }
            set_account.set(
                client
                    .get_session()
                    .map(|s| s.user.email.clone().unwrap_or_else(|| s.user.id.clone())),
            );
        });
    }

    let client = site.client.clone();
    let sign_out = move |_: ev::MouseEvent| {
        client.sign_out();
        if let Some(ctx) = ctx {
            ctx.session_changed();
        }
    };

    view! {
        <div class="container centered">
            <div class="logo-container">
                <img src="/app-icon.png" alt="Phenohunt" class="logo-icon"/>
            </div>
            <h1>"Phenohunt"</h1>
            <p class="subtitle">"Phenotype hunting and cannabis breeding companion"</p>
            <a href=site.deep_link.app_store_url.clone() rel="external" class="button-primary">
                "Download Phenohunt for iOS"
            </a>
            <Show
                when=move || account.get().is_some()
                fallback=|| view! {
                    <p class="account">
                        <A href="/login">"Sign In"</A>
                        " · "
                        <A href="/signup">"Create Account"</A>
                    </p>
                }
            >
                <p class="account">
                    {move || format!("Signed in as {}", account.get().unwrap_or_default())}
                    <button class="link-btn" on:click=sign_out.clone()>"Sign out"</button>
                </p>
            </Show>
            <footer class="footer-links">
                <a href="/privacy" rel="external">"Privacy"</a>
                <a href="/terms" rel="external">"Terms"</a>
                <a href="/support" rel="external">"Support"</a>
            </footer>
        </div>
    }
}
