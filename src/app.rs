/// Application shell for the Phenohunt companion site.
/// Loads the public configuration once, shares the backend client through context and
/// routes between the landing, auth and tester pages.
use crate::auth::{complete_code_exchange, without_query_param};
use crate::components::app_banner::AppBanner;
use crate::config::{fetch_public_config, DeepLinkConfig, PublicConfig};
use crate::pages::{
    home::HomePage, invite::InvitePage, login::LoginPage, signup::SignUpPage, tester::TesterPage,
};
use crate::supabase::SupabaseClient;
use crate::utils::leptos_owner::spawn_owned;
use leptos::logging::error;
use leptos::*;
use leptos_meta::*;
use leptos_router::*;
use std::rc::Rc;

/// Backend client and deep-link settings, available once the configuration has loaded.
#[derive(Clone)]
pub struct Site {
    pub client: SupabaseClient,
    pub deep_link: DeepLinkConfig,
}

#[derive(Clone, Copy)]
pub struct SiteContext {
    config: Resource<(), Result<PublicConfig, ServerFnError>>,
    site: StoredValue<Option<Site>>,
    /// Bumped whenever the stored session changes so pages reload.
    pub session_epoch: RwSignal<u32>,
    /// Set while an OAuth `code` from the URL is being exchanged for a session.
    pub exchange_pending: RwSignal<bool>,
}

impl SiteContext {
    // One client per tab: the code ledger must outlive page changes.
    fn site_for(&self, config: PublicConfig) -> Site {
        if let Some(site) = self.site.get_value() {
            return site;
        }
        let site = Site {
            client: SupabaseClient::new(config.backend),
            deep_link: config.deep_link,
        };
        self.site.set_value(Some(site.clone()));
        site
    }

    /// The site if the configuration is already available, without tracking.
    pub fn site_untracked(&self) -> Option<Site> {
        match untrack(|| self.config.get()) {
            Some(Ok(config)) => Some(self.site_for(config)),
            _ => None,
        }
    }

    pub fn session_changed(&self) {
        self.session_epoch.update(|n| *n += 1);
    }
}

pub fn use_site_context() -> Option<SiteContext> {
    use_context::<SiteContext>()
}

/// Renders `render` once the configuration has loaded, a loading view until then.
pub fn with_site<F, V>(render: F) -> impl IntoView
where
    F: Fn(Site) -> V + 'static,
    V: IntoView,
{
    let ctx = use_site_context();
    let render = Rc::new(render);
    let content = move || match ctx {
        None => view! { <div class="error">"Site configuration unavailable"</div> }.into_view(),
        Some(ctx) => match ctx.config.get() {
            None => ().into_view(),
            Some(Ok(config)) => render(ctx.site_for(config)).into_view(),
            Some(Err(e)) => {
                error!("[CONFIG] Failed to load public configuration: {}", e);
                view! { <div class="error">"Site configuration unavailable"</div> }.into_view()
            }
        },
    };

    view! {
        <Suspense fallback=|| view! { <div class="loading">"Loading..."</div> }>
            {content.clone()}
        </Suspense>
    }
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let ctx = SiteContext {
        config: create_resource(|| (), |_| async move { fetch_public_config().await }),
        site: store_value(None),
        session_epoch: create_rw_signal(0),
        exchange_pending: create_rw_signal(false),
    };
    provide_context(ctx);

    view! {
        <Stylesheet id="leptos" href="/pkg/phenohunt-web.css"/>
        <Title text="Phenohunt"/>
        <Meta name="description" content="Phenotype hunting and cannabis breeding companion"/>
        <Link rel="icon" href="/app-icon.png"/>
        <Router>
            {with_site(|site| view! { <AppBanner config=site.deep_link/> })}
            <CodeExchange/>
            <main>
                <Routes>
                    <Route path="/" view=HomePage/>
                    <Route path="/login" view=LoginPage/>
                    <Route path="/signup" view=SignUpPage/>
                    <Route path="/invite/:token" view=InvitePage/>
                    <Route path="/tester/:code" view=TesterPage/>
                </Routes>
            </main>
        </Router>
    }
}

/// Finishes an OAuth return on whichever page the callback sent the browser to.
#[component]
fn CodeExchange() -> impl IntoView {
    let query = use_query_map();
    let navigate = use_navigate();
    let ctx = use_site_context();

    create_effect(move |_| {
        let Some(code) = query.with(|q| q.get("code").cloned()) else {
            return;
        };
        let Some(ctx) = ctx else {
            return;
        };
        let Some(Ok(config)) = ctx.config.get() else {
            return;
        };
        let site = ctx.site_for(config);
        let location = gloo_utils::window().location();
        let current = format!(
            "{}{}{}",
            location.pathname().unwrap_or_default(),
            location.search().unwrap_or_default(),
            location.hash().unwrap_or_default()
        );
        let cleaned = without_query_param(&current, "code");
        let navigate = navigate.clone();

        ctx.exchange_pending.set(true);
        spawn_owned(
            "oauth code exchange",
            async move { complete_code_exchange(&site.client, &code).await },
            move |_| {
                ctx.session_changed();
                ctx.exchange_pending.set(false);
                navigate(&cleaned, NavigateOptions { replace: true, ..Default::default() });
            },
        );
    });
}
