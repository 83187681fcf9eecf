use crate::app::{use_site_context, with_site, Site};
use crate::auth::login_path;
use crate::components::feedback_form::FeedbackForm;
use crate::components::handoff_panel::HandoffPanel;
use crate::deeplink::DeepLinkTargets;
use crate::feedback::{load_tester_view, TesterView};
use crate::models::tester::TesterTag;
use crate::utils::leptos_owner::spawn_owned;
use leptos::*;
use leptos_router::*;

#[component]
pub fn TesterPage() -> impl IntoView {
    let params = use_params_map();
    let code = move || params.with(|p| p.get("code").cloned().unwrap_or_default());

    move || {
        let code = code();
        with_site(move |site| view! { <TesterContent site=site code=code.clone()/> })
    }
}

#[component]
fn TesterContent(site: Site, code: String) -> impl IntoView {
    let (state, set_state) = create_signal(None::<Result<TesterView, String>>);
    let ctx = use_site_context();
    let epoch = ctx.map(|ctx| ctx.session_epoch);
    let query = use_query_map();
    // An OAuth return lands here with `?code=`; the exchange may not have stored the session yet.
    let sign_in_pending = move || {
        query.with(|q| q.get("code").is_some())
            || ctx.map(|ctx| ctx.exchange_pending.get()).unwrap_or(false)
    };

    {
        let site = site.clone();
        let code = code.clone();
        create_effect(move |_| {
            // Reload after a sign-in finishes elsewhere on the page.
            if let Some(epoch) = epoch {
                epoch.get();
            }
            set_state.set(None);
            let client = site.client.clone();
            let code = code.clone();
            spawn_owned(
                "tester page load",
                async move {
                    load_tester_view(&client, &code)
                        .await
                        .map_err(|e| e.user_message("Failed to load tester tag"))
                },
                move |result| set_state.set(Some(result)),
            );
        });
    }

    let shown = move || match state.get() {
        Some(Ok(view)) => view.settled(sign_in_pending()).map(Ok),
        other => other,
    };

    move || match shown() {
        None => view! { <div class="loading">"Loading..."</div> }.into_view(),
        Some(Err(message)) => view! {
            <div class="container"><div class="error">{message}</div></div>
        }
        .into_view(),
        Some(Ok(TesterView::NotFound)) => view! {
            <div class="container"><div class="error">"Tester tag not found"</div></div>
        }
        .into_view(),
        Some(Ok(TesterView::Welcome { tag })) => view! {
            <TesterWelcome site=site.clone() tag=tag code=code.clone()/>
        }
        .into_view(),
        Some(Ok(TesterView::Form { tag, existing, user_id, display_name })) => view! {
            <FeedbackForm
                client=site.client.clone()
                tag=tag
                existing=existing
                user_id=user_id
                display_name=display_name
            />
        }
        .into_view(),
    }
}

/// Signed-out visitors get the app first, the browser form second.
#[component]
fn TesterWelcome(site: Site, tag: TesterTag, code: String) -> impl IntoView {
    let targets = DeepLinkTargets::for_segments(&site.deep_link, &["tester", &code]);
    let continue_href = login_path(&format!("/tester/{}", code));

    view! {
        <div class="container centered">
            <div class="logo-container">
                <img src="/app-icon.png" alt="Phenohunt" class="logo-icon"/>
            </div>
            <h1>"You've been asked to test a pheno"</h1>
            <div class="card">
                <div class="strain">{tag.display_name().to_string()}</div>
                {tag.pheno_label().map(|label| view! { <div class="pheno">{label}</div> })}
            </div>
            <p class="subtitle">"Leave your feedback in the Phenohunt app, or continue here in the browser."</p>
            <HandoffPanel config=site.deep_link targets=targets/>
            <A href=continue_href class="button-secondary">"Continue in browser"</A>
        </div>
    }
}
