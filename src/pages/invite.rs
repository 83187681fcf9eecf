use crate::app::with_site;
use crate::components::handoff_panel::HandoffPanel;
use crate::deeplink::DeepLinkTargets;
use leptos::*;
use leptos_router::*;

#[component]
pub fn InvitePage() -> impl IntoView {
    let params = use_params_map();
    let token = move || params.with(|p| p.get("token").cloned().unwrap_or_default());

    view! {
        <div class="container centered">
            <div class="logo-container">
                <img src="/app-icon.png" alt="Phenohunt" class="logo-icon"/>
            </div>
            <h1>"You've been invited!"</h1>
            <p class="subtitle">"Someone invited you to collaborate on a Phenohunt"</p>
            <div class="invite-box">
                <p class="invite-text">"Tap the button below to accept this invitation in the Phenohunt app."</p>
                <p class="invite-subtext">"You'll need a Phenohunt account to collaborate."</p>
            </div>
            {move || {
                let token = token();
                with_site(move |site| {
                    let targets = DeepLinkTargets::for_segments(&site.deep_link, &["invite", &token]);
                    view! { <HandoffPanel config=site.deep_link targets=targets/> }
                })
            }}
        </div>
    }
}
