use crate::app::{use_site_context, with_site};
use crate::auth::{login_path, redirect_target, sign_up, SignUpForm, SignUpOutcome};
use crate::components::oauth_buttons::OAuthButtons;
use crate::deeplink::browser::open_url;
use crate::supabase::{OAuthProvider, SupabaseClient};
use crate::utils::leptos_owner::spawn_owned;
use leptos::*;
use leptos_router::*;

#[component]
pub fn SignUpPage() -> impl IntoView {
    let query = use_query_map();

    move || {
        let target = query.with(|q| redirect_target(q.get("redirect").map(String::as_str)));
        with_site(move |site| view! { <SignUpFormView client=site.client target=target.clone()/> })
    }
}

#[component]
fn SignUpFormView(client: SupabaseClient, target: String) -> impl IntoView {
    let form = create_rw_signal(SignUpForm::default());
    let (error, set_error) = create_signal(None::<String>);
    let (loading, set_loading) = create_signal(false);
    let (confirmation_sent, set_confirmation_sent) = create_signal(false);
    let pending = create_rw_signal(None::<OAuthProvider>);
    let ctx = use_site_context();

    let submit = {
        let client = client.clone();
        let target = target.clone();
        move |_: ev::MouseEvent| {
            let current = form.get_untracked();
            if !current.is_valid() {
                return;
            }
            set_error.set(None);
            set_loading.set(true);
            let client = client.clone();
            let target = target.clone();
            spawn_owned(
                "sign-up",
                async move { sign_up(&client, &current).await },
                move |result| {
                    set_loading.set(false);
                    match result {
                        Ok(SignUpOutcome::SignedIn(_)) => {
                            if let Some(ctx) = ctx {
                                ctx.session_changed();
                            }
                            open_url(&target);
                        }
                        Ok(SignUpOutcome::ConfirmationPending) => set_confirmation_sent.set(true),
                        Err(message) => set_error.set(Some(message)),
                    }
                },
            );
        }
    };

    let login_href = login_path(&target);

    view! {
        <div class="container auth">
            <div class="logo-container">
                <img src="/app-icon.png" alt="Phenohunt" class="logo"/>
            </div>
            <p class="subtitle">"Create your account"</p>
            <Show
                when=move || !confirmation_sent.get()
                fallback={
                    let login_href = login_href.clone();
                    move || view! {
                        <p class="notice">"Check your email to confirm your account, then sign in."</p>
                        <A href=login_href.clone()>"Sign In"</A>
                    }
                }
            >
                <div class="field-group">
                    <label class="field-label">"Email"</label>
                    <input
                        type="email"
                        class="input"
                        placeholder="Enter your email"
                        autocapitalize="none"
                        autocorrect="off"
                        on:input=move |e| form.update(|f| f.email = event_target_value(&e))
                    />
                </div>
                <div class="field-group">
                    <label class="field-label">"Password"</label>
                    <input
                        type="password"
                        class="input"
                        placeholder="Enter your password"
                        on:input=move |e| form.update(|f| f.password = event_target_value(&e))
                    />
                </div>
                <div class="field-group">
                    <label class="field-label">"Confirm Password"</label>
                    <input
                        type="password"
                        class="input"
                        placeholder="Confirm your password"
                        on:input=move |e| form.update(|f| f.confirm_password = event_target_value(&e))
                    />
                </div>
                {move || error.get().map(|message| view! { <p class="error">{message}</p> })}
                <button
                    class="primary-btn"
                    disabled=move || loading.get() || pending.get().is_some() || !form.with(|f| f.is_valid())
                    on:click=submit.clone()
                >
                    {move || if loading.get() { "Creating account..." } else { "Create Account" }}
                </button>
                <OAuthButtons
                    client=client.clone()
                    target=target.clone()
                    action="sign up"
                    pending=pending
                    set_error=set_error
                    disabled=Signal::derive(move || loading.get())
                />
                <div class="toggle-link">
                    <A href=login_href.clone()>"Already have an account? Sign In"</A>
                </div>
            </Show>
        </div>
    }
}
