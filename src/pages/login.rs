use crate::app::{use_site_context, with_site};
use crate::auth::{redirect_target, sign_in, signup_path};
use crate::components::oauth_buttons::OAuthButtons;
use crate::deeplink::browser::open_url;
use crate::supabase::{OAuthProvider, SupabaseClient};
use crate::utils::leptos_owner::spawn_owned;
use leptos::ev::SubmitEvent;
use leptos::*;
use leptos_router::*;

#[component]
pub fn LoginPage() -> impl IntoView {
    let query = use_query_map();

    move || {
        let (target, callback_error) = query.with(|q| {
            (
                redirect_target(q.get("redirect").map(String::as_str)),
                q.get("error").cloned(),
            )
        });
        with_site(move |site| {
            view! {
                <LoginForm
                    client=site.client
                    target=target.clone()
                    callback_error=callback_error.clone()
                />
            }
        })
    }
}

#[component]
fn LoginForm(client: SupabaseClient, target: String, callback_error: Option<String>) -> impl IntoView {
    let (email, set_email) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (error, set_error) =
        create_signal(callback_error.map(|e| format!("Sign in failed: {}", e)));
    let (loading, set_loading) = create_signal(false);
    let pending = create_rw_signal(None::<OAuthProvider>);
    let ctx = use_site_context();

    let handle_submit = {
        let client = client.clone();
        let target = target.clone();
        move |ev: SubmitEvent| {
            ev.prevent_default();
            set_error.set(None);
            set_loading.set(true);
            let client = client.clone();
            let target = target.clone();
            let email = email.get_untracked();
            let password = password.get_untracked();
            spawn_owned(
                "password sign-in",
                async move { sign_in(&client, &email, &password).await },
                move |result| {
                    set_loading.set(false);
                    match result {
                        Ok(_) => {
                            if let Some(ctx) = ctx {
                                ctx.session_changed();
                            }
                            open_url(&target);
                        }
                        Err(message) => set_error.set(Some(message)),
                    }
                },
            );
        }
    };

    let signup_href = signup_path(&target);

    view! {
        <div class="container auth">
            <h1>"Sign In"</h1>
            <OAuthButtons
                client=client
                target=target
                action="sign in"
                pending=pending
                set_error=set_error
                disabled=Signal::derive(move || loading.get())
            />
            <div class="divider"><span>"or"</span></div>
            <form on:submit=handle_submit>
                <input
                    type="email"
                    class="input"
                    placeholder="Email"
                    required
                    on:input=move |e| set_email.set(event_target_value(&e))
                />
                <input
                    type="password"
                    class="input"
                    placeholder="Password"
                    required
                    on:input=move |e| set_password.set(event_target_value(&e))
                />
                {move || error.get().map(|message| view! { <p class="error">{message}</p> })}
                <button
                    type="submit"
                    class="primary-btn"
                    disabled=move || loading.get() || pending.get().is_some()
                >
                    {move || if loading.get() { "Signing in..." } else { "Sign In with Email" }}
                </button>
            </form>
            <p class="toggle-link">
                "Don't have an account? "
                <A href=signup_href>"Sign Up"</A>
            </p>
        </div>
    }
}
