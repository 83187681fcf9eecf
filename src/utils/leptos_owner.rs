use std::future::Future;

/// Runs `fut` on the local executor and applies its output under the owner that was
/// current when this was called. If that owner has been disposed by then (the page was
/// left while the request was in flight) the output is dropped and logged.
pub fn spawn_owned<Fut, T, F>(log_context: &'static str, fut: Fut, apply: F)
where
    Fut: Future<Output = T> + 'static,
    T: 'static,
    F: FnOnce(T) + 'static,
{
    let owner = leptos::Owner::current();
    leptos::spawn_local(async move {
        let value = fut.await;
        match owner {
            Some(owner) => {
                if leptos::try_with_owner(owner, move || apply(value)).is_err() {
                    leptos::logging::log!("[OWNER] Dropping late result, owner disposed: {}", log_context);
                }
            }
            None => leptos::logging::log!("[OWNER] No Leptos owner in context: {}", log_context),
        }
    });
}
