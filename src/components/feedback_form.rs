use crate::components::color_picker::ColorPicker;
use crate::components::star_rating::StarRating;
use crate::components::terpene_sheet::TerpeneSheet;
use crate::feedback::{save_feedback, submit_label};
use crate::models::tester::{FeedbackDraft, RatingCategory, TesterFeedback, TesterTag};
use crate::supabase::SupabaseClient;
use crate::utils::leptos_owner::spawn_owned;
use leptos::ev::SubmitEvent;
use leptos::*;

#[component]
pub fn FeedbackForm(
    client: SupabaseClient,
    tag: TesterTag,
    existing: Option<TesterFeedback>,
    user_id: String,
    display_name: String,
) -> impl IntoView {
    let initial = FeedbackDraft::from_existing(existing.as_ref());
    let ratings = create_rw_signal(initial.clone());
    let terpenes = create_rw_signal(initial.terpenes.clone());
    let color = create_rw_signal(initial.color);
    let (notes, set_notes) = create_signal(initial.review_notes.clone());
    let (saving, set_saving) = create_signal(false);
    let (saved, set_saved) = create_signal(false);
    let (error, set_error) = create_signal(None::<String>);

    let has_existing = existing.is_some();
    let strain = tag.display_name().to_string();
    let pheno = tag.pheno_label();

    let handle_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if saving.get_untracked() {
            return;
        }
        let mut draft = ratings.get_untracked();
        draft.terpenes = terpenes.get_untracked();
        draft.color = color.get_untracked();
        draft.review_notes = notes.get_untracked();

        set_saving.set(true);
        set_error.set(None);
        let client = client.clone();
        let tag = tag.clone();
        let user_id = user_id.clone();
        let existing = existing.clone();
        let display_name = display_name.clone();
        spawn_owned(
            "save feedback",
            async move {
                save_feedback(&client, &tag, &user_id, existing.as_ref(), &draft, &display_name).await
            },
            move |result| {
                set_saving.set(false);
                match result {
                    Ok(()) => set_saved.set(true),
                    Err(message) => set_error.set(Some(message)),
                }
            },
        );
    };

    view! {
        <Show
            when=move || !saved.get()
            fallback=|| view! {
                <div class="success">
                    <div class="success-icon">"✓"</div>
                    <h1>"Thank You!"</h1>
                    <p class="muted">"Your feedback has been saved."</p>
                </div>
            }
        >
            <div class="container">
                <h1>"Tester Feedback"</h1>
                <div class="card">
                    <div class="strain">{strain.clone()}</div>
                    {pheno.clone().map(|label| view! { <div class="pheno">{label}</div> })}
                </div>
                <form on:submit=handle_submit.clone()>
                    <TerpeneSheet profile=terpenes/>
                    <ColorPicker color=color/>

                    <div class="section-title">"Flower Ratings"</div>
                    {RatingCategory::ALL.iter().map(|category| {
                        let category = *category;
                        view! {
                            <StarRating
                                category=category
                                value=Signal::derive(move || ratings.with(|d| d.rating(category)))
                                on_change=move |stars: u8| ratings.update(|d| d.set_rating(category, stars))
                            />
                        }
                    }).collect::<Vec<_>>()}

                    <div class="section-title">"Flower Review"</div>
                    <textarea
                        placeholder="Share your thoughts..."
                        prop:value=move || notes.get()
                        on:input=move |e| set_notes.set(event_target_value(&e))
                    >
                        {notes.get_untracked()}
                    </textarea>

                    {move || error.get().map(|message| view! { <div class="error">{message}</div> })}

                    <button type="submit" disabled=move || saving.get()>
                        {move || submit_label(has_existing, saving.get())}
                    </button>
                </form>
            </div>
        </Show>
    }
}
