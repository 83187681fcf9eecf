use crate::models::tester::{RatingCategory, MAX_STARS};
use leptos::*;

pub fn category_icon(category: RatingCategory) -> &'static str {
    match category {
        RatingCategory::Color => "🎨",
        RatingCategory::Nose => "👃",
        RatingCategory::BagAppeal => "👁",
        RatingCategory::Smoothness => "💨",
        RatingCategory::Potency => "⚡",
        RatingCategory::Flavor => "🍰",
        RatingCategory::Effects => "🧠",
        RatingCategory::Overall => "⭐",
    }
}

#[component]
pub fn StarRating(
    category: RatingCategory,
    #[prop(into)] value: Signal<u8>,
    #[prop(into)] on_change: Callback<u8>,
) -> impl IntoView {
    view! {
        <div class="rating-row">
            <div class="rating-label">
                <span>{category_icon(category)}</span>
                <span>{category.label()}</span>
            </div>
            <div class="stars">
                {(1..=MAX_STARS).map(|star| view! {
                    <span class="star" on:click=move |_| on_change.call(star)>
                        {move || if star <= value.get() { "★" } else { "☆" }}
                    </span>
                }).collect::<Vec<_>>()}
                <Show when=move || { value.get() > 0 }>
                    <span class="star-count">{move || format!("{}/{}", value.get(), MAX_STARS)}</span>
                </Show>
            </div>
        </div>
    }
}
