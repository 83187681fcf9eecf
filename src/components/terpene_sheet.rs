use crate::models::terpene::{TerpeneProfile, TERPENE_NAMES};
use leptos::*;

/// Strength slider plus the fourteen terpene sliders sharing one 100% budget.
#[component]
pub fn TerpeneSheet(profile: RwSignal<TerpeneProfile>) -> impl IntoView {
    let (open, set_open) = create_signal(false);

    view! {
        <div class="card terpene-card">
            <button
                type="button"
                class="terpene-toggle"
                on:click=move |_| set_open.update(|o| *o = !*o)
            >
                <span>"Terpene Profile"</span>
                <span class="terpene-summary">{move || profile.with(|p| p.summary())}</span>
            </button>
            <Show when=move || open.get()>
                <div class="terpene-sheet">
                    <label class="slider-row">
                        <span>"Overall Strength"</span>
                        <input
                            type="range"
                            min="0"
                            max="100"
                            step="5"
                            prop:value=move || profile.with(|p| p.overall_strength.to_string())
                            on:input=move |e| {
                                let value = event_target_value(&e).parse::<i32>().unwrap_or(0);
                                profile.update(|p| p.set_strength(value));
                            }
                        />
                        <span class="slider-value">{move || format!("{}%", profile.with(|p| p.overall_strength))}</span>
                    </label>
                    <p class="hint">"Distribute up to 100% across notes"</p>
                    <p class="remaining">{move || format!("Remaining: {}%", profile.with(|p| p.remaining()))}</p>
                    {TERPENE_NAMES.iter().map(|name| {
                        let name = *name;
                        view! {
                            <label class="slider-row">
                                <span>{name}</span>
                                <input
                                    type="range"
                                    min="0"
                                    max="100"
                                    step="5"
                                    prop:value=move || profile.with(|p| p.get(name).to_string())
                                    on:input=move |e| {
                                        let value = event_target_value(&e).parse::<i32>().unwrap_or(0);
                                        // The stored value may be lower than the slider position.
                                        profile.update(|p| { p.set(name, value); });
                                    }
                                />
                                <span class="slider-value">{move || format!("{}%", profile.with(|p| p.get(name)))}</span>
                            </label>
                        }
                    }).collect::<Vec<_>>()}
                </div>
            </Show>
        </div>
    }
}
