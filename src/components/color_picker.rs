use crate::models::tester::ColorTrait;
use leptos::*;
use wasm_bindgen::JsCast;

#[component]
pub fn ColorPicker(color: RwSignal<Option<ColorTrait>>) -> impl IntoView {
    let pick_on_bar = move |ev: ev::MouseEvent| {
        let width = ev
            .current_target()
            .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
            .map(|el| el.client_width())
            .unwrap_or(0);
        if width > 0 {
            let fraction = ev.offset_x() as f64 / width as f64;
            color.set(Some(ColorTrait::at_fraction(fraction)));
        }
    };

    view! {
        <div class="card color-card">
            <div class="color-header">
                <span>"Color"</span>
                <span class="color-label">
                    {move || color.get().map(|c| c.label()).unwrap_or("Not Set")}
                </span>
            </div>
            <div
                class="color-spectrum"
                style:background=ColorTrait::spectrum_css()
                on:click=pick_on_bar
            >
                <Show when=move || color.get().is_some()>
                    <div
                        class="color-marker"
                        style:left=move || {
                            let index = color.get().map(|c| c.position()).unwrap_or(0);
                            format!("{}%", index * 100 / (ColorTrait::ALL.len() - 1))
                        }
                    ></div>
                </Show>
            </div>
            <div class="color-swatches">
                {ColorTrait::ALL.iter().map(|c| {
                    let c = *c;
                    view! {
                        <button
                            type="button"
                            class="color-swatch"
                            class:selected=move || color.get() == Some(c)
                            style:background-color=c.hex()
                            on:click=move |_| color.set(Some(c))
                        >
                            {c.short_label()}
                        </button>
                    }
                }).collect::<Vec<_>>()}
            </div>
        </div>
    }
}
