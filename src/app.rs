use leptos::prelude::*;

use crate::components::recorder::CaptureWidget;
use crate::config::CaptureConfig;

#[component]
pub fn App() -> impl IntoView {
    let config = CaptureConfig::load();

    view! {
        <main class="shell">
            <header class="hero">
                <p class="eyebrow">"Local-only capture"</p>
            </header>
            <CaptureWidget config />
        </main>
    }
}
