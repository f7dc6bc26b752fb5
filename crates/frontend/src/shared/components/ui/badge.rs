use leptos::prelude::*;

const VARIANTS: [&str; 5] = ["primary", "success", "warning", "error", "neutral"];

/// Pill used for enum cells (deal stage, ticket status, priority)
#[component]
pub fn Badge(
    /// One of `primary`, `success`, `warning`, `error`; anything else is neutral
    #[prop(into)]
    variant: String,
    children: Children,
) -> impl IntoView {
    view! { <span class=badge_class(&variant)>{children()}</span> }
}

fn badge_class(variant: &str) -> String {
    let variant = VARIANTS
        .iter()
        .find(|v| **v == variant)
        .copied()
        .unwrap_or("neutral");
    format!("badge badge--{}", variant)
}
