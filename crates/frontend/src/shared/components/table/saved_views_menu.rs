//! Saved views of one table: load, save under a name, delete

use crate::shared::icons::icon;
use crate::shared::locale::use_locale;
use crate::shared::table_api::{delete_view, fetch_views, save_view};
use contracts::shared::table::{SaveViewRequest, SavedView};
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

#[component]
pub fn SavedViewsMenu(
    endpoint: String,

    /// Current table settings under the given name
    snapshot: Callback<String, SaveViewRequest>,

    on_load: Callback<SavedView>,
) -> impl IntoView {
    let locale = use_locale();
    let views = RwSignal::new(Vec::<SavedView>::new());
    let error = RwSignal::new(None::<String>);
    let name = RwSignal::new(String::new());
    let busy = RwSignal::new(false);
    let endpoint = StoredValue::new(endpoint);

    let refresh = move || {
        let endpoint = endpoint.get_value();
        spawn_local(async move {
            match fetch_views(&endpoint).await {
                Ok(list) => {
                    views.set(list);
                    error.set(None);
                }
                Err(e) => {
                    log::warn!("{}", e);
                    error.set(Some(e));
                }
            }
        });
    };

    let save = move || {
        let request = snapshot.run(name.get_untracked());
        if let Err(e) = request.validate() {
            error.set(Some(e.to_string()));
            return;
        }
        busy.set(true);
        spawn_local(async move {
            match save_view(&request).await {
                Ok(saved) => {
                    log::info!("Saved view '{}'", saved.name);
                    name.set(String::new());
                    error.set(None);
                    refresh();
                }
                Err(e) => error.set(Some(e)),
            }
            busy.set(false);
        });
    };

    let remove = move |id: String| {
        spawn_local(async move {
            match delete_view(&id).await {
                Ok(()) => refresh(),
                Err(e) => error.set(Some(e)),
            }
        });
    };

    refresh();

    view! {
        <details class="dropdown saved-views">
            <summary class="button button--secondary">
                {icon("bookmark")}
                {move || locale.get().pick("Views", "طرق العرض")}
            </summary>
            <div class="dropdown__menu">
                <Show
                    when=move || !views.get().is_empty()
                    fallback=move || view! {
                        <div class="dropdown__empty">
                            {move || locale.get().pick("No saved views", "لا توجد طرق عرض محفوظة")}
                        </div>
                    }
                >
                    <For
                        each=move || views.get()
                        key=|saved| saved.id.clone()
                        children=move |saved| {
                            let id = saved.id.clone();
                            let label = saved.name.clone();
                            view! {
                                <div class="dropdown__item saved-views__item">
                                    <button
                                        class="saved-views__load"
                                        on:click=move |_| on_load.run(saved.clone())
                                    >
                                        {label}
                                    </button>
                                    <button
                                        class="saved-views__delete"
                                        title=move || locale.get().pick("Delete view", "حذف طريقة العرض")
                                        on:click=move |_| remove(id.clone())
                                    >
                                        {icon("delete")}
                                    </button>
                                </div>
                            }
                        }
                    />
                </Show>
                <div class="saved-views__form">
                    <input
                        type="text"
                        maxlength="100"
                        placeholder=move || locale.get().pick("View name", "اسم طريقة العرض")
                        prop:value=move || name.get()
                        on:input=move |ev| name.set(event_target_value(&ev))
                        on:keydown=move |ev| {
                            if ev.key() == "Enter" {
                                save();
                            }
                        }
                    />
                    <button
                        class="button button--primary"
                        disabled=move || busy.get()
                        on:click=move |_| save()
                    >
                        {move || locale.get().pick("Save", "حفظ")}
                    </button>
                </div>
                {move || error.get().map(|e| view! {
                    <div class="inline-error" role="alert">{e}</div>
                })}
            </div>
        </details>
    }
}
