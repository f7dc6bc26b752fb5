use crate::domain::a003_account::ui::list::CompaniesTable;
use crate::domain::a004_contact::ui::list::ContactsTable;
use crate::domain::a006_opportunity::ui::list::DealsTable;
use crate::domain::a007_ticket::ui::list::TicketsTable;
use crate::shared::icons::icon;
use crate::shared::locale::{provide_locale, Locale};
use crate::shared::table_api::seed_demo_data;
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Contacts,
    Companies,
    Deals,
    Tickets,
}

impl Section {
    const ALL: [Section; 4] = [
        Section::Contacts,
        Section::Companies,
        Section::Deals,
        Section::Tickets,
    ];

    fn title(&self, locale: Locale) -> &'static str {
        match self {
            Section::Contacts => locale.pick("Contacts", "جهات الاتصال"),
            Section::Companies => locale.pick("Companies", "الشركات"),
            Section::Deals => locale.pick("Deals", "الصفقات"),
            Section::Tickets => locale.pick("Tickets", "التذاكر"),
        }
    }

    fn icon_name(&self) -> &'static str {
        match self {
            Section::Contacts => "contacts",
            Section::Companies => "companies",
            Section::Deals => "deals",
            Section::Tickets => "tickets",
        }
    }
}

#[component]
pub fn App() -> impl IntoView {
    let locale = provide_locale();
    let section = RwSignal::new(Section::Contacts);
    // bumped after seeding so the open table mounts again and refetches
    let generation = RwSignal::new(0u32);
    let notice = RwSignal::new(None::<String>);

    let seed = move |_| {
        spawn_local(async move {
            match seed_demo_data().await {
                Ok(summary) => {
                    log::info!("Seeded {:?}", summary);
                    notice.set(Some(format!(
                        "+{} / +{} / +{} / +{}",
                        summary.contacts, summary.accounts, summary.deals, summary.tickets
                    )));
                    generation.update(|g| *g += 1);
                }
                Err(e) => notice.set(Some(e)),
            }
        });
    };

    view! {
        <div class="app">
            <header class="app__header">
                <h1 class="app__title">{move || locale.get().pick("CRM Admin", "إدارة علاقات العملاء")}</h1>
                <div class="app__header-actions">
                    {move || notice.get().map(|n| view! { <span class="app__notice">{n}</span> })}
                    <button class="button button--secondary" on:click=seed>
                        {move || locale.get().pick("Load demo data", "تحميل بيانات تجريبية")}
                    </button>
                    <button
                        class="button button--secondary"
                        on:click=move |_| locale.update(|l| *l = l.toggled())
                    >
                        {icon("globe")}
                        {move || locale.get().pick("العربية", "English")}
                    </button>
                </div>
            </header>
            <div class="app__body">
                <nav class="app__nav">
                    {Section::ALL.into_iter().map(|item| view! {
                        <button
                            class="app__nav-item"
                            class:app__nav-item--active=move || section.get() == item
                            on:click=move |_| section.set(item)
                        >
                            {icon(item.icon_name())}
                            <span>{move || item.title(locale.get())}</span>
                        </button>
                    }).collect_view()}
                </nav>
                <main class="app__content">
                    {move || {
                        generation.track();
                        match section.get() {
                            Section::Contacts => view! { <ContactsTable /> }.into_any(),
                            Section::Companies => view! { <CompaniesTable /> }.into_any(),
                            Section::Deals => view! { <DealsTable /> }.into_any(),
                            Section::Tickets => view! { <TicketsTable /> }.into_any(),
                        }
                    }}
                </main>
            </div>
        </div>
    }
}
