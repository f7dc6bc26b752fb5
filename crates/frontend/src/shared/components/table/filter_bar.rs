use super::cell_format::FilterOption;
use crate::shared::icons::icon;
use crate::shared::locale::{use_locale, Locale};
use contracts::shared::table::FilterSpec;
use leptos::prelude::*;
use serde_json::Value;

/// Equality filter on one enum column, offered as a select
#[derive(Debug, Clone, PartialEq)]
pub struct QuickFilter {
    pub field: &'static str,
    pub label_en: &'static str,
    pub label_ar: &'static str,
    pub options: Vec<FilterOption>,
}

impl QuickFilter {
    pub fn new(
        field: &'static str,
        label_en: &'static str,
        label_ar: &'static str,
        options: Vec<FilterOption>,
    ) -> Self {
        Self {
            field,
            label_en,
            label_ar,
            options,
        }
    }

    /// Chip text for an active filter on this field
    pub fn chip(&self, filter: &FilterSpec, locale: Locale) -> String {
        let code = match &filter.value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        let value = self
            .options
            .iter()
            .find(|o| o.code == code)
            .map(|o| locale.pick(&o.en, &o.ar).to_string())
            .unwrap_or(code);
        format!("{}: {}", locale.pick(self.label_en, self.label_ar), value)
    }
}

#[component]
pub fn FilterBar(
    filters: Vec<QuickFilter>,

    #[prop(into)]
    active: Signal<Vec<FilterSpec>>,

    /// (field, code); `None` removes the field's filter
    on_change: Callback<(String, Option<String>)>,

    on_clear: Callback<()>,
) -> impl IntoView {
    let locale = use_locale();
    let filters = StoredValue::new(filters);

    let selected_code = move |field: &str| {
        active.with(|list| {
            list.iter()
                .find(|f| f.field == field)
                .and_then(|f| f.value.as_str().map(str::to_string))
                .unwrap_or_default()
        })
    };

    view! {
        <div class="filter-bar">
            {filters.get_value().into_iter().map(|filter| {
                let field = filter.field;
                view! {
                    <label class="filter-bar__field">
                        <span>{move || locale.get().pick(filter.label_en, filter.label_ar)}</span>
                        <select
                            prop:value=move || selected_code(field)
                            on:change=move |ev| {
                                let code = event_target_value(&ev);
                                let code = (!code.is_empty()).then_some(code);
                                on_change.run((field.to_string(), code));
                            }
                        >
                            <option value="">{move || locale.get().pick("All", "الكل")}</option>
                            {filter.options.iter().map(|option| {
                                let code = option.code.clone();
                                let en = option.en.clone();
                                let ar = option.ar.clone();
                                let code_for_selected = code.clone();
                                view! {
                                    <option
                                        value=code
                                        selected=move || selected_code(field) == code_for_selected
                                    >
                                        {move || locale.get().pick(&en, &ar).to_string()}
                                    </option>
                                }
                            }).collect_view()}
                        </select>
                    </label>
                }
            }).collect_view()}
            {move || {
                let list = active.get();
                (!list.is_empty()).then(|| {
                    let chips = list.into_iter().map(|spec| {
                        let text = filters.with_value(|all| {
                            all.iter()
                                .find(|f| f.field == spec.field)
                                .map(|f| f.chip(&spec, locale.get()))
                                .unwrap_or_else(|| format!("{}: {}", spec.field, spec.value))
                        });
                        let field = spec.field.clone();
                        view! {
                            <span class="filter-chip">
                                {text}
                                <button
                                    class="filter-chip__remove"
                                    title=move || locale.get().pick("Remove filter", "إزالة عامل التصفية")
                                    on:click=move |_| on_change.run((field.clone(), None))
                                >
                                    {icon("x")}
                                </button>
                            </span>
                        }
                    }).collect_view();
                    view! {
                        <div class="filter-bar__chips">
                            {chips}
                            <button class="button button--link" on:click=move |_| on_clear.run(())>
                                {move || locale.get().pick("Clear filters", "مسح عوامل التصفية")}
                            </button>
                        </div>
                    }
                })
            }}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::components::table::cell_format::stage_options;
    use contracts::shared::table::FilterOperator;
    use serde_json::json;

    #[test]
    fn chip_uses_the_option_label() {
        let filter = QuickFilter::new("stage", "Stage", "المرحلة", stage_options());
        let spec = FilterSpec::new("stage", FilterOperator::Eq, json!("closed_won"));
        assert_eq!(filter.chip(&spec, Locale::En), "Stage: Closed won");
        assert_eq!(filter.chip(&spec, Locale::Ar), "المرحلة: مكسوبة");
        let unknown = FilterSpec::new("stage", FilterOperator::Eq, json!("archived"));
        assert_eq!(filter.chip(&unknown, Locale::En), "Stage: archived");
    }
}
