//! Interface language (English / Arabic) and text direction

use leptos::prelude::*;

const STORAGE_KEY: &str = "crm.locale";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    En,
    Ar,
}

impl Locale {
    pub fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ar => "ar",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "en" => Some(Locale::En),
            "ar" => Some(Locale::Ar),
            _ => None,
        }
    }

    /// Value of the `dir` attribute
    pub fn dir(&self) -> &'static str {
        match self {
            Locale::En => "ltr",
            Locale::Ar => "rtl",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Locale::En => Locale::Ar,
            Locale::Ar => Locale::En,
        }
    }

    /// Pick the text for this locale
    pub fn pick<'a>(&self, en: &'a str, ar: &'a str) -> &'a str {
        match self {
            Locale::En => en,
            Locale::Ar => ar,
        }
    }
}

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

fn stored_locale() -> Locale {
    local_storage()
        .and_then(|s| s.get_item(STORAGE_KEY).ok().flatten())
        .and_then(|code| Locale::from_code(&code))
        .unwrap_or_default()
}

/// Create the app-wide locale signal; changes are written to localStorage
/// and mirrored on `<html lang dir>`
pub fn provide_locale() -> RwSignal<Locale> {
    let locale = RwSignal::new(stored_locale());
    provide_context(locale);

    Effect::new(move |_| {
        let current = locale.get();
        if let Some(storage) = local_storage() {
            let _ = storage.set_item(STORAGE_KEY, current.code());
        }
        let root = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.document_element());
        if let Some(root) = root {
            let _ = root.set_attribute("lang", current.code());
            let _ = root.set_attribute("dir", current.dir());
        }
    });
    locale
}

pub fn use_locale() -> Signal<Locale> {
    let locale = use_context::<RwSignal<Locale>>().unwrap_or_else(|| RwSignal::new(Locale::En));
    locale.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_and_direction() {
        assert_eq!(Locale::from_code("ar"), Some(Locale::Ar));
        assert_eq!(Locale::from_code("fr"), None);
        assert_eq!(Locale::Ar.dir(), "rtl");
        assert_eq!(Locale::En.toggled(), Locale::Ar);
        assert_eq!(Locale::Ar.pick("Deals", "الصفقات"), "الصفقات");
    }
}
