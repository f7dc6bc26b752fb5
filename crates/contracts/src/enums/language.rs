crate::crm_enum! {
    /// UI and communication language
    Language default En {
        En => ("en", "English"),
        Ar => ("ar", "العربية"),
    }
}

impl Language {
    pub fn is_rtl(&self) -> bool {
        matches!(self, Language::Ar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for lang in Language::all() {
            assert_eq!(Language::from_code(lang.code()), Some(lang));
        }
        assert_eq!(serde_json::to_value(Language::Ar).unwrap(), "ar");
        assert!(Language::Ar.is_rtl());
        assert_eq!(Language::default(), Language::En);
    }
}
