use std::collections::HashSet;

/// State of the "select all" checkbox in the header row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderCheckState {
    Unchecked,
    Checked,
    Indeterminate,
}

/// Selected row ids. Only rows of the current page can be selected, so
/// "select all" means the loaded page and never the whole result set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSelection {
    ids: HashSet<String>,
}

impl RowSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, id: &str) {
        if !self.ids.remove(id) {
            self.ids.insert(id.to_string());
        }
    }

    pub fn set(&mut self, id: &str, selected: bool) {
        if selected {
            self.ids.insert(id.to_string());
        } else {
            self.ids.remove(id);
        }
    }

    pub fn select_all<'a>(&mut self, page_ids: impl IntoIterator<Item = &'a str>) {
        self.ids = page_ids.into_iter().map(str::to_string).collect();
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.ids.iter().cloned().collect();
        ids.sort();
        ids
    }

    pub fn header_state<'a>(&self, page_ids: impl IntoIterator<Item = &'a str>) -> HeaderCheckState {
        let mut total = 0;
        let mut selected = 0;
        for id in page_ids {
            total += 1;
            if self.ids.contains(id) {
                selected += 1;
            }
        }
        match selected {
            0 => HeaderCheckState::Unchecked,
            n if n == total => HeaderCheckState::Checked,
            _ => HeaderCheckState::Indeterminate,
        }
    }

    /// Header checkbox click: a fully checked page clears, anything else selects the page
    pub fn toggle_all<'a>(&mut self, page_ids: impl IntoIterator<Item = &'a str> + Clone) {
        if self.header_state(page_ids.clone()) == HeaderCheckState::Checked {
            self.clear();
        } else {
            self.select_all(page_ids);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_all_covers_only_the_page() {
        // 25 loaded rows out of 500 total
        let page: Vec<String> = (1..=25).map(|i| format!("c-{i}")).collect();
        let mut selection = RowSelection::new();
        selection.select_all(page.iter().map(String::as_str));
        assert_eq!(selection.len(), 25);
        assert!(!selection.contains("c-26"));
        assert_eq!(
            selection.header_state(page.iter().map(String::as_str)),
            HeaderCheckState::Checked
        );
    }

    #[test]
    fn header_state_is_tri_state() {
        let page = ["a", "b", "c"];
        let mut selection = RowSelection::new();
        assert_eq!(selection.header_state(page), HeaderCheckState::Unchecked);
        selection.toggle("b");
        assert_eq!(selection.header_state(page), HeaderCheckState::Indeterminate);
        selection.toggle_all(page);
        assert_eq!(selection.header_state(page), HeaderCheckState::Checked);
        selection.toggle_all(page);
        assert!(selection.is_empty());
    }

    #[test]
    fn empty_page_is_unchecked() {
        let selection = RowSelection::new();
        assert_eq!(selection.header_state([]), HeaderCheckState::Unchecked);
    }
}
