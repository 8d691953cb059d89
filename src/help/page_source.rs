use super::page::PageView;

/// Splits the (name, value) pairs of the help overview into pages and
/// renders each page as an embed.
#[derive(Debug, Clone)]
pub struct HelpPageSource {
    header: PageView,
    entries: Vec<(String, String)>,
    per_page: usize,
}

impl HelpPageSource {
    /// `header` supplies the title, colour and description shared by every page.
    pub fn new(header: PageView, entries: Vec<(String, String)>, per_page: usize) -> Self {
        Self {
            header,
            entries,
            per_page: per_page.max(1),
        }
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    /// An empty source still has a single (empty) page.
    pub fn get_max_pages(&self) -> usize {
        self.entries.len().div_ceil(self.per_page).max(1)
    }

    pub fn is_paginating(&self) -> bool {
        self.entries.len() > self.per_page
    }

    pub fn get_page(&self, page: usize) -> &[(String, String)] {
        let start = (page * self.per_page).min(self.entries.len());
        let end = (start + self.per_page).min(self.entries.len());
        &self.entries[start..end]
    }

    pub fn format_page(&self, page: usize) -> PageView {
        let view = self
            .get_page(page)
            .iter()
            .fold(self.header.clone(), |view, (name, value)| {
                view.field(name, value, true)
            });

        view.footer(format!("Page {}/{}", page + 1, self.get_max_pages()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(count: usize) -> Vec<(String, String)> {
        (0..count)
            .map(|i| (format!("name{}", i), format!("value{}", i)))
            .collect()
    }

    fn source(count: usize, per_page: usize) -> HelpPageSource {
        let header = PageView::new("Bot Commands", 0x5865F2).description("header");
        HelpPageSource::new(header, entries(count), per_page)
    }

    #[test]
    fn pages_round_up() {
        assert_eq!(source(5, 2).get_max_pages(), 3);
        assert_eq!(source(4, 2).get_max_pages(), 2);
        assert_eq!(source(1, 2).get_max_pages(), 1);
        assert_eq!(source(0, 2).get_max_pages(), 1);
    }

    #[test]
    fn zero_per_page_is_clamped() {
        let source = source(3, 0);
        assert_eq!(source.per_page(), 1);
        assert_eq!(source.get_max_pages(), 3);
    }

    #[test]
    fn only_paginates_past_one_page() {
        assert!(!source(2, 2).is_paginating());
        assert!(source(3, 2).is_paginating());
    }

    #[test]
    fn last_page_holds_the_remainder() {
        let source = source(5, 2);
        assert_eq!(source.get_page(1), &entries(5)[2..4]);
        assert_eq!(source.get_page(2), &entries(5)[4..]);
        assert!(source.get_page(7).is_empty());
    }

    #[test]
    fn format_page_adds_inline_fields_and_footer() {
        let view = source(3, 2).format_page(1);

        assert_eq!(view.title, "Bot Commands");
        assert_eq!(view.description.as_deref(), Some("header"));
        assert_eq!(
            view.fields,
            vec![("name2".to_string(), "value2".to_string(), true)]
        );
        assert_eq!(view.footer.as_deref(), Some("Page 2/2"));
    }
}
