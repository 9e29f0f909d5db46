pub mod assemble;
pub mod catalog;
pub mod normalize;
pub mod query;

#[cfg(test)]
mod tests;

pub use assemble::{Assembler, RowError, collect_rows, required};
pub use catalog::{Entity, Field, Layout, SelectorCatalog, SelectorSet, catalog};

use scraper::{ElementRef, Html};

/// A parsed page. `Html` is not `Send`, so a `Page` is built only after the
/// last await of a request and dropped before returning.
pub struct Page {
    document: Html,
}

impl Page {
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    /// Field access through one selector set.
    pub fn fields<'a>(&'a self, set: &'a SelectorSet) -> Fields<'a> {
        Fields {
            root: self.document.root_element(),
            set,
        }
    }
}

/// Runs the queries of one `SelectorSet` against a document or a row.
#[derive(Clone, Copy)]
pub struct Fields<'a> {
    root: ElementRef<'a>,
    set: &'a SelectorSet,
}

impl<'a> Fields<'a> {
    /// Whether the set's existence marker matches anything.
    pub fn has_marker(&self) -> bool {
        match self.set.marker() {
            Some(marker) => !self.all(marker).is_empty(),
            None => false,
        }
    }

    /// Matched elements, falling back to the secondary query when the
    /// primary matches nothing.
    pub fn elements(&self, field: Field) -> Vec<ElementRef<'a>> {
        self.elements_within(self.root, field)
    }

    pub fn elements_within(&self, scope: ElementRef<'a>, field: Field) -> Vec<ElementRef<'a>> {
        let Some(query) = self.set.get(field) else {
            return Vec::new();
        };
        let found = query.primary.elements(scope);
        match &query.fallback {
            Some(fallback) if found.is_empty() => fallback.elements(scope),
            _ => found,
        }
    }

    /// Non-blank values of `field` in document order.
    pub fn all(&self, field: Field) -> Vec<String> {
        self.values(self.root, field, false)
    }

    /// Values of `field` with blanks kept, one per matched element.
    pub fn all_keep_blank(&self, field: Field) -> Vec<String> {
        self.values(self.root, field, true)
    }

    pub fn first(&self, field: Field) -> Option<String> {
        self.all(field).into_iter().next()
    }

    pub fn within(&self, scope: ElementRef<'a>, field: Field) -> Vec<String> {
        self.values(scope, field, false)
    }

    pub fn first_within(&self, scope: ElementRef<'a>, field: Field) -> Option<String> {
        self.within(scope, field).into_iter().next()
    }

    fn values(&self, scope: ElementRef<'a>, field: Field, keep_blank: bool) -> Vec<String> {
        let Some(query) = self.set.get(field) else {
            return Vec::new();
        };
        let found = query.primary.values(scope, keep_blank);
        match &query.fallback {
            Some(fallback) if found.is_empty() => fallback.values(scope, keep_blank),
            _ => found,
        }
    }
}
