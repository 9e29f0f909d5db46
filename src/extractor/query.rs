//! Declarative field queries and their compiled form.
//!
//! A query is a CSS selector plus a description of what to read from each
//! matched element. Two refinements cover the layouts CSS cannot express
//! directly: `labelled` restricts matching to rows whose label text contains
//! a marker string ("Founded:", "Citizenship"), and `nth`/`then` pick the
//! n-th match in scope before descending into it.

use scraper::{ElementRef, Node, Selector};
use thiserror::Error;

/// What to read from a matched element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// All descendant text, whitespace collapsed.
    Text,
    /// Only the element's direct text children.
    OwnText,
    /// The first `n` non-blank descendant text nodes, concatenated.
    LeadingText(usize),
    Attr(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelDef {
    pub rows: &'static str,
    pub label: &'static str,
}

/// Uncompiled query, written as a `const` in the selector tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryDef {
    pub css: &'static str,
    pub target: Target,
    pub label: Option<LabelDef>,
    pub nth: Option<usize>,
    pub then: Option<&'static str>,
}

pub const fn text(css: &'static str) -> QueryDef {
    QueryDef::new(css, Target::Text)
}

pub const fn own_text(css: &'static str) -> QueryDef {
    QueryDef::new(css, Target::OwnText)
}

pub const fn leading_text(css: &'static str, nodes: usize) -> QueryDef {
    QueryDef::new(css, Target::LeadingText(nodes))
}

pub const fn attr(css: &'static str, name: &'static str) -> QueryDef {
    QueryDef::new(css, Target::Attr(name))
}

impl QueryDef {
    const fn new(css: &'static str, target: Target) -> Self {
        Self {
            css,
            target,
            label: None,
            nth: None,
            then: None,
        }
    }

    /// Match `css` only inside `rows` elements whose label text contains `label`.
    pub const fn labelled(mut self, rows: &'static str, label: &'static str) -> Self {
        self.label = Some(LabelDef { rows, label });
        self
    }

    /// Keep only the n-th (0-based) match within the scope.
    pub const fn nth(mut self, index: usize) -> Self {
        self.nth = Some(index);
        self
    }

    /// Descend into the selected elements with a second selector.
    pub const fn then(mut self, css: &'static str) -> Self {
        self.then = Some(css);
        self
    }

    pub fn compile(&self) -> Result<Query, CatalogError> {
        let label = match self.label {
            Some(def) => Some((parse_selector(def.rows)?, def.label)),
            None => None,
        };
        let then = match self.then {
            Some(css) => Some(parse_selector(css)?),
            None => None,
        };
        Ok(Query {
            def: *self,
            selector: parse_selector(self.css)?,
            label,
            then,
        })
    }
}

fn parse_selector(css: &'static str) -> Result<Selector, CatalogError> {
    Selector::parse(css).map_err(|e| CatalogError::InvalidSelector {
        css,
        reason: format!("{:?}", e),
    })
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("invalid selector {css:?}: {reason}")]
    InvalidSelector { css: &'static str, reason: String },
}

/// A compiled `QueryDef`.
#[derive(Debug)]
pub struct Query {
    def: QueryDef,
    selector: Selector,
    label: Option<(Selector, &'static str)>,
    then: Option<Selector>,
}

impl Query {
    pub fn def(&self) -> &QueryDef {
        &self.def
    }

    /// Matched elements inside `scope`, in document order.
    pub fn elements<'a>(&self, scope: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        let matched: Vec<ElementRef<'a>> = match &self.label {
            None => scope.select(&self.selector).collect(),
            Some((rows, label)) => scope
                .select(rows)
                .filter(|row| label_text(*row, &self.selector).contains(label))
                .flat_map(|row| row.select(&self.selector))
                .collect(),
        };

        let matched = match self.def.nth {
            Some(index) => matched.into_iter().nth(index).into_iter().collect(),
            None => matched,
        };

        match &self.then {
            Some(inner) => matched
                .into_iter()
                .flat_map(|el| el.select(inner))
                .collect(),
            None => matched,
        }
    }

    /// One value per matched element. Blank values are dropped unless
    /// `keep_blank` is set, in which case positions stay aligned with the
    /// matched elements.
    pub fn values(&self, scope: ElementRef<'_>, keep_blank: bool) -> Vec<String> {
        self.elements(scope)
            .into_iter()
            .map(|el| self.read(el))
            .filter(|value| keep_blank || !value.is_empty())
            .collect()
    }

    pub fn read(&self, el: ElementRef<'_>) -> String {
        match self.def.target {
            Target::Text => collapse_whitespace(&el.text().collect::<String>()),
            Target::OwnText => {
                let own: String = el
                    .children()
                    .filter_map(|child| child.value().as_text().map(|t| &**t))
                    .collect();
                collapse_whitespace(&own)
            }
            Target::LeadingText(nodes) => el
                .text()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .take(nodes)
                .collect(),
            Target::Attr(name) => el.value().attr(name).unwrap_or_default().trim().to_string(),
        }
    }
}

/// Text of a row outside the elements that hold its value: the label part of
/// `<tr><th>Founded:</th><td>…</td></tr>` or `<li>Confederation: <span>…</span></li>`.
fn label_text(row: ElementRef<'_>, value: &Selector) -> String {
    let mut out = String::new();
    for child in row.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                if let Some(el) = ElementRef::wrap(child)
                    && !value.matches(&el)
                {
                    out.extend(el.text());
                }
            }
            _ => {}
        }
    }
    out
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
