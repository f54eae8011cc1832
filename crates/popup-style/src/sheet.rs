#![forbid(unsafe_code)]

//! Class-name style sheet.
//!
//! Elements carry a class list (for example `popup-content danger`). A
//! [`StyleSheet`] maps class names to [`Style`]s and resolves a class list by
//! layering each class's style in list order, so later classes override
//! earlier ones field by field.
//!
//! Unknown classes resolve to nothing and are logged at `trace` level.

use ahash::AHashMap;

use crate::Style;

/// Mapping from class name to style.
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    rules: AHashMap<String, Style>,
}

impl StyleSheet {
    /// An empty style sheet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the rule for `class`.
    #[must_use]
    pub fn rule(mut self, class: impl Into<String>, style: Style) -> Self {
        self.insert(class, style);
        self
    }

    /// Add or replace the rule for `class` in place.
    pub fn insert(&mut self, class: impl Into<String>, style: Style) {
        self.rules.insert(class.into(), style);
    }

    /// Style registered for a single class.
    #[must_use]
    pub fn get(&self, class: &str) -> Option<&Style> {
        self.rules.get(class)
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Resolve a class list into one style.
    pub fn resolve<'a, I>(&self, classes: I) -> Style
    where
        I: IntoIterator<Item = &'a str>,
    {
        classes.into_iter().fold(Style::new(), |acc, class| {
            match self.rules.get(class) {
                Some(style) => style.merge(&acc),
                None => {
                    tracing::trace!(class, "unknown style class");
                    acc
                }
            }
        })
    }

    /// Resolve a whitespace-separated class attribute.
    pub fn resolve_attr(&self, class_attr: &str) -> Style {
        self.resolve(class_attr.split_whitespace())
    }
}
