//! Finding field values around labels on a laid-out page.

use std::collections::HashSet;

use tracing::trace;

use super::normalize::clean;
use crate::models::config::{FieldSpec, LayoutConfig};
use crate::pdf::{BBox, PageLayout, Word};

/// Find the first run of consecutive words spelling `label`.
pub fn find_label<'w>(words: &'w [Word], label: &str) -> Option<&'w [Word]> {
    let tokens: Vec<&str> = label.split_whitespace().collect();
    if tokens.is_empty() || tokens.len() > words.len() {
        return None;
    }

    words.windows(tokens.len()).find(|window| {
        window
            .iter()
            .zip(&tokens)
            .all(|(word, token)| word.text == *token)
    })
}

/// Looks for the value belonging to a label using the page geometry.
pub struct LabelLocator<'a> {
    layout: &'a PageLayout,
    geometry: &'a LayoutConfig,
    /// Every configured label, lower-cased.
    labels: &'a HashSet<String>,
}

impl<'a> LabelLocator<'a> {
    pub fn new(layout: &'a PageLayout, geometry: &'a LayoutConfig, labels: &'a HashSet<String>) -> Self {
        Self {
            layout,
            geometry,
            labels,
        }
    }

    /// Value for a field, or an empty string when neither the label nor a value is found.
    ///
    /// Strategies in order: the table column below the label (column fields
    /// only), the text right of the label when it looks like a value, then
    /// the text below the label.
    pub fn value_for(&self, spec: &FieldSpec) -> String {
        let Some(label_words) = find_label(&self.layout.words, &spec.label) else {
            trace!("Label '{}' not found", spec.label);
            return String::new();
        };

        if spec.column {
            let value = self.column_below(label_words);
            if !value.is_empty() {
                trace!("{}: column value '{}'", spec.key, value);
                return value;
            }
        }

        let right = self.right_of(label_words);
        if !right.is_empty()
            && !self.labels.contains(&right.to_lowercase())
            && right.chars().any(|c| c.is_ascii_digit())
        {
            trace!("{}: right-of-label value '{}'", spec.key, right);
            return right;
        }

        let below = self.below(label_words);
        if !below.is_empty() {
            trace!("{}: below-label value '{}'", spec.key, below);
        }
        below
    }

    /// Words directly below the label whose centre falls within its column.
    pub fn column_below(&self, label_words: &[Word]) -> String {
        let g = self.geometry;
        let Some(span) = span(label_words) else {
            return String::new();
        };

        let mut candidates: Vec<&Word> = self
            .layout
            .words
            .iter()
            .filter(|w| {
                w.bbox.top > span.bottom + g.column_y_gap
                    && w.bbox.top < span.bottom + g.column_max_height
            })
            .filter(|w| {
                let center = w.bbox.center_x();
                center >= span.x0 - g.column_tolerance && center <= span.x1 + g.column_tolerance
            })
            .collect();

        // Currency symbol first, then the number
        candidates.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));

        clean(
            &candidates
                .iter()
                .map(|w| w.text.as_str())
                .collect::<Vec<_>>()
                .join(" "),
        )
    }

    /// Text on the label's line, right of its last word.
    pub fn right_of(&self, label_words: &[Word]) -> String {
        let Some(last) = label_words.last() else {
            return String::new();
        };

        let x0 = last.bbox.x1 + self.geometry.gap;
        let x1 = (x0 + self.geometry.right_max_width).min(self.layout.width);
        let region = BBox::new(x0, last.bbox.top, x1, last.bbox.bottom);

        clean(&self.layout.crop_text(&region))
    }

    /// Text in a band below the label's first word.
    pub fn below(&self, label_words: &[Word]) -> String {
        let Some(first) = label_words.first() else {
            return String::new();
        };

        let x0 = first.bbox.x0;
        let top = first.bbox.bottom + self.geometry.gap;
        let x1 = (x0 + self.geometry.below_max_width).min(self.layout.width);
        let bottom = (top + self.geometry.below_height).min(self.layout.height);
        let region = BBox::new(x0, top, x1, bottom);

        clean(&self.layout.crop_text(&region))
    }
}

fn span(words: &[Word]) -> Option<BBox> {
    let first = words.first()?;
    Some(words.iter().skip(1).fold(first.bbox, |acc, w| acc.union(&w.bbox)))
}
