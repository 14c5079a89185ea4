//! Paragraph identity resolution.
//!
//! Every wrappable paragraph needs a key that is unique within the item
//! sequence, since the wrap engine caches its state by key. Caller-supplied
//! keys are kept; a later paragraph repeating an earlier key (including two
//! paragraphs with no key at all) gets a synthesized integer key instead.

use std::borrow::Cow;
use std::collections::HashSet;

use crate::item::{Item, ParagraphKey};

/// Resolve unique paragraph keys for `items`.
///
/// The first occurrence of a key keeps it. A later duplicate at position
/// `index` is rewritten to [`ParagraphKey::Int`], walking a counter down
/// from `-index` until it hits a value no paragraph in the sequence uses.
///
/// Returns the input unchanged (borrowed) when no rewrite was needed, so
/// a sequence that is already unique is never copied. Applying the
/// function to its own output yields the same keys.
pub fn resolve_keys(items: &[Item]) -> Cow<'_, [Item]> {
    let mut used: HashSet<ParagraphKey> = items
        .iter()
        .filter_map(Item::as_text)
        .map(|text| text.key.clone())
        .collect();

    let mut seen: HashSet<&ParagraphKey> = HashSet::new();
    let mut substitutions = Vec::new();
    for (index, item) in items.iter().enumerate() {
        let Some(text) = item.as_text() else {
            continue;
        };
        if seen.insert(&text.key) {
            continue;
        }
        let mut candidate = i64::try_from(index).map_or(i64::MIN, |index| -index);
        while used.contains(&ParagraphKey::Int(candidate)) {
            candidate -= 1;
        }
        let replacement = ParagraphKey::Int(candidate);
        tracing::debug!(
            index,
            duplicate = %text.key,
            replacement = %replacement,
            "synthesized paragraph key"
        );
        let _ = used.insert(replacement.clone());
        substitutions.push((index, replacement));
    }

    let mut resolved = Cow::Borrowed(items);
    for (index, replacement) in substitutions {
        if let Some(Item::Text(text)) = resolved.to_mut().get_mut(index) {
            text.key = replacement;
        }
    }
    resolved
}

/// The effective key of every paragraph in `items`, in order.
pub fn paragraph_keys(items: &[Item]) -> Vec<ParagraphKey> {
    resolve_keys(items)
        .iter()
        .filter_map(Item::as_text)
        .map(|text| text.key.clone())
        .collect()
}
