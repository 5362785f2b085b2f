//! Display rendering of technology attributes.

use crate::config::{ATTRIBUTE_SEPARATOR, DETECTED_MARKER};
use crate::detection::TechnologyAttributes;

/// Renders `attrs` as a single cell.
///
/// Present attributes are joined with `"; "` in this order:
/// 1. version, verbatim
/// 2. confidence as `"<n>% confidence"`, only below 100
/// 3. categories, joined with `", "`
///
/// A technology with none of these renders as `"detected"`, never as an
/// empty cell, since an empty cell means "not detected".
pub fn render_attributes(attrs: &TechnologyAttributes) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(3);

    if let Some(version) = attrs.version.as_deref().filter(|v| !v.is_empty()) {
        parts.push(version.to_string());
    }
    if let Some(confidence) = attrs.confidence.filter(|c| *c < 100) {
        parts.push(format!("{confidence}% confidence"));
    }
    if !attrs.categories.is_empty() {
        parts.push(attrs.categories.join(", "));
    }

    if parts.is_empty() {
        DETECTED_MARKER.to_string()
    } else {
        parts.join(ATTRIBUTE_SEPARATOR)
    }
}
