//! Category vocabulary helpers.

/// Built-in labels seeded when no category list was ever persisted.
///
/// Order matters: the first label becomes the initial selection.
pub const DEFAULT_CATEGORIES: [&str; 5] = ["מחלה", "חופש", "מילואים", "סידורים", "אחר"];

/// Returns the default vocabulary as owned labels.
pub fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(|label| label.to_string()).collect()
}

/// Returns whether `label` can be stored as a category.
///
/// Only the empty string is rejected; labels are otherwise kept verbatim.
pub fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
}
