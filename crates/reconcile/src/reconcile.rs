use std::collections::HashSet;

/// Identifiers in `present` that `reference` does not know about, in
/// `present`'s iteration order.
///
/// An empty `reference` returns all of `present`; an empty `present` returns
/// nothing.
#[must_use]
pub fn missing_from(present: &HashSet<String>, reference: &HashSet<String>) -> Vec<String> {
    present
        .iter()
        .filter(|id| !reference.contains(*id))
        .cloned()
        .collect()
}
