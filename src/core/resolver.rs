//! Query resolution for lists and reminders.
//!
//! A query selects one entity from an ordered candidate slice. Rules are
//! tried in order and the first match wins:
//!
//! 1. the query is a non-negative integer that is a valid 0-based position;
//! 2. case-insensitive match against the stable identifier;
//! 3. case-insensitive match against the display name.

/// An entity that can be selected by a query.
pub trait Resolvable {
    /// Stable, store-assigned identifier.
    fn identifier(&self) -> &str;

    /// Display name (title).
    fn display_name(&self) -> &str;
}

/// Resolves `query` against `candidates`, trying position, identifier and
/// name in that order.
///
/// Returns `None` if no rule matches.
///
/// # Panics
///
/// Panics if `query` is empty. Callers must reject empty queries before
/// resolving.
pub fn resolve<'a, T: Resolvable>(candidates: &'a [T], query: &str) -> Option<&'a T> {
    assert!(!query.is_empty(), "resolve called with an empty query");

    if let Ok(index) = query.parse::<usize>()
        && let Some(candidate) = candidates.get(index)
    {
        return Some(candidate);
    }

    resolve_by_key(candidates, query)
}

/// Resolves `query` by identifier, then by name. Positions are ignored.
#[must_use]
pub fn resolve_by_key<'a, T: Resolvable>(candidates: &'a [T], query: &str) -> Option<&'a T> {
    let needle = query.to_lowercase();

    candidates
        .iter()
        .find(|c| c.identifier().to_lowercase() == needle)
        .or_else(|| {
            candidates
                .iter()
                .find(|c| c.display_name().to_lowercase() == needle)
        })
}
