//! Candidate selection key sets, indexed by `selKeyType`.

/// Known selection key sets.
pub const SELECTION_KEYS: &[&str] = &["1234567890"];

pub(super) fn selection_keys(index: usize) -> &'static str {
    SELECTION_KEYS
        .get(index)
        .copied()
        .unwrap_or(SELECTION_KEYS[0])
}
