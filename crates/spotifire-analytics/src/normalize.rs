//! Track-name normalization.

/// Collapses qualifiers such as `(Live)` or `(Remix)` so variants of one
/// recording group together.
///
/// Returns the text before the first `(` with surrounding whitespace
/// trimmed. A name that starts with `(` is returned whole (trimmed) so it
/// never collapses to an empty key.
pub fn canonical_track_name(name: &str) -> &str {
    let trimmed = name.trim();
    match trimmed.find('(') {
        None | Some(0) => trimmed,
        Some(index) => trimmed[..index].trim_end(),
    }
}
