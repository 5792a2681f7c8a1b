/// Replaces characters that geographic stores reject in dataset and field
/// names (`-`, `.`, space, parentheses, `/`) with underscores.
///
/// Everything else passes through unchanged; callers that need stricter rules
/// should validate separately.
pub fn sanitize_name(input: &str) -> String {
    input
        .chars()
        .map(|ch| match ch {
            '-' | '.' | ' ' | '(' | ')' | '/' => '_',
            other => other,
        })
        .collect()
}
