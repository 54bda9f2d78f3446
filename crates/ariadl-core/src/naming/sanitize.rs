//! Filesystem-safe single path segment.

/// Linux NAME_MAX minus room for the `.mp4` suffix.
const MAX_SEGMENT_BYTES: usize = 250;

/// Makes `name` safe to use as one path segment.
///
/// - Replaces NUL, `/`, `\`, and control characters with `_`
/// - Collapses consecutive replacements into one `_`
/// - Trims leading/trailing spaces, dots and underscores
/// - Limits length to [`MAX_SEGMENT_BYTES`] on a char boundary
///
/// Spaces inside the name are kept; episode titles routinely contain them.
pub fn sanitize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_replaced = false;

    for c in name.chars() {
        if c == '\0' || c == '/' || c == '\\' || c.is_control() {
            if !prev_replaced {
                out.push('_');
            }
            prev_replaced = true;
        } else {
            out.push(c);
            prev_replaced = false;
        }
    }

    let trimmed = out.trim_matches(|c: char| c == ' ' || c == '.' || c == '_');

    if trimmed.len() > MAX_SEGMENT_BYTES {
        let mut take = MAX_SEGMENT_BYTES;
        while take > 0 && !trimmed.is_char_boundary(take) {
            take -= 1;
        }
        trimmed[..take].trim_end().to_string()
    } else {
        trimmed.to_string()
    }
}
