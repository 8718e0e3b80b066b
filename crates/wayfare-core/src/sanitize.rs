//! # Instruction Sanitizer
//!
//! Turn-by-turn instructions arrive from the backend with inline HTML markup
//! (`<b>`, `<div>`, entities). They must never reach a display surface
//! unsanitized, so every step string passes through [`sanitize_instruction`]
//! before rendering.
//!
//! ## What Gets Removed
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Input                                    Output                       │
//! │  ─────                                    ──────                       │
//! │  Turn <b>left</b> onto <b>MG Road</b>     Turn left onto MG Road       │
//! │  Go straight<div>Pass the mall</div>      Go straight Pass the mall    │
//! │  <script>alert(1)</script>Continue        Continue                     │
//! │  Toll&nbsp;road &amp; ferry               Toll road & ferry            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `<script>` and `<style>` elements are removed together with their content;
//! every other tag is replaced by a space so adjacent words don't fuse.

// =============================================================================
// Public API
// =============================================================================

/// Sanitizes one instruction string for display.
///
/// ## Behavior
/// - `<script>`/`<style>` elements are dropped with their entire content
/// - all other tags are stripped (replaced by a space)
/// - common HTML entities are decoded
/// - whitespace runs are collapsed and the result trimmed
pub fn sanitize_instruction(raw: &str) -> String {
    let stripped = strip_tags(raw);
    let decoded = decode_entities(&stripped);
    collapse_whitespace(&decoded)
}

// =============================================================================
// Tag Stripping
// =============================================================================

/// Elements whose content is dropped along with the tags themselves.
const CONTENT_STRIPPED_ELEMENTS: [&str; 2] = ["script", "style"];

fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        out.push(' ');
        let tail = &rest[open..];

        let Some(close) = tail.find('>') else {
            // Unterminated tag: drop the remainder rather than render it.
            return out;
        };

        let tag_body = &tail[1..close];
        let is_closing = tag_body.starts_with('/');
        let name = tag_name(tag_body);
        let after_tag = &tail[close + 1..];

        if !is_closing
            && CONTENT_STRIPPED_ELEMENTS
                .iter()
                .any(|e| name.eq_ignore_ascii_case(e))
        {
            // Skip to the matching close tag, content included.
            let close_marker = format!("</{name}");
            match find_ignore_ascii_case(after_tag, &close_marker) {
                Some(end) => {
                    let past = &after_tag[end..];
                    match past.find('>') {
                        Some(gt) => rest = &past[gt + 1..],
                        None => return out,
                    }
                }
                // Unterminated element: everything after it is suspect.
                None => return out,
            }
        } else {
            rest = after_tag;
        }
    }

    out.push_str(rest);
    out
}

/// Extracts the element name from the inside of a tag (`b`, `/div`, ...).
fn tag_name(tag_body: &str) -> &str {
    tag_body
        .trim_start_matches('/')
        .split(|c: char| c.is_whitespace() || c == '/')
        .next()
        .unwrap_or("")
}

/// Byte-wise case-insensitive substring search (the needle is ASCII).
fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    let h = haystack.as_bytes();
    let n = needle.as_bytes();
    if n.is_empty() || h.len() < n.len() {
        return None;
    }
    h.windows(n.len()).position(|w| w.eq_ignore_ascii_case(n))
}

// =============================================================================
// Entity Decoding
// =============================================================================

/// The entities Google-style instruction markup actually uses.
const ENTITIES: [(&str, &str); 6] = [
    ("&nbsp;", " "),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&amp;", "&"),
];

fn decode_entities(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];

        match ENTITIES.iter().find(|(name, _)| tail.starts_with(name)) {
            Some((name, replacement)) => {
                out.push_str(replacement);
                rest = &tail[name.len()..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

// =============================================================================
// Whitespace
// =============================================================================

fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(sanitize_instruction("Turn left"), "Turn left");
    }

    #[test]
    fn test_inline_markup_is_stripped() {
        assert_eq!(
            sanitize_instruction("Turn <b>left</b> onto <b>MG Road</b>"),
            "Turn left onto MG Road"
        );
    }

    #[test]
    fn test_block_markup_does_not_fuse_words() {
        assert_eq!(
            sanitize_instruction(
                r#"Merge onto <b>NH 48</b><div style="font-size:0.9em">Toll road</div>"#
            ),
            "Merge onto NH 48 Toll road"
        );
    }

    #[test]
    fn test_script_content_is_removed_entirely() {
        assert_eq!(
            sanitize_instruction("<script>alert('xss')</script>Continue straight"),
            "Continue straight"
        );
        assert_eq!(
            sanitize_instruction("Before<SCRIPT src=x>payload()</SCRIPT>After"),
            "Before After"
        );
    }

    #[test]
    fn test_style_content_is_removed_entirely() {
        assert_eq!(
            sanitize_instruction("<style>body{display:none}</style>Take the exit"),
            "Take the exit"
        );
    }

    #[test]
    fn test_entities_are_decoded() {
        assert_eq!(
            sanitize_instruction("Toll&nbsp;road &amp; ferry"),
            "Toll road & ferry"
        );
        assert_eq!(sanitize_instruction("A &lt;tag&gt; literal"), "A <tag> literal");
    }

    #[test]
    fn test_unterminated_tag_drops_remainder() {
        assert_eq!(sanitize_instruction("Keep right <b onto"), "Keep right");
        assert_eq!(sanitize_instruction("Go <script>evil("), "Go");
    }

    #[test]
    fn test_unknown_entity_is_left_alone() {
        assert_eq!(sanitize_instruction("Fish &chips"), "Fish &chips");
    }

    #[test]
    fn test_stray_closing_tag_is_just_stripped() {
        assert_eq!(sanitize_instruction("odd</script>but fine"), "odd but fine");
    }
}
