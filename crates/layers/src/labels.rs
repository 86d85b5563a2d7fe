use std::borrow::Cow;

#[derive(Debug, Clone, PartialEq)]
pub struct LabelStyle {
    pub font_size_px: f32,
    pub color: [f32; 4],
    pub background: [f32; 4],
    pub padding_px: f32,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            font_size_px: 11.0,
            color: [1.0, 1.0, 1.0, 1.0],
            background: [0.0, 0.0, 0.0, 0.7],
            padding_px: 2.0,
        }
    }
}

/// Trims `text` and shortens it to at most `max_chars` characters, ending
/// with an ellipsis when anything was cut.
///
/// Counts `char`s, so multi-byte text is never split mid-character.
pub fn truncate_label(text: &str, max_chars: usize) -> Cow<'_, str> {
    let trimmed = text.trim();
    if max_chars == 0 {
        return Cow::Borrowed("");
    }
    match trimmed.char_indices().nth(max_chars) {
        None => Cow::Borrowed(trimmed),
        Some(_) => {
            let keep: String = trimmed.chars().take(max_chars - 1).collect();
            Cow::Owned(format!("{}…", keep.trim_end()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::truncate_label;

    #[test]
    fn short_labels_pass_through_trimmed() {
        assert_eq!(truncate_label("  a cat  ", 24), "a cat");
        assert_eq!(truncate_label("exactly5", 8), "exactly5");
    }

    #[test]
    fn long_labels_end_with_ellipsis() {
        let out = truncate_label("a watercolor painting of a lighthouse", 10);
        assert_eq!(out, "a waterco…");
        assert_eq!(out.chars().count(), 10);
        assert_eq!(truncate_label("anything", 0), "");
        assert_eq!(truncate_label("ab", 1), "…");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let out = truncate_label("日本語のテキストです", 4);
        assert_eq!(out, "日本語…");
    }
}
