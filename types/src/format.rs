use crate::LYRIC_FORM;

/// Break poem text after every full stop, except for 词 which keep their
/// own layout.
pub fn format_poem_content(poem_text: &str, literary_form: &str) -> String {
    if literary_form == LYRIC_FORM {
        poem_text.to_string()
    } else {
        poem_text.replace('。', "。\n")
    }
}

/// Which card of a location's poem list is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoemCursor {
    index: usize,
    len: usize,
}

impl PoemCursor {
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    /// Start at `index`, wrapped into range.
    pub fn at(len: usize, index: usize) -> Self {
        let index = if len == 0 { 0 } else { index % len };
        Self { index, len }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Step forwards (`+1`) or backwards (`-1`), wrapping at both ends.
    /// A single card (or none) never moves.
    pub fn advance(&mut self, direction: isize) -> usize {
        if self.len <= 1 {
            return self.index;
        }
        let len = self.len as isize;
        self.index = (self.index as isize + direction).rem_euclid(len) as usize;
        self.index
    }

    /// "2 / 5" style position text.
    pub fn indicator(&self) -> String {
        format!("{} / {}", self.index + 1, self.len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shi_breaks_after_full_stop() {
        assert_eq!(
            format_poem_content("明月松间照。清泉石上流。", "诗"),
            "明月松间照。\n清泉石上流。\n"
        );
    }

    #[test]
    fn test_ci_unchanged() {
        let text = "明月松间照。清泉石上流。";
        assert_eq!(format_poem_content(text, "词"), text);
    }

    #[test]
    fn test_other_forms_break_too() {
        assert_eq!(format_poem_content("甲。乙", "赋"), "甲。\n乙");
        assert_eq!(format_poem_content("无句号", "诗"), "无句号");
    }

    #[test]
    fn test_cursor_wraps_backwards() {
        let mut cursor = PoemCursor::new(3);
        assert_eq!(cursor.advance(-1), 2);
        assert_eq!(cursor.indicator(), "3 / 3");
    }

    #[test]
    fn test_cursor_wraps_forwards() {
        let mut cursor = PoemCursor::at(3, 2);
        assert_eq!(cursor.advance(1), 0);
        assert_eq!(cursor.advance(1), 1);
    }

    #[test]
    fn test_cursor_single_card_does_not_move() {
        let mut cursor = PoemCursor::new(1);
        assert_eq!(cursor.advance(1), 0);
        assert_eq!(cursor.advance(-1), 0);
        let mut empty = PoemCursor::default();
        assert!(empty.is_empty());
        assert_eq!(empty.advance(1), 0);
    }

    #[test]
    fn test_cursor_at_wraps_start() {
        assert_eq!(PoemCursor::at(3, 7).index(), 1);
        assert_eq!(PoemCursor::at(0, 7).index(), 0);
    }
}
