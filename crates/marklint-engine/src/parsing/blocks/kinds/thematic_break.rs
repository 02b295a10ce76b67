use super::count_spaces;

/// `***`, `---` or `___`, optionally space separated.
pub struct ThematicBreak;

impl ThematicBreak {
    pub const MARKERS: [char; 3] = ['-', '_', '*'];
    pub const MIN_COUNT: usize = 3;

    pub fn matches(rest: &str) -> bool {
        let indent = count_spaces(rest, 0);
        if indent > 3 {
            return false;
        }
        let body = &rest[indent..];
        let Some(marker) = body.chars().next().filter(|c| Self::MARKERS.contains(c)) else {
            return false;
        };
        let mut count = 0;
        for c in body.chars() {
            if c == marker {
                count += 1;
            } else if c != ' ' {
                return false;
            }
        }
        count >= Self::MIN_COUNT
    }
}
