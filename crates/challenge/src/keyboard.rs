//! Computer-keyboard piano layout.
//!
//! Two registers share the keyboard. The upper one puts middle C on `e`
//! with white keys along the QWERTY row and black keys on the number row;
//! the lower one puts C3 on `c` with white keys along the ZXCV row and
//! black keys on the ASDF row.

use std::collections::HashMap;

const UPPER: [(char, u8); 21] = [
    // White keys
    ('q', 57),
    ('w', 59),
    ('e', 60),
    ('r', 62),
    ('t', 64),
    ('y', 65),
    ('u', 67),
    ('i', 69),
    ('o', 71),
    ('p', 72),
    ('[', 74),
    (']', 76),
    // Black keys
    ('1', 56),
    ('2', 58),
    ('4', 61),
    ('5', 63),
    ('7', 66),
    ('8', 68),
    ('9', 70),
    ('-', 73),
    ('=', 75),
];

const LOWER: [(char, u8); 18] = [
    // White keys
    ('z', 45),
    ('x', 47),
    ('c', 48),
    ('v', 50),
    ('b', 52),
    ('n', 53),
    ('m', 55),
    (',', 57),
    ('.', 59),
    ('/', 60),
    // Black keys
    ('a', 44),
    ('s', 46),
    ('f', 49),
    ('g', 51),
    ('j', 54),
    ('k', 56),
    ('l', 58),
    ('\'', 61),
];

/// Maps keys to MIDI note numbers. The upper register wins when both map a key.
#[derive(Debug, Clone)]
pub struct KeyboardLayout {
    upper: HashMap<char, u8>,
    lower: HashMap<char, u8>,
}

impl Default for KeyboardLayout {
    fn default() -> Self {
        KeyboardLayout {
            upper: UPPER.into_iter().collect(),
            lower: LOWER.into_iter().collect(),
        }
    }
}

impl KeyboardLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// MIDI note number for a key, ignoring case.
    pub fn note_for(&self, key: char) -> Option<u8> {
        let key = key.to_ascii_lowercase();
        self.upper
            .get(&key)
            .or_else(|| self.lower.get(&key))
            .copied()
    }

    /// Like [`KeyboardLayout::note_for`] for a one-character string.
    pub fn note_for_str(&self, key: &str) -> Option<u8> {
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => self.note_for(c),
            _ => None,
        }
    }

    pub fn is_mapped(&self, key: char) -> bool {
        self.note_for(key).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_middle_c_on_both_registers() {
        let layout = KeyboardLayout::new();
        assert_eq!(layout.note_for('e'), Some(60));
        assert_eq!(layout.note_for('/'), Some(60));
        assert_eq!(layout.note_for('c'), Some(48));
    }

    #[test]
    fn test_case_insensitive() {
        let layout = KeyboardLayout::new();
        assert_eq!(layout.note_for('E'), Some(60));
        assert_eq!(layout.note_for('Z'), Some(45));
    }

    #[test]
    fn test_black_keys() {
        let layout = KeyboardLayout::new();
        assert_eq!(layout.note_for('4'), Some(61));
        assert_eq!(layout.note_for('='), Some(75));
        assert_eq!(layout.note_for('\''), Some(61));
        assert_eq!(layout.note_for('k'), Some(56));
    }

    #[test]
    fn test_unmapped() {
        let layout = KeyboardLayout::new();
        assert_eq!(layout.note_for('3'), None);
        assert_eq!(layout.note_for('h'), None);
        assert!(!layout.is_mapped(' '));
    }

    #[test]
    fn test_str_lookup() {
        let layout = KeyboardLayout::new();
        assert_eq!(layout.note_for_str("t"), Some(64));
        assert_eq!(layout.note_for_str("te"), None);
        assert_eq!(layout.note_for_str(""), None);
    }

    #[test]
    fn test_upper_wins() {
        let mut layout = KeyboardLayout::new();
        layout.lower.insert('q', 10);
        assert_eq!(layout.note_for('q'), Some(57));
    }
}
