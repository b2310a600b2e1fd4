//! Pitch to Jianpu symbol mapping
//!
//! Degrees are spelled against a fixed C-major reference: chromatic notes
//! take a trailing `#`, there are no flat spellings and no key signature.

/// Degree symbol per pitch class, index 0 = C
pub const DEGREE_SYMBOLS: [&str; 12] = [
    "1", "1#", "2", "2#", "3", "4", "4#", "5", "5#", "6", "6#", "7",
];

/// Symbol used for a pitch class outside the table
pub const UNKNOWN_DEGREE: &str = "?";

/// Octave index rendered without adornment (pitch 60 sits in octave 4)
pub const MIDDLE_OCTAVE: i32 = 4;

/// Octave register of a note relative to the middle octave
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    Low,
    Middle,
    High,
}

impl Register {
    pub fn from_octave(octave: i32) -> Self {
        match octave {
            o if o < MIDDLE_OCTAVE => Register::Low,
            o if o > MIDDLE_OCTAVE => Register::High,
            _ => Register::Middle,
        }
    }

    /// Low notes go in square brackets, high notes in parentheses
    pub fn wrap(self, symbol: &str) -> String {
        match self {
            Register::Low => format!("[{}]", symbol),
            Register::Middle => symbol.to_string(),
            Register::High => format!("({})", symbol),
        }
    }
}

/// Pitch class in `[0, 12)`, also for negative pitches
pub fn pitch_class(pitch: i32) -> i32 {
    pitch.rem_euclid(12)
}

pub fn octave_index(pitch: i32) -> i32 {
    pitch.div_euclid(12) - 1
}

pub fn degree_symbol(pitch_class: i32) -> &'static str {
    usize::try_from(pitch_class)
        .ok()
        .and_then(|idx| DEGREE_SYMBOLS.get(idx))
        .copied()
        .unwrap_or(UNKNOWN_DEGREE)
}

/// Convert a pitch number to its adorned Jianpu symbol (e.g. 60 -> "1", 72 -> "(1)")
pub fn jianpu_symbol(pitch: i32) -> String {
    let degree = degree_symbol(pitch_class(pitch));
    Register::from_octave(octave_index(pitch)).wrap(degree)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degree_mapping() {
        assert_eq!(jianpu_symbol(60), "1"); // Middle C
        assert_eq!(jianpu_symbol(61), "1#");
        assert_eq!(jianpu_symbol(62), "2");
        assert_eq!(jianpu_symbol(64), "3");
        assert_eq!(jianpu_symbol(71), "7");
    }

    #[test]
    fn test_octave_brackets() {
        assert_eq!(jianpu_symbol(48), "[1]");
        assert_eq!(jianpu_symbol(59), "[7]");
        assert_eq!(jianpu_symbol(72), "(1)");
        assert_eq!(jianpu_symbol(127), "(5)");
        assert_eq!(jianpu_symbol(0), "[1]");
    }

    #[test]
    fn test_negative_pitch() {
        assert_eq!(pitch_class(-1), 11);
        assert_eq!(octave_index(-1), -2);
        assert_eq!(jianpu_symbol(-1), "[7]");
    }

    #[test]
    fn test_unknown_degree() {
        assert_eq!(degree_symbol(12), "?");
        assert_eq!(degree_symbol(-3), "?");
    }

    #[test]
    fn test_register() {
        assert_eq!(Register::from_octave(3), Register::Low);
        assert_eq!(Register::from_octave(4), Register::Middle);
        assert_eq!(Register::from_octave(5), Register::High);
        assert_eq!(Register::High.wrap("2#"), "(2#)");
    }
}
