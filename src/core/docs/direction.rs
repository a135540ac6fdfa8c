/// Whole-document paragraph direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDirection {
    LeftToRight,
    RightToLeft,
}

impl TextDirection {
    /// Wire value for the Docs API paragraph style.
    pub fn as_api_value(self) -> &'static str {
        match self {
            TextDirection::LeftToRight => "LEFT_TO_RIGHT",
            TextDirection::RightToLeft => "RIGHT_TO_LEFT",
        }
    }
}

// Script ranges that flip the whole document to RTL.
const RTL_RANGES: &[(u32, u32)] = &[
    (0x0590, 0x05FF), // Hebrew
    (0x0600, 0x06FF), // Arabic
    (0x0750, 0x077F), // Arabic Supplement
    (0x08A0, 0x08FF), // Arabic Extended-A
];

/// Detects direction from the raw HTML source, markup included: a single
/// Hebrew or Arabic code point anywhere selects right-to-left.
pub fn detect_direction(html: &str) -> TextDirection {
    let has_rtl = html.chars().any(|c| {
        let code_point = c as u32;
        RTL_RANGES
            .iter()
            .any(|&(low, high)| code_point >= low && code_point <= high)
    });
    if has_rtl {
        TextDirection::RightToLeft
    } else {
        TextDirection::LeftToRight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hebrew_selects_rtl() {
        assert_eq!(
            detect_direction("<p>שלום עולם</p>"),
            TextDirection::RightToLeft
        );
    }

    #[test]
    fn arabic_selects_rtl() {
        assert_eq!(
            detect_direction("<p>مرحبا بالعالم</p>"),
            TextDirection::RightToLeft
        );
    }

    #[test]
    fn a_single_rtl_code_point_is_enough() {
        assert_eq!(
            detect_direction("<p>mostly english א</p>"),
            TextDirection::RightToLeft
        );
    }

    #[test]
    fn latin_selects_ltr() {
        assert_eq!(
            detect_direction("<p>plain english</p>"),
            TextDirection::LeftToRight
        );
    }

    #[test]
    fn empty_input_selects_ltr() {
        assert_eq!(detect_direction(""), TextDirection::LeftToRight);
    }
}
