//! Script-range based language detection. Matches the original
//! implementation's heuristic exactly: check Unicode script ranges in a
//! fixed order, fall back to English.

pub fn detect_language(text: &str) -> String {
    if text.chars().count() < 10 {
        return "en".to_string();
    }

    let ranges: &[(u32, u32, &str)] = &[
        (0x0900, 0x097F, "hi"),
        (0x0B80, 0x0BFF, "ta"),
        (0x0C00, 0x0C7F, "te"),
        (0x0980, 0x09FF, "bn"),
        (0x0D00, 0x0D7F, "ml"),
        (0x0C80, 0x0CFF, "kn"),
        (0x0A80, 0x0AFF, "gu"),
        (0x0600, 0x06FF, "ur"),
    ];

    for &(start, end, code) in ranges {
        if text.chars().any(|c| (c as u32) >= start && (c as u32) <= end) {
            return code.to_string();
        }
    }

    "en".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_defaults_to_english() {
        assert_eq!(detect_language("short"), "en");
    }

    #[test]
    fn detects_hindi_devanagari() {
        assert_eq!(detect_language("यह एक परीक्षण वाक्य है जो हिंदी में है"), "hi");
    }

    #[test]
    fn detects_english_latin_script() {
        assert_eq!(detect_language("this is a normal english sentence"), "en");
    }
}
