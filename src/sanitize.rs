/// Colour used for source tags whose colour is missing or rejected.
pub const DEFAULT_SOURCE_COLOR: &str = "#6c757d";

/// Validate a source-tag colour against a strict allow-list.
///
/// Accepts hex colours (`#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`) and plain
/// CSS keywords made of ASCII letters. Anything else is replaced with
/// [`DEFAULT_SOURCE_COLOR`], so the value can be placed in a `style`
/// attribute without further escaping.
pub fn safe_color(value: Option<&str>) -> &str {
    match value.map(str::trim) {
        Some(c) if is_hex_color(c) || is_color_keyword(c) => c,
        _ => DEFAULT_SOURCE_COLOR,
    }
}

fn is_hex_color(c: &str) -> bool {
    match c.strip_prefix('#') {
        Some(hex) => {
            matches!(hex.len(), 3 | 4 | 6 | 8) && hex.chars().all(|ch| ch.is_ascii_hexdigit())
        }
        None => false,
    }
}

fn is_color_keyword(c: &str) -> bool {
    !c.is_empty() && c.len() <= 20 && c.chars().all(|ch| ch.is_ascii_alphabetic())
}

#[cfg(test)]
mod tests {
    use super::*;

    mod safe_color_tests {
        use super::*;

        #[test]
        fn test_hex_colors_accepted() {
            assert_eq!(safe_color(Some("#fff")), "#fff");
            assert_eq!(safe_color(Some("#FF4500")), "#FF4500");
            assert_eq!(safe_color(Some("#ff450080")), "#ff450080");
        }

        #[test]
        fn test_keyword_accepted() {
            assert_eq!(safe_color(Some("crimson")), "crimson");
        }

        #[test]
        fn test_missing_color_uses_default() {
            assert_eq!(safe_color(None), DEFAULT_SOURCE_COLOR);
        }

        #[test]
        fn test_style_breakout_rejected() {
            assert_eq!(
                safe_color(Some("red;background:url(x)")),
                DEFAULT_SOURCE_COLOR
            );
            assert_eq!(safe_color(Some("\" onmouseover=\"x")), DEFAULT_SOURCE_COLOR);
        }

        #[test]
        fn test_bad_hex_rejected() {
            assert_eq!(safe_color(Some("#12")), DEFAULT_SOURCE_COLOR);
            assert_eq!(safe_color(Some("#gggggg")), DEFAULT_SOURCE_COLOR);
        }
    }
}
