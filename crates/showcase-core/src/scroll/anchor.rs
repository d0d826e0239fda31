//! In-page anchor resolution (`<a href="#work">`)

/// Fragment id of an in-page link, `None` for `#` alone or external links
pub fn anchor_id(href: &str) -> Option<&str> {
    let id = href.strip_prefix('#')?;
    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}

/// Scroll position that puts a section's top just below the sticky header
#[inline]
pub fn anchor_target(section_top: f64, header_offset: f64, max_scroll: f64) -> f64 {
    (section_top - header_offset).clamp(0.0, max_scroll.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_id() {
        assert_eq!(anchor_id("#work"), Some("work"));
        assert_eq!(anchor_id("#"), None);
        assert_eq!(anchor_id(""), None);
        assert_eq!(anchor_id("https://example.com/#work"), None);
    }

    #[test]
    fn test_anchor_target_clamps() {
        assert_eq!(anchor_target(900.0, 72.0, 5000.0), 828.0);
        assert_eq!(anchor_target(40.0, 72.0, 5000.0), 0.0);
        assert_eq!(anchor_target(9000.0, 0.0, 5000.0), 5000.0);
    }
}
