//! Small string builders for artwork display.
//!
//! - [`artwork_subtitle`]: `"1889"` + `"Oil on canvas, framed"` → `"1889 · Oil on canvas"`
//! - [`iiif_image_url`]: IIIF Image API URL for a given image id and width
//! - [`strip_html`]: angle-bracket tag stripping for API descriptions

/// Default width for grid images.
pub const CARD_IMAGE_WIDTH: u32 = 843;

/// Join the date and the first comma-separated segment of the medium with a
/// middle dot, skipping empty parts.
pub fn artwork_subtitle(date: &str, medium: &str) -> String {
    let short_medium = medium.split(',').next().unwrap_or_default();
    [date, short_medium]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" \u{00b7} ")
}

/// Build a IIIF image URL, or an empty string when there is no image id.
///
/// ```
/// # use artic_gal::text::iiif_image_url;
/// assert_eq!(
///     iiif_image_url("https://www.artic.edu/iiif/2", Some("abc123"), 400),
///     "https://www.artic.edu/iiif/2/abc123/full/400,/0/default.jpg"
/// );
/// assert_eq!(iiif_image_url("https://www.artic.edu/iiif/2", None, 400), "");
/// ```
pub fn iiif_image_url(iiif_url: &str, image_id: Option<&str>, width: u32) -> String {
    match image_id {
        Some(id) if !id.is_empty() => format!("{iiif_url}/{id}/full/{width},/0/default.jpg"),
        _ => String::new(),
    }
}

/// Strip HTML tags from a string.
///
/// A tag is a `<` up to the next `>`. A `<` with no closing `>` after it and
/// a lone `>` are kept as text.
pub fn strip_html(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(open) = rest.find('<') {
        let Some(close) = rest[open..].find('>') else {
            break;
        };
        result.push_str(&rest[..open]);
        rest = &rest[open + close + 1..];
    }
    result.push_str(rest);
    result
}

/// Truncate text to `max` characters, appending `...` if truncated.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // artwork_subtitle
    // =========================================================================

    #[test]
    fn subtitle_joins_date_and_short_medium() {
        assert_eq!(
            artwork_subtitle("1889", "Oil on canvas, framed"),
            "1889 · Oil on canvas"
        );
    }

    #[test]
    fn subtitle_takes_first_medium_segment() {
        assert_eq!(
            artwork_subtitle("1900", "Bronze, gold patina, marble base"),
            "1900 · Bronze"
        );
    }

    #[test]
    fn subtitle_without_medium() {
        assert_eq!(artwork_subtitle("1889", ""), "1889");
    }

    #[test]
    fn subtitle_without_date() {
        assert_eq!(artwork_subtitle("", "Oil on canvas"), "Oil on canvas");
    }

    #[test]
    fn subtitle_both_empty() {
        assert_eq!(artwork_subtitle("", ""), "");
    }

    #[test]
    fn subtitle_medium_without_comma() {
        assert_eq!(artwork_subtitle("1920", "Watercolor"), "1920 · Watercolor");
    }

    // =========================================================================
    // iiif_image_url
    // =========================================================================

    #[test]
    fn iiif_url_with_width() {
        assert_eq!(
            iiif_image_url("https://www.artic.edu/iiif/2", Some("abc123"), CARD_IMAGE_WIDTH),
            "https://www.artic.edu/iiif/2/abc123/full/843,/0/default.jpg"
        );
    }

    #[test]
    fn iiif_url_empty_for_missing_or_empty_id() {
        assert_eq!(iiif_image_url("https://x", None, 843), "");
        assert_eq!(iiif_image_url("https://x", Some(""), 843), "");
    }

    // =========================================================================
    // strip_html / truncate
    // =========================================================================

    #[test]
    fn strip_html_removes_tags() {
        assert_eq!(
            strip_html("<p>Water lilies at <em>Giverny</em>.</p>"),
            "Water lilies at Giverny."
        );
    }

    #[test]
    fn strip_html_plain_text_unchanged() {
        assert_eq!(strip_html("no tags here"), "no tags here");
    }

    #[test]
    fn strip_html_keeps_unclosed_angle_bracket() {
        assert_eq!(strip_html("Height < 5 cm, signed"), "Height < 5 cm, signed");
        assert_eq!(strip_html("a < b"), "a < b");
    }

    #[test]
    fn strip_html_keeps_lone_closing_bracket() {
        assert_eq!(strip_html("3 > 2"), "3 > 2");
        assert_eq!(strip_html("3 > 2 <b>bold</b>"), "3 > 2 bold");
    }

    #[test]
    fn strip_html_tag_runs_to_first_closing_bracket() {
        assert_eq!(strip_html("x <a <b> y"), "x  y");
    }

    #[test]
    fn truncate_short_text_unchanged() {
        assert_eq!(truncate("short", 10), "short");
    }

    #[test]
    fn truncate_long_text() {
        assert_eq!(truncate("abcdefghij", 4), "abcd...");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("éèêë", 2), "éè...");
    }
}
