//! URL slug normalization.
//!
//! Slugs are ASCII only. Characters outside `[a-z0-9-]` are dropped, not
//! transliterated, so a name written entirely in Cyrillic collapses to the
//! [`FALLBACK_SLUG`].

/// Slug used when normalization leaves nothing.
pub const FALLBACK_SLUG: &str = "item";

/// Normalize a human-readable name into a URL slug.
///
/// Lowercases, turns spaces and underscores into hyphens, drops every
/// character outside `[a-z0-9-]`, then collapses runs of hyphens and trims
/// them from both ends.
///
/// # Examples
///
/// ```
/// use football_shop_core::slugify;
///
/// assert_eq!(slugify("Home Kit 2026"), "home-kit-2026");
/// assert_eq!(slugify("Домашняя Форма 2026!"), "2026");
/// assert_eq!(slugify("Мяч"), "item");
/// ```
#[must_use]
pub fn slugify(value: &str) -> String {
    let filtered: String = value
        .trim()
        .to_lowercase()
        .chars()
        .map(|ch| if ch == ' ' || ch == '_' { '-' } else { ch })
        .filter(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || *ch == '-')
        .collect();

    let slug = filtered
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    if slug.is_empty() {
        FALLBACK_SLUG.to_owned()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_name() {
        assert_eq!(slugify("Boots Speed FG"), "boots-speed-fg");
        assert_eq!(slugify("  Pro_Match  Ball  "), "pro-match-ball");
    }

    #[test]
    fn test_collapses_and_trims_hyphens() {
        assert_eq!(slugify("--a---b--"), "a-b");
        assert_eq!(slugify("a - b"), "a-b");
    }

    #[test]
    fn test_drops_punctuation() {
        assert_eq!(slugify("Gloves «Grip Pro»!"), "gloves-grip-pro");
        assert_eq!(slugify("Bibs (5 pcs.)"), "bibs-5-pcs");
    }

    #[test]
    fn test_cyrillic_is_dropped_not_transliterated() {
        assert_eq!(slugify("Домашняя Форма 2026!"), "2026");
        assert_eq!(slugify("Бутсы «Speed FG»"), "speed-fg");
    }

    #[test]
    fn test_fallback_when_nothing_survives() {
        assert_eq!(slugify(""), FALLBACK_SLUG);
        assert_eq!(slugify("   "), FALLBACK_SLUG);
        assert_eq!(slugify("Мячи"), FALLBACK_SLUG);
        assert_eq!(slugify("---"), FALLBACK_SLUG);
    }

    #[test]
    fn test_explicit_slug_is_stable() {
        assert_eq!(slugify("home-kit-2026"), "home-kit-2026");
        assert_eq!(slugify(&slugify("Away Kit Classic")), "away-kit-classic");
    }
}
