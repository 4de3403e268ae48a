// crates/langmap-core/src/text.rs

//! Text helpers shared by the resolver and the display views.

/// Convert a string into a folded key suitable for indexing and comparison.
///
/// This performs:
/// 1) Transliterate Unicode → ASCII (e.g. `Côte d'Ivoire` -> `Cote d'Ivoire`)
/// 2) Normalize to lowercase
///
/// # Examples
///
/// ```rust
/// use langmap_core::text::fold_key;
///
/// assert_eq!(fold_key("Curaçao"), "curacao");
/// assert_eq!(fold_key("FRANCE"), "france");
/// ```
pub fn fold_key(s: &str) -> String {
    deunicode::deunicode(s.trim()).to_lowercase()
}

/// Formats an integer with `,` thousands separators.
///
/// ```rust
/// use langmap_core::text::format_thousands;
///
/// assert_eq!(format_thousands(67_000_000), "67,000,000");
/// assert_eq!(format_thousands(999), "999");
/// ```
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Rounds `v` to `digits` decimal places.
#[inline]
pub fn round_to(v: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (v * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_key_strips_accents_and_case() {
        assert_eq!(fold_key("  Åland Islands "), "aland islands");
        assert_eq!(fold_key("São Tomé and Príncipe"), "sao tome and principe");
    }

    #[test]
    fn thousands_separator_boundaries() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(1_000), "1,000");
        assert_eq!(format_thousands(100_000), "100,000");
        assert_eq!(format_thousands(1_234_567_890), "1,234,567,890");
    }

    #[test]
    fn rounding() {
        assert_eq!(round_to(2.345_678_9, 6), 2.345679);
        assert_eq!(round_to(-12.345_66, 4), -12.3457);
        assert_eq!(round_to(551_695.123, 2), 551_695.12);
    }
}
