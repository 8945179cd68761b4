//! Difficulty tier to alphabet mapping.

use crate::models::Tier;

const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";

/// Canonical special symbols. Order matters: `Medium` takes the first
/// [`MEDIUM_SPECIALS`] entries.
pub const SPECIAL_SYMBOLS: &[u8] = b"!@#$%^&*()-_=+[]{};:,.?/";

pub const MEDIUM_SPECIALS: usize = 10;

/// Build the alphabet for a tier.
pub fn alphabet_for(tier: Tier) -> Vec<u8> {
    let mut chars = Vec::with_capacity(LOWERCASE.len() + UPPERCASE.len() + DIGITS.len() + SPECIAL_SYMBOLS.len());
    chars.extend_from_slice(LOWERCASE);
    chars.extend_from_slice(UPPERCASE);
    chars.extend_from_slice(DIGITS);

    match tier {
        Tier::Easy => {}
        Tier::Medium => chars.extend_from_slice(&SPECIAL_SYMBOLS[..MEDIUM_SPECIALS]),
        Tier::Hard => chars.extend_from_slice(SPECIAL_SYMBOLS),
    }

    chars
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::GeneratorError;
    use std::collections::HashSet;

    const LETTERS_AND_DIGITS: &str =
        "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

    #[test]
    fn canonical_special_list_is_fixed() {
        assert_eq!(SPECIAL_SYMBOLS, b"!@#$%^&*()-_=+[]{};:,.?/");
        assert_eq!(SPECIAL_SYMBOLS.len(), 24);
    }

    #[test]
    fn easy_is_letters_and_digits() {
        let alphabet = alphabet_for(Tier::Easy);
        assert_eq!(alphabet.len(), 62);
        assert_eq!(alphabet, LETTERS_AND_DIGITS.as_bytes());
    }

    #[test]
    fn medium_adds_first_ten_specials_in_order() {
        let alphabet = alphabet_for(Tier::Medium);
        assert_eq!(alphabet.len(), 72);
        assert_eq!(&alphabet[62..], b"!@#$%^&*()");
    }

    #[test]
    fn hard_adds_every_special() {
        let alphabet = alphabet_for(Tier::Hard);
        assert_eq!(alphabet.len(), 62 + 24);
        assert_eq!(&alphabet[62..], SPECIAL_SYMBOLS);
        let unique: HashSet<u8> = alphabet.iter().copied().collect();
        assert_eq!(unique.len(), alphabet.len());
    }

    #[test]
    fn named_tiers_resolve_to_the_same_alphabet() {
        let tier: Tier = "2".parse().unwrap();
        assert_eq!(alphabet_for(tier), alphabet_for(Tier::Medium));
        assert_eq!(
            "extreme".parse::<Tier>(),
            Err(GeneratorError::InvalidTier("extreme".to_string()))
        );
    }
}
