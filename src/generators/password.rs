use rand::distributions::{Distribution, Uniform};
use rand::rngs::OsRng;

use crate::models::Tier;

use super::charset::alphabet_for;
use super::{GeneratorError, Result};

pub struct PasswordGenerator;

impl PasswordGenerator {
    pub fn new() -> Self {
        PasswordGenerator
    }

    /// Draw `length` symbols uniformly, with replacement, from the tier's
    /// alphabet using the operating system RNG.
    pub fn generate(&self, length: i64, tier: Tier) -> Result<String> {
        let length = checked_length(length)?;
        draw(length, &alphabet_for(tier))
    }
}

impl Default for PasswordGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn checked_length(length: i64) -> Result<usize> {
    if length <= 0 {
        return Err(GeneratorError::InvalidLength(length));
    }
    usize::try_from(length).map_err(|_| GeneratorError::InvalidLength(length))
}

fn draw(length: usize, alphabet: &[u8]) -> Result<String> {
    if alphabet.is_empty() {
        return Err(GeneratorError::EmptyAlphabet);
    }

    let dist = Uniform::from(0..alphabet.len());
    let mut rng = OsRng;

    Ok((0..length)
        .map(|_| alphabet[dist.sample(&mut rng)] as char)
        .collect())
}
