use anyhow::{Result, bail};
use std::hash::Hasher;
use twox_hash::XxHash64;

pub const DEFAULT_SEED: u64 = 1337;

/// A seed plus the CLI token it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedInfo {
    pub seed: u64,
    /// Set when the seed was derived from a word rather than a number.
    pub phrase: Option<String>,
}

impl SeedInfo {
    #[must_use]
    pub const fn from_numeric(seed: u64) -> Self {
        Self { seed, phrase: None }
    }

    #[must_use]
    pub fn from_phrase(phrase: &str) -> Self {
        let mut hasher = XxHash64::with_seed(0);
        hasher.write(phrase.to_ascii_lowercase().as_bytes());
        Self {
            seed: hasher.finish(),
            phrase: Some(phrase.to_string()),
        }
    }
}

/// Resolve CLI seed tokens. Integers are used as-is (negatives by magnitude),
/// alphanumeric words are hashed, and duplicates are dropped.
///
/// # Errors
///
/// Returns an error for tokens that are neither numbers nor plain words.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<SeedInfo>> {
    let mut resolved: Vec<SeedInfo> = Vec::new();
    for token in tokens {
        if token.is_empty() {
            continue;
        }
        let info = if let Ok(value) = token.parse::<u64>() {
            SeedInfo::from_numeric(value)
        } else if let Ok(value) = token.parse::<i64>() {
            SeedInfo::from_numeric(value.unsigned_abs())
        } else if token.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            SeedInfo::from_phrase(token)
        } else {
            bail!("Unrecognized seed token: {token}");
        };
        if !resolved.iter().any(|existing| existing.seed == info.seed) {
            resolved.push(info);
        }
    }

    if resolved.is_empty() {
        resolved.push(SeedInfo::from_numeric(DEFAULT_SEED));
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn numbers_and_words_resolve() {
        let seeds = resolve_seed_inputs(&tokens(&["42", "-7", "lisbon", "LISBON"])).unwrap();
        assert_eq!(seeds.len(), 3);
        assert_eq!(seeds[0], SeedInfo::from_numeric(42));
        assert_eq!(seeds[1].seed, 7);
        assert_eq!(seeds[2].phrase.as_deref(), Some("lisbon"));
        assert_eq!(seeds[2].seed, SeedInfo::from_phrase("Lisbon").seed);
    }

    #[test]
    fn empty_input_uses_default() {
        let seeds = resolve_seed_inputs(&[]).unwrap();
        assert_eq!(seeds, vec![SeedInfo::from_numeric(DEFAULT_SEED)]);
    }

    #[test]
    fn punctuation_is_rejected() {
        assert!(resolve_seed_inputs(&tokens(&["a/b"])).is_err());
    }
}
