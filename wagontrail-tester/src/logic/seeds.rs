use anyhow::{Result, bail};
use std::collections::HashSet;
use wagontrail_game::{Difficulty, decode};

/// Seed plus where it came from. Share codes pin their own difficulty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedInfo {
    pub seed: u64,
    pub code: Option<String>,
    pub difficulty: Option<Difficulty>,
}

impl SeedInfo {
    #[must_use]
    pub fn from_numeric(seed: u64) -> Self {
        Self {
            seed,
            code: None,
            difficulty: None,
        }
    }

    #[must_use]
    pub fn from_share_code(seed: u64, difficulty: Difficulty, code: String) -> Self {
        Self {
            seed,
            code: Some(code),
            difficulty: Some(difficulty),
        }
    }

    /// Difficulty for this seed: the share code's own, else `fallback`.
    #[must_use]
    pub fn difficulty_or(&self, fallback: Difficulty) -> Difficulty {
        self.difficulty.unwrap_or(fallback)
    }

    /// Seed for the `iteration`-th replay. Iteration zero is the seed itself so
    /// a share code always replays its own journey first.
    #[must_use]
    pub fn iteration_seed(&self, iteration: usize) -> u64 {
        if iteration == 0 {
            return self.seed;
        }
        let salt = (iteration as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        (self.seed ^ salt).rotate_left(17)
    }

    /// Share code that replays the `iteration`-th run, when one exists.
    #[must_use]
    pub fn code_for(&self, iteration: usize, difficulty: Difficulty) -> Option<String> {
        if iteration == 0 && self.difficulty.is_none_or(|own| own == difficulty) {
            self.code.clone()
        } else {
            None
        }
    }
}

/// Resolve a list of CLI seed arguments into canonical seed metadata.
///
/// Supports literal integers (negative values use their magnitude) and share
/// codes such as `PI-PRAIRIE42`. Duplicates are dropped; an empty list falls
/// back to seed 1337.
///
/// # Errors
///
/// Returns an error for a token that is neither a number nor a valid code.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<SeedInfo>> {
    let mut resolved: Vec<SeedInfo> = Vec::new();
    let mut seen: HashSet<(u64, Option<Difficulty>)> = HashSet::new();

    for token in tokens {
        if token.is_empty() {
            continue;
        }

        let info = if let Ok(value) = token.parse::<u64>() {
            SeedInfo::from_numeric(value)
        } else if let Ok(value) = token.parse::<i64>() {
            SeedInfo::from_numeric(value.unsigned_abs())
        } else if let Some((difficulty, seed)) = decode(token) {
            SeedInfo::from_share_code(seed, difficulty, token.to_uppercase())
        } else {
            bail!("Unrecognized seed token: {token}");
        };

        if seen.insert((info.seed, info.difficulty)) {
            resolved.push(info);
        }
    }

    if resolved.is_empty() {
        resolved.push(SeedInfo::from_numeric(1337));
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn resolves_numeric_and_share_code() {
        let seeds = resolve_seed_inputs(&tokens(&["42", "-7", "st-wagon12"])).unwrap();
        assert_eq!(seeds.len(), 3);
        assert!(seeds.iter().any(|s| s.seed == 42 && s.code.is_none()));
        assert!(seeds.iter().any(|s| s.seed == 7 && s.code.is_none()));
        let shared = seeds.iter().find(|s| s.code.is_some()).unwrap();
        assert_eq!(shared.code.as_deref(), Some("ST-WAGON12"));
        assert_eq!(shared.difficulty, Some(Difficulty::Settler));
        assert_eq!(shared.difficulty_or(Difficulty::Trailblazer), Difficulty::Settler);
        assert_eq!(
            shared.code_for(0, Difficulty::Settler).as_deref(),
            Some("ST-WAGON12")
        );
        assert_eq!(shared.code_for(1, Difficulty::Settler), None);
    }

    #[test]
    fn rejects_garbage_and_dedupes() {
        assert!(resolve_seed_inputs(&tokens(&["XX-NOTAWORD99"])).is_err());
        let seeds = resolve_seed_inputs(&tokens(&["5", "5", ""])).unwrap();
        assert_eq!(seeds, vec![SeedInfo::from_numeric(5)]);
    }

    #[test]
    fn empty_input_defaults() {
        let seeds = resolve_seed_inputs(&[]).unwrap();
        assert_eq!(seeds[0].seed, 1337);
    }

    #[test]
    fn iterations_fan_out_from_the_seed() {
        let info = SeedInfo::from_numeric(99);
        assert_eq!(info.iteration_seed(0), 99);
        assert_ne!(info.iteration_seed(1), 99);
        assert_ne!(info.iteration_seed(1), info.iteration_seed(2));
        assert_eq!(info.iteration_seed(3), info.iteration_seed(3));
    }
}
