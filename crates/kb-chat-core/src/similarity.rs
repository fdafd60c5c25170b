//! Bigram-overlap (Dice coefficient) similarity.
//!
//! Follows the convention of the `string-similarity` package's
//! `compareTwoStrings`, which the support dataset was tuned against:
//!
//! 1. All whitespace is removed from both inputs.
//! 2. Identical inputs score `1.0` (including identical inputs shorter than
//!    two characters).
//! 3. Otherwise, an input shorter than two characters scores `0.0`.
//! 4. Otherwise the score is `2 × |A ∩ B| / (|A| + |B|)`, where `A` and `B`
//!    are the bigram multisets and the intersection counts each bigram up to
//!    the smaller of its two multiplicities.
//!
//! Scores are always in `[0.0, 1.0]`.

use std::collections::HashMap;

/// Precomputed bigram multiset of one text.
///
/// The store builds one per entry at load time so that scoring a query is a
/// single pass over each profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BigramProfile {
    compact: String,
    counts: HashMap<(char, char), usize>,
    total: usize,
}

impl BigramProfile {
    pub fn new(text: &str) -> Self {
        let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        let chars: Vec<char> = compact.chars().collect();

        let mut counts = HashMap::new();
        for pair in chars.windows(2) {
            *counts.entry((pair[0], pair[1])).or_insert(0) += 1;
        }
        let total = chars.len().saturating_sub(1);

        Self {
            compact,
            counts,
            total,
        }
    }

    /// Number of bigrams, counting duplicates.
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Size of the multiset intersection with `other`.
    fn shared(&self, other: &BigramProfile) -> usize {
        let (small, large) = if self.counts.len() <= other.counts.len() {
            (self, other)
        } else {
            (other, self)
        };
        small
            .counts
            .iter()
            .map(|(bigram, n)| large.counts.get(bigram).map_or(0, |m| (*n).min(*m)))
            .sum()
    }

    /// Dice coefficient against another profile.
    pub fn dice(&self, other: &BigramProfile) -> f64 {
        if self.compact == other.compact {
            return 1.0;
        }
        if self.is_empty() || other.is_empty() {
            return 0.0;
        }
        (2 * self.shared(other)) as f64 / (self.total + other.total) as f64
    }
}

/// Dice coefficient between two texts. See the module docs for the
/// exact convention.
pub fn dice_coefficient(a: &str, b: &str) -> f64 {
    BigramProfile::new(a).dice(&BigramProfile::new(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_identical() {
        assert!(approx(dice_coefficient("certificado", "certificado"), 1.0));
    }

    #[test]
    fn test_disjoint() {
        assert!(approx(dice_coefficient("abc", "xyz"), 0.0));
    }

    #[test]
    fn test_short_strings() {
        assert!(approx(dice_coefficient("a", "a"), 1.0));
        assert!(approx(dice_coefficient("", ""), 1.0));
        assert!(approx(dice_coefficient("a", "b"), 0.0));
        assert!(approx(dice_coefficient("a", "ab"), 0.0));
        assert!(approx(dice_coefficient("", "abc"), 0.0));
    }

    #[test]
    fn test_whitespace_is_ignored() {
        assert!(approx(dice_coefficient("o pje", "opje"), 1.0));
        assert!(approx(
            dice_coefficient("como configurar", "comoconfigurar"),
            1.0
        ));
    }

    #[test]
    fn test_known_value() {
        // night: ni ig gh ht / nacht: na ac ch ht → shared {ht}
        assert!(approx(dice_coefficient("night", "nacht"), 0.25));
        // context / contact: co on nt te ex xt / co on nt ta ac ct → 3 shared
        assert!(approx(dice_coefficient("context", "contact"), 0.5));
    }

    #[test]
    fn test_duplicates_counted_to_min_multiplicity() {
        // aaaa: aa×3 / aa: aa×1 → 2×1 / (3+1)
        assert!(approx(dice_coefficient("aaaa", "aa"), 0.5));
        // ababab: ab×3 ba×2 / abab: ab×2 ba×1 → 2×3 / (5+3)
        assert!(approx(dice_coefficient("ababab", "abab"), 2.0 * 3.0 / 8.0));
    }

    #[test]
    fn test_symmetric() {
        let pairs = [
            ("nao consigo acessar o pje", "como configurar o pje"),
            ("certificado a3", "instalar certificado a1"),
            ("vidaas", "vidaas no celular"),
        ];
        for (a, b) in pairs {
            assert!(approx(dice_coefficient(a, b), dice_coefficient(b, a)));
        }
    }

    #[test]
    fn test_range() {
        let samples = ["", "a", "pje", "projudi", "como instalar o token a3", "aaaa"];
        for a in samples {
            for b in samples {
                let s = dice_coefficient(a, b);
                assert!((0.0..=1.0).contains(&s), "{} vs {} = {}", a, b, s);
            }
        }
    }

    #[test]
    fn test_exact_three_tenths() {
        // 10 bigrams each, 3 shared (ab bc cd): 6/20 is exactly 0.3.
        assert_eq!(dice_coefficient("abcdefghijk", "abcdxyzuvwq"), 0.3);
    }

    #[test]
    fn test_profile_len() {
        assert_eq!(BigramProfile::new("a b c").len(), 2);
        assert!(BigramProfile::new(" x ").is_empty());
    }
}
