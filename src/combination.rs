use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{binomial, COMBINATION_SIZE, MAX_NUMBER_RANGE};
use crate::error::{LotteryError, Result};

/// Four distinct ball numbers, stored in ascending order.
///
/// Two combinations are equal exactly when they hold the same numbers,
/// whatever order the balls came out of the machine in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Combination([u8; COMBINATION_SIZE]);

impl Combination {
    /// Canonicalize drawn numbers, rejecting duplicates and numbers outside 1..=range.
    pub fn new(mut numbers: [u8; COMBINATION_SIZE], range: u8) -> Result<Self> {
        numbers.sort_unstable();

        if let Some(&n) = numbers.iter().find(|&&n| n == 0 || n > range) {
            return Err(LotteryError::InvalidCombination {
                reason: format!("number {} is outside 1-{}", n, range),
            });
        }
        if numbers.windows(2).any(|w| w[0] == w[1]) {
            return Err(LotteryError::InvalidCombination {
                reason: "numbers must be distinct".to_string(),
            });
        }

        Ok(Combination(numbers))
    }

    /// Same as [`Combination::new`] for input of unchecked length.
    pub fn from_slice(numbers: &[u8], range: u8) -> Result<Self> {
        let numbers: [u8; COMBINATION_SIZE] =
            numbers.try_into().map_err(|_| LotteryError::InvalidCombination {
                reason: format!("expected {} numbers, got {}", COMBINATION_SIZE, numbers.len()),
            })?;
        Self::new(numbers, range)
    }

    /// Parse whitespace- or comma-separated numbers.
    pub fn parse(s: &str, range: u8) -> Result<Self> {
        let numbers = s
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<u8>().map_err(|_| LotteryError::InvalidCombination {
                    reason: format!("'{}' is not a ball number", part),
                })
            })
            .collect::<Result<Vec<u8>>>()?;
        Self::from_slice(&numbers, range)
    }

    pub fn numbers(&self) -> [u8; COMBINATION_SIZE] {
        self.0
    }

    /// Position of this combination in colexicographic order.
    ///
    /// Ranks are dense: every combination drawn from 1..=n ranks below C(n, 4),
    /// independent of n, so the rank can index a flat table.
    pub fn rank(&self) -> usize {
        self.0
            .iter()
            .enumerate()
            .map(|(i, &n)| binomial(n as u64 - 1, i as u64 + 1) as usize)
            .sum()
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "{} {} {} {}", a, b, c, d)
    }
}

impl FromStr for Combination {
    type Err = LotteryError;

    /// Accepts any ball up to `MAX_NUMBER_RANGE`, so combinations from every
    /// valid format read back. Lookups against a round reject numbers outside
    /// that round's own range.
    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s, MAX_NUMBER_RANGE)
    }
}

impl TryFrom<String> for Combination {
    type Error = LotteryError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Combination> for String {
    fn from(c: Combination) -> Self {
        c.to_string()
    }
}

/// Size of the combination universe for balls 1..=range.
pub fn universe_size(range: u8) -> u64 {
    binomial(range as u64, COMBINATION_SIZE as u64)
}

/// Every 4-number combination from 1..=range, in lexicographic order.
pub fn all_combinations(range: u8) -> Vec<Combination> {
    let mut combos = Vec::with_capacity(universe_size(range) as usize);
    for a in 1..=range {
        for b in a + 1..=range {
            for c in b + 1..=range {
                for d in c + 1..=range {
                    combos.push(Combination([a, b, c, d]));
                }
            }
        }
    }
    combos
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::NUMBER_RANGE;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_universe_size() {
        let combos = all_combinations(NUMBER_RANGE);
        assert_eq!(combos.len(), 1001);
        assert_eq!(universe_size(NUMBER_RANGE), 1001);

        let unique: HashSet<_> = combos.iter().collect();
        assert_eq!(unique.len(), 1001);
    }

    #[test]
    fn test_small_ranges() {
        assert_eq!(all_combinations(4).len(), 1);
        assert!(all_combinations(3).is_empty());
        assert_eq!(all_combinations(12).len(), 495);
    }

    #[test]
    fn test_canonical_order() {
        let combo = Combination::new([9, 2, 14, 5], NUMBER_RANGE).unwrap();
        assert_eq!(combo.numbers(), [2, 5, 9, 14]);
        assert_eq!(combo.to_string(), "2 5 9 14");
        assert_eq!(combo, Combination::new([14, 9, 5, 2], NUMBER_RANGE).unwrap());
    }

    #[test]
    fn test_rejects_bad_numbers() {
        assert!(Combination::new([0, 1, 2, 3], NUMBER_RANGE).is_err());
        assert!(Combination::new([1, 2, 3, 15], NUMBER_RANGE).is_err());
        assert!(Combination::new([1, 2, 2, 3], NUMBER_RANGE).is_err());
        assert!(Combination::from_slice(&[1, 2, 3], NUMBER_RANGE).is_err());
    }

    #[test]
    fn test_parse() {
        let combo: Combination = "4 3 2 1".parse().unwrap();
        assert_eq!(combo.numbers(), [1, 2, 3, 4]);
        assert_eq!(Combination::parse("1, 2, 3, 13", NUMBER_RANGE).unwrap().to_string(), "1 2 3 13");
        assert!("1 2 x 4".parse::<Combination>().is_err());
    }

    #[test]
    fn test_rank_is_dense() {
        let ranks: Vec<usize> = all_combinations(NUMBER_RANGE).iter().map(|c| c.rank()).collect();
        let unique: HashSet<_> = ranks.iter().collect();
        assert_eq!(unique.len(), 1001);
        assert_eq!(*ranks.iter().max().unwrap(), 1000);
        assert_eq!(Combination::new([1, 2, 3, 4], NUMBER_RANGE).unwrap().rank(), 0);
    }

    #[test]
    fn test_serde_as_string() {
        let combo = Combination::new([7, 1, 3, 12], NUMBER_RANGE).unwrap();
        let json = serde_json::to_string(&combo).unwrap();
        assert_eq!(json, "\"1 3 7 12\"");
        let back: Combination = serde_json::from_str(&json).unwrap();
        assert_eq!(back, combo);
    }

    #[test]
    fn test_serde_wide_range() {
        let combo = Combination::new([1, 2, 3, 20], 20).unwrap();
        let json = serde_json::to_string(&combo).unwrap();
        assert_eq!(json, "\"1 2 3 20\"");
        let back: Combination = serde_json::from_str(&json).unwrap();
        assert_eq!(back, combo);

        assert!(serde_json::from_str::<Combination>("\"1 2 3 41\"").is_err());
    }

    proptest! {
        #[test]
        fn prop_order_does_not_matter(
            numbers in proptest::sample::subsequence((1u8..=14).collect::<Vec<_>>(), 4).prop_shuffle()
        ) {
            let combo = Combination::from_slice(&numbers, NUMBER_RANGE).unwrap();
            let mut sorted = numbers.clone();
            sorted.sort_unstable();
            prop_assert_eq!(combo.numbers().to_vec(), sorted);
            prop_assert!(combo.rank() < 1001);
        }
    }
}
