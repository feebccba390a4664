/// Highest number on a lottery ball (balls are numbered 1..=NUMBER_RANGE)
pub const NUMBER_RANGE: u8 = 14;

/// Widest configurable ball range. C(40, 4) = 91,390 combinations keeps the
/// rank-indexed tables small.
pub const MAX_NUMBER_RANGE: u8 = 40;

/// Balls drawn per combination
pub const COMBINATION_SIZE: usize = 4;

/// Tickets handed out across a whole league
pub const TOTAL_TICKETS: u32 = 1000;

/// Fewest teams a league may be configured with
pub const MIN_TEAMS: usize = 2;

/// Most teams a league may be configured with
pub const MAX_TEAMS: usize = 30;

/// Monte Carlo trials run when the caller does not choose
pub const DEFAULT_TRIALS: usize = 10_000;

/// Accepted trial counts for an interactive simulation run
pub const MIN_TRIALS: usize = 1_000;
pub const MAX_TRIALS: usize = 200_000;

/// Decimal places kept on simulated and live percentages
pub const PERCENT_DECIMALS: i32 = 4;

/// Decimal places kept on a team's original ticket share
pub const SHARE_DECIMALS: i32 = 2;

/// Round `value` to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Number of ways to choose `k` items from `n`.
pub fn binomial(n: u64, k: u64) -> u64 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result = 1u64;
    for i in 0..k {
        result = result * (n - i) / (i + 1);
    }
    result
}
