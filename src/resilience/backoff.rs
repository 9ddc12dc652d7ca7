//! Backoff delays between identity resolution attempts.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// How the delay grows with the attempt number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackoffStrategy {
    /// `base * attempt`.
    #[default]
    Linear,
    /// `base * 2^(attempt - 1)` with up to 10% jitter.
    Exponential,
}

/// Delay to wait after failed attempt number `attempt` (1-based).
pub fn backoff_delay(strategy: BackoffStrategy, attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    match strategy {
        BackoffStrategy::Linear => linear_backoff(attempt, base_ms, max_ms),
        BackoffStrategy::Exponential => calculate_backoff(attempt, base_ms, max_ms),
    }
}

/// Delay before the cap and jitter are applied. Zero for attempt 0.
fn uncapped_delay_ms(strategy: BackoffStrategy, attempt: u32, base_ms: u64) -> u64 {
    if attempt == 0 {
        return 0;
    }
    match strategy {
        BackoffStrategy::Linear => base_ms.saturating_mul(u64::from(attempt)),
        BackoffStrategy::Exponential => base_ms.saturating_mul(2u64.saturating_pow(attempt - 1)),
    }
}

/// Calculate linear backoff delay: the base unit scaled by the attempt count.
pub fn linear_backoff(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    let delay_ms = uncapped_delay_ms(BackoffStrategy::Linear, attempt, base_ms);
    Duration::from_millis(delay_ms.min(max_ms))
}

/// Calculate exponential backoff delay with up to 10% jitter on top of the capped delay.
pub fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    let capped_ms = uncapped_delay_ms(BackoffStrategy::Exponential, attempt, base_ms).min(max_ms);

    let jitter_range = capped_ms / 10;
    let jitter_ms = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped_ms + jitter_ms)
}

/// Smallest `max_ms` for which the delays of `attempts` attempts still strictly increase.
///
/// Only the final wait can be flattened by the cap: it must exceed the wait
/// before it, including that wait's worst-case jitter.
pub fn required_cap(strategy: BackoffStrategy, attempts: u32, base_ms: u64) -> u64 {
    let last_wait = attempts.saturating_sub(1);
    if last_wait < 2 {
        return 0;
    }
    let previous_ms = uncapped_delay_ms(strategy, last_wait - 1, base_ms);
    match strategy {
        BackoffStrategy::Linear => previous_ms.saturating_add(1),
        // Jitter on the previous wait is at most previous/10 - 1.
        BackoffStrategy::Exponential => previous_ms.saturating_add((previous_ms / 10).max(1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exponential_jitter_bounds() {
        for _ in 0..50 {
            let d1 = calculate_backoff(1, 100, 2000).as_millis();
            assert!((100..110).contains(&d1), "attempt 1 gave {}ms", d1);

            let d3 = calculate_backoff(3, 100, 2000).as_millis();
            assert!((400..440).contains(&d3), "attempt 3 gave {}ms", d3);

            let capped = calculate_backoff(10, 100, 1000).as_millis();
            assert!((1000..1100).contains(&capped), "capped gave {}ms", capped);
        }
        assert_eq!(calculate_backoff(0, 100, 1000), Duration::ZERO);
        assert_eq!(calculate_backoff(1, 5, 1000), Duration::from_millis(5));
    }

    #[test]
    fn test_linear_backoff_scales_with_attempt() {
        assert_eq!(linear_backoff(1, 100, 2000), Duration::from_millis(100));
        assert_eq!(linear_backoff(2, 100, 2000), Duration::from_millis(200));
        assert_eq!(linear_backoff(50, 100, 2000), Duration::from_millis(2000));
    }

    #[test]
    fn test_delays_strictly_increase() {
        for strategy in [BackoffStrategy::Linear, BackoffStrategy::Exponential] {
            let mut previous = Duration::ZERO;
            for attempt in 1..5 {
                let delay = backoff_delay(strategy, attempt, 100, 10_000);
                assert!(delay > previous, "{:?} attempt {}", strategy, attempt);
                previous = delay;
            }
        }
    }

    #[test]
    fn test_required_cap() {
        // Three attempts wait 100ms then 200ms; any cap above 100 keeps growth.
        assert_eq!(required_cap(BackoffStrategy::Linear, 3, 100), 101);
        // Four attempts wait ~100, ~200, ~400; the last must beat 200 plus jitter.
        assert_eq!(required_cap(BackoffStrategy::Exponential, 4, 100), 220);
        assert_eq!(required_cap(BackoffStrategy::Linear, 2, 100), 0);
        assert_eq!(required_cap(BackoffStrategy::Linear, 1, 100), 0);
    }

    #[test]
    fn test_capped_delays_at_required_cap_still_increase() {
        for (strategy, attempts) in [(BackoffStrategy::Linear, 3), (BackoffStrategy::Exponential, 4)] {
            let cap = required_cap(strategy, attempts, 100);
            for _ in 0..50 {
                let delays: Vec<Duration> = (1..attempts)
                    .map(|attempt| backoff_delay(strategy, attempt, 100, cap))
                    .collect();
                assert!(
                    delays.windows(2).all(|w| w[0] < w[1]),
                    "{:?} with cap {} gave {:?}",
                    strategy,
                    cap,
                    delays
                );
            }
        }
    }
}
