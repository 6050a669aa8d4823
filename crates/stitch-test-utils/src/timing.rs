//! Timing helpers for stitching tests
//!
//! A full-page capture sleeps for the stabilization delay after every
//! scroll, so its wall-clock time has a known lower bound. These helpers
//! measure an operation and assert it stayed inside a window.
//!
//! - [`measure_sync`]: Time a closure
//! - [`minimum_stitch_duration`]: Lower bound for a number of scrolls
//! - [`assert_duration_below`]: Assert duration is under threshold
//! - [`assert_duration_above`]: Assert duration exceeds minimum

use std::time::{Duration, Instant};

/// Measures the duration of a synchronous operation
///
/// # Example
///
/// ```
/// use stitch_test_utils::timing::measure_sync;
///
/// let (sum, duration) = measure_sync("sum", || (1..=10).sum::<u32>());
/// assert_eq!(sum, 55);
/// assert!(duration.as_secs() < 1);
/// ```
pub fn measure_sync<F, T>(name: &str, f: F) -> (T, Duration)
where
    F: FnOnce() -> T,
{
    let start = Instant::now();
    let result = f();
    let elapsed = start.elapsed();
    println!("[TIMING] {}: {:.2}ms", name, elapsed.as_secs_f64() * 1000.0);
    (result, elapsed)
}

/// Lower bound on the duration of a capture that scrolls `scrolls` times
/// with `wait` after each scroll
pub fn minimum_stitch_duration(wait: Duration, scrolls: usize) -> Duration {
    wait * scrolls as u32
}

/// Asserts that a duration is below a threshold
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use stitch_test_utils::timing::assert_duration_below;
///
/// assert_duration_below(Duration::from_millis(500), Duration::from_secs(1), "stitch");
/// ```
///
/// # Panics
///
/// Panics if `actual > threshold` with a message showing the excess time.
pub fn assert_duration_below(actual: Duration, threshold: Duration, operation: &str) {
    assert!(
        actual <= threshold,
        "{} took {:.3}s, expected <={:.3}s ({}ms over threshold)",
        operation,
        actual.as_secs_f64(),
        threshold.as_secs_f64(),
        (actual.as_millis() as i128) - (threshold.as_millis() as i128)
    );
}

/// Asserts that a duration is above a minimum
///
/// Catches a capture that skipped its stabilization delays.
///
/// # Panics
///
/// Panics if `actual < minimum`.
pub fn assert_duration_above(actual: Duration, minimum: Duration, operation: &str) {
    assert!(
        actual >= minimum,
        "{} took {:.3}s, expected >={:.3}s (delays skipped?)",
        operation,
        actual.as_secs_f64(),
        minimum.as_secs_f64()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_sync() {
        let (result, duration) = measure_sync("sleep", || {
            std::thread::sleep(Duration::from_millis(2));
            42
        });
        assert_eq!(result, 42);
        assert!(duration >= Duration::from_millis(2));
    }

    #[test]
    fn test_minimum_stitch_duration() {
        assert_eq!(
            minimum_stitch_duration(Duration::from_millis(20), 9),
            Duration::from_millis(180)
        );
        assert_eq!(minimum_stitch_duration(Duration::ZERO, 9), Duration::ZERO);
    }

    #[test]
    fn test_assert_duration_below_success() {
        assert_duration_below(Duration::from_millis(500), Duration::from_secs(1), "test");
    }

    #[test]
    fn test_assert_duration_above_success() {
        assert_duration_above(Duration::from_millis(1500), Duration::from_secs(1), "test");
    }

    #[test]
    #[should_panic(expected = "delays skipped")]
    fn test_assert_duration_above_panics() {
        assert_duration_above(Duration::from_millis(1), Duration::from_secs(1), "test");
    }
}
