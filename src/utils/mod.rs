use std::time::{Duration, Instant};
use tracing::info;

/// A simple wall-clock timer for logging elapsed time.
pub struct Timer {
    label: String,
    start: Instant,
}

impl Timer {
    pub fn start(label: impl Into<String>) -> Self {
        let label = label.into();
        info!("⏱  Starting: {}", label);
        Self {
            label,
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        info!(
            "⏱  Finished: {} (took {:.2?})",
            self.label,
            self.elapsed()
        );
    }
}

/// Format a large integer with thousands separators.
pub fn format_with_commas(n: i64) -> String {
    let s = n.unsigned_abs().to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    if n < 0 {
        result.push('-');
    }
    result.chars().rev().collect()
}

/// Compact card value: whole thousands below a million, millions above.
/// 1500 → "1 K" | 2000000 → "2 M" | 2500000 → "2.5 M"
pub fn format_number(n: i64) -> String {
    if n >= 1_000_000 {
        if n % 1_000_000 == 0 {
            return format!("{} M", n / 1_000_000);
        }
        return format!("{:.1} M", n as f64 / 1_000_000.0);
    }
    format!("{} K", n / 1000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_with_commas() {
        assert_eq!(format_with_commas(1_234_567), "1,234,567");
        assert_eq!(format_with_commas(0), "0");
        assert_eq!(format_with_commas(-42_000), "-42,000");
        assert_eq!(format_with_commas(999), "999");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(999), "0 K");
        assert_eq!(format_number(1500), "1 K");
        assert_eq!(format_number(999_999), "999 K");
        assert_eq!(format_number(1_000_000), "1 M");
        assert_eq!(format_number(2_000_000), "2 M");
        assert_eq!(format_number(2_500_000), "2.5 M");
        assert_eq!(format_number(2_000_001), "2.0 M");
    }
}
