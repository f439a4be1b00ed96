use num_format::{Locale, ToFormattedString};

/// Thousands-grouped count, e.g. `91,234`.
pub fn count(n: u64) -> String {
    n.to_formatted_string(&Locale::en_GB)
}

/// Grouped count, or `?` for a value the payload could not provide.
pub fn maybe_count(n: Option<u64>) -> String {
    n.map(count).unwrap_or_else(|| "?".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(count(0), "0");
        assert_eq!(count(999), "999");
        assert_eq!(count(1000), "1,000");
        assert_eq!(count(91234567), "91,234,567");
    }

    #[test]
    fn unknown_counts_are_marked() {
        assert_eq!(maybe_count(None), "?");
        assert_eq!(maybe_count(Some(1500)), "1,500");
    }
}
