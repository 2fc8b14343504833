//! Network-free classifier for load testing.

use super::types::Outcome;

/// Sum of the address's code points, modulo 100.
pub fn mock_bucket(email: &str) -> u64 {
    email.chars().map(u64::from).sum::<u64>() % 100
}

pub fn classify(email: &str) -> Outcome {
    classify_bucket(mock_bucket(email))
}

fn classify_bucket(bucket: u64) -> Outcome {
    match bucket {
        0..10 => Outcome::MockUndeliverable,
        10..30 => Outcome::MockRisky,
        _ => Outcome::MockDeliverable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_of_short_address() {
        // a=97 @=64 b=98 .=46 c=99 o=111 m=109
        assert_eq!(mock_bucket("a@b.com"), 24);
        assert_eq!(classify("a@b.com"), Outcome::MockRisky);
    }

    #[test]
    fn bucket_boundaries() {
        assert_eq!(classify_bucket(0), Outcome::MockUndeliverable);
        assert_eq!(classify_bucket(9), Outcome::MockUndeliverable);
        assert_eq!(classify_bucket(10), Outcome::MockRisky);
        assert_eq!(classify_bucket(29), Outcome::MockRisky);
        assert_eq!(classify_bucket(30), Outcome::MockDeliverable);
        assert_eq!(classify_bucket(99), Outcome::MockDeliverable);
    }

    #[test]
    fn non_ascii_code_points_count_fully() {
        // 'é' is U+00E9 = 233
        assert_eq!(mock_bucket("é"), 33);
    }
}
