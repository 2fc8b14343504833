use rand::{Rng, distributions::Alphanumeric};

/// Produces the local part used for the catch-all `RCPT TO`.
pub trait LocalPartGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Random lowercase alphanumeric local parts.
#[derive(Debug, Clone)]
pub struct RandomLocalPart {
    len: usize,
}

impl RandomLocalPart {
    pub fn new(len: usize) -> Self {
        Self {
            len: len.clamp(6, 32),
        }
    }
}

impl Default for RandomLocalPart {
    fn default() -> Self {
        Self::new(12)
    }
}

impl LocalPartGenerator for RandomLocalPart {
    fn generate(&self) -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(self.len)
            .map(|byte| char::from(byte).to_ascii_lowercase())
            .collect()
    }
}

/// Always returns the same local part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedLocalPart(pub String);

impl LocalPartGenerator for FixedLocalPart {
    fn generate(&self) -> String {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_local_part_is_clamped_alphanumeric() {
        let short = RandomLocalPart::new(1).generate();
        assert_eq!(short.len(), 6);
        let long = RandomLocalPart::new(500).generate();
        assert_eq!(long.len(), 32);
        assert!(
            long.chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        );
    }

    #[test]
    fn fixed_local_part_repeats() {
        let fixed = FixedLocalPart("probe".to_string());
        assert_eq!(fixed.generate(), "probe");
        assert_eq!(fixed.generate(), "probe");
    }
}
