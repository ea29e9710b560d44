//! Player score with a zero floor

/// Running score; deductions saturate at zero
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Score {
    value: u64,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> u64 {
        self.value
    }

    pub fn add(&mut self, points: u64) {
        self.value += points;
    }

    pub fn deduct(&mut self, points: u64) {
        self.value = self.value.saturating_sub(points);
    }

    pub fn set(&mut self, value: u64) {
        self.value = value;
    }

    pub fn reset(&mut self) {
        self.value = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_get() {
        let mut score = Score::new();
        score.add(150);
        score.add(50);
        assert_eq!(score.get(), 200);
    }

    #[test]
    fn test_deduct_floors_at_zero() {
        let mut score = Score::new();
        score.add(40);
        score.deduct(100);
        assert_eq!(score.get(), 0);
    }

    #[test]
    fn test_reset() {
        let mut score = Score::new();
        score.add(500);
        score.reset();
        assert_eq!(score.get(), 0);
    }
}
