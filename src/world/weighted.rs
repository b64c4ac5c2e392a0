use rand::Rng;
use std::fmt;

/// Errors from a weighted pick
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionError {
    /// The table has no entries or every weight is zero
    NoWeight,
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionError::NoWeight => write!(f, "weighted table has zero total weight"),
        }
    }
}

impl std::error::Error for SelectionError {}

/// Cumulative-weight lookup table.
///
/// Each entry stores the running total up to and including itself, so a single
/// uniform draw in `[0, total)` selects the first entry whose bound exceeds it.
#[derive(Debug, Clone)]
pub struct WeightedTable<T> {
    entries: Vec<(u32, T)>,
    total: u32,
}

impl<T: Copy> WeightedTable<T> {
    pub fn new(choices: &[(u32, T)]) -> Self {
        let mut total = 0u32;
        let entries = choices
            .iter()
            .filter(|(weight, _)| *weight > 0)
            .map(|&(weight, item)| {
                total = total.saturating_add(weight);
                (total, item)
            })
            .collect();

        Self { entries, total }
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<T, SelectionError> {
        if self.total == 0 {
            return Err(SelectionError::NoWeight);
        }

        let draw = rng.gen_range(0..self.total);
        self.entries
            .iter()
            .find(|(bound, _)| draw < *bound)
            .map(|&(_, item)| item)
            .ok_or(SelectionError::NoWeight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_empty_table_fails() {
        let table: WeightedTable<u8> = WeightedTable::new(&[]);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(table.pick(&mut rng), Err(SelectionError::NoWeight));
    }

    #[test]
    fn test_zero_weights_fail() {
        let table = WeightedTable::new(&[(0, 'a'), (0, 'b')]);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(table.total(), 0);
        assert!(table.pick(&mut rng).is_err());
    }

    #[test]
    fn test_zero_weight_entry_never_picked() {
        let table = WeightedTable::new(&[(0, 'a'), (5, 'b')]);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1_000 {
            assert_eq!(table.pick(&mut rng), Ok('b'));
        }
    }

    #[test]
    fn test_distribution_follows_weights() {
        let table = WeightedTable::new(&[(3, 0usize), (1, 1usize)]);
        let mut rng = StdRng::seed_from_u64(42);
        let mut counts = [0u32; 2];
        for _ in 0..40_000 {
            counts[table.pick(&mut rng).unwrap()] += 1;
        }
        let share = f64::from(counts[0]) / 40_000.0;
        assert!((share - 0.75).abs() < 0.02, "share was {}", share);
    }
}
