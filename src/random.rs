use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seed used by [`SeededRandomGenerator::default`].
pub const DEFAULT_SEED: u64 = 3819201;

/// Source of uniformly distributed indices for the random strategies.
pub trait RandomGenerator: Default {
    /// Returns an index in `0..upper`, or `0` when `upper` is zero.
    fn next_index(&mut self, upper: usize) -> usize;

    /// Picks one element of `items` uniformly, or `None` if it is empty.
    fn choose<'a, K>(&mut self, items: &'a [K]) -> Option<&'a K> {
        if items.is_empty() {
            return None;
        }
        items.get(self.next_index(items.len()))
    }
}

/// Draws from the thread-local generator; not reproducible between runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardRandomGenerator;

impl RandomGenerator for StandardRandomGenerator {
    fn next_index(&mut self, upper: usize) -> usize {
        if upper <= 1 {
            return 0;
        }
        rand::rng().random_range(0..upper)
    }
}

/// A seeded generator that replays the same sequence for the same seed.
#[derive(Debug, Clone)]
pub struct SeededRandomGenerator {
    rng: StdRng,
}

impl SeededRandomGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for SeededRandomGenerator {
    fn default() -> Self {
        SeededRandomGenerator::new(DEFAULT_SEED)
    }
}

impl RandomGenerator for SeededRandomGenerator {
    fn next_index(&mut self, upper: usize) -> usize {
        if upper <= 1 {
            return 0;
        }
        self.rng.random_range(0..upper)
    }
}

#[cfg(test)]
mod tests {
    use crate::random::{RandomGenerator, SeededRandomGenerator, StandardRandomGenerator};

    #[test]
    fn same_seed_replays_same_indices() {
        let mut first = SeededRandomGenerator::new(42);
        let mut second = SeededRandomGenerator::new(42);
        let a: Vec<usize> = (0..32).map(|_| first.next_index(10)).collect();
        let b: Vec<usize> = (0..32).map(|_| second.next_index(10)).collect();
        assert_eq!(a, b);
        assert!(a.iter().all(|&i| i < 10));
    }

    #[test]
    fn choose_stays_inside_the_slice() {
        let vec = vec![432, 6542, 534, 6, 13, 645, 88, 2352, 345, 2667, 8287];
        let mut crg = SeededRandomGenerator::default();
        for _ in 0..100 {
            let picked = crg.choose(&vec).unwrap();
            assert!(vec.contains(picked));
        }
    }

    #[test]
    fn empty_and_single_ranges() {
        let mut rg = StandardRandomGenerator;
        let empty: [u8; 0] = [];
        assert_eq!(rg.choose(&empty), None);
        assert_eq!(rg.next_index(0), 0);
        assert_eq!(rg.choose(&[7]), Some(&7));
    }
}
