//! Target selection for game rounds

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Picks which cat the next round targets
pub trait TargetSource: Send + Sync {
    /// Index in `0..count`
    fn pick(&mut self, count: usize) -> usize;
}

/// Uniform random targets
pub struct RandomTargets {
    rng: StdRng,
}

impl RandomTargets {
    /// Seeded runs repeat the same target sequence
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }
}

impl TargetSource for RandomTargets {
    fn pick(&mut self, count: usize) -> usize {
        if count == 0 {
            return 0;
        }
        self.rng.gen_range(0..count)
    }
}

/// Fixed target sequence, cycling when exhausted
#[derive(Debug, Clone, Default)]
pub struct ScriptedTargets {
    sequence: Vec<usize>,
    next: usize,
}

impl ScriptedTargets {
    pub fn new(sequence: Vec<usize>) -> Self {
        Self { sequence, next: 0 }
    }
}

impl TargetSource for ScriptedTargets {
    fn pick(&mut self, count: usize) -> usize {
        if self.sequence.is_empty() || count == 0 {
            return 0;
        }
        let target = self.sequence[self.next % self.sequence.len()];
        self.next += 1;
        target % count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_targets_repeat() {
        let mut a = RandomTargets::new(Some(7));
        let mut b = RandomTargets::new(Some(7));
        let first: Vec<usize> = (0..20).map(|_| a.pick(3)).collect();
        let second: Vec<usize> = (0..20).map(|_| b.pick(3)).collect();
        assert_eq!(first, second);
        assert!(first.iter().all(|&t| t < 3));
    }

    #[test]
    fn test_random_targets_are_uniform() {
        let mut targets = RandomTargets::new(Some(42));
        let mut counts = [0u32; 3];
        for _ in 0..3000 {
            counts[targets.pick(3)] += 1;
        }
        // 1000 expected per cat; 850..1150 is several standard deviations wide
        for (cat, count) in counts.iter().enumerate() {
            assert!((850..=1150).contains(count), "cat {} picked {} times: {:?}", cat, count, counts);
        }
    }

    #[test]
    fn test_scripted_targets_cycle() {
        let mut targets = ScriptedTargets::new(vec![1, 2, 0]);
        let picks: Vec<usize> = (0..5).map(|_| targets.pick(3)).collect();
        assert_eq!(picks, vec![1, 2, 0, 1, 2]);
    }

    #[test]
    fn test_scripted_targets_stay_in_range() {
        let mut targets = ScriptedTargets::new(vec![5]);
        assert_eq!(targets.pick(3), 2);
        assert_eq!(ScriptedTargets::default().pick(3), 0);
    }
}
