/// Running episode counter for one season scope.
///
/// Explicit numbers are taken as-is and raise the counter to at least that
/// value; everything else gets the next number after the counter.
#[derive(Debug, Default, Clone)]
pub struct EpisodeSequencer {
    counter: u32,
}

impl EpisodeSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns the episode number for the next file in processing order.
    /// An explicit number of zero counts as no explicit number.
    ///
    /// Returns `None` when the counter has no next number, which only
    /// happens after an explicit number of `u32::MAX`.
    pub fn assign(&mut self, explicit: Option<u32>) -> Option<u32> {
        match explicit {
            Some(episode) if episode > 0 => {
                self.counter = self.counter.max(episode);
                Some(episode)
            }
            _ => {
                self.counter = self.counter.checked_add(1)?;
                Some(self.counter)
            }
        }
    }

    pub fn current(&self) -> u32 {
        self.counter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_numbering() {
        let mut seq = EpisodeSequencer::new();
        assert_eq!(seq.assign(None), Some(1));
        assert_eq!(seq.assign(None), Some(2));
        assert_eq!(seq.assign(None), Some(3));
    }

    #[test]
    fn test_explicit_number_sets_floor() {
        let mut seq = EpisodeSequencer::new();
        assert_eq!(seq.assign(Some(5)), Some(5));
        assert_eq!(seq.assign(None), Some(6));
    }

    #[test]
    fn test_lower_explicit_number_keeps_counter() {
        let mut seq = EpisodeSequencer::new();
        assert_eq!(seq.assign(None), Some(1));
        assert_eq!(seq.assign(Some(7)), Some(7));
        assert_eq!(seq.assign(Some(3)), Some(3));
        assert_eq!(seq.current(), 7);
        assert_eq!(seq.assign(None), Some(8));
    }

    #[test]
    fn test_zero_is_not_explicit() {
        let mut seq = EpisodeSequencer::new();
        assert_eq!(seq.assign(Some(0)), Some(1));
    }

    #[test]
    fn test_counter_exhausted() {
        let mut seq = EpisodeSequencer::new();
        assert_eq!(seq.assign(Some(u32::MAX)), Some(u32::MAX));
        assert_eq!(seq.assign(None), None);
        assert_eq!(seq.current(), u32::MAX);
        assert_eq!(seq.assign(Some(2)), Some(2));
    }
}
