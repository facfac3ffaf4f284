use std::collections::BTreeMap;

/// Exact occurrence counts of discrete values.
///
/// Keys are kept in ascending order so that iteration yields a ready-made
/// distribution table (e.g. "how many brackets had 0..=8 exact seed matches").
///
/// # Examples
///
/// ```
/// use podium_stats::frequency::Frequency;
///
/// let freq = Frequency::new(["Sr", "Jr", "Sr"]);
/// assert_eq!(freq.count(&"Sr"), 2);
/// assert_eq!(freq.count(&"Fr"), 0);
/// assert_eq!(freq.iter().next(), Some((&"Jr", 1)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frequency<K> {
    counts: BTreeMap<K, usize>,
    total: usize,
}

impl<K> Default for Frequency<K> {
    fn default() -> Self {
        Self {
            counts: BTreeMap::new(),
            total: 0,
        }
    }
}

impl<K> Frequency<K>
where
    K: Ord,
{
    /// Counts every value yielded by `values`.
    #[must_use]
    pub fn new<I>(values: I) -> Self
    where
        I: IntoIterator<Item = K>,
    {
        let mut freq = Self::default();
        for value in values {
            freq.add(value);
        }
        freq
    }

    /// Builds a frequency table that reports zero for every key in `keys`
    /// even when no value matched it.
    ///
    /// ```
    /// # use podium_stats::frequency::Frequency;
    /// let freq = Frequency::with_keys(0..=3, [1, 1, 3]);
    /// let table: Vec<_> = freq.iter().map(|(k, c)| (*k, c)).collect();
    /// assert_eq!(table, vec![(0, 0), (1, 2), (2, 0), (3, 1)]);
    /// ```
    #[must_use]
    pub fn with_keys<KI, VI>(keys: KI, values: VI) -> Self
    where
        KI: IntoIterator<Item = K>,
        VI: IntoIterator<Item = K>,
    {
        let mut freq = Self {
            counts: keys.into_iter().map(|k| (k, 0)).collect(),
            total: 0,
        };
        for value in values {
            freq.add(value);
        }
        freq
    }

    /// Records one occurrence of `value`.
    pub fn add(&mut self, value: K) {
        *self.counts.entry(value).or_default() += 1;
        self.total += 1;
    }

    /// Number of occurrences of `value`.
    #[must_use]
    pub fn count(&self, value: &K) -> usize {
        self.counts.get(value).copied().unwrap_or(0)
    }

    /// Total number of recorded values.
    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Share of `value` among all recorded values, in percent.
    ///
    /// Returns `0.0` for an empty table.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn percent(&self, value: &K) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            100.0 * self.count(value) as f64 / self.total as f64
        }
    }

    /// Iterates `(value, count)` pairs in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, usize)> {
        self.counts.iter().map(|(k, c)| (k, *c))
    }

    /// Returns `true` if no value has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_frequency() {
        let freq = Frequency::<u32>::new([]);
        assert!(freq.is_empty());
        assert_eq!(freq.percent(&1), 0.0);
    }

    #[test]
    fn test_counts_and_percent() {
        let freq = Frequency::new([2, 2, 3, 5]);
        assert_eq!(freq.count(&2), 2);
        assert_eq!(freq.total(), 4);
        assert_eq!(freq.percent(&2), 50.0);
        assert_eq!(freq.percent(&4), 0.0);
    }

    #[test]
    fn test_with_keys_keeps_zero_rows() {
        let freq = Frequency::with_keys(0..=8, [8, 8]);
        assert_eq!(freq.iter().count(), 9);
        assert_eq!(freq.count(&0), 0);
        assert_eq!(freq.count(&8), 2);
    }
}
