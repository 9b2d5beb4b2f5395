/// Enumerates the k-subsets of `0..n` in lexicographic order.
///
/// In extended mode, the enumeration continues with the (k-1)-subsets once the
/// k-subsets are exhausted, down to subsets of size one.
///
/// The iterator may be one of several striding iterators created by [split]. It then
/// only visits every `step`-th subset of the full sequence, starting at its offset.
///
/// [CombinationIterator::peek] does not advance the iterator. The current subset stays
/// the same until it is consumed with [CombinationIterator::confirm].
#[derive(Clone, Debug)]
pub struct CombinationIterator {
    n: usize,
    step: usize,
    extended: bool,
    combination: Vec<usize>,
    confirmed: bool,
    exhausted: bool,
}

impl CombinationIterator {
    /// Create a new iterator over the k-subsets of `0..n`.
    ///
    /// ```rust
    /// use hypertree::CombinationIterator;
    ///
    /// let subsets: Vec<_> = CombinationIterator::new(4, 2, false).collect();
    /// assert_eq!(subsets, [[0, 1], [0, 2], [0, 3], [1, 2], [1, 3], [2, 3]]);
    /// ```
    pub fn new(n: usize, k: usize, extended: bool) -> Self {
        Self::with_offset(n, k, extended, 0, 1)
    }

    fn with_offset(n: usize, k: usize, extended: bool, offset: usize, step: usize) -> Self {
        debug_assert!(step > 0);
        // In extended mode, the sizes larger than n are skipped instead of ending the enumeration.
        let k = if extended { k.min(n) } else { k };
        let exhausted = k == 0 || k > n;
        let mut iter = Self { n, step, extended, combination: (0..k).collect(), confirmed: false, exhausted };
        for _ in 0..offset {
            if !iter.advance() {
                break;
            }
        }
        iter
    }

    /// Return the current subset without consuming it.
    pub fn peek(&mut self) -> Option<&[usize]> {
        if self.confirmed {
            self.confirmed = false;
            for _ in 0..self.step {
                if !self.advance() {
                    break;
                }
            }
        }
        if self.exhausted {
            None
        } else {
            Some(&self.combination)
        }
    }

    /// Consume the current subset. The next call to [CombinationIterator::peek] moves on.
    pub fn confirm(&mut self) {
        self.confirmed = true;
    }

    /// Returns whether the enumeration is over.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Move to the next subset of the full sequence.
    fn advance(&mut self) -> bool {
        if self.exhausted {
            return false;
        }
        let (n, k) = (self.n, self.combination.len());
        let c = &mut self.combination;
        if let Some(i) = (0..k).rev().find(|&i| c[i] < n - k + i) {
            c[i] += 1;
            for j in i + 1..k {
                c[j] = c[j - 1] + 1;
            }
            return true;
        }
        if self.extended && k > 1 {
            c.truncate(k - 1);
            c.iter_mut().enumerate().for_each(|(i, x)| *x = i);
            return true;
        }
        self.exhausted = true;
        false
    }
}

impl Iterator for CombinationIterator {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let combination = self.peek()?.to_vec();
        self.confirm();
        Some(combination)
    }
}

/// Split the enumeration of the k-subsets of `0..n` into `p` striding iterators.
///
/// Iterator `i` starts at the `i`-th subset and then visits every `p`-th subset.
/// Together, the iterators visit every subset exactly once.
///
/// ```rust
/// use hypertree::split;
///
/// let mut subsets: Vec<_> = split(5, 3, 4, false).into_iter().flatten().collect();
/// subsets.sort();
/// assert_eq!(subsets.len(), 10);
/// assert_eq!(subsets[0], [0, 1, 2]);
/// ```
pub fn split(n: usize, k: usize, p: usize, extended: bool) -> Vec<CombinationIterator> {
    assert!(p > 0, "at least one iterator is needed");
    (0..p).map(|i| CombinationIterator::with_offset(n, k, extended, i, p)).collect()
}

/// The binomial coefficient, saturating at `usize::MAX`.
pub(crate) fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    (0..k).fold(1_usize, |acc, i| acc.saturating_mul(n - i) / (i + 1))
}
