/// Exact integer mean without summing into a wider type.
///
/// Each value is split into `value / n` and `value % n`; the remainders are
/// carried so that `mean()` equals `floor(sum / n)` as long as at most `n`
/// values are added.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeanAccumulator {
    divisor: u128,
    quotient: u128,
    remainder: u128,
}

impl MeanAccumulator {
    pub fn new(divisor: usize) -> Self {
        Self {
            divisor: divisor as u128,
            quotient: 0,
            remainder: 0,
        }
    }

    pub fn add(&mut self, value: u128) {
        if self.divisor == 0 {
            return;
        }
        self.quotient = self.quotient.saturating_add(value / self.divisor);
        self.remainder += value % self.divisor;
        if self.remainder >= self.divisor {
            self.quotient = self.quotient.saturating_add(self.remainder / self.divisor);
            self.remainder %= self.divisor;
        }
    }

    /// `floor(sum / divisor)`, zero for a zero divisor.
    pub fn mean(&self) -> u128 {
        self.quotient
    }
}

impl Extend<u128> for MeanAccumulator {
    fn extend<I: IntoIterator<Item = u128>>(&mut self, iter: I) {
        for value in iter {
            self.add(value);
        }
    }
}
