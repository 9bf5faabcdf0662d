//! Currency, lives, and wave bookkeeping for a session.

/// Economy state owned by the world.
///
/// The balance can never go negative: every purchase routes through
/// [`Ledger::try_debit`], which leaves the ledger untouched when funds are
/// insufficient.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ledger {
    money: u32,
    lives: u32,
    wave: u32,
}

impl Ledger {
    /// Creates a ledger with the provided starting balance and lives.
    #[must_use]
    pub(crate) const fn new(money: u32, lives: u32) -> Self {
        Self {
            money,
            lives,
            wave: 0,
        }
    }

    /// Current currency balance.
    #[must_use]
    pub const fn money(&self) -> u32 {
        self.money
    }

    /// Lives remaining before the session is lost.
    #[must_use]
    pub const fn lives(&self) -> u32 {
        self.lives
    }

    /// One-based number of the current wave, zero before the first wave.
    #[must_use]
    pub const fn wave(&self) -> u32 {
        self.wave
    }

    /// Attempts to remove the amount from the balance.
    ///
    /// Returns `false` and leaves the balance unchanged when funds are
    /// insufficient.
    pub(crate) fn try_debit(&mut self, amount: u32) -> bool {
        match self.money.checked_sub(amount) {
            Some(remaining) => {
                self.money = remaining;
                true
            }
            None => false,
        }
    }

    /// Adds the amount to the balance.
    pub(crate) fn credit(&mut self, amount: u32) {
        self.money = self.money.saturating_add(amount);
    }

    /// Deducts the provided number of lives in a single batched update.
    ///
    /// Returns the lives remaining after the deduction.
    pub(crate) fn lose_lives(&mut self, count: u32) -> u32 {
        self.lives = self.lives.saturating_sub(count);
        self.lives
    }

    /// Records that the provided wave became current.
    pub(crate) fn set_wave(&mut self, wave: u32) {
        self.wave = wave;
    }
}

#[cfg(test)]
mod tests {
    use super::Ledger;

    #[test]
    fn debit_rejects_insufficient_funds() {
        let mut ledger = Ledger::new(100, 10);
        assert!(!ledger.try_debit(150));
        assert_eq!(ledger.money(), 100);
        assert!(ledger.try_debit(100));
        assert_eq!(ledger.money(), 0);
        assert!(!ledger.try_debit(1));
    }

    #[test]
    fn batched_life_loss_saturates_at_zero() {
        let mut ledger = Ledger::new(0, 3);
        assert_eq!(ledger.lose_lives(2), 1);
        assert_eq!(ledger.lose_lives(5), 0);
        assert_eq!(ledger.lives(), 0);
    }
}
