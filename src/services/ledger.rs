//! Seat purses.

use rustc_hash::FxHashMap;

use crate::core::SeatId;

/// Currency storage for seats.
pub trait Ledger {
    /// Whether `seat` holds at least `amount`.
    fn can_afford(&self, seat: SeatId, amount: u64) -> bool;

    /// Take `amount` from `seat`. Returns false (and takes nothing) if the
    /// seat cannot pay.
    fn deduct(&mut self, seat: SeatId, amount: u64) -> bool;

    /// Give `amount` to `seat`.
    fn credit(&mut self, seat: SeatId, amount: u64);
}

/// Purses kept in memory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InMemoryLedger {
    balances: FxHashMap<SeatId, u64>,
}

impl InMemoryLedger {
    /// Empty ledger; every seat starts at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Same starting balance for each seat.
    #[must_use]
    pub fn with_balances(seats: impl IntoIterator<Item = SeatId>, amount: u64) -> Self {
        Self {
            balances: seats.into_iter().map(|s| (s, amount)).collect(),
        }
    }

    /// Set one seat's balance.
    pub fn set_balance(&mut self, seat: SeatId, amount: u64) {
        self.balances.insert(seat, amount);
    }

    /// A seat's balance.
    #[must_use]
    pub fn balance(&self, seat: SeatId) -> u64 {
        self.balances.get(&seat).copied().unwrap_or(0)
    }

    /// Sum of every balance.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.balances.values().sum()
    }
}

impl Ledger for InMemoryLedger {
    fn can_afford(&self, seat: SeatId, amount: u64) -> bool {
        self.balance(seat) >= amount
    }

    fn deduct(&mut self, seat: SeatId, amount: u64) -> bool {
        let balance = self.balances.entry(seat).or_insert(0);
        if *balance < amount {
            return false;
        }
        *balance -= amount;
        true
    }

    fn credit(&mut self, seat: SeatId, amount: u64) {
        *self.balances.entry(seat).or_insert(0) += amount;
    }
}
