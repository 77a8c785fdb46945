//! Copy accounting for catalog books.
//!
//! [`Stock`] holds the `(copies_total, copies_available)` pair of a book and
//! every transition the catalog applies to it. All transitions keep
//! `0 <= available <= total`. The repository layer applies them to a row it
//! has locked with `SELECT ... FOR UPDATE`, so concurrent borrowers of the same
//! book are serialized by the store and never lose an update.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stock {
    pub total: i32,
    pub available: i32,
}

impl Stock {
    pub fn new(total: i32, available: i32) -> Self {
        Self { total, available }
    }

    /// Stock of a newly catalogued book: every copy starts on the shelf.
    pub fn fresh(total: i32) -> Self {
        let total = total.max(0);
        Self {
            total,
            available: total,
        }
    }

    /// Copies currently lent out.
    pub fn on_loan(&self) -> i32 {
        self.total - self.available
    }

    pub fn is_consistent(&self) -> bool {
        0 <= self.available && self.available <= self.total
    }

    /// Take one copy off the shelf. `None` when nothing is available.
    pub fn reserve(self) -> Option<Self> {
        if self.available < 1 {
            return None;
        }
        Some(Self {
            available: self.available - 1,
            ..self
        })
    }

    /// Put one copy back, never exceeding the total.
    pub fn release(self) -> Self {
        Self {
            available: (self.available + 1).min(self.total),
            ..self
        }
    }

    /// Change the number of owned copies. Availability moves by the same delta
    /// and is clamped to `[0, new_total]`; shrinking below the number of copies
    /// on loan leaves zero available rather than a negative count.
    pub fn resize(self, new_total: i32) -> Self {
        let new_total = new_total.max(0);
        let delta = new_total - self.total;
        Self {
            total: new_total,
            available: (self.available + delta).clamp(0, new_total),
        }
    }

    /// Never-shrink merge used by the CSV importer: both counters can only
    /// grow to the incoming total.
    ///
    /// Known limitation: re-importing after stock was lost does not reduce
    /// anything, and raising availability to the incoming total can exceed
    /// the copies actually on the shelf when loans are open.
    pub fn merge_import(self, incoming_total: i32) -> Self {
        Self {
            total: self.total.max(incoming_total),
            available: self.available.max(incoming_total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserve_decrements() {
        let stock = Stock::fresh(2).reserve().unwrap();
        assert_eq!(stock, Stock::new(2, 1));
        assert_eq!(stock.on_loan(), 1);
    }

    #[test]
    fn test_reserve_out_of_stock() {
        assert_eq!(Stock::new(1, 0).reserve(), None);
        assert_eq!(Stock::fresh(0).reserve(), None);
    }

    #[test]
    fn test_k_reservations_succeed_then_fail() {
        let mut stock = Stock::fresh(3);
        let mut granted = 0;
        for _ in 0..5 {
            if let Some(next) = stock.reserve() {
                stock = next;
                granted += 1;
            }
        }
        assert_eq!(granted, 3);
        assert_eq!(stock.available, 0);
    }

    #[test]
    fn test_release_round_trip() {
        let start = Stock::new(4, 2);
        assert_eq!(start.reserve().unwrap().release(), start);
    }

    #[test]
    fn test_release_is_clamped() {
        assert_eq!(Stock::new(2, 2).release(), Stock::new(2, 2));
    }

    #[test]
    fn test_resize_grow() {
        assert_eq!(Stock::new(2, 1).resize(5), Stock::new(5, 4));
    }

    #[test]
    fn test_resize_shrink_keeps_loans() {
        assert_eq!(Stock::new(5, 3).resize(3), Stock::new(3, 1));
    }

    #[test]
    fn test_resize_shrink_clamps_to_zero() {
        // Three copies out, total cut to one: availability is zero, not -2.
        let stock = Stock::new(4, 1).resize(1);
        assert_eq!(stock, Stock::new(1, 0));
        assert!(stock.is_consistent());
    }

    #[test]
    fn test_merge_import_grows() {
        assert_eq!(Stock::new(2, 2).merge_import(5), Stock::new(5, 5));
        assert_eq!(Stock::new(2, 1).merge_import(5), Stock::new(5, 5));
    }

    #[test]
    fn test_merge_import_never_shrinks() {
        assert_eq!(Stock::new(6, 4).merge_import(2), Stock::new(6, 4));
    }

    #[test]
    fn test_transitions_stay_consistent() {
        let starts = [Stock::new(0, 0), Stock::new(1, 0), Stock::new(3, 3), Stock::new(5, 2)];
        for s in starts {
            assert!(s.release().is_consistent());
            if let Some(r) = s.reserve() {
                assert!(r.is_consistent());
            }
            for t in 0..7 {
                assert!(s.resize(t).is_consistent());
                assert!(s.merge_import(t).is_consistent());
            }
        }
    }
}
