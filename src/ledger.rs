//! Currency ledger and exact-change engine.
//!
//! The ledger owns the machine's denominations in load order. That order is
//! the greedy walk's priority: change is always taken from earlier entries
//! first, so currency files list the largest denominations first.
//!
//! Feasibility checking and disbursement share a single planning walk
//! (`plan_change`); the check discards the plan, the disbursement applies it.

use crate::denomination::{Denomination, DenominationRecord, DenominationRef};
use crate::error::{Result, VendingError};
use crate::money::Money;
use csv::{ReaderBuilder, Trim};
use log::{debug, warn};
use std::collections::HashSet;
use std::io::Read;

/// Units of one denomination handed back as change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disbursement {
    pub code: String,
    pub display_name: String,
    pub face_value: Money,
    pub units: u32,
}

impl Disbursement {
    /// Total value of the dispensed units.
    pub fn value(&self) -> Money {
        self.face_value.times(self.units)
    }
}

/// Result of a change disbursement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeReport {
    /// `payment - cost`.
    pub change_due: Money,

    /// Dispensed units in ledger order. Denominations not used are omitted.
    pub dispensed: Vec<Disbursement>,

    /// Amount the walk could not cover. Zero whenever the feasibility check
    /// passed against the same ledger state.
    pub unresolved: Money,
}

impl ChangeReport {
    /// Total value of everything dispensed.
    pub fn dispensed_value(&self) -> Money {
        self.dispensed.iter().map(Disbursement::value).sum()
    }

    /// Returns `true` if the dispensed value equals the change due.
    pub fn is_exact(&self) -> bool {
        self.unresolved.is_zero()
    }
}

/// Outcome of a greedy walk: `(index, units)` pairs plus whatever is left.
#[derive(Debug)]
struct ChangePlan {
    takes: Vec<(usize, u32)>,
    remaining: Money,
}

/// Greedy walk over `denominations` in order.
///
/// Each denomination whose face value fits in the remaining amount and which
/// has stock contributes `min(floor(remaining / face_value), quantity)` units.
fn plan_change(denominations: &[Denomination], change_due: Money) -> ChangePlan {
    let mut remaining = change_due;
    let mut takes = Vec::new();

    for (index, denom) in denominations.iter().enumerate() {
        if remaining.is_zero() {
            break;
        }
        if denom.face_value > remaining || denom.quantity == 0 {
            continue;
        }

        let wanted = remaining.whole_units_of(denom.face_value);
        let units = u32::try_from(wanted).map_or(denom.quantity, |w| w.min(denom.quantity));

        remaining -= denom.face_value.times(units);
        takes.push((index, units));
    }

    ChangePlan { takes, remaining }
}

/// The machine's currency stock.
///
/// Quantities change only through [`CurrencyLedger::make_change`].
#[derive(Debug, Clone)]
pub struct CurrencyLedger {
    denominations: Vec<Denomination>,
}

impl CurrencyLedger {
    /// Creates a ledger from denominations in priority order.
    ///
    /// Codes must be unique.
    pub fn new(denominations: Vec<Denomination>) -> Result<Self> {
        let mut seen = HashSet::new();
        for (index, denom) in denominations.iter().enumerate() {
            if !seen.insert(denom.code.as_str()) {
                return Err(VendingError::DuplicateCode {
                    code: denom.code.clone(),
                    ordinal: index + 1,
                });
            }
        }

        Ok(CurrencyLedger { denominations })
    }

    /// Loads a ledger from CSV with header `code,name,category,value,quantity`.
    ///
    /// A bad row aborts the load: skipping it would silently renumber every
    /// ordinal after it.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

        let mut denominations = Vec::new();
        for (row_idx, result) in csv_reader.deserialize::<DenominationRecord>().enumerate() {
            let row_num = row_idx + 2; // 1-indexed, accounting for header row
            let record = result.map_err(|e| VendingError::InvalidRecord {
                row: row_num,
                message: e.to_string(),
            })?;
            let denom = record.parse(row_num)?;
            debug!(
                "Row {}: Loaded denomination {} ({} x {})",
                row_num, denom.code, denom.quantity, denom.face_value
            );
            denominations.push(denom);
        }

        if denominations.is_empty() {
            return Err(VendingError::NoDenominations);
        }

        Self::new(denominations)
    }

    /// All denominations in ledger order.
    pub fn denominations(&self) -> &[Denomination] {
        &self.denominations
    }

    pub fn len(&self) -> usize {
        self.denominations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.denominations.is_empty()
    }

    /// Resolves a reference to a position in ledger order.
    fn index_of(&self, reference: &DenominationRef) -> Result<usize> {
        let found = match reference {
            DenominationRef::Ordinal(n) => n
                .checked_sub(1)
                .filter(|index| *index < self.denominations.len()),
            DenominationRef::Code(code) => self.denominations.iter().position(|d| d.code == *code),
        };
        found.ok_or_else(|| VendingError::InvalidReference(reference.to_string()))
    }

    /// Looks up a denomination.
    pub fn get(&self, reference: &DenominationRef) -> Result<&Denomination> {
        let index = self.index_of(reference)?;
        Ok(&self.denominations[index])
    }

    /// Value of `count` units of the referenced denomination.
    ///
    /// Tendered units come from outside the machine, so the ledger's own
    /// stock of that denomination is not consulted.
    pub fn valuate(&self, reference: &DenominationRef, count: u32) -> Result<Money> {
        if count == 0 {
            return Err(VendingError::NonPositiveCount);
        }
        let denom = self.get(reference)?;
        Ok(denom.face_value.times(count))
    }

    /// Sum of `face_value * quantity` over all denominations.
    pub fn total_value(&self) -> Money {
        self.denominations.iter().map(Denomination::stock_value).sum()
    }

    /// Returns `true` if the greedy walk can return `payment - cost` exactly
    /// from current stock. Never mutates the ledger.
    ///
    /// A payment below the cost is never feasible.
    pub fn can_make_change(&self, payment: Money, cost: Money) -> bool {
        if payment < cost {
            debug!("Payment {} below cost {}, no change possible", payment, cost);
            return false;
        }

        let change_due = payment - cost;
        if change_due.is_zero() {
            return true;
        }

        let total = self.total_value();
        if total < change_due {
            debug!(
                "Ledger holds {} in total, cannot return {}",
                total, change_due
            );
            return false;
        }

        plan_change(&self.denominations, change_due).remaining.is_zero()
    }

    /// Like [`CurrencyLedger::can_make_change`], but against the stock
    /// `make_change` will actually walk: current quantities plus the
    /// tendered units. Runs on a scratch copy; the ledger is not mutated.
    pub fn can_make_change_after_deposit(
        &self,
        tendered: &DenominationRef,
        count: u32,
        payment: Money,
        cost: Money,
    ) -> Result<bool> {
        if count == 0 {
            return Err(VendingError::NonPositiveCount);
        }
        let tendered_index = self.index_of(tendered)?;

        let mut scratch = self.clone();
        scratch.deposit(tendered_index, count)?;
        Ok(scratch.can_make_change(payment, cost))
    }

    /// Adds `count` units to the denomination at `index`.
    fn deposit(&mut self, index: usize, count: u32) -> Result<()> {
        let denom = &mut self.denominations[index];
        denom.quantity = match denom.quantity.checked_add(count) {
            Some(quantity) => quantity,
            None => return Err(VendingError::QuantityOverflow(denom.code.clone())),
        };
        debug!("Deposited {} x {}", count, denom.code);
        Ok(())
    }

    /// Deposits the tendered units and dispenses `payment - cost` as change.
    ///
    /// The tendered units are added to stock before the walk, so they can be
    /// handed straight back as change. Callers must gate this on
    /// [`CurrencyLedger::can_make_change_after_deposit`]; without that gate
    /// the report may carry a non-zero `unresolved` amount.
    pub fn make_change(
        &mut self,
        tendered: &DenominationRef,
        count: u32,
        payment: Money,
        cost: Money,
    ) -> Result<ChangeReport> {
        if count == 0 {
            return Err(VendingError::NonPositiveCount);
        }
        if payment < cost {
            return Err(VendingError::InsufficientPayment { payment, cost });
        }
        let tendered_index = self.index_of(tendered)?;

        let change_due = payment - cost;

        self.deposit(tendered_index, count)?;

        let plan = plan_change(&self.denominations, change_due);

        let mut dispensed = Vec::with_capacity(plan.takes.len());
        for (index, units) in plan.takes {
            let denom = &mut self.denominations[index];
            // Plan units never exceed the quantity they were clamped to.
            denom.quantity -= units;
            debug!("Dispensed {} x {} ({})", units, denom.code, denom.face_value);
            dispensed.push(Disbursement {
                code: denom.code.clone(),
                display_name: denom.display_name.clone(),
                face_value: denom.face_value,
                units,
            });
        }

        if !plan.remaining.is_zero() {
            warn!(
                "Change of {} left {} unresolved; feasibility was not checked",
                change_due, plan.remaining
            );
        }

        Ok(ChangeReport {
            change_due,
            dispensed,
            unresolved: plan.remaining,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::str::FromStr;

    fn cents(units: i64) -> Money {
        Money::from_minor_units(units)
    }

    fn denom(code: &str, value: i64, quantity: u32) -> Denomination {
        Denomination::new(code, code, "coin", cents(value), quantity).unwrap()
    }

    fn ledger(entries: &[(&str, i64, u32)]) -> CurrencyLedger {
        CurrencyLedger::new(
            entries
                .iter()
                .map(|(code, value, qty)| denom(code, *value, *qty))
                .collect(),
        )
        .unwrap()
    }

    fn quantities(ledger: &CurrencyLedger) -> Vec<u32> {
        ledger.denominations().iter().map(|d| d.quantity).collect()
    }

    fn standard() -> CurrencyLedger {
        ledger(&[
            ("TEN", 1000, 2),
            ("FIVE", 500, 2),
            ("ONE", 100, 5),
            ("Q", 25, 8),
            ("D", 10, 5),
            ("N", 5, 10),
        ])
    }

    #[test]
    fn test_new_rejects_duplicate_codes() {
        let result = CurrencyLedger::new(vec![denom("Q", 25, 1), denom("D", 10, 1), denom("Q", 25, 2)]);
        match result {
            Err(VendingError::DuplicateCode { code, ordinal }) => {
                assert_eq!(code, "Q");
                assert_eq!(ordinal, 3);
            }
            other => panic!("Expected DuplicateCode, got {:?}", other),
        }
    }

    #[test]
    fn test_from_csv_preserves_order() {
        let csv = r#"code,name,category,value,quantity
USD20, Twenty, note, 20.00, 3
USD1, One, note, 1.00, 10
Q, Quarter, coin, 0.25, 40"#;

        let ledger = CurrencyLedger::from_csv(Cursor::new(csv)).unwrap();
        let codes: Vec<&str> = ledger.denominations().iter().map(|d| d.code.as_str()).collect();
        assert_eq!(codes, vec!["USD20", "USD1", "Q"]);
        assert_eq!(ledger.total_value().to_string(), "80.00");
    }

    #[test]
    fn test_from_csv_reports_bad_row() {
        let csv = r#"code,name,category,value,quantity
Q,Quarter,coin,0.25,40
D,Dime,coin,ten cents,5"#;

        let err = CurrencyLedger::from_csv(Cursor::new(csv)).unwrap_err();
        assert!(matches!(err, VendingError::InvalidRecord { row: 3, .. }));
    }

    #[test]
    fn test_from_csv_rejects_empty_file() {
        let csv = "code,name,category,value,quantity\n";
        assert!(matches!(
            CurrencyLedger::from_csv(Cursor::new(csv)),
            Err(VendingError::NoDenominations)
        ));
    }

    #[test]
    fn test_lookup_by_ordinal_and_code() {
        let ledger = standard();
        assert_eq!(ledger.get(&DenominationRef::Ordinal(1)).unwrap().code, "TEN");
        assert_eq!(ledger.get(&DenominationRef::Ordinal(6)).unwrap().code, "N");
        assert_eq!(ledger.get(&"Q".into()).unwrap().face_value, cents(25));

        for bad in [DenominationRef::Ordinal(0), DenominationRef::Ordinal(7), "X".into()] {
            assert!(matches!(
                ledger.get(&bad),
                Err(VendingError::InvalidReference(_))
            ));
        }
    }

    #[test]
    fn test_valuate() {
        let ledger = standard();
        assert_eq!(ledger.valuate(&"Q".into(), 3).unwrap(), cents(75));
        assert_eq!(ledger.valuate(&DenominationRef::Ordinal(1), 2).unwrap(), cents(2000));
    }

    #[test]
    fn test_valuate_ignores_own_stock() {
        let ledger = ledger(&[("ONE", 100, 0)]);
        assert_eq!(ledger.valuate(&"ONE".into(), 5).unwrap(), cents(500));
    }

    #[test]
    fn test_valuate_rejects_zero_count_and_bad_reference() {
        let ledger = standard();
        assert!(matches!(
            ledger.valuate(&"Q".into(), 0),
            Err(VendingError::NonPositiveCount)
        ));
        assert!(matches!(
            ledger.valuate(&DenominationRef::Ordinal(9), 1),
            Err(VendingError::InvalidReference(_))
        ));
    }

    #[test]
    fn test_total_value() {
        assert_eq!(standard().total_value().to_string(), "38.00");
        assert_eq!(ledger(&[("Q", 25, 0)]).total_value(), Money::ZERO);
    }

    #[test]
    fn test_can_make_change_does_not_mutate() {
        let ledger = standard();
        let before = quantities(&ledger);

        let first = ledger.can_make_change(cents(500), cents(135));
        for _ in 0..5 {
            assert_eq!(ledger.can_make_change(cents(500), cents(135)), first);
        }
        assert!(first);
        assert_eq!(quantities(&ledger), before);
    }

    #[test]
    fn test_zero_change_is_trivially_feasible() {
        let empty_stock = ledger(&[("Q", 25, 0)]);
        assert!(empty_stock.can_make_change(cents(125), cents(125)));
    }

    #[test]
    fn test_payment_below_cost_is_infeasible() {
        assert!(!standard().can_make_change(cents(100), cents(125)));
    }

    #[test]
    fn test_insufficient_total_funds() {
        let ledger = ledger(&[("Q", 25, 2), ("N", 5, 1)]);
        assert!(!ledger.can_make_change(cents(200), cents(100)));
    }

    #[test]
    fn test_greedy_skips_empty_denomination() {
        let ledger = ledger(&[("Q", 25, 1), ("D", 10, 0), ("N", 5, 3)]);
        assert!(ledger.can_make_change(cents(130), cents(100)));
    }

    #[test]
    fn test_greedy_misses_non_greedy_solution() {
        // 3 x 10 would make 30, but the walk takes the 25 first and is
        // left with 5 it cannot cover.
        let ledger = ledger(&[("Q", 25, 1), ("D", 10, 3)]);
        assert!(!ledger.can_make_change(cents(130), cents(100)));
    }

    #[test]
    fn test_greedy_follows_ledger_order() {
        // Smaller denomination listed first gets priority.
        let ledger = ledger(&[("D", 10, 3), ("Q", 25, 1)]);
        assert!(ledger.can_make_change(cents(130), cents(100)));
    }

    #[test]
    fn test_make_change_dispenses_and_mutates() {
        let mut ledger = standard();
        let report = ledger
            .make_change(&"FIVE".into(), 1, cents(500), cents(135))
            .unwrap();

        assert_eq!(report.change_due, cents(365));
        assert!(report.is_exact());
        assert_eq!(report.dispensed_value(), cents(365));

        let summary: Vec<(&str, u32)> = report
            .dispensed
            .iter()
            .map(|d| (d.code.as_str(), d.units))
            .collect();
        assert_eq!(summary, vec![("ONE", 3), ("Q", 2), ("D", 1), ("N", 1)]);

        // FIVE gained the deposit; dispensed denominations lost their units.
        assert_eq!(quantities(&ledger), vec![2, 3, 2, 6, 4, 9]);
    }

    #[test]
    fn test_make_change_uses_deposit() {
        // Machine holds no quarters; the tendered quarters come straight back.
        let mut ledger = ledger(&[("Q", 25, 0), ("N", 5, 0)]);
        assert!(!ledger.can_make_change(cents(100), cents(50)));

        let report = ledger
            .make_change(&"Q".into(), 4, cents(100), cents(50))
            .unwrap();
        assert!(report.is_exact());
        assert_eq!(report.dispensed.len(), 1);
        assert_eq!(report.dispensed[0].units, 2);
        assert_eq!(quantities(&ledger), vec![2, 0]);
    }

    #[test]
    fn test_make_change_example_walk() {
        let mut ledger = ledger(&[("Q", 25, 1), ("D", 10, 0), ("N", 5, 3)]);
        assert!(ledger.can_make_change(cents(130), cents(100)));

        let report = ledger
            .make_change(&"N".into(), 26, cents(130), cents(100))
            .unwrap();
        let summary: Vec<(&str, u32)> = report
            .dispensed
            .iter()
            .map(|d| (d.code.as_str(), d.units))
            .collect();
        assert_eq!(summary, vec![("Q", 1), ("N", 1)]);
        assert_eq!(quantities(&ledger), vec![0, 0, 28]);
    }

    #[test]
    fn test_make_change_zero_change_only_deposits() {
        let mut ledger = standard();
        let report = ledger
            .make_change(&"ONE".into(), 2, cents(200), cents(200))
            .unwrap();

        assert!(report.dispensed.is_empty());
        assert!(report.is_exact());
        assert_eq!(quantities(&ledger), vec![2, 2, 7, 8, 5, 10]);
    }

    #[test]
    fn test_make_change_without_check_leaves_remainder() {
        let mut ledger = ledger(&[("Q", 25, 1), ("D", 10, 3)]);
        let report = ledger
            .make_change(&"D".into(), 13, cents(130), cents(100))
            .unwrap();
        // The walk takes the quarter and then has 5 left over.
        assert_eq!(report.unresolved, cents(5));
        assert!(!report.is_exact());
        assert_eq!(report.dispensed_value(), cents(25));
        assert_eq!(quantities(&ledger), vec![0, 16]);
    }

    #[test]
    fn test_make_change_rejects_before_mutating() {
        let mut ledger = standard();
        let before = quantities(&ledger);

        assert!(matches!(
            ledger.make_change(&"Q".into(), 0, cents(100), cents(50)),
            Err(VendingError::NonPositiveCount)
        ));
        assert!(matches!(
            ledger.make_change(&DenominationRef::Ordinal(42), 1, cents(100), cents(50)),
            Err(VendingError::InvalidReference(_))
        ));
        assert!(matches!(
            ledger.make_change(&"Q".into(), 1, cents(25), cents(50)),
            Err(VendingError::InsufficientPayment { .. })
        ));
        assert_eq!(quantities(&ledger), before);
    }

    #[test]
    fn test_make_change_rejects_quantity_overflow() {
        let mut ledger = ledger(&[("Q", 25, u32::MAX)]);
        assert!(matches!(
            ledger.make_change(&"Q".into(), 1, cents(25), cents(25)),
            Err(VendingError::QuantityOverflow(_))
        ));
        assert_eq!(quantities(&ledger), vec![u32::MAX]);
    }

    #[test]
    fn test_check_after_deposit_sees_tendered_units() {
        // The quarters bought with must be able to come back, and the
        // pre-deposit stock alone is empty.
        let ledger = ledger(&[("Q", 25, 0), ("N", 5, 0)]);
        assert!(!ledger.can_make_change(cents(100), cents(50)));
        assert!(ledger
            .can_make_change_after_deposit(&"Q".into(), 4, cents(100), cents(50))
            .unwrap());
        assert_eq!(quantities(&ledger), vec![0, 0]);
    }

    #[test]
    fn test_check_after_deposit_catches_greedy_reordering() {
        // Three dimes cover 0.30 before the deposit, but once quarters are in
        // stock the walk takes one first and is left with 0.05.
        let mut ledger = ledger(&[("Q", 25, 0), ("D", 10, 3)]);
        assert!(ledger.can_make_change(cents(100), cents(70)));
        assert!(!ledger
            .can_make_change_after_deposit(&"Q".into(), 4, cents(100), cents(70))
            .unwrap());
        assert_eq!(quantities(&ledger), vec![0, 3]);

        let report = ledger
            .make_change(&"Q".into(), 4, cents(100), cents(70))
            .unwrap();
        assert_eq!(report.unresolved, cents(5));
    }

    #[test]
    fn test_check_after_deposit_validates_inputs() {
        let ledger = ledger(&[("Q", 25, u32::MAX)]);
        assert!(matches!(
            ledger.can_make_change_after_deposit(&"Q".into(), 0, cents(25), cents(25)),
            Err(VendingError::NonPositiveCount)
        ));
        assert!(matches!(
            ledger.can_make_change_after_deposit(&"X".into(), 1, cents(25), cents(25)),
            Err(VendingError::InvalidReference(_))
        ));
        assert!(matches!(
            ledger.can_make_change_after_deposit(&"Q".into(), 1, cents(25), cents(25)),
            Err(VendingError::QuantityOverflow(_))
        ));
    }

    #[test]
    fn test_plan_clamps_oversized_quotient_to_stock() {
        // 10^23 / 0.01 does not fit in u64; the walk still takes all stock.
        let huge = Money::from_str("100000000000000000000000").unwrap();
        let denominations = vec![denom("P", 1, 3)];
        let plan = plan_change(&denominations, huge);
        assert_eq!(plan.takes, vec![(0, 3)]);
        assert_eq!(plan.remaining, huge - cents(3));
    }

    #[test]
    fn test_feasible_disbursement_conserves_value() {
        let mut ledger = standard();
        for (payment, cost) in [(500, 135), (1000, 10), (100, 65), (2000, 1995), (25, 25)] {
            let payment = cents(payment);
            let cost = cents(cost);
            if ledger.can_make_change(payment, cost) {
                let report = ledger.make_change(&"N".into(), 1, payment, cost).unwrap();
                assert_eq!(report.dispensed_value(), payment - cost);
                assert!(report.is_exact());
            }
        }
    }
}
