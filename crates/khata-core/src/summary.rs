//! Aggregate balance over the transaction list.

use khata_domain::{Transaction, TransactionKind};

/// Running balance plus per-kind totals.
///
/// Income adds to the balance; every other kind subtracts. Lend is money
/// going out, and borrow and reminder follow the same fall-through the
/// app has always shown. The per-kind totals let a caller present borrowed
/// amounts differently without changing the aggregate.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BalanceSummary {
    pub balance: f64,
    pub income: f64,
    pub expense: f64,
    pub lent: f64,
    pub borrowed: f64,
}

impl BalanceSummary {
    pub fn compute(transactions: &[Transaction]) -> Self {
        let mut summary = Self::default();
        for txn in transactions {
            match txn.kind {
                TransactionKind::Income => {
                    summary.income += txn.amount;
                    summary.balance += txn.amount;
                }
                TransactionKind::Expense => {
                    summary.expense += txn.amount;
                    summary.balance -= txn.amount;
                }
                TransactionKind::Lend => {
                    summary.lent += txn.amount;
                    summary.balance -= txn.amount;
                }
                TransactionKind::Borrow => {
                    summary.borrowed += txn.amount;
                    summary.balance -= txn.amount;
                }
                TransactionKind::Reminder => {
                    summary.balance -= txn.amount;
                }
            }
        }
        summary
    }

    pub fn is_debt(&self) -> bool {
        self.balance < 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use khata_domain::{Category, NewTransaction};

    fn txn(title: &str, amount: f64, kind: TransactionKind) -> Transaction {
        NewTransaction::new(title, amount, Category::with_id("1", "Food"), kind).build()
    }

    #[test]
    fn income_adds_and_everything_else_subtracts() {
        let transactions = vec![
            txn("Salary", 1_000.0, TransactionKind::Income),
            txn("Rent", 400.0, TransactionKind::Expense),
            txn("Loan out", 100.0, TransactionKind::Lend),
            txn("Loan in", 50.0, TransactionKind::Borrow),
            txn("Pay back Ravi", 25.0, TransactionKind::Reminder),
        ];

        let summary = BalanceSummary::compute(&transactions);

        assert_eq!(summary.income, 1_000.0);
        assert_eq!(summary.expense, 400.0);
        assert_eq!(summary.lent, 100.0);
        assert_eq!(summary.borrowed, 50.0);
        assert_eq!(summary.balance, 1_000.0 - 400.0 - 100.0 - 50.0 - 25.0);
        assert!(!summary.is_debt());
    }

    #[test]
    fn empty_list_yields_a_zero_summary() {
        let summary = BalanceSummary::compute(&[]);
        assert_eq!(summary, BalanceSummary::default());
    }

    #[test]
    fn debt_flag_tracks_a_negative_balance() {
        let transactions = vec![txn("Groceries", 10.0, TransactionKind::Expense)];
        assert!(BalanceSummary::compute(&transactions).is_debt());
    }
}
