use std::collections::HashMap;

use super::{Account, AccountId, Cents, CentsSum};

/// Sum of entry amounts. Widened so that any number of `Cents` values adds up
/// without overflow.
pub fn sum_amounts(amounts: impl IntoIterator<Item = Cents>) -> CentsSum {
    amounts.into_iter().map(CentsSum::from).sum()
}

/// Sum of entry amounts per account, from `(account_id, amount)` pairs.
pub fn compute_all_balances(
    amounts: impl IntoIterator<Item = (AccountId, Cents)>,
) -> HashMap<AccountId, CentsSum> {
    let mut balances: HashMap<AccountId, CentsSum> = HashMap::new();
    for (account_id, amount) in amounts {
        *balances.entry(account_id).or_insert(0) += CentsSum::from(amount);
    }
    balances
}

/// An account whose stored balance disagrees with its entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceMismatch {
    pub account_id: AccountId,
    pub stored: Cents,
    pub from_entries: CentsSum,
}

impl std::fmt::Display for BalanceMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "account {}: stored balance {} but entries sum to {}",
            self.account_id, self.stored, self.from_entries
        )
    }
}

/// Result of checking that every balance equals the sum of its entries.
#[derive(Debug, Clone, Default)]
pub struct BalanceReport {
    pub account_count: usize,
    pub entry_total: CentsSum,
    pub mismatches: Vec<BalanceMismatch>,
}

impl BalanceReport {
    pub fn is_consistent(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Compare stored balances against the per-account entry sums.
/// Accounts missing from `sums` are treated as having no entries.
pub fn build_balance_report(
    accounts: &[Account],
    sums: &HashMap<AccountId, CentsSum>,
) -> BalanceReport {
    let mismatches = accounts
        .iter()
        .filter_map(|account| {
            let from_entries = sums.get(&account.id).copied().unwrap_or(0);
            (CentsSum::from(account.balance) != from_entries).then(|| BalanceMismatch {
                account_id: account.id,
                stored: account.balance,
                from_entries,
            })
        })
        .collect();

    BalanceReport {
        account_count: accounts.len(),
        entry_total: sums.values().sum(),
        mismatches,
    }
}
