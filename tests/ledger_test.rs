mod common;

use anyhow::Result;
use bankledger::application::AppError;
use bankledger::domain::ListEntriesParams;
use common::{create_entries, open_account, test_service};

#[tokio::test]
async fn test_open_account_normalizes_input() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let account = service.open_account("  Alice ", "usd").await?;
    assert_eq!(account.owner, "Alice");
    assert_eq!(account.currency, "USD");
    assert_eq!(account.balance, 0);

    let fetched = service.get_account(account.id).await?;
    assert_eq!(fetched, account);

    Ok(())
}

#[tokio::test]
async fn test_open_account_rejects_bad_input() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let empty_owner = service.open_account("", "EUR").await;
    assert!(matches!(empty_owner, Err(AppError::InvalidInput(_))));

    let bad_currency = service.open_account("bob", "EURO").await;
    assert!(matches!(bad_currency, Err(AppError::InvalidInput(_))));

    assert!(service.list_accounts(10, 0).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_get_missing_account_is_not_found() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let err = service.get_account(42).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "account 42 not found");

    Ok(())
}

#[tokio::test]
async fn test_list_accounts_pages_by_id() -> Result<()> {
    let (service, _temp) = test_service().await?;

    for owner in ["a", "b", "c", "d"] {
        open_account(&service, owner).await?;
    }

    let page: Vec<String> = service
        .list_accounts(2, 1)
        .await?
        .into_iter()
        .map(|a| a.owner)
        .collect();
    assert_eq!(page, vec!["b", "c"]);

    assert!(service.list_accounts(0, 0).await?.is_empty());
    assert!(service.list_accounts(10, 4).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_post_entry_updates_balance() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let account = open_account(&service, "alice").await?;

    let first = service.post_entry(account.id, 100).await?;
    assert_eq!(first.entry.amount, 100);
    assert_eq!(first.account.balance, 100);

    service.post_entry(account.id, -30).await?;
    let last = service.post_entry(account.id, 50).await?;
    assert_eq!(last.account.balance, 120);

    let stored = service.get_account(account.id).await?;
    assert_eq!(stored.balance, 120);
    assert_eq!(service.queries().sum_entries(account.id).await?, 120);

    let report = service.check_balances().await?;
    assert!(report.is_consistent());
    assert_eq!(report.account_count, 1);
    assert_eq!(report.entry_total, 120);

    Ok(())
}

#[tokio::test]
async fn test_post_entry_for_missing_account_writes_nothing() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let account = open_account(&service, "alice").await?;

    let err = service.post_entry(account.id + 1, 100).await.unwrap_err();
    assert!(err.is_constraint_violation(), "got {:?}", err);

    assert!(service.queries().entry_sums().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_failed_posting_is_rolled_back() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let account = open_account(&service, "alice").await?;

    service.post_entry(account.id, i64::MAX).await?;

    // The balance would overflow; neither the entry nor the balance change may stick.
    let err = service.post_entry(account.id, 1).await.unwrap_err();
    assert!(err.is_constraint_violation(), "got {:?}", err);

    let stored = service.get_account(account.id).await?;
    assert_eq!(stored.balance, i64::MAX);

    let entries = service
        .list_entries(ListEntriesParams::new(account.id, 10, 0))
        .await?;
    assert_eq!(entries.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_check_balances_reports_raw_entries() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let alice = open_account(&service, "alice").await?;
    let bob = open_account(&service, "bob").await?;

    service.post_entry(alice.id, 500).await?;
    // Bypasses the balance update
    create_entries(&service, &bob, &[70]).await?;

    let report = service.check_balances().await?;
    assert!(!report.is_consistent());
    assert_eq!(report.mismatches.len(), 1);

    let mismatch = &report.mismatches[0];
    assert_eq!(mismatch.account_id, bob.id);
    assert_eq!(mismatch.stored, 0);
    assert_eq!(mismatch.from_entries, 70);

    Ok(())
}

#[tokio::test]
async fn test_all_entries_requires_existing_account() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let account = open_account(&service, "alice").await?;

    assert!(service.all_entries(account.id).await?.is_empty());

    service.post_entry(account.id, 5).await?;
    service.post_entry(account.id, 6).await?;
    assert_eq!(service.all_entries(account.id).await?.len(), 2);

    let err = service.all_entries(account.id + 100).await.unwrap_err();
    assert!(err.is_not_found());

    Ok(())
}

#[tokio::test]
async fn test_check_balances_with_sums_past_cents_range() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let account = open_account(&service, "alice").await?;

    create_entries(&service, &account, &[i64::MAX, 1, -2]).await?;

    let expected = i128::from(i64::MAX) - 1;
    assert_eq!(service.queries().sum_entries(account.id).await?, expected);

    let report = service.check_balances().await?;
    assert_eq!(report.entry_total, expected);
    assert_eq!(report.mismatches.len(), 1);
    assert_eq!(report.mismatches[0].stored, 0);
    assert_eq!(report.mismatches[0].from_entries, expected);

    Ok(())
}
