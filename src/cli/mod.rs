use std::fs::File;
use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use crate::application::LedgerService;
use crate::config::{self, Config};
use crate::domain::{format_cents, format_cents_sum, parse_cents, Account, Entry, ListEntriesParams};
use crate::io::Exporter;

/// Bankledger - accounts and append-only balance entries
#[derive(Parser)]
#[command(name = "bankledger")]
#[command(about = "A small banking ledger: accounts, entries and schema migrations")]
#[command(version)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, global = true, default_value = "bankledger.toml")]
    pub config: String,

    /// Database URL (overrides config file)
    #[arg(short, long, global = true)]
    pub database: Option<String>,

    /// Log level (overrides config file)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Apply or roll back schema migrations
    #[command(subcommand)]
    Migrate(MigrateCommands),

    /// Account management commands
    #[command(subcommand)]
    Account(AccountCommands),

    /// Entry commands
    #[command(subcommand)]
    Entry(EntryCommands),

    /// Verify that every balance equals the sum of its entries
    Check,

    /// Export an account's entries
    Export {
        /// Account ID
        account_id: i64,

        /// Output format
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum MigrateCommands {
    /// Apply pending migrations
    Up {
        /// Number of migrations to apply (omit for all)
        #[arg(long)]
        steps: Option<usize>,
    },

    /// Roll back applied migrations
    Down {
        /// Number of migrations to roll back (omit for all)
        #[arg(long)]
        steps: Option<usize>,
    },

    /// Show applied migrations
    Status,
}

#[derive(Subcommand)]
pub enum AccountCommands {
    /// Open a new account
    Create {
        /// Account owner
        owner: String,

        /// Currency code (e.g., EUR, USD)
        #[arg(long, default_value = "EUR")]
        currency: String,
    },

    /// Show an account
    Show {
        /// Account ID
        id: i64,
    },

    /// List accounts
    List {
        #[arg(long, default_value_t = 50)]
        limit: u32,

        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
}

#[derive(Subcommand)]
pub enum EntryCommands {
    /// Record an entry and apply it to the account balance
    Create {
        /// Account ID
        account_id: i64,

        /// Amount (e.g., "50.00" to credit, "-12.50" to debit)
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },

    /// Show an entry
    Show {
        /// Entry ID
        id: i64,
    },

    /// List an account's entries, oldest first
    List {
        /// Account ID
        account_id: i64,

        #[arg(long, default_value_t = 20)]
        limit: u32,

        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config = Config::load(&self.config)?.with_overrides(self.database, self.log_level);
        config::init_tracing(&config.logging);

        let service = LedgerService::connect(&config.database.url, config.database.max_connections)
            .await
            .context("Failed to open database")?;

        match self.command {
            Commands::Migrate(cmd) => run_migrate_command(&service, cmd).await?,
            Commands::Account(cmd) => run_account_command(&service, cmd).await?,
            Commands::Entry(cmd) => run_entry_command(&service, cmd).await?,
            Commands::Check => run_check_command(&service).await?,
            Commands::Export {
                account_id,
                format,
                output,
            } => run_export_command(&service, account_id, format, output).await?,
        }

        Ok(())
    }
}

async fn run_migrate_command(service: &LedgerService, cmd: MigrateCommands) -> Result<()> {
    match cmd {
        MigrateCommands::Up { steps } => {
            let applied = service.migrate_up(steps).await?;
            if applied.is_empty() {
                println!("Schema is up to date.");
            }
            for version in applied {
                println!("Applied migration {:03}", version);
            }
        }
        MigrateCommands::Down { steps } => {
            let rolled_back = service.migrate_down(steps).await?;
            if rolled_back.is_empty() {
                println!("No migrations to roll back.");
            }
            for version in rolled_back {
                println!("Rolled back migration {:03}", version);
            }
        }
        MigrateCommands::Status => {
            let applied = service.applied_migrations().await?;
            for migration in crate::storage::MIGRATIONS {
                let state = if applied.contains(&migration.version) {
                    "applied"
                } else {
                    "pending"
                };
                println!("{:03} {:<20} {}", migration.version, migration.name, state);
            }
        }
    }
    Ok(())
}

async fn run_account_command(service: &LedgerService, cmd: AccountCommands) -> Result<()> {
    match cmd {
        AccountCommands::Create { owner, currency } => {
            let account = service.open_account(owner, currency).await?;
            println!(
                "Opened account {} for {} ({})",
                account.id, account.owner, account.currency
            );
        }
        AccountCommands::Show { id } => {
            let account = service.get_account(id).await?;
            print_account(&account);
        }
        AccountCommands::List { limit, offset } => {
            let accounts = service.list_accounts(limit, offset).await?;
            if accounts.is_empty() {
                println!("No accounts found.");
                return Ok(());
            }

            println!("{:>6}  {:<24} {:<4} {:>14}", "ID", "OWNER", "CUR", "BALANCE");
            println!("{}", "-".repeat(52));
            for account in accounts {
                println!(
                    "{:>6}  {:<24} {:<4} {:>14}",
                    account.id,
                    account.owner,
                    account.currency,
                    format_cents(account.balance)
                );
            }
        }
    }
    Ok(())
}

async fn run_entry_command(service: &LedgerService, cmd: EntryCommands) -> Result<()> {
    match cmd {
        EntryCommands::Create { account_id, amount } => {
            let amount_cents =
                parse_cents(&amount).context("Invalid amount format. Use '50.00' or '-12.50'")?;
            let result = service.post_entry(account_id, amount_cents).await?;
            println!(
                "Recorded entry {}: {} on account {} (balance {} {})",
                result.entry.id,
                format_cents(result.entry.amount),
                result.account.id,
                format_cents(result.account.balance),
                result.account.currency
            );
        }
        EntryCommands::Show { id } => {
            let entry = service.get_entry(id).await?;
            print_entry(&entry);
        }
        EntryCommands::List {
            account_id,
            limit,
            offset,
        } => {
            let entries = service
                .list_entries(ListEntriesParams::new(account_id, limit, offset))
                .await?;
            if entries.is_empty() {
                println!("No entries found.");
                return Ok(());
            }

            println!("{:>8}  {:<20} {:>14}", "ID", "DATE", "AMOUNT");
            println!("{}", "-".repeat(44));
            for entry in entries {
                println!(
                    "{:>8}  {:<20} {:>14}",
                    entry.id,
                    entry.created_at.format("%Y-%m-%d %H:%M:%S"),
                    format_cents(entry.amount)
                );
            }
        }
    }
    Ok(())
}

async fn run_check_command(service: &LedgerService) -> Result<()> {
    println!("Checking balances...\n");

    let report = service.check_balances().await?;

    println!("Accounts:    {}", report.account_count);
    println!("Entry total: {}", format_cents_sum(report.entry_total));
    println!();

    if report.is_consistent() {
        println!("All balances match their entries.");
    } else {
        println!("Issues found:");
        for mismatch in &report.mismatches {
            println!("  - {}", mismatch);
        }
        anyhow::bail!("Balance check failed");
    }

    Ok(())
}

async fn run_export_command(
    service: &LedgerService,
    account_id: i64,
    format: ExportFormat,
    output: Option<String>,
) -> Result<()> {
    let writer: Box<dyn Write> = match &output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    let exporter = Exporter::new(service);
    let count = match format {
        ExportFormat::Csv => exporter.export_entries_csv(account_id, writer).await?,
        ExportFormat::Json => exporter.export_statement_json(account_id, writer).await?,
    };

    if let Some(path) = output {
        println!("Exported {} entries to {}", count, path);
    }
    Ok(())
}

fn print_account(account: &Account) {
    println!("Account: {}", account.id);
    println!("  Owner:    {}", account.owner);
    println!("  Currency: {}", account.currency);
    println!("  Balance:  {}", format_cents(account.balance));
    println!(
        "  Opened:   {}",
        account.created_at.format("%Y-%m-%d %H:%M:%S")
    );
}

fn print_entry(entry: &Entry) {
    println!("Entry: {}", entry.id);
    println!("  Account:  {}", entry.account_id);
    println!("  Amount:   {}", format_cents(entry.amount));
    println!(
        "  Recorded: {}",
        entry.created_at.format("%Y-%m-%d %H:%M:%S")
    );
}
