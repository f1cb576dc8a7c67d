//! # plmkit-cli
//!
//! Command-line interface for the plmkit spreadsheet transforms.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use plmkit_reshape::Account;
use plmkit_sheet::{Book, Sheet};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// plmkit - reshape business-system spreadsheet exports into PLM/MCU uploads
#[derive(Parser)]
#[command(name = "plmkit")]
#[command(author, version, about = "Reshape spreadsheet exports into PLM/MCU uploads", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Run an account's transform over a workbook and write the result
    Convert {
        /// Which account transform to run
        #[arg(value_enum)]
        account: AccountArg,

        /// Input .xlsx workbook
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output path (defaults to the account's standard file name)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Print the first N rows of the result to stdout
        #[arg(short, long, value_name = "N")]
        preview: Option<usize>,
    },

    /// List the sheet names of a workbook
    Sheets {
        /// Input .xlsx workbook
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
}

/// Account selector as spelled on the command line.
#[derive(Clone, Copy, clap::ValueEnum)]
enum AccountArg {
    /// Savage buy file -> PLM upload
    SavageBuy,
    /// Savage PLM download -> MCU sheet
    SavagePlm,
    /// HugoBoss buy file -> PLM upload
    HugobossBuy,
    /// HugoBoss PLM download -> MCU sheet
    HugobossPlm,
    /// VSPINK brief -> MCU sheet
    Vspink,
}

impl From<AccountArg> for Account {
    fn from(arg: AccountArg) -> Self {
        match arg {
            AccountArg::SavageBuy => Account::SavageBuy,
            AccountArg::SavagePlm => Account::SavagePlm,
            AccountArg::HugobossBuy => Account::HugoBossBuy,
            AccountArg::HugobossPlm => Account::HugoBossPlm,
            AccountArg::Vspink => Account::Vspink,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .init();
    }

    match cli.command {
        Command::Convert {
            account,
            input,
            output,
            preview,
        } => run_convert(account.into(), &input, output, preview),
        Command::Sheets { input } => run_sheets(&input),
    }
}

/// Load, transform, save, and optionally preview.
fn run_convert(
    account: Account,
    input: &PathBuf,
    output: Option<PathBuf>,
    preview: Option<usize>,
) -> Result<()> {
    let book = Book::from_xlsx(input)
        .with_context(|| format!("Failed to read workbook: {}", input.display()))?;

    let result = account
        .convert(&book)
        .with_context(|| format!("{account} transform failed"))?;

    let out_path = output.unwrap_or_else(|| PathBuf::from(account.default_file_name()));
    result
        .save_as_xlsx(&out_path)
        .with_context(|| format!("Failed to write workbook: {}", out_path.display()))?;

    println!(
        "{} {} rows -> {}",
        "ok".green().bold(),
        result.row_count(),
        out_path.display()
    );

    if let Some(n) = preview {
        print_preview(&result, n);
    }

    Ok(())
}

/// List the sheet names of a workbook, one per line.
fn run_sheets(input: &PathBuf) -> Result<()> {
    let names = Book::xlsx_sheet_names(input)
        .with_context(|| format!("Failed to read workbook: {}", input.display()))?;
    for name in names {
        println!("{name}");
    }
    Ok(())
}

/// Print the header and the first `limit` rows as an aligned text table.
fn print_preview(sheet: &Sheet, limit: usize) {
    let Some(headers) = sheet.column_names() else {
        return;
    };

    let rows: Vec<Vec<String>> = sheet
        .rows()
        .take(limit)
        .map(|row| row.iter().map(ToString::to_string).collect())
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(String::len).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.len());
            }
        }
    }

    let header_line = headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{h:<width$}", width = widths[i]))
        .collect::<Vec<_>>()
        .join("  ");
    println!("{}", header_line.bold());

    for row in &rows {
        let line = row
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{cell:<width$}", width = widths[i]))
            .collect::<Vec<_>>()
            .join("  ");
        println!("{line}");
    }

    let remaining = sheet.row_count().saturating_sub(limit);
    if remaining > 0 {
        println!("{}", format!("... {remaining} more rows").dimmed());
    }
}
