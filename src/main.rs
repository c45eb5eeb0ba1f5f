// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{bail, Context, Result};
use std::env;

use payment_dues::{
    format_due_date, init_logging, open_repository, total_due, AppConfig, PaymentFields,
    PaymentRepository, ThemeProvider,
};

const USAGE: &str = "\
Usage:
  payment-dues                                            open the terminal UI
  payment-dues list                                       print all dues
  payment-dues total                                      print the total due
  payment-dues add <title> <amount> <due-date> <category>
  payment-dues edit <id> <title> <amount> <due-date> <category>
  payment-dues delete <id>
  payment-dues theme [toggle]";

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let config = AppConfig::from_env()?;

    if args.is_empty() {
        // UI mode (default); logs stay quiet unless asked for
        if env::var("DUES_LOG").is_ok() {
            init_logging(&config.log_filter);
        }
        return run_ui_mode(&config);
    }

    init_logging(&config.log_filter);
    let repo = open_repository(&config)?;

    match args[0].as_str() {
        "list" => run_list(&repo),
        "total" => {
            println!("{:.2}", repo.total_due());
            Ok(())
        }
        "add" => run_add(&repo, &args[1..]),
        "edit" => run_edit(&repo, &args[1..]),
        "delete" => run_delete(&repo, &args[1..]),
        "theme" => run_theme(repo, &args[1..]),
        "help" | "--help" | "-h" => {
            println!("{}", USAGE);
            Ok(())
        }
        other => bail!("Unknown command '{}'\n\n{}", other, USAGE),
    }
}

fn run_list(repo: &PaymentRepository) -> Result<()> {
    let dues = repo.list();

    if dues.is_empty() {
        println!("No payment dues yet. Add one with: payment-dues add ...");
        return Ok(());
    }

    println!(
        "{:<26} {:<24} {:>12} {:<14} {}",
        "ID", "TITLE", "AMOUNT", "DUE", "CATEGORY"
    );
    for due in &dues {
        println!(
            "{:<26} {:<24} {:>12.2} {:<14} {}",
            due.id,
            truncate(&due.title, 24),
            due.amount,
            format_due_date(&due.due_date),
            due.category
        );
    }
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Total due: {:.2} ({} entries)", total_due(&dues), dues.len());

    Ok(())
}

fn run_add(repo: &PaymentRepository, args: &[String]) -> Result<()> {
    let fields = parse_fields(args)?;
    let created = repo.create(fields)?;

    println!("✓ Added '{}' ({:.2}) with id {}", created.title, created.amount, created.id);
    Ok(())
}

fn run_edit(repo: &PaymentRepository, args: &[String]) -> Result<()> {
    let Some((id, rest)) = args.split_first() else {
        bail!("edit needs an id\n\n{}", USAGE);
    };

    let fields = parse_fields(rest)?;
    let updated = repo.update(id, fields)?;

    println!("✓ Updated '{}' ({:.2})", updated.title, updated.amount);
    Ok(())
}

fn run_delete(repo: &PaymentRepository, args: &[String]) -> Result<()> {
    let [id] = args else {
        bail!("delete needs exactly one id\n\n{}", USAGE);
    };

    repo.remove(id)?;
    println!("✓ Deleted {}", id);
    Ok(())
}

fn run_theme(repo: PaymentRepository, args: &[String]) -> Result<()> {
    let mut theme = ThemeProvider::load(repo);

    match args.first().map(String::as_str) {
        None => println!("{}", theme.current()),
        Some("toggle") => {
            let mode = theme.toggle();
            theme.flush();
            println!("✓ Theme is now {}", mode);
        }
        Some(other) => bail!("Unknown theme command '{}'\n\n{}", other, USAGE),
    }

    Ok(())
}

fn parse_fields(args: &[String]) -> Result<PaymentFields> {
    let [title, amount, due_date, category] = args else {
        bail!("expected <title> <amount> <due-date> <category>\n\n{}", USAGE);
    };

    let amount: f64 = amount
        .trim()
        .parse()
        .with_context(|| format!("Amount must be a valid number, got '{}'", amount))?;

    Ok(PaymentFields::new(
        title.as_str(),
        amount,
        due_date.as_str(),
        category.as_str(),
    ))
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        s.to_string()
    }
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &AppConfig) -> Result<()> {
    let repo = open_repository(config)?;
    let theme = ThemeProvider::load(repo.clone());

    let mut app = ui::App::new(repo, theme);
    ui::run_ui(&mut app)?;

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &AppConfig) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use a subcommand: payment-dues list");
    std::process::exit(1);
}
