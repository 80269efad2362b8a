//! Command-line surface over the expense services.

use std::fmt::Write as _;
use std::path::PathBuf;

use chrono::NaiveDate;
use colored::Colorize;
use once_cell::sync::Lazy;
use uuid::Uuid;

use crate::config::{Config, ConfigManager};
use crate::core::ledger_manager::LedgerManager;
use crate::core::services::{ExpenseDraft, ExpenseService, SummaryOptions, SummaryService};
use crate::core::utils::PathResolver;
use crate::domain::Displayable;
use crate::errors::{CliError, ExpenseError};
use crate::ledger::{quote_monthly_payment, Ledger, PaymentQuote, SeriesOrder};
use crate::storage::JsonStorage;

const DATE_FORMAT: &str = "%Y-%m-%d";
const MAX_SUGGESTION_DISTANCE: usize = 3;

struct CommandSpec {
    name: &'static str,
    usage: &'static str,
}

const COMMANDS: &[CommandSpec] = &[
    CommandSpec { name: "new", usage: "new <ledger>" },
    CommandSpec { name: "ledgers", usage: "ledgers" },
    CommandSpec {
        name: "add",
        usage: "add <ledger> <name> <amount> <YYYY-MM-DD> [--rate <percent> --end <YYYY-MM-DD>]",
    },
    CommandSpec {
        name: "update",
        usage: "update <ledger> <id> <name> <amount> <YYYY-MM-DD> [--rate <percent> --end <YYYY-MM-DD>]",
    },
    CommandSpec { name: "remove", usage: "remove <ledger> <id>" },
    CommandSpec { name: "list", usage: "list <ledger>" },
    CommandSpec { name: "breakdown", usage: "breakdown <ledger> [--sorted]" },
    CommandSpec { name: "chart", usage: "chart <ledger> [--sorted]" },
    CommandSpec {
        name: "payment",
        usage: "payment <amount> <rate> <YYYY-MM-DD> <YYYY-MM-DD>",
    },
    CommandSpec { name: "config", usage: "config [show | set <key> <value>]" },
];

static USAGE: Lazy<String> = Lazy::new(|| {
    let mut usage = String::from("Usage: expense_core_cli <command>\nCommands:");
    for spec in COMMANDS {
        usage.push_str("\n  ");
        usage.push_str(spec.usage);
    }
    usage
});

pub fn usage() -> &'static str {
    &USAGE
}

/// A parsed command line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    New { ledger: String },
    Ledgers,
    Add { ledger: String, draft: ExpenseDraft },
    Update { ledger: String, id: Uuid, draft: ExpenseDraft },
    Remove { ledger: String, id: Uuid },
    List { ledger: String },
    Breakdown { ledger: String, sorted: bool },
    Chart { ledger: String, sorted: bool },
    Payment { amount: f64, rate: f64, start: NaiveDate, end: NaiveDate },
    ConfigShow,
    ConfigSet { key: String, value: String },
}

impl Command {
    pub fn parse(args: &[String]) -> Result<Self, CliError> {
        let (name, rest) = args
            .split_first()
            .ok_or_else(|| CliError::Input(usage().to_string()))?;
        let (positional, flags) = split_flags(rest)?;
        let arg = |index: usize| positional_arg(&positional, index, name);

        let command = match name.as_str() {
            "new" => Command::New {
                ledger: arg(0)?.to_string(),
            },
            "ledgers" => Command::Ledgers,
            "add" => Command::Add {
                ledger: arg(0)?.to_string(),
                draft: draft_from(arg(1)?, arg(2)?, arg(3)?, &flags)?,
            },
            "update" => Command::Update {
                ledger: arg(0)?.to_string(),
                id: parse_id(arg(1)?)?,
                draft: draft_from(arg(2)?, arg(3)?, arg(4)?, &flags)?,
            },
            "remove" => Command::Remove {
                ledger: arg(0)?.to_string(),
                id: parse_id(arg(1)?)?,
            },
            "list" => Command::List {
                ledger: arg(0)?.to_string(),
            },
            "breakdown" => Command::Breakdown {
                ledger: arg(0)?.to_string(),
                sorted: flags.sorted,
            },
            "chart" => Command::Chart {
                ledger: arg(0)?.to_string(),
                sorted: flags.sorted,
            },
            "payment" => Command::Payment {
                amount: parse_number(arg(0)?, "amount")?,
                rate: parse_number(arg(1)?, "rate")?,
                start: parse_date(arg(2)?)?,
                end: parse_date(arg(3)?)?,
            },
            "config" => match positional.first().map(String::as_str) {
                None | Some("show") => Command::ConfigShow,
                Some("set") => Command::ConfigSet {
                    key: arg(1)?.to_string(),
                    value: arg(2)?.to_string(),
                },
                Some(other) => {
                    return Err(CliError::Input(format!(
                        "unknown config action `{}`",
                        other
                    )))
                }
            },
            other => return Err(CliError::Input(unknown_command(other))),
        };
        Ok(command)
    }
}

fn positional_arg<'a>(positional: &'a [String], index: usize, name: &str) -> Result<&'a str, CliError> {
    positional
        .get(index)
        .map(String::as_str)
        .ok_or_else(|| CliError::Input(format!("usage: {}", usage_for(name))))
}

#[derive(Debug, Default)]
struct Flags {
    rate: Option<f64>,
    end: Option<NaiveDate>,
    sorted: bool,
}

fn split_flags(args: &[String]) -> Result<(Vec<String>, Flags), CliError> {
    let mut positional = Vec::new();
    let mut flags = Flags::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--rate" => {
                let value = iter
                    .next()
                    .ok_or_else(|| CliError::Input("--rate needs a value".into()))?;
                flags.rate = Some(parse_number(value, "rate")?);
            }
            "--end" => {
                let value = iter
                    .next()
                    .ok_or_else(|| CliError::Input("--end needs a value".into()))?;
                flags.end = Some(parse_date(value)?);
            }
            "--sorted" => flags.sorted = true,
            flag if flag.starts_with("--") => {
                return Err(CliError::Input(format!("unknown flag `{}`", flag)))
            }
            _ => positional.push(arg.clone()),
        }
    }
    Ok((positional, flags))
}

fn draft_from(name: &str, amount: &str, date: &str, flags: &Flags) -> Result<ExpenseDraft, CliError> {
    let mut draft = ExpenseDraft::one_time(name, parse_number(amount, "amount")?, parse_date(date)?);
    if flags.rate.is_some() || flags.end.is_some() {
        draft.long_term = true;
        draft.interest_rate = flags.rate;
        draft.end_date = flags.end;
    }
    Ok(draft)
}

fn parse_date(raw: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| CliError::Input(format!("`{}` is not a YYYY-MM-DD date", raw)))
}

fn parse_number(raw: &str, field: &str) -> Result<f64, CliError> {
    raw.parse::<f64>()
        .map_err(|_| CliError::Input(format!("{} `{}` is not a number", field, raw)))
}

fn parse_id(raw: &str) -> Result<Uuid, CliError> {
    Uuid::parse_str(raw).map_err(|_| CliError::Input(format!("`{}` is not an expense id", raw)))
}

fn usage_for(name: &str) -> &'static str {
    COMMANDS
        .iter()
        .find(|spec| spec.name == name)
        .map(|spec| spec.usage)
        .unwrap_or("")
}

fn unknown_command(name: &str) -> String {
    let suggestion = COMMANDS
        .iter()
        .map(|spec| (spec.name, strsim::levenshtein(name, spec.name)))
        .filter(|(_, distance)| *distance <= MAX_SUGGESTION_DISTANCE)
        .min_by_key(|(_, distance)| *distance);
    match suggestion {
        Some((candidate, _)) => format!("unknown command `{}`; did you mean `{}`?", name, candidate),
        None => format!("unknown command `{}`\n{}", name, usage()),
    }
}

/// Holds the ledger manager and configuration for one CLI invocation.
pub struct CliContext {
    manager: LedgerManager,
    configs: ConfigManager,
    config: Config,
}

impl CliContext {
    pub fn new(base: Option<PathBuf>) -> Result<Self, CliError> {
        let base = PathResolver::resolve_base(base);
        let storage = JsonStorage::new(Some(base.clone()))?;
        let configs = ConfigManager::with_base_dir(base)?;
        let config = configs.load()?;
        Ok(Self {
            manager: LedgerManager::new(Box::new(storage)),
            configs,
            config,
        })
    }

    pub fn execute(&mut self, command: Command) -> Result<String, CliError> {
        match command {
            Command::New { ledger } => {
                self.manager.create(&ledger)?;
                let path = self.manager.save()?;
                self.remember(&ledger)?;
                Ok(format!("New ledger `{}` created at {}", ledger, path.display()))
            }
            Command::Ledgers => {
                let names = self.manager.list()?;
                if names.is_empty() {
                    return Ok("No ledgers yet.".into());
                }
                Ok(names.join("\n"))
            }
            Command::Add { ledger, draft } => {
                let id = ExpenseService::add(self.open(&ledger)?, draft)?;
                self.manager.save()?;
                Ok(format!("Added expense {}", id))
            }
            Command::Update { ledger, id, draft } => {
                ExpenseService::update(self.open(&ledger)?, id, draft)?;
                self.manager.save()?;
                Ok(format!("Updated expense {}", id))
            }
            Command::Remove { ledger, id } => {
                let removed = ExpenseService::remove(self.open(&ledger)?, id)?;
                self.manager.save()?;
                Ok(format!("Removed {}", removed.display_label()))
            }
            Command::List { ledger } => {
                let ledger = self.open(&ledger)?;
                let expenses = ExpenseService::list(ledger);
                if expenses.is_empty() {
                    return Ok("No expenses recorded.".into());
                }
                let mut out = String::new();
                for expense in expenses {
                    let kind = if expense.long_term { "long-term" } else { "one-time" };
                    let _ = writeln!(
                        out,
                        "{}  {:<9}  {}",
                        expense.id.to_string().dimmed(),
                        kind,
                        expense.display_label()
                    );
                }
                Ok(out.trim_end().to_string())
            }
            Command::Breakdown { ledger, sorted } => {
                let options = self.options(sorted);
                let breakdown = SummaryService::breakdown(self.open(&ledger)?, options);
                let mut out = String::new();
                for bucket in breakdown.buckets() {
                    let _ = writeln!(
                        out,
                        "{}  {}",
                        bucket.month.to_string().bold(),
                        self.config.format_amount(bucket.total()).green()
                    );
                    for item in &bucket.contributions {
                        let _ = writeln!(
                            out,
                            "    {:<24} {}",
                            item.name,
                            self.config.format_amount(item.amount)
                        );
                    }
                }
                for id in &breakdown.skipped {
                    let _ = writeln!(out, "{} expense {} has no monthly amount", "skipped:".yellow(), id);
                }
                let _ = write!(out, "Total  {}", self.config.format_amount(breakdown.total()));
                Ok(out)
            }
            Command::Chart { ledger, sorted } => {
                let options = self.options(sorted);
                let chart = SummaryService::bar_chart(self.open(&ledger)?, options);
                Ok(serde_json::to_string_pretty(&chart).map_err(ExpenseError::from)?)
            }
            Command::Payment {
                amount,
                rate,
                start,
                end,
            } => match quote_monthly_payment(amount, rate, start, end) {
                PaymentQuote::Amortized { months, payment } => Ok(format!(
                    "{} per month over {} months (total {})",
                    self.config.format_amount(payment),
                    months,
                    self.config.format_amount(payment * months as f64)
                )),
                PaymentQuote::Degenerate => Ok(format!(
                    "{} (end date must fall in a later month than the start date)",
                    self.config.format_amount(0.0).yellow()
                )),
            },
            Command::ConfigShow => {
                Ok(serde_json::to_string_pretty(&self.config).map_err(ExpenseError::from)?)
            }
            Command::ConfigSet { key, value } => {
                self.config.set(&key, &value)?;
                self.configs.save(&self.config)?;
                Ok(format!("Set {} = {}", key, value))
            }
        }
    }

    fn open(&mut self, name: &str) -> Result<&mut Ledger, CliError> {
        if self.manager.current_name() != Some(name) {
            self.manager.load(name)?;
            self.remember(name)?;
        }
        Ok(self.manager.current_mut()?)
    }

    fn remember(&mut self, name: &str) -> Result<(), CliError> {
        if self.config.last_opened_ledger.as_deref() != Some(name) {
            self.config.last_opened_ledger = Some(name.to_string());
            self.configs.save(&self.config)?;
        }
        Ok(())
    }

    fn options(&self, sorted: bool) -> SummaryOptions {
        let mut options = SummaryOptions::from(&self.config);
        if sorted {
            options.order = SeriesOrder::Chronological;
        }
        options
    }
}

/// Parses and executes one command, returning the text to print.
pub fn run<I>(args: I, base: Option<PathBuf>) -> Result<String, CliError>
where
    I: IntoIterator<Item = String>,
{
    let args: Vec<String> = args.into_iter().collect();
    let command = Command::parse(&args)?;
    tracing::debug!(?command, "running command");
    CliContext::new(base)?.execute(command)
}
