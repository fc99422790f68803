//! These structs provide the CLI interface for the expenses CLI.

use crate::model::Period;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// expenses: Compare spending across months.
///
/// The program reads two transaction histories, a card invoice and an account statement, merges
/// them and reports how spending by category changed from one month to the next.
///
/// Run `expenses init` first to write a configuration file that says where the two histories
/// live. Each may be a local CSV or workbook (xlsx, xls, ods) file or an http(s) URL to one.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the configuration file.
    ///
    /// This is the first command you should run. Relative paths are resolved against the
    /// directory that holds the configuration file.
    Init(InitArgs),
    /// Show the categories with the largest increases and reductions into the latest month.
    Overview(OverviewArgs),
    /// Show the total spend of each month, optionally restricted to some categories.
    Monthly(MonthlyArgs),
    /// Show the spend by category in one month with the small categories folded together.
    Categories(CategoriesArgs),
    /// Compare the headline figures of a month with the month before it.
    Summary(SummaryArgs),
    /// Show the spend of every category in every month.
    Trend,
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The path to the configuration file. Defaults to ~/.expenses/config.json
    #[arg(long, env = "EXPENSES_CONFIG", default_value_t = default_config_path())]
    config: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, config: PathBuf) -> Self {
        Self {
            log_level,
            config: config.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn config(&self) -> &DisplayPath {
        &self.config
    }
}

/// Args for the `expenses init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// Where the card invoice history lives, a CSV or workbook file path or an http(s) URL.
    #[arg(long)]
    invoice: String,

    /// Where the account statement history lives, a CSV or workbook file path or an http(s) URL.
    #[arg(long)]
    statement: String,
}

impl InitArgs {
    pub fn new(invoice: impl Into<String>, statement: impl Into<String>) -> Self {
        Self {
            invoice: invoice.into(),
            statement: statement.into(),
        }
    }

    pub fn invoice(&self) -> &str {
        &self.invoice
    }

    pub fn statement(&self) -> &str {
        &self.statement
    }
}

/// Args for the `expenses overview` command.
#[derive(Debug, Default, Parser, Clone)]
pub struct OverviewArgs {
    /// How many categories to list in each direction. Defaults to `top_n` from the config file.
    #[arg(long)]
    top: Option<usize>,
}

impl OverviewArgs {
    pub fn new(top: Option<usize>) -> Self {
        Self { top }
    }

    pub fn top(&self) -> Option<usize> {
        self.top
    }
}

/// Args for the `expenses monthly` command.
#[derive(Debug, Default, Parser, Clone)]
pub struct MonthlyArgs {
    /// Only count this category. May be given more than once. All categories when omitted.
    #[arg(long = "category")]
    categories: Vec<String>,
}

impl MonthlyArgs {
    pub fn new(categories: Vec<String>) -> Self {
        Self { categories }
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }
}

/// Args for the `expenses categories` command.
#[derive(Debug, Default, Parser, Clone)]
pub struct CategoriesArgs {
    /// The month to break down, e.g. 2024-03. Defaults to the latest month in the data.
    #[arg(long)]
    period: Option<Period>,

    /// Categories below this fraction of the month's total are folded together, e.g. 0.05.
    /// Defaults to `other_threshold` from the config file.
    #[arg(long)]
    threshold: Option<Decimal>,
}

impl CategoriesArgs {
    pub fn new(period: Option<Period>, threshold: Option<Decimal>) -> Self {
        Self { period, threshold }
    }

    pub fn period(&self) -> Option<Period> {
        self.period
    }

    pub fn threshold(&self) -> Option<Decimal> {
        self.threshold
    }
}

/// Args for the `expenses summary` command.
#[derive(Debug, Default, Parser, Clone)]
pub struct SummaryArgs {
    /// The month to summarize, e.g. 2024-03. Defaults to the latest month in the data.
    #[arg(long)]
    period: Option<Period>,
}

impl SummaryArgs {
    pub fn new(period: Option<Period>) -> Self {
        Self { period }
    }

    pub fn period(&self) -> Option<Period> {
        self.period
    }
}

fn default_config_path() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join(".expenses").join("config.json"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --config or EXPENSES_CONFIG instead of relying on the default \
                config path.",
            );
            PathBuf::from(".expenses").join("config.json")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
