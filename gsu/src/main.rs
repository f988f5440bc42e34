use clap::{Parser, ValueEnum};
use gsulib::{
    error::Result,
    formats::qif::{AccountKind, CashGroup, InvestmentGroup},
    layout::Layout,
    options::QifOptions,
    traits::{ReadFormat, WriteFormat},
};
use std::fs::File;
use std::io::{self, BufReader, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod ledger;

use ledger::Ledger;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Mode {
    Original,
    PreSplit,
    AltSummary,
    #[value(name = "post2016")]
    Post2016,
    RatedTaxes,
}

impl From<Mode> for Layout {
    fn from(m: Mode) -> Self {
        match m {
            Mode::Original => Layout::Original,
            Mode::PreSplit => Layout::PreSplit,
            Mode::AltSummary => Layout::AltSummary,
            Mode::Post2016 => Layout::Post2016,
            Mode::RatedTaxes => Layout::RatedTaxes,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "gsu", version, about = "Подтверждение о выпуске акций -> проводки QIF")]
struct Cli {
    /// Входной файл (по умолчанию stdin)
    #[arg(short = 'i', long = "input")]
    input: Option<PathBuf>,

    /// Формат выписки
    #[arg(short = 'l', long = "layout", value_enum, default_value = "original", env = "GSU_LAYOUT")]
    layout: Mode,

    /// Файл инвестиционного счёта (дозапись)
    #[arg(long = "investment-qif", default_value = "gsu-investment.qif", env = "GSU_INVESTMENT_QIF")]
    investment_qif: PathBuf,

    /// Файл денежного счёта (дозапись)
    #[arg(long = "cash-qif", default_value = "gsu-cash.qif", env = "GSU_CASH_QIF")]
    cash_qif: PathBuf,

    /// YAML с именами счетов и категорий
    #[arg(short = 'c', long = "config", env = "GSU_CONFIG")]
    config: Option<PathBuf>,

    /// Только проверить выписку и вывести её в YAML, файлы не трогать
    #[arg(long = "dry-run")]
    dry_run: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("gsu: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let opts = match &cli.config {
        Some(path) => QifOptions::load(path)?,
        None => QifOptions::default(),
    };

    // reader
    let reader: Box<dyn io::Read> = match &cli.input {
        Some(path) => Box::new(File::open(path)?),
        None => Box::new(io::stdin()),
    };

    let layout = Layout::from(cli.layout);
    info!(layout = layout.name(), "reading release statement");
    let rel = layout.read(BufReader::new(reader))?;
    info!(
        ticker = %rel.ticker,
        release_date = %rel.release_date,
        shares = %rel.shares_released,
        "release validated"
    );

    if cli.dry_run {
        serde_yaml::to_writer(io::stdout().lock(), &rel)?;
        return Ok(());
    }

    // обе группы целиком в памяти до первой записи в файлы
    let mut invst = Vec::new();
    InvestmentGroup(&opts).write(&mut invst, &rel)?;
    let mut cash = Vec::new();
    CashGroup(&opts).write(&mut cash, &rel)?;

    let invst_ledger = Ledger::open(&cli.investment_qif)?;
    let cash_ledger = match Ledger::open(&cli.cash_qif) {
        Ok(l) => l,
        Err(e) => {
            if let Err(rm) = invst_ledger.abandon() {
                warn!(path = %cli.investment_qif.display(), error = %rm, "could not remove new ledger file");
            }
            return Err(e);
        }
    };

    for (ledger, path, account, kind, body) in [
        (invst_ledger, &cli.investment_qif, &opts.investment_account, AccountKind::Investment, &invst),
        (cash_ledger, &cli.cash_qif, &opts.cash_account, AccountKind::Bank, &cash),
    ] {
        let created = ledger.append(account, kind, body)?;
        info!(path = %path.display(), created, "transactions appended");
    }
    Ok(())
}
