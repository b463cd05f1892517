//! drip-sim: replay a payout schedule end to end.
//!
//! Deploys a rewards manager over in-memory collaborators, funds it, and
//! drives every payout and checkpoint at the earliest legal time, printing
//! one line per week.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use drip_core::constants::{REFERENCE_DEPOSIT_TOKENS, SECONDS_PER_DAY};
use drip_core::types::{Address, Amount, AssetId, Timestamp};
use drip_manager::{AdvanceOutcome, ManagerConfig, MemoryFeeDistributor, MemoryLedger, RewardsManager};
use drip_schedule::minimum_funding;
use serde::Serialize;
use tracing::{debug, info};

const MANAGER: Address = Address::repeat_byte(0x4D);
const OWNER: Address = Address::repeat_byte(0x01);
const KEEPER: Address = Address::repeat_byte(0x02);
const DESTINATION: Address = Address::repeat_byte(0xDD);
const REWARD_ASSET: AssetId = AssetId::repeat_byte(0xAA);

/// Simulate a decaying weekly reward schedule.
#[derive(Parser, Debug)]
#[command(name = "drip-sim", version, about = "Replay a Drip payout schedule")]
struct Args {
    /// Deposit in whole tokens
    #[arg(long, default_value_t = REFERENCE_DEPOSIT_TOKENS)]
    deposit: u64,

    /// JSON config file; otherwise DRIP_* environment variables apply
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of weekly payouts
    #[arg(long)]
    weeks: Option<u32>,

    /// Final weekly payout in whole tokens
    #[arg(long)]
    floor: Option<u64>,

    /// Days between a checkpoint and the next payout
    #[arg(long)]
    payout_gate_days: Option<u64>,

    /// Days between a payout and its checkpoint
    #[arg(long)]
    checkpoint_gate_days: Option<u64>,

    /// Deployment timestamp (unix seconds)
    #[arg(long, default_value_t = 1_700_000_000)]
    start: Timestamp,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Log output format ("text" or "json")
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Print one JSON object per week instead of text
    #[arg(long)]
    json: bool,
}

impl Args {
    fn resolve_config(&self) -> Result<ManagerConfig> {
        let mut cfg = match &self.config {
            Some(path) => ManagerConfig::from_json_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => ManagerConfig::from_env().context("invalid DRIP_* environment")?,
        };
        if let Some(weeks) = self.weeks {
            cfg.weeks = weeks;
        }
        if let Some(floor) = self.floor {
            cfg.floor = floor;
        }
        if let Some(days) = self.payout_gate_days {
            cfg.payout_gate_secs = days
                .checked_mul(SECONDS_PER_DAY)
                .context("payout gate overflow")?;
        }
        if let Some(days) = self.checkpoint_gate_days {
            cfg.checkpoint_gate_secs = days
                .checked_mul(SECONDS_PER_DAY)
                .context("checkpoint gate overflow")?;
        }
        cfg.validate().context("invalid configuration")?;
        Ok(cfg)
    }
}

#[derive(Serialize)]
struct WeekReport {
    week: u32,
    paid_at: Timestamp,
    /// Base units, as a string so 18-decimal amounts survive JSON readers.
    amount: String,
    tokens: String,
    weeks_remaining: u32,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level, &args.log_format);

    let cfg = args.resolve_config()?;
    info!(?cfg, deposit = args.deposit, "starting simulation");
    run(&cfg, args.deposit, args.start, args.json)
}

fn run(cfg: &ManagerConfig, deposit_tokens: u64, start: Timestamp, json: bool) -> Result<()> {
    let unit = cfg.unit()?;
    let deposit = Amount::from(deposit_tokens)
        .checked_mul(unit)
        .context("deposit overflows base units")?;
    let floor = cfg.floor_amount()?;
    let need = minimum_funding(cfg.weeks, floor)?;
    if deposit < need {
        bail!(
            "deposit of {} tokens cannot fund {} weeks with floor {}; need at least {}",
            deposit_tokens,
            cfg.weeks,
            cfg.floor,
            format_tokens(need, cfg.decimals)
        );
    }

    let deployment = cfg.deployment(MANAGER, OWNER, REWARD_ASSET, DESTINATION)?;
    let mut ledger = MemoryLedger::new();
    ledger
        .mint(REWARD_ASSET, MANAGER, deposit)
        .context("failed to fund manager")?;
    let mut manager = RewardsManager::deploy(
        deployment,
        ledger,
        MemoryFeeDistributor::new(OWNER),
        start,
    )?;
    manager.set_authorized(&OWNER, KEEPER, true)?;

    let mut week = 0;
    while let Some(at) = manager.next_advance_at() {
        match manager.advance(&KEEPER, at)? {
            AdvanceOutcome::Paid {
                amount,
                weeks_remaining,
            } => {
                week += 1;
                let report = WeekReport {
                    week,
                    paid_at: at,
                    amount: amount.to_string(),
                    tokens: format_tokens(amount, cfg.decimals),
                    weeks_remaining,
                };
                if json {
                    println!("{}", serde_json::to_string(&report)?);
                } else {
                    println!(
                        "week {:>3}  t={}  paid {:>12}  ({} left)",
                        report.week, report.paid_at, report.tokens, report.weeks_remaining
                    );
                }
            }
            AdvanceOutcome::Checkpointed { weeks_remaining } => {
                debug!(weeks_remaining, at, "checkpoint");
            }
        }
    }

    let held = manager.held_balance();
    if json {
        println!(
            "{}",
            serde_json::json!({
                "held": held.to_string(),
                "held_tokens": format_tokens(held, cfg.decimals),
            })
        );
    } else {
        println!("final held balance: {}", format_tokens(held, cfg.decimals));
    }
    Ok(())
}

/// Exact decimal rendering of `amount` base units.
fn format_tokens(amount: Amount, decimals: u8) -> String {
    let Some(unit) = drip_core::constants::unit(decimals) else {
        return amount.to_string();
    };
    let whole = amount / unit;
    let frac = amount % unit;
    if frac == 0 {
        return whole.to_string();
    }
    let digits = format!("{:0width$}", frac, width = decimals as usize);
    format!("{whole}.{}", digits.trim_end_matches('0'))
}

/// Initialize tracing subscriber with the given log level and output format.
///
/// `RUST_LOG` takes precedence over `level_str`.
fn init_logging(level_str: &str, format: &str) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_str));

    if format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .init();
    }
}
