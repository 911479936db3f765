//! tierdraw-cli: inspect the parameters and outcomes of a multi-tier draw.
//!
//! Prints tier tables, odds, frequencies, canary and claim counts,
//! exchange-rate splits and single winner checks. Output is plain text by
//! default or JSON with `--json`.

mod settings;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info};

use tierdraw_core::crypto::{Blake3DrawHasher, Sha256DrawHasher};
use tierdraw_core::fixed::UFixed18;
use tierdraw_core::traits::{DrawHasher, TierCalculator, Transcendental};
use tierdraw_core::types::{AccountId, DrawParams, Participant, ShareConfig, WinningRandomNumber};
use tierdraw_tiers::winner::{calculate_pseudo_random_number, calculate_winning_zone};
use tierdraw_tiers::{BinaryLogExp, ExchangeRateLedger, TierEngine};

use crate::settings::{HasherKind, Settings};

/// Multi-tier prize draw inspector.
#[derive(Parser, Debug)]
#[command(name = "tierdraw-cli", version, about = "Inspect multi-tier prize draw parameters")]
struct Cli {
    /// TOML settings file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error). Overrides settings.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log output format ("text" or "json"). Overrides settings.
    #[arg(long, global = true)]
    log_format: Option<String>,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print every tier of the draw with the canary and claim counts.
    Table(DrawArgs),
    /// Odds of a single tier.
    Odds(TierArgs),
    /// Expected draws between occurrences of a tier.
    Frequency(TierArgs),
    /// Estimated prize count of the next tier.
    Canary(DrawArgs),
    /// Expected claimable prizes per draw.
    Claims(DrawArgs),
    /// Split contributions across shares, carrying the remainder.
    Exchange(ExchangeArgs),
    /// Decide whether a user wins a tier.
    Winner(WinnerArgs),
}

/// Draw layout overrides.
#[derive(Args, Debug, Default)]
struct DrawArgs {
    /// Number of tiers.
    #[arg(long)]
    tiers: Option<u8>,

    /// Expected draws between grand prizes.
    #[arg(long)]
    grand_prize_period: Option<u32>,

    #[arg(long)]
    tier_shares: Option<u64>,

    #[arg(long)]
    canary_shares: Option<u64>,

    #[arg(long)]
    reserve_shares: Option<u64>,
}

#[derive(Args, Debug)]
struct TierArgs {
    /// Tier index, 0 is the grand prize.
    #[arg(long)]
    tier: u8,

    #[command(flatten)]
    draw: DrawArgs,
}

#[derive(Args, Debug)]
struct ExchangeArgs {
    /// Total shares the contributions are split across.
    #[arg(long)]
    shares: u128,

    /// Contributed amounts, distributed in order (comma-separated).
    #[arg(long, value_delimiter = ',', required = true)]
    contributed: Vec<u128>,
}

#[derive(Args, Debug)]
struct WinnerArgs {
    /// Account id, hex.
    #[arg(long)]
    user: AccountId,

    #[arg(long)]
    tier: u8,

    /// Time-weighted average balance of the user.
    #[arg(long)]
    user_twab: u128,

    /// Time-weighted average total supply of the vault.
    #[arg(long)]
    supply: u128,

    /// Vault portion as a decimal in [0, 1].
    #[arg(long, default_value = "1")]
    portion: UFixed18,

    /// Winning random number, decimal or 0x-prefixed hex.
    #[arg(long)]
    random: WinningRandomNumber,

    /// Trial hash function. Overrides settings.
    #[arg(long, value_enum)]
    hasher: Option<HasherKind>,

    #[command(flatten)]
    draw: DrawArgs,
}

impl DrawArgs {
    /// Apply command-line overrides on top of loaded settings.
    fn resolve(&self, settings: &Settings) -> (DrawParams, ShareConfig) {
        let mut params = settings.params();
        let mut shares = settings.share_config();
        if let Some(n) = self.tiers {
            params.number_of_tiers = n;
        }
        if let Some(g) = self.grand_prize_period {
            params.grand_prize_period = g;
        }
        if let Some(s) = self.tier_shares {
            shares.tier_shares = s as u128;
        }
        if let Some(s) = self.canary_shares {
            shares.canary_shares = s as u128;
        }
        if let Some(s) = self.reserve_shares {
            shares.reserve_shares = s as u128;
        }
        (params, shares)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    let level = cli.log_level.as_deref().unwrap_or(&settings.log.level);
    let format = cli.log_format.as_deref().unwrap_or(&settings.log.format);
    init_logging(level, format);

    let engine = TierEngine::new();
    info!(math = engine.math().id(), "tierdraw-cli v{}", env!("CARGO_PKG_VERSION"));

    match &cli.command {
        Commands::Table(args) => cmd_table(&engine, args, &settings, cli.json),
        Commands::Odds(args) => cmd_odds(&engine, args, &settings, cli.json),
        Commands::Frequency(args) => cmd_frequency(&engine, args, &settings, cli.json),
        Commands::Canary(args) => cmd_canary(&engine, args, &settings, cli.json),
        Commands::Claims(args) => cmd_claims(&engine, args, &settings, cli.json),
        Commands::Exchange(args) => cmd_exchange(args, cli.json),
        Commands::Winner(args) => {
            let (params, _) = args.draw.resolve(&settings);
            match args.hasher.unwrap_or(settings.draw.hasher) {
                HasherKind::Sha256 => cmd_winner(
                    &TierEngine::with_backends(BinaryLogExp, Sha256DrawHasher),
                    args,
                    &params,
                    cli.json,
                ),
                HasherKind::Blake3 => cmd_winner(
                    &TierEngine::with_backends(BinaryLogExp, Blake3DrawHasher),
                    args,
                    &params,
                    cli.json,
                ),
            }
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value).context("failed to encode JSON")?);
    Ok(())
}

fn cmd_table(engine: &TierEngine, args: &DrawArgs, settings: &Settings, json: bool) -> Result<()> {
    let (params, shares) = args.resolve(settings);
    let table = engine
        .prize_table(&params, &shares)
        .context("failed to compute prize table")?;
    if json {
        return print_json(&table);
    }

    println!(
        "tiers: {}  grand prize period: {}  shares: {}/{}/{}",
        params.number_of_tiers,
        params.grand_prize_period,
        shares.tier_shares,
        shares.canary_shares,
        shares.reserve_shares
    );
    println!("{:>4}  {:>22}  {:>12}  {:>10}  {:>28}", "tier", "odds", "prizes", "every", "expected/draw");
    for row in &table.tiers {
        println!(
            "{:>4}  {:>22}  {:>12}  {:>10}  {:>28}",
            row.tier,
            row.odds.to_string(),
            row.prize_count,
            row.frequency_in_draws,
            row.expected_prizes_per_draw.to_string()
        );
    }
    println!("canary prize count: {}", table.canary_prize_count);
    println!("estimated claim count: {}", table.estimated_claim_count);
    Ok(())
}

#[derive(Serialize)]
struct TierValue<T: Serialize> {
    tier: u8,
    number_of_tiers: u8,
    grand_prize_period: u32,
    value: T,
}

fn cmd_odds(engine: &TierEngine, args: &TierArgs, settings: &Settings, json: bool) -> Result<()> {
    let (params, _) = args.draw.resolve(settings);
    let odds = engine
        .tier_odds(args.tier, params.number_of_tiers, params.grand_prize_period)
        .with_context(|| format!("failed to compute odds for tier {}", args.tier))?;
    if json {
        return print_json(&TierValue {
            tier: args.tier,
            number_of_tiers: params.number_of_tiers,
            grand_prize_period: params.grand_prize_period,
            value: odds,
        });
    }
    println!("{odds}");
    Ok(())
}

fn cmd_frequency(engine: &TierEngine, args: &TierArgs, settings: &Settings, json: bool) -> Result<()> {
    let (params, _) = args.draw.resolve(settings);
    let draws = engine
        .prize_frequency_in_draws(args.tier, params.number_of_tiers, params.grand_prize_period)
        .with_context(|| format!("failed to compute frequency for tier {}", args.tier))?;
    if json {
        return print_json(&TierValue {
            tier: args.tier,
            number_of_tiers: params.number_of_tiers,
            grand_prize_period: params.grand_prize_period,
            value: draws,
        });
    }
    println!("{draws}");
    Ok(())
}

fn cmd_canary(engine: &TierEngine, args: &DrawArgs, settings: &Settings, json: bool) -> Result<()> {
    let (params, shares) = args.resolve(settings);
    let canary = engine
        .canary_prize_count(params.number_of_tiers, &shares)
        .context("failed to compute canary prize count")?;
    if json {
        return print_json(&canary);
    }
    println!("{canary}");
    Ok(())
}

fn cmd_claims(engine: &TierEngine, args: &DrawArgs, settings: &Settings, json: bool) -> Result<()> {
    let (params, _) = args.resolve(settings);
    let claims = engine
        .estimated_claim_count(params.number_of_tiers, params.grand_prize_period)
        .context("failed to estimate claim count")?;
    if json {
        return print_json(&claims);
    }
    println!("{claims}");
    Ok(())
}

fn cmd_exchange(args: &ExchangeArgs, json: bool) -> Result<()> {
    let mut ledger = ExchangeRateLedger::new();
    let mut deltas = Vec::with_capacity(args.contributed.len());
    for (i, contributed) in args.contributed.iter().enumerate() {
        let (next, delta) = ledger
            .distribute(args.shares, *contributed)
            .with_context(|| format!("distribution {i} of {contributed} failed"))?;
        debug!(i, %delta, carried = %next.carried_remainder, "distributed");
        deltas.push(delta);
        ledger = next;
    }

    if json {
        #[derive(Serialize)]
        struct Report<'a> {
            deltas: &'a [UFixed18],
            ledger: ExchangeRateLedger,
        }
        return print_json(&Report { deltas: &deltas, ledger });
    }
    for (contributed, delta) in args.contributed.iter().zip(&deltas) {
        println!("contributed {contributed}: delta {delta}");
    }
    println!("exchange rate: {}", ledger.exchange_rate);
    println!("carried remainder: {}", ledger.carried_remainder);
    Ok(())
}

#[derive(Serialize)]
struct WinnerReport {
    user: String,
    tier: u8,
    hasher: &'static str,
    odds: UFixed18,
    prize_count: u128,
    pseudo_random_number: u128,
    winning_zone: String,
    winner: bool,
}

fn cmd_winner<M: Transcendental, H: DrawHasher>(
    engine: &TierEngine<M, H>,
    args: &WinnerArgs,
    params: &DrawParams,
    json: bool,
) -> Result<()> {
    params.validate().context("invalid draw parameters")?;
    let odds = engine
        .tier_odds(args.tier, params.number_of_tiers, params.grand_prize_period)
        .with_context(|| format!("failed to compute odds for tier {}", args.tier))?;
    let prize_count = engine.prize_count(args.tier)?;

    let participant = Participant {
        user: args.user,
        user_twab: args.user_twab,
        vault_twab_total_supply: args.supply,
        vault_portion: args.portion,
        winning_random_number: args.random,
    };
    let entry = participant.entry(args.tier, odds, prize_count);
    let winner = engine.is_winner(&entry).context("winner check failed")?;

    // Zero supply has no trial value; report zero alongside the loss.
    let prn = if args.supply == 0 {
        0
    } else {
        calculate_pseudo_random_number(engine.hasher(), &args.user, args.tier, &args.random, args.supply)?
    };
    let zone = calculate_winning_zone(args.user_twab, odds, args.portion, prize_count)?;

    let report = WinnerReport {
        user: args.user.to_string(),
        tier: args.tier,
        hasher: engine.hasher().id(),
        odds,
        prize_count,
        pseudo_random_number: prn,
        winning_zone: zone.to_string(),
        winner,
    };
    if json {
        return print_json(&report);
    }
    println!("user: {}", report.user);
    println!("tier: {} (odds {}, {} prizes)", report.tier, report.odds, report.prize_count);
    println!("hasher: {}", report.hasher);
    println!("pseudo-random number: {}", report.pseudo_random_number);
    println!("winning zone: {}", report.winning_zone);
    println!("winner: {}", report.winner);
    Ok(())
}

/// Initialize tracing subscriber with the given log level and output format.
///
/// `RUST_LOG` takes precedence over `level_str`. Pass `format = "json"` for
/// structured JSON output; any other value selects human-readable text.
/// Logs go to stderr so command output stays machine-readable.
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
            .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
            .init();
    }
}
