use anyhow::{bail, Context};
use clap::Parser;
use gasfee_core::fees::{CustomFeeSession, FeeSessionInit, FeeSettings, Field, SessionSnapshot};
use gasfee_core::utils::logging;
use gasfee_core::Chain;
use rust_decimal::Decimal;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

/// Evaluate a custom gas price and gas limit against a fee schedule.
#[derive(Debug, Parser)]
#[command(name = "gasfee-cli", about = "Custom gas fee calculator", long_about = None)]
struct Args {
    /// Session file with `reference_computation_size`, `price_ceiling`,
    /// `current_price` and `schedule`. Reads stdin when `-` or omitted.
    #[arg(value_name = "SESSION")]
    session: Option<PathBuf>,
    /// Gas price text, as typed into the form.
    #[arg(long)]
    price: Option<String>,
    /// Gas limit text, as typed into the form.
    #[arg(long)]
    limit: Option<String>,
    /// Network preset.
    #[arg(long, env = "GASFEE_CHAIN", default_value = "ethereum")]
    chain: Chain,
    /// Currency symbol for the fiat line.
    #[arg(long, env = "GASFEE_FIAT_SYMBOL")]
    fiat_symbol: Option<String>,
    /// Lowest accepted gas price.
    #[arg(long, env = "GASFEE_PRICE_FLOOR")]
    price_floor: Option<Decimal>,
    /// Confirm the fee and print the emitted event.
    #[arg(long)]
    submit: bool,
    /// Print JSON instead of text.
    #[arg(long)]
    json: bool,
    /// Enable debug logging on stderr.
    #[arg(long, env = "GASFEE_DEBUG")]
    debug: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if args.debug {
        logging::enable_debug();
    }

    let payload = match args.session.as_deref() {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        _ => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    let init: FeeSessionInit = serde_json::from_str(&payload).context("invalid session file")?;

    let mut settings = FeeSettings::for_chain(args.chain);
    if let Some(symbol) = args.fiat_symbol {
        settings = settings.with_fiat_symbol(symbol);
    }
    if let Some(floor) = args.price_floor {
        settings = settings.with_price_floor(floor);
    }

    let mut session = CustomFeeSession::open(init, settings)?;
    if let Some(price) = args.price.as_deref() {
        session.on_input_changed(Field::Price, price);
    }
    if let Some(limit) = args.limit.as_deref() {
        session.on_input_changed(Field::Limit, limit);
    }

    if args.submit {
        let Some(event) = session.on_submit() else {
            print_snapshot(&session, &session.snapshot(), args.json)?;
            bail!("custom fee rejected");
        };
        if args.json {
            println!("{}", serde_json::to_string_pretty(&event)?);
        } else {
            println!("Confirmed gas price {} with gas limit {}", event.price, event.limit);
            println!("Fee      : {}", event.display.native_text);
            if let Some(fiat) = &event.display.fiat_text {
                println!("Fiat     : {}", fiat);
            }
            println!("Time     : {}", event.display.settlement_text);
        }
        return Ok(());
    }

    print_snapshot(&session, &session.snapshot(), args.json)
}

fn print_snapshot(session: &CustomFeeSession, snapshot: &SessionSnapshot, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(snapshot)?);
        return Ok(());
    }

    let bounds = session.bounds();
    println!("Gas price: {:<12} ({} - {})", snapshot.input.price, bounds.price_min, bounds.price_max);
    println!("Gas limit: {:<12} ({} - {})", snapshot.input.limit, bounds.limit_min, bounds.limit_max);
    println!("Fee      : {}", snapshot.display.native_text);
    if let Some(fiat) = &snapshot.display.fiat_text {
        println!("Fiat     : {}", fiat);
    }
    println!("Time     : {}", snapshot.display.settlement_text);
    for message in &snapshot.messages {
        println!("! {}", message);
    }
    println!("Submit   : {}", if snapshot.submit_enabled { "enabled" } else { "disabled" });
    Ok(())
}
