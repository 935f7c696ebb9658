use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::{collections::BTreeMap, fmt::Display, io::Read, time::Duration};
use tracing::{debug, warn};

use timekeys::{
    config::{self, Config},
    current_zone, monitoring, parse_lines, watch, DateKey, DisplayLocale, TimeKeys, ZoneId,
};

#[derive(Debug, Parser)]
#[command(name = "timekeys", version, about = "Timezone-aware day keys, clock strings and labels")]
struct Cli {
    /// IANA zone (defaults to TIMEKEYS_TZ, then the host zone)
    #[arg(long, global = true)]
    tz: Option<String>,

    /// Display locale such as fr-FR or en-US (defaults to TIMEKEYS_LOCALE)
    #[arg(long, global = true)]
    locale: Option<String>,

    /// Print JSON instead of plain text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the host's timezone
    Zone,
    /// YYYY-MM-DD of an instant in the zone
    Key { instant: String },
    /// HH:mm:ss of an instant in the zone
    Clock { instant: String },
    /// HH:mm of an instant in the zone
    Time { instant: String },
    /// Today / Yesterday / full date
    Label { instant: String },
    /// Every derived value for an instant
    Show { instant: String },
    /// Count stdin instants (one per line) per local day
    Group,
    /// Log the local day on a heartbeat and report rollovers
    Watch {
        /// Heartbeat interval in seconds (defaults to TIMEKEYS_WATCH_SECS)
        #[arg(long)]
        every: Option<u64>,
    },
}

fn emit(json: bool, value: impl Display) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(&value.to_string())?);
    } else {
        println!("{value}");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load local .env if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    monitoring::init_tracing(config::log_json_from_env());

    let cfg = Config::from_env()?;
    debug!(?cfg, "boot");

    let zone = match cli.tz.as_deref() {
        Some(name) => ZoneId::parse(name).context("--tz")?,
        None => cfg.tz,
    };
    let locale = DisplayLocale::parse(cli.locale.as_deref().unwrap_or(&cfg.locale));
    let keys = TimeKeys::new();

    match cli.command {
        Command::Zone => emit(cli.json, current_zone())?,
        Command::Key { instant } => emit(cli.json, keys.date_key(&instant, zone)?)?,
        Command::Clock { instant } => emit(cli.json, keys.clock_string(&instant, zone)?)?,
        Command::Time { instant } => emit(cli.json, keys.time_of_day(&instant, zone, &locale)?)?,
        Command::Label { instant } => emit(cli.json, keys.date_label(&instant, zone, &locale)?)?,
        Command::Show { instant } => {
            let snap = keys.snapshot(&instant, zone, &locale)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&snap)?);
            } else {
                println!("instant     {}", snap.instant);
                println!("zone        {}", snap.zone);
                println!("date_key    {}", snap.date_key);
                println!("clock       {}", snap.clock);
                println!("time_of_day {}", snap.time_of_day);
                println!("label       {}", snap.label);
            }
        }
        Command::Group => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("reading stdin")?;

            let (instants, rejected) = parse_lines(input.lines());
            for err in &rejected {
                warn!(%err, "group.skip");
            }

            let groups = keys.group_by_day(instants, zone, |i| *i)?;
            let counts: BTreeMap<DateKey, usize> =
                groups.into_iter().map(|(k, v)| (k, v.len())).collect();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&counts)?);
            } else {
                for (key, n) in &counts {
                    println!("{key} {n}");
                }
            }
        }
        Command::Watch { every } => {
            let secs = every.unwrap_or(cfg.watch_interval_secs);
            if secs == 0 {
                return Err(anyhow!("--every must be greater than 0"));
            }
            let shutdown = watch::shutdown_on(tokio::signal::ctrl_c());
            watch::run(&keys, zone, Duration::from_secs(secs), shutdown).await?;
        }
    }

    Ok(())
}
