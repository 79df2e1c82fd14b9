use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use matchbook::api::{build_router, cors_layer, state::AppState};
use matchbook::calculate::{calculate_win_rate, compute_head_to_head, BetLedger};
use matchbook::config::AppConfig;
use matchbook::fetch::ApiFootballClient;
use matchbook::ingest::import_fixtures;
use matchbook::models::format::{fmt_money, fmt_percent, fmt_signed_money};
use matchbook::models::{BetDraft, BetOutcome, BettingPerformance, TeamSnapshot};
use matchbook::parse_date;
use matchbook::storage::Store;

#[derive(Parser)]
#[command(name = "matchbook")]
#[command(about = "Football betting tracker with head-to-head form and a bet ledger")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./matchbook.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,
    },

    /// Import fixtures for the configured leagues
    Import {
        /// Day to import (YYYY-MM-DD or "today")
        #[arg(long, default_value = "today")]
        date: String,

        /// Only import these league ids
        #[arg(long)]
        league: Vec<i64>,

        /// Season year (defaults to the config file)
        #[arg(long)]
        season: Option<i32>,
    },

    /// List stored leagues
    Leagues,

    /// List matches of a league
    Matches {
        /// League id
        league: i64,

        /// Finished matches only
        #[arg(long, conflicts_with = "upcoming")]
        played: bool,

        /// Not-yet-finished matches only
        #[arg(long)]
        upcoming: bool,
    },

    /// Compare the form of both sides of a match
    HeadToHead {
        /// Match id
        match_id: i64,
    },

    /// Record, settle and remove bets
    Bet {
        #[command(subcommand)]
        action: BetAction,
    },

    /// Show betting performance
    Performance {
        /// Restrict to one match
        #[arg(long)]
        match_id: Option<i64>,
    },
}

#[derive(Subcommand)]
enum BetAction {
    /// Record a new pending bet
    Add {
        /// Match id
        match_id: i64,

        /// Description, e.g. "Over 2.5 goals"
        #[arg(long)]
        name: String,

        /// Stake
        #[arg(long)]
        amount: String,

        /// Handicap or total line
        #[arg(long, default_value = "")]
        line: String,

        /// American odds, e.g. -110 or +150
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        odds: String,
    },

    /// Set the result of a bet (win, lose, push)
    Settle {
        /// Bet id
        id: i64,

        result: String,
    },

    /// Delete a bet
    Delete {
        /// Bet id
        id: i64,

        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// Show the bet history
    List {
        /// Restrict to one match
        #[arg(long)]
        match_id: Option<i64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;
    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = data_dir.clone();
    }
    let log_level = cli.log_level.clone().unwrap_or_else(|| config.log_level.clone());

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting matchbook v{}", env!("CARGO_PKG_VERSION"));

    let store = Store::new(config.storage());

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let app = build_router(AppState::new(store))
                .layer(cors_layer(&config.server.cors_origin));
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("API listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Import {
            date,
            league,
            season,
        } => {
            let today = chrono::Local::now().date_naive();
            let Some(date) = parse_date(&date, today) else {
                bail!("Invalid --date (expected YYYY-MM-DD or \"today\"): {}", date);
            };
            let season = season.unwrap_or(config.fixtures.season);
            let leagues: Vec<_> = config
                .leagues
                .iter()
                .filter(|l| league.is_empty() || league.contains(&l.id))
                .cloned()
                .collect();
            if leagues.is_empty() {
                bail!("No configured league matches {:?}", league);
            }

            let source = ApiFootballClient::from_config(&config.fixtures)?;
            let summary = import_fixtures(&source, &store, &leagues, season, date).await?;

            println!("\n=== Import Results ({}) ===", date);
            println!("Leagues:  {}", summary.leagues);
            println!("Fetched:  {}", summary.fetched);
            println!("Inserted: {}", summary.inserted);
            println!("Updated:  {}", summary.updated);
            if !summary.errors.is_empty() {
                println!("\nErrors:");
                for err in &summary.errors {
                    println!("  - {}", err);
                }
            }
        }
        Commands::Leagues => {
            let leagues = store.leagues()?;
            if leagues.is_empty() {
                println!("No leagues stored yet. Run `matchbook import` first.");
            }
            for league in leagues {
                println!("{:>6}  {:<5} {}", league.id, league.code, league.name);
            }
        }
        Commands::Matches {
            league,
            played,
            upcoming,
        } => {
            let filter = match (played, upcoming) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            let matches = store.matches_for_league(league, filter)?;
            if matches.is_empty() {
                println!("No matches found for league {}", league);
            }
            for m in matches {
                println!("{:>8}  {}  {:<40} {}", m.id, m.date, m.title(), m.score());
            }
        }
        Commands::HeadToHead { match_id } => {
            let fixture = store.get_match(match_id)?;
            let history = store.form_history(&fixture)?;
            let stats = compute_head_to_head(&fixture.home_team(), &fixture.away_team(), &history);

            println!("\n=== {} ({}) ===", fixture.title(), fixture.date);
            print_snapshot(&stats.home);
            print_snapshot(&stats.away);
        }
        Commands::Bet { action } => run_bet_action(&store, action)?,
        Commands::Performance { match_id } => {
            let ledger = BetLedger::new(store.bets()?);
            let ledger = match match_id {
                Some(id) => {
                    let fixture = store.get_match(id)?;
                    println!("\n=== {} ===", fixture.title());
                    ledger.for_match(id)
                }
                None => ledger,
            };
            print_performance(&ledger.performance());
        }
    }

    Ok(())
}

fn run_bet_action(store: &Store, action: BetAction) -> Result<()> {
    match action {
        BetAction::Add {
            match_id,
            name,
            amount,
            line,
            odds,
        } => {
            let new_bet = BetDraft::new(name, line, amount, odds).validate(match_id)?;
            let bet = store.record_bet(new_bet)?;
            println!("Recorded bet {}: {}", bet.id, bet.summary());
        }
        BetAction::Settle { id, result } => {
            let outcome: BetOutcome = result.parse()?;
            let bet = store.settle_bet(id, outcome)?;
            let ledger = BetLedger::new(vec![bet.clone()]);
            let pnl = ledger
                .profit(bet.id)
                .map(fmt_signed_money)
                .unwrap_or_else(|| "-".to_string());
            println!("Settled bet {}: {} ({})", bet.id, bet.summary(), pnl);
        }
        BetAction::Delete { id, yes } => {
            let bet = store
                .bets()?
                .into_iter()
                .find(|b| b.id == id)
                .with_context(|| format!("Bet not found: {}", id))?;
            if !yes && !confirm(&format!("Delete bet {}: {}?", bet.id, bet.summary()))? {
                println!("Cancelled");
                return Ok(());
            }
            store.delete_bet(id)?;
            println!("Deleted bet {}", id);
        }
        BetAction::List { match_id } => {
            let ledger = BetLedger::new(store.bets()?);
            let ledger = match match_id {
                Some(id) => ledger.for_match(id),
                None => ledger,
            };
            if ledger.is_empty() {
                println!("No bets recorded");
                return Ok(());
            }

            println!(
                "{:>4}  {:<10}  {:<32} {:<20} {:>6} {:>10}  {:<7} {:>10}",
                "ID", "Date", "Match", "Bet", "Odds", "Wager", "Result", "P&L"
            );
            for row in ledger.entries(&store.matches()?) {
                let date = row.date.map(|d| d.to_string()).unwrap_or_default();
                println!(
                    "{:>4}  {:<10}  {:<32} {:<20} {:>6} {:>10}  {:<7} {:>10}",
                    row.bet_id,
                    date,
                    row.match_name,
                    row.name,
                    row.odds,
                    row.wager,
                    row.result.as_str(),
                    row.pnl
                );
            }
            println!();
            print_performance(&ledger.performance());
        }
    }
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

fn print_snapshot(team: &TeamSnapshot) {
    let form = &team.conceded_form;
    println!("\n{}", team.name);
    println!("  Games:          {}", team.games_played);
    println!(
        "  Record (W-D-L): {}  ({} won)",
        team.fmt_record(),
        fmt_percent(calculate_win_rate(team.wins, team.losses, team.draws) * 100.0)
    );
    println!("  Goals (F:A):    {} ({:+})", team.fmt_goals(), team.goal_diff());
    println!(
        "  Avg goals:      {:.2} for, {:.2} against",
        team.avg_goals_for, team.avg_goals_against
    );
    println!(
        "  Conceded:       0: {}  1: {}  2+: {}",
        team.clean_sheets, team.one_conceded, team.two_plus_conceded
    );
    println!(
        "  Clean sheets:   {}  (2+ conceded {}, 1.5+ against {})",
        fmt_percent(form.clean_sheet_ratio() * 100.0),
        fmt_percent(form.two_plus_ratio() * 100.0),
        fmt_percent(form.over_one_and_half_against() * 100.0),
    );
}

fn print_performance(perf: &BettingPerformance) {
    println!("=== Performance ===");
    println!(
        "Bets:       {} ({} settled, {} pending)",
        perf.total_bets,
        perf.settled_bets(),
        perf.pending_bets
    );
    println!("Wagered:    {}", fmt_money(perf.total_wagered));
    println!("Winnings:   {}", fmt_money(perf.total_winnings));
    println!("Losses:     {}", fmt_money(perf.total_losses));
    println!("Net profit: {}", fmt_signed_money(perf.net_profit));
    println!("ROI:        {}", fmt_percent(perf.roi));
    println!("Win rate:   {}", fmt_percent(perf.win_rate));
}
