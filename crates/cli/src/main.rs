use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use scout_model::AnalyzedCandidate;
use scout_model::job::{load_job, load_seen_usernames};
use server::{BroadcastSink, ProgressEvent, RecruitingOrchestrator, ScoutConfig};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::broadcast::error::RecvError;
use tracing::warn;

/// Talent Scout - GitHub candidate sourcing engine
#[derive(Parser)]
#[command(name = "talent-scout")]
#[command(about = "Find GitHub developers matching a job description", long_about = None)]
struct Cli {
    /// Log filter, e.g. "info" or "server=debug"
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Source and analyze candidates for a job
    Hunt {
        /// Job description JSON file
        #[arg(long)]
        job: PathBuf,

        /// Usernames already found for this job, one per line
        #[arg(long)]
        seen: Option<PathBuf>,

        /// Override MAX_CANDIDATES_PER_JOB
        #[arg(long)]
        max_candidates: Option<usize>,

        /// Fix the strategy shuffle seed
        #[arg(long)]
        seed: Option<u64>,

        /// Print candidates as JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Hide progress events
        #[arg(long, short)]
        quiet: bool,
    },

    /// Show the search strategies a run would execute
    Strategies {
        #[arg(long)]
        job: PathBuf,

        /// Number of candidates already found (moves the page offset)
        #[arg(long, default_value = "0")]
        seen_count: usize,

        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show the remaining GitHub API budget
    RateLimit,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match &cli.log_level {
        Some(level) => tracing_subscriber::EnvFilter::new(level),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = ScoutConfig::from_env().context("Invalid configuration")?;

    match cli.command {
        Commands::Hunt {
            job,
            seen,
            max_candidates,
            seed,
            json,
            quiet,
        } => {
            let mut config = config;
            if let Some(max) = max_candidates {
                config.max_candidates_per_job = max.max(1);
            }
            handle_hunt(config, job, seen, seed, json, quiet).await?
        }
        Commands::Strategies {
            job,
            seen_count,
            seed,
        } => handle_strategies(config, job, seen_count, seed).await?,
        Commands::RateLimit => handle_rate_limit(config).await?,
    }

    Ok(())
}

/// Handle the 'hunt' command
async fn handle_hunt(
    config: ScoutConfig,
    job_path: PathBuf,
    seen_path: Option<PathBuf>,
    seed: Option<u64>,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let job = load_job(&job_path)?;
    let seen = match &seen_path {
        Some(path) => load_seen_usernames(path)?,
        None => Vec::new(),
    };

    let mut orchestrator = RecruitingOrchestrator::new(config)?;
    if let Some(seed) = seed {
        orchestrator = orchestrator.with_strategy_seed(seed);
    }

    let printer = if quiet || json {
        None
    } else {
        let sink = BroadcastSink::new(256);
        let mut events = sink.subscribe();
        orchestrator = orchestrator.with_sink(Arc::new(sink));
        Some(tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => print_progress(&event),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Progress output fell behind");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }))
    };

    println!(
        "{} {} ({} already found)",
        "Sourcing for".bold(),
        job.title.bold().blue(),
        seen.len()
    );
    let start = Instant::now();
    let result = if seen.is_empty() {
        orchestrator.start_job(job).await
    } else {
        orchestrator.find_more(job, seen).await
    };

    // Dropping the orchestrator closes the event channel.
    drop(orchestrator);
    if let Some(printer) = printer {
        let _ = printer.await;
    }

    let candidates = result?;
    if json {
        println!("{}", serde_json::to_string_pretty(&candidates)?);
    } else {
        print_candidates(&candidates);
        println!(
            "{} {} candidates in {:.1?}",
            "✓".green(),
            candidates.len(),
            start.elapsed()
        );
    }
    Ok(())
}

/// Handle the 'strategies' command
async fn handle_strategies(
    config: ScoutConfig,
    job_path: PathBuf,
    seen_count: usize,
    seed: Option<u64>,
) -> Result<()> {
    let job = load_job(&job_path)?;
    let mut orchestrator = RecruitingOrchestrator::new(config)?;
    if let Some(seed) = seed {
        orchestrator = orchestrator.with_strategy_seed(seed);
    }

    let strategies = orchestrator.plan_strategies(&job, seen_count).await;
    println!(
        "{}",
        format!("{} strategies for '{}':", strategies.len(), job.title)
            .bold()
            .blue()
    );
    for (i, strategy) in strategies.iter().enumerate() {
        println!(
            "{}. {} (page {}, {} per page)",
            (i + 1).to_string().green(),
            strategy.name.bold(),
            strategy.page,
            strategy.page_size
        );
        println!("   {}", strategy.query.dimmed());
    }
    Ok(())
}

/// Handle the 'rate-limit' command
async fn handle_rate_limit(config: ScoutConfig) -> Result<()> {
    let orchestrator = RecruitingOrchestrator::new(config)?;
    let snapshot = orchestrator.rate_limit_status().await?;

    println!("{}", "GitHub rate limit:".bold().blue());
    for (label, state) in [("general", snapshot.general), ("search", snapshot.search)] {
        let remaining = if state.remaining == 0 {
            state.remaining.to_string().red()
        } else {
            state.remaining.to_string().green()
        };
        println!(
            "{}{:<8} {} remaining, resets at {}",
            "• ".cyan(),
            label,
            remaining,
            state.reset_at().format("%Y-%m-%d %H:%M:%S UTC")
        );
    }
    Ok(())
}

/// One progress line per event
fn print_progress(event: &ProgressEvent) {
    let name = event.name();
    let tag = format!("[{}]", name);
    let tag = if event.event_type.ends_with("failed") {
        tag.red()
    } else if event.event_type == "completed" {
        tag.green()
    } else {
        tag.dimmed()
    };
    println!("{} {}", tag, event.message);
}

fn print_candidates(candidates: &[AnalyzedCandidate]) {
    if candidates.is_empty() {
        println!("{}", "No new candidates found".yellow());
        return;
    }

    println!("{}", "Candidates:".bold().blue());
    for (i, candidate) in candidates.iter().enumerate() {
        let profile = &candidate.profile;
        let analysis = &candidate.analysis;
        let fit = analysis.fit_score.to_string();
        let fit = match analysis.fit_score {
            70..=100 => fit.green(),
            40..=69 => fit.yellow(),
            _ => fit.red(),
        };
        println!(
            "{}. {} - Fit: {} Quality: {}/10{}",
            (i + 1).to_string().green(),
            profile.username.bold(),
            fit,
            profile.quality_score,
            if profile.hireable { " (hireable)" } else { "" }
        );
        println!("   {}", profile.profile_url);
        if let Some(location) = &profile.location {
            println!("   Location: {}", location);
        }
        if !analysis.skills.is_empty() {
            println!("   Skills: {}", analysis.skills.join(", "));
        }
        if let Some(repo) = analysis.top_repositories.first() {
            println!("   Top repo: {} ({} stars)", repo.name, repo.stars);
        }
        for concern in &analysis.concerns {
            println!("   {} {}", "!".yellow(), concern);
        }
    }
}
