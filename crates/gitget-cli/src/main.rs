//! gitget - fetch a repository revision for a build
//!
//! Usage:
//!   gitget fetch -d work -u alice -c v1.2.3   # Clone Org/Repo into ./work at v1.2.3
//!   gitget remote -a clorton -r EMOD-Typhoid  # Ensure the current repo has a remote for it

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gitget_core::config::Settings;
use gitget_core::git::{
    Credentials, FetchRequest, RemoteManager, RepoFetcher, RepoId, SystemGit,
};
use gitget_core::location::WorkingLocation;

/// Process exit status for any failed operation.
const FAILURE_EXIT_CODE: i32 = -1;

#[derive(Parser)]
#[command(name = "gitget")]
#[command(about = "Fetch a specific repository revision for a build", long_about = None)]
struct Cli {
    /// Settings file (defaults to $GITGET_CONFIG or the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clone a repository into a fresh directory and check out a ref
    Fetch(FetchArgs),
    /// Find or add a remote alias for an account/repository in the current repo
    Remote(RemoteArgs),
}

#[derive(Args)]
struct FetchArgs {
    /// Working directory, not including drive letter
    #[arg(short, long)]
    directory: PathBuf,
    /// Working drive letter, e.g. 'D:' (defaults to the current drive)
    #[arg(short = 'v', long)]
    drive: Option<PathBuf>,
    /// GitHub user name
    #[arg(short, long)]
    user: String,
    /// GitHub user password
    #[arg(short, long)]
    password: Option<String>,
    /// GitHub account name
    #[arg(short, long)]
    account: Option<String>,
    /// Repository name
    #[arg(short, long)]
    repository: Option<String>,
    /// Commit ID - branch name, commit hash, or tag
    #[arg(short, long, visible_alias = "ref")]
    commit: Option<String>,
}

#[derive(Args)]
struct RemoteArgs {
    /// GitHub account name (e.g. 'InstituteforDiseaseModeling' or 'clorton')
    #[arg(short, long)]
    account: Option<String>,
    /// Git repository (e.g. 'DtkTrunk' or 'EMOD-Typhoid')
    #[arg(short, long)]
    repository: Option<String>,
}

fn main() {
    // Progress goes to stdout, warnings and errors to stderr.
    let writer = std::io::stderr
        .with_max_level(Level::WARN)
        .or_else(std::io::stdout);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gitget=info,info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(writer))
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        tracing::error!("{err:#}");
        std::process::exit(FAILURE_EXIT_CODE);
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = match &cli.config {
        Some(path) => Settings::load(path),
        None => Settings::load_default(),
    }
    .context("Failed to load settings")?;

    match cli.command {
        Commands::Fetch(args) => run_fetch(args, settings),
        Commands::Remote(args) => run_remote(args, settings),
    }
}

fn run_fetch(args: FetchArgs, settings: Settings) -> Result<()> {
    let git = SystemGit::new();
    git.ensure_available(true)?;

    let request = fetch_request(args, settings, WorkingLocation::current_drive());
    let report = RepoFetcher::new(git).fetch(&request)?;

    tracing::info!(
        "Checked out '{}' ({}) in {}",
        report.reference,
        report.resolved_as,
        report.path.display()
    );
    Ok(())
}

fn run_remote(args: RemoteArgs, settings: Settings) -> Result<()> {
    let git = SystemGit::new();
    git.ensure_available(false)?;

    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let host = settings.host.clone();
    let repo = remote_repo(args, settings);

    let outcome = RemoteManager::new(git, cwd)
        .with_host(host)
        .ensure_remote(&repo)?;
    println!("{}", outcome.alias());
    Ok(())
}

/// Merge fetch flags over settings; `current_drive` fills in a missing `--drive`.
fn fetch_request(
    args: FetchArgs,
    settings: Settings,
    current_drive: Option<PathBuf>,
) -> FetchRequest {
    let mut location = WorkingLocation::new(args.directory);
    if let Some(drive) = args.drive.or(current_drive) {
        location = location.with_drive(drive);
    }
    let mut credentials = Credentials::new(args.user);
    if let Some(password) = args.password {
        credentials = credentials.with_password(password);
    }
    let repo = RepoId::new(
        args.account.unwrap_or(settings.account),
        args.repository.unwrap_or(settings.repository),
    );
    let reference = args.commit.unwrap_or(settings.reference);

    FetchRequest::new(location, credentials, repo, reference).with_host(settings.host)
}

fn remote_repo(args: RemoteArgs, settings: Settings) -> RepoId {
    RepoId::new(
        args.account.unwrap_or(settings.account),
        args.repository.unwrap_or(settings.repository),
    )
}
