use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use fifty_thirty_twenty::cli::{
    handle_achievements, handle_auth_command, handle_config, handle_export_command,
    handle_goal_command, handle_health, handle_history, handle_init, handle_line_item_command,
    handle_onboarding, handle_reset, handle_streak, handle_suggest, handle_summary,
    handle_transaction_command, AuthCommands, ExportCommands, GoalCommands, LineItemCommands,
    TransactionCommands,
};
use fifty_thirty_twenty::config::paths::AppPaths;
use fifty_thirty_twenty::models::Bucket;
use fifty_thirty_twenty::storage::Storage;
use fifty_thirty_twenty::{init_tracing, BudgetError};

#[derive(Parser)]
#[command(
    name = "ftt",
    version,
    about = "Terminal 50/30/20 budgeting",
    long_about = "Split your income into needs (50%), wants (30%) and savings (20%), \
                  track daily transactions and goals, and keep a streak going while \
                  your financial health score climbs."
)]
struct Cli {
    /// Show informational log output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the starting budget on this device
    Init {
        /// Load sample amounts instead of zeros
        #[arg(long)]
        sample: bool,
    },

    /// Show current configuration and paths
    Config,

    /// Income lines
    #[command(subcommand)]
    Income(LineItemCommands),

    /// Needs lines (target 50% of income)
    #[command(subcommand)]
    Needs(LineItemCommands),

    /// Wants lines (target 30% of income)
    #[command(subcommand)]
    Wants(LineItemCommands),

    /// Savings lines (target 20% of income)
    #[command(subcommand)]
    Savings(LineItemCommands),

    /// Totals and shares of income against the 50/30/20 targets
    Summary,

    /// Financial health score, grade and insights
    Health,

    /// Achievement progress
    Achievements,

    /// Daily budget streak
    Streak {
        /// Record today's outcome
        #[arg(long)]
        check_in: bool,
    },

    /// Suggested next steps
    Suggest,

    /// Daily transaction ledger
    #[command(subcommand, alias = "transaction")]
    Txn(TransactionCommands),

    /// Savings goals
    #[command(subcommand)]
    Goal(GoalCommands),

    /// Export data
    #[command(subcommand)]
    Export(ExportCommands),

    /// Zero every amount, keeping the labels
    Reset {
        /// Skip the confirmation
        #[arg(long)]
        yes: bool,
    },

    /// Accounts and sessions
    #[command(subcommand)]
    Auth(AuthCommands),

    /// Walk through the setup steps
    Onboarding {
        /// Mark onboarding done without the walkthrough
        #[arg(long)]
        skip: bool,
    },

    /// Recent changes from the audit log
    History {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        tracing::debug!(error = %format!("{:#}", err), "command failed");
        let message = match err.downcast_ref::<BudgetError>() {
            Some(e) => e.user_message(),
            None => format!("{:#}", err),
        };
        eprintln!("Error: {}", message);
        std::process::exit(1);
    }

    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let paths = AppPaths::new()?;
    let storage = Storage::new(paths).context("Failed to open the budget data directory")?;

    let Some(command) = cli.command else {
        println!("ftt - 50/30/20 budgeting in the terminal");
        println!();
        if !storage.is_initialized() {
            println!("Run 'ftt init' to create your budget.");
        }
        println!("Run 'ftt --help' for usage information.");
        return Ok(());
    };

    match command {
        Commands::Init { sample } => handle_init(&storage, sample)?,
        Commands::Config => handle_config(&storage)?,
        Commands::Income(cmd) => handle_line_item_command(&storage, Bucket::Income, cmd)?,
        Commands::Needs(cmd) => handle_line_item_command(&storage, Bucket::Needs, cmd)?,
        Commands::Wants(cmd) => handle_line_item_command(&storage, Bucket::Wants, cmd)?,
        Commands::Savings(cmd) => handle_line_item_command(&storage, Bucket::Savings, cmd)?,
        Commands::Summary => handle_summary(&storage)?,
        Commands::Health => handle_health(&storage)?,
        Commands::Achievements => handle_achievements(&storage)?,
        Commands::Streak { check_in } => handle_streak(&storage, check_in)?,
        Commands::Suggest => handle_suggest(&storage)?,
        Commands::Txn(cmd) => handle_transaction_command(&storage, cmd)?,
        Commands::Goal(cmd) => handle_goal_command(&storage, cmd)?,
        Commands::Export(cmd) => handle_export_command(&storage, cmd)?,
        Commands::Reset { yes } => handle_reset(&storage, yes)?,
        Commands::Auth(cmd) => handle_auth_command(&storage, cmd)?,
        Commands::Onboarding { skip } => handle_onboarding(&storage, skip)?,
        Commands::History { limit } => handle_history(&storage, limit)?,
    }

    Ok(())
}
