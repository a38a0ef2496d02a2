//! First-run and housekeeping commands: init, config, onboarding, history

use crate::display::format_audit_entries;
use crate::error::BudgetResult;
use crate::services::BudgetService;
use crate::storage::Storage;

const ONBOARDING_STEPS: [(&str, &str); 3] = [
    (
        "Set your monthly income",
        "Enter your income from all sources: ftt income add \"My Paycheck\" --actual 50000",
    ),
    (
        "Track your expenses",
        "Sort spending into needs, wants and savings: ftt needs set Groceries --actual 8000",
    ),
    (
        "Follow your progress",
        "Check your split with 'ftt summary', then 'ftt streak --check-in' each day to unlock achievements",
    ),
];

pub fn handle_init(storage: &Storage, sample: bool) -> BudgetResult<()> {
    let paths = storage.paths();
    if !BudgetService::new(storage).initialize(sample)? {
        println!("A budget already exists at: {}", paths.data_dir().display());
        println!("Run 'ftt reset --yes' to zero its amounts instead.");
        return Ok(());
    }

    println!("Initialized budget at: {}", paths.data_dir().display());
    if sample {
        println!("Sample line items and amounts have been loaded.");
    } else {
        println!("Default income, needs, wants and savings lines have been created.");
    }
    println!();
    println!("Run 'ftt onboarding' for a quick tour, or 'ftt summary' to see your split.");
    Ok(())
}

pub fn handle_config(storage: &Storage) -> BudgetResult<()> {
    let paths = storage.paths();
    let settings = storage.settings();
    let state = storage.state.load()?;

    println!("50/30/20 Configuration");
    println!("======================");
    println!("Config directory: {}", paths.base_dir().display());
    println!("Data directory:   {}", paths.data_dir().display());
    println!("Audit log:        {}", paths.audit_log().display());
    println!("Account store:    {}", settings.remote_database_path(paths).display());
    println!();
    println!("Settings:");
    println!("  Currency symbol:    {}", settings.currency_symbol);
    println!("  Digit grouping:     {:?}", settings.digit_grouping);
    println!("  Achievement policy: {:?}", settings.achievement_policy);
    println!();
    println!("State:");
    match &state.session {
        Some(session) => println!("  Signed in as:       {}", session.email),
        None => println!("  Guest mode:         {}", state.guest_mode),
    }
    println!("  Onboarding done:    {}", state.onboarding_completed);
    Ok(())
}

/// Print the setup steps and mark onboarding done; `skip` only marks it
pub fn handle_onboarding(storage: &Storage, skip: bool) -> BudgetResult<()> {
    if !skip {
        println!("Welcome! Let's set up your budget in 3 simple steps.");
        for (i, (title, detail)) in ONBOARDING_STEPS.iter().enumerate() {
            println!();
            println!("{}. {}", i + 1, title);
            println!("   {}", detail);
        }
        println!();
        println!("You're all set!");
    }

    storage.state.update(|state| state.onboarding_completed = true)?;
    if skip {
        println!("Onboarding skipped.");
    }
    Ok(())
}

/// The most recent audit log entries, oldest first
pub fn handle_history(storage: &Storage, limit: usize) -> BudgetResult<()> {
    let entries = storage.audit().read_recent(limit)?;
    print!("{}", format_audit_entries(&entries));
    Ok(())
}
