use crate::catalog::{load_catalog_or_default, FileCatalogSource};
use crate::config::check_autosave_delay;
use crate::core::utils::games_dir_in;
use crate::persistence::MAX_AUTOSAVE_DELAY_MS;
use crate::utils::build_info;

use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::{CommandEntry, CommandRegistry};
use super::args;

pub(crate) fn register(registry: &mut CommandRegistry) {
    registry.register(CommandEntry::new(
        "help",
        "Show available commands",
        "help [command]",
        cmd_help,
    ));
    registry.register(CommandEntry::new(
        "stats",
        "Summarize credit and debt totals",
        "stats",
        cmd_stats,
    ));
    registry.register(CommandEntry::new(
        "profile",
        "Show the age group and its limits",
        "profile",
        cmd_profile,
    ));
    registry.register(CommandEntry::new(
        "games",
        "Show learning games for a screen",
        "games [credit|debt]",
        cmd_games,
    ));
    registry.register(CommandEntry::new(
        "save",
        "Write pending changes now",
        "save",
        cmd_save,
    ));
    registry.register(CommandEntry::new(
        "discard",
        "Drop unsaved changes and reload the last save",
        "discard",
        cmd_discard,
    ));
    registry.register(CommandEntry::new(
        "config",
        "Show or change settings (applied on next start)",
        "config [show | set <birth_date|autosave_delay_ms|currency> <value>]",
        cmd_config,
    ));
    registry.register(CommandEntry::new(
        "version",
        "Show build information",
        "version",
        cmd_version,
    ));
    registry.register(CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit));
    registry.register(CommandEntry::new("quit", "Exit the shell", "quit", cmd_exit));
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        let Some(entry) = context.registry.get(&name.to_ascii_lowercase()) else {
            context.suggest_command(name);
            return Ok(());
        };
        output::section(entry.name);
        println!("{}", entry.description);
        println!("usage: {}", entry.usage);
        return Ok(());
    }
    output::section("Commands");
    let rows: Vec<Vec<String>> = context
        .registry
        .list()
        .map(|entry| vec![entry.name.to_string(), entry.description.to_string()])
        .collect();
    output::table(&["Command", "Description"], &rows);
    Ok(())
}

fn cmd_stats(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let credit = context.tracker.credit_stats();
    let debt = context.tracker.debt_stats();
    output::section("Overview");
    output::table(
        &["", "Count", "Balance", "Minimums"],
        &[
            vec![
                "Credit".into(),
                credit.accounts_count.to_string(),
                output::money(credit.total_balance),
                output::money(credit.total_minimum_payments),
            ],
            vec![
                "Debt".into(),
                debt.debts_count.to_string(),
                output::money(debt.total_debt),
                output::money(debt.total_minimum_payments),
            ],
        ],
    );
    if let Some(score) = context.tracker.score() {
        println!("Credit score estimate: {}", score.score);
    }
    Ok(())
}

fn cmd_games(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = match args {
        [] => "credit",
        [screen] if matches!(*screen, "credit" | "debt") => *screen,
        _ => return Err(CommandError::usage("games [credit|debt]")),
    };
    let source = FileCatalogSource::new(games_dir_in(context.config_manager.base_dir()));
    let catalog = load_catalog_or_default(&source, name);
    output::section(format!("Games: {name}"));
    if catalog.total_games == 0 {
        output::info("No games available right now.");
        return Ok(());
    }
    for title in catalog.titles() {
        println!("- {title}");
    }
    println!(
        "Completed {} of {} ({})",
        catalog.completed_games,
        catalog.total_games,
        output::percent(catalog.completion_percentage())
    );
    Ok(())
}

fn cmd_profile(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let profile = context.tracker.profile();
    output::section(format!("Profile: {}", profile.group));
    println!(
        "Credit types: {} (limit {} to {})",
        profile.credit.allowed_types.join(", "),
        output::money(profile.credit.min_amount),
        output::money(profile.credit.max_amount)
    );
    println!(
        "Debt types:   {} (amount {} to {})",
        profile.debt.allowed_types.join(", "),
        output::money(profile.debt.min_amount),
        output::money(profile.debt.max_amount)
    );
    println!(
        "Advanced details: {}",
        if profile.show_advanced { "shown" } else { "hidden" }
    );
    Ok(())
}

fn cmd_save(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if !context.tracker.has_unsaved_changes() {
        output::info("Nothing to save.");
        return Ok(());
    }
    context.shutdown();
    Ok(())
}

fn cmd_discard(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if !context.tracker.has_unsaved_changes() {
        output::info("No unsaved changes.");
        return Ok(());
    }
    if !context.confirm("Discard unsaved changes?")? {
        return Ok(());
    }
    context.tracker.discard_changes()?;
    output::success("Unsaved changes discarded.");
    Ok(())
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["show"] => {
            let config = &context.config;
            output::section("Settings");
            println!("file:              {}", context.config_manager.path().display());
            println!("data directory:    {}", context.config_manager.data_dir(config).display());
            println!("autosave_delay_ms: {}", config.autosave_delay_ms);
            println!(
                "birth_date:        {}",
                config.birth_date.as_deref().unwrap_or("(not set)")
            );
            println!("currency:          {}", config.currency);
            Ok(())
        }
        ["set", key, value] => {
            let mut updated = context.config.clone();
            match *key {
                "birth_date" => {
                    updated.birth_date = if value.is_empty() {
                        None
                    } else {
                        Some(args::date(value)?.to_string())
                    };
                }
                "autosave_delay_ms" => {
                    let delay = value.parse().map_err(|_| {
                        CommandError::InvalidArguments(
                            "autosave_delay_ms must be a whole number".into(),
                        )
                    })?;
                    updated.autosave_delay_ms = check_autosave_delay(delay)
                        .map_err(|_| CommandError::InvalidArguments(format!(
                            "autosave_delay_ms must be at most {MAX_AUTOSAVE_DELAY_MS}"
                        )))?;
                }
                "currency" => updated.currency = value.to_ascii_uppercase(),
                other => {
                    return Err(CommandError::InvalidArguments(format!(
                        "unknown setting `{other}`"
                    )))
                }
            }
            context.config_manager.save(&updated)?;
            context.config = updated;
            output::success(format!("`{key}` saved. Restart the shell to apply it."));
            Ok(())
        }
        _ => Err(CommandError::usage(
            "config [show | set <birth_date|autosave_delay_ms|currency> <value>]",
        )),
    }
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    println!("{}", build_info::current().summary());
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
