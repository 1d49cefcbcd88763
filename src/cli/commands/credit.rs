use crate::core::Screen;
use crate::domain::{CreditAccountDraft, Displayable};
use crate::estimator::{ScoreRating, UtilizationRating};

use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::{CommandEntry, CommandRegistry};
use super::args;

const CREDIT_USAGE: &str = "credit [list | show <#> | add <name> <type> <limit> [field=value...] | edit <#> field=value... | remove <#>]";
const SCORE_USAGE: &str = "score";

pub(crate) fn register(registry: &mut CommandRegistry) {
    registry.register(CommandEntry::new(
        "credit",
        "List and manage credit accounts",
        CREDIT_USAGE,
        cmd_credit,
    ));
    registry.register(CommandEntry::new(
        "score",
        "Show the estimated credit score and its factors",
        SCORE_USAGE,
        cmd_score,
    ));
}

fn cmd_credit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.split_first() {
        None | Some((&"list", _)) => list(context),
        Some((&"show", rest)) => show(context, rest),
        Some((&"add", rest)) => add(context, rest),
        Some((&"edit", rest)) => edit(context, rest),
        Some((&"remove", rest)) | Some((&"delete", rest)) => remove(context, rest),
        Some(_) => Err(CommandError::usage(CREDIT_USAGE)),
    }
}

fn list(context: &mut ShellContext) -> CommandResult {
    context.tracker.visit(Screen::Credit);
    let accounts = context.tracker.accounts();
    output::section("Credit accounts");
    if accounts.is_empty() {
        output::info("No credit accounts yet. Add one with `credit add`.");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = accounts
        .iter()
        .enumerate()
        .map(|(idx, account)| {
            let utilization = account.utilization();
            vec![
                (idx + 1).to_string(),
                account.name.clone(),
                account.kind.clone(),
                output::money(account.credit_limit),
                output::money(account.current_balance),
                output::percent(account.clamped_utilization()),
                UtilizationRating::for_utilization(utilization).label().to_string(),
            ]
        })
        .collect();
    output::table(
        &["#", "Name", "Type", "Limit", "Balance", "Used", "Status"],
        &rows,
    );
    for account in accounts.iter().filter(|a| a.is_over_limit()) {
        output::warning(format!("{} is over its credit limit.", account.name));
    }

    let stats = context.tracker.credit_stats();
    println!();
    println!(
        "Total limit {}  balance {}  available {}  utilization {}",
        output::money(stats.total_credit_limit),
        output::money(stats.total_balance),
        output::money(stats.available_credit),
        output::percent(stats.utilization)
    );
    if context.tracker.profile().show_advanced {
        println!(
            "Minimum payments due: {}",
            output::money(stats.total_minimum_payments)
        );
    }
    Ok(())
}

fn show(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [token] = args else {
        return Err(CommandError::usage("credit show <#>"));
    };
    let id = args::resolve(context.tracker.accounts(), token)?;
    let Some(account) = context.tracker.accounts().iter().find(|a| a.id == id) else {
        return Err(CommandError::InvalidArguments(format!("no entry `{token}`")));
    };
    output::section(account.display_label());
    println!("Id:               {}", account.id);
    println!("Credit limit:     {}", output::money(account.credit_limit));
    println!("Current balance:  {}", output::money(account.current_balance));
    println!("Available credit: {}", output::money(account.available_credit()));
    println!("Utilization:      {}", output::percent(account.utilization()));
    if context.tracker.profile().show_advanced {
        println!("Interest rate:    {}", output::percent(account.interest_rate));
        println!("Minimum payment:  {}", output::money(account.minimum_payment));
    }
    if let Some(due) = account.due_date {
        println!("Due date:         {due}");
    }
    if let Some(notes) = &account.notes {
        println!("Notes:            {notes}");
    }
    Ok(())
}

fn add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "credit add <name> <type> <limit> [balance=..] [rate=..] [min=..] [due=YYYY-MM-DD] [notes=..]";
    let [name, kind, limit, rest @ ..] = args else {
        return Err(CommandError::usage(usage));
    };
    let mut draft = CreditAccountDraft::new(*name, *kind, args::amount("Credit limit", limit)?);
    for (key, value) in args::fields(rest)? {
        args::apply_credit_field(&mut draft, &key, value)?;
    }
    context.tracker.add_credit_account(&draft)?;
    output::success(format!("Credit account `{}` added.", draft.name.trim()));
    report_score(context);
    Ok(())
}

fn edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "credit edit <#> field=value...";
    let [token, rest @ ..] = args else {
        return Err(CommandError::usage(usage));
    };
    if rest.is_empty() {
        return Err(CommandError::usage(usage));
    }
    let id = args::resolve(context.tracker.accounts(), token)?;
    let Some(existing) = context.tracker.accounts().iter().find(|a| a.id == id) else {
        return Err(CommandError::InvalidArguments(format!("no entry `{token}`")));
    };
    let mut draft = CreditAccountDraft::from_account(existing);
    for (key, value) in args::fields(rest)? {
        args::apply_credit_field(&mut draft, &key, value)?;
    }
    context.tracker.update_credit_account(id, &draft)?;
    output::success(format!("Credit account `{}` updated.", draft.name.trim()));
    report_score(context);
    Ok(())
}

fn remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [token] = args else {
        return Err(CommandError::usage("credit remove <#>"));
    };
    let id = args::resolve(context.tracker.accounts(), token)?;
    let name = context
        .tracker
        .accounts()
        .iter()
        .find(|a| a.id == id)
        .map(|a| a.name.clone())
        .unwrap_or_default();
    if !context.confirm(&format!("Delete credit account `{name}`?"))? {
        output::info("Nothing deleted.");
        return Ok(());
    }
    let removed = context.tracker.remove_credit_account(id)?;
    output::success(format!("Credit account `{}` deleted.", removed.name));
    Ok(())
}

fn report_score(context: &ShellContext) {
    if let Some(score) = context.tracker.score() {
        output::info(format!(
            "Estimated credit score: {} ({})",
            score.score,
            ScoreRating::for_score(score.score).label()
        ));
    }
}

fn cmd_score(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if !args.is_empty() {
        return Err(CommandError::usage(SCORE_USAGE));
    }
    let Some(score) = context.tracker.score() else {
        output::info("Credit scores are not shown for this age group.");
        return Ok(());
    };
    output::section("Estimated credit score");
    println!(
        "{} ({}) as of {}",
        score.score,
        ScoreRating::for_score(score.score).label(),
        score.last_updated.format("%Y-%m-%d %H:%M UTC")
    );
    let factors = &score.factors;
    output::table(
        &["Factor", "Points"],
        &[
            vec!["Payment history".into(), factors.payment_history.to_string()],
            vec!["Credit utilization".into(), factors.credit_utilization.to_string()],
            vec!["Credit age".into(), factors.credit_age.to_string()],
            vec!["Credit mix".into(), factors.credit_mix.to_string()],
            vec!["New credit".into(), factors.new_credit.to_string()],
        ],
    );
    if context.tracker.accounts().is_empty() {
        output::hint("Add a credit account to replace this starting estimate.");
    }
    Ok(())
}
