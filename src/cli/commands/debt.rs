use crate::core::Screen;
use crate::domain::{DebtDraft, Displayable};
use crate::ledger::PayoffStrategy;

use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::{CommandEntry, CommandRegistry};
use super::args;

const DEBT_USAGE: &str = "debt [list | show <#> | add <name> <type> <amount> [field=value...] | edit <#> field=value... | remove <#> | pay <#> <amount> [YYYY-MM-DD] | plan [snowball|avalanche]]";

pub(crate) fn register(registry: &mut CommandRegistry) {
    registry.register(CommandEntry::new(
        "debt",
        "Track debts, payments, and payoff plans",
        DEBT_USAGE,
        cmd_debt,
    ));
}

fn cmd_debt(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.split_first() {
        None | Some((&"list", _)) => list(context),
        Some((&"show", rest)) => show(context, rest),
        Some((&"add", rest)) => add(context, rest),
        Some((&"edit", rest)) => edit(context, rest),
        Some((&"remove", rest)) | Some((&"delete", rest)) => remove(context, rest),
        Some((&"pay", rest)) => pay(context, rest),
        Some((&"plan", rest)) => plan(context, rest),
        Some(_) => Err(CommandError::usage(DEBT_USAGE)),
    }
}

fn months_label(months: Option<u32>) -> String {
    match months {
        Some(0) => "paid off".into(),
        Some(1) => "1 month".into(),
        Some(n) => format!("{n} months"),
        None => "never at this payment".into(),
    }
}

fn list(context: &mut ShellContext) -> CommandResult {
    context.tracker.visit(Screen::Debt);
    let debts = context.tracker.debts();
    output::section("Debts");
    if debts.is_empty() {
        output::info("No debts tracked. Add one with `debt add`.");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = debts
        .iter()
        .enumerate()
        .map(|(idx, debt)| {
            vec![
                (idx + 1).to_string(),
                debt.name.clone(),
                debt.kind.clone(),
                output::money(debt.current_balance),
                output::money(debt.original_amount),
                output::percent(debt.progress_percentage()),
                months_label(debt.payoff_months()),
            ]
        })
        .collect();
    output::table(
        &["#", "Name", "Type", "Balance", "Original", "Paid", "Payoff"],
        &rows,
    );

    let stats = context.tracker.debt_stats();
    println!();
    println!(
        "Total debt {}  paid {}  progress {}  ({} of {} paid off)",
        output::money(stats.total_debt),
        output::money(stats.total_paid),
        output::percent(stats.progress_percentage),
        stats.paid_off_count,
        stats.debts_count
    );
    if context.tracker.profile().show_advanced {
        println!(
            "Minimum payments {}  monthly interest {}  average rate {}  estimated payoff {}",
            output::money(stats.total_minimum_payments),
            output::money(stats.total_monthly_interest),
            output::percent(stats.avg_interest_rate),
            months_label(Some(stats.estimated_payoff_months))
        );
    }
    Ok(())
}

fn show(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [token] = args else {
        return Err(CommandError::usage("debt show <#>"));
    };
    let id = args::resolve(context.tracker.debts(), token)?;
    let Some(debt) = context.tracker.debts().iter().find(|d| d.id == id) else {
        return Err(CommandError::InvalidArguments(format!("no entry `{token}`")));
    };
    output::section(debt.display_label());
    println!("Id:               {}", debt.id);
    println!("Original amount:  {}", output::money(debt.original_amount));
    println!("Current balance:  {}", output::money(debt.current_balance));
    println!("Paid so far:      {}", output::money(debt.total_paid()));
    println!("Started:          {}", debt.start_date);
    if context.tracker.profile().show_advanced {
        println!("Interest rate:    {}", output::percent(debt.interest_rate));
        println!("Minimum payment:  {}", output::money(debt.minimum_payment));
        println!("Monthly interest: {}", output::money(debt.monthly_interest()));
        println!("Payoff:           {}", months_label(debt.payoff_months()));
    }
    if let Some(due) = debt.due_date {
        println!("Due date:         {due}");
    }
    if let Some(notes) = &debt.notes {
        println!("Notes:            {notes}");
    }
    if debt.payments.is_empty() {
        output::info("No payments recorded.");
    } else {
        let rows: Vec<Vec<String>> = debt
            .payments
            .iter()
            .map(|p| {
                vec![
                    p.date.to_string(),
                    output::money(p.amount),
                    output::money(p.previous_balance),
                    output::money(p.new_balance),
                ]
            })
            .collect();
        output::table(&["Date", "Amount", "Before", "After"], &rows);
    }
    Ok(())
}

fn add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "debt add <name> <type> <amount> [balance=..] [rate=..] [min=..] [due=..] [start=..] [notes=..]";
    let [name, kind, amount, rest @ ..] = args else {
        return Err(CommandError::usage(usage));
    };
    let mut draft = DebtDraft::new(*name, *kind, args::amount("Original amount", amount)?);
    for (key, value) in args::fields(rest)? {
        args::apply_debt_field(&mut draft, &key, value)?;
    }
    context.tracker.add_debt(&draft)?;
    output::success(format!("Debt `{}` added.", draft.name.trim()));
    Ok(())
}

fn edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "debt edit <#> field=value...";
    let [token, rest @ ..] = args else {
        return Err(CommandError::usage(usage));
    };
    if rest.is_empty() {
        return Err(CommandError::usage(usage));
    }
    let id = args::resolve(context.tracker.debts(), token)?;
    let Some(existing) = context.tracker.debts().iter().find(|d| d.id == id) else {
        return Err(CommandError::InvalidArguments(format!("no entry `{token}`")));
    };
    let mut draft = DebtDraft::from_debt(existing);
    for (key, value) in args::fields(rest)? {
        args::apply_debt_field(&mut draft, &key, value)?;
    }
    context.tracker.update_debt(id, &draft)?;
    output::success(format!("Debt `{}` updated.", draft.name.trim()));
    Ok(())
}

fn remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [token] = args else {
        return Err(CommandError::usage("debt remove <#>"));
    };
    let id = args::resolve(context.tracker.debts(), token)?;
    let name = context
        .tracker
        .debts()
        .iter()
        .find(|d| d.id == id)
        .map(|d| d.name.clone())
        .unwrap_or_default();
    if !context.confirm(&format!("Delete debt `{name}` and its payment history?"))? {
        output::info("Nothing deleted.");
        return Ok(());
    }
    let removed = context.tracker.remove_debt(id)?;
    output::success(format!("Debt `{}` deleted.", removed.name));
    Ok(())
}

fn pay(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "debt pay <#> <amount> [YYYY-MM-DD]";
    let (token, amount, date) = match args {
        [token, amount] => (token, amount, None),
        [token, amount, date] => (token, amount, Some(args::date(date)?)),
        _ => return Err(CommandError::usage(usage)),
    };
    let id = args::resolve(context.tracker.debts(), token)?;
    let amount = args::amount("Payment amount", amount)?;
    let record = context.tracker.record_payment(id, amount, date)?;
    output::success(format!(
        "Payment of {} recorded. Balance: {} -> {}",
        output::money(record.amount),
        output::money(record.previous_balance),
        output::money(record.new_balance)
    ));
    if record.new_balance <= 0.0 {
        output::success("This debt is paid off!");
    }
    Ok(())
}

fn plan(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let strategy = match args {
        [] => PayoffStrategy::Avalanche,
        [raw] => PayoffStrategy::parse(raw)
            .ok_or_else(|| CommandError::usage("debt plan [snowball|avalanche]"))?,
        _ => return Err(CommandError::usage("debt plan [snowball|avalanche]")),
    };
    let order = context.tracker.payoff_order(strategy);
    let title = match strategy {
        PayoffStrategy::Snowball => "Snowball plan (smallest balance first)",
        PayoffStrategy::Avalanche => "Avalanche plan (highest rate first)",
    };
    output::section(title);
    if order.is_empty() {
        output::info("No open debts.");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = order
        .iter()
        .enumerate()
        .map(|(idx, debt)| {
            vec![
                (idx + 1).to_string(),
                debt.name.clone(),
                output::money(debt.current_balance),
                output::percent(debt.interest_rate),
                months_label(debt.payoff_months()),
            ]
        })
        .collect();
    output::table(&["Step", "Debt", "Balance", "Rate", "At minimum"], &rows);
    Ok(())
}
