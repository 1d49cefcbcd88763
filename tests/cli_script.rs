use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

fn cli(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("finwell_cli").unwrap();
    cmd.env("FINWELL_CLI_SCRIPT", "1")
        .env("FINWELL_HOME", home.path())
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn script_mode_records_accounts_and_payments() {
    let home = TempDir::new().unwrap();
    let input = "\
credit add Visa \"Credit Card\" 1000 balance=100
debt add Card \"Credit Card\" 1200 min=110
debt pay 1 200
exit
";
    cli(&home)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Credit account `Visa` added."))
        .stdout(contains("Estimated credit score: 385 (Poor)"))
        .stdout(contains("Balance: $1,200.00 -> $1,000.00"))
        .stdout(contains("Changes saved."));

    let data = home.path().join("data");
    let accounts = std::fs::read_to_string(data.join("creditAccounts.json")).unwrap();
    assert!(accounts.contains("\"name\":\"Visa\""));
    let debts = std::fs::read_to_string(data.join("debts.json")).unwrap();
    assert!(debts.contains("\"currentBalance\":1000.0"));
}

#[test]
fn saved_state_is_listed_on_next_run() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .write_stdin("debt add Loan \"Student Loan\" 5000 min=250 rate=4.5\n")
        .assert()
        .success();

    cli(&home)
        .write_stdin("debt list\ndebt plan snowball\n")
        .assert()
        .success()
        .stdout(contains("Loan"))
        .stdout(contains("$5,000.00"))
        .stdout(contains("Snowball plan"));
}

#[test]
fn validation_errors_are_reported_and_the_shell_continues() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .write_stdin("credit add Jet Mortgage 9000000\ncredit list\n")
        .assert()
        .success()
        .stdout(contains("Credit limit must be between 0 and 100000"))
        .stdout(contains("No credit accounts yet."));
}

#[test]
fn unknown_commands_get_a_suggestion() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .write_stdin("credt\n")
        .assert()
        .success()
        .stdout(contains("Unknown command `credt`"))
        .stdout(contains("Suggestion: `credit`?"));
}

#[test]
fn kids_profile_hides_scores() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .write_stdin("config set birth_date 2019-01-01\n")
        .assert()
        .success()
        .stdout(contains("saved"));

    cli(&home)
        .write_stdin("profile\ncredit add Piggy \"Savings Card\" 40\nscore\n")
        .assert()
        .success()
        .stdout(contains("Profile: kids"))
        .stdout(contains("Credit scores are not shown for this age group."));
}

#[test]
fn oversized_autosave_delay_is_refused() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .write_stdin("config set autosave_delay_ms 18446744073709551615\nconfig show\n")
        .assert()
        .success()
        .stdout(contains("autosave_delay_ms must be at most 86400000"))
        .stdout(contains("autosave_delay_ms: 2000"));

    cli(&home)
        .write_stdin("debt add Phone Other 300\ndebt list\n")
        .assert()
        .success()
        .stdout(contains("Phone"));
}

#[test]
fn games_lists_saved_catalog_or_falls_back() {
    let home = TempDir::new().unwrap();
    let games = home.path().join("games");
    std::fs::create_dir_all(&games).unwrap();
    std::fs::write(
        games.join("debt.json"),
        r#"{"games":[{"title":"Avalanche Run"}],"totalGames":4,"completedGames":1}"#,
    )
    .unwrap();

    cli(&home)
        .write_stdin("games debt\ngames credit\n")
        .assert()
        .success()
        .stdout(contains("- Avalanche Run"))
        .stdout(contains("Completed 1 of 4 (25.0%)"))
        .stdout(contains("No games available right now."));
}
