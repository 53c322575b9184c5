use assert_cmd::Command;
use predicates::prelude::*;

#[allow(deprecated)]
fn fitchlist() -> Command {
    Command::cargo_bin("fitchlist").unwrap()
}

#[test]
fn test_main_help_lists_commands() {
    fitchlist()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("browse"))
        .stdout(predicate::str::contains("resources"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_list_help_documents_view_options() {
    fitchlist()
        .args(["list", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--sort"))
        .stdout(predicate::str::contains("--filter <KEY=V1,V2>"))
        .stdout(predicate::str::contains("--per-page"))
        .stdout(predicate::str::contains("[possible values: table, grid, list]"));
}

#[test]
fn test_invalid_view_mode_is_rejected() {
    fitchlist()
        .args(["list", "modules", "--view", "kanban"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value 'kanban'"));
}
