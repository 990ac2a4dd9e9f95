use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

/// The binary with settings isolated in `dir` and no instance variables set.
fn cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pos-cli").unwrap();
    cmd.current_dir(dir.path())
        .env("MARKETPLACE_KIT_PATH", dir.path().join(".marketplace-kit"))
        .env_remove("MARKETPLACE_URL")
        .env_remove("MARKETPLACE_TOKEN")
        .env_remove("MARKETPLACE_EMAIL")
        .env_remove("PORT");
    cmd
}

#[test]
fn help_lists_commands() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("pos-cli"))
        .stdout(contains("data"))
        .stdout(contains("gui"));
}

#[test]
fn data_clean_help_shows_auto_confirm() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["data", "clean", "--help"])
        .assert()
        .success()
        .stdout(contains("--auto-confirm"));
}

#[test]
fn data_clean_without_environment_fails() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["data", "clean"])
        .assert()
        .failure()
        .stderr(contains("MARKETPLACE_URL is not set"));
}

#[test]
fn data_clean_unknown_environment_suggests_env_add() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["data", "clean", "qa"])
        .assert()
        .failure()
        .stderr(contains("pos-cli env add qa"));
}

#[test]
fn wrong_confirmation_closes_without_cleaning() {
    let dir = TempDir::new().unwrap();
    // Nothing listens on the discard port; a request there would fail the command.
    cmd(&dir)
        .env("MARKETPLACE_URL", "http://127.0.0.1:9")
        .args(["data", "clean"])
        .write_stdin("clean data\n")
        .assert()
        .success()
        .stderr(contains("REMOVE your data from instance: http://127.0.0.1:9/"))
        .stderr(contains("Wrong confirmation"));
}

#[test]
fn env_add_list_remove() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args([
            "env",
            "add",
            "staging",
            "--url",
            "https://staging.example.com",
            "--email",
            "dev@example.com",
            "--token",
            "abc",
        ])
        .assert()
        .success()
        .stdout(contains("Added environment 'staging'"));

    cmd(&dir)
        .args(["env", "list"])
        .assert()
        .success()
        .stdout(contains("staging → https://staging.example.com/"));

    cmd(&dir)
        .args(["env", "remove", "staging"])
        .assert()
        .success()
        .stdout(contains("removed 'staging'"));

    cmd(&dir)
        .args(["env", "list"])
        .assert()
        .success()
        .stdout(contains("no environments defined"));
}

#[test]
fn gui_serve_on_taken_port_explains_and_exits_cleanly() {
    let dir = TempDir::new().unwrap();
    let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = taken.local_addr().unwrap().port().to_string();

    cmd(&dir)
        .args(["gui", "serve", "-p", &port])
        .assert()
        .success()
        .stderr(contains(format!("Port {port} is already in use.")))
        .stderr(contains("-p <port>"));
}

#[test]
fn completions_for_bash() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(contains("pos-cli"));
}

#[test]
fn completions_reject_unknown_shell() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["completions", "tcsh"])
        .assert()
        .failure()
        .stderr(contains("unsupported shell"));
}
