//! Command-line tests against the built `logsink` binary.
use assert_cmd::Command;
use predicates::str::contains;

const CONFIG_VARS: [&str; 11] = [
    "DB_HOST",
    "DB_NAME",
    "DB_USER",
    "DB_PASSWORD",
    "DB_PORT",
    "LOGSINK_HOST",
    "LOGSINK_PORT",
    "LOGSINK_LOG_LEVEL",
    "LOGSINK_DB_MAX_CONNECTIONS",
    "LOGSINK_DB_ACQUIRE_TIMEOUT_SECS",
    "LOGSINK_CORS_ENABLED",
];

fn logsink() -> Command {
    let mut cmd = Command::cargo_bin("logsink").unwrap();
    for var in CONFIG_VARS {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn version_flag() {
    logsink()
        .arg("--version")
        .assert()
        .success()
        .stdout(contains("logsink"));
}

#[test]
fn env_example_lists_database_settings() {
    logsink()
        .arg("env-example")
        .assert()
        .success()
        .stdout(contains("DB_HOST=db"))
        .stdout(contains("DB_PORT=5432"))
        .stdout(contains("LOGSINK_PORT=5000"));
}

#[test]
fn check_env_accepts_defaults() {
    logsink().arg("check-env").assert().success();
}

#[test]
fn check_env_rejects_invalid_port() {
    logsink()
        .arg("check-env")
        .env("LOGSINK_PORT", "invalid")
        .assert()
        .failure()
        .stderr(contains("LOGSINK_PORT"));
}

#[test]
fn clear_requires_confirmation() {
    logsink()
        .arg("clear")
        .assert()
        .code(2)
        .stderr(contains("Refusing to clear logs without --yes"));
}

#[test]
fn init_db_fails_without_database() {
    logsink()
        .arg("init-db")
        .env("DB_HOST", "127.0.0.1")
        .env("DB_PORT", "1")
        .env("LOGSINK_DB_ACQUIRE_TIMEOUT_SECS", "1")
        .assert()
        .failure()
        .stderr(contains("Database schema initialization failed"));
}

#[test]
fn stats_fails_without_database() {
    logsink()
        .arg("stats")
        .env("DB_HOST", "127.0.0.1")
        .env("DB_PORT", "1")
        .env("LOGSINK_DB_ACQUIRE_TIMEOUT_SECS", "1")
        .assert()
        .failure()
        .stderr(contains("Failed to fetch statistics"));
}
