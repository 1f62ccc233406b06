//! End-to-end tests for the bootstrap sequence, driven by stub
//! executables that append every invocation to a log file. The log order
//! is the observable contract: runtime gate first, installs next, launch
//! last, and nothing after a fatal gate failure.
#![cfg(unix)]
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Stubs {
    temp: TempDir,
    runtime: PathBuf,
    installer: PathBuf,
    log: PathBuf,
}

/// Lay out a project with a stub runtime, a stub installer, and an entry
/// point. The runtime stub answers `--version` and logs launches; the
/// installer stub logs installs and exits with the code in `fail_on`
/// for that package.
fn setup(installer_fail_on: Option<&str>) -> Stubs {
    let temp = TempDir::new().unwrap();
    let log = temp.path().join("invocations.log");
    let runtime = temp.path().join("fake-python");
    let installer = temp.path().join("fake-pip");

    write_script(
        &runtime,
        &format!(
            r#"if [ "$1" = "--version" ]; then
  echo "Python 3.11.4"
else
  echo "launch $1" >> "{log}"
fi"#,
            log = log.display()
        ),
    );

    let fail_clause = match installer_fail_on {
        Some(package) => format!(r#"[ "$2" = "{}" ] && exit 1"#, package),
        None => String::new(),
    };
    write_script(
        &installer,
        &format!(
            "echo \"install $2\" >> \"{log}\"\n{fail}\nexit 0",
            log = log.display(),
            fail = fail_clause
        ),
    );

    fs::write(temp.path().join("app.py"), "").unwrap();

    let config = format!(
        r#"app_name: Stub App
runtime:
  candidates: [{runtime}]
install:
  program: [{installer}, install]
  index_url: null
dependencies:
  - moviepy==1.0.3
  - PyQt5
  - numpy
  - opencv-python
  - Pillow
launch:
  entry_point: app.py
"#,
        runtime = temp.path().join("fake-python").display(),
        installer = temp.path().join("fake-pip").display(),
    );
    let dir = temp.path().join(".basecamp");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("config.yml"), config).unwrap();

    Stubs {
        temp,
        runtime,
        installer,
        log,
    }
}

fn write_script(path: &Path, body: &str) {
    fs::write(path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

fn read_log(stubs: &Stubs) -> Vec<String> {
    fs::read_to_string(&stubs.log)
        .unwrap_or_default()
        .lines()
        .map(String::from)
        .collect()
}

fn basecamp(stubs: &Stubs) -> Command {
    let mut cmd = Command::new(cargo_bin("basecamp"));
    cmd.current_dir(stubs.temp.path());
    cmd
}

#[test]
fn full_sequence_installs_then_launches_and_exits_0() {
    let stubs = setup(None);

    basecamp(&stubs).assert().success();

    let log = read_log(&stubs);
    assert_eq!(
        log,
        vec![
            "install moviepy==1.0.3",
            "install PyQt5",
            "install numpy",
            "install opencv-python",
            "install Pillow",
            "launch app.py",
        ]
    );
}

#[test]
fn runtime_gate_blocks_installs_and_launch() {
    let stubs = setup(None);
    // Removing the runtime stub makes every candidate unresolvable
    fs::remove_file(&stubs.runtime).unwrap();

    basecamp(&stubs)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("python.org"));

    // Zero install attempts, zero launch attempts
    assert!(read_log(&stubs).is_empty());
}

#[test]
fn best_effort_attempts_all_installs_and_still_launches() {
    let stubs = setup(Some("PyQt5"));

    basecamp(&stubs)
        .assert()
        .success()
        .stderr(predicate::str::contains("best-effort"));

    let log = read_log(&stubs);
    // Every install after the failed one was still attempted
    assert_eq!(log.len(), 6);
    assert_eq!(log[1], "install PyQt5");
    assert_eq!(log[5], "launch app.py");
}

#[test]
fn fail_fast_stops_the_sequence_and_exits_1() {
    let stubs = setup(Some("PyQt5"));

    basecamp(&stubs)
        .args(["run", "--fail-fast"])
        .assert()
        .failure()
        .code(1);

    let log = read_log(&stubs);
    assert_eq!(log, vec!["install moviepy==1.0.3", "install PyQt5"]);
    assert!(!log.iter().any(|l| l.starts_with("launch")));
}

#[test]
fn launch_never_precedes_the_last_install_attempt() {
    let stubs = setup(Some("moviepy==1.0.3"));

    basecamp(&stubs).assert().success();

    let log = read_log(&stubs);
    let launch_idx = log.iter().position(|l| l.starts_with("launch")).unwrap();
    let last_install_idx = log
        .iter()
        .rposition(|l| l.starts_with("install"))
        .unwrap();
    assert!(last_install_idx < launch_idx);
    assert_eq!(launch_idx, log.len() - 1);
}

#[test]
fn second_run_replays_the_same_sequence() {
    let stubs = setup(None);

    basecamp(&stubs).assert().success();
    let first = read_log(&stubs);

    basecamp(&stubs).assert().success();
    let second = read_log(&stubs);

    // The second half of the log is the first half again: installs are
    // re-attempted (no-ops or upgrade checks), never skipped or errored
    assert_eq!(second.len(), first.len() * 2);
    assert_eq!(&second[first.len()..], first.as_slice());
}

#[test]
fn index_url_flag_substitutes_the_mirror() {
    let stubs = setup(None);
    // Re-point the installer stub to log its full argv
    write_script(
        &stubs.installer,
        &format!(
            "echo \"install $@\" >> \"{}\"\nexit 0",
            stubs.log.display()
        ),
    );

    basecamp(&stubs)
        .args(["run", "--index-url", "http://localhost:9999/simple"])
        .assert()
        .success();

    let log = read_log(&stubs);
    for line in log.iter().filter(|l| l.starts_with("install")) {
        assert!(line.contains("-i http://localhost:9999/simple"), "{}", line);
    }
}

#[test]
fn application_exit_code_is_deferred_not_propagated() {
    let stubs = setup(None);
    // The app crashing is the application's business: launcher still exits 0
    write_script(
        &stubs.runtime,
        &format!(
            r#"if [ "$1" = "--version" ]; then
  echo "Python 3.11.4"
else
  echo "launch $1" >> "{log}"
  exit 3
fi"#,
            log = stubs.log.display()
        ),
    );

    basecamp(&stubs)
        .assert()
        .success()
        .stderr(predicate::str::contains("exited with code 3"));
}

#[test]
fn skip_install_goes_straight_to_launch() {
    let stubs = setup(None);

    basecamp(&stubs)
        .args(["run", "--skip-install"])
        .assert()
        .success();

    let log = read_log(&stubs);
    assert_eq!(log, vec!["launch app.py"]);
}

#[test]
fn no_launch_attempts_installs_only() {
    let stubs = setup(None);

    basecamp(&stubs)
        .args(["run", "--no-launch"])
        .assert()
        .success();

    let log = read_log(&stubs);
    assert_eq!(log.len(), 5);
    assert!(log.iter().all(|l| l.starts_with("install")));
}

#[test]
fn dry_run_executes_nothing() {
    let stubs = setup(None);

    basecamp(&stubs)
        .args(["run", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("would run:"));

    // Only the version query ran; it doesn't log
    assert!(read_log(&stubs).is_empty());
}
