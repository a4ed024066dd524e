#![cfg(feature = "cli")]

use assert_cmd::Command;
use predicates::str::contains as str_contains;
use tempfile::tempdir;

#[allow(deprecated)]
fn run_cli(script: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("cli").expect("cli binary");
    cmd.env_remove("WEEKPLAN_STORE")
        .write_stdin(script.to_string())
        .assert()
}

#[test]
fn cli_reports_every_validation_problem() {
    run_cli("name \nhours 10:00 09:00\ndays ,\nvalidate\nquit\n")
        .success()
        .stdout(str_contains("Schedule has 3 problem(s):"))
        .stdout(str_contains("  - End time must be after start time"))
        .stdout(str_contains("  - At least one day must be selected"))
        .stdout(str_contains(
            "  - Schedule must have at least one task or mandatory task",
        ));
}

#[test]
fn cli_day_view_respects_weekend_opt_in() {
    let assert = run_cli(
        "days mon,sat\ntask add Journal\ntask add Gym\ntask set 2 weekends true\nday sat\nday tue\nquit\n",
    )
    .success();
    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    let saturday = output
        .split("Saturday 9:00 AM - 5:00 PM")
        .nth(1)
        .expect("saturday header");
    assert!(saturday.contains("1 items | 1h 0m of tasks"), "{saturday}");
    assert!(saturday.contains("- Gym"), "{saturday}");
    assert!(!saturday.contains("Journal"), "{saturday}");
    assert!(output.contains("No schedule for Tuesday (not an active day)."));
}

#[test]
fn cli_rejects_frequency_above_active_days() {
    run_cli("days mon,wed\ntask add Piano\ntask set 1 freq 3\nquit\n")
        .success()
        .stdout(str_contains(
            "Error: weekly frequency 3 must be between 1 and 2",
        ));
}

#[test]
fn cli_remove_command_removes_task() {
    run_cli("task add A\ntask add B\ntask rm 2\ntask rm 5\nquit\n")
        .success()
        .stdout(str_contains("Removed task 2."))
        .stdout(str_contains("Task 5 not found."));
}

#[test]
fn cli_mandatory_task_wraps_the_week() {
    run_cli("days sun,mon\nmand add Night shift\nmand set 1 from fri\nmand set 1 to mon\nday sun\nquit\n")
        .success()
        .stdout(str_contains("! Night shift 09:00-17:00"));
}

#[test]
fn cli_save_skips_unchanged_and_load_restores() {
    let dir = tempdir().expect("create temp dir");
    let path = dir.path().join("plan.json");
    let path = path.to_string_lossy().replace('\\', "\\\\");
    let script = format!(
        "task add Persisted\nsave {path}\nsave {path}\ntask add Temp\nload {path}\nshow\nquit\n"
    );
    let assert = run_cli(&script).success();
    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(output.contains(&format!("Schedule saved to {path}.")));
    assert!(output.contains("No changes to save."));
    let after_reload = output
        .split("Schedule loaded from")
        .last()
        .unwrap_or_default();
    assert!(after_reload.contains("Persisted"));
    assert!(
        !after_reload.contains("Temp"),
        "temporary task should not appear after reload:\n{}",
        after_reload
    );
}

#[test]
fn cli_refuses_to_save_invalid_schedule() {
    let dir = tempdir().expect("create temp dir");
    let path = dir.path().join("plan.json");
    let script = format!("save {}\nquit\n", path.display());
    run_cli(&script)
        .success()
        .stdout(str_contains("Schedule not saved:"))
        .stdout(str_contains(
            "  - Schedule must have at least one task or mandatory task",
        ));
    assert!(!path.exists());
}

#[test]
fn cli_saves_unchanged_schedule_to_a_second_path() {
    let dir = tempdir().expect("create temp dir");
    let first = dir.path().join("first.json");
    let second = dir.path().join("second.json");
    let third = dir.path().join("third.json");
    let script = format!(
        "task add Copy me\nsave {a}\nsave {b}\nsave {b}\nload {a}\nsave {c}\nquit\n",
        a = first.display(),
        b = second.display(),
        c = third.display()
    );
    let assert = run_cli(&script).success();
    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(output.contains(&format!("Schedule saved to {}.", second.display())));
    assert!(output.contains(&format!("Schedule saved to {}.", third.display())));
    assert_eq!(output.matches("No changes to save.").count(), 1, "{output}");
    assert!(first.exists() && second.exists() && third.exists());
}
