//! Runs of the `phase_diagram` binary itself.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const TWO_BY_TWO: &str = "# T P phase G\n100 1 phaseA -1\n200 1 phaseA -1\n100 2 phaseB -1\n200 2 phaseB -1\n";

fn run(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_phase_diagram"))
        .args(args)
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn default_output_lands_next_to_input() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("run1.out"), TWO_BY_TWO).unwrap();

    let out = run(&["run1.out"], dir.path());
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let expected = dir.path().join("run1_phase_diagram.png");
    let img = image::open(&expected).unwrap().to_rgb8();
    assert_eq!(img.dimensions(), (2, 2));
    assert!(String::from_utf8_lossy(&out.stdout).contains("run1_phase_diagram.png"));
}

#[test]
fn explicit_output_and_cell_size() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("grid.dat"), TWO_BY_TWO).unwrap();

    let out = run(&["grid.dat", "big.png", "--cell-size", "3"], dir.path());
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let img = image::open(dir.path().join("big.png")).unwrap().to_rgb8();
    assert_eq!(img.dimensions(), (6, 6));
}

#[test]
fn malformed_input_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("bad.dat"), "100 1 A -1\n200 1 A\n").unwrap();

    let out = run(&["bad.dat"], dir.path());
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("line 2"));
    assert!(!dir.path().join("bad_phase_diagram.png").exists());
}

#[test]
fn missing_input_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    let out = run(&["absent.dat"], dir.path());
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("absent.dat"));
}

#[test]
fn out_of_range_options_exit_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("grid.dat"), TWO_BY_TWO).unwrap();

    for args in [
        &["grid.dat", "--cell-size", "3000000000"][..],
        &["grid.dat", "--cell-size", "0"][..],
        &["grid.dat", "--tolerance=-1"][..],
        &["grid.dat", "--tolerance", "NaN"][..],
    ] {
        let out = run(args, dir.path());
        assert!(!out.status.success(), "{args:?} succeeded");
    }
    assert!(!dir.path().join("grid_phase_diagram.png").exists());
}
