use assert_cmd::Command;
use std::fs;

fn golden_gen() -> Command {
    Command::cargo_bin("golden-gen").unwrap()
}

#[test]
fn generate_then_replay() {
    let tmp = tempfile::tempdir().unwrap();
    let out = golden_gen()
        .args(["generate", "--samples", "1000", "--seed", "9", "--out"])
        .arg(tmp.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8(out).unwrap();
    assert!(stdout.contains("SNR: "));
    assert!(stdout.contains("anaInputs.txt"));
    assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 5);

    golden_gen()
        .args(["replay", "--dir"])
        .arg(tmp.path())
        .assert()
        .success();
}

#[test]
fn small_sine_through_rectangular_is_exact() {
    let tmp = tempfile::tempdir().unwrap();
    // rectangular, hop == frame and samples well below 2^(W-2)
    let out = golden_gen()
        .args([
            "generate",
            "--window",
            "rectangular",
            "--hop-size",
            "4",
            "--frame-size",
            "4",
            "--stimulus",
            "sine",
            "--value-width",
            "16",
            "--samples",
            "64",
            "--sine-period",
            "1000000",
            "--out",
        ])
        .arg(tmp.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert!(String::from_utf8(out).unwrap().contains("SNR: inf dB"));
}

#[test]
fn frame_smaller_than_hop_fails_without_output() {
    let tmp = tempfile::tempdir().unwrap();
    let out_dir = tmp.path().join("vectors");
    golden_gen()
        .args(["generate", "--hop-size", "32", "--frame-size", "16", "--out"])
        .arg(&out_dir)
        .assert()
        .failure();
    assert!(!out_dir.exists());
}

#[test]
fn replay_fails_on_tampered_trace() {
    let tmp = tempfile::tempdir().unwrap();
    golden_gen()
        .args(["generate", "--samples", "320", "--out"])
        .arg(tmp.path())
        .assert()
        .success();
    let path = tmp.path().join("anaOutputs.txt");
    let text = fs::read_to_string(&path).unwrap();
    let mut lines: Vec<i64> = text.lines().map(|l| l.parse().unwrap()).collect();
    lines[100] -= 3;
    let tampered: Vec<String> = lines.iter().map(i64::to_string).collect();
    fs::write(&path, tampered.join("\n")).unwrap();

    golden_gen()
        .args(["replay", "--dir"])
        .arg(tmp.path())
        .assert()
        .failure();
}
