use std::path::PathBuf;
use std::process::Command;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("static")
        .join(name)
}

fn slicer_command() -> Command {
    Command::new(env!("CARGO_BIN_EXE_vtk-slicer"))
}

#[test]
fn missing_file_exits_with_one() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("NRotSphere001N000.vtk");
    let output = dir.path().join("slices.svg");

    let out = slicer_command()
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains(&format!("Error: File not found at {}", input.display())));
    assert!(!output.exists());
}

#[test]
fn mismatched_requests_exit_with_one() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("slices.svg");

    let out = slicer_command()
        .arg(fixture("structured_ascii.vtk"))
        .args(["--field", "Pressure", "--field", "Density"])
        .args(["--slice", "1"])
        .args(["--axis", "x", "--axis", "y"])
        .arg("--output")
        .arg(&output)
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("must have the same length"));
    assert!(!output.exists());
}

#[test]
fn default_request_writes_figure() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("slices.svg");

    let out = slicer_command()
        .arg(fixture("structured_ascii.vts"))
        .arg("-o")
        .arg(&output)
        .output()
        .unwrap();

    assert!(out.status.success());

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.starts_with("StructuredGrid"));
    assert!(stdout.contains("  - Pressure: (24,)"));

    let svg = std::fs::read_to_string(&output).unwrap();
    assert_eq!(svg.matches(r#"class="panel""#).count(), 1);
    assert!(svg.contains(">Pressure</text>"));
}
