use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

struct TestContext {
    dir: TempDir,
    settings: PathBuf,
}

impl TestContext {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let settings = dir.path().join("settings.json");
        Self { dir, settings }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_cutforge"))
            .args(args)
            .arg("--settings")
            .arg(&self.settings)
            .output()
            .expect("Failed to execute process")
    }
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn s(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_optimize_writes_plan_and_remembers_input() {
    let ctx = TestContext::new();
    let input = ctx.write(
        "cuts.csv",
        "Cut Length,Max Length,Material Type,Quantity\n12,25,Pine,4\n3 1/2,96,Oak,2\n",
    );
    let out_dir = ctx.path("plan");

    let out = ctx.run(&[
        "optimize",
        s(&input),
        "--output",
        s(&out_dir),
        "--kerf",
        "1",
        "--all-reports",
    ]);
    let text = stdout(&out);
    assert!(out.status.success(), "{}", text);

    let saved = Regex::new(r"Results saved to: .*plan").unwrap();
    assert!(saved.is_match(&text), "{}", text);
    let summary_total = Regex::new(r"Total\s*\|\s*3\s*\|\s*6\s*\|").unwrap();
    assert!(summary_total.is_match(&text), "{}", text);
    assert!(text.contains("PASS"));

    for file in ["grouped_cuts.csv", "summary.csv", "validation.csv"] {
        assert!(out_dir.join(file).exists(), "missing {}", file);
    }
    assert!(!out_dir.join("issues.csv").exists());

    let settings = fs::read_to_string(&ctx.settings).unwrap();
    assert!(settings.contains("cuts.csv"), "{}", settings);
    assert!(settings.contains("\"kerf\": \"1\""), "{}", settings);
}

#[test]
fn test_strict_exit_code_on_oversize() {
    let ctx = TestContext::new();
    let input = ctx.write("cuts.csv", "Cut Length,Max Length,Material Type\n30,25,Pine\n10,25,Pine\n");

    let lenient = ctx.run(&["optimize", s(&input), "--no-save"]);
    assert_eq!(lenient.status.code(), Some(0));
    assert!(ctx.path("cuts_cutplan").join("issues.csv").exists());

    let strict = ctx.run(&["optimize", s(&input), "--no-save", "--strict"]);
    assert_eq!(strict.status.code(), Some(2));
    assert!(!ctx.settings.exists());
}

#[test]
fn test_bad_kerf_exits_with_error() {
    let ctx = TestContext::new();
    let input = ctx.write("cuts.csv", "Cut Length,Max Length,Material Type\n10,25,Pine\n");

    let out = ctx.run(&["optimize", s(&input), "--kerf", "abc"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).contains("Invalid kerf 'abc'"), "{}", stdout(&out));
    assert!(!ctx.path("cuts_cutplan").exists());
}

#[test]
fn test_sample_then_optimize_from_settings() {
    let ctx = TestContext::new();
    let sample = ctx.path("sample.csv");

    let out = ctx.run(&["sample", s(&sample), "--rows", "25", "--seed", "7"]);
    assert!(out.status.success());
    let rows = fs::read_to_string(&sample).unwrap().lines().count();
    assert_eq!(rows, 26);

    // Seed the remembered input, then run with no input argument.
    let first = ctx.run(&["optimize", s(&sample), "--kerf", "1/8"]);
    assert!(first.status.success());
    let second = ctx.run(&["optimize", "--json", s(&ctx.path("plan.json"))]);
    assert!(second.status.success(), "{}", stdout(&second));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(ctx.path("plan.json")).unwrap()).unwrap();
    assert_eq!(json["kerf"], "0.125");
    assert_eq!(json["strategy"], "first-fit");
    assert_eq!(json["total_instances"], 25);
}

#[test]
fn test_template_command() {
    let ctx = TestContext::new();
    let path = ctx.path("template.csv");
    let out = ctx.run(&["template", s(&path)]);
    assert!(out.status.success());
    assert_eq!(
        fs::read_to_string(&path).unwrap().trim_end(),
        "Cut Length,Max Length,Material Type,Quantity"
    );
}

#[test]
fn test_optimize_without_input_fails() {
    let ctx = TestContext::new();
    let out = ctx.run(&["optimize"]);
    assert_eq!(out.status.code(), Some(1));
}
