//! End-to-end CLI tests over a small on-disk PHEME-style dataset.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const T0: &str = "Wed Jan 07 11:00:00 +0000 2015";

fn cs_core() -> Command {
    let mut cmd = Command::cargo_bin("cs-core").expect("cs-core binary should exist");
    cmd.env_remove("CASCADE_STATS_CONFIG")
        .env_remove("CASCADE_STATS_CONFIG_DIR")
        .env_remove("CS_LOG")
        .env_remove("RUST_LOG")
        .env("CS_LOG_FORMAT", "human");
    cmd
}

fn tweet(at: &str) -> String {
    format!(r#"{{"id": 1, "text": "x", "created_at": "{}"}}"#, at)
}

fn make_cascade(class_dir: &Path, id: &str, source: Option<&str>, reactions: &[&str]) {
    let dir = class_dir.join(id);
    fs::create_dir_all(dir.join("source-tweet")).unwrap();
    if let Some(at) = source {
        fs::write(dir.join("source-tweet").join(format!("{}.json", id)), tweet(at)).unwrap();
    }
    fs::create_dir_all(dir.join("reactions")).unwrap();
    for (i, at) in reactions.iter().enumerate() {
        fs::write(dir.join("reactions").join(format!("{}{}.json", id, i)), tweet(at)).unwrap();
    }
}

/// Dataset with one event, both classes, and a graph directory.
struct Fixture {
    tmp: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        let event = tmp.path().join("PHEME").join("charliehebdo-all-rnr-threads");
        make_cascade(
            &event.join("rumours"),
            "552783667052167168",
            Some(T0),
            &[
                "Wed Jan 07 11:30:00 +0000 2015",
                "Wed Jan 07 12:00:00 +0000 2015",
                "Wed Jan 07 18:30:00 +0000 2015",
            ],
        );
        make_cascade(
            &event.join("non-rumours"),
            "552784600502915072",
            Some(T0),
            &["Wed Jan 07 11:05:00 +0000 2015"],
        );

        let graph = tmp.path().join("PHEME").join("graph_def");
        fs::create_dir_all(&graph).unwrap();
        fs::write(graph.join("np.txt"), "n1 p1\nn1 p2\nn2 p3\n").unwrap();
        fs::write(graph.join("pu.txt"), "p1 u1\np3 u1\n").unwrap();

        let fixture = Fixture { tmp };
        fs::write(fixture.config_path(), fixture.config_text()).unwrap();
        fixture
    }

    fn root(&self) -> PathBuf {
        self.tmp.path().join("PHEME")
    }

    fn out(&self) -> PathBuf {
        self.tmp.path().join("entropy")
    }

    fn config_path(&self) -> PathBuf {
        self.tmp.path().join("cascade-stats.toml")
    }

    fn config_text(&self) -> String {
        format!(
            r#"
[dataset]
name = "toy"
root = '{root}'
graph_dir = '{graph}'
node_types = ["n", "p", "u"]
edge_files = [
    {{ source = "n", target = "p", file = "np.txt" }},
    {{ source = "p", target = "u", file = "pu.txt" }},
]

[entropy]
output_dir = '{out}'

[embed]
model_name = "word2vec"
"#,
            root = self.root().display(),
            graph = self.root().join("graph_def").display(),
            out = self.out().display(),
        )
    }

    fn cmd(&self) -> Command {
        let mut cmd = cs_core();
        cmd.arg("--config").arg(self.config_path());
        cmd
    }
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

mod entropy {
    use super::*;

    #[test]
    fn writes_one_file_per_class() {
        let fx = Fixture::new();
        let output = fx.cmd().arg("entropy").output().unwrap();
        assert_eq!(output.status.code(), Some(0), "{:?}", output);

        let json = stdout_json(&output);
        assert_eq!(json["command"], "entropy");
        assert_eq!(json["report"]["files"].as_array().unwrap().len(), 2);
        assert_eq!(json["parameters"]["bucket_width_secs"], 21_600);

        let rumours = fx
            .out()
            .join("charliehebdo-all-rnr-threads")
            .join("rumours_entropy.json");
        let records: Value = serde_json::from_str(&fs::read_to_string(rumours).unwrap()).unwrap();
        assert_eq!(records[0]["news_id"], "552783667052167168");
        let h = records[0]["entropy"].as_f64().unwrap();
        assert!((h - 0.9709505944546686).abs() < 1e-9, "{}", h);

        let non_rumours = fx
            .out()
            .join("charliehebdo-all-rnr-threads")
            .join("non-rumours_entropy.json");
        let records: Value =
            serde_json::from_str(&fs::read_to_string(non_rumours).unwrap()).unwrap();
        assert_eq!(records[0]["entropy"], 0.0);
    }

    #[test]
    fn cli_overrides_output_dir_and_bucket_width() {
        let fx = Fixture::new();
        let other = fx.tmp.path().join("elsewhere");
        let output = fx
            .cmd()
            .args(["entropy", "--bucket-hours", "24", "--output-dir"])
            .arg(&other)
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(0));
        assert_eq!(stdout_json(&output)["parameters"]["bucket_width_secs"], 86_400);

        let rumours = other
            .join("charliehebdo-all-rnr-threads")
            .join("rumours_entropy.json");
        let records: Value = serde_json::from_str(&fs::read_to_string(rumours).unwrap()).unwrap();
        // All three reactions share the one 24h bucket.
        assert_eq!(records[0]["entropy"], 0.0);
        assert!(!fx.out().exists());
    }

    #[test]
    fn broken_cascade_gives_partial_exit() {
        let fx = Fixture::new();
        make_cascade(
            &fx.root().join("charliehebdo-all-rnr-threads").join("rumours"),
            "1",
            None,
            &[T0],
        );
        let output = fx.cmd().arg("entropy").output().unwrap();
        assert_eq!(output.status.code(), Some(1));

        let json = stdout_json(&output);
        assert_eq!(json["report"]["batch"]["failed"][0]["item_id"], "1");
        assert_eq!(json["report"]["batch"]["failed"][0]["error"]["code"], 21);
        assert!(fx
            .out()
            .join("charliehebdo-all-rnr-threads")
            .join("rumours_entropy.json")
            .is_file());
    }

    #[test]
    fn missing_root_is_dataset_error() {
        let fx = Fixture::new();
        fx.cmd()
            .args(["entropy", "--root"])
            .arg(fx.tmp.path().join("nope"))
            .assert()
            .code(11)
            .stderr(predicate::str::contains("\"code\": 20"));
    }

    #[test]
    fn invalid_alpha_is_args_error() {
        let fx = Fixture::new();
        fx.cmd()
            .args(["entropy", "--alpha", "0"])
            .assert()
            .code(10);
        assert!(!fx.out().exists());
    }

    #[test]
    fn summary_format() {
        let fx = Fixture::new();
        fx.cmd()
            .args(["-f", "summary", "entropy"])
            .assert()
            .success()
            .stdout(predicate::str::contains("2 records in 2 files (0 skipped, 0 failed)"));
    }
}

mod graph_stats {
    use super::*;

    #[test]
    fn counts_nodes_and_edges() {
        let fx = Fixture::new();
        let output = fx.cmd().arg("graph-stats").output().unwrap();
        assert_eq!(output.status.code(), Some(0));
        let json = stdout_json(&output);
        assert_eq!(json["dataset"], "toy");
        assert_eq!(json["nodes"]["n"], 2);
        assert_eq!(json["nodes"]["p"], 3);
        assert_eq!(json["nodes"]["u"], 1);
        assert_eq!(json["edges"]["n-p"], 3);
        assert_eq!(json["edges"]["p-u"], 2);
    }

    #[test]
    fn missing_graph_dir() {
        let fx = Fixture::new();
        fx.cmd()
            .args(["graph-stats", "--graph-dir"])
            .arg(fx.tmp.path().join("nope"))
            .assert()
            .code(11);
    }

    #[test]
    fn malformed_edge_line() {
        let fx = Fixture::new();
        fs::write(fx.root().join("graph_def").join("pu.txt"), "p1 u1\np2\n").unwrap();
        fx.cmd()
            .arg("graph-stats")
            .assert()
            .code(11)
            .stderr(predicate::str::contains("pu.txt:2"));
    }
}

mod embed {
    use super::*;

    fn model(fx: &Fixture) -> PathBuf {
        let path = fx.tmp.path().join("w2v.txt");
        fs::write(&path, "2 2\nbreaking 1 0\nnews 0 1\n").unwrap();
        path
    }

    #[test]
    fn word2vec_embeds_and_pads() {
        let fx = Fixture::new();
        let output = fx
            .cmd()
            .args(["embed", "--max-seq-len", "3", "--show-tokens", "--model-path"])
            .arg(model(&fx))
            .args(["breaking news", "unknown"])
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(0), "{:?}", output);
        let json = stdout_json(&output);
        assert_eq!(json["model"], "word2vec");
        assert_eq!(json["shape"], serde_json::json!([2, 3, 2]));
        assert_eq!(
            json["embeddings"][0],
            serde_json::json!([1.0, 0.0, 0.0, 1.0, 0.0, 0.0])
        );
        assert_eq!(json["embeddings"][1], serde_json::json!(vec![0.0; 6]));
        assert_eq!(json["tokens"][0], serde_json::json!(["breaking", "news"]));
    }

    #[test]
    fn transformer_model_is_unavailable() {
        let fx = Fixture::new();
        fx.cmd()
            .args(["embed", "--model", "bertweet-base", "hello"])
            .assert()
            .code(12)
            .stderr(predicate::str::contains("bertweet-base"));
    }

    #[test]
    fn unknown_model_is_args_error() {
        let fx = Fixture::new();
        fx.cmd()
            .args(["embed", "--model", "gpt-9", "hello"])
            .assert()
            .code(10);
    }

    #[test]
    fn no_texts_is_args_error() {
        let fx = Fixture::new();
        fx.cmd()
            .arg("embed")
            .arg("--model-path")
            .arg(model(&fx))
            .assert()
            .code(10);
    }
}

mod seq_stats {
    use super::*;

    #[test]
    fn statistics_from_file_and_args() {
        let fx = Fixture::new();
        let input = fx.tmp.path().join("texts.txt");
        fs::write(&input, "a\na b\n\na b c\n").unwrap();
        let output = fx
            .cmd()
            .args(["seq-stats", "--batch-size", "2", "--input"])
            .arg(&input)
            .arg("a b c d e f")
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(0));
        let json = stdout_json(&output);
        assert_eq!(json["texts"], 4);
        assert_eq!(json["stats"]["max"], 6);
        assert_eq!(json["stats"]["min"], 1);
        assert_eq!(json["stats"]["mean"], 3.0);
    }

    #[test]
    fn char_tokenizer() {
        let fx = Fixture::new();
        fx.cmd()
            .args(["-f", "summary", "seq-stats", "--tokenizer", "char", "转发微博"])
            .assert()
            .success()
            .stdout(predicate::str::contains("1 texts, mean 4.00"));
    }

    #[test]
    fn empty_corpus_is_error() {
        let fx = Fixture::new();
        fx.cmd().arg("seq-stats").assert().code(10);
    }
}

mod config {
    use super::*;

    #[test]
    fn show_reports_file_and_hash() {
        let fx = Fixture::new();
        let output = fx.cmd().args(["config", "show"]).output().unwrap();
        assert_eq!(output.status.code(), Some(0));
        let json = stdout_json(&output);
        assert_eq!(json["source"]["source"], "CLI argument");
        assert_eq!(json["source"]["hash"].as_str().unwrap().len(), 64);
        assert_eq!(json["values"]["dataset"]["name"], "toy");
    }

    #[test]
    fn preset_is_default() {
        let home = TempDir::new().unwrap();
        let output = cs_core()
            .env("HOME", home.path())
            .env("XDG_CONFIG_HOME", home.path())
            .args(["config", "show"])
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(0));
        let json = stdout_json(&output);
        assert_eq!(json["source"]["preset"], "pheme");
        assert_eq!(json["values"]["dataset"]["edge_files"].as_array().unwrap().len(), 5);
    }

    #[test]
    fn presets_listed() {
        cs_core()
            .args(["-f", "md", "config", "presets"])
            .assert()
            .success()
            .stdout(predicate::str::contains("**pheme**"));
    }

    #[test]
    fn unknown_preset() {
        cs_core()
            .args(["--preset", "weibo", "config", "show"])
            .assert()
            .code(10)
            .stderr(predicate::str::contains("weibo"));
    }

    #[test]
    fn validate_reports_semantic_errors() {
        let fx = Fixture::new();
        let bad = fx.tmp.path().join("bad.toml");
        fs::write(&bad, fx.config_text().replace("[entropy]", "[entropy]\nalpha = -1.0")).unwrap();
        let output = cs_core()
            .args(["config", "validate"])
            .arg(&bad)
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(10));
        let json = stdout_json(&output);
        assert_eq!(json["valid"], false);
        assert!(json["error"].as_str().unwrap().contains("entropy.alpha"));
    }

    #[test]
    fn validate_good_file() {
        let fx = Fixture::new();
        cs_core()
            .args(["config", "validate"])
            .arg(fx.config_path())
            .assert()
            .success()
            .stdout(predicate::str::contains("\"valid\": true"));
    }

    #[test]
    fn validate_missing_file() {
        cs_core()
            .args(["config", "validate", "/nonexistent/cs.toml"])
            .assert()
            .code(10);
    }
}

#[test]
fn version_reports_schema() {
    let output = cs_core().arg("version").output().unwrap();
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["schema_version"], cs_common::SCHEMA_VERSION);
    assert_eq!(json["cs_core_version"], env!("CARGO_PKG_VERSION"));
}
