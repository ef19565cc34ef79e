//! Walk a PHEME-style thread tree and score every cascade.
//!
//! Layout:
//!
//! ```text
//! <root>/<event><suffix>/<class>/<news_id>/source-tweet/<news_id>.json
//! <root>/<event><suffix>/<class>/<news_id>/reactions/*.json
//! ```
//!
//! A cascade that cannot be read fails alone; the walk records it and moves on.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::TimeDelta;
use cs_common::{BatchResult, CascadeId, EntropyRecord, Error, Result};
use cs_config::analysis::EntropyConfig;
use serde::Serialize;

use super::tweet::{read_tweet_time, read_tweet_times};
use super::writer::write_entropy_records;
use crate::log_event;
use crate::logging::{event_names, LogContext, Stage};
use crate::temporal::{estimate_entropy_with, EntropyOptions};

/// One cascade directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cascade {
    pub id: CascadeId,
    pub dir: PathBuf,
}

impl Cascade {
    pub fn new(id: CascadeId, dir: impl Into<PathBuf>) -> Self {
        Self {
            id,
            dir: dir.into(),
        }
    }

    /// `<dir>/<source_dir>/<id>.json`
    pub fn source_path(&self, cfg: &EntropyConfig) -> PathBuf {
        self.dir
            .join(&cfg.source_dir)
            .join(format!("{}.json", self.id))
    }

    pub fn reactions_dir(&self, cfg: &EntropyConfig) -> PathBuf {
        self.dir.join(&cfg.reactions_dir)
    }
}

/// Result of scoring one cascade.
#[derive(Debug, Clone, PartialEq)]
pub enum CascadeOutcome {
    Scored(EntropyRecord),
    /// Source tweet has no `created_at`.
    NoSourceTime,
    /// No reaction carries a timestamp.
    NoReactions,
}

/// Score one cascade.
pub fn analyze_cascade(
    cascade: &Cascade,
    cfg: &EntropyConfig,
    options: &EntropyOptions,
) -> Result<CascadeOutcome> {
    let source = cascade.source_path(cfg);
    if !source.is_file() {
        return Err(Error::MissingSourceTweet { path: source });
    }
    let Some(start) = read_tweet_time(&source, &cfg.timestamp_format)? else {
        return Ok(CascadeOutcome::NoSourceTime);
    };

    let reactions_dir = cascade.reactions_dir(cfg);
    if !reactions_dir.is_dir() {
        return Ok(CascadeOutcome::NoReactions);
    }
    let reactions = read_tweet_times(&reactions_dir, &cfg.timestamp_format)?;
    let Some(last) = reactions.iter().max().copied() else {
        return Ok(CascadeOutcome::NoReactions);
    };

    let end = last
        .checked_add_signed(end_padding(cfg)?)
        .ok_or_else(|| padding_out_of_range(cfg))?;
    let entropy = estimate_entropy_with(&reactions, start, end, options)?;
    Ok(CascadeOutcome::Scored(EntropyRecord::new(
        cascade.id.clone(),
        entropy,
    )))
}

fn end_padding(cfg: &EntropyConfig) -> Result<TimeDelta> {
    i64::try_from(cfg.end_padding_secs)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .ok_or_else(|| padding_out_of_range(cfg))
}

fn padding_out_of_range(cfg: &EntropyConfig) -> Error {
    Error::InvalidConfig {
        field: "entropy.end_padding_secs".to_string(),
        message: format!("{} seconds is out of range", cfg.end_padding_secs),
    }
}

/// Event folders under `root` whose names end with `suffix`, sorted.
pub fn list_event_folders(root: &Path, suffix: &str) -> Result<Vec<String>> {
    if !root.is_dir() {
        return Err(Error::DatasetNotFound {
            path: root.to_path_buf(),
        });
    }
    let mut events = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if name.ends_with(suffix) {
                events.push(name.to_string());
            }
        }
    }
    events.sort();
    Ok(events)
}

/// Cascade directories of a class directory, sorted by id.
pub fn list_cascades(class_dir: &Path, ignore: &[String]) -> Result<Vec<Cascade>> {
    let mut cascades = Vec::new();
    for entry in fs::read_dir(class_dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if ignore.iter().any(|i| i == name) || !entry.file_type()?.is_dir() {
            continue;
        }
        if let Some(id) = CascadeId::parse(name) {
            cascades.push(Cascade::new(id, entry.path()));
        }
    }
    cascades.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(cascades)
}

/// Counts for one written `(event, class)` file.
#[derive(Debug, Clone, Serialize)]
pub struct ClassReport {
    pub event: String,
    pub class: String,
    pub path: PathBuf,
    pub records: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Outcome of a full dataset walk.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub root: PathBuf,
    pub output_dir: PathBuf,
    pub events: Vec<String>,
    pub files: Vec<ClassReport>,
    /// Classes listed in the config but absent on disk, as `event/class`.
    pub missing_classes: Vec<String>,
    /// Scored cascades and per-cascade failures.
    pub batch: BatchResult<CascadeId>,
    pub skipped: usize,
}

impl AnalysisReport {
    pub fn records(&self) -> usize {
        self.files.iter().map(|f| f.records).sum()
    }

    pub fn has_failures(&self) -> bool {
        !self.batch.failed.is_empty()
    }
}

/// Score every cascade under `root` and write one file per `(event, class)`.
///
/// Parameter errors abort before any file is touched. Per-cascade errors are
/// logged, recorded in [`AnalysisReport::batch`] and do not stop the walk.
pub fn analyze_dataset(
    root: &Path,
    output_dir: &Path,
    cfg: &EntropyConfig,
    ctx: &LogContext,
) -> Result<AnalysisReport> {
    let options = EntropyOptions::from(cfg);
    options.validate()?;
    end_padding(cfg)?;

    let events = list_event_folders(root, &cfg.event_suffix)?;
    let mut report = AnalysisReport {
        root: root.to_path_buf(),
        output_dir: output_dir.to_path_buf(),
        events: events.clone(),
        files: Vec::new(),
        missing_classes: Vec::new(),
        batch: BatchResult::default(),
        skipped: 0,
    };

    for event in &events {
        log_event!(ctx, INFO, event_names::SCAN_EVENT, Stage::Scan, "scanning event folder",
            event = %event);

        for class in &cfg.classes {
            let class_dir = root.join(event).join(class);
            if !class_dir.is_dir() {
                log_event!(ctx, WARN, event_names::SCAN_CLASS_MISSING, Stage::Scan,
                    "class directory missing",
                    path = %class_dir.display());
                report.missing_classes.push(format!("{}/{}", event, class));
                continue;
            }

            let file = analyze_class(
                &class_dir,
                output_dir,
                event,
                class,
                cfg,
                &options,
                ctx,
                &mut report.batch,
            )?;
            report.skipped += file.skipped;
            report.files.push(file);
        }
    }

    Ok(report)
}

#[allow(clippy::too_many_arguments)]
fn analyze_class(
    class_dir: &Path,
    output_dir: &Path,
    event: &str,
    class: &str,
    cfg: &EntropyConfig,
    options: &EntropyOptions,
    ctx: &LogContext,
    batch: &mut BatchResult<CascadeId>,
) -> Result<ClassReport> {
    let mut records = Vec::new();
    let mut skipped = 0;
    let mut failed = 0;

    for cascade in list_cascades(class_dir, &cfg.ignore)? {
        match analyze_cascade(&cascade, cfg, options) {
            Ok(CascadeOutcome::Scored(record)) => {
                log_event!(ctx, DEBUG, event_names::CASCADE_ANALYZED, Stage::Analyze,
                    "cascade scored",
                    cascade_id = %cascade.id, entropy = record.entropy);
                batch.add_success(cascade.id.clone());
                records.push(record);
            }
            Ok(outcome) => {
                log_event!(ctx, DEBUG, event_names::CASCADE_SKIPPED, Stage::Analyze,
                    "cascade skipped",
                    cascade_id = %cascade.id, reason = ?outcome);
                skipped += 1;
            }
            Err(err) => {
                log_event!(ctx, WARN, event_names::CASCADE_FAILED, Stage::Analyze,
                    "cascade failed",
                    cascade_id = %cascade.id, error_code = err.code(), error = %err);
                batch.add_failure(cascade.id.to_string(), &err);
                failed += 1;
            }
        }
    }

    let path = write_entropy_records(output_dir, event, class, &records)?;
    log_event!(ctx, INFO, event_names::RECORDS_WRITTEN, Stage::Write, "entropy records written",
        path = %path.display(), records = records.len() as u64, skipped = skipped as u64,
        failed = failed as u64);

    Ok(ClassReport {
        event: event.to_string(),
        class: class.to_string(),
        path,
        records: records.len(),
        skipped,
        failed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SRC: &str = "Wed Jan 07 11:00:00 +0000 2015";

    fn tweet(at: &str) -> String {
        format!(r#"{{"id": 1, "created_at": "{}"}}"#, at)
    }

    fn make_cascade(class_dir: &Path, id: &str, source: Option<&str>, reactions: &[&str]) {
        let dir = class_dir.join(id);
        fs::create_dir_all(dir.join("source-tweet")).unwrap();
        if let Some(at) = source {
            fs::write(dir.join("source-tweet").join(format!("{}.json", id)), tweet(at)).unwrap();
        }
        fs::create_dir_all(dir.join("reactions")).unwrap();
        for (i, at) in reactions.iter().enumerate() {
            fs::write(dir.join("reactions").join(format!("r{}.json", i)), tweet(at)).unwrap();
        }
    }

    #[test]
    fn scores_a_cascade() {
        let tmp = TempDir::new().unwrap();
        make_cascade(
            tmp.path(),
            "100",
            Some(SRC),
            &[
                "Wed Jan 07 11:30:00 +0000 2015",
                "Wed Jan 07 12:00:00 +0000 2015",
                "Wed Jan 07 18:30:00 +0000 2015",
            ],
        );
        let cfg = EntropyConfig::default();
        let cascade = Cascade::new(CascadeId("100".into()), tmp.path().join("100"));
        let outcome = analyze_cascade(&cascade, &cfg, &EntropyOptions::from(&cfg)).unwrap();
        let CascadeOutcome::Scored(record) = outcome else {
            panic!("expected a score, got {:?}", outcome);
        };
        // Buckets 0 and 1 hold 2 and 1 reactions.
        assert!((record.entropy - 0.9709505944546686).abs() < 1e-12);
    }

    #[test]
    fn missing_source_is_an_error() {
        let tmp = TempDir::new().unwrap();
        make_cascade(tmp.path(), "100", None, &[SRC]);
        let cfg = EntropyConfig::default();
        let cascade = Cascade::new(CascadeId("100".into()), tmp.path().join("100"));
        let err = analyze_cascade(&cascade, &cfg, &EntropyOptions::from(&cfg)).unwrap_err();
        assert!(matches!(err, Error::MissingSourceTweet { .. }));
    }

    #[test]
    fn no_reactions_is_skipped() {
        let tmp = TempDir::new().unwrap();
        make_cascade(tmp.path(), "100", Some(SRC), &[]);
        let cfg = EntropyConfig::default();
        let cascade = Cascade::new(CascadeId("100".into()), tmp.path().join("100"));
        let outcome = analyze_cascade(&cascade, &cfg, &EntropyOptions::from(&cfg)).unwrap();
        assert_eq!(outcome, CascadeOutcome::NoReactions);
    }

    #[test]
    fn oversized_padding_fails_the_cascade() {
        let tmp = TempDir::new().unwrap();
        make_cascade(tmp.path(), "100", Some(SRC), &["Wed Jan 07 11:30:00 +0000 2015"]);
        let cfg = EntropyConfig {
            end_padding_secs: 9_000_000_000_000,
            ..EntropyConfig::default()
        };
        let cascade = Cascade::new(CascadeId("100".into()), tmp.path().join("100"));
        let err = analyze_cascade(&cascade, &cfg, &EntropyOptions::from(&cfg)).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidConfig { ref field, .. } if field == "entropy.end_padding_secs"
        ));
    }

    #[test]
    fn listing_ignores_litter_and_files() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("200")).unwrap();
        fs::create_dir_all(tmp.path().join("100")).unwrap();
        fs::create_dir_all(tmp.path().join(".hidden")).unwrap();
        fs::write(tmp.path().join(".DS_Store"), "x").unwrap();
        fs::write(tmp.path().join("notes.txt"), "x").unwrap();

        let ids: Vec<String> = list_cascades(tmp.path(), &[".DS_Store".to_string()])
            .unwrap()
            .into_iter()
            .map(|c| c.id.0)
            .collect();
        assert_eq!(ids, vec!["100", "200"]);
    }

    #[test]
    fn missing_root_is_dataset_error() {
        let err = list_event_folders(Path::new("/nonexistent/PHEME"), "-all-rnr-threads")
            .unwrap_err();
        assert_eq!(err.code(), 20);
    }

    #[test]
    fn walk_skips_and_continues() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("PHEME");
        let rumours = root.join("ottawashooting-all-rnr-threads").join("rumours");
        make_cascade(&rumours, "1", Some(SRC), &["Wed Jan 07 11:30:00 +0000 2015"]);
        make_cascade(&rumours, "2", None, &[SRC]);
        make_cascade(&rumours, "3", Some(SRC), &[]);
        fs::create_dir_all(root.join("not-an-event")).unwrap();

        let out = tmp.path().join("entropy");
        let ctx = LogContext::new("cs-test", "pheme");
        let report = analyze_dataset(&root, &out, &EntropyConfig::default(), &ctx).unwrap();

        assert_eq!(report.events, vec!["ottawashooting-all-rnr-threads"]);
        assert_eq!(report.files.len(), 1);
        assert_eq!(report.missing_classes, vec!["ottawashooting-all-rnr-threads/non-rumours"]);
        assert_eq!(report.records(), 1);
        assert_eq!(report.skipped, 1);
        assert!(report.has_failures());
        assert_eq!(report.batch.failed[0].item_id, "2");
        assert!(out
            .join("ottawashooting-all-rnr-threads")
            .join("rumours_entropy.json")
            .is_file());
    }

    #[test]
    fn invalid_alpha_aborts_before_walk() {
        let tmp = TempDir::new().unwrap();
        let cfg = EntropyConfig {
            alpha: 0.0,
            ..EntropyConfig::default()
        };
        let ctx = LogContext::new("cs-test", "pheme");
        let err = analyze_dataset(tmp.path(), &tmp.path().join("out"), &cfg, &ctx).unwrap_err();
        assert_eq!(err.code(), 33);
    }
}
