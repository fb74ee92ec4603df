//! Classification jobs
//!
//! A job reads one list, writes pattern buckets into its output directory
//! and, for status-tagged lists, a `by-status/` breakdown next to them.
//! Every path is passed in explicitly; nothing here looks at the process
//! working directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::{Config, SourceConfig};
use crate::error::{DomainPatternError, Result};
use crate::output::{clean_bucket_files, write_bucket};
use crate::pattern::{PatternClassifier, PatternSummary, SymbolAlphabet};
use crate::record::read_records;
use crate::status::{classify_by_status, write_status_report, StatusSummary, BY_STATUS_DIR};

/// One input list and where its buckets go
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifyJob {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub by_status: bool,
}

impl ClassifyJob {
    pub fn new(input: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_dir: output_dir.into(),
            by_status: false,
        }
    }

    pub fn with_status(mut self, by_status: bool) -> Self {
        self.by_status = by_status;
        self
    }

    pub fn status_dir(&self) -> PathBuf {
        self.output_dir.join(BY_STATUS_DIR)
    }
}

/// Options shared by every job in a run
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub alphabet: SymbolAlphabet,
    /// Remove stale bucket files before writing
    pub clean: bool,
}

/// Result of one job
#[derive(Debug, Clone, Serialize)]
pub struct JobReport {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub patterns: PatternSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statuses: Option<StatusSummary>,
}

/// Report of a status-only run
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub statuses: StatusSummary,
}

/// Run the pattern pass, then the status pass when the job asks for it
pub fn run_job(job: &ClassifyJob, options: &RunOptions) -> Result<JobReport> {
    ensure_input(&job.input)?;
    tracing::debug!(input = %job.input.display(), output = %job.output_dir.display(), "running job");

    let records = read_records(&job.input)?;

    fs::create_dir_all(&job.output_dir)?;
    if options.clean {
        clean_bucket_files(&job.output_dir, &[job.input.as_path()])?;
    }

    let classifier = PatternClassifier::new(options.alphabet);
    let buckets = classifier.classify(records.iter().map(|r| r.domain.as_str()));
    for (pattern, domains) in buckets.iter() {
        write_bucket(&job.output_dir, pattern, domains)?;
    }

    let statuses = if job.by_status {
        let status_dir = job.status_dir();
        if options.clean {
            clean_bucket_files(&status_dir, &[job.input.as_path()])?;
        }
        let status_buckets = classify_by_status(&records);
        write_status_report(&status_buckets, &status_dir)?;
        Some(status_buckets.summary())
    } else {
        None
    };

    Ok(JobReport {
        input: job.input.clone(),
        output_dir: job.output_dir.clone(),
        patterns: buckets.summary(),
        statuses,
    })
}

/// Status pass alone, writing into `<output_dir>/by-status`
pub fn run_status_only(job: &ClassifyJob, options: &RunOptions) -> Result<StatusReport> {
    ensure_input(&job.input)?;

    let records = read_records(&job.input)?;
    let status_dir = job.status_dir();
    if options.clean {
        clean_bucket_files(&status_dir, &[job.input.as_path()])?;
    }

    let buckets = classify_by_status(&records);
    write_status_report(&buckets, &status_dir)?;

    Ok(StatusReport {
        input: job.input.clone(),
        output_dir: status_dir,
        statuses: buckets.summary(),
    })
}

fn ensure_input(input: &Path) -> Result<()> {
    if !input.exists() {
        return Err(DomainPatternError::MissingInput {
            path: input.to_path_buf(),
        });
    }
    Ok(())
}

/// A configured source resolved against the base directory
#[derive(Debug, Clone)]
pub struct DiscoveredJob {
    pub source: SourceConfig,
    pub job: ClassifyJob,
    pub exists: bool,
}

/// Resolve every configured source under `base_dir`
pub fn discover_jobs(base_dir: &Path, config: &Config) -> Vec<DiscoveredJob> {
    let input_dir = base_dir.join(&config.discovery.input_dir);
    let output_dir = base_dir.join(&config.discovery.output_dir);

    config
        .discovery
        .sources
        .iter()
        .map(|source| {
            let job = ClassifyJob::new(input_dir.join(&source.file), output_dir.join(&source.subdir))
                .with_status(source.by_status);
            let exists = job.input.exists();
            DiscoveredJob {
                source: source.clone(),
                job,
                exists,
            }
        })
        .collect()
}

/// Progress notifications from [`run_discovered`]
#[derive(Debug)]
pub enum PipelineEvent<'a> {
    Started(&'a ClassifyJob),
    Skipped(&'a ClassifyJob),
    Finished(&'a JobReport),
}

/// Outcome of an auto-discovery run
#[derive(Debug, Clone, Default, Serialize)]
pub struct DiscoveryOutcome {
    pub reports: Vec<JobReport>,
    /// Inputs that did not exist
    pub skipped: Vec<PathBuf>,
}

/// Run every discovered job. Missing inputs are skipped; IO errors stop the run.
pub fn run_discovered<F>(
    base_dir: &Path,
    config: &Config,
    options: &RunOptions,
    mut on_event: F,
) -> Result<DiscoveryOutcome>
where
    F: FnMut(PipelineEvent<'_>),
{
    let mut outcome = DiscoveryOutcome::default();

    for discovered in discover_jobs(base_dir, config) {
        if !discovered.exists {
            tracing::warn!(input = %discovered.job.input.display(), "input missing, skipping");
            on_event(PipelineEvent::Skipped(&discovered.job));
            outcome.skipped.push(discovered.job.input);
            continue;
        }

        on_event(PipelineEvent::Started(&discovered.job));
        let report = run_job(&discovered.job, options)?;
        on_event(PipelineEvent::Finished(&report));
        outcome.reports.push(report);
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;
    use walkdir::WalkDir;

    const SCENARIO: &str = "alpha.com\nbeta.com ACTIVE reason\n  \n# comment\ngamma.net PENDING\n";

    fn snapshot(dir: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
        WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| {
                let rel = e.path().strip_prefix(dir).unwrap().to_path_buf();
                (rel, fs::read(e.path()).unwrap())
            })
            .collect()
    }

    fn write_input(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_end_to_end_scenario() {
        let temp = TempDir::new().unwrap();
        let input = write_input(temp.path(), "special.txt", SCENARIO);
        let out = temp.path().join("special");
        let job = ClassifyJob::new(&input, &out).with_status(true);

        let report = run_job(&job, &RunOptions::default()).unwrap();

        assert_eq!(report.patterns.total, 3);
        assert_eq!(
            report.patterns.patterns,
            vec![
                ("ABCCB".to_string(), 1),
                ("ABCD".to_string(), 1),
                ("ABCDA".to_string(), 1),
            ]
        );
        assert_eq!(fs::read_to_string(out.join("ABCDA.txt")).unwrap(), "alpha.com\n");
        assert_eq!(fs::read_to_string(out.join("ABCCB.txt")).unwrap(), "gamma.net\n");
        assert_eq!(fs::read_to_string(out.join("ABCD.txt")).unwrap(), "beta.com\n");

        let by_status = out.join(BY_STATUS_DIR);
        assert_eq!(fs::read_to_string(by_status.join("ACTIVE.txt")).unwrap(), "beta.com\n");
        assert_eq!(fs::read_to_string(by_status.join("PENDING.txt")).unwrap(), "gamma.net\n");
        assert_eq!(fs::read_to_string(by_status.join("UNKNOWN.txt")).unwrap(), "alpha.com\n");
        assert_eq!(
            fs::read_to_string(by_status.join("summary.txt")).unwrap(),
            "Total special domains: 3\nACTIVE: 1\nPENDING: 1\nUNKNOWN: 1\n"
        );
        assert_eq!(report.statuses.unwrap().total, 3);
    }

    #[test]
    fn test_pattern_only_job_has_no_status_dir() {
        let temp = TempDir::new().unwrap();
        let input = write_input(temp.path(), "list.txt", SCENARIO);
        let out = temp.path().join("out");

        let report = run_job(&ClassifyJob::new(&input, &out), &RunOptions::default()).unwrap();
        assert!(report.statuses.is_none());
        assert!(!out.join(BY_STATUS_DIR).exists());
    }

    #[test]
    fn test_runs_are_idempotent() {
        let temp = TempDir::new().unwrap();
        let input = write_input(
            temp.path(),
            "list.txt",
            "zulu.org HOLD\nnoon.com\ndeed.net hold\nabba.io REDEMPTION x y\nNoon.com\n",
        );
        let first = temp.path().join("first");
        let second = temp.path().join("second");

        run_job(
            &ClassifyJob::new(&input, &first).with_status(true),
            &RunOptions::default(),
        )
        .unwrap();
        run_job(
            &ClassifyJob::new(&input, &second).with_status(true),
            &RunOptions::default(),
        )
        .unwrap();

        let a = snapshot(&first);
        assert!(!a.is_empty());
        assert_eq!(a, snapshot(&second));
    }

    #[test]
    fn test_missing_input_is_error() {
        let temp = TempDir::new().unwrap();
        let job = ClassifyJob::new(temp.path().join("absent.txt"), temp.path().join("out"));

        let err = run_job(&job, &RunOptions::default()).unwrap_err();
        assert!(matches!(err, DomainPatternError::MissingInput { .. }));
        assert!(!temp.path().join("out").exists());
    }

    #[test]
    fn test_clean_removes_stale_buckets() {
        let temp = TempDir::new().unwrap();
        let input = write_input(temp.path(), "list.txt", "aa.com\n");
        let out = temp.path().join("out");
        fs::create_dir_all(&out).unwrap();
        fs::write(out.join("ABC.txt"), "stale.com\n").unwrap();

        let options = RunOptions {
            clean: true,
            ..RunOptions::default()
        };
        run_job(&ClassifyJob::new(&input, &out), &options).unwrap();

        assert!(!out.join("ABC.txt").exists());
        assert!(out.join("AA.txt").exists());
    }

    #[test]
    fn test_clean_spares_input_in_output_dir() {
        let temp = TempDir::new().unwrap();
        let lists = temp.path().join("lists");
        let input = write_input(&lists, "domains.txt", "a.com N/A\nbb.com\n");
        fs::write(lists.join("ABC.txt"), "stale.com\n").unwrap();

        let options = RunOptions {
            clean: true,
            ..RunOptions::default()
        };
        run_job(&ClassifyJob::new(&input, &lists), &options).unwrap();

        assert_eq!(fs::read_to_string(&input).unwrap(), "a.com N/A\nbb.com\n");
        assert!(!lists.join("ABC.txt").exists());
        assert!(lists.join("A.txt").exists());
        assert!(lists.join("AA.txt").exists());
    }

    #[test]
    fn test_status_clean_spares_input_in_status_dir() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("special");
        let input = write_input(&out.join(BY_STATUS_DIR), "raw.txt", SCENARIO);

        let options = RunOptions {
            clean: true,
            ..RunOptions::default()
        };
        run_status_only(&ClassifyJob::new(&input, &out), &options).unwrap();

        assert!(input.exists());
        assert!(out.join(BY_STATUS_DIR).join("ACTIVE.txt").exists());
    }

    #[test]
    fn test_bucket_write_failure_is_io_error() {
        let temp = TempDir::new().unwrap();
        let input = write_input(temp.path(), "list.txt", "aa.com\n");
        let out = temp.path().join("out");
        // a directory squatting on the bucket path makes the write fail
        fs::create_dir_all(out.join("AA.txt")).unwrap();

        let err = run_job(&ClassifyJob::new(&input, &out), &RunOptions::default()).unwrap_err();
        assert!(matches!(err, DomainPatternError::Io(_)));
    }

    #[test]
    fn test_unusual_status_does_not_abort_job() {
        let temp = TempDir::new().unwrap();
        let input = write_input(temp.path(), "special.txt", "example.com N/A\nother.com ..\n");
        let out = temp.path().join("special");

        let report = run_job(
            &ClassifyJob::new(&input, &out).with_status(true),
            &RunOptions::default(),
        )
        .unwrap();

        let statuses = report.statuses.unwrap();
        assert_eq!(statuses.total, 2);
        assert_eq!(
            statuses.statuses,
            vec![("..".to_string(), 1), ("N/A".to_string(), 1)]
        );
        let by_status = out.join(BY_STATUS_DIR);
        assert_eq!(fs::read_to_string(by_status.join("N%2FA.txt")).unwrap(), "example.com\n");
        assert_eq!(fs::read_to_string(by_status.join("%2E%2E.txt")).unwrap(), "other.com\n");
    }

    #[test]
    fn test_without_clean_stale_buckets_remain() {
        let temp = TempDir::new().unwrap();
        let input = write_input(temp.path(), "list.txt", "aa.com\n");
        let out = temp.path().join("out");
        fs::create_dir_all(&out).unwrap();
        fs::write(out.join("ABC.txt"), "stale.com\n").unwrap();

        run_job(&ClassifyJob::new(&input, &out), &RunOptions::default()).unwrap();
        assert!(out.join("ABC.txt").exists());
    }

    #[test]
    fn test_alphabet_option_is_applied() {
        let temp = TempDir::new().unwrap();
        let input = write_input(temp.path(), "list.txt", "abcdefghijklmnopqrstuvwxyz0.com\n");
        let out = temp.path().join("out");
        let options = RunOptions {
            alphabet: SymbolAlphabet::Alphanumeric,
            clean: false,
        };

        run_job(&ClassifyJob::new(&input, &out), &options).unwrap();
        assert!(out.join("ABCDEFGHIJKLMNOPQRSTUVWXYZa.txt").exists());
    }

    #[test]
    fn test_status_only() {
        let temp = TempDir::new().unwrap();
        let input = write_input(temp.path(), "special.txt", SCENARIO);
        let out = temp.path().join("special");

        let report = run_status_only(&ClassifyJob::new(&input, &out), &RunOptions::default())
            .unwrap();

        assert_eq!(report.output_dir, out.join(BY_STATUS_DIR));
        assert_eq!(report.statuses.total, 3);
        assert!(out.join(BY_STATUS_DIR).join("summary.txt").exists());
        assert!(!out.join("ABCDA.txt").exists());
    }

    #[test]
    fn test_discover_jobs() {
        let temp = TempDir::new().unwrap();
        let base = temp.path();
        write_input(
            base,
            "domain-scan-results-combined/registered_domains_all.txt",
            "a.com\n",
        );

        let jobs = discover_jobs(base, &Config::default());
        assert_eq!(jobs.len(), 3);
        assert!(jobs[0].exists);
        assert!(!jobs[1].exists);
        assert!(!jobs[2].exists);
        assert_eq!(jobs[0].job.output_dir, base.join("domain-check").join("registered"));
        assert!(jobs[2].job.by_status);
    }

    #[test]
    fn test_run_discovered_skips_missing() {
        let temp = TempDir::new().unwrap();
        let base = temp.path();
        write_input(
            base,
            "domain-scan-results-combined/special_status_domains_all.txt",
            SCENARIO,
        );

        let mut skipped_events = 0;
        let mut finished_events = 0;
        let outcome = run_discovered(base, &Config::default(), &RunOptions::default(), |event| {
            match event {
                PipelineEvent::Skipped(_) => skipped_events += 1,
                PipelineEvent::Finished(_) => finished_events += 1,
                PipelineEvent::Started(_) => {}
            }
        })
        .unwrap();

        assert_eq!(skipped_events, 2);
        assert_eq!(finished_events, 1);
        assert_eq!(outcome.skipped.len(), 2);
        assert_eq!(outcome.reports.len(), 1);

        let special = base.join("domain-check").join("special");
        assert!(special.join("ABCDA.txt").exists());
        assert!(special.join(BY_STATUS_DIR).join("summary.txt").exists());
        assert!(!base.join("domain-check").join("registered").exists());
    }

    #[test]
    fn test_run_discovered_stops_on_io_error() {
        let temp = TempDir::new().unwrap();
        let base = temp.path();
        write_input(
            base,
            "domain-scan-results-combined/registered_domains_all.txt",
            "a.com\n",
        );
        write_input(
            base,
            "domain-scan-results-combined/special_status_domains_all.txt",
            SCENARIO,
        );
        // a regular file where the first job's output directory should go
        write_input(base, "domain-check/registered", "not a directory\n");

        let mut started = 0;
        let mut finished = 0;
        let result = run_discovered(base, &Config::default(), &RunOptions::default(), |event| {
            match event {
                PipelineEvent::Started(_) => started += 1,
                PipelineEvent::Finished(_) => finished += 1,
                PipelineEvent::Skipped(_) => {}
            }
        });

        assert!(matches!(result, Err(DomainPatternError::Io(_))));
        assert_eq!(started, 1);
        assert_eq!(finished, 0);
        assert!(!base.join("domain-check").join("special").exists());
    }
}
