pub mod config;
pub mod error;
pub mod output;
pub mod pattern;
pub mod pipeline;
pub mod record;
pub mod status;

pub use config::{Config, DiscoveryConfig, PatternConfig, SourceConfig};
pub use error::{DomainPatternError, Result};
pub use output::{bucket_file_name, clean_bucket_files, write_bucket};
pub use pattern::{
    derive_pattern, label_of, PatternBuckets, PatternClassifier, PatternSummary, SymbolAlphabet,
};
pub use pipeline::{
    discover_jobs, run_discovered, run_job, run_status_only, ClassifyJob, DiscoveredJob,
    DiscoveryOutcome, JobReport, PipelineEvent, RunOptions, StatusReport,
};
pub use record::{parse_line, parse_lines, read_records, Record};

// Status classification
pub use status::{
    classify_by_status, status_key, write_status_report, StatusBuckets, StatusSummary,
    BY_STATUS_DIR, SUMMARY_FILE, UNKNOWN_STATUS,
};
