//! PHEME-style dataset access: tweet timestamps, the cascade walk and
//! entropy record files.

pub mod cascade;
pub mod tweet;
pub mod writer;

pub use cascade::{
    analyze_cascade, analyze_dataset, list_cascades, list_event_folders, AnalysisReport, Cascade,
    CascadeOutcome, ClassReport,
};
pub use tweet::{parse_tweet_time, read_tweet_time, read_tweet_times};
pub use writer::{entropy_file_path, read_entropy_records, write_entropy_records};
