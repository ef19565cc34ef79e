//! Fuzz target for tweet `created_at` parsing.
//!
//! Also feeds parsed times through the estimator so extreme dates exercise
//! the bucket arithmetic.

#![no_main]

use cs_config::analysis::TWITTER_TIME_FORMAT;
use cs_core::dataset::parse_tweet_time;
use cs_core::temporal::{estimate_entropy, DEFAULT_ALPHA};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (&str, &str)| {
    let (a, b) = data;
    let (Ok(a), Ok(b)) = (
        parse_tweet_time(a, TWITTER_TIME_FORMAT),
        parse_tweet_time(b, TWITTER_TIME_FORMAT),
    ) else {
        return;
    };
    let (start, end) = if a <= b { (a, b) } else { (b, a) };
    let _ = estimate_entropy(&[start, end], start, end, chrono::TimeDelta::hours(6), DEFAULT_ALPHA);
});
