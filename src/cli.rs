//! Command-line arguments.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::api::DEFAULT_API_BASE;
use crate::retry::RetryPolicy;

/// Ban a user from one of your communities, step by step.
#[derive(Parser, Debug)]
#[command(name = "vkban-cli", author, version)]
#[command(long_about = r#"
Walks you through banning a user from a community you moderate:

1. Paste the profile URL of the user
2. Pick the community, the reason and the duration from your data file
3. The ban is issued with the computed unban date

The data file (data.json) lives in the directory written in the pointer
file. Both are created on first run.

Example:
  vkban-cli
  vkban-cli --pointer-file ~/.vkban/path.txt -v
"#)]
pub struct Cli {
    /// File holding the directory prefix of data.json
    #[arg(long, env = "VKBAN_POINTER_FILE", default_value = "path.txt")]
    pub pointer_file: PathBuf,

    /// Base URL of the platform's method endpoint
    #[arg(long, env = "VKBAN_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Calls made per request before giving up on rate limiting
    #[arg(long, default_value_t = 10)]
    pub max_attempts: u32,

    /// First delay between rate-limited calls, in milliseconds
    #[arg(long, default_value_t = 350)]
    pub retry_delay_ms: u64,

    /// Verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::default()
            .with_initial_delay(Duration::from_millis(self.retry_delay_ms))
            .with_max_attempts(self.max_attempts)
    }
}
