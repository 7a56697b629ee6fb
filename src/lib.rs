// Library root
// -----------
// The binary (`main.rs`) wires these modules into the interactive ban tool.
//
// Module responsibilities:
// - `api`: HTTP calls to the platform's method endpoint, response envelope
//   parsing and error classification.
// - `config`: the pointer file and the JSON data document (token,
//   communities, ban reasons and durations).
// - `workflow`: the step-by-step ban flow driven by operator answers.
// - `ui`: prompts, menus and the parsing of menu answers.
// - `unban`: ban durations and unban date arithmetic.
// - `retry`: backoff policy for rate-limited calls.
// - `setup`: first-run creation of the pointer file and data document.
// - `cli`: command-line arguments.
// - `error`: error types shared by all of the above.
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod retry;
pub mod setup;
pub mod ui;
pub mod unban;
pub mod workflow;
