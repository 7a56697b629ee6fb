// Ban workflow: the ordered prompts that turn a profile URL into a
// `groups.ban` call.
//
//   URL -> identity -> community -> reason -> duration -> ban
//
// Every menu can be left with `00` (clean cancel). Any error ends the run.

use backoff::backoff::Backoff;
use chrono::{DateTime, Local};
use serde::Deserialize;
use serde_json::value::RawValue;
use tracing::{info, warn};

use crate::api::{ApiClient, ErrorKind, Params, Transport};
use crate::config::{ConfigDocument, ConfigStore};
use crate::error::{ApiError, WorkflowError};
use crate::retry::RetryPolicy;
use crate::ui::{profile_handle, select, Prompter, Selection};
use crate::unban::{unban_date, BanDuration};

pub const USERS_GET: &str = "users.get";
pub const GROUPS_BAN: &str = "groups.ban";

/// One entry of a `users.get` response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub is_closed: bool,
    #[serde(default)]
    pub can_access_closed: bool,
}

impl User {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Everything `groups.ban` needs, assembled step by step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BanRequest {
    pub owner_id: i64,
    pub group_id: String,
    pub comment: String,
    /// Unix seconds, or empty for a permanent ban.
    pub end_date: String,
}

impl BanRequest {
    pub fn params(&self) -> Params {
        let mut params = Params::new();
        params.insert("group_id".into(), self.group_id.clone());
        params.insert("owner_id".into(), self.owner_id.to_string());
        params.insert("end_date".into(), self.end_date.clone());
        params.insert("comment".into(), self.comment.clone());
        params
    }
}

/// How a run ended when nothing went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Banned { display_name: String },
    Cancelled,
}

type Clock = Box<dyn Fn() -> DateTime<Local>>;

pub struct BanWorkflow<'a, T, P> {
    client: ApiClient<T>,
    store: &'a ConfigStore,
    document: ConfigDocument,
    prompter: P,
    retry: RetryPolicy,
    clock: Clock,
}

impl<'a, T: Transport, P: Prompter> BanWorkflow<'a, T, P> {
    /// `document` is the configuration loaded from `store`; the store is
    /// only written to when the operator replaces the access token.
    pub fn new(
        client: ApiClient<T>,
        store: &'a ConfigStore,
        document: ConfigDocument,
        prompter: P,
    ) -> Self {
        BanWorkflow {
            client,
            store,
            document,
            prompter,
            retry: RetryPolicy::default(),
            clock: Box::new(Local::now),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Local> + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Current configuration, including a token entered during the run.
    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    pub fn run(&mut self) -> Result<Outcome, WorkflowError> {
        let url = self.prompter.ask("> [URL to user's profile]")?;
        self.prompter.say("> Gotcha URL to user.");

        let user = self.resolve_identity(&url)?;
        info!(id = user.id, "resolved {url}");
        self.prompter.say("> Gotcha ID of user.");

        let catalog = self.document.catalog();

        let names: Vec<&str> = catalog.groups.iter().map(|g| g.name.as_str()).collect();
        let Selection::Index(g) = select(&mut self.prompter, "Groups names", &names)? else {
            return Ok(self.cancel());
        };
        let group = &catalog.groups[g];
        self.prompter.say("> Gotcha ID of group.");

        let labels: Vec<String> = catalog
            .reasons
            .iter()
            .map(|r| match &r.duration {
                Some(d) => format!("{} ({})", r.text, d.title),
                None => r.text.clone(),
            })
            .collect();
        let Selection::Index(r) = select(&mut self.prompter, "Reasons", &labels)? else {
            return Ok(self.cancel());
        };
        let reason = &catalog.reasons[r];
        self.prompter.say("> Gotcha reason title of ban.");

        let duration: &BanDuration = match &reason.duration {
            Some(duration) => duration,
            None => {
                let titles: Vec<&str> =
                    catalog.durations.iter().map(|d| d.title.as_str()).collect();
                let Selection::Index(d) = select(&mut self.prompter, "Durations", &titles)? else {
                    return Ok(self.cancel());
                };
                &catalog.durations[d]
            }
        };
        let end_date = unban_date(duration.term, &(self.clock)());
        self.prompter.say("> Gotcha unban date.");

        let request = BanRequest {
            owner_id: user.id,
            group_id: group.id.clone(),
            comment: reason.text.clone(),
            end_date,
        };
        self.ban(&request)?;

        let display_name = user.display_name();
        info!(group = %request.group_id, "banned {display_name}");
        self.prompter
            .say(&format!("> {display_name} is banned. Check this!"));
        Ok(Outcome::Banned { display_name })
    }

    fn cancel(&mut self) -> Outcome {
        self.prompter.say("> Quit...");
        Outcome::Cancelled
    }

    /// Look up the numeric id behind a profile URL. A rejected token is
    /// replaced by the operator once, then the lookup is repeated.
    pub fn resolve_identity(&mut self, url: &str) -> Result<User, WorkflowError> {
        let handle = profile_handle(url);
        if handle.is_empty() {
            return Err(WorkflowError::EmptyHandle(url.to_string()));
        }
        let mut params = Params::new();
        params.insert("user_ids".into(), handle.to_string());

        let mut refreshed = false;
        let raw = loop {
            match self.call(USERS_GET, &params) {
                Err(e) if !refreshed && is_credential(&e) => {
                    warn!("access token rejected: {e}");
                    self.refresh_credential()?;
                    refreshed = true;
                }
                other => break other?,
            }
        };

        let users: Vec<User> = serde_json::from_str(raw.get()).map_err(ApiError::from)?;
        users
            .into_iter()
            .next()
            .ok_or_else(|| WorkflowError::UserNotFound(handle.to_string()))
    }

    /// Issue the ban. Only rate limiting is retried.
    pub fn ban(&mut self, request: &BanRequest) -> Result<(), WorkflowError> {
        self.call(GROUPS_BAN, &request.params())?;
        Ok(())
    }

    fn refresh_credential(&mut self) -> Result<(), WorkflowError> {
        let token = self.prompter.ask("> [New access token]")?;
        let document = self.document.with_access_token(token);
        self.store.save(&document)?;
        self.document = document;
        info!("access token replaced");
        Ok(())
    }

    /// Call `method`, retrying rate-limit errors with the same parameters
    /// until the retry policy runs out of attempts.
    fn call(&self, method: &str, params: &Params) -> Result<Box<RawValue>, WorkflowError> {
        let mut backoff = self.retry.backoff();
        let mut attempt = 1;
        loop {
            match self.client.invoke(method, params, &self.document.access_token) {
                Err(ApiError::Platform(e)) if e.kind() == ErrorKind::RateLimited => {
                    if attempt >= self.retry.max_attempts {
                        return Err(WorkflowError::RetriesExhausted {
                            method: method.to_string(),
                            attempts: attempt,
                        });
                    }
                    let delay = backoff.next_backoff().unwrap_or(self.retry.max_delay);
                    warn!(method, attempt, ?delay, "rate limited, retrying");
                    if !delay.is_zero() {
                        std::thread::sleep(delay);
                    }
                    attempt += 1;
                }
                other => return Ok(other?),
            }
        }
    }
}

fn is_credential(error: &WorkflowError) -> bool {
    error
        .platform()
        .is_some_and(|e| e.kind() == ErrorKind::Credential)
}
