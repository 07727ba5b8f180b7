//! Blocking HTTP client with bounded exponential backoff, per-request
//! timeout, gzip, and cooperative cancellation between attempts.

use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use expertise_core::config::ServicesConfig;
use expertise_core::errors::{ExpertiseError, ExpertiseResult, ServiceError};
use expertise_core::CancelToken;

/// Slice length used when sleeping between attempts, so cancellation is noticed promptly.
const SLEEP_SLICE: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &ServicesConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            initial_backoff: Duration::from_millis(config.initial_backoff_ms),
            max_backoff: Duration::from_millis(config.max_backoff_ms),
        }
    }

    /// Total number of attempts, the first one included.
    pub fn attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Delay before each retry: doubles from the initial backoff, capped.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        std::iter::successors(Some(self.initial_backoff), move |prev| {
            Some((*prev * 2).min(self.max_backoff))
        })
        .take(self.max_retries as usize)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&ServicesConfig::default())
    }
}

/// Outcome of one failed attempt.
#[derive(Debug)]
pub enum AttemptError {
    /// Worth retrying: connection failure, 5xx.
    Transient(String),
    /// Worth retrying, but reported as a timeout if it is the last failure.
    TimedOut,
    /// Not retried: 4xx, undecodable body.
    Fatal(ExpertiseError),
}

/// Run `attempt` until it succeeds, fails fatally, or the policy is exhausted.
pub fn run_with_retry<T, F>(
    policy: &RetryPolicy,
    service: &str,
    timeout: Duration,
    cancel: &CancelToken,
    mut attempt: F,
) -> ExpertiseResult<T>
where
    F: FnMut(u32) -> Result<T, AttemptError>,
{
    let mut delays = policy.delays();
    let mut last_error = String::new();
    let mut last_timed_out = false;

    for attempt_no in 0..policy.attempts() {
        if attempt_no > 0 {
            let delay = delays.next().unwrap_or(policy.max_backoff);
            debug!(
                service,
                attempt = attempt_no,
                max_retries = policy.max_retries,
                ?delay,
                "retrying"
            );
            sleep_cancellable(delay, cancel, service)?;
        }
        cancel.check(service)?;

        match attempt(attempt_no) {
            Ok(value) => return Ok(value),
            Err(AttemptError::Fatal(e)) => return Err(e),
            Err(AttemptError::Transient(reason)) => {
                warn!(service, attempt = attempt_no, error = %reason, "request failed");
                last_error = reason;
                last_timed_out = false;
            }
            Err(AttemptError::TimedOut) => {
                warn!(service, attempt = attempt_no, "request timed out");
                last_error = "timed out".to_string();
                last_timed_out = true;
            }
        }
    }

    if last_timed_out {
        return Err(ServiceError::Timeout {
            service: service.to_string(),
            timeout_ms: timeout.as_millis() as u64,
        }
        .into());
    }
    Err(ServiceError::RetriesExhausted {
        service: service.to_string(),
        attempts: policy.attempts(),
        last_error,
    }
    .into())
}

fn sleep_cancellable(delay: Duration, cancel: &CancelToken, service: &str) -> ExpertiseResult<()> {
    let deadline = Instant::now() + delay;
    loop {
        cancel.check(service)?;
        let now = Instant::now();
        if now >= deadline {
            return Ok(());
        }
        std::thread::sleep((deadline - now).min(SLEEP_SLICE));
    }
}

/// Shared blocking client for one external service.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::blocking::Client,
    base_url: String,
    timeout: Duration,
    policy: RetryPolicy,
}

impl HttpClient {
    pub fn new(config: &ServicesConfig) -> ExpertiseResult<Self> {
        let timeout = Duration::from_millis(config.timeout_ms);
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .gzip(true)
            .build()
            .map_err(|e| ServiceError::Unavailable {
                service: config.endpoint.clone(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            client,
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            timeout,
            policy: RetryPolicy::from_config(config),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// GET `{base_url}{path}` with query parameters and decode a JSON body.
    pub fn get_json<T: DeserializeOwned>(
        &self,
        service: &str,
        path: &str,
        query: &[(&str, String)],
        cancel: &CancelToken,
    ) -> ExpertiseResult<T> {
        let url = format!("{}{}", self.base_url, path);
        run_with_retry(&self.policy, service, self.timeout, cancel, |_| {
            let response = self.client.get(&url).query(query).send();
            decode(service, response)
        })
    }

    /// POST a form to `{base_url}{path}` and decode a JSON body.
    pub fn post_form_json<T: DeserializeOwned>(
        &self,
        service: &str,
        path: &str,
        form: &[(&str, String)],
        cancel: &CancelToken,
    ) -> ExpertiseResult<T> {
        let url = format!("{}{}", self.base_url, path);
        run_with_retry(&self.policy, service, self.timeout, cancel, |_| {
            let response = self.client.post(&url).form(form).send();
            decode(service, response)
        })
    }
}

fn decode<T: DeserializeOwned>(
    service: &str,
    response: reqwest::Result<reqwest::blocking::Response>,
) -> Result<T, AttemptError> {
    let response = match response {
        Ok(response) => response,
        Err(e) if e.is_timeout() => return Err(AttemptError::TimedOut),
        Err(e) => return Err(AttemptError::Transient(e.to_string())),
    };
    let status = response.status();
    if status.is_success() {
        return response.json::<T>().map_err(|e| {
            AttemptError::Fatal(
                ServiceError::InvalidResponse {
                    service: service.to_string(),
                    reason: e.to_string(),
                }
                .into(),
            )
        });
    }
    if status.is_client_error() {
        let body = response.text().unwrap_or_default();
        return Err(AttemptError::Fatal(
            ServiceError::Unavailable {
                service: service.to_string(),
                reason: format!("HTTP {status}: {body}"),
            }
            .into(),
        ));
    }
    Err(AttemptError::Transient(format!("HTTP {status}")))
}
