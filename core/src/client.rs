//! Fetch service for TheMealDB.
//!
//! # Design
//! `MealDbClient` holds its transport, configuration and an optional retry
//! policy, and carries no mutable state between calls. Each operation is
//! split the same way:
//!
//! - `build_*` produces an `HttpRequest`
//! - `parse_*` consumes an `HttpResponse` and decodes the domain value
//! - `fetch_*` runs build, transport and parse in sequence
//!
//! The build/parse halves never touch the network, so callers that do their
//! own I/O can use them directly. Failures from either stage surface as
//! `FetchError` with the stage error inside, unchanged.

use std::thread;

use crate::config::ClientConfig;
use crate::decode::{self, CodingPath, Decode, KeyedContainer};
use crate::error::{DecodeError, FetchError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, RequestBuilder};
use crate::retry::RetryPolicy;
use crate::transport::Transport;
use crate::types::{Category, Meal, MealSummary};

const CATEGORIES_KEY: &str = "categories";
const MEALS_KEY: &str = "meals";

pub struct MealDbClient<T> {
    transport: T,
    config: ClientConfig,
    retry: Option<RetryPolicy>,
}

impl<T: Transport> MealDbClient<T> {
    pub fn new(transport: T, config: ClientConfig) -> Self {
        Self {
            transport,
            config,
            retry: None,
        }
    }

    /// Retry transport failures according to `policy`.
    pub fn with_retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = Some(policy);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // -----------------------------------------------------------------------
    // Build
    // -----------------------------------------------------------------------

    /// Start a GET request against the configured base URL with the
    /// client's default headers and timeout.
    pub fn request(&self, path: &str) -> RequestBuilder {
        HttpRequest::builder(HttpMethod::Get, self.config.base_url())
            .path(path)
            .header("User-Agent", self.config.user_agent())
            .header("Accept", "application/json")
            .headers(self.config.headers())
            .timeout(self.config.timeout())
    }

    pub fn build_categories(&self) -> Result<HttpRequest, FetchError> {
        Ok(self.request("categories.php").build()?)
    }

    pub fn build_list(&self, category: &str) -> Result<HttpRequest, FetchError> {
        Ok(self.request("filter.php").query("c", category).build()?)
    }

    pub fn build_detail(&self, id: &str) -> Result<HttpRequest, FetchError> {
        Ok(self.request("lookup.php").query("i", id).build()?)
    }

    pub fn build_search(&self, name: &str) -> Result<HttpRequest, FetchError> {
        Ok(self.request("search.php").query("s", name).build()?)
    }

    pub fn build_random(&self) -> Result<HttpRequest, FetchError> {
        Ok(self.request("random.php").build()?)
    }

    // -----------------------------------------------------------------------
    // Parse
    // -----------------------------------------------------------------------

    pub fn parse_categories(&self, response: HttpResponse) -> Result<Vec<Category>, FetchError> {
        check_status(&response)?;
        Ok(parse_envelope(&response.body, CATEGORIES_KEY)?)
    }

    pub fn parse_list(&self, response: HttpResponse) -> Result<Vec<MealSummary>, FetchError> {
        check_status(&response)?;
        Ok(parse_envelope(&response.body, MEALS_KEY)?)
    }

    /// An unknown id comes back as `{"meals": null}` and yields `None`.
    pub fn parse_detail(&self, response: HttpResponse) -> Result<Option<Meal>, FetchError> {
        check_status(&response)?;
        let meals: Vec<Meal> = parse_envelope(&response.body, MEALS_KEY)?;
        Ok(meals.into_iter().next())
    }

    pub fn parse_search(&self, response: HttpResponse) -> Result<Vec<Meal>, FetchError> {
        check_status(&response)?;
        Ok(parse_envelope(&response.body, MEALS_KEY)?)
    }

    pub fn parse_random(&self, response: HttpResponse) -> Result<Meal, FetchError> {
        check_status(&response)?;
        let meals: Vec<Meal> = parse_envelope(&response.body, MEALS_KEY)?;
        meals.into_iter().next().ok_or_else(|| {
            DecodeError::MalformedPayload("random meal response contained no meals".to_string())
                .into()
        })
    }

    // -----------------------------------------------------------------------
    // Fetch
    // -----------------------------------------------------------------------

    pub fn fetch_categories(&self) -> Result<Vec<Category>, FetchError> {
        let request = self.build_categories()?;
        self.parse_categories(self.send(&request)?)
    }

    pub fn fetch_list(&self, category: &str) -> Result<Vec<MealSummary>, FetchError> {
        let request = self.build_list(category)?;
        self.parse_list(self.send(&request)?)
    }

    pub fn fetch_detail(&self, id: &str) -> Result<Option<Meal>, FetchError> {
        let request = self.build_detail(id)?;
        self.parse_detail(self.send(&request)?)
    }

    pub fn search(&self, name: &str) -> Result<Vec<Meal>, FetchError> {
        let request = self.build_search(name)?;
        self.parse_search(self.send(&request)?)
    }

    pub fn fetch_random(&self) -> Result<Meal, FetchError> {
        let request = self.build_random()?;
        self.parse_random(self.send(&request)?)
    }

    /// Send any request and decode its whole body as `R`.
    pub fn fetch<R: Decode>(&self, request: &HttpRequest) -> Result<R, FetchError> {
        let response = self.send(request)?;
        check_status(&response)?;
        decode::decode_slice(&response.body).map_err(|err| {
            tracing::warn!(url = request.url(), decode_target = %R::target(), error = %err, "decode failed");
            FetchError::from(err)
        })
    }

    /// Execute `request`, applying the retry policy if one is set.
    pub fn send(&self, request: &HttpRequest) -> Result<HttpResponse, FetchError> {
        let mut retries = 0;
        loop {
            tracing::debug!(method = %request.method(), url = request.url(), "dispatching request");
            match self.transport.execute(request) {
                Ok(response) => {
                    tracing::debug!(
                        status = response.status,
                        bytes = response.body.len(),
                        "received response"
                    );
                    return Ok(response);
                }
                Err(err) => match &self.retry {
                    Some(policy) if policy.should_retry(&err, retries) => {
                        retries += 1;
                        let delay = policy.delay(retries);
                        tracing::warn!(error = %err, retry = retries, ?delay, "transport failed, retrying");
                        thread::sleep(delay);
                    }
                    _ => return Err(err.into()),
                },
            }
        }
    }
}

/// Map non-success status codes to `FetchError::Http`.
fn check_status(response: &HttpResponse) -> Result<(), FetchError> {
    if response.is_success() {
        return Ok(());
    }
    tracing::warn!(status = response.status, "unexpected status");
    Err(FetchError::http(response.status, &response.body_text()))
}

/// Decode the list under `key` in a TheMealDB envelope. A `null` list, which
/// the API uses for "no results", is empty.
fn parse_envelope<R: Decode>(body: &[u8], key: &str) -> Result<Vec<R>, DecodeError> {
    let value = decode::parse(body)?;
    let envelope = KeyedContainer::new(&value, &CodingPath::root())?;
    Ok(envelope.optional::<Vec<R>>(key)?.unwrap_or_default())
}
