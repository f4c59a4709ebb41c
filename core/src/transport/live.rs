use std::io;

use ureq::{Agent, RequestBuilder};

use super::Transport;
use crate::config::{ClientConfig, DEFAULT_MAX_BODY_SIZE};
use crate::error::TransportError;
use crate::http::{Headers, HttpMethod, HttpRequest, HttpResponse};

/// Blocking network transport backed by a `ureq::Agent`.
///
/// The agent is configured with `http_status_as_error(false)` so 4xx/5xx
/// responses come back as data for the fetch service to interpret.
/// Bodies larger than the configured limit fail with `InvalidRequest`, so a
/// retry policy never downloads them twice.
#[derive(Clone)]
pub struct LiveTransport {
    agent: Agent,
    max_body_size: u64,
}

impl LiveTransport {
    pub fn new(config: &ClientConfig) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(config.timeout()))
            .build()
            .new_agent();
        Self {
            agent,
            max_body_size: config.max_body_size(),
        }
    }

    /// Wrap a caller-built agent. It must have `http_status_as_error(false)`
    /// for error statuses to reach the fetch service as responses.
    pub fn from_agent(agent: Agent) -> Self {
        Self {
            agent,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }
}

impl Transport for LiveTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = request.url();
        let result = match (request.method(), request.body()) {
            (HttpMethod::Get, _) => prepare(self.agent.get(url), request).call(),
            (HttpMethod::Delete, _) => prepare(self.agent.delete(url), request).call(),
            (HttpMethod::Post, Some(body)) => {
                prepare(self.agent.post(url), request).send(body.as_bytes())
            }
            (HttpMethod::Post, None) => prepare(self.agent.post(url), request).send_empty(),
            (HttpMethod::Put, Some(body)) => {
                prepare(self.agent.put(url), request).send(body.as_bytes())
            }
            (HttpMethod::Put, None) => prepare(self.agent.put(url), request).send_empty(),
        };
        let mut response = result.map_err(map_error)?;

        let status = response.status().as_u16();
        let headers: Headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response
            .body_mut()
            .with_config()
            .limit(self.max_body_size)
            .read_to_vec()
            .map_err(map_error)?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Apply the request's headers and per-call timeout.
fn prepare<B>(mut builder: RequestBuilder<B>, request: &HttpRequest) -> RequestBuilder<B> {
    for (name, value) in request.headers().iter() {
        builder = builder.header(name, value);
    }
    if let Some(timeout) = request.timeout() {
        builder = builder.config().timeout_global(Some(timeout)).build();
    }
    builder
}

fn map_error(err: ureq::Error) -> TransportError {
    match &err {
        ureq::Error::Timeout(_) => TransportError::Timeout,
        ureq::Error::Io(io_err) if io_err.kind() == io::ErrorKind::TimedOut => {
            TransportError::Timeout
        }
        ureq::Error::BadUri(_) | ureq::Error::Http(_) | ureq::Error::BodyExceedsLimit(_) => {
            TransportError::InvalidRequest(err.to_string())
        }
        _ => TransportError::ConnectionFailed(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn timeout_errors_map_to_timeout() {
        let err = ureq::Error::Io(io::Error::new(io::ErrorKind::TimedOut, "slow"));
        assert_eq!(map_error(err), TransportError::Timeout);
    }

    #[test]
    fn bad_uri_maps_to_invalid_request() {
        let err = ureq::Error::BadUri("::".to_string());
        assert!(matches!(map_error(err), TransportError::InvalidRequest(_)));
    }

    #[test]
    fn oversized_body_maps_to_invalid_request() {
        let err = ureq::Error::BodyExceedsLimit(1024);
        assert!(matches!(map_error(err), TransportError::InvalidRequest(_)));
    }

    #[test]
    fn refused_connection_maps_to_connection_failed() {
        let err = ureq::Error::Io(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"));
        assert!(matches!(map_error(err), TransportError::ConnectionFailed(_)));
    }

    #[test]
    fn unreachable_port_fails_without_response() {
        // Port 9 (discard) on loopback is almost never listening.
        let config = ClientConfig::new("http://127.0.0.1:9/")
            .unwrap()
            .with_timeout(Duration::from_secs(2));
        let transport = LiveTransport::new(&config);
        let request = HttpRequest::builder(HttpMethod::Get, config.base_url())
            .path("categories.php")
            .build()
            .unwrap();
        let err = transport.execute(&request).unwrap_err();
        assert!(matches!(
            err,
            TransportError::ConnectionFailed(_) | TransportError::Timeout
        ));
    }
}
