use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::Transport;
use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// A recorded outcome for one request.
pub type Reply = Result<HttpResponse, TransportError>;

/// Offline transport that replays recorded replies.
///
/// Replies are keyed by method and full URL (query included). Each key holds
/// a queue: replies are handed out in order and the last one repeats, so a
/// single recording serves any number of calls. A request with no recording
/// fails with `ConnectionFailed`. Every executed request is logged.
#[derive(Debug, Default)]
pub struct MockTransport {
    replies: Mutex<HashMap<(HttpMethod, String), VecDeque<Reply>>>,
    calls: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply for `method url`.
    pub fn push(&self, method: HttpMethod, url: impl Into<String>, reply: Reply) {
        lock(&self.replies)
            .entry((method, url.into()))
            .or_default()
            .push_back(reply);
    }

    /// Builder form of `push` for a successful `GET`.
    pub fn with_response(self, url: impl Into<String>, response: HttpResponse) -> Self {
        self.push(HttpMethod::Get, url, Ok(response));
        self
    }

    /// Builder form of `push` for a failed `GET`.
    pub fn with_error(self, url: impl Into<String>, error: TransportError) -> Self {
        self.push(HttpMethod::Get, url, Err(error));
        self
    }

    /// Requests executed so far, oldest first.
    pub fn calls(&self) -> Vec<HttpRequest> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }
}

impl Transport for MockTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        lock(&self.calls).push(request.clone());

        let key = (request.method(), request.url().to_string());
        let mut replies = lock(&self.replies);
        let Some(queue) = replies.get_mut(&key) else {
            return Err(TransportError::ConnectionFailed(format!(
                "no recorded reply for {} {}",
                key.0, key.1
            )));
        };
        let reply = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        reply.unwrap_or_else(|| {
            Err(TransportError::ConnectionFailed(format!(
                "no recorded reply for {} {}",
                key.0, key.1
            )))
        })
    }
}

// A panicking test thread must not hide the recordings from the others.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
