//! In-memory transport that replays scripted responses and records every
//! request it receives. Used by the unit and integration tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::io;
use std::sync::Mutex;

use super::transport::{HttpRequest, HttpResponse, HttpTransport};
use crate::errors::{AppError, AppResult};

enum Scripted {
    Reply(HttpResponse),
    Fail(String),
}

#[derive(Default)]
pub struct RecordingTransport {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for the next unanswered request.
    pub fn reply(self, status: u16, body: &str) -> Self {
        self.push(Scripted::Reply(HttpResponse::new(status, body)));
        self
    }

    /// Queue a connection-level failure for the next unanswered request.
    pub fn fail(self, message: &str) -> Self {
        self.push(Scripted::Fail(message.to_string()));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        match self.requests.lock() {
            Ok(requests) => requests.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests().len()
    }

    /// Requests whose URL ends with `suffix`.
    pub fn requests_to(&self, suffix: &str) -> Vec<HttpRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.url.ends_with(suffix))
            .collect()
    }

    fn push(&self, scripted: Scripted) {
        match self.script.lock() {
            Ok(mut script) => script.push_back(scripted),
            Err(poisoned) => poisoned.into_inner().push_back(scripted),
        }
    }
}

#[async_trait]
impl HttpTransport for RecordingTransport {
    async fn post(&self, request: HttpRequest) -> AppResult<HttpResponse> {
        let url = request.url.clone();
        match self.requests.lock() {
            Ok(mut requests) => requests.push(request),
            Err(poisoned) => poisoned.into_inner().push(request),
        }

        let next = match self.script.lock() {
            Ok(mut script) => script.pop_front(),
            Err(poisoned) => poisoned.into_inner().pop_front(),
        };

        match next {
            Some(Scripted::Reply(response)) => Ok(response),
            Some(Scripted::Fail(message)) => Err(AppError::Io(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                message,
            ))),
            None => Err(AppError::Config(format!("No scripted response for {}", url))),
        }
    }
}
