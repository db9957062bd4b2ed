//! In-memory probe with canned answers, for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use url::Url;

use super::{ProbeError, ProbeMethod, ProbeOutcome, RedirectProbe};
use crate::control::CancelToken;

enum Step {
    Answer(ProbeOutcome),
    Fail,
}

/// Unscripted URLs answer `200` to both verbs.
#[derive(Default)]
pub(crate) struct ScriptedProbe {
    routes: HashMap<(String, ProbeMethod), Step>,
    calls: Mutex<Vec<(String, ProbeMethod)>>,
    cancel_on_call: Option<(usize, CancelToken)>,
}

impl ScriptedProbe {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// HEAD on `from` answers `status` with `Location: to`.
    pub(crate) fn redirect(self, from: &str, status: u32, to: &str) -> Self {
        self.answer(
            from,
            ProbeMethod::Head,
            ProbeOutcome::Response {
                status,
                location: Some(to.to_string()),
            },
        )
    }

    pub(crate) fn answer(mut self, url: &str, method: ProbeMethod, outcome: ProbeOutcome) -> Self {
        self.routes
            .insert((url.to_string(), method), Step::Answer(outcome));
        self
    }

    /// Both verbs on `url` fail with a connection error.
    pub(crate) fn fail(mut self, url: &str) -> Self {
        self.routes
            .insert((url.to_string(), ProbeMethod::Head), Step::Fail);
        self.routes
            .insert((url.to_string(), ProbeMethod::Get), Step::Fail);
        self
    }

    /// Cancels `token` while answering the `n`th request (1-based).
    pub(crate) fn cancel_on_call(mut self, n: usize, token: CancelToken) -> Self {
        self.cancel_on_call = Some((n, token));
        self
    }

    pub(crate) fn calls(&self) -> Vec<(String, ProbeMethod)> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl RedirectProbe for ScriptedProbe {
    fn probe(
        &self,
        url: &Url,
        method: ProbeMethod,
        cancel: &CancelToken,
    ) -> Result<ProbeOutcome, ProbeError> {
        cancel.check()?;
        let n = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((url.to_string(), method));
            calls.len()
        };
        if let Some((at, token)) = &self.cancel_on_call {
            if *at == n {
                token.cancel();
            }
        }
        match self.routes.get(&(url.to_string(), method)) {
            Some(Step::Answer(outcome)) => Ok(outcome.clone()),
            Some(Step::Fail) => Err(ProbeError::Connection {
                url: url.to_string(),
                message: "connection refused".to_string(),
            }),
            None => Ok(ProbeOutcome::Response {
                status: 200,
                location: None,
            }),
        }
    }
}
