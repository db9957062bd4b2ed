//! Asynchronous expansion boundary.
//!
//! Callers on the async side send an [`ExpandRequest`] through an
//! [`ExpandHandle`] and always get exactly one [`ExpandResponse`] back, even if
//! the worker fails or the service is gone; the fallback answer is the request
//! URL itself. Resolutions run on the blocking pool, one task per request.
//! A requester that stops waiting cancels its resolution.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::control::CancelToken;
use crate::probe::RedirectProbe;
use crate::resolver::RedirectResolver;

/// Pending requests buffered before senders wait.
const QUEUE_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpandRequest {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpandResponse {
    pub final_url: String,
}

impl ExpandResponse {
    fn unchanged(req_url: String) -> Self {
        Self { final_url: req_url }
    }
}

struct Envelope {
    request: ExpandRequest,
    cancel: CancelToken,
    reply: oneshot::Sender<ExpandResponse>,
}

/// Cloneable sender side of the expansion service.
#[derive(Debug, Clone)]
pub struct ExpandHandle {
    tx: mpsc::Sender<Envelope>,
}

impl std::fmt::Debug for Envelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Envelope")
            .field("request", &self.request)
            .finish_non_exhaustive()
    }
}

impl ExpandHandle {
    pub async fn expand(&self, request: ExpandRequest) -> ExpandResponse {
        self.expand_with_cancel(request, CancelToken::new()).await
    }

    /// Expands with a caller-owned token; cancelling it stops further hops
    /// and yields the request URL.
    pub async fn expand_with_cancel(
        &self,
        request: ExpandRequest,
        cancel: CancelToken,
    ) -> ExpandResponse {
        let fallback = request.url.clone();
        let (reply, answer) = oneshot::channel();
        let envelope = Envelope {
            request,
            cancel,
            reply,
        };
        if self.tx.send(envelope).await.is_err() {
            tracing::warn!(url = %fallback, "expansion service stopped; returning URL unchanged");
            return ExpandResponse::unchanged(fallback);
        }
        answer
            .await
            .unwrap_or_else(|_| ExpandResponse::unchanged(fallback))
    }
}

/// Background service that owns a resolver and answers expansion requests.
pub struct ExpandService;

impl ExpandService {
    /// Spawns the service on the current tokio runtime. The service ends when
    /// every handle has been dropped.
    pub fn spawn<P>(resolver: RedirectResolver<P>) -> (ExpandHandle, JoinHandle<()>)
    where
        P: RedirectProbe + 'static,
    {
        let (tx, mut rx) = mpsc::channel::<Envelope>(QUEUE_DEPTH);
        let resolver = Arc::new(resolver);
        let task = tokio::spawn(async move {
            while let Some(envelope) = rx.recv().await {
                tokio::spawn(serve(Arc::clone(&resolver), envelope));
            }
            tracing::debug!("expansion service drained");
        });
        (ExpandHandle { tx }, task)
    }
}

async fn serve<P>(resolver: Arc<RedirectResolver<P>>, envelope: Envelope)
where
    P: RedirectProbe + 'static,
{
    let Envelope {
        request,
        cancel,
        mut reply,
    } = envelope;

    let mut worker = tokio::task::spawn_blocking({
        let cancel = cancel.clone();
        let url = request.url.clone();
        move || resolver.resolve(&url, &cancel)
    });

    let joined = tokio::select! {
        joined = &mut worker => Some(joined),
        _ = reply.closed() => None,
    };

    match joined {
        Some(Ok(final_url)) => {
            let _ = reply.send(ExpandResponse { final_url });
        }
        Some(Err(e)) => {
            tracing::warn!(url = %request.url, "expansion worker failed: {}", e);
            let _ = reply.send(ExpandResponse::unchanged(request.url));
        }
        None => {
            tracing::debug!(url = %request.url, "requester went away; cancelling resolution");
            cancel.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::scripted::ScriptedProbe;
    use crate::probe::{ProbeError, ProbeMethod, ProbeOutcome};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;
    use url::Url;

    fn req(url: &str) -> ExpandRequest {
        ExpandRequest {
            url: url.to_string(),
        }
    }

    #[tokio::test]
    async fn expands_through_service() {
        let probe = ScriptedProbe::new()
            .redirect("https://bit.ly/abc", 301, "https://example.com/article");
        let (handle, _task) = ExpandService::spawn(RedirectResolver::new(probe));
        let resp = handle.expand(req("https://bit.ly/abc")).await;
        assert_eq!(resp.final_url, "https://example.com/article");
    }

    #[tokio::test]
    async fn failure_still_answers_with_request_url() {
        let probe = ScriptedProbe::new().fail("https://bit.ly/down");
        let (handle, _task) = ExpandService::spawn(RedirectResolver::new(probe));
        let resp = handle.expand(req("https://bit.ly/down")).await;
        assert_eq!(resp.final_url, "https://bit.ly/down");
    }

    #[tokio::test]
    async fn concurrent_requests_each_get_their_answer() {
        let probe = ScriptedProbe::new()
            .redirect("https://bit.ly/a", 301, "https://a.example/")
            .redirect("https://bit.ly/b", 302, "https://b.example/");
        let (handle, _task) = ExpandService::spawn(RedirectResolver::new(probe));
        let (a, b) = tokio::join!(
            handle.expand(req("https://bit.ly/a")),
            handle.expand(req("https://bit.ly/b"))
        );
        assert_eq!(a.final_url, "https://a.example/");
        assert_eq!(b.final_url, "https://b.example/");
    }

    #[tokio::test]
    async fn stopped_service_answers_unchanged() {
        let (handle, task) = ExpandService::spawn(RedirectResolver::new(ScriptedProbe::new()));
        task.abort();
        let _ = task.await;
        let resp = handle.expand(req("https://t.co/x")).await;
        assert_eq!(resp.final_url, "https://t.co/x");
    }

    #[tokio::test]
    async fn pre_cancelled_request_returns_start() {
        let probe = ScriptedProbe::new().redirect("https://t.co/x", 301, "https://dest.example/");
        let (handle, _task) = ExpandService::spawn(RedirectResolver::new(probe));
        let token = CancelToken::new();
        token.cancel();
        let resp = handle.expand_with_cancel(req("https://t.co/x"), token).await;
        assert_eq!(resp.final_url, "https://t.co/x");
    }

    /// Probe that blocks until cancelled and records that it noticed.
    struct StallingProbe {
        saw_cancel: Arc<AtomicBool>,
    }

    impl RedirectProbe for StallingProbe {
        fn probe(
            &self,
            _url: &Url,
            _method: ProbeMethod,
            cancel: &CancelToken,
        ) -> Result<ProbeOutcome, ProbeError> {
            for _ in 0..500 {
                if cancel.is_cancelled() {
                    self.saw_cancel.store(true, Ordering::SeqCst);
                    return Err(ProbeError::from(crate::control::ResolutionAborted));
                }
                std::thread::sleep(Duration::from_millis(10));
            }
            Ok(ProbeOutcome::Response {
                status: 200,
                location: None,
            })
        }
    }

    #[tokio::test]
    async fn abandoned_request_cancels_resolution() {
        let saw_cancel = Arc::new(AtomicBool::new(false));
        let probe = StallingProbe {
            saw_cancel: Arc::clone(&saw_cancel),
        };
        let (handle, _task) = ExpandService::spawn(RedirectResolver::new(probe));

        let abandoned =
            tokio::time::timeout(Duration::from_millis(50), handle.expand(req("https://bit.ly/slow")))
                .await;
        assert!(abandoned.is_err(), "request should still be pending");

        for _ in 0..200 {
            if saw_cancel.load(Ordering::SeqCst) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(saw_cancel.load(Ordering::SeqCst));
    }

    #[test]
    fn wire_format() {
        let resp = ExpandResponse {
            final_url: "https://example.com/".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&resp).unwrap(),
            r#"{"finalUrl":"https://example.com/"}"#
        );
        let parsed: ExpandRequest = serde_json::from_str(r#"{"url":"https://bit.ly/x"}"#).unwrap();
        assert_eq!(parsed.url, "https://bit.ly/x");
    }
}
