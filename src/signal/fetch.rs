use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use crate::signal::{SampleMatrix, SignalPayload, ViewerError};
/// Anything that can turn an analysis-record id into signal data.
///
/// Called from a worker thread, never from the frame loop.
pub trait SignalFetcher: Send + Sync {
    fn fetch(&self, record_id: &str) -> Result<SignalPayload, ViewerError>;
}
/// Fetches `GET {base}/analysis/records/{id}/signal_data/` from the analysis backend.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
    base_url: String,
}
impl HttpFetcher {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ViewerError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
    pub fn signal_url(&self, record_id: &str) -> String {
        format!("{}/analysis/records/{}/signal_data/", self.base_url, record_id)
    }
}
impl SignalFetcher for HttpFetcher {
    fn fetch(&self, record_id: &str) -> Result<SignalPayload, ViewerError> {
        let url = self.signal_url(record_id);
        log::debug!("GET {url}");
        let payload = self
            .client
            .get(&url)
            .send()?
            .error_for_status()?
            .json::<SignalPayload>()?;
        Ok(payload)
    }
}
/// Shared flag saying whether the owner of a fetch still wants its result.
#[derive(Clone, Debug)]
pub struct LivenessToken(Arc<AtomicBool>);
impl LivenessToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }
    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
    pub fn revoke(&self) {
        self.0.store(false, Ordering::Release);
    }
}
impl Default for LivenessToken {
    fn default() -> Self {
        Self::new()
    }
}
/// One-shot background fetch. The worker thread runs independently of the
/// frame loop; the owner polls for the result between frames.
pub struct FetchTask {
    record_id: String,
    token: LivenessToken,
    rx: Receiver<Result<SampleMatrix, ViewerError>>,
}
impl FetchTask {
    pub fn spawn(fetcher: Arc<dyn SignalFetcher>, record_id: impl Into<String>) -> Self {
        let record_id = record_id.into();
        let (tx, rx) = channel();
        let token = LivenessToken::new();
        let worker_token = token.clone();
        let worker_id = record_id.clone();
        log::info!("fetching signal data for record {record_id}");
        thread::spawn(move || {
            let result = fetcher
                .fetch(&worker_id)
                .and_then(SampleMatrix::from_payload);
            if worker_token.is_alive() {
                tx.send(result).ok();
            } else {
                log::debug!("record {worker_id}: owner gone, dropping fetch result");
            }
        });
        Self {
            record_id,
            token,
            rx,
        }
    }
    pub fn record_id(&self) -> &str {
        &self.record_id
    }
    pub fn token(&self) -> &LivenessToken {
        &self.token
    }
    /// Non-blocking check for the result. Always `None` once cancelled.
    pub fn poll(&self) -> Option<Result<SampleMatrix, ViewerError>> {
        if !self.token.is_alive() {
            return None;
        }
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(ViewerError::FetchAborted)),
        }
    }
    /// Blocks up to `timeout` for the result. For headless hosts and tests only.
    pub fn wait(&self, timeout: Duration) -> Option<Result<SampleMatrix, ViewerError>> {
        if !self.token.is_alive() {
            return None;
        }
        match self.rx.recv_timeout(timeout) {
            Ok(result) if self.token.is_alive() => Some(result),
            Ok(_) => None,
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(Err(ViewerError::FetchAborted)),
        }
    }
    pub fn cancel(&self) {
        self.token.revoke();
    }
}
impl Drop for FetchTask {
    fn drop(&mut self) {
        self.token.revoke();
    }
}
