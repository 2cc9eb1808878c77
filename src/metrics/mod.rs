//! Error counts sent to the CI metrics beacon as statsd-style counter lines.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::config::MetricsTarget;

pub const METRIC_PREFIX: &str = "ci_a11y";
pub const COUNTER_SUFFIX: &str = "c";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Result of a beacon call that reached the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricOutcome {
    Logged,
    Rejected(u16),
}

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("beacon request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("metrics reporting unavailable: {0}")]
    Unavailable(String),
}

/// Destination for per-test error counts.
pub trait MetricsSink: Send + Sync {
    fn emit(
        &self,
        namespace: &str,
        name: &str,
        count: usize,
    ) -> Result<MetricOutcome, MetricsError>;
}

impl<T: MetricsSink + ?Sized> MetricsSink for Arc<T> {
    fn emit(
        &self,
        namespace: &str,
        name: &str,
        count: usize,
    ) -> Result<MetricOutcome, MetricsError> {
        (**self).emit(namespace, name, count)
    }
}

/// Stands in for a sink that could not be set up, so every counter is
/// reported as a failure instead of the run being aborted.
#[derive(Debug, Clone)]
pub struct UnavailableSink {
    reason: String,
}

impl UnavailableSink {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl MetricsSink for UnavailableSink {
    fn emit(
        &self,
        _namespace: &str,
        _name: &str,
        _count: usize,
    ) -> Result<MetricOutcome, MetricsError> {
        Err(MetricsError::Unavailable(self.reason.clone()))
    }
}

/// Build the beacon URL for one counter.
///
/// `http://x/` + `Skin` + `default` + `3` gives `http://x/ci_a11y.Skin.default=3c`.
pub fn metric_url(beacon_url: &str, namespace: &str, name: &str, count: usize) -> String {
    format!("{beacon_url}{METRIC_PREFIX}.{namespace}.{name}={count}{COUNTER_SUFFIX}")
}

/// Sends counters to the beacon with one GET request each.
pub struct BeaconReporter {
    client: reqwest::blocking::Client,
    beacon_url: String,
}

impl BeaconReporter {
    pub fn new(beacon_url: impl Into<String>) -> Result<Self, MetricsError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(MetricsError::Client)?;
        Ok(Self {
            client,
            beacon_url: beacon_url.into(),
        })
    }

    pub fn for_target(target: &MetricsTarget) -> Result<Self, MetricsError> {
        Self::new(target.beacon_url.clone())
    }
}

impl MetricsSink for BeaconReporter {
    fn emit(
        &self,
        namespace: &str,
        name: &str,
        count: usize,
    ) -> Result<MetricOutcome, MetricsError> {
        let url = metric_url(&self.beacon_url, namespace, name, count);
        tracing::debug!(%url, "sending metric");

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| MetricsError::Transport {
                url: url.clone(),
                source: Box::new(e),
            })?;

        let status = response.status();
        if status.is_success() {
            Ok(MetricOutcome::Logged)
        } else {
            Ok(MetricOutcome::Rejected(status.as_u16()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;

    /// Serve exactly one request with the given status line, reporting the
    /// request target back over the channel.
    fn one_shot_server(status: &'static str) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            loop {
                let mut header = String::new();
                if reader.read_line(&mut header).unwrap() == 0 || header == "\r\n" {
                    break;
                }
            }
            let target = request_line
                .split_whitespace()
                .nth(1)
                .unwrap_or_default()
                .to_string();
            let _ = tx.send(target);
            let mut stream = stream;
            let _ = write!(
                stream,
                "HTTP/1.1 {status}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
            );
        });
        (format!("http://{addr}/"), rx)
    }

    #[test]
    fn metric_url_is_exact() {
        assert_eq!(
            metric_url("http://x/", "Skin", "default", 3),
            "http://x/ci_a11y.Skin.default=3c"
        );
    }

    #[test]
    fn metric_url_does_not_insert_separators() {
        assert_eq!(
            metric_url("http://beacon/statsv?", "Vector", "search", 0),
            "http://beacon/statsv?ci_a11y.Vector.search=0c"
        );
    }

    #[test]
    fn success_status_is_logged() {
        let (base, rx) = one_shot_server("204 No Content");
        let reporter = BeaconReporter::new(base).unwrap();
        let outcome = reporter.emit("Skin", "default", 3).unwrap();
        assert_eq!(outcome, MetricOutcome::Logged);
        assert_eq!(rx.recv().unwrap(), "/ci_a11y.Skin.default=3c");
    }

    #[test]
    fn error_status_is_rejected_not_err() {
        let (base, _rx) = one_shot_server("500 Internal Server Error");
        let reporter = BeaconReporter::new(base).unwrap();
        let outcome = reporter.emit("Skin", "default", 1).unwrap();
        assert_eq!(outcome, MetricOutcome::Rejected(500));
    }

    #[test]
    fn unreachable_beacon_is_transport_error() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let reporter = BeaconReporter::new(format!("http://127.0.0.1:{port}/")).unwrap();
        let err = reporter.emit("Skin", "default", 1).unwrap_err();
        assert!(matches!(err, MetricsError::Transport { .. }));
        assert!(err.to_string().contains("ci_a11y.Skin.default=1c"));
    }

    #[test]
    fn unavailable_sink_fails_every_counter() {
        let sink = UnavailableSink::new("no TLS backend");
        let err = sink.emit("Skin", "default", 2).unwrap_err();
        assert!(matches!(err, MetricsError::Unavailable(_)));
        assert_eq!(err.to_string(), "metrics reporting unavailable: no TLS backend");
    }
}
