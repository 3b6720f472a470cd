//! Collection pass orchestration

use crate::error::CollectorResult;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{watch, Mutex};
use tracing::{error, info};
use wamon_metrics::ExporterMetrics;

/// A source of measurements collected once per pass
#[async_trait]
pub trait Collect: Send + Sync + 'static {
    /// Short name used in logs and error accounting
    fn name(&self) -> &'static str;

    /// Run one collection
    ///
    /// Expected failures are handled inside the collector at the
    /// measurement boundary; an `Err` here means the collector itself
    /// gave up unexpectedly.
    async fn collect(&self) -> CollectorResult<()>;
}

/// Runs one collection pass per scrape, coalescing overlapping scrapes
///
/// The WhatsApp probe and the store batch run as two spawned tasks and
/// are both joined regardless of outcome, so one collector's failure or
/// panic is captured as data instead of cancelling its sibling.
pub struct CollectionRunner {
    collectors: Vec<Arc<dyn Collect>>,
    metrics: Arc<ExporterMetrics>,
    gate: Mutex<()>,
    pass_seq: watch::Sender<u64>,
}

impl CollectionRunner {
    pub fn new(collectors: Vec<Arc<dyn Collect>>, metrics: Arc<ExporterMetrics>) -> Self {
        let (pass_seq, _) = watch::channel(0);
        Self {
            collectors,
            metrics,
            gate: Mutex::new(()),
            pass_seq,
        }
    }

    /// Run a full collection pass, or await the pass already in flight
    ///
    /// A scrape arriving while a pass is running does not start a second
    /// pass; it waits for the running one to publish completion and then
    /// renders whatever the registry holds.
    pub async fn run_pass(&self) {
        let mut completed = self.pass_seq.subscribe();
        match self.gate.try_lock() {
            Ok(guard) => {
                self.collect_all().await;
                // Release the gate before publishing: any scrape that
                // failed try_lock subscribed while the guard was still
                // held, so the send below lands after its subscription.
                drop(guard);
                self.pass_seq.send_modify(|seq| *seq += 1);
            }
            Err(_) => {
                let _ = completed.changed().await;
            }
        }
    }

    async fn collect_all(&self) {
        let started = Instant::now();

        let handles: Vec<_> = self
            .collectors
            .iter()
            .map(|collector| {
                let collector = collector.clone();
                let name = collector.name();
                (name, tokio::spawn(async move { collector.collect().await }))
            })
            .collect();

        for (name, handle) in handles {
            match handle.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    self.metrics.scrape.record_error("general_error");
                    error!(collector = name, error = %e, "Collector failed");
                }
                Err(e) => {
                    self.metrics.scrape.record_error("general_error");
                    error!(collector = name, error = %e, "Collector task aborted");
                }
            }
        }

        let duration = started.elapsed().as_secs_f64();
        self.metrics
            .scrape
            .last_scrape_timestamp
            .set(Utc::now().timestamp() as f64);
        self.metrics.scrape.scrape_duration_seconds.observe(duration);
        info!(duration_secs = duration, "Metrics collection completed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CollectorError;
    use prometheus::Registry;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct StubCollector {
        name: &'static str,
        fail: bool,
        panic: bool,
        delay: Duration,
        calls: Arc<AtomicUsize>,
    }

    impl StubCollector {
        fn new(name: &'static str) -> (Arc<Self>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Arc::new(Self {
                    name,
                    fail: false,
                    panic: false,
                    delay: Duration::ZERO,
                    calls: calls.clone(),
                }),
                calls,
            )
        }

        fn failing(name: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                fail: true,
                panic: false,
                delay: Duration::ZERO,
                calls: Arc::new(AtomicUsize::new(0)),
            })
        }

        fn panicking(name: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                fail: false,
                panic: true,
                delay: Duration::ZERO,
                calls: Arc::new(AtomicUsize::new(0)),
            })
        }

        fn slow(name: &'static str, delay: Duration) -> (Arc<Self>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Arc::new(Self {
                    name,
                    fail: false,
                    panic: false,
                    delay,
                    calls: calls.clone(),
                }),
                calls,
            )
        }
    }

    #[async_trait]
    impl Collect for StubCollector {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn collect(&self) -> CollectorResult<()> {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.panic {
                panic!("stub collector panic");
            }
            if self.fail {
                return Err(CollectorError::Api("stub failure".to_string()));
            }
            Ok(())
        }
    }

    fn runner(collectors: Vec<Arc<dyn Collect>>) -> (CollectionRunner, Arc<ExporterMetrics>) {
        let registry = Registry::new();
        let metrics = Arc::new(ExporterMetrics::new(&registry));
        (CollectionRunner::new(collectors, metrics.clone()), metrics)
    }

    fn general_errors(metrics: &ExporterMetrics) -> u64 {
        metrics
            .scrape
            .scrape_errors_total
            .with_label_values(&["general_error"])
            .get()
    }

    #[tokio::test]
    async fn test_failing_collector_does_not_cancel_sibling() {
        let (healthy, calls) = StubCollector::new("healthy");
        let failing = StubCollector::failing("failing");
        let (runner, metrics) = runner(vec![failing, healthy]);

        runner.run_pass().await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(general_errors(&metrics), 1);
    }

    #[tokio::test]
    async fn test_panicking_collector_is_captured_as_data() {
        let (healthy, calls) = StubCollector::new("healthy");
        let panicking = StubCollector::panicking("panicking");
        let (runner, metrics) = runner(vec![panicking, healthy]);

        runner.run_pass().await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(general_errors(&metrics), 1);
    }

    #[tokio::test]
    async fn test_pass_records_duration_and_timestamp() {
        let (stub, _calls) = StubCollector::new("stub");
        let (runner, metrics) = runner(vec![stub]);

        runner.run_pass().await;

        assert!(metrics.scrape.last_scrape_timestamp.get() > 0.0);
        assert_eq!(metrics.scrape.scrape_duration_seconds.get_sample_count(), 1);
        assert_eq!(general_errors(&metrics), 0);
    }

    #[tokio::test]
    async fn test_overlapping_scrapes_coalesce_onto_one_pass() {
        let (slow, calls) = StubCollector::slow("slow", Duration::from_millis(100));
        let (runner, metrics) = runner(vec![slow]);
        let runner = Arc::new(runner);

        let first = runner.clone();
        let second = runner.clone();
        tokio::join!(first.run_pass(), second.run_pass());

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(metrics.scrape.scrape_duration_seconds.get_sample_count(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_scrape_storm_never_stalls() {
        let (slow, _calls) = StubCollector::slow("slow", Duration::from_millis(5));
        let (runner, _metrics) = runner(vec![slow]);
        let runner = Arc::new(runner);

        let mut handles = Vec::new();
        for _ in 0..32 {
            let runner = runner.clone();
            handles.push(tokio::spawn(async move {
                for _ in 0..8 {
                    runner.run_pass().await;
                }
            }));
        }

        tokio::time::timeout(Duration::from_secs(30), async {
            for handle in handles {
                handle.await.unwrap();
            }
        })
        .await
        .expect("a scrape stalled waiting for a pass that already finished");
    }

    #[tokio::test]
    async fn test_sequential_passes_each_collect() {
        let (stub, calls) = StubCollector::new("stub");
        let (runner, _metrics) = runner(vec![stub]);

        runner.run_pass().await;
        runner.run_pass().await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
