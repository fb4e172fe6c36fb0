use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use crate::config::HarnessConfig;
use crate::errors::{HarnessError, HarnessResult};
use crate::models::TestCase;
use crate::services::UserClient;
use super::backend::BackendRegistry;
use super::report::{RunOutcome, RunReport, StepReport};
use tracing;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarnessState {
    Idle,
    Running,
}

// Holds the running flag for the lifetime of one run
struct RunGuard<'a>(&'a AtomicBool);

impl<'a> RunGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> HarnessResult<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| HarnessError::AlreadyRunning)?;
        Ok(Self(flag))
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Runs test suites one request at a time against the selected backend.
pub struct Harness {
    client: UserClient,
    backends: BackendRegistry,
    step_delay: Duration,
    running: AtomicBool,
}

impl Harness {
    pub fn new(client: UserClient, backends: BackendRegistry, step_delay: Duration) -> Self {
        Self {
            client,
            backends,
            step_delay,
            running: AtomicBool::new(false),
        }
    }

    pub fn from_config(config: &HarnessConfig) -> HarnessResult<Self> {
        let client = UserClient::new(Duration::from_millis(config.request_timeout_ms))?;
        let backends = BackendRegistry::new(config.backends.clone(), &config.selected);
        Ok(Self::new(client, backends, Duration::from_millis(config.step_delay_ms)))
    }

    pub fn backends(&self) -> &BackendRegistry {
        &self.backends
    }

    pub fn state(&self) -> HarnessState {
        if self.running.load(Ordering::Acquire) {
            HarnessState::Running
        } else {
            HarnessState::Idle
        }
    }

    pub async fn run(&self, cases: &[TestCase], cancel: &CancellationToken) -> HarnessResult<RunReport> {
        self.run_with_progress(cases, cancel, |_| {}).await
    }

    /// Runs `cases` in order, handing each step's report to `on_step` as soon as it is evaluated.
    ///
    /// Fails without sending anything if a run is already in progress or the
    /// selected backend has no endpoint. Cancellation is honoured between
    /// steps only; a request that has been sent is always awaited and checked.
    pub async fn run_with_progress<F>(
        &self,
        cases: &[TestCase],
        cancel: &CancellationToken,
        mut on_step: F,
    ) -> HarnessResult<RunReport>
    where
        F: FnMut(&StepReport),
    {
        let _guard = RunGuard::acquire(&self.running)?;
        let (backend, base_url) = self.backends.resolve()?;

        tracing::info!("Starting test run of {} steps against {} ({})", cases.len(), backend, base_url);
        let mut report = RunReport::start(&backend, &base_url);

        let outcome = self.run_steps(cases, cancel, &mut report.steps, &mut on_step).await;
        report.finish(outcome);

        tracing::info!(
            "Test run {} finished: {:?}, {} of {} steps failed",
            report.run_id,
            report.outcome,
            report.failures().count(),
            report.steps.len()
        );
        Ok(report)
    }

    async fn run_steps<F>(
        &self,
        cases: &[TestCase],
        cancel: &CancellationToken,
        steps: &mut Vec<StepReport>,
        on_step: &mut F,
    ) -> RunOutcome
    where
        F: FnMut(&StepReport),
    {
        for case in cases {
            if cancel.is_cancelled() {
                tracing::info!("Test run cancelled before {}", case.name);
                return RunOutcome::Cancelled;
            }

            // The selection may change while a suite is running
            let base_url = match self.backends.resolve() {
                Ok((_, base_url)) => base_url,
                Err(e) => {
                    tracing::error!("Stopping test run: {}", e);
                    return RunOutcome::BackendUnresolved;
                }
            };

            let step = self.execute_step(&base_url, case).await;
            on_step(&step);
            let transport_error = step.transport_error;
            steps.push(step);

            if transport_error {
                return RunOutcome::TransportFailed;
            }

            tokio::select! {
                _ = sleep(self.step_delay) => {}
                _ = cancel.cancelled() => {}
            }
        }

        RunOutcome::Completed
    }

    async fn execute_step(&self, base_url: &str, case: &TestCase) -> StepReport {
        tracing::debug!("Running test {}: {}", case.name, case.operation.kind());

        let (result, transport_error) = match self.client.send(base_url, &case.operation).await {
            Ok(result) => (result, false),
            Err(e) => {
                tracing::error!("Request for test {} failed: {}", case.name, e);
                (format!("Error: {}", e), true)
            }
        };

        let failure = case.expectation.check(&case.name, &result);
        if let Some(message) = &failure {
            tracing::warn!("{}", message);
        }

        StepReport {
            name: case.name.clone(),
            operation: case.operation.kind(),
            result,
            failure,
            transport_error,
        }
    }
}
