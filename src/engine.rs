use anyhow::{Context, Result};
use std::net::IpAddr;
use std::time::Duration;
use surge_ping::{
    Client as PingClient, Config as PingConfig, PingIdentifier, PingSequence, SurgeError,
};
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::logfile::{timestamp, LogFile};
use crate::models::{evaluate, MonitorState, ProbeOutcome};

/// How long a probe waits for an echo reply before the target counts as
/// unreachable.
const PROBE_TIMEOUT: Duration = Duration::from_millis(3500);

const PAYLOAD: [u8; 56] = [0u8; 56];

/// Probe-layer failure, as opposed to a normal unreachable outcome.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// The probing layer hiccuped. Logged, state untouched, loop continues.
    #[error("{0}")]
    Transient(String),
    /// The probing mechanism itself is broken. Logged, then the loop stops
    /// without re-arming.
    #[error("{0}")]
    Fatal(String),
}

/// Owns the probing client, the resolved target and the transition state for
/// the lifetime of the process.
pub struct Monitor {
    target: IpAddr,
    period: Duration,
    ping_client: PingClient,
    log: LogFile,
    state: MonitorState,
    sequence: u16,
}

impl Monitor {
    pub fn new(target: IpAddr, period: Duration, log: LogFile) -> Result<Self> {
        let ping_client =
            PingClient::new(&PingConfig::default()).context("Failed to create ping client")?;
        Ok(Self {
            target,
            period,
            ping_client,
            log,
            state: MonitorState::default(),
            sequence: 0,
        })
    }

    /// Runs probe cycles until a fatal probe error stops the loop. The first
    /// probe fires immediately; afterwards the timer is re-armed only once
    /// the current probe and any log write have completed, so cycles never
    /// overlap. Returns `Ok(())` on a fatal stop, leaving exit code 0 to the
    /// caller.
    pub async fn run(mut self) -> Result<()> {
        self.log
            .append(&format!("{} {} Monitoring started", timestamp(), self.target))?;
        info!(
            "Monitoring {} every {}s, logging to {}",
            self.target,
            self.period.as_secs(),
            self.log.path().display()
        );

        loop {
            let outcome = self.probe().await;
            if !handle_outcome(outcome, &mut self.state, &self.log)? {
                return Ok(());
            }
            sleep(self.period).await;
        }
    }

    /// Sends one echo request and classifies the result. Timeouts are normal
    /// unreachable outcomes; anything the probing layer raises itself is a
    /// `ProbeError`.
    async fn probe(&mut self) -> Result<ProbeOutcome, ProbeError> {
        let mut pinger = self
            .ping_client
            .pinger(self.target, PingIdentifier(rand::random()))
            .await;
        pinger.timeout(PROBE_TIMEOUT);

        let seq = PingSequence(self.sequence);
        self.sequence = self.sequence.wrapping_add(1);

        match pinger.ping(seq, &PAYLOAD).await {
            Ok((_reply, latency)) => {
                debug!(
                    "echo reply from {} in {:.1}ms",
                    self.target,
                    latency.as_secs_f64() * 1000.0
                );
                Ok(ProbeOutcome::Success {
                    address: self.target,
                    status: "Success".into(),
                })
            }
            Err(SurgeError::Timeout { .. }) => Ok(ProbeOutcome::Failure {
                address: self.target,
                status: "TimedOut".into(),
            }),
            Err(SurgeError::IOError(e)) => Err(ProbeError::Fatal(format!("Ping I/O error: {}", e))),
            Err(e) => Err(ProbeError::Transient(e.to_string())),
        }
    }
}

/// Applies one probe result to the monitor state and the log. Transitions
/// and probe errors each produce exactly one line; everything else is
/// silent. Returns `false` when the loop must stop.
fn handle_outcome(
    result: Result<ProbeOutcome, ProbeError>,
    state: &mut MonitorState,
    log: &LogFile,
) -> Result<bool> {
    match result {
        Ok(outcome) => {
            if evaluate(&outcome, state) {
                let line = format!("{} {} {}", timestamp(), outcome.address(), outcome.status());
                if outcome.is_success() {
                    info!("[CHANGE] {} -> {}", outcome.address(), outcome.status());
                } else {
                    error!("[CHANGE] {} -> {}", outcome.address(), outcome.status());
                }
                log.append(&line)?;
            }
            Ok(true)
        }
        Err(ProbeError::Transient(message)) => {
            warn!("Probe error, continuing: {}", message);
            log.append(&format!("{} {}", timestamp(), message))?;
            Ok(true)
        }
        Err(ProbeError::Fatal(message)) => {
            error!("Fatal probe error, stopping monitor: {}", message);
            log.append(&format!("{} {}", timestamp(), message))?;
            Ok(false)
        }
    }
}
