use std::net::IpAddr;

/// Result of one completed reachability probe. Probe-layer errors are not
/// outcomes; they are `engine::ProbeError` and bypass the transition policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Success { address: IpAddr, status: String },
    Failure { address: IpAddr, status: String },
}

impl ProbeOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ProbeOutcome::Success { .. })
    }

    pub fn address(&self) -> IpAddr {
        match self {
            ProbeOutcome::Success { address, .. } | ProbeOutcome::Failure { address, .. } => {
                *address
            }
        }
    }

    pub fn status(&self) -> &str {
        match self {
            ProbeOutcome::Success { status, .. } | ProbeOutcome::Failure { status, .. } => status,
        }
    }
}

/// Reachability state carried between probe cycles. Starts healthy, so a
/// failing very first probe counts as a transition and gets logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonitorState {
    pub is_failed: bool,
}

/// Transition policy: a log line is due exactly when the outcome's
/// classification differs from the recorded one. Updates the state to match
/// the outcome when it reports a transition.
pub fn evaluate(outcome: &ProbeOutcome, state: &mut MonitorState) -> bool {
    let failed = !outcome.is_success();
    if failed == state.is_failed {
        return false;
    }
    state.is_failed = failed;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    const ADDR: IpAddr = IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1));

    fn up() -> ProbeOutcome {
        ProbeOutcome::Success {
            address: ADDR,
            status: "Success".into(),
        }
    }

    fn down() -> ProbeOutcome {
        ProbeOutcome::Failure {
            address: ADDR,
            status: "TimedOut".into(),
        }
    }

    #[test]
    fn success_while_healthy_is_silent() {
        let mut state = MonitorState::default();
        assert!(!evaluate(&up(), &mut state));
        assert!(!state.is_failed);
    }

    #[test]
    fn first_failure_logs_and_flips_state() {
        let mut state = MonitorState::default();
        assert!(evaluate(&down(), &mut state));
        assert!(state.is_failed);
    }

    #[test]
    fn sustained_outage_logs_once() {
        let mut state = MonitorState::default();
        let logged: usize = (0..5)
            .map(|_| evaluate(&down(), &mut state) as usize)
            .sum();
        assert_eq!(logged, 1);
        assert!(state.is_failed);
    }

    #[test]
    fn recovery_logs_again() {
        let mut state = MonitorState { is_failed: true };
        assert!(evaluate(&up(), &mut state));
        assert!(!state.is_failed);
    }

    #[test]
    fn round_trip_produces_two_transitions() {
        let mut state = MonitorState::default();
        let outcomes = [down(), up()];
        let logged: usize = outcomes
            .iter()
            .map(|o| evaluate(o, &mut state) as usize)
            .sum();
        assert_eq!(logged, 2);
        assert!(!state.is_failed);
    }

    #[test]
    fn repeated_successes_after_start_never_log() {
        let mut state = MonitorState::default();
        for _ in 0..10 {
            assert!(!evaluate(&up(), &mut state));
        }
    }
}
