use rust_decimal::Decimal;
use crate::core::library::RenewalGate;

/// Everything the combinator needs to know about one loan.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct GateInputs {
    pub policy_passed: bool,
    pub fines_over_threshold: Decimal,
    pub blocking_penalty: bool,
    pub blocking_holds: i64,
    pub renewals_remaining: i64,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Verdict {
    pub renewals_remaining: i64,
    pub blocked_by: Option<RenewalGate>,
}

impl Verdict {
    pub fn is_eligible(&self) -> bool {
        self.blocked_by.is_none()
    }
}

// gates before the hold check; a loan failing one of these never needs the permit test
pub fn passes_pre_hold_gates(policy_passed: bool, fines_over_threshold: Decimal,
                             blocking_penalty: bool, renewals_remaining: i64) -> bool {
    policy_passed && fines_over_threshold <= Decimal::ZERO && !blocking_penalty && renewals_remaining > 0
}

pub fn first_failing_gate(inputs: &GateInputs) -> Option<RenewalGate> {
    if !inputs.policy_passed {
        Some(RenewalGate::Policy)
    } else if inputs.fines_over_threshold > Decimal::ZERO {
        Some(RenewalGate::Fines)
    } else if inputs.blocking_penalty {
        Some(RenewalGate::StandingPenalty)
    } else if inputs.blocking_holds > 0 {
        Some(RenewalGate::Holds)
    } else if inputs.renewals_remaining <= 0 {
        Some(RenewalGate::RenewalsRemaining)
    } else {
        None
    }
}

pub fn decide(inputs: &GateInputs) -> Verdict {
    match first_failing_gate(inputs) {
        Some(gate) => Verdict { renewals_remaining: 0, blocked_by: Some(gate) },
        None => Verdict { renewals_remaining: inputs.renewals_remaining, blocked_by: None },
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use crate::core::library::RenewalGate;
    use crate::renewal::domain::gates::{decide, first_failing_gate, passes_pre_hold_gates, GateInputs};

    fn clean() -> GateInputs {
        GateInputs {
            policy_passed: true,
            fines_over_threshold: Decimal::ZERO,
            blocking_penalty: false,
            blocking_holds: 0,
            renewals_remaining: 2,
        }
    }

    #[tokio::test]
    async fn test_should_keep_stored_renewals_when_clean() {
        let verdict = decide(&clean());
        assert_eq!(2, verdict.renewals_remaining);
        assert!(verdict.is_eligible());
    }

    #[tokio::test]
    async fn test_should_report_first_failure_in_order() {
        let mut inputs = clean();
        inputs.renewals_remaining = 0;
        assert_eq!(Some(RenewalGate::RenewalsRemaining), first_failing_gate(&inputs));
        inputs.blocking_holds = 1;
        assert_eq!(Some(RenewalGate::Holds), first_failing_gate(&inputs));
        inputs.blocking_penalty = true;
        assert_eq!(Some(RenewalGate::StandingPenalty), first_failing_gate(&inputs));
        inputs.fines_over_threshold = Decimal::new(1, 2);
        assert_eq!(Some(RenewalGate::Fines), first_failing_gate(&inputs));
        inputs.policy_passed = false;
        assert_eq!(Some(RenewalGate::Policy), first_failing_gate(&inputs));
    }

    #[tokio::test]
    async fn test_should_zero_renewals_on_any_failure() {
        let mut inputs = clean();
        inputs.blocking_holds = 3;
        let verdict = decide(&inputs);
        assert_eq!(0, verdict.renewals_remaining);
        assert_eq!(Some(RenewalGate::Holds), verdict.blocked_by);
    }

    #[tokio::test]
    async fn test_should_skip_hold_check_only_for_blocked_loans() {
        assert!(passes_pre_hold_gates(true, Decimal::ZERO, false, 1));
        assert!(!passes_pre_hold_gates(false, Decimal::ZERO, false, 1));
        assert!(!passes_pre_hold_gates(true, Decimal::new(20, 0), false, 1));
        assert!(!passes_pre_hold_gates(true, Decimal::ZERO, true, 1));
        assert!(!passes_pre_hold_gates(true, Decimal::ZERO, false, 0));
    }
}
