//! Failure injection for `PUT /products/{id}`.
//!
//! The update handler asks a [`FailureGate`] before doing anything else; a
//! `true` answer short-circuits with a 500. Production wiring uses
//! [`RandomFailureGate`]; tests swap in a deterministic gate.

/// Decides whether the current request should fail.
pub trait FailureGate: Send + Sync {
    /// `true` to fail this request.
    fn should_fail(&self) -> bool;
}

/// Fails each call independently with probability `rate`.
#[derive(Clone, Copy, Debug)]
pub struct RandomFailureGate {
    rate: f64,
}

impl RandomFailureGate {
    /// Gate with the given failure probability, clamped to `0.0..=1.0`.
    pub fn new(rate: f64) -> Self {
        let rate = if rate.is_nan() { 0.0 } else { rate.clamp(0.0, 1.0) };
        Self { rate }
    }

    /// Configured failure probability.
    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl FailureGate for RandomFailureGate {
    fn should_fail(&self) -> bool {
        // Uniform in [0, 1): rate 0 never fails, rate 1 always does.
        rand::random::<f64>() < self.rate
    }
}

/// Never fails.
#[derive(Clone, Copy, Debug, Default)]
pub struct NeverFail;

impl FailureGate for NeverFail {
    fn should_fail(&self) -> bool {
        false
    }
}

/// Always fails.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysFail;

impl FailureGate for AlwaysFail {
    fn should_fail(&self) -> bool {
        true
    }
}
