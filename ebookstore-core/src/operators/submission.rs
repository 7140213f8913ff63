//! Form submission backends.
//!
//! The storefront has no server: the default gateway only simulates one,
//! failing a configurable share of contact submissions at random.

use indexmap::IndexMap;
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::{debug, warn};

use crate::error::AppError;

/// Named field values of a submitted form, in document order.
pub type FormData = IndexMap<String, String>;

pub trait SubmissionGateway {
    fn submit_contact(&mut self, data: &FormData) -> Result<(), AppError>;

    fn subscribe(&mut self, email: &str) -> Result<(), AppError>;
}

#[derive(Debug)]
pub struct SimulatedGateway {
    failure_rate: f64,
    rng: StdRng,
}

impl SimulatedGateway {
    pub fn new(failure_rate: f64) -> Self {
        Self::with_rng(failure_rate, StdRng::from_entropy())
    }

    /// Deterministic outcomes for a given seed.
    pub fn seeded(failure_rate: f64, seed: u64) -> Self {
        Self::with_rng(failure_rate, StdRng::seed_from_u64(seed))
    }

    fn with_rng(failure_rate: f64, rng: StdRng) -> Self {
        let failure_rate = if failure_rate.is_finite() {
            failure_rate.clamp(0.0, 1.0)
        } else {
            warn!("invalid contact failure rate {failure_rate}, using 0");
            0.0
        };
        Self { failure_rate, rng }
    }
}

impl SubmissionGateway for SimulatedGateway {
    fn submit_contact(&mut self, data: &FormData) -> Result<(), AppError> {
        debug!(?data, "contact form data");
        if self.rng.gen_bool(self.failure_rate) {
            return Err(AppError::submission_failed(
                "contact-form",
                "Simulated submission failure",
            ));
        }
        Ok(())
    }

    fn subscribe(&mut self, email: &str) -> Result<(), AppError> {
        debug!(email, "newsletter subscription");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> FormData {
        FormData::from([
            ("name".to_string(), "Ada".to_string()),
            ("email".to_string(), "ada@example.com".to_string()),
        ])
    }

    #[test]
    fn extremes_are_deterministic() {
        let mut never = SimulatedGateway::seeded(0.0, 7);
        let mut always = SimulatedGateway::seeded(1.0, 7);
        for _ in 0..50 {
            assert!(never.submit_contact(&form()).is_ok());
            assert!(matches!(
                always.submit_contact(&form()),
                Err(AppError::SubmissionFailed { .. })
            ));
        }
    }

    #[test]
    fn out_of_range_rates_are_clamped() {
        assert!(SimulatedGateway::seeded(-3.0, 1).submit_contact(&form()).is_ok());
        assert!(SimulatedGateway::seeded(f64::NAN, 1).submit_contact(&form()).is_ok());
        assert!(SimulatedGateway::seeded(9.0, 1).submit_contact(&form()).is_err());
    }

    #[test]
    fn roughly_one_in_ten_fails() {
        let mut gateway = SimulatedGateway::seeded(0.1, 42);
        let failures = (0..2000)
            .filter(|_| gateway.submit_contact(&form()).is_err())
            .count();
        assert!((100..300).contains(&failures), "{failures} failures");
    }

    #[test]
    fn subscriptions_always_succeed() {
        assert!(SimulatedGateway::new(1.0).subscribe("a@b.c").is_ok());
    }
}
