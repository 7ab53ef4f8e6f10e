use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum OutcomeError {
    #[error("total ({total}) does not match correct + wrong + skipped ({sum})")]
    CountMismatch { total: u32, sum: u32 },

    #[error("percentage {stored} does not match counts (expected {expected})")]
    PercentageMismatch { stored: u8, expected: u8 },
}

//
// ─── OUTCOME ───────────────────────────────────────────────────────────────────
//

/// Finalized score summary for a session.
///
/// Every question ends up in exactly one bucket: answered correctly,
/// answered wrongly, or skipped (no recorded answer at completion time).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    correct: u32,
    wrong: u32,
    skipped: u32,
    total: u32,
    percentage: u8,
}

fn percentage_of(correct: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (f64::from(correct) / f64::from(total) * 100.0).round();
    // correct <= total, so the rounded value always fits 0..=100.
    pct as u8
}

impl Outcome {
    /// Builds an outcome from the three buckets; total and percentage are
    /// derived.
    #[must_use]
    pub fn from_counts(correct: u32, wrong: u32, skipped: u32) -> Self {
        let total = correct + wrong + skipped;
        Self {
            correct,
            wrong,
            skipped,
            total,
            percentage: percentage_of(correct, total),
        }
    }

    /// Rehydrates an outcome from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `OutcomeError` if the stored counts or percentage do not
    /// agree with each other.
    pub fn from_persisted(
        correct: u32,
        wrong: u32,
        skipped: u32,
        total: u32,
        percentage: u8,
    ) -> Result<Self, OutcomeError> {
        let sum = correct + wrong + skipped;
        if sum != total {
            return Err(OutcomeError::CountMismatch { total, sum });
        }
        let expected = percentage_of(correct, total);
        if percentage != expected {
            return Err(OutcomeError::PercentageMismatch {
                stored: percentage,
                expected,
            });
        }

        Ok(Self {
            correct,
            wrong,
            skipped,
            total,
            percentage,
        })
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn wrong(&self) -> u32 {
        self.wrong
    }

    #[must_use]
    pub fn skipped(&self) -> u32 {
        self.skipped
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Correct share of the total, rounded to the nearest whole percent.
    #[must_use]
    pub fn percentage(&self) -> u8 {
        self.percentage
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
