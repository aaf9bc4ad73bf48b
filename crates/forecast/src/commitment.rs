use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use spendcast_core::{CommitmentId, CurrencyCode, DomainError, DomainResult, Entity, TenantId};

use crate::series::{Month, whole_months_between};

/// Longest accepted term (100 years).
pub const MAX_TERM_MONTHS: u32 = 1200;

/// How far `term_months` may drift from the calendar span of the dates.
pub const TERM_DATE_TOLERANCE_MONTHS: i64 = 1;

/// A spend commitment: `total_amount` to be consumed over `term_months`.
///
/// Immutable once built. Construction (and deserialization) validates the
/// amount, term and date range, so every `Commitment` in hand is usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CommitmentFields")]
pub struct Commitment {
    id: CommitmentId,
    tenant_id: TenantId,
    total_amount: f64,
    term_months: u32,
    start_date: NaiveDate,
    end_date: NaiveDate,
    currency: CurrencyCode,
}

/// Unvalidated wire shape of a commitment.
#[derive(Debug, Clone, Deserialize)]
struct CommitmentFields {
    #[serde(default)]
    id: Option<CommitmentId>,
    tenant_id: TenantId,
    total_amount: f64,
    term_months: u32,
    start_date: NaiveDate,
    end_date: NaiveDate,
    currency: CurrencyCode,
}

impl TryFrom<CommitmentFields> for Commitment {
    type Error = DomainError;

    fn try_from(f: CommitmentFields) -> Result<Self, Self::Error> {
        let commitment = Commitment::new(
            f.tenant_id,
            f.total_amount,
            f.term_months,
            f.start_date,
            f.end_date,
            f.currency,
        )?;
        Ok(match f.id {
            Some(id) => commitment.with_id(id),
            None => commitment,
        })
    }
}

impl Commitment {
    pub fn new(
        tenant_id: TenantId,
        total_amount: f64,
        term_months: u32,
        start_date: NaiveDate,
        end_date: NaiveDate,
        currency: CurrencyCode,
    ) -> DomainResult<Self> {
        if !(total_amount.is_finite() && total_amount > 0.0) {
            return Err(DomainError::invalid_input(
                "commitment amount must be a finite positive number",
            ));
        }
        if term_months == 0 {
            return Err(DomainError::invalid_input("commitment term must be at least one month"));
        }
        if end_date <= start_date {
            return Err(DomainError::invalid_input(format!(
                "commitment end date {end_date} must be after start date {start_date}"
            )));
        }
        if term_months > MAX_TERM_MONTHS {
            return Err(DomainError::invalid_input(format!(
                "commitment term of {term_months} months exceeds {MAX_TERM_MONTHS}"
            )));
        }
        let span = whole_months_between(start_date, end_date);
        if (term_months as i64 - span).abs() > TERM_DATE_TOLERANCE_MONTHS {
            return Err(DomainError::invalid_input(format!(
                "commitment term of {term_months} months disagrees with {start_date}..{end_date} ({span} months)"
            )));
        }

        Ok(Self {
            id: CommitmentId::new(),
            tenant_id,
            total_amount,
            term_months,
            start_date,
            end_date,
            currency,
        })
    }

    pub fn with_id(mut self, id: CommitmentId) -> Self {
        self.id = id;
        self
    }

    pub fn id_typed(&self) -> CommitmentId {
        self.id
    }

    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    pub fn total_amount(&self) -> f64 {
        self.total_amount
    }

    pub fn term_months(&self) -> u32 {
        self.term_months
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    pub fn start_month(&self) -> Month {
        Month::of(self.start_date)
    }

    /// Whole months of the term elapsed at `as_of`, clamped to `0..=term_months`.
    pub fn months_elapsed(&self, as_of: NaiveDate) -> u32 {
        let months = whole_months_between(self.start_date, as_of).max(0);
        months.min(self.term_months as i64) as u32
    }

    /// Months of the term still ahead at `as_of` (zero once the term is over).
    pub fn months_remaining(&self, as_of: NaiveDate) -> u32 {
        self.term_months - self.months_elapsed(as_of)
    }
}

impl Entity for Commitment {
    type Id = CommitmentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn owner(&self) -> TenantId {
        self.tenant_id
    }
}
