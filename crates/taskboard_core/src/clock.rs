use crate::error::StoreError;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

/// Wall clock injected into the stores. Every timestamp the core produces
/// (ids, `createdAt`, `completedAt`, overdue checks) goes through this seam.
pub trait Clock {
    fn now(&self) -> OffsetDateTime;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> OffsetDateTime {
        (**self).now()
    }
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

pub fn rfc3339(instant: OffsetDateTime) -> Result<String, StoreError> {
    instant
        .format(&Rfc3339)
        .map_err(|err| StoreError::corrupt_data(err.to_string()))
}

/// Short human date stored alongside every task, e.g. "Dec 20, 2025".
pub fn short_date(instant: OffsetDateTime) -> Result<String, StoreError> {
    let format = format_description!("[month repr:short] [day padding:none], [year]");
    instant
        .format(&format)
        .map_err(|err| StoreError::corrupt_data(err.to_string()))
}
