//! Point-in-time query parsing helpers.
//!
//! `at` is either an RFC 3339 timestamp or a restaurant-local datetime such as
//! `2024-01-01T12:00`. Without it the server clock is used.

use jiff::{Timestamp, civil::DateTime, tz::TimeZone};
use salvo::{oapi::extract::QueryParam, prelude::StatusError};

use carte::context::EvaluationContext;

pub(crate) trait PointInTimeExt {
    fn into_context(self, time_zone: &TimeZone) -> Result<EvaluationContext, StatusError>;
}

impl PointInTimeExt for QueryParam<String, false> {
    fn into_context(self, time_zone: &TimeZone) -> Result<EvaluationContext, StatusError> {
        let Some(value) = self.into_inner() else {
            return Ok(EvaluationContext::new(Timestamp::now(), time_zone));
        };

        if let Ok(timestamp) = value.parse::<Timestamp>() {
            return Ok(EvaluationContext::new(timestamp, time_zone));
        }

        value
            .parse::<DateTime>()
            .map(EvaluationContext::at_local)
            .map_err(|_unparsed| {
                StatusError::bad_request().brief("could not parse \"at\" query parameter")
            })
    }
}
