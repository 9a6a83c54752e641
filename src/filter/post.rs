//! Detail-stage filter
//!
//! Needs fields that only exist on the detail page, so it runs after the
//! detail fetch and parse have succeeded.

use crate::filter::FilterConfig;
use crate::record::VacancyRecord;

/// Outcome of the detail-stage filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostFilterVerdict {
    Accepted,
    NotPermanent,
    NotBeginningTeacherSuitable,
}

impl PostFilterVerdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Evaluates an enriched record against the detail-stage rules
pub fn evaluate(record: &VacancyRecord, config: &FilterConfig) -> PostFilterVerdict {
    if config.require_permanent()
        && !record.employment_type.to_lowercase().contains("permanent")
    {
        return PostFilterVerdict::NotPermanent;
    }

    if config.require_beginning_teacher_suitable() && !record.beginning_teacher_suitable {
        return PostFilterVerdict::NotBeginningTeacherSuitable;
    }

    PostFilterVerdict::Accepted
}

/// Returns true if the record passes the detail-stage filter
pub fn accept(record: &VacancyRecord, config: &FilterConfig) -> bool {
    evaluate(record, config).is_accepted()
}
