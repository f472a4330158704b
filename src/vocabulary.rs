//! Typed views over the well-known status and filter codes.
//!
//! The fixture only stores labels and descriptions. Which statuses end a job
//! and which options a filter needs is knowledge of the export pipeline and is
//! kept here.

use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
#[error("unknown code: {0}")]
pub struct UnknownCode(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    InProgress,
    Success,
    Errors,
    DoneWithErrors,
    Unknown,
    Waiting,
}

impl StatusCode {
    pub const ALL: [StatusCode; 6] = [
        StatusCode::InProgress,
        StatusCode::Success,
        StatusCode::Errors,
        StatusCode::DoneWithErrors,
        StatusCode::Unknown,
        StatusCode::Waiting,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StatusCode::InProgress => "in_progress",
            StatusCode::Success => "success",
            StatusCode::Errors => "errors",
            StatusCode::DoneWithErrors => "done_with_errors",
            StatusCode::Unknown => "unknown",
            StatusCode::Waiting => "waiting",
        }
    }

    /// A job in a terminal status will not change status again. A job stuck
    /// in a non-terminal one points at a dead worker or scheduler.
    pub fn is_terminal(self) -> bool {
        !matches!(self, StatusCode::InProgress | StatusCode::Waiting)
    }

    /// Runs that may serve as the baseline of a `last_export` job.
    pub fn is_completed_export(self) -> bool {
        matches!(self, StatusCode::Success | StatusCode::DoneWithErrors)
    }
}

impl FromStr for StatusCode {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatusCode::ALL
            .into_iter()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| UnknownCode(s.to_owned()))
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Job option a filter reads its selection from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOption {
    /// Timestamp of the last completed run of the same export type.
    LatestTime,
    DateRange,
    RecordRange,
    LocationCode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterCode {
    FullExport,
    LastExport,
    UpdatedDateRange,
    RecordRange,
    Location,
}

impl FilterCode {
    pub const ALL: [FilterCode; 5] = [
        FilterCode::FullExport,
        FilterCode::LastExport,
        FilterCode::UpdatedDateRange,
        FilterCode::RecordRange,
        FilterCode::Location,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FilterCode::FullExport => "full_export",
            FilterCode::LastExport => "last_export",
            FilterCode::UpdatedDateRange => "updated_date_range",
            FilterCode::RecordRange => "record_range",
            FilterCode::Location => "location",
        }
    }

    pub fn required_option(self) -> Option<FilterOption> {
        match self {
            FilterCode::FullExport => None,
            FilterCode::LastExport => Some(FilterOption::LatestTime),
            FilterCode::UpdatedDateRange => Some(FilterOption::DateRange),
            FilterCode::RecordRange => Some(FilterOption::RecordRange),
            FilterCode::Location => Some(FilterOption::LocationCode),
        }
    }
}

impl FromStr for FilterCode {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterCode::ALL
            .into_iter()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| UnknownCode(s.to_owned()))
    }
}

impl std::fmt::Display for FilterCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
