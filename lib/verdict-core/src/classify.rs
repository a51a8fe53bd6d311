//! Status code classification.
//!
//! The checks run in a fixed order and the first match wins:
//!
//! 1. status inside the success range → [`Branch::Success`]
//! 2. status equal to the explicit error status → [`Branch::ApplicationError`]
//! 3. an error decoder is configured → [`Branch::ApplicationError`]
//! 4. anything else → [`Branch::Unclassified`]

use std::fmt;

/// Which decode path a response takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Branch {
    /// Decode the body into the success shape.
    Success,
    /// Decode the body into the application error shape.
    ApplicationError,
    /// Surface the bare status code.
    Unclassified,
}

/// Inclusive range of status codes treated as success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SuccessRange {
    start: u16,
    end: u16,
}

impl SuccessRange {
    /// 200 OK through 206 Partial Content.
    pub const DEFAULT: Self = Self::new(200, 206);

    /// Inclusive range `start..=end`.
    #[must_use]
    pub const fn new(start: u16, end: u16) -> Self {
        Self { start, end }
    }

    /// First status in the range.
    #[must_use]
    pub const fn start(&self) -> u16 {
        self.start
    }

    /// Last status in the range.
    #[must_use]
    pub const fn end(&self) -> u16 {
        self.end
    }

    /// Returns `true` if the range holds no status.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Returns `true` if `status` lies within the range.
    #[must_use]
    pub const fn contains(&self, status: u16) -> bool {
        self.start <= status && status <= self.end
    }
}

impl Default for SuccessRange {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for SuccessRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

/// Maps status codes to a [`Branch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Classifier {
    success_range: SuccessRange,
    error_status: Option<u16>,
}

impl Classifier {
    /// Classifier with an explicit success range and optional error status.
    #[must_use]
    pub const fn new(success_range: SuccessRange, error_status: Option<u16>) -> Self {
        Self {
            success_range,
            error_status,
        }
    }

    /// Success range in use.
    #[must_use]
    pub const fn success_range(&self) -> SuccessRange {
        self.success_range
    }

    /// Explicit error status, if any.
    #[must_use]
    pub const fn error_status(&self) -> Option<u16> {
        self.error_status
    }

    /// Classify `status`.
    ///
    /// `has_error_decoder` tells whether the caller supplied an error shape.
    #[must_use]
    pub const fn classify(&self, status: u16, has_error_decoder: bool) -> Branch {
        if self.success_range.contains(status) {
            return Branch::Success;
        }

        if matches!(self.error_status, Some(error_status) if error_status == status) {
            return Branch::ApplicationError;
        }

        if has_error_decoder {
            Branch::ApplicationError
        } else {
            Branch::Unclassified
        }
    }
}
