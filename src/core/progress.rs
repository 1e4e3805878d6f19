/// Which phase of an install/uninstall a progress event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// The archive copy being persisted into the install directory.
    Moving,
    /// Content parts being extracted into the install directory.
    Installing,
    /// A prior installation being removed.
    Deleting,
}

/// A single progress report. Within one operation phase of one call, percent
/// values are non-decreasing and the final event of a begun phase is 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent {
    pub operation: Operation,
    pub percent: u8,
}

impl ProgressEvent {
    pub fn new(operation: Operation, percent: u8) -> Self {
        ProgressEvent { operation, percent }
    }
}

/// Progress callback. The engine makes no assumption about which thread
/// invokes the sink; callers that need to marshal events to a particular
/// thread do so themselves.
pub type ProgressSink<'a> = dyn FnMut(ProgressEvent) + Send + 'a;
