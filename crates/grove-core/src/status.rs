#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Result of executing a node for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Status {
    Running,
    Success,
    Failure,
}

impl Status {
    /// `true` for `Success` and `Failure`.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Status::Running)
    }

    pub fn is_success(self) -> bool {
        matches!(self, Status::Success)
    }

    pub fn is_failure(self) -> bool {
        matches!(self, Status::Failure)
    }

    /// Swaps `Success` and `Failure`; `Running` is unchanged.
    pub fn invert(self) -> Self {
        match self {
            Status::Running => Status::Running,
            Status::Success => Status::Failure,
            Status::Failure => Status::Success,
        }
    }

    pub fn from_bool(ok: bool) -> Self {
        if ok {
            Status::Success
        } else {
            Status::Failure
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Status::Running => "Running",
            Status::Success => "Success",
            Status::Failure => "Failure",
        };
        f.write_str(s)
    }
}
