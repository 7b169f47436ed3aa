//! Phases of a single trigger sequence
//!
//! Idle → Guarding → Capturing → Rewriting → Replacing → Restoring → Idle
//!
//! A sequence can return to Idle from any phase; aborts and empty selections
//! skip the later phases.

/// Where the orchestrator currently is in a trigger sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Waiting for the hotkey
    #[default]
    Idle,

    /// Checking focus and debounce, waiting for the chord to settle
    Guarding,

    /// Select-all and copy issued, reading the selection
    Capturing,

    /// Waiting on the rewrite service
    Rewriting,

    /// Pasting the rewritten text
    Replacing,

    /// Putting the original clipboard contents back
    Restoring,
}

impl Phase {
    /// Check if in idle phase
    pub fn is_idle(&self) -> bool {
        matches!(self, Phase::Idle)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Idle => "Idle",
            Phase::Guarding => "Guarding",
            Phase::Capturing => "Capturing",
            Phase::Rewriting => "Rewriting",
            Phase::Replacing => "Replacing",
            Phase::Restoring => "Restoring",
        };
        write!(f, "{}", name)
    }
}
