//! Execution state representation for the VM

/// State of the interpreter's execution state machine.
///
/// The states are ordered: everything below [`ExecState::ExecuteNext`] is
/// pre-execution, everything from [`ExecState::Ended`] up is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ExecState {
    /// Freshly initialised; no program bound.
    Init = 0x00,
    /// A program is bound and ready to start.
    Loaded = 0x01,
    /// Execution will restart from the first instruction on the next `exec`.
    Reset = 0x02,
    /// The next instruction will be decoded and dispatched.
    ExecuteNext = 0x03,
    /// A host transaction is in flight; each `exec` re-invokes the host until
    /// it reports completion.
    ResumeCallback = 0x04,
    /// The procedure terminated cleanly.
    Ended = 0x05,
    /// The procedure faulted; only a reset can restart it.
    Errored = 0x06,
}

impl ExecState {
    /// Whether the procedure has terminated, cleanly or not.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Ended | Self::Errored)
    }

    /// Whether an instruction is currently being executed or awaited.
    pub const fn is_executing(&self) -> bool {
        matches!(self, Self::ExecuteNext | Self::ResumeCallback)
    }
}

impl Default for ExecState {
    fn default() -> Self {
        Self::Init
    }
}
