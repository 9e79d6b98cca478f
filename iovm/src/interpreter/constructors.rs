//! Exposed constructors API for the [`Interpreter`]

use super::Interpreter;
use crate::callback::CallbackState;
use crate::host::MemoryHost;
use crate::state::ExecState;

impl<'prog, H> Interpreter<'prog, H> {
    /// Create a new interpreter instance bound to a host adapter.
    ///
    /// The instance starts in the initial state with no program bound.
    pub fn with_host(host: H) -> Self {
        Self {
            state: ExecState::Init,
            fault: None,
            registers: Default::default(),
            callback: CallbackState::cleared(&[]),
            program: &[],
            offset: 0,
            host,
        }
    }
}

impl<'prog, H> Default for Interpreter<'prog, H>
where
    H: Default,
{
    fn default() -> Self {
        Self::with_host(Default::default())
    }
}

impl<'prog> Interpreter<'prog, MemoryHost> {
    /// Create a new interpreter over an in-memory host.
    ///
    /// Useful for tests and embedders that stage chip contents in RAM.
    pub fn with_memory_host() -> Self {
        Self::default()
    }
}
