//! Control surface: initialisation, program binding and reset.

use iovm_asm::FaultReason;

use super::Interpreter;
use crate::callback::CallbackState;
use crate::error::VmError;
use crate::state::ExecState;

impl<'prog, H> Interpreter<'prog, H> {
    /// Re-initialise the instance: zero the register file, clear the
    /// transaction record, unbind the program and return to the initial
    /// state.
    ///
    /// This is the only way to make a used instance accept a new program.
    pub fn init(&mut self) {
        self.state = ExecState::Init;
        self.fault = None;
        self.registers = Default::default();
        self.callback = CallbackState::cleared(&[]);
        self.program = &[];
        self.offset = 0;
    }

    /// Bind a procedure to the instance.
    ///
    /// Only legal in the initial state; the view is non-owning and the bytes
    /// are never copied.
    pub fn load(&mut self, program: &'prog [u8]) -> Result<(), VmError> {
        if self.state != ExecState::Init {
            return Err(VmError::InvalidOperationForState(self.state));
        }

        self.program = program;
        self.offset = 0;
        self.state = ExecState::Loaded;

        Ok(())
    }

    /// Rewind execution so the next [`Interpreter::exec`] restarts the
    /// procedure from its first instruction.
    ///
    /// Legal once a program is bound and execution is not mid-instruction:
    /// from the loaded, reset, ended or errored states. The register file is
    /// left untouched; only the program offset and the transaction record
    /// are re-initialised when execution restarts.
    pub fn exec_reset(&mut self) -> Result<(), VmError> {
        if self.state < ExecState::Loaded || self.state.is_executing() {
            return Err(VmError::InvalidOperationForState(self.state));
        }

        self.state = ExecState::Reset;
        self.fault = None;

        Ok(())
    }

    /// Current execution state, without side effects.
    pub const fn exec_state(&self) -> ExecState {
        self.state
    }

    /// Fault code of the most recent error transition, if any.
    pub const fn last_fault(&self) -> Option<FaultReason> {
        self.fault
    }
}
