use iovm::prelude::*;

/// Host for procedures that must never complete a transaction on their own:
/// every invocation is counted and left incomplete.
#[derive(Debug, Default)]
struct InertHost {
    opcode_calls: usize,
    ends: usize,
    aborts: usize,
}

impl Host for InertHost {
    fn on_opcode(&mut self, _state: &mut CallbackState<'_>) -> Result<(), FaultReason> {
        self.opcode_calls += 1;
        Ok(())
    }

    fn send_read(&mut self, _raw_len: u16, _data: &[u8]) {}

    fn send_end(&mut self) {
        self.ends += 1;
    }

    fn send_abort(&mut self) {
        self.aborts += 1;
    }

    fn timer_reset(&mut self) {}

    fn timer_elapsed(&mut self) -> bool {
        false
    }
}

#[test]
fn load_requires_the_initial_state() {
    let proc: Vec<u8> = vec![Opcode::END].into_iter().collect();
    let mut vm = Interpreter::with_host(InertHost::default());

    vm.load(&proc).expect("load from the initial state");
    assert_eq!(ExecState::Loaded, vm.exec_state());

    let err = vm.load(&proc).expect_err("no re-load over a bound program");
    assert_eq!(FaultReason::InvalidOperationForState, err.reason());
    assert_eq!(ExecState::Loaded, vm.exec_state());

    vm.init();
    assert_eq!(ExecState::Init, vm.exec_state());
    vm.load(&proc).expect("load after re-initialisation");
}

#[test]
fn exec_from_the_initial_state_is_rejected() {
    let mut vm = Interpreter::<InertHost>::default();

    let err = vm.exec().expect_err("nothing to execute");
    assert_eq!(VmError::InvalidOperationForState(ExecState::Init), err);
    assert_eq!(ExecState::Init, vm.exec_state());
    assert_eq!(0, vm.host().ends);
}

#[test]
fn empty_program_ends_in_one_call() {
    let mut vm = Interpreter::with_host(InertHost::default());

    vm.load(&[]).unwrap();
    assert_eq!(ExecState::Ended, vm.exec().unwrap());

    assert_eq!(0, vm.host().opcode_calls);
    assert_eq!(1, vm.host().ends);
}

#[test]
fn end_opcode_terminates_cleanly() {
    let mut vm = Interpreter::with_host(InertHost::default());

    vm.load(&[0x00]).unwrap();
    assert_eq!(ExecState::Ended, vm.exec().unwrap());
    assert_eq!(1, vm.host().ends);
}

#[test]
fn program_without_terminator_ends_cleanly() {
    let proc: Vec<u8> = vec![Opcode::SETA8(0, 0x42)].into_iter().collect();
    let mut vm = Interpreter::with_host(InertHost::default());

    vm.load(&proc).unwrap();
    assert_eq!(ExecState::Ended, vm.exec().unwrap());
    assert_eq!(0x42, vm.channel(0).address());
}

#[test]
fn exec_after_the_end_is_a_no_op() {
    let mut vm = Interpreter::with_host(InertHost::default());

    vm.load(&[]).unwrap();
    vm.exec().unwrap();
    assert_eq!(ExecState::Ended, vm.exec().unwrap());
    assert_eq!(ExecState::Ended, vm.exec().unwrap());

    // The end of the procedure was reported exactly once.
    assert_eq!(1, vm.host().ends);
}

#[test]
fn register_program_executes_in_a_single_call() {
    let proc: Vec<u8> = vec![
        Opcode::SETA24(2, 0x00f5_0010),
        Opcode::SETA8(0, 0x7f),
        Opcode::SETA16(1, 0x1234),
        Opcode::SETTV(1, 0x81),
        Opcode::SETLEN(1, 0),
        Opcode::SETCMPMSK(3, 0x55, 0x0f),
        Opcode::SETTIM(3, 0x000f_4240),
        Opcode::END,
    ]
    .into_iter()
    .collect();
    let mut vm = Interpreter::with_host(InertHost::default());

    vm.load(&proc).unwrap();
    assert_eq!(ExecState::Ended, vm.exec().unwrap());

    assert_eq!(0x00f5_0010, vm.channel(2).address());
    assert_eq!(0x7f, vm.channel(0).address());
    assert_eq!(0x1234, vm.channel(1).address());
    assert_eq!(0x01, vm.channel(1).tv().target());
    assert!(vm.channel(1).tv().auto_advance());
    assert_eq!(65536, vm.channel(1).transfer_len());
    assert_eq!(0x55, vm.channel(3).cmp());
    assert_eq!(0x0f, vm.channel(3).msk());
    assert_eq!(0x000f_4240, vm.channel(3).timeout());

    assert_eq!(0, vm.host().opcode_calls);
    assert_eq!(1, vm.host().ends);
}

#[test]
fn comparison_mask_defaults_to_all_ones() {
    let vm = Interpreter::<InertHost>::default();

    for channel in 0..4 {
        assert_eq!(0xff, vm.channel(channel).msk());
    }
}

#[test]
fn unknown_opcode_faults_the_procedure() {
    let mut vm = Interpreter::with_host(InertHost::default());

    vm.load(&[0x0f, 0x00]).unwrap();

    let err = vm.exec().expect_err("reserved opcode slot");
    assert_eq!(VmError::UnknownOpcode { opcode: 0x0f, offset: 0 }, err);
    assert_eq!(FaultReason::UnknownOpcode, err.reason());
    assert_eq!(ExecState::Errored, vm.exec_state());
    assert_eq!(Some(FaultReason::UnknownOpcode), vm.last_fault());
    assert_eq!(1, vm.host().ends);
    assert_eq!(0, vm.host().aborts);

    // Executing a faulted procedure does nothing further.
    assert_eq!(ExecState::Errored, vm.exec().unwrap());
    assert_eq!(1, vm.host().ends);
}

#[test]
fn truncated_operands_fault_the_procedure() {
    let mut vm = Interpreter::with_host(InertHost::default());

    // SETA16 with only one of its two immediate bytes present.
    vm.load(&[0x02, 0x34]).unwrap();

    let err = vm.exec().expect_err("operands overrun the buffer");
    assert_eq!(VmError::OutOfRange { offset: 0 }, err);
    assert_eq!(ExecState::Errored, vm.exec_state());
    assert_eq!(1, vm.host().ends);
}

#[test]
fn reset_is_legal_from_loaded() {
    let mut vm = Interpreter::with_host(InertHost::default());

    vm.load(&[]).unwrap();
    vm.exec_reset().expect("reset from loaded");
    assert_eq!(ExecState::Reset, vm.exec_state());

    // Resetting a reset machine changes nothing.
    vm.exec_reset().expect("reset is idempotent");
    assert_eq!(ExecState::Reset, vm.exec_state());
}

#[test]
fn reset_is_rejected_before_a_program_is_bound() {
    let mut vm = Interpreter::<InertHost>::default();

    let err = vm.exec_reset().expect_err("nothing to reset");
    assert_eq!(VmError::InvalidOperationForState(ExecState::Init), err);
    assert_eq!(ExecState::Init, vm.exec_state());
}

#[test]
fn reset_is_rejected_mid_instruction() {
    let proc: Vec<u8> = vec![Opcode::READ(0)].into_iter().collect();
    let mut vm = Interpreter::with_host(InertHost::default());

    vm.load(&proc).unwrap();
    assert_eq!(ExecState::ResumeCallback, vm.exec().unwrap());

    // A second call keeps the transaction pending.
    assert_eq!(ExecState::ResumeCallback, vm.exec().unwrap());
    assert_eq!(2, vm.host().opcode_calls);

    let err = vm.exec_reset().expect_err("transaction in flight");
    assert_eq!(FaultReason::InvalidOperationForState, err.reason());
    assert_eq!(ExecState::ResumeCallback, vm.exec_state());
}

#[test]
fn reset_restarts_ended_programs() {
    let proc: Vec<u8> = vec![Opcode::SETA8(1, 0x10), Opcode::END].into_iter().collect();
    let mut vm = Interpreter::with_host(InertHost::default());

    vm.load(&proc).unwrap();
    assert_eq!(ExecState::Ended, vm.exec().unwrap());
    assert_eq!(0x10, vm.channel(1).address());

    vm.exec_reset().expect("reset from ended");
    assert_eq!(ExecState::Reset, vm.exec_state());

    // Registers survive the reset; the rerun reaches the same final state.
    assert_eq!(0x10, vm.channel(1).address());
    assert_eq!(ExecState::Ended, vm.exec().unwrap());
    assert_eq!(0x10, vm.channel(1).address());
    assert_eq!(2, vm.host().ends);
}

#[test]
fn reset_restarts_errored_programs() {
    let mut vm = Interpreter::with_host(InertHost::default());

    vm.load(&[0x0f]).unwrap();
    vm.exec().expect_err("reserved opcode slot");
    assert_eq!(ExecState::Errored, vm.exec_state());

    vm.exec_reset().expect("reset from errored");
    assert_eq!(ExecState::Reset, vm.exec_state());
    assert_eq!(None, vm.last_fault());

    // The program is unchanged, so the rerun faults again.
    vm.exec().expect_err("reserved opcode slot");
    assert_eq!(Some(FaultReason::UnknownOpcode), vm.last_fault());
}
