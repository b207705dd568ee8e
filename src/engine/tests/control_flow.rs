use super::{gf, instr, run};
use crate::arg::Arg;
use crate::opcode::Opcode;

#[test]
fn jump_skips_intervening_instructions() {
    let instructions = vec![
        instr(Opcode::JUMP, vec![Arg::Label("skip".to_string())], 1),
        instr(Opcode::WRITE, vec![Arg::Str("unreachable".to_string())], 2),
        instr(Opcode::LABEL, vec![Arg::Label("skip".to_string())], 3),
        instr(Opcode::WRITE, vec![Arg::Str("ok".to_string())], 4),
    ];
    let (result, output) = run(instructions, "");
    assert!(result.is_ok());
    assert_eq!(output, "ok");
}

#[test]
fn jumpifeq_takes_the_branch_on_equal_values() {
    let instructions = vec![
        instr(
            Opcode::JUMPIFEQ,
            vec![Arg::Label("taken".to_string()), Arg::Int(1), Arg::Int(1)],
            1,
        ),
        instr(Opcode::WRITE, vec![Arg::Str("no".to_string())], 2),
        instr(Opcode::LABEL, vec![Arg::Label("taken".to_string())], 3),
        instr(Opcode::WRITE, vec![Arg::Str("yes".to_string())], 4),
    ];
    let (result, output) = run(instructions, "");
    assert!(result.is_ok());
    assert_eq!(output, "yes");
}

#[test]
fn jumpifneq_does_not_branch_on_equal_values() {
    let instructions = vec![
        instr(
            Opcode::JUMPIFNEQ,
            vec![Arg::Label("skip".to_string()), Arg::Int(1), Arg::Int(1)],
            1,
        ),
        instr(Opcode::WRITE, vec![Arg::Str("fell-through".to_string())], 2),
        instr(Opcode::LABEL, vec![Arg::Label("skip".to_string())], 3),
    ];
    let (result, output) = run(instructions, "");
    assert!(result.is_ok());
    assert_eq!(output, "fell-through");
}

#[test]
fn jump_to_unknown_label_exits_52() {
    let instructions = vec![instr(
        Opcode::JUMP,
        vec![Arg::Label("nowhere".to_string())],
        1,
    )];
    let (result, _) = run(instructions, "");
    assert_eq!(result.unwrap_err().exit_code(), 52);
}

#[test]
fn exit_in_range_terminates_with_that_code() {
    let instructions = vec![instr(Opcode::EXIT, vec![Arg::Int(7)], 1)];
    let (result, _) = run(instructions, "");
    assert_eq!(result.unwrap_err().exit_code(), 7);
}

#[test]
fn exit_out_of_range_is_invalid_operand_value() {
    let instructions = vec![instr(Opcode::EXIT, vec![Arg::Int(50)], 1)];
    let (result, _) = run(instructions, "");
    assert_eq!(result.unwrap_err().exit_code(), 57);
}

#[test]
fn duplicate_label_rejected_before_execution_starts() {
    let instructions = vec![
        instr(Opcode::LABEL, vec![Arg::Label("a".to_string())], 1),
        instr(Opcode::LABEL, vec![Arg::Label("a".to_string())], 2),
    ];
    let err = crate::label::LabelTable::build(&instructions).unwrap_err();
    assert_eq!(err.exit_code(), 52);
}

#[test]
fn return_with_empty_call_stack_is_missing_value() {
    let instructions = vec![instr(Opcode::RETURN, vec![], 1)];
    let (result, _) = run(instructions, "");
    assert_eq!(result.unwrap_err().exit_code(), 56);
}

#[test]
fn label_is_a_no_op() {
    let instructions = vec![
        instr(Opcode::LABEL, vec![Arg::Label("here".to_string())], 1),
        instr(Opcode::WRITE, vec![gf("missing")], 2),
    ];
    // reaching WRITE with an undeclared variable confirms LABEL itself did nothing
    let (result, _) = run(instructions, "");
    assert_eq!(result.unwrap_err().exit_code(), 54);
}
