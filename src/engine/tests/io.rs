use super::{gf, instr, run};
use crate::arg::Arg;
use crate::opcode::Opcode;

fn read(ty: &str, stdin: &str) -> String {
    let instructions = vec![
        instr(Opcode::DEFVAR, vec![gf("x")], 1),
        instr(Opcode::READ, vec![gf("x"), Arg::Type(ty.to_string())], 2),
        instr(Opcode::WRITE, vec![gf("x")], 3),
    ];
    let (result, output) = run(instructions, stdin);
    assert!(result.is_ok(), "{:?}", result);
    output
}

#[test]
fn read_int_parses_a_well_formed_line() {
    assert_eq!(read("int", "42\n"), "42");
}

#[test]
fn read_int_on_malformed_text_yields_nil() {
    assert_eq!(read("int", "not-a-number\n"), "");
}

#[test]
fn read_on_end_of_stream_yields_nil() {
    assert_eq!(read("int", ""), "");
    assert_eq!(read("string", ""), "");
}

#[test]
fn read_bool_is_case_insensitive_and_defaults_false() {
    assert_eq!(read("bool", "TrUe\n"), "true");
    assert_eq!(read("bool", "nope\n"), "false");
}

#[test]
fn read_string_does_not_coerce_the_literal_true_to_a_bool() {
    assert_eq!(read("string", "true\n"), "true");
}

#[test]
fn read_nil_type_is_rejected_at_execution_time() {
    let instructions = vec![
        instr(Opcode::DEFVAR, vec![gf("x")], 1),
        instr(Opcode::READ, vec![gf("x"), Arg::Type("nil".to_string())], 2),
    ];
    let (result, _) = run(instructions, "anything\n");
    assert_eq!(result.unwrap_err().exit_code(), 53);
}
