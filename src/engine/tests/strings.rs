use super::{gf, instr, run};
use crate::arg::Arg;
use crate::opcode::Opcode;

#[test]
fn concat_and_strlen() {
    let instructions = vec![
        instr(Opcode::DEFVAR, vec![gf("s")], 1),
        instr(
            Opcode::CONCAT,
            vec![
                gf("s"),
                Arg::Str("foo".to_string()),
                Arg::Str("bar".to_string()),
            ],
            2,
        ),
        instr(Opcode::DEFVAR, vec![gf("n")], 3),
        instr(Opcode::STRLEN, vec![gf("n"), gf("s")], 4),
        instr(Opcode::WRITE, vec![gf("n")], 5),
    ];
    let (result, output) = run(instructions, "");
    assert!(result.is_ok());
    assert_eq!(output, "6");
}

#[test]
fn getchar_and_stri2int_agree_on_position() {
    let instructions = vec![
        instr(Opcode::DEFVAR, vec![gf("c")], 1),
        instr(
            Opcode::GETCHAR,
            vec![gf("c"), Arg::Str("abc".to_string()), Arg::Int(1)],
            2,
        ),
        instr(Opcode::WRITE, vec![gf("c")], 3),
        instr(Opcode::DEFVAR, vec![gf("i")], 4),
        instr(
            Opcode::STRI2INT,
            vec![gf("i"), Arg::Str("abc".to_string()), Arg::Int(1)],
            5,
        ),
        instr(Opcode::WRITE, vec![gf("i")], 6),
    ];
    let (result, output) = run(instructions, "");
    assert!(result.is_ok());
    assert_eq!(output, "b98");
}

#[test]
fn getchar_out_of_range_is_invalid_string_operation() {
    let instructions = vec![
        instr(Opcode::DEFVAR, vec![gf("c")], 1),
        instr(
            Opcode::GETCHAR,
            vec![gf("c"), Arg::Str("abc".to_string()), Arg::Int(9)],
            2,
        ),
    ];
    let (result, _) = run(instructions, "");
    assert_eq!(result.unwrap_err().exit_code(), 58);
}

#[test]
fn setchar_replaces_a_single_position() {
    let instructions = vec![
        instr(Opcode::DEFVAR, vec![gf("s")], 1),
        instr(Opcode::MOVE, vec![gf("s"), Arg::Str("abc".to_string())], 2),
        instr(
            Opcode::SETCHAR,
            vec![gf("s"), Arg::Int(1), Arg::Str("X".to_string())],
            3,
        ),
        instr(Opcode::WRITE, vec![gf("s")], 4),
    ];
    let (result, output) = run(instructions, "");
    assert!(result.is_ok());
    assert_eq!(output, "aXc");
}

#[test]
fn setchar_with_empty_source_is_invalid_string_operation() {
    let instructions = vec![
        instr(Opcode::DEFVAR, vec![gf("s")], 1),
        instr(Opcode::MOVE, vec![gf("s"), Arg::Str("abc".to_string())], 2),
        instr(
            Opcode::SETCHAR,
            vec![gf("s"), Arg::Int(1), Arg::Str(String::new())],
            3,
        ),
    ];
    let (result, _) = run(instructions, "");
    assert_eq!(result.unwrap_err().exit_code(), 58);
}

#[test]
fn int2char_rejects_an_invalid_code_point() {
    let instructions = vec![
        instr(Opcode::DEFVAR, vec![gf("c")], 1),
        instr(Opcode::INT2CHAR, vec![gf("c"), Arg::Int(0x110000)], 2),
    ];
    let (result, _) = run(instructions, "");
    assert_eq!(result.unwrap_err().exit_code(), 58);
}
