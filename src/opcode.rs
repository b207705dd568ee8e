use ippcode_derive::EnumFromStr;
use ippcode_util::EnumFromStr;

/// The 34 IPPcode23 instruction mnemonics.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, EnumFromStr)]
pub enum Opcode {
    MOVE,
    CREATEFRAME,
    PUSHFRAME,
    POPFRAME,
    DEFVAR,
    CALL,
    RETURN,
    PUSHS,
    POPS,
    ADD,
    SUB,
    MUL,
    IDIV,
    LT,
    GT,
    EQ,
    AND,
    OR,
    NOT,
    INT2CHAR,
    STRI2INT,
    READ,
    WRITE,
    CONCAT,
    STRLEN,
    GETCHAR,
    SETCHAR,
    TYPE,
    LABEL,
    JUMP,
    JUMPIFEQ,
    JUMPIFNEQ,
    EXIT,
    DPRINT,
    BREAK,
}

impl Opcode {
    /// Case-insensitive, per the loader's opcode-matching rule.
    pub fn parse(text: &str) -> Option<Opcode> {
        <Opcode as EnumFromStr>::from_str(&text.to_ascii_uppercase()).ok()
    }

    pub fn arity(self) -> usize {
        use Opcode::*;
        match self {
            CREATEFRAME | PUSHFRAME | POPFRAME | RETURN | BREAK => 0,
            CALL | PUSHS | POPS | DEFVAR | LABEL | JUMP | WRITE | EXIT | DPRINT => 1,
            MOVE | NOT | INT2CHAR | READ | STRLEN | TYPE => 2,
            ADD | SUB | MUL | IDIV | LT | GT | EQ | AND | OR | STRI2INT | CONCAT | GETCHAR
            | SETCHAR | JUMPIFEQ | JUMPIFNEQ => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Opcode::parse("move"), Some(Opcode::MOVE));
        assert_eq!(Opcode::parse("MOVE"), Some(Opcode::MOVE));
        assert_eq!(Opcode::parse("MoVe"), Some(Opcode::MOVE));
    }

    #[test]
    fn unknown_opcode_parses_to_none() {
        assert_eq!(Opcode::parse("FROBNICATE"), None);
    }

    #[test]
    fn arity_matches_the_loader_table() {
        assert_eq!(Opcode::BREAK.arity(), 0);
        assert_eq!(Opcode::CALL.arity(), 1);
        assert_eq!(Opcode::MOVE.arity(), 2);
        assert_eq!(Opcode::ADD.arity(), 3);
    }
}
