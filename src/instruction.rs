use crate::arg::Arg;
use crate::opcode::Opcode;

/// One decoded instruction: an opcode, its pre-decoded argument list, and the
/// `order` it declared (kept for diagnostics; the sequence itself is already
/// sorted by the time the engine sees it).
#[derive(Clone, Debug)]
pub struct Instruction {
    pub opcode: Opcode,
    pub args: Vec<Arg>,
    pub order: u32,
}

impl Instruction {
    pub fn new(opcode: Opcode, args: Vec<Arg>, order: u32) -> Instruction {
        Instruction {
            opcode,
            args,
            order,
        }
    }
}
