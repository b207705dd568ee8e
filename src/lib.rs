pub mod arg;
pub mod engine;
pub mod error;
pub mod frame;
pub mod instruction;
pub mod io;
pub mod label;
pub mod opcode;
pub mod value;

pub use arg::{Arg, VarRef};
pub use engine::Engine;
pub use error::Error;
pub use frame::{Frame, FrameHolder, Scope};
pub use instruction::Instruction;
pub use io::InputStream;
pub use label::LabelTable;
pub use opcode::Opcode;
pub use value::Value;
