use std::collections::HashMap;

use crate::error::Error;
use crate::instruction::Instruction;
use crate::opcode::Opcode;

/// Maps label name to instruction index, built in one linear pass before
/// execution starts. Labels are static; there are no first-class label
/// values, so one pre-scan is always sufficient.
#[derive(Default, Debug)]
pub struct LabelTable {
    labels: HashMap<String, usize>,
}

impl LabelTable {
    pub fn build(instructions: &[Instruction]) -> Result<LabelTable, Error> {
        let mut labels = HashMap::new();
        for (index, instruction) in instructions.iter().enumerate() {
            if instruction.opcode != Opcode::LABEL {
                continue;
            }
            let name = match &instruction.args[0] {
                crate::arg::Arg::Label(name) => name.clone(),
                _ => {
                    return Err(Error::InvalidXmlStructure(
                        "LABEL argument must be a label".to_string(),
                    ))
                }
            };
            if labels.insert(name.clone(), index).is_some() {
                return Err(Error::InvalidSemantics(format!(
                    "label {} defined more than once",
                    name
                )));
            }
        }
        Ok(LabelTable { labels })
    }

    pub fn resolve(&self, name: &str) -> Result<usize, Error> {
        self.labels
            .get(name)
            .copied()
            .ok_or_else(|| Error::InvalidSemantics(format!("undefined label: {}", name)))
    }
}
