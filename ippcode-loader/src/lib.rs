//! Loads an IPPcode23 XML program document into a linear [`Instruction`]
//! sequence plus its [`LabelTable`], enforcing the structural and arity
//! rules the execution engine assumes are already true by the time it sees
//! a program. Semantic validation beyond arity (operand typing, label
//! existence) is deferred to the engine, which discovers those in the same
//! order a programmer would hit them at runtime.

use std::fs;

use ippcode::{Arg, Error, Instruction, LabelTable, Opcode};
use roxmltree::{Document, Node};
use tracing::{debug, warn};

pub fn load_from_path(path: &str) -> Result<(Vec<Instruction>, LabelTable), Error> {
    let text = fs::read_to_string(path).map_err(|source| Error::InvalidFile {
        path: path.to_string(),
        source,
    })?;
    load_from_str(&text)
}

pub fn load_from_str(text: &str) -> Result<(Vec<Instruction>, LabelTable), Error> {
    let document = Document::parse(text).map_err(|e| Error::InvalidXmlFormat(e.to_string()))?;
    let mut instructions = parse_instructions(document.root_element())?;
    instructions.sort_by_key(|i| i.order);
    check_unique_orders(&instructions)?;
    if !instructions.is_empty() && instructions.iter().all(|i| i.opcode == Opcode::DEFVAR) {
        warn!("program consists only of DEFVAR instructions");
    }
    let labels = LabelTable::build(&instructions)?;
    Ok((instructions, labels))
}

fn check_unique_orders(instructions: &[Instruction]) -> Result<(), Error> {
    for pair in instructions.windows(2) {
        if pair[0].order == pair[1].order {
            return Err(Error::InvalidXmlStructure(format!(
                "duplicate instruction order: {}",
                pair[0].order
            )));
        }
    }
    Ok(())
}

fn parse_instructions(root: Node) -> Result<Vec<Instruction>, Error> {
    root.children()
        .filter(Node::is_element)
        .map(parse_instruction)
        .collect()
}

fn parse_instruction(node: Node) -> Result<Instruction, Error> {
    if node.tag_name().name() != "instruction" {
        return Err(Error::InvalidXmlStructure(format!(
            "expected <instruction>, found <{}>",
            node.tag_name().name()
        )));
    }

    let order = node
        .attribute("order")
        .ok_or_else(|| Error::InvalidXmlStructure("instruction missing order".to_string()))?
        .parse::<u32>()
        .map_err(|_| Error::InvalidXmlStructure("order must be a positive integer".to_string()))?;
    if order == 0 {
        return Err(Error::InvalidXmlStructure(
            "order must be a positive integer".to_string(),
        ));
    }

    let opcode_text = node
        .attribute("opcode")
        .ok_or_else(|| Error::InvalidXmlStructure("instruction missing opcode".to_string()))?;
    let opcode = Opcode::parse(opcode_text)
        .ok_or_else(|| Error::InvalidXmlStructure(format!("unknown opcode: {}", opcode_text)))?;

    let args = parse_args(node, opcode)?;
    debug!(order, ?opcode, "loaded instruction");
    Ok(Instruction::new(opcode, args, order))
}

fn parse_args(node: Node, opcode: Opcode) -> Result<Vec<Arg>, Error> {
    let mut children: Vec<Node> = node.children().filter(Node::is_element).collect();
    children.sort_by_key(|n| n.tag_name().name().to_string());

    if children.len() != opcode.arity() {
        return Err(Error::InvalidXmlStructure(format!(
            "{:?} expects {} argument(s), found {}",
            opcode,
            opcode.arity(),
            children.len()
        )));
    }

    children
        .iter()
        .enumerate()
        .map(|(i, child)| {
            let expected_tag = format!("arg{}", i + 1);
            if child.tag_name().name() != expected_tag {
                return Err(Error::InvalidXmlStructure(format!(
                    "expected <{}>, found <{}>",
                    expected_tag,
                    child.tag_name().name()
                )));
            }
            let kind = child
                .attribute("type")
                .ok_or_else(|| Error::InvalidXmlStructure("argument missing type".to_string()))?;
            let raw = child.text().unwrap_or("");
            let text = if kind == "string" { raw } else { raw.trim() };
            Arg::decode(kind, text)
        })
        .collect()
}
