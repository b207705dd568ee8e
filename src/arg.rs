use crate::error::Error;
use crate::frame::Scope;

/// A `F@name` variable reference, resolved against a frame at execution time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VarRef {
    pub scope: Scope,
    pub name: String,
}

impl VarRef {
    pub fn parse(text: &str) -> Result<VarRef, Error> {
        let (prefix, name) = text.split_once('@').ok_or_else(|| {
            Error::InvalidXmlStructure(format!("malformed variable reference: {}", text))
        })?;
        let scope = Scope::parse(prefix)
            .ok_or_else(|| Error::InvalidFrame(format!("unknown frame prefix: {}", prefix)))?;
        Ok(VarRef {
            scope,
            name: name.to_string(),
        })
    }
}

/// An instruction argument, fully decoded at load time. Only `Var` defers
/// anything to runtime (the frame contents aren't known yet).
#[derive(Clone, Debug, PartialEq)]
pub enum Arg {
    Var(VarRef),
    Int(i64),
    Bool(bool),
    Str(String),
    Nil,
    Type(String),
    Label(String),
}

impl Arg {
    pub fn decode(kind: &str, text: &str) -> Result<Arg, Error> {
        match kind {
            "var" => Ok(Arg::Var(VarRef::parse(text)?)),
            "int" => Ok(Arg::Int(parse_int(text)?)),
            "bool" => match text {
                "true" => Ok(Arg::Bool(true)),
                "false" => Ok(Arg::Bool(false)),
                other => Err(Error::InvalidXmlStructure(format!(
                    "invalid bool literal: {}",
                    other
                ))),
            },
            "string" => Ok(Arg::Str(decode_string_escapes(text)?)),
            "nil" => {
                if text == "nil" {
                    Ok(Arg::Nil)
                } else {
                    Err(Error::InvalidXmlStructure(format!(
                        "invalid nil literal: {}",
                        text
                    )))
                }
            }
            "type" => match text {
                "int" | "bool" | "string" | "nil" => Ok(Arg::Type(text.to_string())),
                other => Err(Error::InvalidOperands(format!(
                    "not a type name: {}",
                    other
                ))),
            },
            "label" => Ok(Arg::Label(text.to_string())),
            other => Err(Error::InvalidXmlStructure(format!(
                "unknown argument kind: {}",
                other
            ))),
        }
    }
}

/// Decimal, `0x`, `0o`, and `0b`, matching the original's `int(x, base=0)`.
pub(crate) fn parse_int(text: &str) -> Result<i64, Error> {
    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    let value = if let Some(digits) = unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
    {
        i64::from_str_radix(digits, 16)
    } else if let Some(digits) = unsigned
        .strip_prefix("0o")
        .or_else(|| unsigned.strip_prefix("0O"))
    {
        i64::from_str_radix(digits, 8)
    } else if let Some(digits) = unsigned
        .strip_prefix("0b")
        .or_else(|| unsigned.strip_prefix("0B"))
    {
        i64::from_str_radix(digits, 2)
    } else {
        unsigned.parse::<i64>()
    }
    .map_err(|_| Error::InvalidXmlStructure(format!("invalid int literal: {}", text)))?;

    Ok(if negative { -value } else { value })
}

/// Expands every `\ddd` (exactly three decimal digits) into the code point
/// of value `ddd`. Any other backslash usage is passed through unchanged.
fn decode_string_escapes(text: &str) -> Result<String, Error> {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '\\' && i + 3 < chars.len() && chars[i + 1..i + 4].iter().all(|c| c.is_ascii_digit()) {
            let digits: String = chars[i + 1..i + 4].iter().collect();
            let code: u32 = digits
                .parse()
                .map_err(|_| Error::InvalidXmlStructure(format!("bad escape in: {}", text)))?;
            let ch = char::from_u32(code)
                .ok_or_else(|| Error::InvalidXmlStructure(format!("bad escape in: {}", text)))?;
            out.push(ch);
            i += 4;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_decimal_hex_octal_and_binary() {
        assert_eq!(parse_int("42").unwrap(), 42);
        assert_eq!(parse_int("-42").unwrap(), -42);
        assert_eq!(parse_int("0x2A").unwrap(), 42);
        assert_eq!(parse_int("0o52").unwrap(), 42);
        assert_eq!(parse_int("0b101010").unwrap(), 42);
    }

    #[test]
    fn string_escape_expands_three_digit_codes() {
        assert_eq!(decode_string_escapes("Hello\\032World").unwrap(), "Hello World");
    }

    #[test]
    fn string_escape_passes_through_plain_backslash() {
        assert_eq!(decode_string_escapes("a\\b").unwrap(), "a\\b");
    }

    #[test]
    fn bool_literal_requires_exact_match() {
        assert!(matches!(Arg::decode("bool", "TRUE"), Err(Error::InvalidXmlStructure(_))));
        assert!(matches!(Arg::decode("bool", "true"), Ok(Arg::Bool(true))));
    }

    #[test]
    fn var_ref_requires_known_frame_prefix() {
        assert!(VarRef::parse("GF@x").is_ok());
        assert!(VarRef::parse("XX@x").is_err());
        assert!(VarRef::parse("noat").is_err());
    }
}
