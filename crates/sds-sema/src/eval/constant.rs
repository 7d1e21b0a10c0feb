use std::fmt;

use num_bigint::BigInt;
use num_traits::{ToPrimitive, Zero};
use sds_core::{NodeId, SyntaxTree};

/// Result of partial evaluation.
///
/// Equality is structural. Floats compare with IEEE semantics, so
/// `Float(0.0) == Float(-0.0)` while `NaN` equals nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Boolean(bool),
    Int(BigInt),
    Float(f64),
    String(String),
    EnumVariant {
        variant: NodeId,
        arguments: Vec<Constant>,
    },
    List(Vec<Constant>),
    Null,
    NotEvaluated,
}

impl Constant {
    pub fn int(value: i64) -> Self {
        Constant::Int(BigInt::from(value))
    }

    pub fn is_evaluated(&self) -> bool {
        !matches!(self, Constant::NotEvaluated)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Constant::Int(_) | Constant::Float(_))
    }

    /// `0`, `0.0`, and `-0.0`.
    pub fn is_zero(&self) -> bool {
        match self {
            Constant::Int(value) => value.is_zero(),
            Constant::Float(value) => *value == 0.0,
            _ => false,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Constant::Int(value) => value.to_f64(),
            Constant::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_big_int(&self) -> Option<&BigInt> {
        match self {
            Constant::Int(value) => Some(value),
            _ => None,
        }
    }

    pub fn display<'a>(&'a self, tree: &'a SyntaxTree) -> ConstantDisplay<'a> {
        ConstantDisplay {
            constant: self,
            tree,
            quote_strings: true,
        }
    }

    /// Rendering inside a template string: strings are inserted unquoted.
    pub fn to_interpolation_string(&self, tree: &SyntaxTree) -> String {
        ConstantDisplay {
            constant: self,
            tree,
            quote_strings: false,
        }
        .to_string()
    }
}

pub struct ConstantDisplay<'a> {
    constant: &'a Constant,
    tree: &'a SyntaxTree,
    quote_strings: bool,
}

impl fmt::Display for ConstantDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.constant {
            Constant::Boolean(value) => write!(f, "{value}"),
            Constant::Int(value) => write!(f, "{value}"),
            Constant::Float(value) => write!(f, "{value}"),
            Constant::String(value) if self.quote_strings => write!(f, "{value:?}"),
            Constant::String(value) => f.write_str(value),
            Constant::EnumVariant { variant, arguments } => {
                f.write_str(self.tree.name(*variant).unwrap_or("?"))?;
                if arguments.is_empty() {
                    return Ok(());
                }
                f.write_str("(")?;
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", argument.display(self.tree))?;
                }
                f.write_str(")")
            }
            Constant::List(elements) => {
                f.write_str("[")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", element.display(self.tree))?;
                }
                f.write_str("]")
            }
            Constant::Null => f.write_str("null"),
            Constant::NotEvaluated => f.write_str("?"),
        }
    }
}
