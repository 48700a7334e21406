use crate::word::Word;

use super::{Array, Variable, View};

/// Operand accepted by memory and jump operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// Raw value or address pushed as-is.
    Value(Word),
    Scalar(Variable),
    Array(Array),
}

impl From<Word> for Operand {
    fn from(value: Word) -> Self {
        Operand::Value(value)
    }
}

impl From<u64> for Operand {
    fn from(value: u64) -> Self {
        Operand::Value(Word::from(value))
    }
}

impl From<Variable> for Operand {
    fn from(var: Variable) -> Self {
        Operand::Scalar(var)
    }
}

impl From<&Variable> for Operand {
    fn from(var: &Variable) -> Self {
        Operand::Scalar(var.clone())
    }
}

impl From<Array> for Operand {
    fn from(arr: Array) -> Self {
        Operand::Array(arr)
    }
}

impl From<&Array> for Operand {
    fn from(arr: &Array) -> Self {
        Operand::Array(arr.clone())
    }
}

impl From<View> for Operand {
    fn from(view: View) -> Self {
        match view {
            View::Scalar(var) => Operand::Scalar(var),
            View::Array(arr) => Operand::Array(arr),
        }
    }
}

impl From<&View> for Operand {
    fn from(view: &View) -> Self {
        view.clone().into()
    }
}

/// Nested values stored element-wise into an array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Values {
    Word(Word),
    List(Vec<Values>),
}

impl Values {
    /// Whether the nesting matches `shape` exactly at every level.
    pub fn matches_shape(&self, shape: &[usize]) -> bool {
        match (self, shape.split_first()) {
            (Values::Word(_), None) => true,
            (Values::List(items), Some((&extent, rest))) => {
                items.len() == extent && items.iter().all(|item| item.matches_shape(rest))
            }
            _ => false,
        }
    }

    /// Leaves in row-major order.
    pub fn flatten(&self) -> Vec<&Word> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a Word>) {
        match self {
            Values::Word(word) => out.push(word),
            Values::List(items) => {
                for item in items {
                    item.collect_leaves(out);
                }
            }
        }
    }
}

impl From<Word> for Values {
    fn from(word: Word) -> Self {
        Values::Word(word)
    }
}

impl From<&Word> for Values {
    fn from(word: &Word) -> Self {
        Values::Word(word.clone())
    }
}

impl From<u64> for Values {
    fn from(value: u64) -> Self {
        Values::Word(Word::from(value))
    }
}

impl<T: Into<Values>> From<Vec<T>> for Values {
    fn from(items: Vec<T>) -> Self {
        Values::List(items.into_iter().map(Into::into).collect())
    }
}
