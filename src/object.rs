use crate::{
    evaluator::Environment,
    flatten, hash,
    parser::{Block, Identifier},
};
use anyhow::{bail, Result};
use std::{
    cell::RefCell,
    collections::HashMap,
    fmt::{self, Display, Formatter, Result as FmtResult},
    rc::Rc,
};

#[derive(Clone)]
pub struct BuiltInFunction {
    pub name: String,
    pub action: Rc<RefCell<dyn Fn(Vec<Object>) -> Result<Object>>>,
}

impl fmt::Debug for BuiltInFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuiltInFunction")
            .field("name", &self.name)
            .finish()
    }
}

impl PartialEq for BuiltInFunction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// A content-derived identity for the hashable object variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashKey {
    pub object_type: &'static str,
    pub value: u64,
}

#[derive(Debug, PartialEq, Clone)]
pub struct HashPair {
    pub key: Object,
    pub value: Object,
}

#[derive(Debug, PartialEq, Clone)]
pub struct CompiledFunction {
    pub instructions: Vec<u8>,
    pub num_locals: usize,
    pub num_parameters: usize,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Closure {
    pub function: Rc<CompiledFunction>,
    pub free: Vec<Object>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Object {
    Null,
    Integer(i64),
    Boolean(bool),
    String(String),
    Array(Vec<Object>),
    Hash(HashMap<HashKey, HashPair>),
    Function(Vec<Identifier>, Block, Rc<RefCell<Environment>>),
    CompiledFunction(Rc<CompiledFunction>),
    Closure(Closure),
    BuiltInFunction(BuiltInFunction),
    Return(Box<Object>),
}

impl Object {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "NULL",
            Self::Integer(_) => "INTEGER",
            Self::Boolean(_) => "BOOLEAN",
            Self::String(_) => "STRING",
            Self::Array(_) => "ARRAY",
            Self::Hash(_) => "HASH",
            Self::Function(_, _, _) => "FUNCTION",
            Self::CompiledFunction(_) => "COMPILED_FUNCTION",
            Self::Closure(_) => "CLOSURE",
            Self::BuiltInFunction(_) => "BUILTIN",
            Self::Return(_) => "RETURN_VALUE",
        }
    }

    pub fn hash_key(&self) -> Result<HashKey> {
        let value = match self {
            Self::Integer(value) => *value as u64,
            Self::Boolean(boolean) => *boolean as u64,
            Self::String(string) => hash(string.as_str()),
            object => bail!("unusable as hash key: {}", object.type_name()),
        };
        Ok(HashKey {
            object_type: self.type_name(),
            value,
        })
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Boolean(boolean) => *boolean,
            _ => true,
        }
    }
}

impl Display for Object {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        let object = match self {
            Self::Null => "null".to_string(),
            Self::Integer(integer) => integer.to_string(),
            Self::Boolean(boolean) => boolean.to_string(),
            Self::String(string) => string.to_string(),
            Self::Array(objects) => format!("[{}]", flatten(objects, ", ")),
            Self::Hash(map) => {
                let pairs = map
                    .values()
                    .map(|pair| format!("{}: {}", pair.key, pair.value))
                    .collect::<Vec<_>>();
                format!("{{{}}}", pairs.join(", "))
            }
            Self::Function(parameters, body, _environment) => {
                format!(
                    "fn({}) {{ {} }}",
                    parameters.join(", "),
                    flatten(body, "\n"),
                )
            }
            Self::CompiledFunction(_) => "<compiled fn>".to_string(),
            Self::Closure(_) => "<closure>".to_string(),
            Self::BuiltInFunction(builtin_function) => {
                format!("BuiltIn function '{}'", builtin_function.name)
            }
            Self::Return(value) => value.to_string(),
        };
        write!(f, "{}", object)
    }
}
