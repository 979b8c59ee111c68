use crate::{BuiltInFunction, Object};
use anyhow::{bail, Context, Result};
use std::{cell::RefCell, rc::Rc};

/// The registration order doubles as the `OpGetBuiltin` index space, so it
/// must stay stable.
pub fn builtin_functions() -> Vec<BuiltInFunction> {
    vec![
        builtin_len(),
        builtin_first(),
        builtin_last(),
        builtin_rest(),
        builtin_push(),
        builtin_puts(),
    ]
}

pub fn lookup_builtin(name: &str) -> Option<BuiltInFunction> {
    builtin_functions()
        .into_iter()
        .find(|builtin| builtin.name == name)
}

fn check_argument_count(args: &[Object], want: usize) -> Result<()> {
    if args.len() != want {
        bail!(
            "wrong number of arguments: want={}, got={}",
            want,
            args.len()
        );
    }
    Ok(())
}

fn builtin_len() -> BuiltInFunction {
    BuiltInFunction {
        name: "len".to_string(),
        action: Rc::new(RefCell::new(|args: Vec<Object>| {
            check_argument_count(&args, 1)?;

            let arg = args.first().context("No arguments were passed to 'len'!")?;

            match arg {
                Object::String(value) => Ok(Object::Integer(value.len() as _)),
                Object::Array(value) => Ok(Object::Integer(value.len() as _)),
                arg => bail!(
                    "argument to 'len' not supported, got {}",
                    arg.type_name()
                ),
            }
        })),
    }
}

fn builtin_first() -> BuiltInFunction {
    BuiltInFunction {
        name: "first".to_string(),
        action: Rc::new(RefCell::new(|args: Vec<Object>| {
            check_argument_count(&args, 1)?;

            let arg = args
                .first()
                .context("No arguments were passed to 'first'!")?;

            match arg {
                Object::Array(value) => {
                    Ok(value.first().cloned().unwrap_or(Object::Null))
                }
                arg => bail!(
                    "argument to 'first' must be ARRAY, got {}",
                    arg.type_name()
                ),
            }
        })),
    }
}

fn builtin_last() -> BuiltInFunction {
    BuiltInFunction {
        name: "last".to_string(),
        action: Rc::new(RefCell::new(|args: Vec<Object>| {
            check_argument_count(&args, 1)?;

            let arg = args
                .first()
                .context("No arguments were passed to 'last'!")?;

            match arg {
                Object::Array(value) => {
                    Ok(value.last().cloned().unwrap_or(Object::Null))
                }
                arg => bail!(
                    "argument to 'last' must be ARRAY, got {}",
                    arg.type_name()
                ),
            }
        })),
    }
}

fn builtin_rest() -> BuiltInFunction {
    BuiltInFunction {
        name: "rest".to_string(),
        action: Rc::new(RefCell::new(|args: Vec<Object>| {
            check_argument_count(&args, 1)?;

            let arg = args
                .first()
                .context("No arguments were passed to 'rest'!")?;

            match arg {
                Object::Array(value) if value.is_empty() => Ok(Object::Null),
                Object::Array(value) => {
                    Ok(Object::Array(value[1..].to_vec()))
                }
                arg => bail!(
                    "argument to 'rest' must be ARRAY, got {}",
                    arg.type_name()
                ),
            }
        })),
    }
}

fn builtin_push() -> BuiltInFunction {
    BuiltInFunction {
        name: "push".to_string(),
        action: Rc::new(RefCell::new(|args: Vec<Object>| {
            check_argument_count(&args, 2)?;

            let array = args
                .first()
                .context("No arguments were passed to 'push'!")?;

            let element = args
                .get(1)
                .context("Second argument not found for 'push'")?;

            match array {
                Object::Array(value) => {
                    let mut elements = value.clone();
                    elements.push(element.clone());
                    Ok(Object::Array(elements))
                }
                array => bail!(
                    "argument to 'push' must be ARRAY, got {}",
                    array.type_name()
                ),
            }
        })),
    }
}

fn builtin_puts() -> BuiltInFunction {
    BuiltInFunction {
        name: "puts".to_string(),
        action: Rc::new(RefCell::new(|args: Vec<Object>| {
            args.iter().for_each(|arg| println!("{}", arg));
            Ok(Object::Null)
        })),
    }
}
