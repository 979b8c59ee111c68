use crate::{
    builtins::lookup_builtin,
    object::{HashPair, Object},
    parser::{Expression, Literal, Operator, Statement},
};
use anyhow::{bail, Result};
use std::{cell::RefCell, collections::HashMap, rc::Rc};

#[derive(Debug, Default, PartialEq, Clone)]
pub struct Environment {
    pub bindings: HashMap<String, Object>,
    pub outer: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    pub fn new(outer: Option<Rc<RefCell<Environment>>>) -> Self {
        Self {
            outer,
            ..Default::default()
        }
    }

    pub fn new_rc(outer: Option<Rc<RefCell<Environment>>>) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new(outer)))
    }

    pub fn set_binding(&mut self, binding: String, value: Object) {
        self.bindings.insert(binding, value);
    }

    pub fn get_binding(&self, binding: &str) -> Option<Object> {
        if let Some(value) = self.bindings.get(binding) {
            return Some(value.clone());
        }

        if let Some(outer) = self.outer.as_ref() {
            return outer.borrow().get_binding(binding);
        }

        None
    }

    /// Rebinds the nearest definition of `binding`, walking the outer chain.
    pub fn assign_binding(&mut self, binding: &str, value: Object) -> Result<()> {
        if self.bindings.contains_key(binding) {
            self.bindings.insert(binding.to_string(), value);
            return Ok(());
        }

        if let Some(outer) = self.outer.as_ref() {
            return outer.borrow_mut().assign_binding(binding, value);
        }

        bail!("identifier not found: {}", binding)
    }
}

pub fn evaluate_program(
    statements: &[Statement],
    environment: Rc<RefCell<Environment>>,
) -> Result<Object> {
    let result = evaluate_statements(statements, environment)?;
    Ok(match result {
        Object::Return(value) => *value,
        result => result,
    })
}

pub fn evaluate_statements(
    statements: &[Statement],
    environment: Rc<RefCell<Environment>>,
) -> Result<Object> {
    let mut result = Object::Null;
    for statement in statements.iter() {
        match evaluate_statement(statement, environment.clone())? {
            Object::Return(value) => return Ok(Object::Return(value)),
            object => result = object,
        }
    }
    Ok(result)
}

fn evaluate_statement(
    statement: &Statement,
    environment: Rc<RefCell<Environment>>,
) -> Result<Object> {
    Ok(match statement {
        Statement::Let(identifier, expression) => {
            let value = evaluate_expression(expression, environment.clone())?;
            environment
                .borrow_mut()
                .set_binding(identifier.to_string(), value);
            Object::Null
        }
        Statement::Assign(identifier, expression) => {
            let value = evaluate_expression(expression, environment.clone())?;
            environment.borrow_mut().assign_binding(identifier, value)?;
            Object::Null
        }
        Statement::Expression(expression) => {
            evaluate_expression(expression, environment)?
        }
        Statement::Return(expression) => {
            Object::Return(Box::new(evaluate_expression(expression, environment)?))
        }
    })
}

fn evaluate_expressions(
    expressions: &[Expression],
    environment: Rc<RefCell<Environment>>,
) -> Result<Vec<Object>> {
    expressions
        .iter()
        .map(|expression| evaluate_expression(expression, environment.clone()))
        .collect()
}

fn evaluate_expression(
    expression: &Expression,
    environment: Rc<RefCell<Environment>>,
) -> Result<Object> {
    Ok(match expression {
        Expression::Function(parameters, body) => {
            Object::Function(parameters.to_vec(), body.to_vec(), environment)
        }
        Expression::Call(function, arguments) => {
            evaluate_call_expression(environment, function, arguments)?
        }
        Expression::Index(left_expression, index_expression) => {
            evaluate_index_expression(environment, left_expression, index_expression)?
        }
        Expression::Identifier(identifier) => {
            evaluate_identifier(environment, identifier)?
        }
        Expression::Literal(literal) => evaluate_literal(literal, environment)?,
        Expression::Boolean(boolean) => Object::Boolean(*boolean),
        Expression::Prefix(operator, expression) => {
            evaluate_prefix_expression(operator, expression, environment)?
        }
        Expression::Infix(left_expression, operator, right_expression) => {
            evaluate_infix_expression(left_expression, operator, right_expression, environment)?
        }
        Expression::If(condition, consequence, alternative) => {
            evaluate_if_expression(condition, consequence, alternative, environment)?
        }
    })
}

fn evaluate_literal(
    literal: &Literal,
    environment: Rc<RefCell<Environment>>,
) -> Result<Object> {
    Ok(match literal {
        Literal::Integer(integer) => Object::Integer(*integer),
        Literal::String(string) => Object::String(string.to_string()),
        Literal::Array(elements) => {
            let elements = evaluate_expressions(elements, environment)?;
            Object::Array(elements)
        }
        Literal::HashMap(pairs) => {
            let mut hashmap = HashMap::new();
            for (key_expression, value_expression) in pairs.iter() {
                let key = evaluate_expression(key_expression, environment.clone())?;
                let value =
                    evaluate_expression(value_expression, environment.clone())?;
                let hash_key = key.hash_key()?;
                hashmap.insert(hash_key, HashPair { key, value });
            }
            Object::Hash(hashmap)
        }
    })
}

fn evaluate_identifier(
    environment: Rc<RefCell<Environment>>,
    identifier: &str,
) -> Result<Object> {
    if let Some(object) = environment.borrow().get_binding(identifier) {
        return Ok(object);
    }

    match lookup_builtin(identifier) {
        Some(builtin) => Ok(Object::BuiltInFunction(builtin)),
        None => bail!("identifier not found: {}", identifier),
    }
}

fn evaluate_call_expression(
    environment: Rc<RefCell<Environment>>,
    function: &Expression,
    arguments: &[Expression],
) -> Result<Object> {
    let function = evaluate_expression(function, environment.clone())?;
    let arguments = evaluate_expressions(arguments, environment)?;

    match function {
        Object::Function(parameters, body, function_environment) => {
            if arguments.len() != parameters.len() {
                bail!(
                    "wrong number of arguments: want={}, got={}",
                    parameters.len(),
                    arguments.len()
                );
            }
            let call_environment =
                Environment::new_rc(Some(function_environment));
            for (name, argument) in
                parameters.into_iter().zip(arguments.into_iter())
            {
                call_environment.borrow_mut().set_binding(name, argument);
            }
            let result = evaluate_statements(&body, call_environment)?;
            Ok(match result {
                Object::Return(value) => *value,
                result => result,
            })
        }
        Object::BuiltInFunction(function) => {
            let action = function.action.borrow();
            action(arguments)
        }
        function => bail!("not a function: {}", function.type_name()),
    }
}

fn evaluate_index_expression(
    environment: Rc<RefCell<Environment>>,
    left_expression: &Expression,
    index_expression: &Expression,
) -> Result<Object> {
    let left = evaluate_expression(left_expression, environment.clone())?;
    let index = evaluate_expression(index_expression, environment)?;

    match (left, index) {
        (Object::Array(elements), Object::Integer(index)) => {
            if index < 0 {
                return Ok(Object::Null);
            }
            match elements.get(index as usize) {
                Some(element) => Ok(element.clone()),
                None => Ok(Object::Null),
            }
        }
        (Object::Hash(hashmap), index) => {
            let hash_key = index.hash_key()?;
            Ok(hashmap
                .get(&hash_key)
                .map(|pair| pair.value.clone())
                .unwrap_or(Object::Null))
        }
        (left, _) => {
            bail!("index operator not supported: {}", left.type_name())
        }
    }
}

fn evaluate_prefix_expression(
    operator: &Operator,
    expression: &Expression,
    environment: Rc<RefCell<Environment>>,
) -> Result<Object> {
    let value = evaluate_expression(expression, environment)?;
    match operator {
        Operator::Not => Ok(Object::Boolean(!value.is_truthy())),
        Operator::Negate => match value {
            Object::Integer(value) => Ok(Object::Integer(value.wrapping_neg())),
            value => bail!("unknown operator: -{}", value.type_name()),
        },
        operator => bail!("unknown operator: {}", operator),
    }
}

fn evaluate_infix_expression(
    left_expression: &Expression,
    operator: &Operator,
    right_expression: &Expression,
    environment: Rc<RefCell<Environment>>,
) -> Result<Object> {
    let left_value = evaluate_expression(left_expression, environment.clone())?;
    let right_value = evaluate_expression(right_expression, environment)?;

    // Integer x Integer
    if let (Object::Integer(lhs), Object::Integer(rhs)) =
        (&left_value, &right_value)
    {
        return Ok(match operator {
            Operator::Add => Object::Integer(lhs.wrapping_add(*rhs)),
            Operator::Subtract => Object::Integer(lhs.wrapping_sub(*rhs)),
            Operator::Multiply => Object::Integer(lhs.wrapping_mul(*rhs)),
            Operator::Divide => {
                if *rhs == 0 {
                    bail!("division by zero");
                }
                Object::Integer(lhs.wrapping_div(*rhs))
            }
            Operator::LessThan => Object::Boolean(lhs < rhs),
            Operator::GreaterThan => Object::Boolean(lhs > rhs),
            Operator::Equal => Object::Boolean(lhs == rhs),
            Operator::NotEqual => Object::Boolean(lhs != rhs),
            operator => {
                bail!("unknown operator: INTEGER {} INTEGER", operator)
            }
        });
    }

    // Boolean x Boolean
    if let (Object::Boolean(lhs), Object::Boolean(rhs)) =
        (&left_value, &right_value)
    {
        return Ok(match operator {
            Operator::Equal => Object::Boolean(lhs == rhs),
            Operator::NotEqual => Object::Boolean(lhs != rhs),
            operator => {
                bail!("unknown operator: BOOLEAN {} BOOLEAN", operator)
            }
        });
    }

    // String x String
    if let (Object::String(lhs), Object::String(rhs)) =
        (&left_value, &right_value)
    {
        return Ok(match operator {
            Operator::Equal => Object::Boolean(lhs == rhs),
            Operator::NotEqual => Object::Boolean(lhs != rhs),
            Operator::Add => Object::String(format!("{}{}", lhs, rhs)),
            operator => bail!("unknown operator: STRING {} STRING", operator),
        });
    }

    bail!(
        "type mismatch: {} {} {}",
        left_value.type_name(),
        operator,
        right_value.type_name()
    )
}

fn evaluate_if_expression(
    condition: &Expression,
    consequence: &[Statement],
    alternative: &Option<Vec<Statement>>,
    environment: Rc<RefCell<Environment>>,
) -> Result<Object> {
    let condition = evaluate_expression(condition, environment.clone())?;

    if condition.is_truthy() {
        evaluate_statements(consequence, environment)
    } else {
        match alternative.as_ref() {
            Some(alternative) => evaluate_statements(alternative, environment),
            None => Ok(Object::Null),
        }
    }
}
