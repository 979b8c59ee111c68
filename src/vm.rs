use crate::{
    builtins::builtin_functions,
    compiler::{read_u16, read_u8, Opcode},
    object::{BuiltInFunction, Closure, CompiledFunction, HashPair, Object},
};
use anyhow::{bail, Context, Result};
use std::{collections::HashMap, rc::Rc};

pub const STACK_SIZE: usize = 2048;
pub const GLOBALS_SIZE: usize = 65536;
pub const MAX_FRAMES: usize = 1024;

#[derive(Debug, Clone)]
pub struct Frame {
    pub closure: Closure,
    pub ip: usize,
    pub base_pointer: usize,
}

impl Frame {
    pub fn new(closure: Closure, base_pointer: usize) -> Self {
        Self {
            closure,
            ip: 0,
            base_pointer,
        }
    }

    fn instructions(&self) -> &[u8] {
        &self.closure.function.instructions
    }
}

pub struct VirtualMachine {
    pub constants: Vec<Object>,
    pub globals: Vec<Object>,
    pub stack: Vec<Object>,
    pub stack_pointer: usize,
    frames: Vec<Frame>,
}

impl VirtualMachine {
    pub fn new(constants: Vec<Object>) -> Self {
        Self::new_with_globals_store(constants, vec![Object::Null; GLOBALS_SIZE])
    }

    /// Runs against an existing globals store, so REPL turns share state.
    pub fn new_with_globals_store(
        constants: Vec<Object>,
        globals: Vec<Object>,
    ) -> Self {
        Self {
            constants,
            globals,
            stack: Vec::with_capacity(STACK_SIZE),
            stack_pointer: 0,
            frames: Vec::with_capacity(MAX_FRAMES),
        }
    }

    pub fn run(&mut self, instructions: &[u8]) -> Result<()> {
        let main_function = CompiledFunction {
            instructions: instructions.to_vec(),
            num_locals: 0,
            num_parameters: 0,
        };
        let main_closure = Closure {
            function: Rc::new(main_function),
            free: vec![],
        };
        self.push_frame(Frame::new(main_closure, 0))?;

        while !self.frames.is_empty() {
            let ip = self.current_frame().ip;
            if ip >= self.current_frame().instructions().len() {
                break;
            }

            let opcode =
                Opcode::try_from(self.current_frame().instructions()[ip])?;
            self.current_frame_mut().ip += 1;

            match opcode {
                Opcode::Constant => {
                    let constant_index = self.read_u16_operand();
                    let constant = self.constants[constant_index].clone();
                    self.push(constant)?;
                }
                Opcode::Pop => {
                    self.pop()?;
                }
                Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::Div => {
                    self.execute_binary_operation(opcode)?;
                }
                Opcode::True => {
                    self.push(Object::Boolean(true))?;
                }
                Opcode::False => {
                    self.push(Object::Boolean(false))?;
                }
                Opcode::Null => {
                    self.push(Object::Null)?;
                }
                Opcode::Equal | Opcode::NotEqual | Opcode::GreaterThan => {
                    self.execute_comparison(opcode)?;
                }
                Opcode::Minus => {
                    let operand = self.pop()?;
                    match operand {
                        Object::Integer(value) => {
                            self.push(Object::Integer(value.wrapping_neg()))?
                        }
                        operand => bail!(
                            "unsupported type for negation: {}",
                            operand.type_name()
                        ),
                    }
                }
                Opcode::Bang => {
                    let operand = self.pop()?;
                    self.push(Object::Boolean(!operand.is_truthy()))?;
                }
                Opcode::Jump => {
                    let target = self.read_u16_operand();
                    self.current_frame_mut().ip = target;
                }
                Opcode::JumpNotTruthy => {
                    let target = self.read_u16_operand();
                    let condition = self.pop()?;
                    if !condition.is_truthy() {
                        self.current_frame_mut().ip = target;
                    }
                }
                Opcode::SetGlobal => {
                    let global_index = self.read_u16_operand();
                    let value = self.pop()?;
                    self.globals[global_index] = value;
                }
                Opcode::GetGlobal => {
                    let global_index = self.read_u16_operand();
                    let value = self.globals[global_index].clone();
                    self.push(value)?;
                }
                Opcode::SetLocal => {
                    let local_index = self.read_u8_operand();
                    let base_pointer = self.current_frame().base_pointer;
                    let value = self.pop()?;
                    self.stack[base_pointer + local_index] = value;
                }
                Opcode::GetLocal => {
                    let local_index = self.read_u8_operand();
                    let base_pointer = self.current_frame().base_pointer;
                    let value = self.stack[base_pointer + local_index].clone();
                    self.push(value)?;
                }
                Opcode::GetBuiltin => {
                    let builtin_index = self.read_u8_operand();
                    let builtin = builtin_functions()
                        .into_iter()
                        .nth(builtin_index)
                        .context("unknown builtin index")?;
                    self.push(Object::BuiltInFunction(builtin))?;
                }
                Opcode::GetFree => {
                    let free_index = self.read_u8_operand();
                    let value =
                        self.current_frame().closure.free[free_index].clone();
                    self.push(value)?;
                }
                Opcode::CurrentClosure => {
                    let closure = self.current_frame().closure.clone();
                    self.push(Object::Closure(closure))?;
                }
                Opcode::Array => {
                    let num_elements = self.read_u16_operand();
                    let start = self.stack_pointer - num_elements;
                    let elements = self.stack[start..self.stack_pointer].to_vec();
                    self.stack_pointer = start;
                    self.push(Object::Array(elements))?;
                }
                Opcode::Hash => {
                    let num_elements = self.read_u16_operand();
                    let start = self.stack_pointer - num_elements;
                    let mut hash = HashMap::new();
                    for index in (start..self.stack_pointer).step_by(2) {
                        let key = self.stack[index].clone();
                        let value = self.stack[index + 1].clone();
                        let hash_key = key.hash_key()?;
                        hash.insert(hash_key, HashPair { key, value });
                    }
                    self.stack_pointer = start;
                    self.push(Object::Hash(hash))?;
                }
                Opcode::Index => {
                    let index = self.pop()?;
                    let left = self.pop()?;
                    self.execute_index_expression(left, index)?;
                }
                Opcode::Call => {
                    let num_args = self.read_u8_operand();
                    self.execute_call(num_args)?;
                }
                Opcode::ReturnValue => {
                    let return_value = self.pop()?;
                    let frame = self.pop_frame()?;
                    if self.frames.is_empty() {
                        // A top-level return ends the program with its value.
                        self.push(return_value)?;
                        self.pop()?;
                        break;
                    }
                    self.stack_pointer = frame.base_pointer - 1;
                    self.push(return_value)?;
                }
                Opcode::Return => {
                    let frame = self.pop_frame()?;
                    if self.frames.is_empty() {
                        self.push(Object::Null)?;
                        self.pop()?;
                        break;
                    }
                    self.stack_pointer = frame.base_pointer - 1;
                    self.push(Object::Null)?;
                }
                Opcode::Closure => {
                    let constant_index = self.read_u16_operand();
                    let num_free = self.read_u8_operand();

                    let function = match self.constants[constant_index].clone()
                    {
                        Object::CompiledFunction(function) => function,
                        constant => {
                            bail!("not a function: {}", constant.type_name())
                        }
                    };

                    let start = self.stack_pointer - num_free;
                    let free = self.stack[start..self.stack_pointer].to_vec();
                    self.stack_pointer = start;

                    self.push(Object::Closure(Closure { function, free }))?;
                }
            }
        }

        Ok(())
    }

    pub fn last_popped(&self) -> Result<Object> {
        self.stack
            .get(self.stack_pointer)
            .cloned()
            .context("stack is empty")
    }

    fn execute_binary_operation(&mut self, opcode: Opcode) -> Result<()> {
        let right = self.pop()?;
        let left = self.pop()?;
        let result = match (&left, opcode, &right) {
            (Object::Integer(l), Opcode::Add, Object::Integer(r)) => {
                Object::Integer(l.wrapping_add(*r))
            }
            (Object::Integer(l), Opcode::Sub, Object::Integer(r)) => {
                Object::Integer(l.wrapping_sub(*r))
            }
            (Object::Integer(l), Opcode::Mul, Object::Integer(r)) => {
                Object::Integer(l.wrapping_mul(*r))
            }
            (Object::Integer(l), Opcode::Div, Object::Integer(r)) => {
                if *r == 0 {
                    bail!("division by zero");
                }
                Object::Integer(l.wrapping_div(*r))
            }
            (Object::String(l), Opcode::Add, Object::String(r)) => {
                Object::String(format!("{}{}", l, r))
            }
            _ => bail!(
                "unsupported types for binary operation: {} {}",
                left.type_name(),
                right.type_name()
            ),
        };
        self.push(result)
    }

    fn execute_comparison(&mut self, opcode: Opcode) -> Result<()> {
        let right = self.pop()?;
        let left = self.pop()?;
        let result = match (&left, opcode, &right) {
            (Object::Integer(l), Opcode::Equal, Object::Integer(r)) => l == r,
            (Object::Integer(l), Opcode::NotEqual, Object::Integer(r)) => {
                l != r
            }
            (Object::Integer(l), Opcode::GreaterThan, Object::Integer(r)) => {
                l > r
            }
            (Object::Boolean(l), Opcode::Equal, Object::Boolean(r)) => l == r,
            (Object::Boolean(l), Opcode::NotEqual, Object::Boolean(r)) => {
                l != r
            }
            (Object::String(l), Opcode::Equal, Object::String(r)) => l == r,
            (Object::String(l), Opcode::NotEqual, Object::String(r)) => l != r,
            _ => bail!(
                "type mismatch: {} {}",
                left.type_name(),
                right.type_name()
            ),
        };
        self.push(Object::Boolean(result))
    }

    fn execute_index_expression(
        &mut self,
        left: Object,
        index: Object,
    ) -> Result<()> {
        match (left, index) {
            (Object::Array(elements), Object::Integer(index)) => {
                if index < 0 {
                    return self.push(Object::Null);
                }
                let element = elements
                    .get(index as usize)
                    .cloned()
                    .unwrap_or(Object::Null);
                self.push(element)
            }
            (Object::Hash(hash), index) => {
                let hash_key = index.hash_key()?;
                let value = hash
                    .get(&hash_key)
                    .map(|pair| pair.value.clone())
                    .unwrap_or(Object::Null);
                self.push(value)
            }
            (left, _) => {
                bail!("index operator not supported: {}", left.type_name())
            }
        }
    }

    fn execute_call(&mut self, num_args: usize) -> Result<()> {
        let callee = self.stack[self.stack_pointer - 1 - num_args].clone();
        match callee {
            Object::Closure(closure) => self.call_closure(closure, num_args),
            Object::BuiltInFunction(builtin) => {
                self.call_builtin(builtin, num_args)
            }
            callee => bail!("calling non-function: {}", callee.type_name()),
        }
    }

    fn call_closure(&mut self, closure: Closure, num_args: usize) -> Result<()> {
        if num_args != closure.function.num_parameters {
            bail!(
                "wrong number of arguments: want={}, got={}",
                closure.function.num_parameters,
                num_args
            );
        }

        let num_locals = closure.function.num_locals;
        let base_pointer = self.stack_pointer - num_args;
        self.push_frame(Frame::new(closure, base_pointer))?;

        // Locals live above the arguments on the stack.
        self.stack_pointer = base_pointer + num_locals;
        if self.stack_pointer >= STACK_SIZE {
            bail!("stack overflow");
        }
        if self.stack.len() < self.stack_pointer {
            self.stack.resize(self.stack_pointer, Object::Null);
        }

        Ok(())
    }

    fn call_builtin(
        &mut self,
        builtin: BuiltInFunction,
        num_args: usize,
    ) -> Result<()> {
        let arguments = self.stack
            [self.stack_pointer - num_args..self.stack_pointer]
            .to_vec();

        let result = {
            let action = builtin.action.borrow();
            action(arguments)?
        };

        self.stack_pointer -= num_args + 1;
        self.push(result)
    }

    fn current_frame(&self) -> &Frame {
        &self.frames[self.frames.len() - 1]
    }

    fn current_frame_mut(&mut self) -> &mut Frame {
        let index = self.frames.len() - 1;
        &mut self.frames[index]
    }

    fn push_frame(&mut self, frame: Frame) -> Result<()> {
        if self.frames.len() >= MAX_FRAMES {
            bail!("frame overflow");
        }
        self.frames.push(frame);
        Ok(())
    }

    fn pop_frame(&mut self) -> Result<Frame> {
        self.frames.pop().context("frame underflow")
    }

    fn read_u16_operand(&mut self) -> usize {
        let frame = self.current_frame_mut();
        let operand =
            read_u16(&frame.closure.function.instructions[frame.ip..]) as usize;
        frame.ip += 2;
        operand
    }

    fn read_u8_operand(&mut self) -> usize {
        let frame = self.current_frame_mut();
        let operand =
            read_u8(&frame.closure.function.instructions[frame.ip..]) as usize;
        frame.ip += 1;
        operand
    }

    fn push(&mut self, object: Object) -> Result<()> {
        if self.stack_pointer >= STACK_SIZE {
            bail!("stack overflow");
        }
        if self.stack_pointer >= self.stack.len() {
            self.stack.push(object);
        } else {
            self.stack[self.stack_pointer] = object;
        }
        self.stack_pointer += 1;
        Ok(())
    }

    fn pop(&mut self) -> Result<Object> {
        if self.stack_pointer == 0 {
            bail!("stack underflow");
        }
        self.stack_pointer -= 1;
        Ok(self.stack[self.stack_pointer].clone())
    }
}
