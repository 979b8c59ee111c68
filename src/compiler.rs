use crate::{
    builtins::builtin_functions,
    object::{CompiledFunction, Object},
    parser::{Block, Expression, Literal, Operator, Statement},
};
use anyhow::{bail, Context, Result};
use std::{collections::HashMap, rc::Rc, slice::Iter};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SymbolScope {
    Global,
    Local,
    Builtin,
    Free,
    Function,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub scope: SymbolScope,
    pub index: usize,
}

#[derive(Debug, Default, Clone)]
pub struct SymbolTable {
    pub store: HashMap<String, Symbol>,
    pub num_definitions: usize,
    pub outer: Option<Box<SymbolTable>>,
    pub free_symbols: Vec<Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_enclosed(outer: SymbolTable) -> Self {
        Self {
            outer: Some(Box::new(outer)),
            ..Default::default()
        }
    }

    pub fn define(&mut self, name: &str) -> Symbol {
        let scope = if self.outer.is_some() {
            SymbolScope::Local
        } else {
            SymbolScope::Global
        };
        let symbol = Symbol {
            name: name.to_string(),
            scope,
            index: self.num_definitions,
        };
        self.store.insert(name.to_string(), symbol.clone());
        self.num_definitions += 1;
        symbol
    }

    pub fn define_builtin(&mut self, index: usize, name: &str) -> Symbol {
        let symbol = Symbol {
            name: name.to_string(),
            scope: SymbolScope::Builtin,
            index,
        };
        self.store.insert(name.to_string(), symbol.clone());
        symbol
    }

    pub fn define_function_name(&mut self, name: &str) -> Symbol {
        let symbol = Symbol {
            name: name.to_string(),
            scope: SymbolScope::Function,
            index: 0,
        };
        self.store.insert(name.to_string(), symbol.clone());
        symbol
    }

    pub fn resolve(&mut self, name: &str) -> Option<Symbol> {
        if let Some(symbol) = self.store.get(name) {
            return Some(symbol.clone());
        }
        if let Some(ref mut outer) = self.outer {
            if let Some(symbol) = outer.resolve(name) {
                if symbol.scope == SymbolScope::Global
                    || symbol.scope == SymbolScope::Builtin
                {
                    return Some(symbol);
                }
                return Some(self.define_free(symbol));
            }
        }
        None
    }

    fn define_free(&mut self, original: Symbol) -> Symbol {
        self.free_symbols.push(original.clone());
        let symbol = Symbol {
            name: original.name,
            scope: SymbolScope::Free,
            index: self.free_symbols.len() - 1,
        };
        self.store.insert(symbol.name.clone(), symbol.clone());
        symbol
    }
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Opcode {
    Constant,
    Pop,
    Add,
    Sub,
    Mul,
    Div,
    True,
    False,
    Null,
    Equal,
    NotEqual,
    GreaterThan,
    Minus,
    Bang,
    JumpNotTruthy,
    Jump,
    GetGlobal,
    SetGlobal,
    GetLocal,
    SetLocal,
    GetBuiltin,
    GetFree,
    CurrentClosure,
    Array,
    Hash,
    Index,
    Call,
    ReturnValue,
    Return,
    Closure,
}

// Indexed by opcode byte; the order must follow the enum declaration.
const OPCODES: [Opcode; 30] = [
    Opcode::Constant,
    Opcode::Pop,
    Opcode::Add,
    Opcode::Sub,
    Opcode::Mul,
    Opcode::Div,
    Opcode::True,
    Opcode::False,
    Opcode::Null,
    Opcode::Equal,
    Opcode::NotEqual,
    Opcode::GreaterThan,
    Opcode::Minus,
    Opcode::Bang,
    Opcode::JumpNotTruthy,
    Opcode::Jump,
    Opcode::GetGlobal,
    Opcode::SetGlobal,
    Opcode::GetLocal,
    Opcode::SetLocal,
    Opcode::GetBuiltin,
    Opcode::GetFree,
    Opcode::CurrentClosure,
    Opcode::Array,
    Opcode::Hash,
    Opcode::Index,
    Opcode::Call,
    Opcode::ReturnValue,
    Opcode::Return,
    Opcode::Closure,
];

impl Opcode {
    pub fn operand_widths(&self) -> &'static [usize] {
        match self {
            Self::Constant
            | Self::JumpNotTruthy
            | Self::Jump
            | Self::GetGlobal
            | Self::SetGlobal
            | Self::Array
            | Self::Hash => &[2],
            Self::GetLocal
            | Self::SetLocal
            | Self::GetBuiltin
            | Self::GetFree
            | Self::Call => &[1],
            Self::Closure => &[2, 1],
            _ => &[],
        }
    }
}

impl TryFrom<u8> for Opcode {
    type Error = anyhow::Error;

    fn try_from(byte: u8) -> Result<Self> {
        OPCODES
            .get(byte as usize)
            .copied()
            .with_context(|| format!("Unknown opcode: {}", byte))
    }
}

pub fn make(opcode: Opcode, operands: &[usize]) -> Vec<u8> {
    let mut instruction = vec![opcode as u8];
    for (operand, width) in operands.iter().zip(opcode.operand_widths()) {
        if *width == 2 {
            instruction.extend_from_slice(&(*operand as u16).to_be_bytes());
        } else {
            instruction.push(*operand as u8);
        }
    }
    instruction
}

pub fn read_u16(instructions: &[u8]) -> u16 {
    u16::from_be_bytes([instructions[0], instructions[1]])
}

pub fn read_u8(instructions: &[u8]) -> u8 {
    instructions[0]
}

pub fn read_operands(
    opcode: Opcode,
    instructions: &[u8],
) -> (Vec<usize>, usize) {
    let mut operands = Vec::new();
    let mut offset = 0;
    for width in opcode.operand_widths() {
        if *width == 2 {
            operands.push(read_u16(&instructions[offset..]) as usize);
        } else {
            operands.push(read_u8(&instructions[offset..]) as usize);
        }
        offset += width;
    }
    (operands, offset)
}

pub fn disassemble(instructions: &[u8]) -> String {
    let mut output = Vec::new();
    let mut position = 0;
    while position < instructions.len() {
        let opcode = match Opcode::try_from(instructions[position]) {
            Ok(opcode) => opcode,
            Err(error) => {
                output.push(format!("{:0>4} ERROR: {}", position, error));
                break;
            }
        };
        let (operands, read) =
            read_operands(opcode, &instructions[position + 1..]);
        let operands = operands
            .iter()
            .map(|operand| operand.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        let line = format!("{:0>4} Op{:?} {}", position, opcode, operands);
        output.push(line.trim_end().to_string());
        position += 1 + read;
    }
    output.join("\n")
}

#[derive(Default, Debug)]
pub struct Bytecode {
    pub instructions: Vec<u8>,
    pub constants: Vec<Object>,
}

impl Bytecode {
    pub fn disassemble(&self) -> String {
        disassemble(&self.instructions)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct EmittedInstruction {
    opcode: Opcode,
    position: usize,
}

#[derive(Debug, Default)]
struct CompilationScope {
    instructions: Vec<u8>,
    last_instruction: Option<EmittedInstruction>,
    previous_instruction: Option<EmittedInstruction>,
}

pub struct Compiler<'a> {
    pub statements: Iter<'a, Statement>,
    pub constants: Vec<Object>,
    pub symbol_table: SymbolTable,
    scopes: Vec<CompilationScope>,
    scope_index: usize,
}

impl<'a> Compiler<'a> {
    pub fn new(statements: &'a [Statement]) -> Self {
        let mut symbol_table = SymbolTable::new();
        for (index, builtin) in builtin_functions().iter().enumerate() {
            symbol_table.define_builtin(index, &builtin.name);
        }
        Self {
            statements: statements.iter(),
            constants: Vec::new(),
            symbol_table,
            scopes: vec![CompilationScope::default()],
            scope_index: 0,
        }
    }

    /// Resumes compilation against the symbol table and constants pool of a
    /// previous session, so REPL turns can build on one another.
    pub fn new_with_state(
        statements: &'a [Statement],
        symbol_table: SymbolTable,
        constants: Vec<Object>,
    ) -> Self {
        Self {
            statements: statements.iter(),
            constants,
            symbol_table,
            scopes: vec![CompilationScope::default()],
            scope_index: 0,
        }
    }

    pub fn compile(&mut self) -> Result<Bytecode> {
        while let Some(statement) = self.statements.next() {
            self.compile_statement(statement)?;
        }
        Ok(Bytecode {
            instructions: self.scopes[self.scope_index].instructions.clone(),
            constants: self.constants.clone(),
        })
    }

    fn compile_statement(&mut self, statement: &Statement) -> Result<()> {
        match statement {
            Statement::Let(name, value) => {
                // Binding the name first lets function literals refer to
                // themselves while their body compiles.
                if let Expression::Function(parameters, body) = value {
                    let symbol = self.symbol_table.define(name);
                    self.compile_function(Some(name), parameters, body)?;
                    self.store_symbol(&symbol);
                } else {
                    self.compile_expression(value)?;
                    let symbol = self.symbol_table.define(name);
                    self.store_symbol(&symbol);
                }
                Ok(())
            }
            Statement::Assign(name, value) => {
                let symbol = match self.symbol_table.resolve(name) {
                    Some(symbol) => symbol,
                    None => bail!("undefined variable {}", name),
                };
                match symbol.scope {
                    SymbolScope::Global | SymbolScope::Local => {
                        self.compile_expression(value)?;
                        self.store_symbol(&symbol);
                        Ok(())
                    }
                    SymbolScope::Builtin => {
                        bail!("cannot assign to builtin {}", name)
                    }
                    SymbolScope::Free | SymbolScope::Function => {
                        bail!("reassignment to captured variable: {}", name)
                    }
                }
            }
            Statement::Return(expression) => {
                self.compile_expression(expression)?;
                self.emit(Opcode::ReturnValue, &[]);
                Ok(())
            }
            Statement::Expression(expression) => {
                self.compile_expression(expression)?;
                self.emit(Opcode::Pop, &[]);
                Ok(())
            }
        }
    }

    fn compile_block(&mut self, block: &[Statement]) -> Result<()> {
        for statement in block {
            self.compile_statement(statement)?;
        }
        Ok(())
    }

    fn compile_expression(&mut self, expression: &Expression) -> Result<()> {
        match expression {
            Expression::Identifier(name) => {
                let symbol = match self.symbol_table.resolve(name) {
                    Some(symbol) => symbol,
                    None => bail!("undefined variable {}", name),
                };
                self.load_symbol(&symbol);
            }
            Expression::Literal(literal) => self.compile_literal(literal)?,
            Expression::Boolean(true) => {
                self.emit(Opcode::True, &[]);
            }
            Expression::Boolean(false) => {
                self.emit(Opcode::False, &[]);
            }
            Expression::Prefix(operator, expression) => {
                self.compile_expression(expression)?;
                match operator {
                    Operator::Not => self.emit(Opcode::Bang, &[]),
                    Operator::Negate => self.emit(Opcode::Minus, &[]),
                    operator => {
                        bail!("unknown prefix operator: {}", operator)
                    }
                };
            }
            Expression::Infix(left, operator, right) => {
                self.compile_infix(left, operator, right)?;
            }
            Expression::If(condition, consequence, alternative) => {
                self.compile_expression(condition)?;

                let jump_not_truthy_position =
                    self.emit(Opcode::JumpNotTruthy, &[9999]);

                self.compile_block(consequence)?;
                if self.last_instruction_is(Opcode::Pop) {
                    self.remove_last_pop();
                }

                let jump_position = self.emit(Opcode::Jump, &[9999]);

                let after_consequence = self.current_instructions().len();
                self.change_operand(
                    jump_not_truthy_position,
                    after_consequence,
                )?;

                match alternative {
                    Some(alternative) => {
                        self.compile_block(alternative)?;
                        if self.last_instruction_is(Opcode::Pop) {
                            self.remove_last_pop();
                        }
                    }
                    None => {
                        self.emit(Opcode::Null, &[]);
                    }
                }

                let after_alternative = self.current_instructions().len();
                self.change_operand(jump_position, after_alternative)?;
            }
            Expression::Function(parameters, body) => {
                self.compile_function(None, parameters, body)?;
            }
            Expression::Call(function, arguments) => {
                self.compile_expression(function)?;
                for argument in arguments {
                    self.compile_expression(argument)?;
                }
                self.emit(Opcode::Call, &[arguments.len()]);
            }
            Expression::Index(left, index) => {
                self.compile_expression(left)?;
                self.compile_expression(index)?;
                self.emit(Opcode::Index, &[]);
            }
        }
        Ok(())
    }

    fn compile_literal(&mut self, literal: &Literal) -> Result<()> {
        match literal {
            Literal::Integer(integer) => {
                let constant = self.add_constant(Object::Integer(*integer));
                self.emit(Opcode::Constant, &[constant]);
            }
            Literal::String(string) => {
                let constant =
                    self.add_constant(Object::String(string.to_string()));
                self.emit(Opcode::Constant, &[constant]);
            }
            Literal::Array(elements) => {
                for element in elements {
                    self.compile_expression(element)?;
                }
                self.emit(Opcode::Array, &[elements.len()]);
            }
            Literal::HashMap(pairs) => {
                // Source order is not deterministic across hash-display
                // forms, so keys are emitted in sorted order.
                let mut pairs = pairs.to_vec();
                pairs.sort_by_key(|(key, _)| key.to_string());
                for (key, value) in pairs.iter() {
                    self.compile_expression(key)?;
                    self.compile_expression(value)?;
                }
                self.emit(Opcode::Hash, &[pairs.len() * 2]);
            }
        }
        Ok(())
    }

    fn compile_infix(
        &mut self,
        left: &Expression,
        operator: &Operator,
        right: &Expression,
    ) -> Result<()> {
        if matches!(operator, Operator::LessThan) {
            self.compile_expression(right)?;
            self.compile_expression(left)?;
            self.emit(Opcode::GreaterThan, &[]);
            return Ok(());
        }

        self.compile_expression(left)?;
        self.compile_expression(right)?;

        let opcode = match operator {
            Operator::Add => Opcode::Add,
            Operator::Subtract => Opcode::Sub,
            Operator::Multiply => Opcode::Mul,
            Operator::Divide => Opcode::Div,
            Operator::GreaterThan => Opcode::GreaterThan,
            Operator::Equal => Opcode::Equal,
            Operator::NotEqual => Opcode::NotEqual,
            operator => bail!("unknown operator: {}", operator),
        };
        self.emit(opcode, &[]);

        Ok(())
    }

    fn compile_function(
        &mut self,
        name: Option<&str>,
        parameters: &[String],
        body: &Block,
    ) -> Result<()> {
        self.enter_scope();

        if let Some(name) = name {
            self.symbol_table.define_function_name(name);
        }

        for parameter in parameters {
            self.symbol_table.define(parameter);
        }

        self.compile_block(body)?;

        if self.last_instruction_is(Opcode::Pop) {
            self.replace_last_pop_with_return();
        }
        if !self.last_instruction_is(Opcode::ReturnValue) {
            self.emit(Opcode::Return, &[]);
        }

        let free_symbols = self.symbol_table.free_symbols.clone();
        let num_locals = self.symbol_table.num_definitions;
        let instructions = self.leave_scope();

        for symbol in free_symbols.iter() {
            self.load_symbol(symbol);
        }

        let function = CompiledFunction {
            instructions,
            num_locals,
            num_parameters: parameters.len(),
        };
        let constant =
            self.add_constant(Object::CompiledFunction(Rc::new(function)));
        self.emit(Opcode::Closure, &[constant, free_symbols.len()]);

        Ok(())
    }

    fn enter_scope(&mut self) {
        self.scopes.push(CompilationScope::default());
        self.scope_index += 1;

        let outer_symbol_table = std::mem::take(&mut self.symbol_table);
        self.symbol_table = SymbolTable::new_enclosed(outer_symbol_table);
    }

    fn leave_scope(&mut self) -> Vec<u8> {
        let scope = self.scopes.pop().unwrap_or_default();
        self.scope_index -= 1;

        if let Some(outer) = self.symbol_table.outer.take() {
            self.symbol_table = *outer;
        }

        scope.instructions
    }

    fn load_symbol(&mut self, symbol: &Symbol) {
        match symbol.scope {
            SymbolScope::Global => self.emit(Opcode::GetGlobal, &[symbol.index]),
            SymbolScope::Local => self.emit(Opcode::GetLocal, &[symbol.index]),
            SymbolScope::Builtin => {
                self.emit(Opcode::GetBuiltin, &[symbol.index])
            }
            SymbolScope::Free => self.emit(Opcode::GetFree, &[symbol.index]),
            SymbolScope::Function => self.emit(Opcode::CurrentClosure, &[]),
        };
    }

    fn store_symbol(&mut self, symbol: &Symbol) {
        match symbol.scope {
            SymbolScope::Global => self.emit(Opcode::SetGlobal, &[symbol.index]),
            _ => self.emit(Opcode::SetLocal, &[symbol.index]),
        };
    }

    fn emit(&mut self, opcode: Opcode, operands: &[usize]) -> usize {
        let instruction = make(opcode, operands);
        let position = self.add_instruction(&instruction);
        self.set_last_instruction(opcode, position);
        position
    }

    fn add_instruction(&mut self, instruction: &[u8]) -> usize {
        let position = self.current_instructions().len();
        self.scopes[self.scope_index]
            .instructions
            .extend_from_slice(instruction);
        position
    }

    fn set_last_instruction(&mut self, opcode: Opcode, position: usize) {
        let scope = &mut self.scopes[self.scope_index];
        scope.previous_instruction = scope.last_instruction.take();
        scope.last_instruction = Some(EmittedInstruction { opcode, position });
    }

    fn current_instructions(&self) -> &[u8] {
        &self.scopes[self.scope_index].instructions
    }

    fn last_instruction_is(&self, opcode: Opcode) -> bool {
        self.scopes[self.scope_index]
            .last_instruction
            .map(|instruction| instruction.opcode == opcode)
            .unwrap_or(false)
    }

    fn remove_last_pop(&mut self) {
        let scope = &mut self.scopes[self.scope_index];
        if let Some(last) = scope.last_instruction.take() {
            scope.instructions.truncate(last.position);
            scope.last_instruction = scope.previous_instruction.take();
        }
    }

    fn replace_last_pop_with_return(&mut self) {
        let scope = &mut self.scopes[self.scope_index];
        if let Some(last) = scope.last_instruction.as_mut() {
            scope.instructions[last.position] = Opcode::ReturnValue as u8;
            last.opcode = Opcode::ReturnValue;
        }
    }

    fn change_operand(&mut self, position: usize, operand: usize) -> Result<()> {
        let opcode = Opcode::try_from(
            self.scopes[self.scope_index].instructions[position],
        )?;
        let instruction = make(opcode, &[operand]);
        self.scopes[self.scope_index].instructions
            [position..position + instruction.len()]
            .copy_from_slice(&instruction);
        Ok(())
    }

    fn add_constant(&mut self, object: Object) -> usize {
        self.constants.push(object);
        self.constants.len() - 1
    }
}
