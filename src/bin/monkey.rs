use std::fs;

use anyhow::{Context, Result};
use clap::Parser;
use monkey::{
    evaluate_program, Compiler, Environment, Lexer, Parser as MonkeyParser,
    VirtualMachine,
};

#[derive(Parser)]
#[command(name = "monkey")]
#[command(about = "The Monkey programming language")]
struct Cli {
    file: String,

    /// Run on the tree-walking evaluator instead of the bytecode VM
    #[arg(long)]
    eval: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let source = fs::read_to_string(&cli.file)
        .with_context(|| format!("Failed to read file: {}", cli.file))?;

    let mut lexer = Lexer::new(&source);
    let tokens = lexer.tokenize().context("Lexer error")?;

    let mut parser = MonkeyParser::new(&tokens);
    let statements = parser.parse().context("Parser error")?;

    if cli.eval {
        let environment = Environment::new_rc(None);
        evaluate_program(&statements, environment).context("Runtime error")?;
        return Ok(());
    }

    let mut compiler = Compiler::new(&statements);
    let bytecode = compiler.compile().context("Compiler error")?;

    let mut vm = VirtualMachine::new(bytecode.constants);
    vm.run(&bytecode.instructions).context("Runtime error")?;

    Ok(())
}
