use anyhow::Result;
use monkey::{
    builtin_functions, Compiler, Lexer, Object, Parser, SymbolTable,
    VirtualMachine, GLOBALS_SIZE,
};
use rustyline::{error::ReadlineError, Editor};

fn main() -> Result<()> {
    println!(
        r"
Welcome to the Monkey programming language REPL!
You may type Monkey code below for evaluation.
Enter 'exit' or press 'CTRL+C' to exit the REPL.
    "
    );

    let mut rl = Editor::<()>::new();
    if rl.load_history("history.txt").is_err() {
        println!("No previous history.");
    }

    // Constants, symbol table, and globals persist across inputs so each
    // line can build on the ones before it.
    let mut symbol_table = SymbolTable::new();
    for (index, builtin) in builtin_functions().iter().enumerate() {
        symbol_table.define_builtin(index, &builtin.name);
    }
    let mut constants: Vec<Object> = Vec::new();
    let mut globals = vec![Object::Null; GLOBALS_SIZE];

    loop {
        let readline = rl.readline(">> ");
        match readline {
            Ok(line) => match line.as_ref() {
                "exit" => break,
                line => {
                    rl.add_history_entry(line);

                    let mut lexer = Lexer::new(line);
                    let tokens = match lexer.tokenize() {
                        Ok(tokens) => tokens,
                        Err(error) => {
                            eprintln!("Error lexing: {}", error);
                            continue;
                        }
                    };

                    let mut parser = Parser::new(&tokens);
                    let program = match parser.parse() {
                        Ok(program) => program,
                        Err(error) => {
                            eprintln!("Error parsing: {}", error);
                            continue;
                        }
                    };

                    let mut compiler = Compiler::new_with_state(
                        &program,
                        symbol_table,
                        constants,
                    );
                    let result = compiler.compile();
                    symbol_table = std::mem::take(&mut compiler.symbol_table);
                    constants = std::mem::take(&mut compiler.constants);
                    let bytecode = match result {
                        Ok(bytecode) => bytecode,
                        Err(error) => {
                            eprintln!("Error compiling: {}", error);
                            continue;
                        }
                    };

                    let mut vm = VirtualMachine::new_with_globals_store(
                        bytecode.constants,
                        globals,
                    );
                    let run_result = vm.run(&bytecode.instructions);
                    let last_popped = vm.last_popped();
                    globals = vm.globals;
                    if let Err(error) = run_result {
                        eprintln!("Error running: {}", error);
                        continue;
                    }

                    match last_popped {
                        Ok(Object::Null) => {}
                        Ok(result) => println!("{}", result),
                        Err(_) => {}
                    }
                }
            },
            Err(ReadlineError::Interrupted) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    rl.save_history("history.txt")?;
    Ok(())
}
