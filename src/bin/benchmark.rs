use anyhow::Result;
use monkey::{
    evaluate_program, Compiler, Environment, Lexer, Parser, Program,
    VirtualMachine,
};
use std::thread;
use std::time::{Duration, Instant};

struct Benchmark {
    name: &'static str,
    source: &'static str,
    /// The evaluator recurses on the host stack, so the deepest programs
    /// only run on the VM.
    evaluator_enabled: bool,
}

const BENCHMARKS: &[Benchmark] = &[
    Benchmark {
        name: "recursion (100 calls)",
        source: r#"
let count = fn(x) {
    if (x == 0) { return 0; }
    1 + count(x - 1);
};
count(100);
"#,
        evaluator_enabled: true,
    },
    Benchmark {
        name: "arithmetic over locals",
        source: r#"
let compute = fn(n) { let a = 1; let b = 2; let c = 3; let d = 4; (a + b) * (c + d) + n; };
compute(1) + compute(2) + compute(3) + compute(4) + compute(5) + compute(6) + compute(7) + compute(8);
"#,
        evaluator_enabled: true,
    },
    Benchmark {
        name: "closure calls",
        source: "let newAdder = fn(a, b) { fn(c) { a + b + c }; }; let adder = newAdder(1, 2); adder(8) + adder(9) + adder(10);",
        evaluator_enabled: true,
    },
    Benchmark {
        name: "array builtins",
        source: r#"
let arr = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
let headSum = fn(a) { first(a) + first(rest(a)) + first(rest(rest(a))); };
headSum(arr) + headSum(rest(arr));
"#,
        evaluator_enabled: true,
    },
    Benchmark {
        name: "fibonacci(25)",
        source: r#"
let fibonacci = fn(x) {
    if (x < 2) { x } else { fibonacci(x - 1) + fibonacci(x - 2) }
};
fibonacci(25);
"#,
        evaluator_enabled: false,
    },
];

const ITERATIONS: u32 = 100;

fn parse(source: &str) -> Result<Program> {
    let mut lexer = Lexer::new(source);
    let tokens = lexer.tokenize()?;
    let mut parser = Parser::new(&tokens);
    parser.parse()
}

fn time_evaluator(program: &Program, iterations: u32) -> Result<Duration> {
    let start = Instant::now();
    for _ in 0..iterations {
        let environment = Environment::new_rc(None);
        evaluate_program(program, environment)?;
    }
    Ok(start.elapsed())
}

fn time_vm(program: &Program, iterations: u32) -> Result<Duration> {
    let mut compiler = Compiler::new(program);
    let bytecode = compiler.compile()?;

    let mut total = Duration::ZERO;
    for _ in 0..iterations {
        let mut vm = VirtualMachine::new(bytecode.constants.clone());
        let start = Instant::now();
        vm.run(&bytecode.instructions)?;
        total += start.elapsed();
    }
    Ok(total)
}

fn per_iteration_ms(total: Duration, iterations: u32) -> f64 {
    total.as_secs_f64() / iterations as f64 * 1000.0
}

fn run_benchmarks() -> Result<()> {
    println!("=== Evaluator vs VM ({} iterations) ===\n", ITERATIONS);

    for benchmark in BENCHMARKS {
        println!("{}:", benchmark.name);
        let program = parse(benchmark.source)?;

        let iterations = if benchmark.evaluator_enabled {
            ITERATIONS
        } else {
            1
        };
        let vm_time = time_vm(&program, iterations)?;
        println!(
            "  VM:        {:.3}ms/iter",
            per_iteration_ms(vm_time, iterations)
        );

        if benchmark.evaluator_enabled {
            let eval_time = time_evaluator(&program, ITERATIONS)?;
            println!(
                "  Evaluator: {:.3}ms/iter",
                per_iteration_ms(eval_time, ITERATIONS)
            );
            println!(
                "  VM speedup: {:.2}x",
                eval_time.as_secs_f64() / vm_time.as_secs_f64()
            );
        } else {
            println!("  Evaluator: skipped (recursion too deep)");
        }
        println!();
    }

    Ok(())
}

fn main() -> Result<()> {
    let builder = thread::Builder::new().stack_size(32 * 1024 * 1024);
    let handle = builder
        .spawn(run_benchmarks)
        .expect("failed to spawn benchmark thread");
    handle.join().expect("benchmark thread panicked")
}
