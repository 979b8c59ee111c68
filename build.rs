fn main() {
    // The tree-walking evaluator recurses once per nested call frame, so
    // deeply recursive programs need more than the default thread stack.
    let stack_size: u64 = 64 * 1024 * 1024;

    let target_os = std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    let target_env = std::env::var("CARGO_CFG_TARGET_ENV").unwrap_or_default();

    match (target_os.as_str(), target_env.as_str()) {
        ("windows", "msvc") => {
            println!("cargo:rustc-link-arg-bins=/STACK:{}", stack_size);
        }
        ("windows", "gnu") => {
            println!("cargo:rustc-link-arg-bins=-Wl,--stack,{}", stack_size);
        }
        ("linux", _) => {
            println!(
                "cargo:rustc-link-arg-bins=-Wl,-z,stack-size={}",
                stack_size
            );
        }
        ("macos", _) => {
            println!(
                "cargo:rustc-link-arg-bins=-Wl,-stack_size,{:#x}",
                stack_size
            );
        }
        _ => {}
    }
}
