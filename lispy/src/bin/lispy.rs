use lispy::{Config, EvalErr, Form, Interpreter};
use std::path::PathBuf;

// deep non-tail recursion should hit the depth limit before the OS stack
const STACK_SIZE: usize = 256 * 1024 * 1024;
const MAX_DEPTH: usize = 50_000;

struct Options {
    libraries: Vec<PathBuf>,
    config: Config,
    expr: Option<String>,
    script: Option<PathBuf>,
}

fn usage() {
    println!("Usage: lispy [options] [script]");
    println!("Options:");
    println!("  -h, --help: Print this help message");
    println!("  --load <file>: Load a library before running (repeatable)");
    println!("  --max-depth <n>: Nested evaluation limit (default: {})", MAX_DEPTH);
    println!("  --no-prelude: Start without the Scheme prelude");
    println!("  -e <expr>: Evaluate an expression and print its value");
}

fn parse_args() -> Result<Options, String> {
    let mut args = pico_args::Arguments::from_env();

    if args.contains(["-h", "--help"]) {
        usage();
        std::process::exit(0);
    }

    let libraries = args.values_from_str::<_, PathBuf>("--load")
        .map_err(|e| e.to_string())?;
    let max_depth = match args.opt_value_from_str::<_, usize>("--max-depth") {
        Ok(Some(depth)) => depth,
        Ok(None) => MAX_DEPTH,
        Err(e) => return Err(e.to_string()),
    };
    let prelude = !args.contains("--no-prelude");
    let expr = args.opt_value_from_str::<_, String>("-e").map_err(|e| e.to_string())?;
    let script = args.opt_free_from_str::<PathBuf>().map_err(|e| e.to_string())?;

    let rest = args.finish();
    if !rest.is_empty() {
        return Err(format!("unexpected arguments: {:?}", rest));
    }
    Ok(Options{libraries, config: Config{max_depth, prelude}, expr, script})
}

fn run(options: Options) -> Result<(), EvalErr> {
    let interp = Interpreter::with_config(options.config);
    for lib in options.libraries.iter() {
        interp.load_library_file(lib)?;
    }
    let result = match (options.expr, options.script) {
        (Some(expr), _) => interp.run_script(&expr)?,
        (None, Some(script)) => {
            let text = std::fs::read_to_string(&script)
                .map_err(|e| EvalErr::Io(format!("{}: {}", script.display(), e)))?;
            interp.run_script(&text)?
        },
        (None, None) => {
            return interp.repl("~> ").map_err(|e| EvalErr::Io(e.to_string()));
        },
    };
    if result != Form::Void {
        println!("{}", result);
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let options = match parse_args() {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{}", e);
            usage();
            std::process::exit(2);
        },
    };
    let worker = std::thread::Builder::new()
        .name(format!("lispy"))
        .stack_size(STACK_SIZE)
        .spawn(move || run(options).map_err(|e| e.to_string()));
    let outcome = match worker {
        Ok(handle) => handle.join(),
        Err(e) => {
            eprintln!("failed to start interpreter: {}", e);
            std::process::exit(1);
        },
    };
    match outcome {
        Ok(Ok(())) => (),
        Ok(Err(e)) => {
            eprintln!("{}", e);
            std::process::exit(1);
        },
        Err(_) => std::process::exit(101),
    }
}
