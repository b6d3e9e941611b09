//! Fixture generator CLI
//!
//! Usage:
//!   yaml2cxx polyglot/math.yaml -o math.cc
//!   yaml2cxx --index polyglot_math polyglot_control
//!   yaml2cxx --dump-ast "r.expr(1) + 2"

use std::env;
use std::fs;
use std::path::Path;
use std::process;

use yaml2cxx::driver;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Command-line arguments
#[derive(Debug)]
struct Args {
    /// Fixture file to generate from
    input_file: Option<String>,
    /// Output file path (stdout when absent)
    output_file: Option<String>,
    /// Fixture function names to emit an index unit for
    index_names: Option<Vec<String>>,
    /// Expression to parse and dump as JSON (for debugging the parser)
    dump_ast: Option<String>,
    /// Show help
    show_help: bool,
    /// Show version
    show_version: bool,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut parsed = Args {
            input_file: None,
            output_file: None,
            index_names: None,
            dump_ast: None,
            show_help: false,
            show_version: false,
        };

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "-h" | "--help" => parsed.show_help = true,
                "-v" | "--version" => parsed.show_version = true,
                "-o" | "--output" => {
                    i += 1;
                    if i < args.len() {
                        parsed.output_file = Some(args[i].clone());
                    }
                }
                "--index" => {
                    // everything after --index is a fixture function name
                    parsed.index_names = Some(args[i + 1..].to_vec());
                    i = args.len();
                }
                "--dump-ast" => {
                    i += 1;
                    if i < args.len() {
                        parsed.dump_ast = Some(args[i].clone());
                    }
                }
                arg if !arg.starts_with('-') => {
                    if parsed.input_file.is_none() {
                        parsed.input_file = Some(arg.to_string());
                    }
                }
                _ => {
                    eprintln!("Unknown option: {}", args[i]);
                }
            }
            i += 1;
        }

        parsed
    }
}

fn print_help() {
    println!(
        r#"yaml2cxx v{}

USAGE:
    yaml2cxx <fixture.yaml> [OPTIONS]
    yaml2cxx --index <name>...
    yaml2cxx --dump-ast <expr>

OPTIONS:
    -h, --help       Show this help message
    -v, --version    Show version information
    -o, --output     Output file path (default: stdout)
    --index          Emit the index unit calling the named fixture functions
    --dump-ast       Parse a python expression and dump its tree as JSON

EXAMPLES:
    yaml2cxx polyglot/math.yaml -o math.cc
    yaml2cxx --index polyglot_math polyglot_control -o index.cc
    yaml2cxx --dump-ast "r.expr(1) + 2"

Untranslatable cases are reported on stderr; the exit status is non-zero
if any case could not be translated.
"#,
        VERSION
    );
}

fn emit(text: &str, output_file: &Option<String>) {
    match output_file {
        Some(path) => {
            if let Err(err) = fs::write(path, text) {
                eprintln!("Error: failed to write '{}': {}", path, err);
                process::exit(1);
            }
        }
        None => print!("{}", text),
    }
}

fn main() {
    let args = Args::parse();

    if args.show_help {
        print_help();
        return;
    }

    if args.show_version {
        println!("yaml2cxx v{}", VERSION);
        return;
    }

    if let Some(source) = &args.dump_ast {
        match yaml2cxx_parser::parse_expr(source) {
            Ok(expr) => match serde_json::to_string_pretty(&expr) {
                Ok(json) => emit(&format!("{}\n", json), &args.output_file),
                Err(err) => {
                    eprintln!("Error: {}", err);
                    process::exit(1);
                }
            },
            Err(err) => {
                eprintln!("Error: {}", err);
                process::exit(1);
            }
        }
        return;
    }

    if let Some(names) = &args.index_names {
        emit(&driver::emit_index(names), &args.output_file);
        return;
    }

    let Some(input) = &args.input_file else {
        eprintln!("Error: no fixture file provided");
        eprintln!("Use --help for usage information");
        process::exit(1);
    };

    match driver::generate_file(Path::new(input)) {
        Ok(out) => {
            emit(&out.code, &args.output_file);
            if !out.is_clean() {
                process::exit(1);
            }
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            process::exit(1);
        }
    }
}
