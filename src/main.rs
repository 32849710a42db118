//! LineScript CLI and REPL
//!
//! Usage:
//!   linescript run <file.ls>     - Execute a LineScript file
//!   linescript check <file.ls>   - Compile without running
//!   linescript repl              - Start interactive REPL

use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use clap::{Parser, Subcommand};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

use linescript::{compile, Program, ScriptError, VERSION, VM};

#[derive(Parser, Debug)]
#[command(name = "linescript", version, about = "Interpreter for the LineScript language")]
struct Cli {
    /// Log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Execute a LineScript file
    Run {
        file: PathBuf,

        /// Print the loaded program before running it
        #[arg(long)]
        dump: bool,

        /// Report elapsed wall time on exit
        #[arg(long)]
        time: bool,
    },
    /// Parse, desugar and load a file without running it
    Check {
        file: PathBuf,

        #[arg(long)]
        dump: bool,
    },
    /// Start the interactive REPL
    Repl,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let code = match cli.command {
        Command::Run { file, dump, time } => run_file(&file, dump, time),
        Command::Check { file, dump } => check_file(&file, dump),
        Command::Repl => {
            run_repl();
            0
        }
    };
    process::exit(code);
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "linescript=debug",
        _ => "linescript=trace",
    };
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}

fn read_source(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) => {
            eprintln!("{}: cannot read file '{}': {}", "error".red(), path.display(), e);
            None
        }
    }
}

fn report(err: ScriptError, source: &str) {
    let err = err.with_source(source);
    eprintln!("{}", err.to_string().red());
}

fn load(path: &Path, dump: bool) -> Option<(String, Program)> {
    let source = read_source(path)?;
    match compile(&source) {
        Ok(program) => {
            if dump {
                eprintln!("{}", program.disassemble(&path.display().to_string()).dimmed());
            }
            Some((source, program))
        }
        Err(e) => {
            report(e, &source);
            None
        }
    }
}

fn run_file(path: &Path, dump: bool, time: bool) -> i32 {
    let Some((source, program)) = load(path, dump) else {
        return 1;
    };

    let start = Instant::now();
    let code = match VM::new().run(&program) {
        Ok(code) => code,
        Err(e) => {
            report(e, &source);
            1
        }
    };

    if time {
        eprintln!(
            "{} exited with code {} in {} ms",
            path.display().to_string().cyan(),
            code,
            start.elapsed().as_millis()
        );
    }
    debug!(code, "exit");
    code
}

fn check_file(path: &Path, dump: bool) -> i32 {
    match load(path, dump) {
        Some((_, program)) => {
            println!("{} {} ({} slots)", "ok".green().bold(), path.display(), program.len());
            0
        }
        None => 1,
    }
}

fn run_repl() {
    println!(
        "{} {} - {}",
        "LineScript".cyan().bold(),
        VERSION.cyan(),
        "statements accumulate until you type run".dimmed()
    );
    println!("Type {} to exit, {} for help\n", "exit".yellow(), "help".yellow());

    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("{}: cannot start REPL: {}", "error".red(), e);
            return;
        }
    };

    let mut buffer: Vec<String> = Vec::new();

    loop {
        match rl.readline(&format!("{} ", "ls>".green().bold())) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                match trimmed {
                    "exit" | "quit" => {
                        println!("{}", "Goodbye!".cyan());
                        break;
                    }
                    "help" => print_repl_help(),
                    "clear" => {
                        buffer.clear();
                        println!("{}", "Buffer cleared.".dimmed());
                    }
                    "list" => {
                        for (index, text) in buffer.iter().enumerate() {
                            println!("{} {}", format!("{:4}", index + 1).dimmed(), text);
                        }
                    }
                    "run" => {
                        let source = buffer.join("\n");
                        match compile(&source) {
                            Ok(program) => match VM::new().run(&program) {
                                Ok(code) => println!("{} {}", "=>".dimmed(), code.to_string().cyan()),
                                Err(e) => report(e, &source),
                            },
                            Err(e) => report(e, &source),
                        }
                    }
                    _ => buffer.push(line.clone()),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "^C".dimmed());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye!".cyan());
                break;
            }
            Err(err) => {
                eprintln!("{}: {:?}", "error".red(), err);
                break;
            }
        }
    }
}

fn print_repl_help() {
    println!("{}", "REPL Commands:".yellow());
    println!("  run          Execute the buffered program");
    println!("  list         Show the buffered lines");
    println!("  clear        Empty the buffer");
    println!("  exit, quit   Exit the REPL");
    println!("  help         Show this help\n");
    println!("{}", "Language Examples:".yellow());
    println!("  var x = 10;");
    println!("  for (i = 0; i < 3; i++) {{ printl(i); }}");
    println!("  func add(a, b) {{ var r = a; r += b; return r; }}");
    println!("  add(1, 2) >> x;");
}
