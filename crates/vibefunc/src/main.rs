//! Diagnostic catalog CLI.
//!
//! The compiler's registry is the single source of truth for every
//! VFxxxx code; this binary serves it: `explain` prints one code's
//! documentation, `codes` lists the catalog, optionally as JSON for the
//! docs generator.

use clap::{Parser, Subcommand};

use vibefun_common::{registry, Phase, Severity};

#[derive(Parser)]
#[command(name = "vibefunc", about = "The vibefun compiler driver", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Explain a diagnostic code with its example pair.
    Explain {
        /// A code such as VF4400.
        code: String,
    },
    /// List registered diagnostic codes.
    Codes {
        /// Restrict to one phase (lexer, parser, desugarer, typechecker,
        /// modules, codegen, runtime).
        #[arg(long)]
        phase: Option<String>,
        /// Only warnings.
        #[arg(long)]
        warnings: bool,
        /// Emit the catalog as JSON.
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    match cli.command {
        Command::Explain { code } => {
            let code = code.to_uppercase();
            match registry().explain(&code) {
                Some(text) => print!("{text}"),
                None => {
                    eprintln!("unknown diagnostic code `{code}`");
                    std::process::exit(1);
                }
            }
        }
        Command::Codes {
            phase,
            warnings,
            json,
        } => {
            let defs = match phase.as_deref().map(parse_phase) {
                Some(Some(phase)) => registry().by_phase(phase),
                Some(None) => {
                    eprintln!("unknown phase");
                    std::process::exit(1);
                }
                None => {
                    let mut all = registry().by_severity(Severity::Error);
                    all.extend(registry().by_severity(Severity::Warning));
                    all.sort_by_key(|d| d.code);
                    all
                }
            };
            let defs: Vec<_> = defs
                .into_iter()
                .filter(|d| !warnings || d.severity == Severity::Warning)
                .collect();
            if json {
                match serde_json::to_string_pretty(&defs) {
                    Ok(text) => println!("{text}"),
                    Err(err) => {
                        eprintln!("cannot serialize catalog: {err}");
                        std::process::exit(1);
                    }
                }
            } else {
                for def in defs {
                    println!("{}  {:<8}  {}", def.code, def.severity.to_string(), def.title);
                }
            }
        }
    }
}

fn parse_phase(name: &str) -> Option<Phase> {
    match name {
        "lexer" => Some(Phase::Lexer),
        "parser" => Some(Phase::Parser),
        "desugarer" => Some(Phase::Desugarer),
        "typechecker" => Some(Phase::Typechecker),
        "modules" => Some(Phase::Modules),
        "codegen" => Some(Phase::Codegen),
        "runtime" => Some(Phase::Runtime),
        _ => None,
    }
}
