//! impi-drv - Interpreter Driver
//!
//! The driver is the entry point and orchestrator of the pipeline:
//!
//! 1. Parse the command line into a [`Config`].
//! 2. Read the source file.
//! 3. Run the parser, which lexes, checks, and emits the instruction
//!    buffer in one pass.
//! 4. Execute the buffer on the machine with stdin/stdout attached, or
//!    dump the buffer instead when `--dump-code` was given.
//!
//! Every diagnostic prints as one line on stderr. Exit status is 0 on
//! success, 1 on any compile or runtime error, 2 on command-line misuse.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use impi_par::{Parser, Program};
use impi_vm::Vm;

/// Usage line printed on command-line misuse.
pub const USAGE: &str = "usage: impi [--dump-code] <source-file>";

/// Driver configuration, parsed by hand from the argument list.
#[derive(Debug, Clone)]
pub struct Config {
    /// The source file to interpret.
    pub source: PathBuf,

    /// Print the emitted instruction buffer instead of executing it.
    pub dump_code: bool,
}

impl Config {
    /// Parses the argument list (without the program name).
    pub fn parse(args: &[String]) -> Result<Config, String> {
        let mut source = None;
        let mut dump_code = false;

        for arg in args {
            match arg.as_str() {
                "--dump-code" => dump_code = true,
                flag if flag.starts_with('-') => {
                    return Err(format!("unknown option '{flag}'"));
                }
                path => {
                    if source.replace(PathBuf::from(path)).is_some() {
                        return Err("expected exactly one source file".to_string());
                    }
                }
            }
        }

        match source {
            Some(source) => Ok(Config { source, dump_code }),
            None => Err("missing source file".to_string()),
        }
    }
}

/// Runs one interpreter invocation end to end.
pub fn run(config: &Config) -> Result<()> {
    let source = std::fs::read_to_string(&config.source)
        .with_context(|| format!("cannot read '{}'", config.source.display()))?;

    let program = Parser::new(&source).parse()?;

    if config.dump_code {
        let stdout = io::stdout().lock();
        dump(&program, stdout)?;
        return Ok(());
    }

    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();
    let Program { code, mut pool } = program;
    let mut vm = Vm::new(stdin, stdout);
    vm.run(&code, &mut pool)?;
    Ok(())
}

/// Prints the instruction buffer, one instruction per line with its
/// index, kind, and payload.
pub fn dump(program: &Program, mut out: impl io::Write) -> io::Result<()> {
    for (index, token) in program.code.iter().enumerate() {
        writeln!(out, "{index:4}  {:<10} {}", format!("{:?}", token.kind), token.value)?;
    }
    Ok(())
}
