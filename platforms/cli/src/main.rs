use clap::Parser;
use std::error::Error;
use std::io::{self, Read};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use unitape::{programs, Halt, Program, ProgramLoader, Step, StepEvent, TraceSink, TuringMachine};

/// Multiplies two positive integers on a unary Turing machine.
#[derive(Parser)]
#[command(author, version, about, long_about = None, arg_required_else_help = true)]
#[command(after_help = "EXAMPLES:
  unitape-cli 3x4
  unitape-cli --steps --program programs/multiplication.tm '2 x 3'
  cat programs/multiplication.tm | unitape-cli 5x5")]
struct Cli {
    /// The multiplication to run, written `a x b`
    #[arg(value_parser = parse_expression)]
    expression: Operands,

    /// Bytecode program file. Read from stdin when piped, otherwise the built-in program is used
    #[arg(short, long)]
    program: Option<PathBuf>,

    /// Print each step of the execution
    #[arg(short, long)]
    steps: bool,

    /// Pause after each printed step, in milliseconds
    #[arg(long, default_value_t = 0)]
    delay: u64,

    /// Give up after this many steps
    #[arg(long)]
    max_steps: Option<usize>,

    /// Print the result and final configuration as JSON
    #[arg(long, conflicts_with = "steps")]
    json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Operands {
    a: usize,
    b: usize,
}

/// Parse an "a x b" expression with two positive integers.
fn parse_expression(s: &str) -> Result<Operands, String> {
    let parts: Vec<&str> = s.split(['x', 'X']).collect();
    if parts.len() != 2 {
        return Err(format!("Invalid expression '{s}', expected a x b (e.g. 3x4)"));
    }

    let parse = |part: &str| -> Result<usize, String> {
        let n = part
            .trim()
            .parse::<usize>()
            .map_err(|e| format!("Invalid operand '{}': {e}", part.trim()))?;
        if n == 0 {
            return Err("Operands must be positive".to_string());
        }
        Ok(n)
    };

    Ok(Operands {
        a: parse(parts[0])?,
        b: parse(parts[1])?,
    })
}

/// Prints every step: its number, the transition, the tape and a pointer under the head.
struct StepPrinter {
    delay: Duration,
}

impl TraceSink for StepPrinter {
    fn on_step(&mut self, event: &StepEvent<'_>) {
        let tape: String = event.tape.iter().collect();
        let pointer: String = (0..=event.head)
            .map(|i| if i == event.head { '^' } else { ' ' })
            .collect();

        println!("Step: {}", event.step);
        println!("{}", event.transition);
        println!("{}", tape);
        println!("{}", pointer);

        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
    }
}

/// Initialize logging on stderr. `RUST_LOG` overrides the default `warn` filter.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Loads the program from the given file, then from stdin, and finally falls back to the
/// built-in multiplication program.
fn load_program(cli: &Cli) -> Result<Program, Box<dyn Error>> {
    if let Some(path) = &cli.program {
        return Ok(ProgramLoader::load_program(path)?);
    }

    if atty::isnt(atty::Stream::Stdin) {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        if !buffer.trim().is_empty() {
            debug!(bytes = buffer.len(), "read program from stdin");
            return Ok(ProgramLoader::load_program_from_string(&buffer)?);
        }
    }

    Ok(programs::multiplication()?)
}

fn main() -> Result<(), Box<dyn Error>> {
    init_logging();
    let cli = Cli::parse();

    let program = load_program(&cli)?;
    let Operands { a, b } = cli.expression;
    let tape = programs::multiplication_tape(a, b);
    debug!(%tape, transitions = program.len(), "starting machine");

    let mut machine = TuringMachine::new(program, &tape);
    let outcome = match (cli.steps, cli.max_steps) {
        (true, limit) => {
            let mut printer = StepPrinter {
                delay: Duration::from_millis(cli.delay),
            };
            machine.run_with(&mut printer, limit)
        }
        (false, Some(limit)) => machine.run_for(limit),
        (false, None) => machine.run(),
    };

    if let Step::Halt(Halt::StepLimit(limit)) = outcome {
        return Err(format!("Machine did not halt within {} steps", limit).into());
    }

    let result = machine.result();
    if cli.json {
        let report = serde_json::json!({
            "a": a,
            "b": b,
            "result": result,
            "configuration": machine.configuration(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        if cli.steps {
            println!("{}", machine.tape_string());
        }
        println!();
        println!("Result: {}", result);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_expression() {
        assert_eq!(parse_expression("3x4"), Ok(Operands { a: 3, b: 4 }));
        assert_eq!(parse_expression(" 2 x 7 "), Ok(Operands { a: 2, b: 7 }));
        assert_eq!(parse_expression("5X1"), Ok(Operands { a: 5, b: 1 }));
    }

    #[test]
    fn test_parse_expression_rejects_bad_input() {
        assert!(parse_expression("3").is_err());
        assert!(parse_expression("3x4x5").is_err());
        assert!(parse_expression("ax4").is_err());
        assert!(parse_expression("0x4").is_err());
        assert!(parse_expression("3x-1").is_err());
    }

    #[test]
    fn test_cli_arguments() {
        let cli =
            Cli::try_parse_from(["unitape-cli", "--steps", "--max-steps", "50", "2x3"]).unwrap();
        assert_eq!(cli.expression, Operands { a: 2, b: 3 });
        assert!(cli.steps);
        assert_eq!(cli.max_steps, Some(50));

        assert!(Cli::try_parse_from(["unitape-cli", "--json", "--steps", "2x3"]).is_err());
    }
}
