use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use nodefuse_runtime::{evaluate, fib_program, Strategy};

/// Node-fusion interpreter driver.
///
/// Evaluates the fixed recursive Fibonacci program under one of four node
/// representations — the same semantics at different dispatch costs.
///
/// EXAMPLES:
///     nodefuse run 30                        Evaluate with the generic nodes
///     nodefuse run --strategy leaf-fusion 30 Evaluate with fused leaves
///     nodefuse compare 25                    Cross-check every strategy
#[derive(Parser)]
#[command(name = "nodefuse")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate fib(N) with one strategy and print the result
    Run {
        /// Evaluation strategy: generic, const-fusion, leaf-fusion, or direct-call
        #[arg(long, short = 's', default_value = "generic")]
        strategy: Strategy,
        /// Argument to the program
        #[arg(default_value_t = 30)]
        n: u32,
    },
    /// Run every strategy plus the native reference and compare results
    Compare {
        /// Argument to the program
        #[arg(default_value_t = 30)]
        n: u32,
    },
}

/// Native recursive reference used as the comparison oracle.
fn fib_native(n: u32) -> u32 {
    if n < 2 {
        n
    } else {
        fib_native(n - 1).wrapping_add(fib_native(n - 2))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { strategy, n } => {
            let program = fib_program(strategy);
            println!("{}", evaluate(&program, n));
        }
        Commands::Compare { n } => {
            let expected = fib_native(n);
            println!("{:<13} {expected}", "native");

            let mut diverged = false;
            for strategy in Strategy::ALL {
                let result = strategy.fib(n);
                if result == expected {
                    println!("{:<13} {result}", strategy.name());
                } else {
                    diverged = true;
                    println!(
                        "{:<13} {result}  (expected {expected})",
                        strategy.name()
                    );
                }
            }

            if diverged {
                bail!("strategy results diverge from the native reference");
            }
        }
    }

    Ok(())
}
