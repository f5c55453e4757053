use clap::Parser;
use polish_notation::{enumerate, parse, Direction, Notation};
use std::error::Error;
use std::process::ExitCode;

/// Parse propositional formulas and print their notations, truth tables and normal forms
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Formulas to evaluate, e.g. 'a & !b | c'
    #[arg(required = true)]
    formulas: Vec<String>,
    /// Enumerate rows from all true to all false
    #[arg(long, short, default_value_t = false)]
    descending: bool,
    /// Skip printing the truth table
    #[arg(long, short, default_value_t = false)]
    no_table: bool,
}

fn join(terms: &[u32]) -> String {
    terms
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn report(formula: &str, args: &Cli) -> Result<(), Box<dyn Error>> {
    let parsed = parse(formula)?;
    println!("PN : {}", parsed.tree.render(Notation::Polish));
    println!("RPN: {}", parsed.tree.render(Notation::ReversePolish));

    let direction = if args.descending {
        Direction::Descending
    } else {
        Direction::Ascending
    };
    let table = enumerate(&parsed.tree, &parsed.symbols.ordered(), direction)?;
    if !args.no_table {
        print!("{table}");
    }
    println!("∧ {}", join(&table.cnf()));
    println!("∨ {}", join(&table.pdnf()));
    Ok(())
}

fn main() -> ExitCode {
    let args = Cli::parse();
    let mut status = ExitCode::SUCCESS;
    for formula in &args.formulas {
        if let Err(err) = report(formula, &args) {
            eprintln!("{formula}: {err}");
            status = ExitCode::FAILURE;
        }
    }
    status
}
