use std::error::Error;

use clap::Parser;
use log::debug;

use formula::Formula;

use crate::config::Config;

mod config;

/// Evaluates an arithmetic formula, substituting named variables first
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Assigns a variable as `name=value`, overriding APP_VARIABLES__<NAME>
    #[arg(short, long = "var", value_parser = parse_variable)]
    variables: Vec<(String, f64)>,

    /// Reject malformed expressions instead of evaluating a best-effort tree
    #[arg(short, long)]
    strict: bool,

    /// Print the parsed tree as JSON before the result
    #[arg(short, long)]
    ast: bool,

    expression: String,
}

fn parse_variable(arg: &str) -> Result<(String, f64), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, found \"{}\"", arg))?;
    let value = value
        .trim()
        .parse()
        .map_err(|e| format!("invalid value for \"{}\": {}", name, e))?;
    Ok((name.trim().to_string(), value))
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let mut config = Config::from_env()?;
    if args.strict {
        config.formula.parser.strict = true;
    }
    config.variables.extend(args.variables);

    let engine = Formula::new(&config.formula);
    let substituted = formula::substitute(&args.expression, &config.variables);
    debug!("Substituted expression: {}", substituted);

    let expr = engine.parse(&substituted)?;
    if args.ast {
        println!("{}", serde_json::to_string_pretty(&expr)?);
    }

    match engine.evaluate(expr.as_ref()) {
        Some(value) => println!("{}", value),
        None => println!("absent"),
    }
    Ok(())
}
