use anyhow::Result;
use clap::Parser;
use infix_calculator::calculator;
use log::debug;

/// Evaluates the given infix arithmetic expression
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Arguments {
    /// The expression to evaluate
    expression: String,

    /// Print the expression tree before the result
    #[clap(long)]
    tree: bool,

    #[clap(flatten)]
    verbose: clap_verbosity_flag::Verbosity,
}

fn main() -> Result<()> {
    let args = Arguments::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let tree = calculator::parse(&args.expression)?;
    debug!("parsed '{}' into: {}", args.expression, tree.render_infix());

    if args.tree {
        println!("{}", tree.render_tree());
    }

    let value = tree.evaluate()?;
    println!("{}", value);
    Ok(())
}
