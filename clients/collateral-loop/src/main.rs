use clap::Parser;
use collateral_loop::cli::LoopCli;

fn main() {
    if let Err(err) = LoopCli::parse().run() {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}
