use std::{env, process};

use expense_core::{cli, init};

fn main() {
    init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() || matches!(args[0].as_str(), "-h" | "--help" | "help") {
        eprintln!("{}", cli::usage());
        process::exit(if args.is_empty() { 1 } else { 0 });
    }

    match cli::run(args, None) {
        Ok(output) => println!("{output}"),
        Err(err) => {
            eprintln!("Error: {err}");
            process::exit(1);
        }
    }
}
