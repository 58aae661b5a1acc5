//! Count the positions reachable from a FEN position, for checking move generation

use std::{process::ExitCode, time::Instant};

use clap::Parser;
use rules::{fen, perft, perft_divide, Sequence};

#[derive(Parser)]
#[command(about = "Count the leaf positions of the legal move tree")]
struct Args {
    /// The position to start from
    #[arg(long, default_value = fen::INITIAL)]
    fen: String,
    /// How many plies deep to count
    #[arg(long, default_value_t = 3)]
    depth: u32,
    /// Print the count below each legal move of the starting position
    #[arg(long)]
    divide: bool,
}

fn run(args: &Args) -> rules::Result<()> {
    let mut sequence = Sequence::from_fen(&args.fen)?;
    let root = sequence.first();
    let start = Instant::now();
    let nodes = if args.divide {
        let divided = perft_divide(&mut sequence, root, args.depth)?;
        let moves = sequence.moves(root).clone();
        for (code, nodes) in &divided {
            let name = moves.san(*code).unwrap_or_else(|| code.to_string());
            println!("{name}: {nodes}");
        }
        divided.iter().map(|(_, nodes)| nodes).sum()
    } else {
        perft(&mut sequence, root, args.depth)?
    };
    println!("{nodes} nodes at depth {} in {:?}", args.depth, start.elapsed());
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
