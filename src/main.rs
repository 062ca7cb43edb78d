//! Applies moves to a chess position and prints the resulting FEN, or drives an
//! interactive session over stdin/stdout.
//!
//! ```shell
//! $ chesspos e4 e7e5 g1f3
//! rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2
//! ```

use std::io;

use anyhow::Context;
use chesspos::chess::notation;
use chesspos::chess::position::Position;
use chesspos::session::Session;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Position to start from. Defaults to the standard starting position.
    #[arg(long)]
    fen: Option<String>,
    /// Print the board diagram after applying the moves.
    #[arg(long)]
    board: bool,
    /// Read commands (`position`, `move`, `fen`, `d`, `bitboard`, `quit`)
    /// from stdin line by line.
    #[arg(long, conflicts_with = "moves")]
    interactive: bool,
    /// Print build information and exit.
    #[arg(long)]
    build_info: bool,
    /// Moves in UCI (e2e4) or SAN pawn (e4, exd5, e8=Q) notation, applied in
    /// order.
    moves: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    if args.build_info {
        chesspos::print_binary_info();
        return Ok(());
    }

    let position = match &args.fen {
        Some(fen) => Position::try_from(fen.as_str()).context("parsing --fen")?,
        None => Position::starting(),
    };

    if args.interactive {
        info!("starting interactive session");
        let mut session = Session::with_position(position, io::stdin().lock(), io::stdout().lock());
        return session.run();
    }

    let moves: Vec<&str> = args.moves.iter().map(String::as_str).collect();
    let position = notation::play(&position, &moves).context("applying moves")?;
    println!("{position}");
    if args.board {
        print!("{position:?}");
    }
    Ok(())
}
