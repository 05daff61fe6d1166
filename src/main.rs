use spatial_board::samples::{all_samples, build_sample};
use spatial_board::{Board, BoardConfig, PersistedState};
use std::error::Error;
use std::fs;

const USAGE: &str = "usage: spatial_board arrange <state.json> [out.json]\n       spatial_board demo";

fn main() -> Result<(), Box<dyn Error>> {
    // Set up logging for development
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("arrange") => {
            let Some(input) = args.get(1) else {
                eprintln!("{USAGE}");
                std::process::exit(2);
            };
            arrange_file(input, args.get(2).map(String::as_str))
        }
        Some("demo") => demo(),
        _ => {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    }
}

/// Auto-arranges the active room of a saved board.
fn arrange_file(input: &str, output: Option<&str>) -> Result<(), Box<dyn Error>> {
    let json = fs::read_to_string(input)?;
    let state = PersistedState::from_json(&json)?;
    let mut board = Board::from_persisted(state, BoardConfig::default())?;

    if !board.auto_arrange() {
        log::info!("Nothing to arrange in `{input}`");
    }
    let arranged = board.to_persisted().to_json()?;
    match output {
        Some(path) => fs::write(path, arranged)?,
        None => println!("{arranged}"),
    }
    Ok(())
}

/// Builds, arranges and prints every sample board.
fn demo() -> Result<(), Box<dyn Error>> {
    for sample in all_samples() {
        let mut board = build_sample(sample.kind);
        board.auto_arrange();
        println!("== {} ==", sample.name);
        for node in board.nodes() {
            let (x, y) = node.position;
            match &node.parent_id {
                Some(parent) => println!("  {:<28} ({x:>7.1}, {y:>7.1}) in {parent}", node.data.title()),
                None => println!("  {:<28} ({x:>7.1}, {y:>7.1})", node.data.title()),
            }
        }
    }
    Ok(())
}
