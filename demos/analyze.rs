use chess_oracle::{Oracle, OracleError};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Analyze a FEN with a local ONNX model and print the JSON a service
/// boundary would return for `/api/analyze`.
///
/// Usage: `analyze <model.onnx> [fen]`
fn main() -> Result<(), Box<dyn std::error::Error>> {
    TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    let mut args = std::env::args().skip(1);
    let model_path = args.next().ok_or("usage: analyze <model.onnx> [fen]")?;
    let fen = args.next().unwrap_or_else(|| START_FEN.to_string());

    // The first run may be slow while the runtime optimizes the graph.
    let mut oracle = Oracle::from_onnx_file(&model_path)?;

    let body = match oracle.evaluate_fen(&fen) {
        Ok(result) => serde_json::json!({
            "evaluation": result.evaluation,
            "best_move": result.best_move().map(|m| m.uci.to_string()),
            "moves": result.moves,
            "game_over": false,
        }),
        // Checkmate/stalemate is a normal answer, not a failure.
        Err(OracleError::NoLegalMoves) => serde_json::json!({
            "evaluation": serde_json::Value::Null,
            "best_move": serde_json::Value::Null,
            "moves": [],
            "game_over": true,
        }),
        Err(err) => return Err(err.into()),
    };

    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}
