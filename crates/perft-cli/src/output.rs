//! Rendering of perft-divide results.

use chess_movegen::PerftDivide;
use clap::ValueEnum;

/// How divide results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One `move: count` line per root move, then the total.
    #[default]
    Text,
    /// A JSON object with `moves` and `total`.
    Json,
}

/// Renders a divide result in the requested format.
pub fn render_divide(divide: &PerftDivide, format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(divide)),
        OutputFormat::Json => serde_json::to_string_pretty(divide),
    }
}

fn render_text(divide: &PerftDivide) -> String {
    let mut out = String::new();
    for (mv, nodes) in &divide.moves {
        out.push_str(&format!("{mv}: {nodes}\n"));
    }
    out.push('\n');
    out.push_str(&format!("Nodes searched: {}\n", divide.total));
    out
}
