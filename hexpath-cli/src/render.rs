//! Text rendering of a session and its outcome messages

use hexpath_core::{BoardSnapshot, Paint, SearchStatus};

/// Glyph for each paint class
fn glyph(paint: Paint) -> char {
    match paint {
        Paint::Empty => '.',
        Paint::Wall => '#',
        Paint::Start => 'S',
        Paint::End => 'E',
        Paint::Open => 'o',
        Paint::Closed => 'x',
        Paint::Path => '*',
    }
}

/// Draw the board one row per line, each row indented by its skew
pub fn board_to_text(snapshot: &BoardSnapshot) -> String {
    let mut out = String::new();
    for (row, cells) in snapshot.cells.chunks(snapshot.width).enumerate() {
        let indent = (snapshot.topology.skew(row as i32) * 2.0) as usize;
        out.push_str(&" ".repeat(indent));
        let line: Vec<String> = cells.iter().map(|c| glyph(c.paint).to_string()).collect();
        out.push_str(&line.join(" "));
        out.push('\n');
    }
    out
}

/// Message shown to the user when a run stops
pub fn outcome_message(status: SearchStatus, explored: usize, steps: usize) -> String {
    match status {
        SearchStatus::Found => format!("Found target after exploring {} hexes.", explored),
        SearchStatus::Exhausted => {
            format!("Ran out of hexes to explore after exploring {} hexes.", explored)
        }
        SearchStatus::Running => format!(
            "Stopped after {} steps with {} hexes explored.",
            steps, explored
        ),
    }
}
