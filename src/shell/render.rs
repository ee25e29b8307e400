//! Plain-text rendering for the shell.

use super::outcome::{ActionOutcome, NoticeKind, Status, Tone};
use crate::models::CommentRow;

const INFO: char = '●';
const WARNING: char = '▲';
const ERROR: char = '✗';

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

fn notice_symbol(kind: NoticeKind) -> char {
    match kind {
        NoticeKind::Info => INFO,
        NoticeKind::Warning => WARNING,
        NoticeKind::Error => ERROR,
    }
}

/// Render a notice as a titled block.
///
/// ```text
/// ▲ Advertencia
///   Primero carga un archivo.
/// ```
pub fn render_notice(outcome: &ActionOutcome) -> String {
    let mut output = String::new();
    output.push(notice_symbol(outcome.kind));
    output.push(' ');
    output.push_str(outcome.kind.title());
    output.push('\n');
    for line in outcome.message.lines() {
        output.push_str("  ");
        output.push_str(line);
        output.push('\n');
    }
    output
}

/// Render the status indicator, green or red when `color` is set.
pub fn render_status(status: &Status, color: bool) -> String {
    let (symbol, ansi) = match status.tone {
        Tone::Affirmative => ('●', GREEN),
        Tone::Negative => ('○', RED),
    };
    if color {
        format!("{}{} {}{}\n", ansi, symbol, status.text, RESET)
    } else {
        format!("{} {}\n", symbol, status.text)
    }
}

/// Render the analyzed rows, one block per comment.
///
/// Rows without an annotation are skipped.
pub fn render_results(rows: impl IntoIterator<Item = CommentRow>) -> String {
    let mut output = String::from("Resultados del Análisis:\n\n");
    for row in rows {
        let Some(annotation) = row.annotation else {
            continue;
        };
        output.push_str(&format!("Comentario: {}\n", row.comment));
        output.push_str(&format!(
            "Sentimiento: {} | Afinidad: {}%\n",
            annotation.sentiment, annotation.affinity_percent
        ));
        output.push_str(&format!("Etiquetas: {}\n\n", annotation.tags));
    }
    output
}
