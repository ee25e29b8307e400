//! Interactive load / analyze / save shell.
//!
//! Each action returns an [`ActionOutcome`]; nothing here prints directly
//! except [`Shell::run`], which drives the actions from a line-based input
//! and renders outcomes with the [`render`] helpers.

mod outcome;
pub mod render;

pub use outcome::*;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::annotate::Annotator;
use crate::store::Table;

const BANNER: &str = "Analizador de comentarios";

const HELP: &str = "\
Comandos:
  load <archivo>     Cargar una hoja de cálculo (.xlsx, .xls, .ods, .csv, .tsv)
  analyze            Analizar la columna de comentarios
  save <archivo>     Guardar los resultados (por defecto .xlsx)
  show               Volver a mostrar los resultados
  status             Mostrar el archivo cargado
  help               Mostrar esta ayuda
  quit               Salir
";

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Load(PathBuf),
    Analyze,
    Save(PathBuf),
    Show,
    Status,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line. Blank lines parse to `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (name, arg) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, unquote(rest.trim())),
            None => (line, ""),
        };

        let command = match name.to_ascii_lowercase().as_str() {
            "load" | "cargar" => Self::Load(required_path(name, arg)?),
            "analyze" | "analizar" => Self::Analyze,
            "save" | "guardar" => Self::Save(required_path(name, arg)?),
            "show" | "mostrar" => Self::Show,
            "status" | "estado" => Self::Status,
            "help" | "ayuda" | "?" => Self::Help,
            "quit" | "exit" | "salir" => Self::Quit,
            _ => return Err(format!("Comando desconocido: {}. Escribe 'help'.", name)),
        };
        Ok(Some(command))
    }
}

fn unquote(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(s)
}

fn required_path(command: &str, arg: &str) -> Result<PathBuf, String> {
    if arg.is_empty() {
        Err(format!("Uso: {} <archivo>", command))
    } else {
        Ok(PathBuf::from(arg))
    }
}

/// Holds the loaded table and runs actions against it.
pub struct Shell {
    annotator: Annotator,
    table: Option<Table>,
    file_name: Option<String>,
    color: bool,
}

impl Shell {
    pub fn new(annotator: Annotator) -> Self {
        Self {
            annotator,
            table: None,
            file_name: None,
            color: false,
        }
    }

    /// Colour the status indicator with ANSI escapes.
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    pub fn status(&self) -> Status {
        match (&self.table, &self.file_name) {
            (Some(_), Some(name)) => Status::loaded(name),
            _ => Status::empty(),
        }
    }

    /// Replace the current table with the one at `path`.
    ///
    /// On failure the previous table, if any, stays loaded.
    pub fn load(&mut self, path: &Path) -> ActionOutcome {
        match Table::load(path) {
            Ok(table) => {
                self.table = Some(table);
                self.file_name = Some(
                    path.file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| path.display().to_string()),
                );
                ActionOutcome::info("Archivo cargado correctamente.")
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "Load failed: {}", e);
                ActionOutcome::load_failed(&e)
            }
        }
    }

    pub async fn analyze(&mut self) -> ActionOutcome {
        match self.annotator.run(self.table.as_mut()).await {
            Ok(report) => ActionOutcome::analyzed(&report),
            Err(e) => {
                tracing::warn!("Analysis failed: {}", e);
                ActionOutcome::from(&e)
            }
        }
    }

    /// Export the analyzed table. Requires a completed analysis.
    pub fn save(&self, path: &Path) -> ActionOutcome {
        let Some(table) = self.table.as_ref().filter(|t| t.is_annotated()) else {
            return ActionOutcome::warning("No hay resultados para guardar.");
        };
        match table.save(path) {
            Ok(written) => ActionOutcome::info(format!("Archivo guardado: {}", written.display())),
            Err(e) => {
                tracing::warn!(path = %path.display(), "Save failed: {}", e);
                ActionOutcome::save_failed(&e)
            }
        }
    }

    /// The results listing, if the current table has been analyzed.
    pub fn results(&self) -> Option<String> {
        let table = self.table.as_ref().filter(|t| t.is_annotated())?;
        let rows = table.rows(self.annotator.comment_column())?;
        Some(render::render_results(rows))
    }

    /// Read commands from `input` until `quit` or end of input.
    pub async fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        writeln!(output, "{}", BANNER)?;
        output.write_all(render::render_status(&self.status(), self.color).as_bytes())?;
        writeln!(output, "Escribe 'help' para ver los comandos.")?;

        let mut lines = input.lines();
        loop {
            write!(output, "> ")?;
            output.flush()?;
            let Some(line) = lines.next() else {
                break;
            };
            let command = match Command::parse(&line?) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(message) => {
                    output.write_all(render::render_notice(&ActionOutcome::warning(message)).as_bytes())?;
                    continue;
                }
            };

            match command {
                Command::Load(path) => {
                    let outcome = self.load(&path);
                    output.write_all(render::render_notice(&outcome).as_bytes())?;
                    output.write_all(render::render_status(&self.status(), self.color).as_bytes())?;
                }
                Command::Analyze => {
                    let outcome = self.analyze().await;
                    if outcome.is_success() {
                        if let Some(results) = self.results() {
                            output.write_all(results.as_bytes())?;
                        }
                    }
                    output.write_all(render::render_notice(&outcome).as_bytes())?;
                }
                Command::Save(path) => {
                    let outcome = self.save(&path);
                    output.write_all(render::render_notice(&outcome).as_bytes())?;
                }
                Command::Show => match self.results() {
                    Some(results) => output.write_all(results.as_bytes())?,
                    None => writeln!(output, "Todavía no hay resultados.")?,
                },
                Command::Status => {
                    output.write_all(render::render_status(&self.status(), self.color).as_bytes())?;
                }
                Command::Help => output.write_all(HELP.as_bytes())?,
                Command::Quit => break,
            }
        }
        output.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("  "), Ok(None));
        assert_eq!(Command::parse("analyze"), Ok(Some(Command::Analyze)));
        assert_eq!(Command::parse("QUIT"), Ok(Some(Command::Quit)));
        assert_eq!(
            Command::parse("load \"my reviews.xlsx\""),
            Ok(Some(Command::Load(PathBuf::from("my reviews.xlsx"))))
        );
        assert_eq!(
            Command::parse("guardar out.csv"),
            Ok(Some(Command::Save(PathBuf::from("out.csv"))))
        );
    }

    #[test]
    fn test_parse_rejects_missing_path_and_unknown_command() {
        assert!(Command::parse("load").is_err());
        assert!(Command::parse("frobnicate").is_err());
    }
}
