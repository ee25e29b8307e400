use crate::annotate::{AnalysisReport, AnnotateError};
use crate::store::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Warning,
    Error,
}

impl NoticeKind {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Info => "Éxito",
            Self::Warning => "Advertencia",
            Self::Error => "Error",
        }
    }
}

/// What an action reports back to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub kind: NoticeKind,
    pub message: String,
}

impl ActionOutcome {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == NoticeKind::Info
    }

    pub fn load_failed(e: &StoreError) -> Self {
        Self::error(format!("No se pudo leer el archivo:\n{}", e))
    }

    pub fn save_failed(e: &StoreError) -> Self {
        Self::error(format!("No se pudo guardar el archivo:\n{}", e))
    }

    pub fn analyzed(report: &AnalysisReport) -> Self {
        let mut message = format!(
            "Análisis completado: {} comentarios ({} positivos, {} negativos).",
            report.rows, report.positive, report.negative
        );
        if report.sentiment_errors > 0 || report.key_phrase_errors > 0 {
            message.push_str(&format!(
                "\n{} sin sentimiento, {} sin etiquetas.",
                report.sentiment_errors, report.key_phrase_errors
            ));
        }
        Self::info(message)
    }
}

impl From<&AnnotateError> for ActionOutcome {
    fn from(e: &AnnotateError) -> Self {
        match e {
            AnnotateError::NoDataLoaded => Self::warning("Primero carga un archivo."),
            AnnotateError::MissingCommentColumn(column) => Self::error(format!(
                "El archivo debe tener una columna llamada '{}'.",
                column
            )),
            AnnotateError::AnalysisFailed(cause) => {
                Self::error(format!("No se pudo analizar:\n{}", cause))
            }
        }
    }
}

/// Tone of the status indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Affirmative,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub tone: Tone,
    pub text: String,
}

impl Status {
    pub fn loaded(file_name: &str) -> Self {
        Self {
            tone: Tone::Affirmative,
            text: format!("Archivo cargado: {}", file_name),
        }
    }

    pub fn empty() -> Self {
        Self {
            tone: Tone::Negative,
            text: "No se ha cargado ningún archivo.".to_string(),
        }
    }
}
