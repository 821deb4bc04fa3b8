//! TaiScript runner: orchestrates the full pipeline.
//!
//! ```text
//! Source → Lexer → Parser → Complexity Analyser → Interpreter → output log
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tai_eval::{InputSource, Interpreter, InterpreterConfig};
use tai_parser::parse_source;
use tai_types::SourceFile;

/// Result of one run of a TaiScript program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutcome {
    /// Output log. On failure the last entry is the diagnostic.
    pub output: Vec<String>,
    pub success: bool,
    /// The failure message, without the `Error:` / `Runtime Error:` prefix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunOutcome {
    /// The output log as printed text.
    pub fn text(&self) -> String {
        self.output.join("\n")
    }
}

/// Failures outside the program itself.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("File '{}' not found.", path.display())]
    NotFound { path: PathBuf },

    #[error("cannot read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config '{}': {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Lex, parse, assess and interpret `source`.
///
/// A lexical or syntax error stops before any statement runs and becomes
/// the single output entry `Error: <diagnostic>`.
#[tracing::instrument(skip(source, config, input), fields(bytes = source.len()))]
pub fn run_source(
    source: &str,
    name: &str,
    config: &InterpreterConfig,
    input: Box<dyn InputSource>,
) -> RunOutcome {
    let source_file = SourceFile::new(name, source);
    let program = match parse_source(&source_file) {
        Ok(program) => program,
        Err(err) => {
            tracing::warn!(code = %err.code, "program rejected");
            return RunOutcome {
                output: vec![format!("Error: {err}")],
                success: false,
                error: Some(err.to_string()),
            };
        }
    };
    tracing::debug!(statements = program.stmts.len(), "parsed");

    let mut interpreter = Interpreter::new(config.clone(), input);
    let result = interpreter.interpret(&program);
    RunOutcome {
        output: interpreter.output().to_vec(),
        success: result.is_ok(),
        error: result.err().map(|e| e.to_string()),
    }
}

/// Read a source file from disk and run it.
pub fn run_file(
    path: &Path,
    config: &InterpreterConfig,
    input: Box<dyn InputSource>,
) -> Result<RunOutcome, RunnerError> {
    let source = read_source(path)?;
    Ok(run_source(&source, &path.display().to_string(), config, input))
}

/// Load an interpreter configuration from a TOML file. Missing keys take
/// their defaults.
pub fn load_config(path: &Path) -> Result<InterpreterConfig, RunnerError> {
    let text = read_source(path)?;
    let config = toml::from_str(&text).map_err(|source| RunnerError::Config {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Read a whole file, reporting a missing file as [`RunnerError::NotFound`].
pub fn read_source(path: &Path) -> Result<String, RunnerError> {
    std::fs::read_to_string(path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => RunnerError::NotFound {
            path: path.to_path_buf(),
        },
        _ => RunnerError::Read {
            path: path.to_path_buf(),
            source,
        },
    })
}
