//! Language identification for typed lines of text
//!
//! Wraps a pretrained fastText `lid.176` model behind [`LanguageClassifier`]
//! and drives the interactive read/classify/print loop used by the `langid`
//! binary.

use crate::{Error, Result};
use std::io::{BufRead, Write};
use std::path::Path;

pub const DEFAULT_MODEL_PATH: &str = "lid.176.ftz";
pub const DEFAULT_MODEL_URL: &str =
    "https://dl.fbaipublicfiles.com/fasttext/supervised-models/lid.176.ftz";

const LABEL_PREFIX: &str = "__label__";

/// Top-1 prediction for one line.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub language: String,
    pub confidence: f32,
}

pub trait LanguageClassifier {
    /// Most likely language for `text`, or `None` when the model has no answer.
    fn predict(&self, text: &str) -> Result<Option<Detection>>;
}

/// `__label__nl` -> `nl`
pub fn strip_label(label: &str) -> &str {
    label.strip_prefix(LABEL_PREFIX).unwrap_or(label)
}

/// Read lines from `input` until `exit` (any case) or end of input, printing
/// one detection per non-blank line to `output`.
pub fn run_repl<C, R, W>(classifier: &C, mut input: R, mut output: W) -> Result<()>
where
    C: LanguageClassifier + ?Sized,
    R: BufRead,
    W: Write,
{
    loop {
        write!(output, "Enter text (or type 'exit' to quit):\n> ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            break;
        }

        let text = line.trim();
        if text.eq_ignore_ascii_case("exit") {
            writeln!(output, "Exiting.")?;
            break;
        }
        if text.is_empty() {
            writeln!(output, "Please enter some text or 'exit' to quit.\n")?;
            continue;
        }

        match classifier.predict(text) {
            Ok(Some(detection)) => writeln!(
                output,
                "Detected language: {} (confidence: {:.4})\n",
                detection.language, detection.confidence
            )?,
            Ok(None) => writeln!(output, "No language detected.\n")?,
            Err(e) => {
                tracing::warn!("Prediction failed: {}", e);
                writeln!(output, "Could not classify input: {}\n", e)?;
            }
        }
    }

    Ok(())
}

/// Make sure the model file exists at `path`, fetching it from `url` when it
/// is missing. Progress messages go to `output`.
///
/// Returns `true` when a download happened.
pub async fn ensure_model<W: Write>(path: &Path, url: &str, output: &mut W) -> Result<bool> {
    if tokio::fs::try_exists(path).await? {
        tracing::debug!("Using existing model at {}", path.display());
        return Ok(false);
    }

    writeln!(
        output,
        "Downloading language identification model from:\n{}\n(This may take a moment...)",
        url
    )?;
    output.flush()?;

    download_model(path, url).await?;
    writeln!(output, "Download complete.")?;
    Ok(true)
}

/// Download the model at `url` to `path`.
///
/// The body is staged in a temporary file next to `path` and only moved into
/// place once complete.
pub async fn download_model(path: &Path, url: &str) -> Result<()> {
    tracing::info!("Downloading language model from {}", url);

    let mut response = reqwest::get(url).await?.error_for_status()?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = tempfile::NamedTempFile::new_in(dir)?;

    let mut written = 0usize;
    while let Some(chunk) = response.chunk().await? {
        staged.write_all(&chunk)?;
        written += chunk.len();
    }
    staged.flush()?;

    staged.persist(path).map_err(|e| Error::Io(e.error))?;
    tracing::info!("Saved {} bytes to {}", written, path.display());
    Ok(())
}

#[cfg(feature = "langid")]
pub use fasttext_model::FastTextClassifier;

#[cfg(feature = "langid")]
mod fasttext_model {
    use super::{strip_label, Detection, LanguageClassifier};
    use crate::{Error, Result};
    use fasttext::FastText;
    use std::path::Path;

    pub struct FastTextClassifier {
        model: FastText,
    }

    impl FastTextClassifier {
        pub fn load(path: &Path) -> Result<Self> {
            let path_str = path.to_str().ok_or_else(|| {
                Error::Model(format!("Model path is not valid UTF-8: {}", path.display()))
            })?;

            let mut model = FastText::new();
            model.load_model(path_str).map_err(Error::Model)?;
            Ok(Self { model })
        }
    }

    impl LanguageClassifier for FastTextClassifier {
        fn predict(&self, text: &str) -> Result<Option<Detection>> {
            let predictions = self.model.predict(text, 1, 0.0).map_err(Error::Model)?;
            Ok(predictions.into_iter().next().map(|p| Detection {
                language: strip_label(&p.label).to_string(),
                confidence: p.prob,
            }))
        }
    }
}
