//! Page-by-page PDF text extraction into a plain text report.
//!
//! The report layout is fixed:
//!
//! ```text
//! Total Pages: N
//!
//! ================================================================================
//!
//! --- PAGE 1 ---
//!
//! <text>
//!
//! ================================================================================
//! ```
//!
//! with one marker/text/separator block per page.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use lopdf::Document;
use tracing::{debug, error, info};

use crate::config::ExtractConfig;
use crate::contract::PageSource;
use crate::error::ExtractError;

const RULE_WIDTH: usize = 80;

/// A PDF loaded fully into memory, with its page numbers in document order.
pub struct PdfDocument {
    doc: Document,
    page_numbers: Vec<u32>,
}

impl PdfDocument {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ExtractError> {
        let path = path.as_ref();
        if !path.is_file() {
            error!(path = %path.display(), "Input PDF does not exist");
            return Err(ExtractError::NotFound(path.to_path_buf()));
        }

        let doc = Document::load(path).map_err(|e| {
            error!(error = %e, path = %path.display(), "Failed to parse PDF");
            match e {
                lopdf::Error::IO(io) => ExtractError::Io(io),
                other => ExtractError::InvalidPdf {
                    path: path.to_path_buf(),
                    reason: other.to_string(),
                },
            }
        })?;

        // get_pages is a BTreeMap keyed by 1-based page number
        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
        info!(path = %path.display(), pages = page_numbers.len(), "Loaded PDF");
        Ok(Self { doc, page_numbers })
    }
}

impl PageSource for PdfDocument {
    fn page_count(&self) -> usize {
        self.page_numbers.len()
    }

    fn page_text(&self, index: usize) -> Result<String, ExtractError> {
        let page_number = *self.page_numbers.get(index).ok_or(ExtractError::Page {
            page: index + 1,
            message: "page index out of range".into(),
        })?;
        self.doc
            .extract_text(&[page_number])
            .map_err(|e| ExtractError::Page {
                page: index + 1,
                message: e.to_string(),
            })
    }
}

/// Writes the report for every page of `source` to `out`, returning the page count.
///
/// Stops at the first page that fails; whatever was already written stays written.
pub fn write_report<S, W>(source: &S, out: &mut W) -> Result<usize, ExtractError>
where
    S: PageSource + ?Sized,
    W: Write,
{
    let rule = "=".repeat(RULE_WIDTH);
    let total = source.page_count();

    write!(out, "Total Pages: {total}\n\n")?;
    writeln!(out, "{rule}")?;

    for index in 0..total {
        let text = source.page_text(index)?;
        debug!(page = index + 1, chars = text.len(), "Extracted page text");
        write!(out, "\n--- PAGE {} ---\n\n", index + 1)?;
        out.write_all(text.as_bytes())?;
        write!(out, "\n\n{rule}\n")?;
    }

    out.flush()?;
    Ok(total)
}

/// What an extraction run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionSummary {
    pub pages: usize,
    pub output: PathBuf,
}

/// Loads `config.input` and writes its report to `config.output`, replacing any
/// previous file. The output is only opened once the input has parsed.
pub fn extract_pdf(config: &ExtractConfig) -> Result<ExtractionSummary, ExtractError> {
    let document = PdfDocument::load(&config.input)?;

    let file = File::create(&config.output).map_err(|e| {
        error!(error = ?e, path = %config.output.display(), "Failed to create output file");
        e
    })?;
    let mut writer = BufWriter::new(file);
    let pages = write_report(&document, &mut writer)?;

    info!(pages, output = %config.output.display(), "Extraction complete");
    Ok(ExtractionSummary {
        pages,
        output: config.output.clone(),
    })
}
