//! Cleaning and standardization of raw listings.
//!
//! Everything here is a pure map over independent rows: the field cleaners
//! never fail, a row in always yields a row out, and only file-level
//! problems (missing input, bad header, unwritable output) abort a run.

mod location;
mod salary;
mod title;

pub use location::split_location;
pub use salary::parse_salary;
pub use title::clean_title;

use crate::error::{EtlError, Result};
use crate::types::{CleanListing, RawListing};
use csv::StringRecord;
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Clean file column order, stable for downstream BI tools
const CLEAN_HEADER: [&str; 8] = [
    "title",
    "annual_gross_salary",
    "city",
    "department",
    "contract_type",
    "company",
    "url",
    "scraped_at",
];

/// Summary of a normalization run
#[derive(Debug)]
pub struct NormalizeResult {
    pub rows_read: usize,
    pub rows_written: usize,
    pub salaries_parsed: usize,
    pub bad_lines: usize,
    pub output_file: String,
}

/// Maps required column names to their index in the raw header. All columns
/// except `scraped_at` must be present; older raw files predate that one.
struct ColumnMap {
    title: usize,
    company: usize,
    location: usize,
    contract: usize,
    salary: usize,
    url: usize,
    scraped_at: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let position = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| EtlError::MissingColumn(name.to_string()))
        };
        Ok(Self {
            title: position("title")?,
            company: position("company")?,
            location: position("location")?,
            contract: position("contract")?,
            salary: position("salary")?,
            url: position("url")?,
            scraped_at: headers.iter().position(|h| h.trim() == "scraped_at"),
        })
    }

    fn listing(&self, record: &StringRecord) -> RawListing {
        let field = |index: usize| record.get(index).unwrap_or("").trim().to_string();
        RawListing {
            title: field(self.title),
            company: field(self.company),
            location: field(self.location),
            contract: field(self.contract),
            salary: field(self.salary),
            url: field(self.url),
            scraped_at: self.scraped_at.map(field).unwrap_or_default(),
        }
    }
}

/// Applies the three field cleaners to one raw listing. Total: malformed
/// fields degrade to absent or raw values, never to an error.
pub fn normalize_row(raw: &RawListing) -> CleanListing {
    let (city, department) = split_location(&raw.location);
    CleanListing {
        title: clean_title(&raw.title),
        annual_gross_salary: parse_salary(&raw.salary),
        city,
        department,
        contract_type: raw.contract.clone(),
        company: raw.company.clone(),
        url: raw.url.clone(),
        scraped_at: raw.scraped_at.clone(),
    }
}

// The collector writes semicolons but hand-built files tend to use commas;
// whichever wins in the header line decides (the original read with ';'
// and fell back to ',').
fn detect_delimiter(header_line: &str) -> u8 {
    let semicolons = header_line.matches(';').count();
    let commas = header_line.matches(',').count();
    if commas > semicolons {
        b','
    } else {
        b';'
    }
}

/// Normalizes `input_path` into `output_path`, row order preserved.
///
/// Fatal only when the input file is missing, not valid tabular data or
/// lacks required columns, or when the output cannot be written. Lines that
/// fail to decode as CSV records are skipped with a warning; every decoded
/// row is emitted, parse failures degrading to empty cells.
#[instrument]
pub fn run(input_path: &Path, output_path: &Path) -> Result<NormalizeResult> {
    info!("Starting normalization of {}", input_path.display());

    let contents = fs::read_to_string(input_path).map_err(|e| EtlError::Input {
        path: input_path.display().to_string(),
        message: format!("cannot read raw listings file: {e}"),
    })?;
    // Tolerate the BOM Excel-oriented exports prepend
    let contents = contents.strip_prefix('\u{feff}').unwrap_or(&contents);

    let delimiter = detect_delimiter(contents.lines().next().unwrap_or(""));
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(contents.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| EtlError::Input {
            path: input_path.display().to_string(),
            message: format!("cannot read header: {e}"),
        })?
        .clone();
    let columns = ColumnMap::from_headers(&headers)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let output_file = fs::File::create(output_path).map_err(|e| EtlError::Output {
        path: output_path.display().to_string(),
        message: format!("cannot create clean listings file: {e}"),
    })?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(output_file);
    // Written up front so an empty input still yields a valid header-only file
    writer.write_record(CLEAN_HEADER)?;

    let mut result = NormalizeResult {
        rows_read: 0,
        rows_written: 0,
        salaries_parsed: 0,
        bad_lines: 0,
        output_file: output_path.display().to_string(),
    };

    for (i, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                warn!("Skipping malformed line {}: {}", i + 2, e);
                result.bad_lines += 1;
                continue;
            }
        };
        result.rows_read += 1;

        let raw = columns.listing(&record);
        let clean = normalize_row(&raw);
        if clean.annual_gross_salary.is_some() {
            result.salaries_parsed += 1;
        } else {
            debug!("No exploitable salary in row {}: {:?}", i + 2, raw.salary);
        }

        writer.serialize(&clean)?;
        result.rows_written += 1;
    }
    writer.flush()?;

    info!(
        "Normalized {} rows ({} salaries parsed, {} malformed lines skipped)",
        result.rows_written, result.salaries_parsed, result.bad_lines
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(title: &str, salary: &str, location: &str) -> RawListing {
        RawListing {
            title: title.to_string(),
            company: "Société X".to_string(),
            location: location.to_string(),
            contract: "CDI".to_string(),
            salary: salary.to_string(),
            url: "https://example.com/offre/1".to_string(),
            scraped_at: "2026-01-15T10:00:00Z".to_string(),
        }
    }

    #[test]
    fn normalize_row_composes_all_cleaners() {
        let clean = normalize_row(&raw(
            "Développeur Web H/F",
            "2 500 € / mois",
            "Lyon - 69",
        ));
        assert_eq!(clean.title, "Développeur web");
        assert_eq!(clean.annual_gross_salary, Some(30_000.0));
        assert_eq!(clean.city.as_deref(), Some("Lyon"));
        assert_eq!(clean.department.as_deref(), Some("69"));
        assert_eq!(clean.contract_type, "CDI");
        assert_eq!(clean.company, "Société X");
    }

    #[test]
    fn normalize_row_degrades_gracefully() {
        let clean = normalize_row(&raw("", "Non affiché", ""));
        assert_eq!(clean.title, "");
        assert_eq!(clean.annual_gross_salary, None);
        assert_eq!(clean.city, None);
        assert_eq!(clean.department, None);
    }

    #[test]
    fn delimiter_detection_prefers_majority() {
        assert_eq!(detect_delimiter("a;b;c"), b';');
        assert_eq!(detect_delimiter("a,b,c"), b',');
        // Ties and headerless edge cases fall back to the collector's default
        assert_eq!(detect_delimiter(""), b';');
    }

    #[test]
    fn column_map_rejects_missing_required_column() {
        let headers = StringRecord::from(vec!["title", "company", "location"]);
        assert!(matches!(
            ColumnMap::from_headers(&headers),
            Err(EtlError::MissingColumn(_))
        ));
    }

    #[test]
    fn column_map_tolerates_missing_scraped_at_and_reordering() {
        let headers =
            StringRecord::from(vec!["url", "salary", "contract", "location", "company", "title"]);
        let columns = ColumnMap::from_headers(&headers).unwrap();
        let record = StringRecord::from(vec![
            "https://example.com/offre/2",
            "35k €",
            "CDD",
            "Paris",
            "ACME",
            "Testeur",
        ]);
        let listing = columns.listing(&record);
        assert_eq!(listing.title, "Testeur");
        assert_eq!(listing.salary, "35k €");
        assert_eq!(listing.scraped_at, "");
    }
}
