use anyhow::Result;
use jobmarket_scraper::error::EtlError;
use jobmarket_scraper::normalize;
use std::fs;
use tempfile::tempdir;

const RAW_HEADER: &str = "title;company;location;contract;salary;url;scraped_at";

fn write_raw(dir: &std::path::Path, body: &str) -> std::path::PathBuf {
    let path = dir.join("raw_listings.csv");
    fs::write(&path, format!("{RAW_HEADER}\n{body}")).unwrap();
    path
}

#[test]
fn normalizes_a_raw_file_end_to_end() -> Result<()> {
    let temp_dir = tempdir()?;
    let input = write_raw(
        temp_dir.path(),
        "Développeur Web H/F;Société X;Lyon - 69;CDI;2 500 € / mois;https://example.com/1;2026-01-15T10:00:00Z\n\
         Comptable;ACME;Paris 15e - 75;CDD;Non affiché;https://example.com/2;2026-01-15T10:00:00Z\n\
         Cariste 39H;Logistique SA;Bordeaux;Intérim;15 € / heure;https://example.com/3;2026-01-15T10:00:00Z\n",
    );
    let output = temp_dir.path().join("clean_listings.csv");

    let result = normalize::run(&input, &output)?;
    assert_eq!(result.rows_read, 3);
    assert_eq!(result.rows_written, 3);
    assert_eq!(result.salaries_parsed, 2);
    assert_eq!(result.bad_lines, 0);

    let contents = fs::read_to_string(&output)?;
    let mut lines = contents.lines();
    assert_eq!(
        lines.next(),
        Some("title,annual_gross_salary,city,department,contract_type,company,url,scraped_at")
    );
    assert_eq!(
        lines.next(),
        Some("Développeur web,30000.0,Lyon,69,CDI,Société X,https://example.com/1,2026-01-15T10:00:00Z")
    );
    assert_eq!(
        lines.next(),
        Some("Comptable,,Paris,75,CDD,ACME,https://example.com/2,2026-01-15T10:00:00Z")
    );
    assert_eq!(
        lines.next(),
        Some("Cariste,27300.6,Bordeaux,,Intérim,Logistique SA,https://example.com/3,2026-01-15T10:00:00Z")
    );
    assert_eq!(lines.next(), None);
    Ok(())
}

#[test]
fn rerunning_is_byte_identical() -> Result<()> {
    let temp_dir = tempdir()?;
    let input = write_raw(
        temp_dir.path(),
        "Testeur;ACME;Nantes - 44;CDI;35k €;https://example.com/4;2026-01-15T10:00:00Z\n",
    );
    let output = temp_dir.path().join("clean_listings.csv");

    normalize::run(&input, &output)?;
    let first = fs::read(&output)?;
    normalize::run(&input, &output)?;
    let second = fs::read(&output)?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn row_count_is_preserved_on_parse_failures() -> Result<()> {
    let temp_dir = tempdir()?;
    // Every field except the title is junk; rows must still come through
    let input = write_raw(
        temp_dir.path(),
        "Offre 1;;;;n/a €€;https://example.com/5;\n\
         Offre 2;;;;;https://example.com/6;\n",
    );
    let output = temp_dir.path().join("clean_listings.csv");

    let result = normalize::run(&input, &output)?;
    assert_eq!(result.rows_read, 2);
    assert_eq!(result.rows_written, 2);
    assert_eq!(result.salaries_parsed, 0);

    let contents = fs::read_to_string(&output)?;
    // Header plus exactly one line per input row
    assert_eq!(contents.lines().count(), 3);
    Ok(())
}

#[test]
fn comma_delimited_input_with_bom_is_accepted() -> Result<()> {
    let temp_dir = tempdir()?;
    let path = temp_dir.path().join("raw_listings.csv");
    fs::write(
        &path,
        "\u{feff}title,company,location,contract,salary,url\n\
         Analyste,ACME,Lille - 59,CDI,40 000 € / an,https://example.com/7\n",
    )?;
    let output = temp_dir.path().join("clean_listings.csv");

    let result = normalize::run(&path, &output)?;
    assert_eq!(result.rows_written, 1);
    assert_eq!(result.salaries_parsed, 1);

    let contents = fs::read_to_string(&output)?;
    assert!(contents.contains("Analyste,40000.0,Lille,59,CDI,ACME,https://example.com/7,"));
    Ok(())
}

#[test]
fn missing_input_file_is_fatal() {
    let temp_dir = tempdir().unwrap();
    let missing = temp_dir.path().join("does_not_exist.csv");
    let output = temp_dir.path().join("clean_listings.csv");

    let err = normalize::run(&missing, &output).unwrap_err();
    assert!(matches!(err, EtlError::Input { .. }));
    assert!(err.to_string().contains("does_not_exist.csv"));
}

#[test]
fn unwritable_output_is_fatal() {
    let temp_dir = tempdir().unwrap();
    let input = write_raw(
        temp_dir.path(),
        "Offre;ACME;;CDI;;https://example.com/8;\n",
    );

    // The output path is an existing directory, so it cannot be created
    let err = normalize::run(&input, temp_dir.path()).unwrap_err();
    assert!(matches!(err, EtlError::Output { .. }));
}

#[test]
fn missing_required_column_is_fatal() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("raw_listings.csv");
    fs::write(&path, "title;company\nOffre;ACME\n").unwrap();
    let output = temp_dir.path().join("clean_listings.csv");

    let err = normalize::run(&path, &output).unwrap_err();
    assert!(matches!(err, EtlError::MissingColumn(_)));
}
