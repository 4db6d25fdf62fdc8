use std::fs;

use adoption_app::{AppConfig, AppError, AppState, DataSources, OutputFormat, write_report};
use ingest::ValidationPolicy;
use tempfile::tempdir;

const PAGELOADS: &str = "\
submission_date,os,country,normalized_pageloads,ratio,reporting_ratio
2024-01-02,Darwin,US,1,0.8,1
2024-01-01,Darwin,US,2,0.5,1
2024-01-01,Linux,DE,2,0.9,1
";

const TIMELINE: &str = "2024-01-02\t100\t2000\t3000\t400\n2023-12-30\t1\t2\t3\t4\n";

fn write_sources(dir: &std::path::Path, pageloads: &str) -> DataSources {
    let sources = DataSources {
        pageloads: dir.join("current-https-adoption.csv"),
        issuance: dir.join("cert-timeline.tsv"),
    };
    fs::write(&sources.pageloads, pageloads).expect("write pageloads");
    fs::write(&sources.issuance, TIMELINE).expect("write timeline");
    sources
}

#[test]
fn synthesize_default_filters_to_csv() {
    let dir = tempdir().expect("temp dir");
    let sources = write_sources(dir.path(), PAGELOADS);
    let app = AppState::new(AppConfig::default()).expect("app");

    let report = app.synthesize(&sources).expect("synthesize");
    assert_eq!(report.missing_issuance, vec!["2024-01-01".to_string()]);

    let mut out = Vec::new();
    write_report(&mut out, &report, OutputFormat::Csv).expect("write");
    let text = String::from_utf8(out).expect("utf8");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0],
        "date,secure_pageloads_all,secure_pageloads_USA,secure_pageloads_Germany,\
secure_pageloads_Japan,secure_pageloads_India,secure_pageloads_France,secure_pageloads_Egypt,\
secure_pageloads_MacOS,daily_certs_issued,total_certs_active,total_fqdns_active,\
total_registered_domains_active"
    );
    assert_eq!(lines[1], "2024-01-01,0.7,0.5,0.9,,,,,0.5,,,,");
    assert_eq!(lines[2], "2024-01-02,0.8,0.8,,,,,,0.8,100,2000,3000,400");
}

#[test]
fn rerun_produces_identical_output() {
    let dir = tempdir().expect("temp dir");
    let sources = write_sources(dir.path(), PAGELOADS);
    let app = AppState::new(AppConfig::default()).expect("app");

    let mut first = Vec::new();
    let mut second = Vec::new();
    write_report(&mut first, &app.synthesize(&sources).expect("first"), OutputFormat::Csv)
        .expect("write first");
    write_report(&mut second, &app.synthesize(&sources).expect("second"), OutputFormat::Csv)
        .expect("write second");
    assert_eq!(first, second);
}

#[test]
fn validation_policy_controls_bad_rows() {
    let dir = tempdir().expect("temp dir");
    let pageloads = format!("{}2024-01-03,Linux\n", PAGELOADS);
    let sources = write_sources(dir.path(), &pageloads);

    let strict = AppState::new(AppConfig::default()).expect("app");
    assert!(matches!(
        strict.synthesize(&sources),
        Err(AppError::Ingest(_))
    ));

    let lenient = AppState::new(AppConfig {
        validation: ValidationPolicy::Skip,
        ..AppConfig::default()
    })
    .expect("app");
    let report = lenient.synthesize(&sources).expect("synthesize");
    let dates: Vec<&str> = report.rows.iter().map(|row| row.date.as_str()).collect();
    assert_eq!(dates, vec!["2024-01-01", "2024-01-02"]);
}

#[test]
fn missing_input_file_is_reported_with_path() {
    let dir = tempdir().expect("temp dir");
    let app = AppState::new(AppConfig::default()).expect("app");
    let sources = DataSources {
        pageloads: dir.path().join("nope.csv"),
        issuance: dir.path().join("nope.tsv"),
    };
    let err = app.synthesize(&sources).expect_err("missing file");
    assert!(err.to_string().contains("nope.csv"));
}
