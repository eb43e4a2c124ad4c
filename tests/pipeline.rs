use flate2::Compression;
use flate2::write::GzEncoder;
use log_analyzer::config::Config;
use log_analyzer::pipeline::{Outcome, analyze};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

const TEMPLATE: &str = "<html><script>var table = $table_json;</script></html>";

fn line(verb: &str, url: &str, time: &str) -> String {
    format!(
        "1.169.137.128 -  - [29/Jun/2017:03:50:22 +0300] \"{verb} {url} HTTP/1.1\" 200 2116 \
         \"-\" \"Slotovod\" \"-\" \"1498697422-2118016444-4708-9752771\" \"712e90144abee9\" {time}\n"
    )
}

fn sample_log() -> String {
    [
        line("GET", "/api/v2/banner/1", "0.5"),
        line("GET", "/api/v2/banner/2", "1.5"),
        line("POST", "/api/v2/banner/1", "0.25"),
        line("GET", "/api/v2/banner/1", "FAIL"),
        "broken line\n".to_string(),
    ]
    .concat()
}

struct Workspace {
    _dir: tempfile::TempDir,
    config: Config,
}

fn workspace() -> Workspace {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().to_path_buf();
    fs::create_dir(root.join("log")).unwrap();
    fs::write(root.join("report.html"), TEMPLATE).unwrap();

    let config = Config {
        report_size: 10,
        report_dir: root.join("reports"),
        log_dir: root.join("log"),
        report_template: root.join("report.html"),
        error_file: None,
    };
    Workspace { _dir: dir, config }
}

fn write_gz(path: &Path, text: &str) {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text.as_bytes()).unwrap();
    fs::write(path, encoder.finish().unwrap()).unwrap();
}

fn report_table(path: &PathBuf) -> Vec<serde_json::Value> {
    let html = fs::read_to_string(path).unwrap();
    let start = html.find("var table = ").unwrap() + "var table = ".len();
    let end = html[start..].find(";</script>").unwrap() + start;
    serde_json::from_str(&html[start..end]).unwrap()
}

#[test]
fn writes_report_for_latest_log() {
    let ws = workspace();
    fs::write(ws.config.log_dir.join("nginx-access-ui.log-20170629"), line("GET", "/old", "9.0")).unwrap();
    fs::write(ws.config.log_dir.join("nginx-access-ui.log-20170630"), sample_log()).unwrap();

    let outcome = analyze(&ws.config).unwrap();
    let expected = ws.config.report_dir.join("report-2017.06.30.html");
    assert_eq!(outcome, Outcome::ReportWritten(expected.clone()));

    let table = report_table(&expected);
    let urls: Vec<&str> = table.iter().map(|r| r["url"].as_str().unwrap()).collect();
    assert_eq!(urls, vec!["/api/v2/banner/2", "/api/v2/banner/1", ""]);

    let first = &table[0];
    assert_eq!(first["count"], 1);
    assert_eq!(first["count_perc"], 20.0);
    assert_eq!(first["time_sum"], 1.5);
    assert_eq!(first["time_perc"], 66.667);

    let banner1 = &table[1];
    assert_eq!(banner1["count"], 3);
    assert_eq!(banner1["time_sum"], 0.75);
    assert_eq!(banner1["time_avg"], 0.25);
    assert_eq!(banner1["time_max"], 0.5);
    assert_eq!(banner1["time_med"], 0.25);
}

#[test]
fn reads_gzip_archive() {
    let ws = workspace();
    write_gz(&ws.config.log_dir.join("nginx-access-ui.log-20180101.gz"), &sample_log());
    fs::write(ws.config.log_dir.join("nginx-access-ui.log-20171231"), line("GET", "/old", "9.0")).unwrap();

    let outcome = analyze(&ws.config).unwrap();
    let expected = ws.config.report_dir.join("report-2018.01.01.html");
    assert_eq!(outcome, Outcome::ReportWritten(expected.clone()));
    assert_eq!(report_table(&expected).len(), 3);
}

#[test]
fn report_size_truncates() {
    let mut ws = workspace();
    ws.config.report_size = 1;
    fs::write(ws.config.log_dir.join("nginx-access-ui.log-20170630"), sample_log()).unwrap();

    analyze(&ws.config).unwrap();
    let table = report_table(&ws.config.report_dir.join("report-2017.06.30.html"));
    assert_eq!(table.len(), 1);
    assert_eq!(table[0]["url"], "/api/v2/banner/2");
}

#[test]
fn existing_report_is_not_rebuilt() {
    let ws = workspace();
    fs::write(ws.config.log_dir.join("nginx-access-ui.log-20170630"), sample_log()).unwrap();
    fs::create_dir_all(&ws.config.report_dir).unwrap();
    let report = ws.config.report_dir.join("report-2017.06.30.html");
    fs::write(&report, "done").unwrap();

    assert_eq!(analyze(&ws.config).unwrap(), Outcome::AlreadyReported(report.clone()));
    assert_eq!(fs::read_to_string(&report).unwrap(), "done");
}

#[test]
fn empty_existing_report_is_rebuilt() {
    let ws = workspace();
    fs::write(ws.config.log_dir.join("nginx-access-ui.log-20170630"), sample_log()).unwrap();
    fs::create_dir_all(&ws.config.report_dir).unwrap();
    let report = ws.config.report_dir.join("report-2017.06.30.html");
    fs::write(&report, "").unwrap();

    assert_eq!(analyze(&ws.config).unwrap(), Outcome::ReportWritten(report));
}

#[test]
fn no_matching_log() {
    let ws = workspace();
    fs::write(ws.config.log_dir.join("access.log"), sample_log()).unwrap();

    assert_eq!(analyze(&ws.config).unwrap(), Outcome::NoLogFound);
    assert!(!ws.config.report_dir.exists());
}

#[test]
fn missing_template_is_not_fatal() {
    let mut ws = workspace();
    ws.config.report_template = ws.config.log_dir.join("absent.html");
    fs::write(ws.config.log_dir.join("nginx-access-ui.log-20170630"), sample_log()).unwrap();

    assert_eq!(analyze(&ws.config).unwrap(), Outcome::ReportNotWritten);
    assert!(!ws.config.report_dir.join("report-2017.06.30.html").exists());
}

#[test]
fn empty_log_writes_empty_table() {
    let ws = workspace();
    fs::write(ws.config.log_dir.join("nginx-access-ui.log-20170630"), "").unwrap();

    analyze(&ws.config).unwrap();
    assert!(report_table(&ws.config.report_dir.join("report-2017.06.30.html")).is_empty());
}

#[test]
fn missing_log_dir_is_fatal() {
    let mut ws = workspace();
    ws.config.log_dir = ws.config.log_dir.join("absent");
    assert!(analyze(&ws.config).is_err());
}

#[test]
fn corrupt_archive_is_fatal() {
    let ws = workspace();
    fs::write(ws.config.log_dir.join("nginx-access-ui.log-20170630.gz"), sample_log()).unwrap();

    let err = analyze(&ws.config).unwrap_err();
    assert!(format!("{err:#}").contains("line 1"));
}
