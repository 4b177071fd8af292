use chrono::{TimeZone, Utc};
use filesink_appender::{
    Charset, FileAppender, FileConfig, Formatter, LifecycleState, LineFormatter, LogEvent,
    LINE_SEPARATOR,
};
use filesink_status::{Level, StatusManager};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn make_event(message: &str) -> LogEvent {
    LogEvent::new(tracing::Level::INFO, "test", message)
        .at(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
}

fn make_appender(
    path: &Path,
    config: FileConfig,
    formatter: LineFormatter,
) -> (Arc<StatusManager>, FileAppender<LogEvent>) {
    let status = Arc::new(StatusManager::new());
    let appender = FileAppender::new(status.clone())
        .with_config(config.with_file(path.to_string_lossy()))
        .with_formatter(Arc::new(formatter));
    (status, appender)
}

#[test]
fn test_file_is_header_records_footer_in_order() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("app.log");
    let formatter = LineFormatter::new()
        .with_file_header("# app log")
        .with_presentation_header(" v1")
        .with_presentation_footer("# end")
        .with_file_footer(" of log\n");
    let (status, mut appender) = make_appender(&path, FileConfig::default(), formatter.clone());

    appender.start();
    assert!(appender.is_started());
    let events = [make_event("first"), make_event("second"), make_event("third")];
    for event in &events {
        appender.append(event);
    }
    appender.stop();

    let mut expected = format!("# app log v1{}", LINE_SEPARATOR);
    for event in &events {
        expected.push_str(&formatter.format(event));
    }
    expected.push_str("# end of log\n");
    assert_eq!(fs::read_to_string(&path).unwrap(), expected);
    assert_eq!(status.count(Level::Error), 0);
}

#[test]
fn test_stop_twice_matches_stop_once() {
    let temp_dir = TempDir::new().unwrap();
    let once = temp_dir.path().join("once.log");
    let twice = temp_dir.path().join("twice.log");
    let formatter = LineFormatter::message_only().with_file_footer("bye\n");

    let (_, mut first) = make_appender(&once, FileConfig::default(), formatter.clone());
    first.start();
    first.append(&make_event("hello"));
    first.stop();

    let (_, mut second) = make_appender(&twice, FileConfig::default(), formatter);
    second.start();
    second.append(&make_event("hello"));
    second.stop();
    second.stop();
    drop(second);

    assert_eq!(fs::read(&once).unwrap(), fs::read(&twice).unwrap());
    assert_eq!(fs::read_to_string(&twice).unwrap(), "hello\nbye\n");
}

#[test]
fn test_prudent_forces_append_with_warning() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("app.log");
    fs::write(&path, "kept\n").unwrap();
    let config = FileConfig::default().with_prudent(true).with_append(false);
    let (status, mut appender) = make_appender(&path, config, LineFormatter::message_only());

    appender.start();

    assert!(appender.is_started());
    assert!(appender.config().append);
    assert!(!appender.configured().append);
    assert_eq!(status.count(Level::Warn), 1);

    appender.append(&make_event("added"));
    appender.stop();
    assert_eq!(fs::read_to_string(&path).unwrap(), "kept\nadded\n");
}

#[test]
fn test_buffered_disables_immediate_flush() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("app.log");
    let config = FileConfig::default()
        .with_buffered_io(true)
        .with_immediate_flush(true);
    let (status, mut appender) = make_appender(&path, config, LineFormatter::message_only());

    appender.start();

    assert!(appender.is_started());
    assert!(!appender.config().immediate_flush);
    assert_eq!(status.count(Level::Info), 2);
    assert_eq!(status.count(Level::Warn), 0);
}

#[test]
fn test_buffered_tail_is_written_on_stop() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("app.log");
    let config = FileConfig::default().with_buffered_io(true);
    let (_, mut appender) = make_appender(&path, config, LineFormatter::message_only());

    appender.start();
    appender.append(&make_event("buffered"));
    assert_eq!(fs::read_to_string(&path).unwrap(), "");

    appender.flush();
    assert_eq!(fs::read_to_string(&path).unwrap(), "buffered\n");

    appender.append(&make_event("tail"));
    appender.stop();
    assert_eq!(fs::read_to_string(&path).unwrap(), "buffered\ntail\n");
}

#[test]
fn test_buffered_tail_is_written_on_drop() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("app.log");
    let config = FileConfig::default().with_buffered_io(true);
    let formatter = LineFormatter::message_only().with_file_footer("--\n");
    let (_, mut appender) = make_appender(&path, config, formatter);

    appender.start();
    appender.append(&make_event("tail"));
    drop(appender);

    assert_eq!(fs::read_to_string(&path).unwrap(), "tail\n--\n");
}

#[test]
fn test_unknown_charset_falls_back_with_warning() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("app.log");
    let config = FileConfig::default().with_encoding("not-a-real-charset");
    let (status, mut appender) = make_appender(&path, config, LineFormatter::message_only());

    appender.start();
    appender.append(&make_event("héllo"));
    appender.stop();

    assert!(appender.state() == LifecycleState::Stopped);
    assert_eq!(appender.charset(), Charset::platform_default());
    assert_eq!(status.count(Level::Warn), 1);
    assert_eq!(status.count(Level::Error), 0);
    assert_eq!(fs::read(&path).unwrap(), "héllo\n".as_bytes());
}

#[test]
fn test_configured_charset_is_used() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("app.log");
    let config = FileConfig::default().with_encoding("UTF-16BE");
    let (_, mut appender) = make_appender(&path, config, LineFormatter::message_only());

    appender.start();
    appender.append(&make_event("A"));
    appender.stop();

    assert_eq!(appender.charset(), Charset::Utf16Be);
    assert_eq!(fs::read(&path).unwrap(), vec![0x00, b'A', 0x00, b'\n']);
}

#[test]
fn test_missing_file_keeps_appender_unstarted() {
    let status = Arc::new(StatusManager::new());
    let mut appender: FileAppender<LogEvent> = FileAppender::new(status.clone())
        .with_formatter(Arc::new(LineFormatter::new()));

    appender.start();
    appender.append(&make_event("nowhere"));

    assert_eq!(appender.state(), LifecycleState::Unstarted);
    // No file property and, as a consequence, no output stream.
    assert_eq!(status.count(Level::Error), 2);
}

#[test]
fn test_missing_formatter_keeps_appender_unstarted() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("app.log");
    let status = Arc::new(StatusManager::new());
    let mut appender: FileAppender<LogEvent> = FileAppender::new(status.clone())
        .with_name("audit")
        .with_config(FileConfig::default().with_file(path.to_string_lossy()));

    appender.start();

    assert_eq!(appender.state(), LifecycleState::Unstarted);
    let errors: Vec<_> = status
        .statuses()
        .into_iter()
        .filter(|s| s.level == Level::Error)
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "No formatter set for the appender named [audit].");
    assert_eq!(errors[0].origin, "audit");
}

#[test]
fn test_truncate_replaces_previous_content() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("app.log");
    fs::write(&path, "stale\n").unwrap();
    let config = FileConfig::default().with_append(false);
    let (_, mut appender) = make_appender(&path, config, LineFormatter::message_only());

    appender.start();
    appender.append(&make_event("fresh"));
    appender.stop();

    assert_eq!(fs::read_to_string(&path).unwrap(), "fresh\n");
}

#[test]
fn test_restart_after_stop_reopens_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("app.log");
    let formatter = LineFormatter::message_only().with_file_header("start");
    let (_, mut appender) = make_appender(&path, FileConfig::default(), formatter);

    appender.start();
    appender.append(&make_event("one"));
    appender.stop();
    appender.append(&make_event("dropped"));
    appender.start();
    appender.append(&make_event("two"));
    appender.stop();

    let sep = LINE_SEPARATOR;
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        format!("start{sep}one\nstart{sep}two\n")
    );
}

#[test]
fn test_start_twice_warns_and_keeps_channel() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("app.log");
    let (status, mut appender) =
        make_appender(&path, FileConfig::default(), LineFormatter::message_only());

    appender.start();
    appender.start();
    appender.append(&make_event("once"));
    appender.stop();

    assert_eq!(status.count(Level::Warn), 1);
    assert_eq!(fs::read_to_string(&path).unwrap(), "once\n");
}

#[test]
fn test_file_path_is_trimmed() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("app.log");
    let status = Arc::new(StatusManager::new());
    let mut appender: FileAppender<LogEvent> = FileAppender::new(status)
        .with_formatter(Arc::new(LineFormatter::message_only()));
    appender.set_file(format!("  {}  ", path.display()));

    appender.start();
    appender.append(&make_event("trimmed"));
    appender.stop();

    assert_eq!(fs::read_to_string(&path).unwrap(), "trimmed\n");
}

#[test]
fn test_concurrent_appends_do_not_interleave() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("app.log");
    let (_, mut appender) =
        make_appender(&path, FileConfig::default(), LineFormatter::message_only());
    appender.start();
    let appender = Arc::new(appender);

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let appender = appender.clone();
            std::thread::spawn(move || {
                for i in 0..100 {
                    let message = format!("worker-{}-{}-{}", worker, i, "x".repeat(200));
                    appender.append(&make_event(&message));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    appender.stop();

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<_> = content.lines().collect();
    assert_eq!(lines.len(), 400);
    for line in lines {
        assert!(line.starts_with("worker-"));
        assert!(line.ends_with(&"x".repeat(200)));
    }
}
