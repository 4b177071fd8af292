use filesink_status::{Level, StatusManager, StatusReporter, StatusSink};
use std::io;
use std::sync::Arc;
use std::thread;

#[test]
fn test_reporter_tags_origin() {
    let manager = Arc::new(StatusManager::new());
    let reporter = StatusReporter::new("audit", manager.clone());

    reporter.info("File property is set to [audit.log]");
    reporter.error_with(
        "IO failure in appender",
        io::Error::new(io::ErrorKind::Other, "disk full"),
    );

    let statuses = manager.statuses();
    assert_eq!(statuses.len(), 2);
    assert!(statuses.iter().all(|s| s.origin == "audit"));
    assert_eq!(statuses[1].level, Level::Error);
    assert_eq!(
        statuses[1].cause.as_ref().map(|c| c.to_string()),
        Some("disk full".to_string())
    );
}

#[test]
fn test_renamed_reporter_uses_new_origin() {
    let manager = Arc::new(StatusManager::new());
    let mut reporter = StatusReporter::new("file", manager.clone());
    reporter.set_origin("access");
    reporter.warn("careful");

    assert_eq!(reporter.origin(), "access");
    assert_eq!(manager.statuses()[0].origin, "access");
}

#[test]
fn test_concurrent_reports_are_all_kept() {
    let manager = Arc::new(StatusManager::new());
    let sink: Arc<dyn StatusSink> = manager.clone();

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let reporter = StatusReporter::new(format!("worker-{}", i), sink.clone());
            thread::spawn(move || {
                for _ in 0..25 {
                    reporter.warn("tick");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(manager.count(Level::Warn), 100);
}
