use qrpro_scan::frame_from_image;
use qrpro_types::{AppEvent, HistoryCategory, Page};

use super::{Harness, alerts, notices, write_blank_png, write_qr_png};

fn scan_results(events: &[AppEvent]) -> Vec<(String, bool)> {
    events
        .iter()
        .filter_map(|e| match e {
            AppEvent::ShowScanResult { data, openable } => Some((data.clone(), *openable)),
            _ => None,
        })
        .collect()
}

fn statuses(events: &[AppEvent]) -> Vec<&str> {
    events
        .iter()
        .filter_map(|e| match e {
            AppEvent::ScanStatus { status, .. } => Some(status.as_str()),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn file_without_code_alerts_and_records_nothing() {
    let harness = Harness::new();
    let path = harness.dir.path().join("blank.png");
    write_blank_png(&path);

    let events = harness.request(AppEvent::ScanFile(path)).await;

    assert_eq!(alerts(&events), vec!["No QR code found in image"]);
    assert!(scan_results(&events).is_empty());
    assert!(harness.state.history.list(HistoryCategory::Scanned).unwrap().is_empty());
}

#[tokio::test]
async fn file_with_link_is_openable_and_recorded() {
    let harness = Harness::new();
    let path = harness.dir.path().join("link.png");
    write_qr_png(&path, "https://example.com/menu");

    let events = harness.request(AppEvent::ScanFile(path)).await;

    assert_eq!(
        scan_results(&events),
        vec![("https://example.com/menu".to_string(), true)]
    );
    assert_eq!(notices(&events), vec!["QR Code scanned successfully!"]);

    let scanned = harness.state.history.list(HistoryCategory::Scanned).unwrap();
    assert_eq!(scanned.len(), 1);
    assert_eq!(scanned[0].data, "https://example.com/menu");
    assert_eq!(scanned[0].kind, None);
}

#[tokio::test]
async fn non_image_file_is_rejected() {
    let harness = Harness::new();
    let path = harness.dir.path().join("notes.txt");
    std::fs::write(&path, "not an image").unwrap();

    let events = harness.request(AppEvent::ScanFile(path)).await;
    let alerts = alerts(&events);
    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].starts_with("Not an image"), "{alerts:?}");
}

#[tokio::test]
async fn live_decode_emits_one_result_and_releases_camera() {
    let harness = Harness::new();
    let frames = harness.frames_dir();
    write_blank_png(&frames.join("00-blank.png"));
    write_qr_png(&frames.join("01-code.png"), "live payload");

    harness.request(AppEvent::Navigate(Page::Scanner)).await;
    let events = harness.request(AppEvent::StartCamera).await;

    assert_eq!(
        statuses(&events)[..2],
        ["Starting camera...", "Point camera at QR code"]
    );
    assert_eq!(scan_results(&events), vec![("live payload".to_string(), false)]);
    assert!(!harness.camera.in_use());

    let scanned = harness.state.history.list(HistoryCategory::Scanned).unwrap();
    assert_eq!(scanned.len(), 1);
    assert_eq!(scanned[0].data, "live payload");
}

#[tokio::test]
async fn leaving_scanner_stops_camera() {
    let harness = Harness::new();
    write_blank_png(&harness.frames_dir().join("blank.png"));

    harness.request(AppEvent::Navigate(Page::Scanner)).await;
    harness.send(AppEvent::StartCamera).await;
    harness.send(AppEvent::Navigate(Page::Generator)).await;

    // One completion for the camera request, one for navigation
    let events = harness.collect(2).await;

    assert!(scan_results(&events).is_empty());
    assert!(events.iter().any(|e| matches!(e, AppEvent::PageChanged(Page::Generator))));
    assert!(!harness.camera.in_use());
    assert!(harness.state.history.list(HistoryCategory::Scanned).unwrap().is_empty());
}

#[tokio::test]
async fn explicit_stop_releases_camera() {
    let harness = Harness::new();
    write_blank_png(&harness.frames_dir().join("blank.png"));

    harness.send(AppEvent::StartCamera).await;
    harness.send(AppEvent::StopCamera).await;
    let events = harness.collect(2).await;

    assert!(scan_results(&events).is_empty());
    assert!(!harness.camera.in_use());

    // Stopping twice is harmless
    let events = harness.request(AppEvent::StopCamera).await;
    assert!(alerts(&events).is_empty());
}

#[tokio::test]
async fn unavailable_camera_reports_and_completes() {
    let harness = Harness::new();

    let events = harness.request(AppEvent::StartCamera).await;

    assert_eq!(
        statuses(&events),
        vec!["Starting camera...", "Camera access denied"]
    );
    assert_eq!(
        alerts(&events),
        vec!["Unable to access camera. Please check permissions."]
    );
    assert!(!harness.camera.in_use());
}

#[tokio::test]
async fn clipboard_image_is_scanned() {
    let harness = Harness::new();
    let path = harness.dir.path().join("clip.png");
    write_qr_png(&path, "from clipboard");
    harness
        .clipboard
        .put_image(frame_from_image(image::open(&path).unwrap()));

    let events = harness.request(AppEvent::ScanClipboard).await;
    assert_eq!(scan_results(&events), vec![("from clipboard".to_string(), false)]);
}

#[tokio::test]
async fn empty_clipboard_alerts() {
    let harness = Harness::new();
    let events = harness.request(AppEvent::ScanClipboard).await;
    assert_eq!(alerts(&events), vec!["Clipboard does not hold an image"]);
}

#[tokio::test]
async fn result_can_be_copied_but_not_opened_when_not_a_link() {
    let harness = Harness::new();
    let path = harness.dir.path().join("text.png");
    write_qr_png(&path, "plain words");
    harness.request(AppEvent::ScanFile(path)).await;

    let events = harness.request(AppEvent::CopyResult).await;
    assert_eq!(notices(&events), vec!["Copied to clipboard!"]);
    assert_eq!(harness.clipboard.text().as_deref(), Some("plain words"));

    let events = harness.request(AppEvent::OpenResult).await;
    assert_eq!(alerts(&events), vec!["Scan result is not a link"]);
}

#[tokio::test]
async fn late_result_from_previous_session_is_dropped() {
    let harness = Harness::new();
    write_blank_png(&harness.frames_dir().join("blank.png"));

    harness.send(AppEvent::StartCamera).await;
    harness.send(AppEvent::StopCamera).await;
    harness.collect(2).await;

    // Second session, while the first one's results are still in flight
    harness.send(AppEvent::StartCamera).await;
    harness
        .send(AppEvent::FrameDecoded {
            epoch: 1,
            data: "stale payload".into(),
        })
        .await;
    harness
        .send(AppEvent::CaptureFailed {
            epoch: 1,
            reason: "stale failure".into(),
        })
        .await;
    let events = harness.request(AppEvent::ReportTheme).await;

    assert!(scan_results(&events).is_empty());
    assert!(alerts(&events).is_empty());
    assert!(harness.camera.in_use());

    harness.send(AppEvent::StopCamera).await;
    harness.collect(2).await;
    assert!(!harness.camera.in_use());
    assert!(harness.state.history.list(HistoryCategory::Scanned).unwrap().is_empty());
}
