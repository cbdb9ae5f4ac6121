//! Integration tests for the tokio session driver.
//!
//! Runs `SessionDriver` on a paused clock with in-memory capabilities:
//! StaticSource serves the catalog, recorders capture URL writes, notices
//! and layout changes.

use std::sync::Arc;
use std::time::Duration;

use byrdocs::{
    Capabilities, Category, Config, Document, FixedViewport, LayoutChange, LayoutLog, NoticeKind,
    NoticeLog, SearchError, SearchSessionState, SessionDriver, SessionEvent, SessionHandle,
    SessionUpdate, StaticSource, UrlHistory,
};

const CATALOG: &str = r#"[
    { "id": "b1", "type": "book",
      "data": { "title": "Linear Algebra Done Right", "authors": ["Sheldon Axler"],
                "isbn": [], "filetype": "pdf" } },
    { "id": "b2", "type": "book",
      "data": { "title": "Concrete Mathematics", "authors": ["Knuth"],
                "isbn": [], "filetype": "pdf" } }
]"#;

const FEED: &str = r#"{ "items": [
    { "id": "1", "title": "新功能上线", "summary": "<p>支持预览</p>",
      "tags": ["主站公告"], "date_modified": "2024-09-01T08:00:00+08:00" }
] }"#;

struct Harness {
    handle: SessionHandle,
    history: UrlHistory,
    notices: NoticeLog,
    layout: LayoutLog,
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn source() -> StaticSource {
    let config = Config::default();
    StaticSource::new()
        .with_body(config.catalog_url, CATALOG)
        .with_body(config.feed_url, FEED)
}

fn start(source: StaticSource, width: u32, query: &str) -> Harness {
    let history = UrlHistory::new();
    let notices = NoticeLog::new();
    let layout = LayoutLog::new();

    let capabilities = Capabilities::new(Arc::new(source))
        .with_navigator(Arc::new(history.clone()))
        .with_notifier(Arc::new(notices.clone()))
        .with_layout(Arc::new(layout.clone()))
        .with_viewport(Arc::new(FixedViewport::new(width)));

    let handle = SessionDriver::spawn(Config::default(), capabilities, query).unwrap();
    Harness {
        handle,
        history,
        notices,
        layout,
    }
}

/// Lets the driver drain its queues.
async fn settle() {
    tokio::time::sleep(ms(10)).await;
}

fn drain(handle: &SessionHandle) -> Vec<SessionUpdate> {
    handle.updates().try_iter().collect()
}

fn last_state(updates: &[SessionUpdate]) -> Option<&SearchSessionState> {
    updates.iter().rev().find_map(|u| match u {
        SessionUpdate::State(state) => Some(state),
        _ => None,
    })
}

// ============================================================================
// Mount
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_mount_focuses_and_loads() {
    let h = start(source(), 1280, "");
    settle().await;

    let updates = drain(&h.handle);
    assert!(updates.contains(&SessionUpdate::FocusInput));

    let state = last_state(&updates).unwrap();
    assert!(state.catalog_ready);
    assert!(!state.catalog_loading);
    assert_eq!(state.announcements.len(), 1);
    assert_eq!(state.visible_announcements()[0].title, "新功能上线");
    assert!(h.history.writes().is_empty());

    h.handle.shutdown();
    h.handle.join().await;
}

#[tokio::test(start_paused = true)]
async fn test_mount_resolves_restored_query() {
    let h = start(source(), 1280, "?q=knuth&c=book");
    settle().await;

    let state = last_state(&drain(&h.handle)).cloned().unwrap();
    let ids: Vec<_> = state.results.iter().map(Document::id).collect();
    assert_eq!(ids, vec!["b2"]);
    assert_eq!(state.category, Category::Book);
    assert!(!state.busy());
}

#[tokio::test(start_paused = true)]
async fn test_catalog_failure_notifies() {
    let source = source().with_status(Config::default().catalog_url, 502);
    let h = start(source, 1280, "");
    settle().await;

    let state = last_state(&drain(&h.handle)).cloned().unwrap();
    assert!(!state.catalog_ready);
    assert!(state.catalog_error.is_some());

    let notices = h.notices.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::Error);
}

// ============================================================================
// Debounce on real timers
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_typing_writes_url_once_after_idle() {
    let h = start(source(), 1280, "");
    settle().await;

    for text in ["l", "li", "lin"] {
        h.handle
            .send(SessionEvent::KeywordChanged(text.to_string()))
            .unwrap();
        tokio::time::sleep(ms(100)).await;
    }
    assert!(h.history.writes().is_empty());

    tokio::time::sleep(ms(500)).await;
    assert_eq!(
        h.history.writes(),
        vec![byrdocs::UrlQuery::new("lin", Category::All)]
    );

    let state = last_state(&drain(&h.handle)).cloned().unwrap();
    assert_eq!(state.debounced_keyword, "lin");
    let ids: Vec<_> = state.results.iter().map(Document::id).collect();
    assert_eq!(ids, vec!["b1"]);
}

#[tokio::test(start_paused = true)]
async fn test_category_writes_url_without_waiting() {
    let h = start(source(), 1280, "");
    settle().await;

    h.handle
        .send(SessionEvent::CategorySelected(Category::Book))
        .unwrap();
    settle().await;

    assert_eq!(
        h.history.current(),
        Some(byrdocs::UrlQuery::new("", Category::Book))
    );
}

// ============================================================================
// Preview layout
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_panel_layout_follows_viewport() {
    let h = start(source(), 1280, "");
    settle().await;

    h.handle
        .send(SessionEvent::PreviewRequested("/files/b1.pdf".into()))
        .unwrap();
    h.handle
        .send(SessionEvent::ViewportResized { width: 375 })
        .unwrap();
    settle().await;

    assert_eq!(
        h.layout.changes(),
        vec![LayoutChange::PanelOpened, LayoutChange::PanelClosed]
    );
    let state = last_state(&drain(&h.handle)).cloned().unwrap();
    assert_eq!(state.mobile_preview(), Some("/files/b1.pdf"));
    assert_eq!(state.desktop_preview(), None);
}

// ============================================================================
// Teardown
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_shutdown_closes_session() {
    let h = start(source(), 1280, "");
    settle().await;

    h.handle
        .send(SessionEvent::KeywordChanged("axler".into()))
        .unwrap();
    h.handle.shutdown();
    assert!(h.handle.is_closed());

    let err = h
        .handle
        .send(SessionEvent::KeywordChanged("more".into()))
        .unwrap_err();
    assert!(matches!(err, SearchError::SessionClosed));

    // Idempotent
    h.handle.shutdown();

    let handle = h.handle;
    let updates = handle.updates().clone();
    handle.join().await;

    let updates: Vec<_> = updates.try_iter().collect();
    assert_eq!(updates.last(), Some(&SessionUpdate::Closed));
    assert!(last_state(&updates).unwrap().closed);

    // The pending keyword never reached the URL
    tokio::time::sleep(ms(1_000)).await;
    assert!(h.history.writes().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_dropping_handle_stops_driver() {
    let h = start(source(), 1280, "");
    settle().await;

    let updates = h.handle.updates().clone();
    drop(h.handle);
    settle().await;

    let updates: Vec<_> = updates.try_iter().collect();
    assert_eq!(updates.last(), Some(&SessionUpdate::Closed));
}
