//! Integration tests for the search session state machine.
//!
//! Drives `SearchSession` with synthetic instants through the public API:
//! mount -> events -> effects. Property tests cover preview exclusivity,
//! keystroke coalescing and stale-result suppression over arbitrary
//! event sequences.

use std::sync::Arc;
use std::time::Duration;

use byrdocs::{
    Catalog, Category, Config, Document, Effect, FlagStore, KeyPress, KeywordResolver,
    MemoryFlagStore, PreviewSlot, Resolver, SearchSession, SessionEvent, UrlQuery, ViewportClass,
    FILTER_HINT,
};
use proptest::prelude::*;
use tokio::time::Instant;

const WIDE: u32 = 1280;
const NARROW: u32 = 375;

const CATALOG: &str = r#"[
    { "id": "b1", "type": "book",
      "data": { "title": "Linear Algebra Done Right", "authors": ["Sheldon Axler"],
                "publisher": "Springer", "isbn": ["9783319110790"], "filetype": "pdf" } },
    { "id": "b2", "type": "book",
      "data": { "title": "Concrete Mathematics", "authors": ["Graham", "Knuth"],
                "isbn": [], "filetype": "pdf" } },
    { "id": "t1", "type": "test",
      "data": { "course": { "name": "线性代数" },
                "time": { "start": 2019, "end": 2020, "semester": "Second" },
                "content": ["原题", "答案"], "filetype": "pdf" } },
    { "id": "d1", "type": "doc",
      "data": { "title": "线性代数复习提纲", "course": [{ "name": "线性代数" }],
                "content": ["知识点"], "filetype": "zip" } }
]"#;

// ============================================================================
// Helpers
// ============================================================================

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn catalog() -> Catalog {
    Catalog::from_json("test", CATALOG.as_bytes()).unwrap()
}

fn mount_with(query: &str, width: u32, flags: Arc<dyn FlagStore>) -> SearchSession {
    let (session, _) = SearchSession::mount(Config::default(), query, width, flags).unwrap();
    session
}

fn mount(query: &str, width: u32) -> SearchSession {
    mount_with(query, width, Arc::new(MemoryFlagStore::new()))
}

/// Delivers the catalog and runs any resolution it triggers.
fn ready(session: &mut SearchSession, now: Instant) {
    let effects = session.handle(SessionEvent::CatalogLoaded(Ok(catalog())), now);
    complete(session, effects, now);
}

/// Completes every `Resolve` effect in order.
fn complete(session: &mut SearchSession, effects: Vec<Effect>, now: Instant) {
    for effect in effects {
        if let Effect::Resolve(ticket) = effect {
            let results = KeywordResolver.search(session.catalog(), &ticket.keyword, ticket.category);
            session.handle(SessionEvent::ResolutionCompleted { ticket, results }, now);
        }
    }
}

fn url_writes(effects: &[Effect]) -> Vec<UrlQuery> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::ReplaceUrl(q) => Some(q.clone()),
            _ => None,
        })
        .collect()
}

fn ids(results: &[Document]) -> Vec<&str> {
    results.iter().map(Document::id).collect()
}

// ============================================================================
// Mount
// ============================================================================

#[test]
fn test_mount_without_query_is_collapsed() {
    let session = mount("", WIDE);
    let state = session.state();

    assert_eq!(state.keyword, "");
    assert_eq!(state.category, Category::All);
    assert!(!state.expanded);
    assert!(state.catalog_loading);
    assert!(state.busy());
    assert!(state.results.is_empty());
    assert_eq!(state.preview, PreviewSlot::Empty);
}

#[test]
fn test_mount_restores_and_resolves_once_catalog_arrives() {
    let t0 = Instant::now();
    let mut session = mount("?q=linear&c=book", WIDE);

    let effects = session.handle(SessionEvent::CatalogLoaded(Ok(catalog())), t0);
    let tickets: Vec<_> = effects
        .iter()
        .filter(|e| matches!(e, Effect::Resolve(_)))
        .collect();
    assert_eq!(tickets.len(), 1);
    assert!(session.state().resolving);

    complete(&mut session, effects, t0);
    let state = session.state();
    assert_eq!(ids(&state.results), vec!["b1"]);
    assert!(!state.busy());
}

#[test]
fn test_catalog_normalizes_exam_titles() {
    let catalog = catalog();
    assert_eq!(
        catalog.get("t1").map(Document::title),
        Some("2019-2020 第二学期 线性代数试卷")
    );
}

// ============================================================================
// Typing and URL synchronization
// ============================================================================

#[test]
fn test_fast_typing_writes_final_keyword_only() {
    let t0 = Instant::now();
    let mut session = mount("", WIDE);
    ready(&mut session, t0);

    let mut effects = Vec::new();
    for (i, text) in ["l", "li", "lin", "line", "linea", "linear"].iter().enumerate() {
        effects.extend(session.handle(
            SessionEvent::KeywordChanged(text.to_string()),
            t0 + ms(i as u64 * 80),
        ));
    }
    assert!(url_writes(&effects).is_empty());
    assert_eq!(session.state().keyword, "linear");
    assert_eq!(session.state().debounced_keyword, "");

    let deadline = session.next_deadline().unwrap();
    assert_eq!(deadline, t0 + ms(400) + ms(500));

    let effects = session.tick(deadline);
    assert_eq!(
        url_writes(&effects),
        vec![UrlQuery::new("linear", Category::All)]
    );
    complete(&mut session, effects, deadline);

    let state = session.state();
    assert_eq!(state.debounced_keyword, "linear");
    assert_eq!(ids(&state.results), vec!["b1"]);
    assert!(session.next_deadline().is_none());
}

#[test]
fn test_category_filters_current_results() {
    let t0 = Instant::now();
    let mut session = mount("?q=线性代数", WIDE);
    ready(&mut session, t0);
    assert_eq!(ids(&session.state().results), vec!["t1", "d1"]);

    let effects = session.handle(SessionEvent::CategorySelected(Category::Doc), t0);
    assert_eq!(
        url_writes(&effects),
        vec![UrlQuery::new("线性代数", Category::Doc)]
    );
    complete(&mut session, effects, t0);
    assert_eq!(ids(&session.state().results), vec!["d1"]);
}

#[test]
fn test_url_echo_is_ignored() {
    let t0 = Instant::now();
    let mut session = mount("", WIDE);
    ready(&mut session, t0);

    session.handle(SessionEvent::KeywordChanged("knuth".into()), t0);
    let effects = session.tick(t0 + ms(500));
    let written = url_writes(&effects).pop().unwrap();
    complete(&mut session, effects, t0 + ms(500));
    let before = session.state();

    let effects = session.handle(
        SessionEvent::Navigated(format!("?{}", written)),
        t0 + ms(600),
    );
    assert!(effects.is_empty());
    assert_eq!(session.state(), before);
}

#[test]
fn test_back_navigation_restores_query() {
    let t0 = Instant::now();
    let mut session = mount("?q=knuth", WIDE);
    ready(&mut session, t0);

    let effects = session.handle(SessionEvent::Navigated("?q=axler&c=book".into()), t0);
    assert!(url_writes(&effects).is_empty());
    complete(&mut session, effects, t0);

    let state = session.state();
    assert_eq!(state.keyword, "axler");
    assert_eq!(state.debounced_keyword, "axler");
    assert_eq!(state.category, Category::Book);
    assert_eq!(ids(&state.results), vec!["b1"]);
}

#[test]
fn test_clear_returns_to_landing() {
    let t0 = Instant::now();
    let mut session = mount("?q=knuth&c=book", WIDE);
    ready(&mut session, t0);

    let effects = session.handle(SessionEvent::Cleared, t0);
    assert_eq!(url_writes(&effects), vec![UrlQuery::default()]);
    assert!(effects.contains(&Effect::FocusInput));

    let state = session.state();
    assert!(!state.expanded);
    assert!(!state.has_query());
    assert!(state.results.is_empty());
    assert_eq!(state.category, Category::All);
}

// ============================================================================
// Filter hint persistence
// ============================================================================

#[test]
fn test_filter_hint_persists_across_sessions() {
    let t0 = Instant::now();
    let flags = Arc::new(MemoryFlagStore::new());

    let mut first = mount_with("", WIDE, flags.clone());
    let effects = first.handle(SessionEvent::CategorySelected(Category::Test), t0);
    assert!(effects
        .iter()
        .any(|e| matches!(e, Effect::Notify(n) if n.message == FILTER_HINT && n.persistent)));
    assert_eq!(flags.get_flag("filter-hint-shown").unwrap(), Some(true));

    let mut second = mount_with("", WIDE, flags);
    assert!(second.state().filter_hint_shown);
    let effects = second.handle(SessionEvent::CategorySelected(Category::Test), t0);
    assert!(!effects.iter().any(|e| matches!(e, Effect::Notify(_))));
}

#[test]
fn test_filter_hint_only_for_exam_category() {
    let t0 = Instant::now();
    let mut session = mount("", WIDE);
    for category in [Category::Book, Category::Doc, Category::All] {
        let effects = session.handle(SessionEvent::CategorySelected(category), t0);
        assert!(!effects.iter().any(|e| matches!(e, Effect::Notify(_))));
    }
    assert!(!session.state().filter_hint_shown);
}

// ============================================================================
// Keyboard
// ============================================================================

#[test]
fn test_keys_in_input_are_ignored() {
    let t0 = Instant::now();
    let mut session = mount("", WIDE);
    let effects = session.handle(
        SessionEvent::KeyPressed(KeyPress::new("/").body_focused(false)),
        t0,
    );
    assert!(effects.is_empty());
}

#[test]
fn test_modified_keys_do_not_trigger_tip() {
    let t0 = Instant::now();
    let mut session = mount("", WIDE);
    let effects = session.handle(SessionEvent::KeyPressed(KeyPress::new("c").with_ctrl()), t0);
    assert!(effects.is_empty());
}

// ============================================================================
// Properties
// ============================================================================

#[derive(Clone, Debug)]
enum Op {
    Preview(u8),
    CloseDrawer,
    ClosePanel,
    Resize(u32),
    Type(String),
    Category(u8),
    Wait(u64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..4).prop_map(Op::Preview),
        Just(Op::CloseDrawer),
        Just(Op::ClosePanel),
        prop_oneof![Just(NARROW), Just(WIDE), 300u32..2000].prop_map(Op::Resize),
        "[a-z ]{0,6}".prop_map(Op::Type),
        (0u8..4).prop_map(Op::Category),
        (0u64..1200).prop_map(Op::Wait),
    ]
}

proptest! {
    /// The open preview always lives on the surface matching the viewport.
    #[test]
    fn prop_preview_matches_viewport(ops in proptest::collection::vec(op(), 1..60)) {
        let t0 = Instant::now();
        let mut now = t0;
        let mut session = mount("", WIDE);

        for op in ops {
            let event = match op {
                Op::Preview(n) => SessionEvent::PreviewRequested(format!("/files/{}.pdf", n)),
                Op::CloseDrawer => SessionEvent::DrawerClosed,
                Op::ClosePanel => SessionEvent::PanelClosed,
                Op::Resize(width) => SessionEvent::ViewportResized { width },
                Op::Type(text) => SessionEvent::KeywordChanged(text),
                Op::Category(n) => SessionEvent::CategorySelected(Category::ALL[n as usize]),
                Op::Wait(d) => {
                    now += ms(d);
                    session.tick(now);
                    continue;
                }
            };
            session.handle(event, now);

            let state = session.state();
            prop_assert!(state.mobile_preview().is_none() || state.desktop_preview().is_none());
            match state.preview {
                PreviewSlot::Mobile(_) => prop_assert_eq!(state.viewport, ViewportClass::Narrow),
                PreviewSlot::Desktop(_) => prop_assert_eq!(state.viewport, ViewportClass::Wide),
                PreviewSlot::Empty => {}
            }
        }
    }

    /// Keystrokes closer together than the window produce one URL write,
    /// carrying the last keyword.
    #[test]
    fn prop_keystrokes_coalesce(
        mut words in proptest::collection::vec("[a-z]{1,8}", 1..12),
        gaps in proptest::collection::vec(0u64..499, 12),
    ) {
        // Retyping the pending keyword does not restart the window
        words.dedup();
        let t0 = Instant::now();
        let mut now = t0;
        let mut session = mount("", WIDE);
        let mut writes = Vec::new();

        for (word, gap) in words.iter().zip(gaps) {
            writes.extend(url_writes(&session.handle(SessionEvent::KeywordChanged(word.clone()), now)));
            now += ms(gap);
        }
        let deadline = session.next_deadline().unwrap();
        writes.extend(url_writes(&session.tick(deadline)));
        writes.extend(url_writes(&session.tick(deadline + ms(10_000))));

        let last = words.last().unwrap();
        prop_assert_eq!(writes, vec![UrlQuery::new(last.clone(), Category::All)]);
        prop_assert_eq!(&session.state().debounced_keyword, last);
    }

    /// Only the latest resolution is ever published, whatever the
    /// completion order.
    #[test]
    fn prop_only_latest_resolution_wins(
        mut words in proptest::collection::vec(
            prop_oneof![Just("linear"), Just("knuth"), Just("axler"), Just("线性")],
            2..6,
        ),
        order in proptest::collection::vec(any::<u8>(), 6),
    ) {
        // An unchanged keyword settles without a new resolution
        words.dedup();
        let t0 = Instant::now();
        let mut now = t0;
        let mut session = mount("", WIDE);
        session.handle(SessionEvent::CatalogLoaded(Ok(catalog())), now);

        let mut tickets = Vec::new();
        for word in &words {
            session.handle(SessionEvent::KeywordChanged(word.to_string()), now);
            now += ms(500);
            for effect in session.tick(now) {
                if let Effect::Resolve(ticket) = effect {
                    tickets.push(ticket);
                }
            }
        }
        prop_assert_eq!(tickets.len(), words.len());

        // Deliver completions in a shuffled order
        let mut pending: Vec<_> = tickets.clone();
        let mut i = 0;
        while !pending.is_empty() {
            let idx = order[i % order.len()] as usize % pending.len();
            let ticket = pending.remove(idx);
            let results = KeywordResolver.search(session.catalog(), &ticket.keyword, ticket.category);
            session.handle(SessionEvent::ResolutionCompleted { ticket, results }, now);
            i += 1;
        }

        let latest = tickets.last().unwrap();
        let expected = KeywordResolver.search(session.catalog(), &latest.keyword, latest.category);
        let state = session.state();
        prop_assert_eq!(&state.results[..], &expected[..]);
        prop_assert!(!state.resolving);
    }
}
