//! Full-lifecycle tests through the public API with the in-memory store:
//! the same create → edit → debounce → echo-snapshot loop the binary
//! drives, minus the terminal.

use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver};
use jotz::api::NotesApi;
use jotz::model::{Note, DEFAULT_NOTE_BODY};
use jotz::store::memory::MemoryStore;

fn make_api(debounce_ms: u64) -> (NotesApi<MemoryStore>, Receiver<Vec<Note>>) {
    let mut api = NotesApi::new(MemoryStore::new(), Duration::from_millis(debounce_ms));
    let (tx, rx) = unbounded();
    api.subscribe(tx).unwrap();
    api.apply_snapshot(rx.recv().unwrap());
    (api, rx)
}

fn pump(api: &mut NotesApi<MemoryStore>, rx: &Receiver<Vec<Note>>) {
    while let Ok(snapshot) = rx.try_recv() {
        api.apply_snapshot(snapshot);
    }
}

#[test]
fn full_edit_cycle_lands_in_the_store() {
    let (mut api, rx) = make_api(1000);

    api.create_note();
    pump(&mut api, &rx);
    let id = api.session().selected_id().cloned().unwrap();

    let start = Instant::now();
    api.edit(format!("{}\nhello", DEFAULT_NOTE_BODY), start);
    api.edit(
        format!("{}\nhello world", DEFAULT_NOTE_BODY),
        start + Duration::from_millis(500),
    );

    // Still within the quiet period: nothing persisted yet
    api.flush_due(start + Duration::from_millis(1400));
    pump(&mut api, &rx);
    assert_eq!(
        api.session().selected_note().unwrap().body,
        DEFAULT_NOTE_BODY
    );

    api.flush_due(start + Duration::from_millis(1500));
    pump(&mut api, &rx);

    let note = api.session().selected_note().unwrap();
    assert_eq!(note.id, id);
    assert!(note.body.ends_with("hello world"));
    assert!(note.updated_at > note.created_at);
}

#[test]
fn recency_order_follows_edits() {
    let (mut api, rx) = make_api(1000);

    api.create_note();
    pump(&mut api, &rx);
    api.create_note();
    pump(&mut api, &rx);

    // Edit the older note; it must move to the top
    api.select_note(2);
    let start = Instant::now();
    api.edit("# Bumped", start);
    api.flush_due(start + Duration::from_millis(1000));
    pump(&mut api, &rx);

    let order: Vec<String> = api
        .session()
        .sorted()
        .iter()
        .map(|n| n.body.clone())
        .collect();
    assert_eq!(order[0], "# Bumped");
}

#[test]
fn two_sessions_share_one_store() {
    let mut store = MemoryStore::new();

    // Session one creates a note directly against the store
    use jotz::model::NoteDraft;
    use jotz::store::DocumentStore;
    let id = store.create(&NoteDraft::new()).unwrap();

    // Session two subscribes afterwards and mirrors it immediately
    let mut api = NotesApi::new(store, Duration::from_millis(1000));
    let (tx, rx) = unbounded();
    api.subscribe(tx).unwrap();
    api.apply_snapshot(rx.recv().unwrap());

    assert_eq!(api.session().notes().len(), 1);
    assert_eq!(api.session().selected_id(), Some(&id));
}

#[test]
fn deleting_everything_returns_to_empty_state() {
    let (mut api, rx) = make_api(1000);
    api.create_note();
    pump(&mut api, &rx);
    api.create_note();
    pump(&mut api, &rx);

    api.delete_note(1);
    pump(&mut api, &rx);
    api.delete_note(1);
    pump(&mut api, &rx);

    assert!(api.session().is_empty());
    assert!(api.session().selected_id().is_none());
    assert_eq!(api.buffer(), "");
}

#[test]
fn unsubscribed_session_stops_mirroring() {
    let mut api = NotesApi::new(MemoryStore::new(), Duration::from_millis(1000));
    let (tx, rx) = unbounded();
    let sub = api.subscribe(tx).unwrap();
    api.apply_snapshot(rx.recv().unwrap());

    api.unsubscribe(sub);
    api.create_note();
    assert!(rx.try_recv().is_err());
}
