//! Socket behaviour between a sender and a listener.

use std::io::Write;
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use musical_lights::Error;
use musical_lights::mode::Mode;
use musical_lights::protocol::StateMessage;
use musical_lights::transport::{StateListener, StateSender};

fn socket_path(dir: &tempfile::TempDir) -> PathBuf {
    dir.path().join("state.sock")
}

fn music(note: u8) -> StateMessage {
    StateMessage {
        note: Some(note),
        level: 0.5,
        ..StateMessage::silent(Mode::Music)
    }
}

/// Poll until `count` messages arrived or a second passed.
fn poll_for(listener: &mut StateListener, count: usize) -> Vec<StateMessage> {
    let deadline = Instant::now() + Duration::from_secs(1);
    let mut out = Vec::new();
    while out.len() < count && Instant::now() < deadline {
        out.extend(listener.poll());
        thread::sleep(Duration::from_millis(5));
    }
    out
}

fn send_raw(stream: &mut UnixStream, text: &str) {
    stream.write_all(text.as_bytes()).unwrap();
    stream.flush().unwrap();
}

#[test]
fn send_without_listener_is_a_noop() {
    let dir = tempfile::tempdir().unwrap();
    let mut sender = StateSender::new(socket_path(&dir));
    assert!(!sender.send(&music(0)));
    assert!(!sender.send(&music(1)));
    assert!(!sender.is_connected());
    assert_eq!(sender.dropped(), 2);
}

#[test]
fn messages_arrive_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = socket_path(&dir);
    let mut listener = StateListener::bind(&path).unwrap();
    let mut sender = StateSender::new(&path);

    for note in 0..5 {
        assert!(sender.send(&music(note)));
    }
    let got = poll_for(&mut listener, 5);
    let notes: Vec<Option<u8>> = got.iter().map(|m| m.note).collect();
    assert_eq!(notes, (0..5).map(Some).collect::<Vec<_>>());
    assert!(listener.is_connected());
}

#[test]
fn poll_never_blocks_without_client() {
    let dir = tempfile::tempdir().unwrap();
    let mut listener = StateListener::bind(socket_path(&dir)).unwrap();
    let start = Instant::now();
    for _ in 0..10 {
        assert!(listener.poll().is_empty());
    }
    assert!(start.elapsed() < Duration::from_millis(500));
}

#[test]
fn sender_reconnects_after_renderer_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = socket_path(&dir);
    let mut sender = StateSender::new(&path);

    let first = StateListener::bind(&path).unwrap();
    assert!(sender.send(&music(1)));
    drop(first);

    // The broken connection is noticed on a write and dropped
    let _ = sender.send(&music(2));

    let mut second = StateListener::bind(&path).unwrap();
    let deadline = Instant::now() + Duration::from_secs(1);
    let mut got = Vec::new();
    while got.is_empty() && Instant::now() < deadline {
        sender.send(&music(3));
        got.extend(second.poll());
        thread::sleep(Duration::from_millis(5));
    }
    assert!(got.iter().any(|m| m.note == Some(3)));
    assert!(sender.is_connected());
}

#[test]
fn malformed_line_keeps_connection_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = socket_path(&dir);
    let mut listener = StateListener::bind(&path).unwrap();
    let mut client = UnixStream::connect(&path).unwrap();

    send_raw(&mut client, "STATE 0 banana\nSTATE 0 9 0.50 0.000 0.00 0.00\n");
    let got = poll_for(&mut listener, 1);
    assert_eq!(got.len(), 1);
    assert_eq!(got[0].note, Some(9));
    assert_eq!(listener.malformed(), 1);
    assert!(listener.is_connected());

    send_raw(&mut client, "STATE 1 -1 0.25 0.000 0.00 0.00\n");
    let got = poll_for(&mut listener, 1);
    assert_eq!(got.len(), 1);
    assert_eq!(got[0].mode, Mode::Ambient);
}

#[test]
fn partial_line_waits_for_its_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = socket_path(&dir);
    let mut listener = StateListener::bind(&path).unwrap();
    let mut client = UnixStream::connect(&path).unwrap();

    send_raw(&mut client, "STATE 4 -1 0.5");
    thread::sleep(Duration::from_millis(20));
    assert!(listener.poll().is_empty());

    send_raw(&mut client, "0 0.000 0.00 0.00\n");
    let got = poll_for(&mut listener, 1);
    assert_eq!(got.len(), 1);
    assert_eq!(got[0].mode, Mode::Chase);
    assert_eq!(got[0].level, 0.5);
}

#[test]
fn client_disconnect_returns_to_accepting() {
    let dir = tempfile::tempdir().unwrap();
    let path = socket_path(&dir);
    let mut listener = StateListener::bind(&path).unwrap();

    let mut first = UnixStream::connect(&path).unwrap();
    send_raw(&mut first, "STATE 0 1 0.50 0.000 0.00 0.00\n");
    assert_eq!(poll_for(&mut listener, 1).len(), 1);
    drop(first);

    let deadline = Instant::now() + Duration::from_secs(1);
    while listener.is_connected() && Instant::now() < deadline {
        listener.poll();
        thread::sleep(Duration::from_millis(5));
    }
    assert!(!listener.is_connected());

    let mut second = UnixStream::connect(&path).unwrap();
    send_raw(&mut second, "STATE 0 2 0.50 0.000 0.00 0.00\n");
    let got = poll_for(&mut listener, 1);
    assert_eq!(got[0].note, Some(2));
}

#[test]
fn newer_connection_replaces_older() {
    let dir = tempfile::tempdir().unwrap();
    let path = socket_path(&dir);
    let mut listener = StateListener::bind(&path).unwrap();

    let mut old = UnixStream::connect(&path).unwrap();
    send_raw(&mut old, "STATE 0 1 0.50 0.000 0.00 0.00\n");
    assert_eq!(poll_for(&mut listener, 1).len(), 1);

    let mut new = UnixStream::connect(&path).unwrap();
    send_raw(&mut new, "STATE 0 2 0.50 0.000 0.00 0.00\n");
    let got = poll_for(&mut listener, 1);
    assert_eq!(got.len(), 1);
    assert_eq!(got[0].note, Some(2));

    // The old client is no longer read
    let _ = old.write_all(b"STATE 0 3 0.50 0.000 0.00 0.00\n");
    thread::sleep(Duration::from_millis(20));
    assert!(listener.poll().iter().all(|m| m.note != Some(3)));
}

#[test]
fn live_socket_is_not_stolen() {
    let dir = tempfile::tempdir().unwrap();
    let path = socket_path(&dir);
    let _owner = StateListener::bind(&path).unwrap();
    match StateListener::bind(&path) {
        Err(Error::SocketInUse(p)) => assert_eq!(p, path),
        Err(other) => panic!("unexpected error {other}"),
        Ok(_) => panic!("second listener bound a live socket"),
    }
}

#[test]
fn stale_socket_file_is_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let path = socket_path(&dir);
    // std listeners leave their file behind
    drop(UnixListener::bind(&path).unwrap());
    assert!(path.exists());

    let mut listener = StateListener::bind(&path).unwrap();
    let mut sender = StateSender::new(&path);
    assert!(sender.send(&music(7)));
    assert_eq!(poll_for(&mut listener, 1)[0].note, Some(7));
}

#[test]
fn dropping_listener_removes_socket_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = socket_path(&dir);
    let listener = StateListener::bind(&path).unwrap();
    assert!(path.exists());
    drop(listener);
    assert!(!path.exists());
}
