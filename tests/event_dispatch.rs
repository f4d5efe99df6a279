//! End-to-end event delivery through the public API with a recording runtime.

use std::sync::Arc;
use std::thread;

use sdkclient_bridge::config::EventConfig;
use sdkclient_bridge::testing::{OwnedField, RecordingRuntime};
use sdkclient_bridge::{ClientEvent, ClientEventCallbacks, EventBridge, EventKind};

fn bridge() -> EventBridge<RecordingRuntime> {
    let bridge = EventBridge::new(RecordingRuntime::new());
    bridge
        .register_handlers(&EventConfig::default())
        .expect("register handlers");
    bridge
}

#[test]
fn every_kind_reaches_its_own_class() {
    let bridge = bridge();
    let events = vec![
        ClientEvent::ConnectStatusChange {
            connection_id: 1,
            new_status: 4,
            error_number: 0,
        },
        ClientEvent::NewChannel {
            connection_id: 1,
            channel_id: 2,
            channel_parent_id: 0,
        },
        ClientEvent::NewChannelCreated {
            connection_id: 1,
            channel_id: 3,
            channel_parent_id: 2,
            invoker_id: 5,
            invoker_name: "alice".into(),
            invoker_unique_identifier: "uid".into(),
        },
        ClientEvent::DelChannel {
            connection_id: 1,
            channel_id: 3,
            invoker_id: 5,
            invoker_name: "alice".into(),
            invoker_unique_identifier: "uid".into(),
        },
        ClientEvent::ClientMove {
            connection_id: 1,
            client_id: 6,
            old_channel_id: 0,
            new_channel_id: 2,
            visibility: 0,
            move_message: String::new(),
        },
        ClientEvent::ClientMoveSubscription {
            connection_id: 1,
            client_id: 6,
            old_channel_id: 0,
            new_channel_id: 2,
            visibility: 0,
        },
        ClientEvent::ClientMoveTimeout {
            connection_id: 1,
            client_id: 6,
            old_channel_id: 2,
            new_channel_id: 0,
            visibility: 2,
            timeout_message: "timeout".into(),
        },
        ClientEvent::ClientMoveMoved {
            connection_id: 1,
            client_id: 6,
            old_channel_id: 2,
            new_channel_id: 3,
            visibility: 0,
            mover_id: 5,
            mover_name: "alice".into(),
            mover_unique_identifier: "uid".into(),
            move_message: "over here".into(),
        },
        ClientEvent::TalkStatusChange {
            connection_id: 1,
            status: 1,
            is_received_whisper: 0,
            client_id: 6,
        },
        ClientEvent::ServerError {
            connection_id: 1,
            error_message: "ok".into(),
            error: 0,
            return_code: "rc".into(),
            extra_message: String::new(),
        },
        ClientEvent::UserLoggingMessage {
            log_message: "connected".into(),
            log_level: 4,
            log_channel: "Client".into(),
            log_id: 1,
            log_time: "2024-01-01 00:00:00".into(),
            complete_log_string: "full".into(),
        },
    ];

    for event in &events {
        bridge.deliver_event(event).expect("delivered");
    }

    let dispatched = bridge.runtime().dispatched();
    assert_eq!(dispatched.len(), EventKind::COUNT);
    for (record, event) in dispatched.iter().zip(&events) {
        assert_eq!(record.kind, event.kind());
        assert!(record.class_path.ends_with(event.kind().class_name()));
        assert!(record.attached);
        let expected: Vec<OwnedField> = event.fields().into_iter().map(OwnedField::from).collect();
        assert_eq!(record.fields, expected, "{}", event.kind());
    }
    assert_eq!(
        dispatched[EventKind::COUNT - 1].fields,
        vec![
            OwnedField::Str("connected".into()),
            OwnedField::Int(4),
            OwnedField::Str("Client".into()),
            OwnedField::Long(1),
            OwnedField::Str("2024-01-01 00:00:00".into()),
            OwnedField::Str("full".into()),
        ]
    );
    assert_eq!(bridge.runtime().attached_threads(), 0);
}

#[test]
fn identifiers_keep_their_bits() {
    let bridge = bridge();
    bridge.on_client_move_moved(
        u64::MAX,
        u16::MAX,
        1 << 63,
        0,
        1,
        7,
        "m".into(),
        "u".into(),
        "x".into(),
    );

    let record = bridge.runtime().dispatched().pop().expect("one event");
    assert_eq!(record.fields[0], OwnedField::Long(-1));
    assert_eq!(record.fields[1], OwnedField::Int(65535));
    assert_eq!(record.fields[2], OwnedField::Long(i64::MIN));
}

#[test]
fn concurrent_engine_threads_each_attach_and_detach() {
    let bridge = Arc::new(bridge());
    let baseline = bridge.runtime().attaches();

    let workers: Vec<_> = (0..8u64)
        .map(|worker| {
            let bridge = Arc::clone(&bridge);
            thread::spawn(move || {
                for channel in 0..25u64 {
                    bridge.on_new_channel(worker, channel, 0);
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().expect("worker thread");
    }

    let runtime = bridge.runtime();
    assert_eq!(runtime.dispatched().len(), 200);
    assert!(runtime.dispatched().iter().all(|record| record.attached));
    assert_eq!(runtime.attaches() - baseline, 200);
    assert_eq!(runtime.attaches(), runtime.detaches());
    assert_eq!(runtime.attached_threads(), 0);
}

#[test]
fn custom_class_prefix_is_used() {
    let bridge = EventBridge::new(RecordingRuntime::new());
    let events = EventConfig {
        class_prefix: "org/example/events".to_string(),
        dispatch_method: "fire".to_string(),
    };
    bridge.register_handlers(&events).expect("register handlers");

    let handler = bridge
        .registry()
        .lookup(EventKind::ServerError)
        .expect("handler");
    assert_eq!(handler.class_path, "org/example/events/ServerError");
    assert_eq!(handler.dispatch_method, "fire");
}
