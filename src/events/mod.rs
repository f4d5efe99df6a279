//! Client library events and their managed-side layouts.
//!
//! Each [`EventKind`] maps to one managed event class whose constructor takes
//! a fixed sequence of longs, ints and strings. [`ClientEvent`] carries the
//! native arguments of one occurrence and flattens them into that sequence
//! with [`ClientEvent::fields`].

use std::fmt;

pub mod callbacks;

pub use callbacks::ClientEventCallbacks;

/// The eleven engine events forwarded to the managed runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    ConnectStatusChange,
    NewChannel,
    NewChannelCreated,
    DelChannel,
    ClientMove,
    ClientMoveSubscription,
    ClientMoveTimeout,
    ClientMoveMoved,
    TalkStatusChange,
    ServerError,
    UserLoggingMessage,
}

/// Primitive slot types of a managed event constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// 64-bit signed (`J`)
    Long,
    /// 32-bit signed (`I`)
    Int,
    /// `java.lang.String`
    Str,
}

impl FieldType {
    /// JNI type descriptor for this slot.
    pub fn descriptor(self) -> &'static str {
        match self {
            FieldType::Long => "J",
            FieldType::Int => "I",
            FieldType::Str => "Ljava/lang/String;",
        }
    }
}

use FieldType::{Int, Long, Str};

impl EventKind {
    pub const COUNT: usize = 11;

    pub const ALL: [EventKind; EventKind::COUNT] = [
        EventKind::ConnectStatusChange,
        EventKind::NewChannel,
        EventKind::NewChannelCreated,
        EventKind::DelChannel,
        EventKind::ClientMove,
        EventKind::ClientMoveSubscription,
        EventKind::ClientMoveTimeout,
        EventKind::ClientMoveMoved,
        EventKind::TalkStatusChange,
        EventKind::ServerError,
        EventKind::UserLoggingMessage,
    ];

    /// Dense index into per-kind tables.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Simple name of the managed event class.
    pub fn class_name(self) -> &'static str {
        match self {
            EventKind::ConnectStatusChange => "ConnectStatusChange",
            EventKind::NewChannel => "NewChannel",
            EventKind::NewChannelCreated => "NewChannelCreated",
            EventKind::DelChannel => "DelChannel",
            EventKind::ClientMove => "ClientMove",
            EventKind::ClientMoveSubscription => "ClientMoveSubscription",
            EventKind::ClientMoveTimeout => "ClientMoveTimeout",
            EventKind::ClientMoveMoved => "ClientMoveMoved",
            EventKind::TalkStatusChange => "TalkStatusChange",
            EventKind::ServerError => "ServerError",
            EventKind::UserLoggingMessage => "UserLoggingMessage",
        }
    }

    /// Constructor argument layout, in order.
    pub fn schema(self) -> &'static [FieldType] {
        match self {
            EventKind::ConnectStatusChange => &[Long, Int, Int],
            EventKind::NewChannel => &[Long, Long, Long],
            EventKind::NewChannelCreated => &[Long, Long, Long, Int, Str, Str],
            EventKind::DelChannel => &[Long, Long, Int, Str, Str],
            EventKind::ClientMove => &[Long, Int, Long, Long, Int, Str],
            EventKind::ClientMoveSubscription => &[Long, Int, Long, Long, Int],
            EventKind::ClientMoveTimeout => &[Long, Int, Long, Long, Int, Str],
            EventKind::ClientMoveMoved => &[Long, Int, Long, Long, Int, Int, Str, Str, Str],
            EventKind::TalkStatusChange => &[Long, Int, Int, Int],
            EventKind::ServerError => &[Long, Str, Int, Str, Str],
            EventKind::UserLoggingMessage => &[Str, Int, Str, Long, Str, Str],
        }
    }

    /// JNI method descriptor of the populating constructor, e.g. `(JII)V`.
    pub fn constructor_signature(self) -> String {
        let mut signature = String::from("(");
        for field in self.schema() {
            signature.push_str(field.descriptor());
        }
        signature.push_str(")V");
        signature
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_name())
    }
}

/// One constructor argument, borrowed from its [`ClientEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Long(i64),
    Int(i32),
    Str(&'a str),
}

impl FieldValue<'_> {
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValue::Long(_) => FieldType::Long,
            FieldValue::Int(_) => FieldType::Int,
            FieldValue::Str(_) => FieldType::Str,
        }
    }
}

/// A single engine event with its native arguments.
///
/// Identifiers keep their native widths here; [`ClientEvent::fields`] does the
/// reinterpretation into the managed runtime's signed types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    ConnectStatusChange {
        connection_id: u64,
        new_status: i32,
        error_number: u32,
    },
    NewChannel {
        connection_id: u64,
        channel_id: u64,
        channel_parent_id: u64,
    },
    NewChannelCreated {
        connection_id: u64,
        channel_id: u64,
        channel_parent_id: u64,
        invoker_id: u16,
        invoker_name: String,
        invoker_unique_identifier: String,
    },
    DelChannel {
        connection_id: u64,
        channel_id: u64,
        invoker_id: u16,
        invoker_name: String,
        invoker_unique_identifier: String,
    },
    ClientMove {
        connection_id: u64,
        client_id: u16,
        old_channel_id: u64,
        new_channel_id: u64,
        visibility: i32,
        move_message: String,
    },
    ClientMoveSubscription {
        connection_id: u64,
        client_id: u16,
        old_channel_id: u64,
        new_channel_id: u64,
        visibility: i32,
    },
    ClientMoveTimeout {
        connection_id: u64,
        client_id: u16,
        old_channel_id: u64,
        new_channel_id: u64,
        visibility: i32,
        timeout_message: String,
    },
    ClientMoveMoved {
        connection_id: u64,
        client_id: u16,
        old_channel_id: u64,
        new_channel_id: u64,
        visibility: i32,
        mover_id: u16,
        mover_name: String,
        mover_unique_identifier: String,
        move_message: String,
    },
    TalkStatusChange {
        connection_id: u64,
        status: i32,
        is_received_whisper: i32,
        client_id: u16,
    },
    ServerError {
        connection_id: u64,
        error_message: String,
        error: u32,
        return_code: String,
        extra_message: String,
    },
    UserLoggingMessage {
        log_message: String,
        log_level: i32,
        log_channel: String,
        log_id: u64,
        log_time: String,
        complete_log_string: String,
    },
}

// Managed longs and ints are signed; identifiers are passed bit-for-bit.
fn long(value: u64) -> FieldValue<'static> {
    FieldValue::Long(value as i64)
}

fn uint(value: u32) -> FieldValue<'static> {
    FieldValue::Int(value as i32)
}

fn any_id(value: u16) -> FieldValue<'static> {
    FieldValue::Int(i32::from(value))
}

impl ClientEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ClientEvent::ConnectStatusChange { .. } => EventKind::ConnectStatusChange,
            ClientEvent::NewChannel { .. } => EventKind::NewChannel,
            ClientEvent::NewChannelCreated { .. } => EventKind::NewChannelCreated,
            ClientEvent::DelChannel { .. } => EventKind::DelChannel,
            ClientEvent::ClientMove { .. } => EventKind::ClientMove,
            ClientEvent::ClientMoveSubscription { .. } => EventKind::ClientMoveSubscription,
            ClientEvent::ClientMoveTimeout { .. } => EventKind::ClientMoveTimeout,
            ClientEvent::ClientMoveMoved { .. } => EventKind::ClientMoveMoved,
            ClientEvent::TalkStatusChange { .. } => EventKind::TalkStatusChange,
            ClientEvent::ServerError { .. } => EventKind::ServerError,
            ClientEvent::UserLoggingMessage { .. } => EventKind::UserLoggingMessage,
        }
    }

    /// Constructor arguments in the order given by [`EventKind::schema`].
    pub fn fields(&self) -> Vec<FieldValue<'_>> {
        match self {
            ClientEvent::ConnectStatusChange {
                connection_id,
                new_status,
                error_number,
            } => vec![
                long(*connection_id),
                FieldValue::Int(*new_status),
                uint(*error_number),
            ],
            ClientEvent::NewChannel {
                connection_id,
                channel_id,
                channel_parent_id,
            } => vec![
                long(*connection_id),
                long(*channel_id),
                long(*channel_parent_id),
            ],
            ClientEvent::NewChannelCreated {
                connection_id,
                channel_id,
                channel_parent_id,
                invoker_id,
                invoker_name,
                invoker_unique_identifier,
            } => vec![
                long(*connection_id),
                long(*channel_id),
                long(*channel_parent_id),
                any_id(*invoker_id),
                FieldValue::Str(invoker_name),
                FieldValue::Str(invoker_unique_identifier),
            ],
            ClientEvent::DelChannel {
                connection_id,
                channel_id,
                invoker_id,
                invoker_name,
                invoker_unique_identifier,
            } => vec![
                long(*connection_id),
                long(*channel_id),
                any_id(*invoker_id),
                FieldValue::Str(invoker_name),
                FieldValue::Str(invoker_unique_identifier),
            ],
            ClientEvent::ClientMove {
                connection_id,
                client_id,
                old_channel_id,
                new_channel_id,
                visibility,
                move_message,
            } => vec![
                long(*connection_id),
                any_id(*client_id),
                long(*old_channel_id),
                long(*new_channel_id),
                FieldValue::Int(*visibility),
                FieldValue::Str(move_message),
            ],
            ClientEvent::ClientMoveSubscription {
                connection_id,
                client_id,
                old_channel_id,
                new_channel_id,
                visibility,
            } => vec![
                long(*connection_id),
                any_id(*client_id),
                long(*old_channel_id),
                long(*new_channel_id),
                FieldValue::Int(*visibility),
            ],
            ClientEvent::ClientMoveTimeout {
                connection_id,
                client_id,
                old_channel_id,
                new_channel_id,
                visibility,
                timeout_message,
            } => vec![
                long(*connection_id),
                any_id(*client_id),
                long(*old_channel_id),
                long(*new_channel_id),
                FieldValue::Int(*visibility),
                FieldValue::Str(timeout_message),
            ],
            ClientEvent::ClientMoveMoved {
                connection_id,
                client_id,
                old_channel_id,
                new_channel_id,
                visibility,
                mover_id,
                mover_name,
                mover_unique_identifier,
                move_message,
            } => vec![
                long(*connection_id),
                any_id(*client_id),
                long(*old_channel_id),
                long(*new_channel_id),
                FieldValue::Int(*visibility),
                any_id(*mover_id),
                FieldValue::Str(mover_name),
                FieldValue::Str(mover_unique_identifier),
                FieldValue::Str(move_message),
            ],
            ClientEvent::TalkStatusChange {
                connection_id,
                status,
                is_received_whisper,
                client_id,
            } => vec![
                long(*connection_id),
                FieldValue::Int(*status),
                FieldValue::Int(*is_received_whisper),
                any_id(*client_id),
            ],
            ClientEvent::ServerError {
                connection_id,
                error_message,
                error,
                return_code,
                extra_message,
            } => vec![
                long(*connection_id),
                FieldValue::Str(error_message),
                uint(*error),
                FieldValue::Str(return_code),
                FieldValue::Str(extra_message),
            ],
            ClientEvent::UserLoggingMessage {
                log_message,
                log_level,
                log_channel,
                log_id,
                log_time,
                complete_log_string,
            } => vec![
                FieldValue::Str(log_message),
                FieldValue::Int(*log_level),
                FieldValue::Str(log_channel),
                long(*log_id),
                FieldValue::Str(log_time),
                FieldValue::Str(complete_log_string),
            ],
        }
    }
}
