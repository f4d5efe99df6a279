//! Capability interface handed to the native callback table.

use super::ClientEvent;

/// One method per engine callback, with the engine's argument types.
///
/// Implementors only provide [`deliver`](ClientEventCallbacks::deliver); the
/// per-event methods package their arguments into a [`ClientEvent`]. Every
/// method may be called from any engine thread, concurrently.
#[allow(clippy::too_many_arguments)]
pub trait ClientEventCallbacks: Send + Sync {
    fn deliver(&self, event: ClientEvent);

    fn on_connect_status_change(&self, connection_id: u64, new_status: i32, error_number: u32) {
        self.deliver(ClientEvent::ConnectStatusChange {
            connection_id,
            new_status,
            error_number,
        });
    }

    fn on_new_channel(&self, connection_id: u64, channel_id: u64, channel_parent_id: u64) {
        self.deliver(ClientEvent::NewChannel {
            connection_id,
            channel_id,
            channel_parent_id,
        });
    }

    fn on_new_channel_created(
        &self,
        connection_id: u64,
        channel_id: u64,
        channel_parent_id: u64,
        invoker_id: u16,
        invoker_name: String,
        invoker_unique_identifier: String,
    ) {
        self.deliver(ClientEvent::NewChannelCreated {
            connection_id,
            channel_id,
            channel_parent_id,
            invoker_id,
            invoker_name,
            invoker_unique_identifier,
        });
    }

    fn on_del_channel(
        &self,
        connection_id: u64,
        channel_id: u64,
        invoker_id: u16,
        invoker_name: String,
        invoker_unique_identifier: String,
    ) {
        self.deliver(ClientEvent::DelChannel {
            connection_id,
            channel_id,
            invoker_id,
            invoker_name,
            invoker_unique_identifier,
        });
    }

    fn on_client_move(
        &self,
        connection_id: u64,
        client_id: u16,
        old_channel_id: u64,
        new_channel_id: u64,
        visibility: i32,
        move_message: String,
    ) {
        self.deliver(ClientEvent::ClientMove {
            connection_id,
            client_id,
            old_channel_id,
            new_channel_id,
            visibility,
            move_message,
        });
    }

    fn on_client_move_subscription(
        &self,
        connection_id: u64,
        client_id: u16,
        old_channel_id: u64,
        new_channel_id: u64,
        visibility: i32,
    ) {
        self.deliver(ClientEvent::ClientMoveSubscription {
            connection_id,
            client_id,
            old_channel_id,
            new_channel_id,
            visibility,
        });
    }

    fn on_client_move_timeout(
        &self,
        connection_id: u64,
        client_id: u16,
        old_channel_id: u64,
        new_channel_id: u64,
        visibility: i32,
        timeout_message: String,
    ) {
        self.deliver(ClientEvent::ClientMoveTimeout {
            connection_id,
            client_id,
            old_channel_id,
            new_channel_id,
            visibility,
            timeout_message,
        });
    }

    fn on_client_move_moved(
        &self,
        connection_id: u64,
        client_id: u16,
        old_channel_id: u64,
        new_channel_id: u64,
        visibility: i32,
        mover_id: u16,
        mover_name: String,
        mover_unique_identifier: String,
        move_message: String,
    ) {
        self.deliver(ClientEvent::ClientMoveMoved {
            connection_id,
            client_id,
            old_channel_id,
            new_channel_id,
            visibility,
            mover_id,
            mover_name,
            mover_unique_identifier,
            move_message,
        });
    }

    fn on_talk_status_change(
        &self,
        connection_id: u64,
        status: i32,
        is_received_whisper: i32,
        client_id: u16,
    ) {
        self.deliver(ClientEvent::TalkStatusChange {
            connection_id,
            status,
            is_received_whisper,
            client_id,
        });
    }

    fn on_server_error(
        &self,
        connection_id: u64,
        error_message: String,
        error: u32,
        return_code: String,
        extra_message: String,
    ) {
        self.deliver(ClientEvent::ServerError {
            connection_id,
            error_message,
            error,
            return_code,
            extra_message,
        });
    }

    fn on_user_logging_message(
        &self,
        log_message: String,
        log_level: i32,
        log_channel: String,
        log_id: u64,
        log_time: String,
        complete_log_string: String,
    ) {
        self.deliver(ClientEvent::UserLoggingMessage {
            log_message,
            log_level,
            log_channel,
            log_id,
            log_time,
            complete_log_string,
        });
    }
}
