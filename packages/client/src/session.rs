//! WebSocket client session management.

use std::sync::Arc;

use coderoom_server::infrastructure::dto::websocket::{ClientEvent, ServerEvent};
use coderoom_shared::time::current_timestamp_millis;
use futures_util::{
    SinkExt, StreamExt,
    stream::{SplitSink, SplitStream},
};
use tokio::{
    net::TcpStream,
    sync::{Mutex, mpsc},
};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message,
};

use crate::{
    command::{Command, USAGE},
    domain::SessionState,
    error::ClientError,
    formatter::MessageFormatter,
    ui::redisplay_prompt,
};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Run one connected session until the user quits or the connection drops.
///
/// The current room (if any) is joined first, so a reconnecting session picks
/// up where the previous one left off.
///
/// # Returns
///
/// * `Ok(())` - the user quit
/// * `Err(ClientError::ConnectionError)` - the connection could not be established
/// * `Err(ClientError::ConnectionLost)` - the connection dropped after it was up
pub async fn run_client_session(
    url: &str,
    state: Arc<Mutex<SessionState>>,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let (ws_stream, _response) = connect_async(url)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;
    tracing::info!("Connected to relay at {}", url);

    let (mut write, read) = ws_stream.split();

    let join = state.lock().await.join_event();
    if let Some(join) = join {
        send_event(&mut write, &join).await?;
    }

    let mut read_task = tokio::spawn(read_loop(read, state.clone()));

    loop {
        tokio::select! {
            line = input_rx.recv() => {
                // Input closed (Ctrl+C / Ctrl+D)
                let Some(line) = line else {
                    read_task.abort();
                    let _ = write.close().await;
                    return Ok(());
                };

                let command = match Command::parse(&line) {
                    Ok(command) => command,
                    Err(e) => {
                        println!("{}\n{}", e, USAGE);
                        redisplay_prompt();
                        continue;
                    }
                };

                if command == Command::Quit {
                    read_task.abort();
                    let _ = write.close().await;
                    return Ok(());
                }

                let events = state.lock().await.apply_command(command);
                for event in &events {
                    if let Err(e) = send_event(&mut write, event).await {
                        read_task.abort();
                        return Err(e);
                    }
                }
                redisplay_prompt();
            }
            _ = &mut read_task => {
                return Err(ClientError::ConnectionLost("read side closed".to_string()));
            }
        }
    }
}

async fn send_event(
    write: &mut SplitSink<WsStream, Message>,
    event: &ClientEvent,
) -> Result<(), ClientError> {
    let text = event.encode()?;
    write
        .send(Message::Text(text.into()))
        .await
        .map_err(|e| ClientError::ConnectionLost(e.to_string()))?;
    tracing::debug!("Sent '{}'", event.name());
    Ok(())
}

/// Print incoming events until the connection closes
async fn read_loop(mut read: SplitStream<WsStream>, state: Arc<Mutex<SessionState>>) {
    while let Some(message) = read.next().await {
        match message {
            Ok(Message::Text(text)) => {
                let output = match serde_json::from_str::<ServerEvent>(text.as_str()) {
                    Ok(event) => {
                        let mut state = state.lock().await;
                        state.apply_server_event(&event);
                        render(&state, &event)
                    }
                    Err(_) => Some(MessageFormatter::format_raw_message(text.as_str())),
                };
                if let Some(output) = output {
                    print!("{}", output);
                    redisplay_prompt();
                }
            }
            Ok(Message::Close(_)) => {
                tracing::info!("Server closed the connection");
                break;
            }
            Err(e) => {
                tracing::warn!("WebSocket read error: {}", e);
                break;
            }
            _ => {}
        }
    }
}

fn render(state: &SessionState, event: &ServerEvent) -> Option<String> {
    match event {
        ServerEvent::UserJoined(_) => Some(MessageFormatter::format_members(
            state.room.as_deref().unwrap_or("-"),
            &state.members,
            &state.name,
        )),
        ServerEvent::CodeUpdate(code) => Some(MessageFormatter::format_document(
            code,
            current_timestamp_millis(),
        )),
        ServerEvent::LanguageUpdate(language) => Some(MessageFormatter::format_language(language)),
        ServerEvent::UserTyping(name) => MessageFormatter::format_typing(name, &state.name),
    }
}
