//! WebSocket client session management.

use futures_util::{SinkExt, StreamExt};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use idobata_server::infrastructure::dto::websocket::{
    ClientEvent, HistoryEvent, JoinedEvent, MessageEvent, RenamedEvent, UserListEvent,
};

use crate::{
    command::{Command, HELP_TEXT, parse_command},
    error::ClientError,
    formatter::MessageFormatter,
    ui::redisplay_prompt,
};

/// Run the WebSocket client session until quit or disconnect
pub async fn run_client_session(url: &str, nickname: &str) -> Result<(), ClientError> {
    let (ws_stream, _response) = connect_async(url)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    tracing::info!("Connected to chat server!");
    println!("\nConnected to {}. Type /help for commands, /quit to exit.\n", url);

    let (mut write, mut read) = ws_stream.split();

    // Claim the nickname right away; the server answers with `joined`
    send_event(
        &mut write,
        &ClientEvent::Join {
            user: nickname.to_string(),
        },
    )
    .await?;

    // Input runs on its own thread: readline blocks, the session loop must not
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();
    std::thread::spawn(move || {
        let mut editor = match DefaultEditor::new() {
            Ok(editor) => editor,
            Err(e) => {
                tracing::error!("Failed to initialize line editor: {}", e);
                return;
            }
        };
        loop {
            match editor.readline("") {
                Ok(line) => {
                    let _ = editor.add_history_entry(&line);
                    if input_tx.send(line).is_err() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    let _ = input_tx.send("/quit".to_string());
                    break;
                }
                Err(e) => {
                    tracing::error!("Input error: {}", e);
                    let _ = input_tx.send("/quit".to_string());
                    break;
                }
            }
        }
    });

    // Learned from `joined`/`renamed` acks as the session goes
    let mut my_id: Option<String> = None;
    let mut my_name = nickname.to_string();

    loop {
        tokio::select! {
            incoming = read.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        if let Some(rendered) = render_event(&text, &mut my_id, &mut my_name) {
                            print!("{}", rendered);
                            redisplay_prompt(&my_name);
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        println!("\nServer closed the connection.");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        return Err(ClientError::ConnectionError(e.to_string()));
                    }
                }
            }
            line = input_rx.recv() => {
                let Some(line) = line else { break };
                match parse_command(&line) {
                    Command::Empty => {}
                    Command::Help => {
                        println!("{}", HELP_TEXT);
                        redisplay_prompt(&my_name);
                    }
                    Command::Unknown(reason) => {
                        println!("{} (try /help)", reason);
                        redisplay_prompt(&my_name);
                    }
                    Command::Public(text) => {
                        send_event(&mut write, &ClientEvent::Message { text, to: "all".to_string() }).await?;
                    }
                    Command::Direct { to, text } => {
                        send_event(&mut write, &ClientEvent::Message { text, to }).await?;
                    }
                    Command::Rename(user) => {
                        send_event(&mut write, &ClientEvent::Rename { user }).await?;
                    }
                    Command::History(channel) => {
                        send_event(&mut write, &ClientEvent::History { channel }).await?;
                    }
                    Command::Quit => {
                        // best effort; the server also handles a bare disconnect
                        let _ = send_event(&mut write, &ClientEvent::Leave).await;
                        let _ = write.send(Message::Close(None)).await;
                        println!("Bye.");
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}

async fn send_event<S>(write: &mut S, event: &ClientEvent) -> Result<(), ClientError>
where
    S: SinkExt<Message> + Unpin,
    S::Error: std::fmt::Display,
{
    let json = serde_json::to_string(event).unwrap();
    write
        .send(Message::Text(json.into()))
        .await
        .map_err(|e| ClientError::SendError(e.to_string()))
}

/// Parse one server event and render it; returns `None` for payloads the
/// client does not display
fn render_event(text: &str, my_id: &mut Option<String>, my_name: &mut String) -> Option<String> {
    // Try the event shapes from most to least specific
    if let Ok(user_list) = serde_json::from_str::<UserListEvent>(text) {
        return Some(MessageFormatter::format_user_list(&user_list));
    }
    if let Ok(history) = serde_json::from_str::<HistoryEvent>(text) {
        return Some(MessageFormatter::format_history(&history, my_id.as_deref()));
    }
    if let Ok(renamed) = serde_json::from_str::<RenamedEvent>(text) {
        *my_name = renamed.user.clone();
        return Some(MessageFormatter::format_renamed(&renamed));
    }
    if let Ok(joined) = serde_json::from_str::<JoinedEvent>(text) {
        *my_id = Some(joined.id.clone());
        *my_name = joined.user.clone();
        return Some(MessageFormatter::format_joined(&joined));
    }
    if let Ok(message) = serde_json::from_str::<MessageEvent>(text) {
        return Some(MessageFormatter::format_message(&message, my_id.as_deref()));
    }
    tracing::debug!("Ignoring unrecognized server event: {}", text);
    None
}
