//! Hearth CLI chat client.
//!
//! A line-oriented REPL over one relay connection. Commands:
//!
//! ```not_rust
//! /join <name>          join (or create) a public house
//! /join-private <id>    join a private house by id
//! /leave                leave the current house
//! /msg <text>           send a message to the current house
//! /quit                 exit
//! ```
//!
//! On an unexpected disconnect the client backs off and reconnects, but
//! never replays joins; re-issue `/join` after a reconnect.

use std::time::Duration;

use clap::Parser;
use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;

use hearth_client::{ClientConnection, ClientError, Credential, ReconnectPolicy};
use hearth_server::infrastructure::dto::websocket::{ClientAction, HouseRefDto, ServerEvent};
use hearth_shared::{logger::setup_logger, time::timestamp_to_rfc3339};

#[derive(Debug, Parser)]
#[command(name = "hearth-client", about = "Hearth chat relay CLI client")]
struct Args {
    /// Relay websocket URL
    #[arg(long, default_value = "ws://localhost:8080/ws")]
    url: String,

    /// Display name for an ephemeral identity
    #[arg(long, conflicts_with = "token")]
    name: Option<String>,

    /// Bearer token from the login service
    #[arg(long)]
    token: Option<String>,

    /// Initial reconnect delay in milliseconds
    #[arg(long, default_value_t = 1000)]
    initial_delay_ms: u64,

    /// Maximum reconnect delay in milliseconds
    #[arg(long, default_value_t = 16000)]
    max_delay_ms: u64,
}

/// Why a session over one connection ended.
enum SessionEnd {
    Quit,
    Dropped,
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();
    let credential = match (&args.token, &args.name) {
        (Some(token), _) => Credential::Bearer(token.clone()),
        (None, Some(name)) => Credential::Name(name.clone()),
        (None, None) => {
            eprintln!("Provide either --name or --token");
            std::process::exit(2);
        }
    };

    // rustyline blocks, so it lives on its own thread feeding a channel.
    let (line_tx, mut line_rx) = mpsc::unbounded_channel::<String>();
    std::thread::spawn(move || {
        let mut editor = match DefaultEditor::new() {
            Ok(editor) => editor,
            Err(e) => {
                eprintln!("Failed to start line editor: {e}");
                return;
            }
        };
        loop {
            match editor.readline("> ") {
                Ok(line) => {
                    let _ = editor.add_history_entry(&line);
                    if line_tx.send(line).is_err() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    let _ = line_tx.send("/quit".to_string());
                    break;
                }
                Err(e) => {
                    eprintln!("Input error: {e}");
                    break;
                }
            }
        }
    });

    let mut policy = ReconnectPolicy::new(
        Duration::from_millis(args.initial_delay_ms),
        Duration::from_millis(args.max_delay_ms),
    );

    loop {
        match ClientConnection::connect(&args.url, &credential).await {
            Ok(mut connection) => {
                policy.reset();
                println!("Connected to {}", args.url);
                match run_session(&mut connection, &mut line_rx).await {
                    SessionEnd::Quit => {
                        let _ = connection.close().await;
                        break;
                    }
                    SessionEnd::Dropped => {
                        println!("Connection lost");
                    }
                }
            }
            Err(e) => {
                tracing::warn!("Connect failed: {}", e);
            }
        }

        let delay = policy.next_delay();
        println!("Reconnecting in {}ms...", delay.as_millis());
        tokio::time::sleep(delay).await;
    }
}

/// Drive one connection until it drops or the user quits.
async fn run_session(
    connection: &mut ClientConnection,
    lines: &mut mpsc::UnboundedReceiver<String>,
) -> SessionEnd {
    // The house the last house-joined event put us in; /msg and /leave
    // target it.
    let mut current: Option<HouseRefDto> = None;

    loop {
        tokio::select! {
            event = connection.next_event() => match event {
                Ok(event) => print_event(&event, &mut current),
                Err(ClientError::Closed) => return SessionEnd::Dropped,
                Err(e) => {
                    tracing::warn!("Receive error: {}", e);
                    return SessionEnd::Dropped;
                }
            },
            line = lines.recv() => {
                let Some(line) = line else {
                    return SessionEnd::Quit;
                };
                match parse_command(&line, current.as_ref()) {
                    Command::Action(action) => {
                        if let Err(e) = connection.send(&action).await {
                            tracing::warn!("Send failed: {}", e);
                            return SessionEnd::Dropped;
                        }
                        if matches!(action, ClientAction::LeaveHouse { .. }) {
                            current = None;
                        }
                    }
                    Command::Quit => return SessionEnd::Quit,
                    Command::Usage(text) => println!("{text}"),
                    Command::Nothing => {}
                }
            }
        }
    }
}

enum Command {
    Action(ClientAction),
    Quit,
    Usage(&'static str),
    Nothing,
}

fn parse_command(line: &str, current: Option<&HouseRefDto>) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Nothing;
    }

    let (command, rest) = match line.split_once(' ') {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match command {
        "/join" if !rest.is_empty() => Command::Action(ClientAction::JoinHouse {
            message: rest.to_string(),
        }),
        "/join" => Command::Usage("usage: /join <name>"),
        "/join-private" if !rest.is_empty() => {
            Command::Action(ClientAction::JoinHousePrivate {
                message: rest.to_string(),
            })
        }
        "/join-private" => Command::Usage("usage: /join-private <id>"),
        "/leave" => match current {
            Some(house) => Command::Action(ClientAction::LeaveHouse {
                message: house.id.clone(),
            }),
            None => Command::Usage("join a house first"),
        },
        "/msg" if !rest.is_empty() => match current {
            Some(house) => Command::Action(ClientAction::SendMessage {
                message: rest.to_string(),
                house: house.clone(),
            }),
            None => Command::Usage("join a house first"),
        },
        "/msg" => Command::Usage("usage: /msg <text>"),
        "/quit" => Command::Quit,
        _ if command.starts_with('/') => {
            Command::Usage("commands: /join /join-private /leave /msg /quit")
        }
        // A bare line is a message to the current house.
        _ => match current {
            Some(house) => Command::Action(ClientAction::SendMessage {
                message: line.to_string(),
                house: house.clone(),
            }),
            None => Command::Usage("join a house first"),
        },
    }
}

fn print_event(event: &ServerEvent, current: &mut Option<HouseRefDto>) {
    match event {
        ServerEvent::HouseJoined { house } => {
            println!("Joined '{}' ({})", house.name, house.id);
            for message in &house.messages {
                println!(
                    "  [{}] {}: {}",
                    timestamp_to_rfc3339(message.timestamp),
                    message.sender.name,
                    message.message
                );
            }
            *current = Some(HouseRefDto {
                id: house.id.clone(),
                name: Some(house.name.clone()),
            });
        }
        ServerEvent::UserJoin { sender } => {
            println!("* {} joined", sender.name);
        }
        ServerEvent::UserLeft { sender } => {
            println!("* {} left", sender.name);
        }
        ServerEvent::SendMessage {
            sender,
            message,
            timestamp,
            ..
        } => {
            println!(
                "[{}] {}: {}",
                timestamp_to_rfc3339(*timestamp),
                sender.name,
                message
            );
        }
        ServerEvent::Error { code, message } => {
            println!("! error ({code:?}): {message}");
        }
    }
}
