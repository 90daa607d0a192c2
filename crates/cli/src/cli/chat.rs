//! `chatpal chat` — interactive REPL command.
//!
//! Opens a readline-based loop that sends each line to the assistant and
//! prints the reply. Slash-commands map onto the session operations.

use std::io::IsTerminal;

use cp_chat::ChatSession;

use crate::render;

const WELCOME: &str =
    "Hello! I'm Health ChatPal 🏥 Your AI health assistant. How can I help you today?";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Public entry point
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Run the interactive chat REPL.
///
/// Resumes the stored conversation when the service still knows it (or
/// starts fresh with `new`), then reads lines until EOF or `/exit`.
pub async fn chat(session: &ChatSession, new: bool) -> anyhow::Result<()> {
    let color = std::io::stdout().is_terminal();

    // 1. Initialize rustyline editor with persistent history.
    let history_path = dirs::home_dir()
        .unwrap_or_default()
        .join(".chatpal")
        .join("repl_history.txt");
    if let Some(parent) = history_path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let mut rl = rustyline::DefaultEditor::new()?;
    let _ = rl.load_history(&history_path);

    // 2. Restore or start the conversation.
    if new {
        if let Err(e) = session.start_new_conversation().await {
            eprintln!("\x1B[31mcould not start a new conversation: {e}\x1B[0m");
        }
    } else {
        let previous = session.resume().await;
        if !previous.is_empty() {
            eprintln!("Resuming your previous conversation:\n");
            println!("{}", render::history(&previous));
            println!();
        }
    }

    // 3. Print welcome message to stderr (keep stdout clean for output).
    eprintln!("{}  |  Type /help for commands, Ctrl+D to exit", render::session_info(&session.session_info()));
    eprintln!();
    println!("bot> {WELCOME}");

    // 4. REPL loop.
    loop {
        match rl.readline("you> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                rl.add_history_entry(&line).ok();

                if trimmed.starts_with('/') {
                    if handle_slash_command(session, trimmed).await == Flow::Exit {
                        break;
                    }
                    continue;
                }

                let result = session.send_message(trimmed).await;
                println!("bot> {}", render::reply(&result, color));
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                eprintln!("(Use Ctrl+D or /exit to quit)");
                continue;
            }
            Err(rustyline::error::ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("\x1B[31mreadline error: {e}\x1B[0m");
                break;
            }
        }
    }

    // 5. Save history.
    rl.save_history(&history_path).ok();

    eprintln!("Take care!");
    Ok(())
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Slash command handling
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// A parsed slash command.
#[derive(Debug, PartialEq, Eq)]
enum Slash {
    Exit,
    New,
    Clear,
    History,
    Status,
    Reset,
    Info,
    Help,
    Unknown(String),
}

fn parse_slash(input: &str) -> Slash {
    let cmd = input.split_whitespace().next().unwrap_or_default();
    match cmd {
        "/exit" | "/quit" => Slash::Exit,
        "/new" => Slash::New,
        "/clear" => Slash::Clear,
        "/history" => Slash::History,
        "/status" => Slash::Status,
        "/reset" => Slash::Reset,
        "/info" | "/session" => Slash::Info,
        "/help" | "/?" => Slash::Help,
        other => Slash::Unknown(other.to_owned()),
    }
}

async fn handle_slash_command(session: &ChatSession, input: &str) -> Flow {
    match parse_slash(input) {
        Slash::Exit => return Flow::Exit,

        Slash::New => match session.start_new_conversation().await {
            Ok(resp) => {
                eprintln!("Started a new conversation ({})", resp.session_id);
                println!("bot> {WELCOME}");
            }
            Err(e) => eprintln!("\x1B[31mcould not start a new conversation: {e}\x1B[0m"),
        },

        Slash::Clear => {
            if session.clear_conversation().await {
                eprintln!("Conversation cleared.");
                println!("bot> {WELCOME}");
            } else {
                eprintln!("Nothing cleared.");
            }
        }

        Slash::History => {
            let messages = session.conversation_history().await;
            if messages.is_empty() {
                eprintln!("(no history)");
            } else {
                println!("{}", render::history(&messages));
            }
        }

        Slash::Status => {
            let live = session.is_session_active().await;
            eprintln!(
                "{}; service reports it {}",
                render::session_info(&session.session_info()),
                if live { "live" } else { "not live" }
            );
        }

        Slash::Reset => {
            session.reset_session();
            eprintln!("Session reset. Your next message starts a new conversation.");
        }

        Slash::Info => eprintln!("{}", render::session_info(&session.session_info())),

        Slash::Help => {
            eprintln!("Commands:");
            eprintln!("  /new             Start a new conversation");
            eprintln!("  /clear           Erase this conversation's history");
            eprintln!("  /history         Show this conversation's history");
            eprintln!("  /status          Ask the service whether the session is live");
            eprintln!("  /reset           Forget the session locally");
            eprintln!("  /info            Show the held session");
            eprintln!("  /exit, /quit     Exit the chat");
            eprintln!("  /help            Show this help");
        }

        Slash::Unknown(other) => {
            eprintln!("Unknown command: {other}  (type /help for a list)");
        }
    }

    Flow::Continue
}
