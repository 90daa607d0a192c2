//! Plain-text rendering of chat results for the terminal.

use cp_chat::{ChatResult, Doctor, HistoryMessage, Role, SessionInfo};

const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// Assistant reply, followed by a dimmed line of sources when any were used.
pub fn reply(result: &ChatResult, color: bool) -> String {
    let mut out = String::new();
    if result.is_success() {
        out.push_str(result.response());
    } else {
        out.push_str(&paint(result.response(), RED, color));
    }

    let sources = result.sources().join(", ");
    let note = match (result.has_context(), sources.is_empty()) {
        (true, true) => Some("(used earlier conversation)".to_owned()),
        (true, false) => Some(format!("(context + sources: {sources})")),
        (false, false) => Some(format!("(sources: {sources})")),
        (false, true) => None,
    };
    if let Some(note) = note {
        out.push('\n');
        out.push_str(&paint(&note, DIM, color));
    }
    out
}

/// One line per history entry: `[HH:MM] you> text`.
pub fn history(messages: &[HistoryMessage]) -> String {
    messages
        .iter()
        .map(|m| {
            let who = match m.role {
                Role::User => "you",
                Role::Assistant => "bot",
                Role::System => "system",
                Role::Other => "?",
            };
            match m.parsed_timestamp() {
                Some(ts) => format!("[{}] {who}> {}", ts.format("%H:%M"), m.content),
                None => format!("{who}> {}", m.content),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn session_info(info: &SessionInfo) -> String {
    match &info.session_id {
        Some(id) => format!(
            "session {id} ({})",
            if info.is_active { "active" } else { "not yet confirmed" }
        ),
        None => "no session".to_owned(),
    }
}

pub fn doctors(list: &[Doctor]) -> String {
    if list.is_empty() {
        return "no doctors found".to_owned();
    }
    list.iter()
        .map(|d| {
            let mut line = format!("- {}", d.name);
            if let Some(ref addr) = d.address {
                line.push_str(&format!(", {addr}"));
            }
            if let Some(km) = d.distance_km {
                line.push_str(&format!(" ({km:.1} km)"));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn paint(text: &str, code: &str, color: bool) -> String {
    if color {
        format!("{code}{text}{RESET}")
    } else {
        text.to_owned()
    }
}
