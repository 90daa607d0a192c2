//! One-shot subcommands: each performs a single facade operation and
//! prints the outcome.

use std::io::IsTerminal;

use cp_chat::{ChatSession, DoctorQuery};

use crate::render;

/// `chatpal send` — exits non-zero when the reply is the fallback.
pub async fn send(session: &ChatSession, message: &str, json: bool) -> anyhow::Result<bool> {
    let result = session.send_message(message).await;
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", render::reply(&result, std::io::stdout().is_terminal()));
        if let Some(err) = result.error() {
            tracing::debug!(error = err, "send failed");
        }
    }
    Ok(result.is_success())
}

/// `chatpal new`
pub async fn new_conversation(session: &ChatSession) -> anyhow::Result<()> {
    let resp = session.start_new_conversation().await?;
    println!("{}", resp.session_id);
    Ok(())
}

/// `chatpal clear`
pub async fn clear(session: &ChatSession) -> bool {
    if session.current_session_id().is_none() {
        eprintln!("no session to clear");
        return false;
    }
    let cleared = session.clear_conversation().await;
    if cleared {
        eprintln!("conversation cleared");
    } else {
        eprintln!("could not clear conversation (see log)");
    }
    cleared
}

/// `chatpal history`
pub async fn history(session: &ChatSession, json: bool) -> anyhow::Result<()> {
    let messages = session.conversation_history().await;
    if json {
        println!("{}", serde_json::to_string_pretty(&messages)?);
    } else if messages.is_empty() {
        eprintln!("no history");
    } else {
        println!("{}", render::history(&messages));
    }
    Ok(())
}

/// `chatpal status` — exits non-zero when the session is not live.
pub async fn status(session: &ChatSession) -> bool {
    let Some(id) = session.current_session_id() else {
        println!("no session");
        return false;
    };
    let live = session.is_session_active().await;
    println!("{id}: {}", if live { "active" } else { "inactive" });
    live
}

/// `chatpal reset`
pub fn reset(session: &ChatSession) {
    session.reset_session();
    eprintln!("session reset");
}

/// `chatpal info`
pub fn info(session: &ChatSession) {
    println!("{}", render::session_info(&session.session_info()));
}

/// `chatpal predict`
pub async fn predict(session: &ChatSession, symptoms: Vec<String>) -> anyhow::Result<()> {
    let value = session.predict_disease(symptoms).await?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

/// `chatpal doctors`
pub async fn doctors(
    session: &ChatSession,
    speciality: String,
    lat: f64,
    lon: f64,
) -> anyhow::Result<()> {
    let list = session
        .find_doctors(DoctorQuery {
            speciality,
            lat,
            lon,
        })
        .await?;
    println!("{}", render::doctors(&list));
    Ok(())
}

pub async fn outbreak(session: &ChatSession, lat: f64, lon: f64) -> anyhow::Result<()> {
    match session.outbreak_alert(lat, lon).await? {
        Some(alert) => println!("⚠️ Outbreak Alert: {alert}"),
        None => println!("No outbreak alerts nearby."),
    }
    Ok(())
}
