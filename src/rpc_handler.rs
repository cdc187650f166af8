//! RPC method handler for the Tabstash JSON protocol.
//!
//! Kept apart from `rpc_server.rs` so dispatch can be tested without stdio.
//! [`handle_method`] maps a method name and its params onto [`App`] calls.

use serde_json::{json, Value};
use tokio::sync::Mutex;

use crate::app::App;
use crate::host::BrowserHost;
use crate::types::color::TagColor;
use crate::types::session::Snapshot;

fn str_param<'a>(params: &'a Value, name: &str) -> Result<&'a str, String> {
    params
        .get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("missing {}", name))
}

/// Listing entry: everything but the window records.
pub fn session_summary(snapshot: &Snapshot, active_id: Option<&str>) -> Value {
    json!({
        "id": snapshot.id(),
        "title": snapshot.title(),
        "createdAt": snapshot.created_at(),
        "colorTag": snapshot.color_tag(),
        "counts": snapshot.counts(),
        "active": active_id == Some(snapshot.id()),
    })
}

/// Dispatch one method call.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub async fn handle_method<H: BrowserHost>(
    app: &Mutex<App<H>>,
    method: &str,
    params: &Value,
) -> Result<Value, String> {
    match method {
        "ping" => Ok(json!({"ok": true, "version": env!("CARGO_PKG_VERSION")})),

        // ─── Sessions ───
        "session.counts" => {
            let a = app.lock().await;
            let counts = a.counts().await.map_err(|e| e.to_string())?;
            Ok(json!(counts))
        }
        "session.save" => {
            let title = params.get("title").and_then(|v| v.as_str());
            let mut a = app.lock().await;
            let snapshot = a.save_session(title).await.map_err(|e| e.to_string())?;
            Ok(session_summary(&snapshot, a.active_session()))
        }
        "session.restore" => {
            let id = str_param(params, "id")?;
            let mut a = app.lock().await;
            let summary = a.restore_session(id).await.map_err(|e| e.to_string())?;
            Ok(json!(summary))
        }
        "session.list" => {
            let a = app.lock().await;
            let active = a.active_session();
            let arr: Vec<Value> = a
                .list_sessions()
                .iter()
                .map(|s| session_summary(s, active))
                .collect();
            Ok(json!(arr))
        }
        "session.get" => {
            let id = str_param(params, "id")?;
            let a = app.lock().await;
            let snapshot = a.get_session(id).map_err(|e| e.to_string())?;
            Ok(json!(snapshot))
        }
        "session.rename" => {
            let id = str_param(params, "id")?;
            let title = str_param(params, "title")?.trim();
            if title.is_empty() {
                return Err("title cannot be empty".to_string());
            }
            let mut a = app.lock().await;
            a.rename_session(id, title).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "session.recolor" => {
            let id = str_param(params, "id")?;
            let color: TagColor = str_param(params, "color")?.parse()?;
            let mut a = app.lock().await;
            a.recolor_session(id, color).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "session.delete" => {
            let id = str_param(params, "id")?;
            let mut a = app.lock().await;
            a.delete_session(id).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        // ─── Displays ───
        "display.list" => {
            let a = app.lock().await;
            let displays = a.host().displays().await.map_err(|e| e.to_string())?;
            Ok(json!(displays))
        }

        // ─── Preferences ───
        "preferences.get" => {
            let a = app.lock().await;
            Ok(json!(a.preferences()))
        }
        "preferences.set" => {
            let key = str_param(params, "key")?;
            let value = params.get("value").cloned().ok_or("missing value")?;
            let mut a = app.lock().await;
            a.set_preference(key, value).map_err(|e| e.to_string())?;
            Ok(json!(a.preferences()))
        }
        "preferences.reset" => {
            let mut a = app.lock().await;
            a.reset_preferences().map_err(|e| e.to_string())?;
            Ok(json!(a.preferences()))
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
