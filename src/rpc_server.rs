//! Tabstash RPC server: newline-delimited JSON over stdin/stdout.
//!
//! Request:  {"id":1, "method":"session.save", "params":{"title":"..."}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}
//!
//! The browser layout comes from `browser-state.json` in `$TABSTASH_DATA_DIR`
//! (or the platform data directory). Logs go to stderr; `RUST_LOG` filters them.

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde_json::{json, Value};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use tabstash::app::App;
use tabstash::host::memory::{InMemoryBrowser, LayoutFixture};
use tabstash::platform;
use tabstash::rpc_handler::handle_method;
use tabstash::services::preferences_engine::PreferencesEngine;
use tabstash::types::display::{DisplayDescriptor, Rect};

/// Fixed-window request limiter.
struct RateLimiter {
    window_start: Instant,
    request_count: u32,
    max_per_second: u32,
}

impl RateLimiter {
    fn new(max_per_second: u32) -> Self {
        Self {
            window_start: Instant::now(),
            request_count: 0,
            max_per_second,
        }
    }

    /// Returns true if the request is allowed, false if rate-limited.
    fn check(&mut self) -> bool {
        if self.window_start.elapsed().as_secs() >= 1 {
            self.window_start = Instant::now();
            self.request_count = 0;
        }
        self.request_count += 1;
        self.request_count <= self.max_per_second
    }
}

fn data_dir() -> PathBuf {
    std::env::var("TABSTASH_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| platform::get_data_dir())
}

/// Reads the layout file, or falls back to an empty browser on one 1920x1080 display.
async fn load_layout(path: &Path) -> LayoutFixture {
    let fallback = || LayoutFixture {
        displays: vec![DisplayDescriptor::primary("0", Rect::new(0, 0, 1920, 1080))],
        windows: Vec::new(),
    };
    let content = match tokio::fs::read_to_string(path).await {
        Ok(c) => c,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "no browser state file");
            return fallback();
        }
    };
    match serde_json::from_str(&content) {
        Ok(layout) => layout,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring malformed browser state file");
            fallback()
        }
    }
}

async fn send(stdout: &mut io::Stdout, message: Value) -> io::Result<()> {
    let mut line = message.to_string();
    line.push('\n');
    stdout.write_all(line.as_bytes()).await?;
    stdout.flush().await
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let layout_path = data_dir().join("browser-state.json");
    let host = InMemoryBrowser::from_fixture(load_layout(&layout_path).await);
    let app = Mutex::new(App::new(host, PreferencesEngine::new(None)));
    info!(layout = %layout_path.display(), "tabstash rpc ready");

    let mut stdout = io::stdout();
    send(
        &mut stdout,
        json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")}),
    )
    .await?;

    let mut rate_limiter = RateLimiter::new(200);
    let mut lines = BufReader::new(io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let req: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                send(&mut stdout, json!({"id": null, "error": format!("parse error: {}", e)})).await?;
                continue;
            }
        };
        let id = req.get("id").cloned().unwrap_or(Value::Null);

        if !rate_limiter.check() {
            send(&mut stdout, json!({"id": id, "error": "rate limit exceeded"})).await?;
            continue;
        }

        let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
        let params = req.get("params").cloned().unwrap_or(json!({}));
        debug!(method, "rpc request");

        let response = match handle_method(&app, method, &params).await {
            Ok(val) => json!({"id": id, "result": val}),
            Err(err) => {
                debug!(method, error = %err, "rpc error");
                json!({"id": id, "error": err})
            }
        };
        send(&mut stdout, response).await?;
    }

    info!("stdin closed, shutting down");
    Ok(())
}
