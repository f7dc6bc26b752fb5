//! Tracing setup and the per-request console line

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use chrono::Local;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Used when `RUST_LOG` is unset; SQL statement logs stay off
const DEFAULT_FILTER: &str = "info,sqlx=warn,sea_orm=warn";

/// Log to stdout and append to `<log_dir>/backend.log`
pub fn init_tracing(log_dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(log_dir)?;
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("backend.log"))?;

    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_FILTER.into());
    tracing_subscriber::registry()
        .with(EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Arc::new(log_file))
                .with_ansi(false),
        )
        .init();
    Ok(())
}

/// Human-readable payload size for request logs: `512 B`, `1.5 KB`, `2.0 MB`
pub fn format_size(bytes: usize) -> String {
    const UNITS: [&str; 3] = ["KB", "MB", "GB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

fn request_line(status: StatusCode, elapsed_ms: u128, size: &str, method: &Method, path: &str) -> String {
    // cyan for 2xx, yellow otherwise
    let color = if status.is_success() { "36" } else { "33" };
    format!(
        "\x1b[{}m{}\x1b[0m | {:>5}ms | {:>10} | {} {:>6} {}",
        color,
        Local::now().format("%H:%M:%S"),
        elapsed_ms,
        size,
        status.as_u16(),
        method.as_str(),
        path
    )
}

/// Middleware printing one colored line per request with time and body size
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let (parts, body) = next.run(req).await.into_parts();
    let (size, body) = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => (format_size(bytes.len()), Body::from(bytes)),
        Err(_) => ("error".to_string(), Body::default()),
    };
    println!(
        "{}",
        request_line(parts.status, start.elapsed().as_millis(), &size, &method, &path)
    );
    Response::from_parts(parts, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_pick_the_largest_whole_unit() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(2 * 1024 * 1024), "2.0 MB");
        assert_eq!(format_size(5 * 1024 * 1024 * 1024), "5.0 GB");
    }

    #[test]
    fn failed_requests_are_yellow() {
        let line = request_line(StatusCode::NOT_FOUND, 3, "21 B", &Method::GET, "/api/nope");
        assert!(line.starts_with("\x1b[33m"));
        assert!(line.ends_with("404    GET /api/nope"));

        let line = request_line(StatusCode::OK, 3, "1.0 KB", &Method::POST, "/api/contacts");
        assert!(line.starts_with("\x1b[36m"));
    }
}
