use std::time::{Instant, SystemTime, UNIX_EPOCH};

use nano_http::handler::Handler;
use nano_http::protocol::{Request, Response, SERVER_NAME};
use serde::Serialize;
use tracing::error;

/// Liveness endpoint reporting wall-clock time and uptime.
#[derive(Debug)]
pub struct Health {
    started: Instant,
}

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
    server: &'static str,
    timestamp: String,
    uptime_secs: u64,
}

impl Health {
    pub fn new() -> Self {
        Self { started: Instant::now() }
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::new()
    }
}

impl Handler for Health {
    fn call(&self, _req: &Request) -> Response {
        let timestamp = SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |elapsed| elapsed.as_secs());
        let body = HealthBody {
            status: "healthy",
            server: SERVER_NAME,
            timestamp: timestamp.to_string(),
            uptime_secs: self.started.elapsed().as_secs(),
        };

        match serde_json::to_string_pretty(&body) {
            Ok(json) => {
                let mut response = Response::new();
                response.set_json_response(json);
                response
            }
            Err(e) => {
                error!(cause = %e, "can't serialize health body");
                Response::internal_error("Internal Server Error")
            }
        }
    }
}
