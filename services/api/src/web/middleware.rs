//! services/api/src/web/middleware.rs
//!
//! Request logging for every route, including static files.

use axum::{
    extract::Request,
    http::header,
    middleware::Next,
    response::Response,
};
use tracing::info;

/// User agents are cut to this many characters in the log line.
const USER_AGENT_LOG_CHARS: usize = 50;

/// Logs method, path, status and a shortened user agent once the response is ready.
pub async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let user_agent = short_user_agent(
        req.headers()
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok()),
    );

    let response = next.run(req).await;
    info!(
        "{} {} {} - {}",
        method,
        path,
        response.status().as_u16(),
        user_agent
    );
    response
}

fn short_user_agent(agent: Option<&str>) -> String {
    match agent {
        Some(agent) => agent.chars().take(USER_AGENT_LOG_CHARS).collect(),
        None => "Unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_agents_are_shortened() {
        assert_eq!(short_user_agent(None), "Unknown");
        assert_eq!(short_user_agent(Some("curl/8.0")), "curl/8.0");
        let long = "Mozilla/5.0 ".repeat(10);
        assert_eq!(short_user_agent(Some(&long)).chars().count(), USER_AGENT_LOG_CHARS);
    }
}
