//! Health check for the question-answering service.
//!
//! Provides the `doctor` command functionality: calls `/health` on the
//! configured endpoint and reports reachability and index size.

use crate::answer::describe_error;
use crate::endpoint::{QaClient, QaError, ServiceHealth};

// ANSI color codes for terminal output
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

/// Health status for a component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Component is healthy
    Ok,
    /// Component has a warning but is functional
    Warning(String),
    /// Component is not functional
    Error(String),
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, HealthStatus::Ok)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, HealthStatus::Error(_))
    }
}

/// Endpoint connectivity information.
#[derive(Debug, Clone)]
pub struct EndpointHealth {
    pub status: HealthStatus,
    pub base_url: String,
    /// Number of indexed documents, when the service reported it
    pub doc_count: Option<u64>,
}

/// Checks the endpoint and prints the report. Returns the collected health.
pub fn run_health_checks(client: &QaClient) -> EndpointHealth {
    let health = check_endpoint_health(client);
    print_health_report(&health);
    health
}

/// Calls `/health` on the client's endpoint.
pub fn check_endpoint_health(client: &QaClient) -> EndpointHealth {
    assess_health(client.base_url(), client.health())
}

/// Classifies a `/health` reply.
pub fn assess_health(base_url: &str, reply: Result<ServiceHealth, QaError>) -> EndpointHealth {
    let base_url = base_url.to_string();

    match reply {
        Ok(health) => {
            let status = if health.status != "ok" {
                HealthStatus::Warning(format!("Service reports status '{}'", health.status))
            } else if health.doc_count == 0 {
                HealthStatus::Warning("No documents indexed".to_string())
            } else {
                HealthStatus::Ok
            };
            EndpointHealth {
                status,
                base_url,
                doc_count: Some(health.doc_count),
            }
        }
        Err(QaError::Http { status, body }) => EndpointHealth {
            status: HealthStatus::Error(format!("HTTP {status}: {}", body.trim())),
            base_url,
            doc_count: None,
        },
        Err(e) => EndpointHealth {
            status: HealthStatus::Error(format!("Connection failed: {}", describe_error(&e))),
            base_url,
            doc_count: None,
        },
    }
}

fn status_symbol(status: &HealthStatus) -> &'static str {
    match status {
        HealthStatus::Ok => "✓",
        HealthStatus::Warning(_) => "!",
        HealthStatus::Error(_) => "✗",
    }
}

fn status_color(status: &HealthStatus) -> &'static str {
    match status {
        HealthStatus::Ok => GREEN,
        HealthStatus::Warning(_) => YELLOW,
        HealthStatus::Error(_) => RED,
    }
}

fn print_health_report(health: &EndpointHealth) {
    println!("{}qask doctor{}", BOLD, RESET);
    println!();

    println!("{}Endpoint{}", BOLD, RESET);
    let detail = match &health.status {
        HealthStatus::Ok => "Reachable".to_string(),
        HealthStatus::Warning(msg) | HealthStatus::Error(msg) => msg.clone(),
    };
    println!(
        "  {}{}{} {}",
        status_color(&health.status),
        status_symbol(&health.status),
        RESET,
        detail
    );
    println!("    {}URL: {}{}", DIM, health.base_url, RESET);
    if let Some(count) = health.doc_count {
        println!("    {}Documents: {}{}", DIM, count, RESET);
    }
    println!();
}
