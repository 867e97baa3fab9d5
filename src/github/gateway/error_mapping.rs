//! Translation of Octocrab failures into [`GitHubError`].

use http::StatusCode;
use octocrab::Error as OctocrabError;

use crate::github::error::GitHubError;

/// Broad cause of a failed GitHub request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FailureKind {
    RateLimited,
    Unauthorised,
    Rejected,
    Transport,
    Other,
}

/// Classifies an error response from its status and body.
///
/// A 403 only counts as rate limiting when the message or documentation link
/// says so; otherwise it is an authorisation failure.
fn classify_response(status: StatusCode, message: &str, docs_url: Option<&str>) -> FailureKind {
    let mentions_rate_limit = message.to_lowercase().contains("rate limit")
        || docs_url.is_some_and(|url| url.contains("rate-limit"));

    match status {
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS if mentions_rate_limit => {
            FailureKind::RateLimited
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => FailureKind::Unauthorised,
        _ => FailureKind::Rejected,
    }
}

fn classify(error: &OctocrabError) -> FailureKind {
    match error {
        OctocrabError::GitHub { source, .. } => classify_response(
            source.status_code,
            &source.message,
            source.documentation_url.as_deref(),
        ),
        OctocrabError::Http { .. } | OctocrabError::Hyper { .. } | OctocrabError::Service { .. } => {
            FailureKind::Transport
        }
        _ => FailureKind::Other,
    }
}

pub(super) fn map_octocrab_error(operation: &str, error: &OctocrabError) -> GitHubError {
    let detail = match error {
        OctocrabError::GitHub { source, .. } => {
            format!("GitHub returned {} {}", source.status_code, source.message)
        }
        other => other.to_string(),
    };
    let message = format!("{operation} failed: {detail}");

    match classify(error) {
        FailureKind::RateLimited => GitHubError::RateLimitExceeded { message },
        FailureKind::Unauthorised => GitHubError::Authentication { message },
        FailureKind::Transport => GitHubError::Network { message },
        FailureKind::Rejected | FailureKind::Other => GitHubError::Api { message },
    }
}
