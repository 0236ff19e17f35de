//! Webhook handler for the platform's analysis completion events

use axum::{
    body::Bytes,
    extract::State as AxumState,
    http::{HeaderMap, StatusCode},
};
use std::sync::atomic::Ordering;
use tracing::{error, info, warn};

use crate::SharedState;
use crate::analysis::AnalysisEvent;
use crate::payload::PayloadBuilder;
use crate::utils::{find_matching_project_owned, verify_event_signature};

pub const SIGNATURE_HEADER: &str = "X-Analysis-Signature";

/// Handles the analysis-completion webhook POST request.
pub async fn handle_webhook(
    AxumState(state): AxumState<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    // Parse body as JSON into the analysis event
    let event: AnalysisEvent = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            info!("Could not parse analysis event body: {:?}", e);
            return StatusCode::BAD_REQUEST;
        }
    };

    let project_key = event.project.key.clone();

    // Find matching project config based on the analyzed project's key
    let maybe_project = find_matching_project_owned(&state.config, &project_key);

    if let Some(project) = maybe_project {
        // Per-project webhook signature validation if required
        if project.needs_webhook_secret() {
            let signature_opt = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok());
            if signature_opt.is_none() {
                error!(
                    "Project '{}' requires webhook secret, but no signature header supplied.",
                    project_key
                );
                return StatusCode::UNAUTHORIZED;
            }
            if !project.has_valid_secret() {
                error!(
                    "Project '{}' requires webhook secret, but none was configured.",
                    project_key
                );
                return StatusCode::INTERNAL_SERVER_ERROR;
            }
            let signature = signature_opt.unwrap();
            let secret = project.webhook_secret.as_ref().unwrap();
            if !verify_event_signature(secret, &body, signature) {
                error!(
                    "Signature verification failed for project '{}'!",
                    project_key
                );
                return StatusCode::UNAUTHORIZED;
            }
        }

        let settings = &state.config.slack;
        let payload = PayloadBuilder::new(&event, &project)
            .username(settings.user())
            .include_branch(settings.include_branch())
            .build();
        let hook_url = project.hook_url(settings).to_string();

        info!(
            "Notifying channel {:?} for project '{}' (gate: {})",
            payload.channel,
            project_key,
            event
                .quality_gate
                .as_ref()
                .map(|g| g.status.to_string())
                .unwrap_or_else(|| "absent".to_string())
        );

        // Get shared state for background task
        let shared_state = state.clone();

        // Deliver from a background task so the platform's webhook
        // request gets its response right away
        tokio::spawn(async move {
            match shared_state.slack.send(&hook_url, &payload).await {
                Ok(()) => {
                    shared_state.delivered.fetch_add(1, Ordering::Relaxed);
                }
                Err(e) => {
                    error!("Delivery for project '{}' failed: {}", project_key, e);
                    shared_state.failed.fetch_add(1, Ordering::Relaxed);
                }
            }
        });

        StatusCode::OK
    } else {
        warn!(
            "No matching project for key '{}', skipping.",
            project_key
        );
        StatusCode::NO_CONTENT
    }
}
