// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::State as AxumState,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use reel_poll_api::{
    ApiError, BallotEntry, CastVoteOutcome, SyncOutcome, ballot, cast_vote,
    status_report, sync_catalog, tally_report,
};
use reel_poll_domain::{OptionId, VoterId};
use reel_poll_persistence::Persistence;

/// Reel Poll Server - HTTP server for the single-choice voting backend
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Path to the CSV catalog source file
    #[arg(short, long, default_value = "movies.csv")]
    catalog: PathBuf,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

/// Application state shared across handlers.
///
/// The persistence layer is wrapped in a Mutex: this is a single-writer
/// system and correctness rests on the store's transactional guarantees,
/// not on anything held in process memory.
#[derive(Clone)]
struct AppState {
    /// The persistence layer for the catalog and the vote ledger.
    persistence: Arc<Mutex<Persistence>>,
    /// The path of the operator-maintained catalog source.
    catalog_path: Arc<PathBuf>,
}

/// API request to cast or change a vote.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct VoteApiRequest {
    /// The voter's stable external identity.
    voter_id: String,
    /// The voter's display name.
    voter_label: String,
    /// The chosen option identifier.
    option_id: String,
}

/// API response for a successful vote.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct VoteApiResponse {
    /// The cast outcome, including the prior choice if any.
    #[serde(flatten)]
    outcome: CastVoteOutcome,
    /// The refreshed ballot after the cast.
    ballot: Vec<BallotEntry>,
}

/// One rendered line of the results view.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ResultLine {
    /// The option identifier.
    option_id: String,
    /// The full display label.
    label: String,
    /// The current vote count.
    count: usize,
    /// Up to three voter display names, first-voted-first.
    voters: Vec<String>,
    /// How many more voters exist beyond the preview.
    more: usize,
}

/// API response for the results view.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ResultsApiResponse {
    /// One line per catalog option, in catalog order.
    results: Vec<ResultLine>,
}

/// API response for a catalog reload.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ReloadApiResponse {
    /// The reconciliation summary.
    #[serde(flatten)]
    outcome: SyncOutcome,
    /// A confirmation message.
    message: String,
}

/// API error response body.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ErrorResponse {
    /// A human-readable error description.
    error: String,
}

/// Translates an API error into an HTTP response.
fn error_response(err: &ApiError) -> Response {
    let status: StatusCode = match err {
        ApiError::UnknownOption { .. } => StatusCode::NOT_FOUND,
        ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
        ApiError::SourceUnreadable { .. } | ApiError::VoteWriteFailure { .. } => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}

/// `GET /ballot` — the current catalog with vote counts, for building
/// selectable controls.
async fn get_ballot(AxumState(state): AxumState<AppState>) -> Response {
    let mut persistence = state.persistence.lock().await;
    match ballot(&mut persistence) {
        Ok(entries) => (StatusCode::OK, Json(entries)).into_response(),
        Err(e) => error_response(&e),
    }
}

/// `POST /vote` — cast or change a vote, returning the outcome and the
/// refreshed ballot.
async fn post_vote(
    AxumState(state): AxumState<AppState>,
    Json(request): Json<VoteApiRequest>,
) -> Response {
    let voter_id: VoterId = match VoterId::new(&request.voter_id) {
        Ok(id) => id,
        Err(e) => return error_response(&ApiError::from(e)),
    };
    let option_id: OptionId = match OptionId::new(&request.option_id) {
        Ok(id) => id,
        Err(e) => return error_response(&ApiError::from(e)),
    };

    let mut persistence = state.persistence.lock().await;
    let outcome: CastVoteOutcome =
        match cast_vote(&mut persistence, &voter_id, &request.voter_label, &option_id) {
            Ok(outcome) => outcome,
            Err(e) => return error_response(&e),
        };
    match ballot(&mut persistence) {
        Ok(entries) => (
            StatusCode::OK,
            Json(VoteApiResponse {
                outcome,
                ballot: entries,
            }),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

/// `GET /results` — the full tally with bounded voter-name previews.
async fn get_results(AxumState(state): AxumState<AppState>) -> Response {
    let mut persistence = state.persistence.lock().await;
    match tally_report(&mut persistence) {
        Ok(report) => {
            let results: Vec<ResultLine> = report
                .entries
                .iter()
                .map(|entry| ResultLine {
                    option_id: entry.option_id.clone(),
                    label: entry.label.clone(),
                    count: entry.count,
                    voters: entry.voter_preview().to_vec(),
                    more: entry.overflow(),
                })
                .collect();
            (StatusCode::OK, Json(ResultsApiResponse { results })).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// `POST /reload` — re-run the catalog synchronizer against the source.
async fn post_reload(AxumState(state): AxumState<AppState>) -> Response {
    let mut persistence = state.persistence.lock().await;
    match sync_catalog(&mut persistence, state.catalog_path.as_ref()) {
        Ok(report) => (
            StatusCode::OK,
            Json(ReloadApiResponse {
                outcome: SyncOutcome::from(report),
                message: String::from("Catalog reloaded"),
            }),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

/// `GET /status` — option count, vote count, and freshness.
async fn get_status(AxumState(state): AxumState<AppState>) -> Response {
    let mut persistence = state.persistence.lock().await;
    match status_report(&mut persistence) {
        Ok(status) => (StatusCode::OK, Json(status)).into_response(),
        Err(e) => error_response(&e),
    }
}

/// Builds the application router.
fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/ballot", get(get_ballot))
        .route("/vote", post(post_vote))
        .route("/results", get(get_results))
        .route("/reload", post(post_reload))
        .route("/status", get(get_status))
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Reel Poll Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let mut persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    // Synchronize the catalog before accepting any vote traffic. A missing
    // source is a soft failure: the existing catalog stays authoritative.
    match sync_catalog(&mut persistence, &args.catalog) {
        Ok(report) => info!(
            "Startup catalog sync complete: {} added, {} updated, {} removed, {} retained",
            report.added, report.updated, report.removed, report.retained
        ),
        Err(ApiError::SourceUnreadable { reason }) => {
            warn!("Startup catalog sync skipped: {}", reason);
        }
        Err(e) => return Err(Box::new(e) as Box<dyn std::error::Error>),
    }

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        catalog_path: Arc::new(args.catalog),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
