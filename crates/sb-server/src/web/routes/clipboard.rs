use std::convert::Infallible;
use std::sync::Arc;

use sb_app::SubmitError;
use serde::{Deserialize, Serialize};
use tracing::error;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use crate::services::AppServices;

/// Submission body. `deviceId` and `content` are required (validated by the
/// use case); a missing `contentType` defaults to "text/plain".
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    #[serde(default)]
    pub device_id: String,
    pub content_type: Option<String>,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// REST routes under /api/clipboard.
pub fn routes(
    services: Arc<AppServices>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    submit(services.clone())
        .or(history(services.clone()))
        .or(latest(services))
}

fn with_services(
    services: Arc<AppServices>,
) -> impl Filter<Extract = (Arc<AppServices>,), Error = Infallible> + Clone {
    warp::any().map(move || services.clone())
}

fn submit(
    services: Arc<AppServices>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path!("api" / "clipboard")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_services(services))
        .and_then(handle_submit)
}

fn history(
    services: Arc<AppServices>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path!("api" / "clipboard" / "history")
        .and(warp::get())
        .and(with_services(services))
        .and_then(handle_history)
}

#[derive(Debug, Deserialize)]
struct LatestQuery {
    #[serde(rename = "contentType")]
    content_type: String,
}

fn latest(
    services: Arc<AppServices>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path!("api" / "clipboard" / "latest")
        .and(warp::get())
        .and(warp::query::<LatestQuery>())
        .and(with_services(services))
        .and_then(handle_latest)
}

async fn handle_submit(
    request: SubmitRequest,
    services: Arc<AppServices>,
) -> Result<impl Reply, Rejection> {
    match services
        .submit
        .execute(
            &request.device_id,
            request.content_type.as_deref(),
            &request.content,
        )
        .await
    {
        Ok(entry) => Ok(warp::reply::with_status(
            warp::reply::json(&entry),
            StatusCode::CREATED,
        )),
        Err(SubmitError::Validation(message)) => Ok(warp::reply::with_status(
            warp::reply::json(&ErrorBody { error: message }),
            StatusCode::BAD_REQUEST,
        )),
        Err(SubmitError::Storage(err)) => {
            error!(error = %err, "Submission failed in the entry store");
            Ok(warp::reply::with_status(
                warp::reply::json(&ErrorBody {
                    error: "storage unavailable".to_string(),
                }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

async fn handle_history(services: Arc<AppServices>) -> Result<impl Reply, Rejection> {
    match services.history.execute().await {
        Ok(entries) => Ok(warp::reply::with_status(
            warp::reply::json(&entries),
            StatusCode::OK,
        )),
        Err(err) => {
            error!(error = %err, "History query failed");
            Ok(warp::reply::with_status(
                warp::reply::json(&ErrorBody {
                    error: "storage unavailable".to_string(),
                }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

async fn handle_latest(
    query: LatestQuery,
    services: Arc<AppServices>,
) -> Result<impl Reply, Rejection> {
    match services.latest.execute(&query.content_type).await {
        Ok(Some(entry)) => Ok(warp::reply::with_status(
            warp::reply::json(&entry),
            StatusCode::OK,
        )),
        Ok(None) => Ok(warp::reply::with_status(
            warp::reply::json(&ErrorBody {
                error: format!("no entry with content type {}", query.content_type),
            }),
            StatusCode::NOT_FOUND,
        )),
        Err(err) => {
            error!(error = %err, "Latest-by-type query failed");
            Ok(warp::reply::with_status(
                warp::reply::json(&ErrorBody {
                    error: "storage unavailable".to_string(),
                }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}
