use axum::{
    Extension, Json,
    body::Body,
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use tokio_util::io::ReaderStream;
use tracing::{debug, warn};

use reelgate_types::api::{Claims, VideoListResponse};
use reelgate_types::media::content_type_for;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::library::LibraryError;

/// GET /videos: names of the playable files in the video directory.
pub async fn list_videos(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let videos = state
        .library
        .list()
        .await
        .map_err(|e| state.internal("Error fetching videos", e))?;

    debug!("Listed {} videos for {}", videos.len(), claims.username);
    Ok(Json(VideoListResponse { videos }))
}

/// GET /video/{filename}: the whole file as the response body.
pub async fn stream_video(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let (file, len) = state.library.open(&filename).await.map_err(|e| match e {
        LibraryError::InvalidName => {
            warn!("Rejected video name {:?} from {}", filename, claims.username);
            ApiError::Validation("Invalid filename".into())
        }
        LibraryError::NotFound => ApiError::NotFound("Video not found".into()),
        LibraryError::Io(e) => state.internal("Error reading video", e),
    })?;

    debug!("Streaming {} ({} bytes) to {}", filename, len, claims.username);

    let headers = [
        (
            header::CONTENT_TYPE,
            HeaderValue::from_static(content_type_for(&filename)),
        ),
        (header::CONTENT_LENGTH, HeaderValue::from(len)),
    ];
    let body = Body::from_stream(ReaderStream::new(file));

    Ok((StatusCode::OK, headers, body))
}
