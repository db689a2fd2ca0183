//! Turns every rejection into a JSON error reply

use serde::Serialize;
use std::convert::Infallible;
use warp::http::StatusCode;
use warp::{Rejection, Reply};

use crate::error::RustyTodosError;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

fn error_reply(status: StatusCode, error: &'static str, message: String) -> Box<dyn Reply> {
    let body = ErrorBody { error, message };
    Box::new(warp::reply::with_status(warp::reply::json(&body), status))
}

/// `recover` handler for the whole API
pub async fn handle_rejection(err: Rejection) -> Result<Box<dyn Reply>, Infallible> {
    if let Some(e) = err.find::<RustyTodosError>() {
        let status = e.status_code();

        if status == StatusCode::UNAUTHORIZED {
            // Authentication failures all look the same: bare 401, no body
            return Ok(Box::new(warp::reply::with_status(warp::reply(), status)));
        }
        if status.is_server_error() {
            log::error!("Request failed: {}", e);
        } else {
            log::debug!("Request rejected: {}", e);
        }
        return Ok(error_reply(status, e.kind(), e.public_message()));
    }

    if err.is_not_found() {
        return Ok(error_reply(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ));
    }
    if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        log::debug!("Invalid request body: {}", e);
        return Ok(error_reply(
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            "Invalid request body".to_string(),
        ));
    }
    if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        return Ok(error_reply(
            StatusCode::PAYLOAD_TOO_LARGE,
            "PAYLOAD_TOO_LARGE",
            "Request body too large".to_string(),
        ));
    }
    if err.find::<warp::reject::LengthRequired>().is_some() {
        return Ok(error_reply(
            StatusCode::LENGTH_REQUIRED,
            "LENGTH_REQUIRED",
            "Content-Length header is required".to_string(),
        ));
    }
    if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        return Ok(error_reply(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "UNSUPPORTED_MEDIA_TYPE",
            "Expected a JSON body".to_string(),
        ));
    }
    if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        return Ok(error_reply(
            StatusCode::METHOD_NOT_ALLOWED,
            "METHOD_NOT_ALLOWED",
            "Method not allowed".to_string(),
        ));
    }

    log::error!("Unhandled rejection: {:?}", err);
    Ok(error_reply(
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "Internal server error".to_string(),
    ))
}
