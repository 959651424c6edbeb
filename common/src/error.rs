use axum::{
	http::StatusCode,
	response::{ IntoResponse, Response },
	Json,
};
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use tracing::{ error, warn };

#[derive(Error, Debug)]
pub enum DashboardError {
	#[error("Missing required parameter: {0}")]
	MissingParameter(&'static str),

	#[error("Invalid value for {field}: {reason}")]
	InvalidInput {
		field: &'static str,
		reason: String,
	},

	#[error("Invalid range: start_date {start} is after end_date {end}")]
	InvalidRange {
		start: NaiveDate,
		end: NaiveDate,
	},

	#[error("{0} not found")]
	NotFound(String),

	#[error("Store error: {0}")]
	Store(#[from] anyhow::Error),
}

impl DashboardError {
	pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
		Self::InvalidInput { field, reason: reason.into() }
	}

	pub fn status(&self) -> StatusCode {
		match self {
			Self::MissingParameter(_) | Self::InvalidInput { .. } | Self::InvalidRange { .. } =>
				StatusCode::BAD_REQUEST,
			Self::NotFound(_) => StatusCode::NOT_FOUND,
			Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	pub fn code(&self) -> &'static str {
		match self {
			Self::MissingParameter(_) => "MISSING_PARAMETER",
			Self::InvalidInput { .. } => "INVALID_INPUT",
			Self::InvalidRange { .. } => "INVALID_RANGE",
			Self::NotFound(_) => "NOT_FOUND",
			Self::Store(_) => "INTERNAL_ERROR",
		}
	}
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error: String,
	code: &'static str,
}

impl IntoResponse for DashboardError {
	fn into_response(self) -> Response {
		let status = self.status();

		let message = match &self {
			Self::Store(e) => {
				error!("Store failure: {:?}", e);
				"Internal server error".to_string()
			}
			other => {
				warn!(code = other.code(), "Rejected request: {}", other);
				other.to_string()
			}
		};

		(status, Json(ErrorBody { error: message, code: self.code() })).into_response()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn client_errors_map_to_4xx() {
		assert_eq!(DashboardError::MissingParameter("start_date").status(), StatusCode::BAD_REQUEST);
		assert_eq!(DashboardError::invalid("min_amount", "not a number").status(), StatusCode::BAD_REQUEST);
		assert_eq!(DashboardError::NotFound("Restaurant 9".into()).status(), StatusCode::NOT_FOUND);
	}

	#[tokio::test]
	async fn store_errors_are_not_leaked() {
		let response = DashboardError::from(anyhow::anyhow!("disk on fire")).into_response();
		assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

		let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
		let body = String::from_utf8(bytes.to_vec()).unwrap();
		assert!(!body.contains("disk on fire"), "{}", body);

		let json: serde_json::Value = serde_json::from_str(&body).unwrap();
		assert_eq!(json["error"], "Internal server error");
		assert_eq!(json["code"], "INTERNAL_ERROR");
	}
}
