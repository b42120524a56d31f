use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::env;
use std::fmt::{self, Debug, Display};

pub const PROVIDER_LOAD_ERROR: i32 = 10;
pub const GEOLOCATION_ERROR: i32 = 11;
pub const DIRECTIONS_ERROR: i32 = 12;
pub const STORAGE_CORRUPT_ERROR: i32 = 13;
pub const INDEX_OUT_OF_RANGE_ERROR: i32 = 102;

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    pub code: i32,
    pub message: String,
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

impl std::error::Error for Error {}

impl From<env::VarError> for Error {
    fn from(err: env::VarError) -> Self {
        env_var_error(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        reqwest_error(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        storage_corrupt_error(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        storage_error(err)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_message) = match self.code {
            PROVIDER_LOAD_ERROR => (StatusCode::SERVICE_UNAVAILABLE, self.message.as_str()),
            1..=99 => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
            _ => (StatusCode::BAD_REQUEST, self.message.as_str()),
        };

        let body = Json(json!({
            "code": self.code,
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl Error {
    pub fn is(&self, code: i32) -> bool {
        self.code == code
    }
}

pub fn invalid_state_error() -> Error {
    Error {
        code: 100,
        message: "invalid state".into(),
    }
}

pub fn invalid_input_error() -> Error {
    Error {
        code: 101,
        message: "invalid input".into(),
    }
}

pub fn index_out_of_range_error(index: usize, len: usize) -> Error {
    Error {
        code: INDEX_OUT_OF_RANGE_ERROR,
        message: format!("index {} out of range for {} items", index, len),
    }
}

pub fn env_var_error(_: env::VarError) -> Error {
    Error {
        code: 1,
        message: "environment variable error".into(),
    }
}

pub fn storage_error<T: Debug>(err: T) -> Error {
    Error {
        code: 2,
        message: format!("storage error: {:?}", err),
    }
}

pub fn reqwest_error(_: reqwest::Error) -> Error {
    Error {
        code: 3,
        message: "reqwest error".into(),
    }
}

pub fn upstream_error() -> Error {
    Error {
        code: 4,
        message: "upstream error".into(),
    }
}

pub fn server_error<T: Debug>(err: T) -> Error {
    Error {
        code: 5,
        message: format!("server error: {:?}", err),
    }
}

pub fn provider_load_error() -> Error {
    Error {
        code: PROVIDER_LOAD_ERROR,
        message: "Error cargando mapas".into(),
    }
}

pub fn geolocation_error() -> Error {
    Error {
        code: GEOLOCATION_ERROR,
        message: "geolocation unavailable".into(),
    }
}

pub fn directions_error<T: Debug>(cause: T) -> Error {
    Error {
        code: DIRECTIONS_ERROR,
        message: format!("directions request failed: {:?}", cause),
    }
}

pub fn storage_corrupt_error<T: Debug>(cause: T) -> Error {
    Error {
        code: STORAGE_CORRUPT_ERROR,
        message: format!("stored data is malformed: {:?}", cause),
    }
}

#[test]
fn provider_load_error_is_unavailable() {
    let response = provider_load_error().into_response();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[test]
fn internal_errors_hide_message() {
    let response = upstream_error().into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = index_out_of_range_error(3, 1).into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
