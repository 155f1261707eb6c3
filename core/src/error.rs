use thiserror::Error;

/// Errors surfaced by track processing, stats and fitting.
///
/// Missing sensor values, clamped grades and non-converged fits are not
/// errors; they are resolved in place (see `RawSample`, `derive_step` and
/// `FitResult`).
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("track has no samples")]
    NoSamples,

    #[error("no samples with velocity in ({vel_min}, {vel_max}) mph")]
    NoMovingSamples { vel_min: f64, vel_max: f64 },

    #[error("no DST rule for year {year} (calendar covers {first}..={last})")]
    DstYearOutOfRange { year: i32, first: i32, last: i32 },

    #[error("normal equations are singular at iteration {iteration}")]
    SingularMatrix { iteration: usize },

    #[error("invalid fit input: {0}")]
    InvalidFit(String),

    #[error("cannot parse timestamp '{value}': {source}")]
    TimeParse {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("invalid JSON at {path}: {message}")]
    JsonInput { path: String, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;

impl From<serde_path_to_error::Error<serde_json::Error>> for CoreError {
    fn from(err: serde_path_to_error::Error<serde_json::Error>) -> Self {
        CoreError::JsonInput {
            path: err.path().to_string(),
            message: err.inner().to_string(),
        }
    }
}
