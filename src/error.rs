#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("request to {url} failed: {reason}")]
	Network { url: String, reason: String },
	#[error("{url} answered {status} {status_text}")]
	Status {
		url: String,
		status: u16,
		status_text: String,
	},
	#[error("could not decode asset tree: {0}")]
	Decode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
