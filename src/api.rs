//! The single request the page makes: fetch the asset tree.

use log::debug;
use serde::Deserialize;

use crate::components::asset_graph::DomainNode;
use crate::error::{Error, Result};

/// The backend may answer with the bare tree or wrap it in `{"data": ...}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum Payload {
	Wrapped { data: DomainNode },
	Bare(DomainNode),
}

pub fn decode_tree(bytes: &[u8]) -> Result<DomainNode> {
	let tree = match serde_json::from_slice(bytes)? {
		Payload::Wrapped { data } => data,
		Payload::Bare(tree) => tree,
	};
	Ok(tree)
}

pub async fn fetch_tree(url: &str) -> Result<DomainNode> {
	let request = ehttp::Request::get(url);
	let response = ehttp::fetch_async(request)
		.await
		.map_err(|reason| Error::Network {
			url: url.to_string(),
			reason,
		})?;
	if !response.ok {
		return Err(Error::Status {
			url: url.to_string(),
			status: response.status,
			status_text: response.status_text,
		});
	}
	debug!("fetched {} bytes from {url}", response.bytes.len());
	decode_tree(&response.bytes)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::asset_graph::NodeKind;

	#[test]
	fn accepts_bare_tree() {
		let tree = decode_tree(br#"{"id":"r","name":"Root","type":"catalog"}"#).unwrap();
		assert_eq!(tree.id.as_deref(), Some("r"));
		assert_eq!(tree.kind, NodeKind::Catalog);
	}

	#[test]
	fn accepts_wrapped_tree() {
		let body = br#"{"code":0,"data":{"id":"r","name":"Root","type":"department","children":[{"id":"a","type":"owner"}]}}"#;
		let tree = decode_tree(body).unwrap();
		assert_eq!(tree.id.as_deref(), Some("r"));
		assert_eq!(tree.children.len(), 1);
	}

	#[test]
	fn malformed_body_is_a_decode_error() {
		let err = decode_tree(b"<html>").unwrap_err();
		assert!(matches!(err, Error::Decode(_)));
		assert!(err.to_string().starts_with("could not decode asset tree"));
	}
}
