use std::time::Duration;

use color_eyre::{Result, eyre};
use reqwest::{
	Client,
	header::{AUTHORIZATION, HeaderMap, HeaderName},
};
use serde_json::Value;

/// Embeds a batch of texts with the configured provider. The "hash" kind is
/// deterministic and fully offline; "http" posts to an OpenAI-compatible
/// embeddings endpoint.
pub async fn embed(
	cfg: &tender_config::EmbeddingProviderConfig,
	texts: &[String],
) -> Result<Vec<Vec<f32>>> {
	match cfg.kind.as_str() {
		"http" => http_embed(cfg, texts).await,
		"hash" => Ok(hash_embed(texts, cfg.dimensions as usize)),
		other => Err(eyre::eyre!("Unknown embedding provider kind: {other}.")),
	}
}

async fn http_embed(
	cfg: &tender_config::EmbeddingProviderConfig,
	texts: &[String],
) -> Result<Vec<Vec<f32>>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"input": texts,
		"dimensions": cfg.dimensions,
	});
	let res = client
		.post(url)
		.headers(auth_headers(cfg)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_embedding_response(json)
}

fn auth_headers(cfg: &tender_config::EmbeddingProviderConfig) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	headers.insert(AUTHORIZATION, format!("Bearer {}", cfg.api_key).parse()?);

	for (key, value) in &cfg.default_headers {
		let Some(raw) = value.as_str() else {
			return Err(eyre::eyre!("Default header values must be strings."));
		};

		headers.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}

	Ok(headers)
}

fn parse_embedding_response(json: Value) -> Result<Vec<Vec<f32>>> {
	let data = json
		.get("data")
		.and_then(|v| v.as_array())
		.ok_or_else(|| eyre::eyre!("Embedding response is missing data array."))?;

	let mut indexed: Vec<(usize, Vec<f32>)> = Vec::with_capacity(data.len());
	for (fallback_index, item) in data.iter().enumerate() {
		let index = item
			.get("index")
			.and_then(|v| v.as_u64())
			.map(|v| v as usize)
			.unwrap_or(fallback_index);
		let embedding = item
			.get("embedding")
			.and_then(|v| v.as_array())
			.ok_or_else(|| eyre::eyre!("Embedding item missing embedding array."))?;
		let mut vec = Vec::with_capacity(embedding.len());
		for value in embedding {
			let number =
				value.as_f64().ok_or_else(|| eyre::eyre!("Embedding value must be numeric."))?;
			vec.push(number as f32);
		}
		indexed.push((index, vec));
	}

	indexed.sort_by_key(|(index, _)| *index);

	Ok(indexed.into_iter().map(|(_, vec)| vec).collect())
}

/// Deterministic word-hash embeddings. Each word's blake3 digest seeds a
/// spread of contributions across the vector, so texts sharing words land
/// near each other under cosine similarity. Blank texts map to the zero
/// vector.
fn hash_embed(texts: &[String], dimensions: usize) -> Vec<Vec<f32>> {
	texts.iter().map(|text| hash_embed_text(text, dimensions)).collect()
}

/// Cosine similarity between two vectors. Mismatched lengths and zero
/// magnitudes both yield `0.0` so callers never see a NaN.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
	if a.len() != b.len() || a.is_empty() {
		return 0.0;
	}

	let mut dot = 0.0_f32;
	let mut mag_a = 0.0_f32;
	let mut mag_b = 0.0_f32;

	for (x, y) in a.iter().zip(b) {
		dot += x * y;
		mag_a += x * x;
		mag_b += y * y;
	}

	if mag_a == 0.0 || mag_b == 0.0 {
		return 0.0;
	}

	dot / (mag_a.sqrt() * mag_b.sqrt())
}

fn hash_embed_text(text: &str, dimensions: usize) -> Vec<f32> {
	let mut vector = vec![0.0_f32; dimensions];

	if dimensions == 0 || text.trim().is_empty() {
		return vector;
	}

	for (word_index, word) in text.to_lowercase().split_whitespace().enumerate() {
		let digest = *blake3::hash(word.as_bytes()).as_bytes();
		let seed = u64::from_le_bytes([
			digest[0], digest[1], digest[2], digest[3], digest[4], digest[5], digest[6], digest[7],
		]);

		for i in 0..dimensions {
			let slot = (seed as usize)
				.wrapping_add(word_index.wrapping_mul(7))
				.wrapping_add(i.wrapping_mul(13))
				% dimensions;

			vector[slot] += ((seed.wrapping_add(i as u64) % 1_000) as f32).sin() * 0.1;
		}
	}

	let magnitude = vector.iter().map(|value| value * value).sum::<f32>().sqrt();

	if magnitude > 0.0 {
		for value in &mut vector {
			*value /= magnitude;
		}
	}

	vector
}
