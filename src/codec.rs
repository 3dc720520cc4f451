use anyhow::{Context, anyhow};
use std::path::{Path, PathBuf};
use tokenizers::Tokenizer;
use tracing::info;

// Turns prompts into model input ids and generated ids back into text
pub trait PromptCodec: Send + Sync {
    fn encode(&self, prompt: &str, max_length: usize) -> Result<Vec<u32>, String>;

    // special/control tokens are dropped from the output
    fn decode(&self, ids: &[u32]) -> Result<String, String>;

    fn eos_token_id(&self) -> u32;
}

// Keep at most `max_length` ids; a trailing end-of-sequence id survives the cut
pub fn truncate_input(mut ids: Vec<u32>, max_length: usize, eos_token_id: u32) -> Vec<u32> {
    if ids.len() <= max_length {
        return ids;
    }
    let ends_with_eos = ids.last() == Some(&eos_token_id);
    ids.truncate(max_length);
    if ends_with_eos {
        if let Some(last) = ids.last_mut() {
            *last = eos_token_id;
        }
    }
    ids
}

// Codec backed by the model's Hugging Face tokenizer
pub struct HfCodec {
    tokenizer: Tokenizer,
    eos_token_id: u32,
}

impl HfCodec {
    pub fn from_file(path: &Path, eos_token: &str) -> anyhow::Result<Self> {
        let mut tokenizer = Tokenizer::from_file(path)
            .map_err(|e| anyhow!("Tokenizer load failed ({}): {e}", path.display()))?;
        tokenizer.with_padding(None);
        let _ = tokenizer.with_truncation(None);

        let eos_token_id = tokenizer
            .token_to_id(eos_token)
            .ok_or_else(|| anyhow!("end-of-sequence token {eos_token:?} not in vocabulary"))?;

        info!(path = %path.display(), eos_token, eos_token_id, "Tokenizer loaded");
        Ok(Self {
            tokenizer,
            eos_token_id,
        })
    }

    // Download (or reuse the local cache of) tokenizer.json for `model`
    pub fn fetch_tokenizer(model: &str) -> anyhow::Result<PathBuf> {
        let api = hf_hub::api::sync::Api::new().context("Hugging Face Hub client")?;
        api.model(model.to_string())
            .get("tokenizer.json")
            .with_context(|| format!("fetching tokenizer.json for {model}"))
    }
}

impl PromptCodec for HfCodec {
    fn encode(&self, prompt: &str, max_length: usize) -> Result<Vec<u32>, String> {
        let encoding = self
            .tokenizer
            .encode(prompt, true)
            .map_err(|e| format!("Tokenizer encode error: {e}"))?;
        Ok(truncate_input(
            encoding.get_ids().to_vec(),
            max_length,
            self.eos_token_id,
        ))
    }

    fn decode(&self, ids: &[u32]) -> Result<String, String> {
        self.tokenizer
            .decode(ids, true)
            .map_err(|e| format!("Tokenizer decode error: {e}"))
    }

    fn eos_token_id(&self) -> u32 {
        self.eos_token_id
    }
}
