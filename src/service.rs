use std::sync::Arc;
use crate::codec::PromptCodec;
use crate::error::TuneError;
use crate::generator::SequenceGenerator;
use crate::models::{GenerationRequest, GenerationResult, SamplingCall};

// ABC reference-number header every tune starts with
pub const TUNE_HEADER: &str = "X:1\n";

pub fn normalize_tune(raw_text: &str) -> String {
    format!("{TUNE_HEADER}{raw_text}")
}

// Validates a submission, runs one nucleus-sampling generation, normalizes the result.
// Codec and generator are built once at startup and shared read-only.
pub struct TuneService {
    codec: Arc<dyn PromptCodec>,
    generator: Arc<dyn SequenceGenerator>,
}

impl TuneService {
    pub fn new(codec: Arc<dyn PromptCodec>, generator: Arc<dyn SequenceGenerator>) -> Self {
        Self { codec, generator }
    }

    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult, TuneError> {
        request.validate()?;

        let input_ids = self
            .codec
            .encode(&request.prompt, request.max_length)
            .map_err(TuneError::Generation)?;

        let call = SamplingCall {
            input_ids,
            max_length: request.max_length,
            do_sample: true,
            top_p: request.top_p,
            temperature: request.temperature,
            eos_token_id: self.codec.eos_token_id(),
        };

        let generated_ids = self
            .generator
            .generate(&call)
            .await
            .map_err(TuneError::Generation)?;

        let raw_text = self
            .codec
            .decode(&generated_ids)
            .map_err(TuneError::Generation)?;

        Ok(GenerationResult {
            normalized_text: normalize_tune(&raw_text),
            raw_text,
        })
    }
}
