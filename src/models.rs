use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use tokio::sync::oneshot;
use crate::error::TuneError;

pub const MAX_LENGTH_RANGE: RangeInclusive<usize> = 128..=2048;
pub const TOP_P_RANGE: RangeInclusive<f64> = 0.1..=1.0;
pub const TEMPERATURE_RANGE: RangeInclusive<f64> = 0.1..=2.0;

pub const DEFAULT_MAX_LENGTH: usize = 1024;
pub const DEFAULT_TOP_P: f64 = 0.9;
pub const DEFAULT_TEMPERATURE: f64 = 1.0;

fn default_max_length() -> usize {
    DEFAULT_MAX_LENGTH
}

fn default_top_p() -> f64 {
    DEFAULT_TOP_P
}

fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}

// One user submission (JSON body and form fields share this shape)
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GenerationRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default = "default_max_length")]
    pub max_length: usize,
    #[serde(default = "default_top_p")]
    pub top_p: f64,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, max_length: usize, top_p: f64, temperature: f64) -> Self {
        Self {
            prompt: prompt.into(),
            max_length,
            top_p,
            temperature,
        }
    }

    // Blank prompt is checked first so it always reports "empty prompt"
    pub fn validate(&self) -> Result<(), TuneError> {
        if self.prompt.trim().is_empty() {
            return Err(TuneError::Validation("empty prompt".to_string()));
        }
        if !MAX_LENGTH_RANGE.contains(&self.max_length) {
            return Err(TuneError::Validation(format!(
                "max_length must be within {}..={}, got {}",
                MAX_LENGTH_RANGE.start(),
                MAX_LENGTH_RANGE.end(),
                self.max_length
            )));
        }
        if !TOP_P_RANGE.contains(&self.top_p) {
            return Err(TuneError::Validation(format!(
                "top_p must be within {}..={}, got {}",
                TOP_P_RANGE.start(),
                TOP_P_RANGE.end(),
                self.top_p
            )));
        }
        if !TEMPERATURE_RANGE.contains(&self.temperature) {
            return Err(TuneError::Validation(format!(
                "temperature must be within {}..={}, got {}",
                TEMPERATURE_RANGE.start(),
                TEMPERATURE_RANGE.end(),
                self.temperature
            )));
        }
        Ok(())
    }
}

impl Default for GenerationRequest {
    fn default() -> Self {
        Self::new(String::new(), DEFAULT_MAX_LENGTH, DEFAULT_TOP_P, DEFAULT_TEMPERATURE)
    }
}

// What one successful generation produced
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationResult {
    pub raw_text: String,
    pub normalized_text: String,
}

// Arguments handed to the model backend for a single sampling run
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SamplingCall {
    pub input_ids: Vec<u32>,
    pub max_length: usize,
    pub do_sample: bool,
    pub top_p: f64,
    pub temperature: f64,
    pub eos_token_id: u32,
}

// JSON API response format
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GenerateResponse {
    pub model: String,
    pub tune: String,
    pub editor_url: String,
}

// Queued generation - holds request + response channel
pub struct GenerationJob {
    pub request: GenerationRequest,
    pub response_tx: oneshot::Sender<Result<GenerationResult, TuneError>>,
}
