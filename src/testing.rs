// Test doubles for the codec and the model backend
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use crate::codec::{PromptCodec, truncate_input};
use crate::generator::SequenceGenerator;
use crate::models::SamplingCall;

pub const BOS: u32 = 0;
pub const EOS: u32 = 2;
const FIRST_CHAR_ID: u32 = 4;

// One id per char, wrapped in BOS/EOS; ids below FIRST_CHAR_ID are special
pub struct CharCodec;

impl CharCodec {
    fn ids(text: &str) -> Vec<u32> {
        std::iter::once(BOS)
            .chain(text.chars().map(|c| c as u32 + FIRST_CHAR_ID))
            .chain(std::iter::once(EOS))
            .collect()
    }
}

impl PromptCodec for CharCodec {
    fn encode(&self, prompt: &str, max_length: usize) -> Result<Vec<u32>, String> {
        Ok(truncate_input(Self::ids(prompt), max_length, EOS))
    }

    fn decode(&self, ids: &[u32]) -> Result<String, String> {
        ids.iter()
            .filter(|&&id| id >= FIRST_CHAR_ID)
            .map(|&id| char::from_u32(id - FIRST_CHAR_ID).ok_or_else(|| format!("bad id {id}")))
            .collect()
    }

    fn eos_token_id(&self) -> u32 {
        EOS
    }
}

// Records every call; replies with scripted outcomes, then the fallback text
pub struct RecordingGenerator {
    calls: Mutex<Vec<SamplingCall>>,
    scripted: Mutex<VecDeque<Result<String, String>>>,
    fallback: String,
}

impl RecordingGenerator {
    pub fn replying(text: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            scripted: Mutex::new(VecDeque::new()),
            fallback: text.to_string(),
        }
    }

    pub fn failing_once(message: &str, then: &str) -> Self {
        let generator = Self::replying(then);
        generator
            .scripted
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        generator
    }

    pub fn calls(&self) -> Vec<SamplingCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SequenceGenerator for RecordingGenerator {
    async fn generate(&self, call: &SamplingCall) -> Result<Vec<u32>, String> {
        self.calls.lock().unwrap().push(call.clone());
        let outcome = self
            .scripted
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(self.fallback.clone()));
        outcome.map(|text| CharCodec::ids(&text))
    }
}
