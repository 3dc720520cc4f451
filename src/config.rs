use clap::Parser;
use std::path::PathBuf;

// CLI argument structure (every flag can also come from the environment / .env)
#[derive(Parser, Debug, Clone)]
#[command(name = "abc-tune-gateway")]
#[command(about = "Text-to-music form and API in front of a seq2seq model backend")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, env = "TUNE_GATEWAY_PORT", default_value_t = 8080)]
    pub port: u16,

    // Model backends (comma-separated)
    // Example: "localhost:8000,localhost:8001"
    #[arg(short, long, env = "TUNE_BACKENDS", default_value = "localhost:8000")]
    pub backends: String,

    // Pretrained model name, sent to the backend and used to fetch the tokenizer
    #[arg(short, long, env = "TUNE_MODEL", default_value = "sander-wood/text-to-music")]
    pub model: String,

    // Local tokenizer.json; fetched from the Hugging Face Hub when absent
    #[arg(short, long, env = "TUNE_TOKENIZER")]
    pub tokenizer: Option<PathBuf>,

    // End-of-sequence token of the model vocabulary
    #[arg(long, env = "TUNE_EOS_TOKEN", default_value = "</s>")]
    pub eos_token: String,

    // Embeddable notation editor the tune is handed to
    #[arg(long, env = "TUNE_EDITOR_URL", default_value = crate::export::ABCJS_EDITOR_URL)]
    pub editor_url: String,

    // Rate limit max requests per window
    #[arg(long, env = "TUNE_RATE_LIMIT", default_value_t = 10)]
    pub rate_limit: u32,

    // Rate limit window in seconds
    #[arg(long, env = "TUNE_RATE_WINDOW", default_value_t = 60)]
    pub rate_window: u64,

    // Health check interval in seconds
    #[arg(long, env = "TUNE_HEALTH_INTERVAL", default_value_t = 30)]
    pub health_interval: u64,

    // Pending generations allowed in the worker queue
    #[arg(long, env = "TUNE_QUEUE_CAPACITY", default_value_t = 100)]
    pub queue_capacity: usize,
}
