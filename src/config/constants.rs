pub const DEFAULT_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_MAX_TOKENS: u32 = 2048;
pub const DEFAULT_TEMPERATURE: f32 = 0.0;
pub const DEFAULT_REPETITION_PENALTY: f32 = 1.2;
pub const DEFAULT_MODEL: &str = "GEMA-Score-distilled-CT-llama";

pub const DEFAULT_LOCAL_BASE_URL: &str = "http://localhost:8000/v1";
pub const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_CEREBRAS_BASE_URL: &str = "https://api.cerebras.ai/v1";

pub const DEFAULT_PREDICTION_COLUMN: &str = "output_validation_ctchat_8b_retrain";
pub const DEFAULT_REFERENCE_COLUMN: &str = "gt";
pub const DEFAULT_RESULT_COLUMN: &str = "eval_result";
pub const DEFAULT_SCORE_COLUMN: &str = "weighted_final_score";

/// Hugging Face repository hosting the distilled grader checkpoints.
pub const CHECKPOINT_REPO: &str = "Gemascore/GEMA-Score-distilled";

/// Distilled checkpoints published under [`CHECKPOINT_REPO`], by subfolder.
pub const KNOWN_CHECKPOINTS: &[(&str, &str)] = &[
    ("GEMA-Score-distilled-CT-llama", "CT reports, Llama backbone"),
    ("GEMA-Score-distilled-Xray-llama", "Chest X-ray reports, Llama backbone"),
    ("GEMA-Score-distilled-CT-Qwen", "CT reports, Qwen backbone"),
    ("GEMA-Score-distilled-Xray-Qwen", "Chest X-ray reports, Qwen backbone"),
];
