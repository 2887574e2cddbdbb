/// Which input-collection policy the predict endpoint runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Fields arrive as JSON numbers and are checked against closed ranges.
    Bounded,
    /// Fields arrive as raw text and are validated and parsed.
    Freeform,
}

impl InputMode {
    pub fn as_str(self) -> &'static str {
        match self {
            InputMode::Bounded => "bounded",
            InputMode::Freeform => "freeform",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bounded" => Some(InputMode::Bounded),
            "freeform" => Some(InputMode::Freeform),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub scaler_path: String,
    pub model_path: String,
    pub input_mode: InputMode,
    pub analysis_delay_ms: u64,
    pub assets_dir: String,
}

impl AppConfig {
    /// Read configuration from the environment, with defaults for everything.
    pub fn from_env() -> Self {
        let port: u16 = std::env::var("PORT").ok().and_then(|s| s.parse().ok()).unwrap_or(8080);
        let scaler_path = std::env::var("SCALER_PATH").unwrap_or_else(|_| "scaler.bin".to_string());
        let model_path = std::env::var("MODEL_PATH").unwrap_or_else(|_| "model.bin".to_string());
        let analysis_delay_ms = std::env::var("ANALYSIS_DELAY_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(2000);
        let assets_dir = std::env::var("ASSETS_DIR").unwrap_or_else(|_| "assets".to_string());
        let input_mode = match std::env::var("INPUT_MODE") {
            Ok(s) => InputMode::parse(&s).unwrap_or_else(|| {
                tracing::warn!("unknown INPUT_MODE {:?}; falling back to bounded", s);
                InputMode::Bounded
            }),
            Err(_) => InputMode::Bounded,
        };

        Self {
            port,
            scaler_path,
            model_path,
            input_mode,
            analysis_delay_ms,
            assets_dir,
        }
    }
}
