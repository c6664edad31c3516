use once_cell::sync::Lazy;

#[derive(Debug)]
pub struct Config {
    pub fx_timeout_ms: u64,
    pub fx_loop_delay_ms: u64,
    pub fx_dump_frames: bool,
}

impl Config {
    fn from_env() -> Self {
        let fx_timeout_ms = env_u64("FX_TIMEOUT_MS", 1000);
        let fx_loop_delay_ms = env_u64("FX_LOOP_DELAY_MS", 20);
        let fx_dump_frames = std::env::var("FX_DUMP_FRAMES")
            .map(|v| v == "1")
            .unwrap_or(false);
        Self {
            fx_timeout_ms,
            fx_loop_delay_ms,
            fx_dump_frames,
        }
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    match std::env::var(key) {
        Ok(s) => s.parse::<u64>().unwrap_or_else(|_| {
            tracing::warn!("ignoring unparsable {key}={s}, using default {default}");
            default
        }),
        Err(_) => default,
    }
}

/// Global config loaded once from environment at first access.
pub static GLOBAL_CONFIG: Lazy<Config> = Lazy::new(Config::from_env);

/// Convenience accessor
pub fn config() -> &'static Config {
    &GLOBAL_CONFIG
}
