//! Runtime configuration
//!
//! All knobs come from the environment with sensible defaults, so the
//! binaries run without any setup. `dotenv` is loaded by the binaries
//! before this is read.

use std::env;
use std::time::Duration;

const DEFAULT_PROBE_TIMEOUT_MS: u64 = 3_000;
const DEFAULT_SESSION_IDLE_SECS: u64 = 1_800;
const DEFAULT_MAX_SILENT_TURNS: u32 = 3;
const DEFAULT_SAFE_STREAK_TO_CLOSE: u32 = 3;
const DEFAULT_MAX_TURNS: u32 = 50;
const DEFAULT_API_PORT: u16 = 8080;

#[derive(Debug, Clone)]
pub struct Config {
    /// Hard timeout for the URL liveness probe. Zero disables probing
    /// entirely (static signals only).
    pub probe_timeout: Duration,
    /// Sessions idle longer than this are evicted from the store.
    pub session_idle_timeout: Duration,
    /// Consecutive turns without new intelligence before a session closes.
    pub max_silent_turns: u32,
    /// Consecutive SAFE classifications before a session closes.
    pub safe_streak_to_close: u32,
    /// Hard ceiling on turns per session.
    pub max_turns: u32,
    pub api_port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            probe_timeout: Duration::from_millis(env_u64(
                "PROBE_TIMEOUT_MS",
                DEFAULT_PROBE_TIMEOUT_MS,
            )),
            session_idle_timeout: Duration::from_secs(env_u64(
                "SESSION_IDLE_SECS",
                DEFAULT_SESSION_IDLE_SECS,
            )),
            max_silent_turns: env_u64("MAX_SILENT_TURNS", DEFAULT_MAX_SILENT_TURNS as u64) as u32,
            safe_streak_to_close: env_u64(
                "SAFE_STREAK_TO_CLOSE",
                DEFAULT_SAFE_STREAK_TO_CLOSE as u64,
            ) as u32,
            max_turns: env_u64("MAX_TURNS", DEFAULT_MAX_TURNS as u64) as u32,
            api_port: env::var("PORT")
                .or_else(|_| env::var("API_PORT"))
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_API_PORT),
        }
    }

    pub fn probe_enabled(&self) -> bool {
        !self.probe_timeout.is_zero()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            probe_timeout: Duration::from_millis(DEFAULT_PROBE_TIMEOUT_MS),
            session_idle_timeout: Duration::from_secs(DEFAULT_SESSION_IDLE_SECS),
            max_silent_turns: DEFAULT_MAX_SILENT_TURNS,
            safe_streak_to_close: DEFAULT_SAFE_STREAK_TO_CLOSE,
            max_turns: DEFAULT_MAX_TURNS,
            api_port: DEFAULT_API_PORT,
        }
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
