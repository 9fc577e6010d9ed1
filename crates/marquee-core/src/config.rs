use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub reveal: RevealConfig,
    #[serde(default)]
    pub carousel: CarouselConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub tokens: DesignTokens,
    #[serde(default)]
    pub preview: PreviewConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log files live here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Easing curve applied to reveal animations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingType {
    /// Jump straight to the end state
    None,
    Linear,
    #[default]
    Cubic,
    Quintic,
    /// Exponential ease-out
    EaseOut,
}

/// Scroll-reveal behavior shared by every animated section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealConfig {
    /// Minimum visible ratio (0.0-1.0) before a section counts as revealed
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Margin added around the viewport, in pixels (negative shrinks it)
    #[serde(default)]
    pub root_margin: i32,
    /// Hide again when scrolled out (false = reveal once)
    #[serde(default)]
    pub repeatable: bool,
    /// Quiet period before a visibility change is committed
    #[serde(default)]
    pub debounce_ms: u64,
    /// Duration of the reveal animation
    #[serde(default = "default_reveal_duration")]
    pub animation_duration_ms: u64,
    #[serde(default)]
    pub easing: EasingType,
    /// Delay before the first item of a staggered group starts
    #[serde(default)]
    pub stagger_base_ms: u64,
    /// Extra delay per item in a staggered group
    #[serde(default = "default_stagger_step")]
    pub stagger_step_ms: u64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            root_margin: 0,
            repeatable: false,
            debounce_ms: 0,
            animation_duration_ms: default_reveal_duration(),
            easing: EasingType::default(),
            stagger_base_ms: 0,
            stagger_step_ms: default_stagger_step(),
        }
    }
}

impl RevealConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarouselConfig {
    /// Advance automatically on a fixed period
    #[serde(default = "default_true")]
    pub auto_advance: bool,
    /// Auto-advance period
    #[serde(default = "default_period")]
    pub period_ms: u64,
    /// Transition lock window after every index change
    #[serde(default = "default_transition")]
    pub transition_ms: u64,
    /// Idle time after user navigation before auto-advance resumes
    #[serde(default = "default_idle_resume")]
    pub idle_resume_ms: u64,
    /// Minimum horizontal travel for a swipe, in pixels
    #[serde(default = "default_swipe_threshold")]
    pub swipe_threshold: u32,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            auto_advance: default_true(),
            period_ms: default_period(),
            transition_ms: default_transition(),
            idle_resume_ms: default_idle_resume(),
            swipe_threshold: default_swipe_threshold(),
        }
    }
}

impl CarouselConfig {
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }

    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }

    pub fn idle_resume(&self) -> Duration {
        Duration::from_millis(self.idle_resume_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakpointConfig {
    /// Widths up to and including this value are Mobile
    #[serde(default = "default_mobile_max")]
    pub mobile_max: u32,
    /// Widths up to and including this value are Tablet
    #[serde(default = "default_tablet_max")]
    pub tablet_max: u32,
    /// Resize debounce delay
    #[serde(default = "default_resize_debounce")]
    pub debounce_ms: u64,
}

impl Default for BreakpointConfig {
    fn default() -> Self {
        Self {
            mobile_max: default_mobile_max(),
            tablet_max: default_tablet_max(),
            debounce_ms: default_resize_debounce(),
        }
    }
}

impl BreakpointConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Endpoint receiving contact form submissions (HTTPS POST)
    #[serde(default)]
    pub submit_endpoint: Option<String>,
    /// Base URL of the hosted database REST API
    #[serde(default)]
    pub content_base_url: Option<String>,
    /// Public API key sent with every backend request
    #[serde(default)]
    pub api_key: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            submit_endpoint: None,
            content_base_url: None,
            api_key: None,
            request_timeout_secs: default_timeout(),
        }
    }
}

/// Design tokens shared by every section
/// Colors are hex strings (e.g., "#0d3b66")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignTokens {
    #[serde(default = "default_primary")]
    pub primary: String,
    #[serde(default = "default_secondary")]
    pub secondary: String,
    #[serde(default = "default_accent")]
    pub accent: String,
    #[serde(default = "default_background")]
    pub background: String,
    #[serde(default = "default_text")]
    pub text: String,
    #[serde(default = "default_muted")]
    pub muted: String,
    /// Base spacing unit in pixels
    #[serde(default = "default_spacing")]
    pub spacing: u32,
    /// Width thresholds read by every breakpoint tracker
    #[serde(default)]
    pub breakpoints: BreakpointConfig,
}

impl Default for DesignTokens {
    fn default() -> Self {
        Self {
            primary: default_primary(),
            secondary: default_secondary(),
            accent: default_accent(),
            background: default_background(),
            text: default_text(),
            muted: default_muted(),
            spacing: default_spacing(),
            breakpoints: BreakpointConfig::default(),
        }
    }
}

impl DesignTokens {
    /// Parse a token color into RGB components
    /// Accepts "#rrggbb" or "rrggbb"
    pub fn rgb(hex: &str) -> Option<(u8, u8, u8)> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some((r, g, b))
    }
}

/// Settings for the terminal preview shell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Tick rate in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Pixels represented by one terminal column (for breakpoint mapping)
    #[serde(default = "default_px_per_column")]
    pub px_per_column: u32,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            px_per_column: default_px_per_column(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("marquee")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_threshold() -> f64 {
    0.1
}

fn default_reveal_duration() -> u64 {
    600
}

fn default_stagger_step() -> u64 {
    100
}

fn default_period() -> u64 {
    4000
}

fn default_transition() -> u64 {
    500
}

fn default_idle_resume() -> u64 {
    5000
}

fn default_swipe_threshold() -> u32 {
    50
}

fn default_mobile_max() -> u32 {
    768
}

fn default_tablet_max() -> u32 {
    1024
}

fn default_resize_debounce() -> u64 {
    150
}

fn default_timeout() -> u64 {
    15
}

fn default_primary() -> String {
    "#0d3b66".to_string()
}

fn default_secondary() -> String {
    "#1b998b".to_string()
}

fn default_accent() -> String {
    "#f4a259".to_string()
}

fn default_background() -> String {
    "#101418".to_string()
}

fn default_text() -> String {
    "#f5f5f5".to_string()
}

fn default_muted() -> String {
    "#8a94a6".to_string()
}

fn default_spacing() -> u32 {
    8
}

fn default_tick_rate() -> u64 {
    50
}

fn default_px_per_column() -> u32 {
    10
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from the default path or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a specific file, defaults if it does not exist
    pub fn load_from(path: &std::path::Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::parse(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> crate::Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the controllers cannot operate with
    pub fn validate(&self) -> crate::Result<()> {
        if !(0.0..=1.0).contains(&self.reveal.threshold) {
            return Err(crate::Error::Config(format!(
                "reveal.threshold must be within 0.0-1.0, got {}",
                self.reveal.threshold
            )));
        }
        let breakpoints = &self.tokens.breakpoints;
        if breakpoints.mobile_max >= breakpoints.tablet_max {
            return Err(crate::Error::Config(format!(
                "tokens.breakpoints.mobile_max ({}) must be below tokens.breakpoints.tablet_max ({})",
                breakpoints.mobile_max, breakpoints.tablet_max
            )));
        }
        if self.carousel.auto_advance && self.carousel.period_ms == 0 {
            return Err(crate::Error::Config(
                "carousel.period_ms must be non-zero when auto_advance is enabled".to_string(),
            ));
        }
        Ok(())
    }

    /// Save configuration to the default path
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(&config_path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/marquee/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("marquee")
            .join("config.toml")
    }

    /// Get the log file path used by the preview shell
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("marquee.log")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }
}
