use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub ui: UiConfig,
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

/// Easing curve for inset animations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingType {
    /// Jump to the end value
    None,
    Linear,
    Cubic,
    Quintic,
    EaseOut,
    /// Damped spring driven by `spring_damping` / `initial_spring_velocity`
    #[default]
    Spring,
}

/// Tunables of the refresh controller and its default indicator mapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Duration of the inset animation back to rest after a refresh
    #[serde(default = "default_finish_duration")]
    pub finish_duration_ms: u64,
    /// Delay before the finish animation starts
    #[serde(default)]
    pub hide_delay_ms: u64,
    /// Spring damping ratio (0.0-1.0) for the finish animation
    #[serde(default = "default_spring_damping")]
    pub spring_damping: f64,
    /// Initial spring velocity, in animated distances per duration
    #[serde(default = "default_spring_velocity")]
    pub initial_spring_velocity: f64,
    /// Curve of the finish animation
    #[serde(default)]
    pub finish_easing: EasingType,
    /// Duration of the inset animation into the loading position
    #[serde(default = "default_loading_duration")]
    pub loading_duration_ms: u64,
    /// Settle delay between a programmatic scroll and forcing `loading`
    #[serde(default = "default_start_delay")]
    pub start_delay_ms: u64,
    /// Pull distances beyond this are ignored as rubber-band noise
    #[serde(default = "default_release_cap")]
    pub release_cap: f64,
    /// Keep the indicator above the host while loading
    #[serde(default)]
    pub visible_while_scrolling: bool,
    /// Indicator fade-out duration
    #[serde(default = "default_fade_duration")]
    pub fade_duration_ms: u64,
    /// Progress below which the indicator stays hidden
    #[serde(default = "default_visibility_threshold")]
    pub visibility_threshold: f64,
    /// Fraction of the indicator animation scrubbed by a full pull
    #[serde(default = "default_scrub_scale")]
    pub scrub_scale: f64,
    /// Start of the looping segment played while loading
    #[serde(default = "default_loop_from")]
    pub loop_from: f64,
    /// End of the looping segment played while loading
    #[serde(default = "default_loop_to")]
    pub loop_to: f64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            finish_duration_ms: default_finish_duration(),
            hide_delay_ms: 0,
            spring_damping: default_spring_damping(),
            initial_spring_velocity: default_spring_velocity(),
            finish_easing: EasingType::default(),
            loading_duration_ms: default_loading_duration(),
            start_delay_ms: default_start_delay(),
            release_cap: default_release_cap(),
            visible_while_scrolling: false,
            fade_duration_ms: default_fade_duration(),
            visibility_threshold: default_visibility_threshold(),
            scrub_scale: default_scrub_scale(),
            loop_from: default_loop_from(),
            loop_to: default_loop_to(),
        }
    }
}

impl RefreshConfig {
    pub fn finish_duration(&self) -> Duration {
        Duration::from_millis(self.finish_duration_ms)
    }

    pub fn hide_delay(&self) -> Duration {
        Duration::from_millis(self.hide_delay_ms)
    }

    pub fn loading_duration(&self) -> Duration {
        Duration::from_millis(self.loading_duration_ms)
    }

    pub fn start_delay(&self) -> Duration {
        Duration::from_millis(self.start_delay_ms)
    }

    pub fn fade_duration(&self) -> Duration {
        Duration::from_millis(self.fade_duration_ms)
    }

    /// Reject values the controller cannot work with
    pub fn validate(&self) -> crate::Result<()> {
        let unit = |name: &str, value: f64| {
            if value.is_finite() && (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(crate::Error::Config(format!(
                    "refresh.{} must be within 0.0-1.0, got {}",
                    name, value
                )))
            }
        };

        unit("spring_damping", self.spring_damping)?;
        unit("visibility_threshold", self.visibility_threshold)?;
        unit("scrub_scale", self.scrub_scale)?;
        unit("loop_from", self.loop_from)?;
        unit("loop_to", self.loop_to)?;

        if !self.initial_spring_velocity.is_finite() {
            return Err(crate::Error::Config(format!(
                "refresh.initial_spring_velocity must be finite, got {}",
                self.initial_spring_velocity
            )));
        }
        if !(self.release_cap.is_finite() && self.release_cap > 0.0) {
            return Err(crate::Error::Config(format!(
                "refresh.release_cap must be positive, got {}",
                self.release_cap
            )));
        }
        if self.loop_from >= self.loop_to {
            return Err(crate::Error::Config(format!(
                "refresh.loop_from ({}) must be below loop_to ({})",
                self.loop_from, self.loop_to
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Tick rate in milliseconds when idle
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Frame rate while anything is animating
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
    /// Indicator height in rows
    #[serde(default = "default_indicator_height")]
    pub indicator_height: u16,
    /// Number of list rows loaded per refresh
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Simulated latency of the refresh action
    #[serde(default = "default_refresh_duration")]
    pub refresh_duration_ms: u64,
    /// Duration of animated programmatic scrolls
    #[serde(default = "default_scroll_animation")]
    pub scroll_animation_ms: u64,
    /// Fraction of the drag applied while pulled past the top edge
    #[serde(default = "default_rubber_band_resistance")]
    pub rubber_band_resistance: f64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            animation_fps: default_animation_fps(),
            indicator_height: default_indicator_height(),
            page_size: default_page_size(),
            refresh_duration_ms: default_refresh_duration(),
            scroll_animation_ms: default_scroll_animation(),
            rubber_band_resistance: default_rubber_band_resistance(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pullrefresh")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_finish_duration() -> u64 {
    1000
}

fn default_spring_damping() -> f64 {
    0.4
}

fn default_spring_velocity() -> f64 {
    0.8
}

fn default_loading_duration() -> u64 {
    300
}

fn default_start_delay() -> u64 {
    270 // outlasts the programmatic scroll animation
}

fn default_release_cap() -> f64 {
    1000.0
}

fn default_fade_duration() -> u64 {
    100
}

fn default_visibility_threshold() -> f64 {
    0.05
}

fn default_scrub_scale() -> f64 {
    0.22
}

fn default_loop_from() -> f64 {
    0.2
}

fn default_loop_to() -> f64 {
    1.0
}

fn default_tick_rate() -> u64 {
    100
}

fn default_animation_fps() -> u32 {
    60
}

fn default_indicator_height() -> u16 {
    3
}

fn default_page_size() -> usize {
    20
}

fn default_refresh_duration() -> u64 {
    3000
}

fn default_scroll_animation() -> u64 {
    250
}

fn default_rubber_band_resistance() -> f64 {
    0.5
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
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate a TOML document
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))?;
        config.refresh.validate()?;
        Ok(config)
    }

    /// Save configuration to file
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
    /// Always uses ~/.config/pullrefresh/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("pullrefresh")
            .join("config.toml")
    }

    /// Get the log file path used while the TUI owns the terminal
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("pullrefresh.log")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }
}
