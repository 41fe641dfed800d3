//! 运行配置（JSON5）

use crate::core::vision::{AnalysisConfig, ColorRange, SizeWindow};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config parse error: {0}")]
    Parse(String),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AssistConfig {
    pub target_fps: u32,
    /// 分析窗口（环形缓冲区容量）
    pub buffer_size: usize,
    /// 每秒最多点击次数
    pub output_rate: u32,
    pub region_tolerance: u32,
    pub analysis_idle_ms: u64,
    pub analysis: AnalysisSection,
    pub debug: DebugSection,
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            target_fps: 20,
            buffer_size: 7,
            output_rate: 5,
            region_tolerance: 20,
            analysis_idle_ms: 5,
            analysis: AnalysisSection::default(),
            debug: DebugSection::default(),
        }
    }
}

/// 颜色阈值按 B,G,R 顺序
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalysisSection {
    pub lower_bound: [u8; 3],
    pub upper_bound: [u8; 3],
    pub min_width: u32,
    pub max_width: u32,
    pub min_height: u32,
    pub max_height: u32,
    pub aspect_ratio_range: [f64; 2],
    pub epsilon_factor: f64,
    pub min_solidity: f64,
}

impl Default for AnalysisSection {
    fn default() -> Self {
        let defaults = AnalysisConfig::default();
        Self {
            lower_bound: defaults.color_range.lower,
            upper_bound: defaults.color_range.upper,
            min_width: defaults.size_window.min_width,
            max_width: defaults.size_window.max_width,
            min_height: defaults.size_window.min_height,
            max_height: defaults.size_window.max_height,
            aspect_ratio_range: [defaults.aspect_ratio_range.0, defaults.aspect_ratio_range.1],
            epsilon_factor: defaults.epsilon_factor,
            min_solidity: defaults.min_solidity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DebugSection {
    pub enabled: bool,
    pub output_dir: PathBuf,
}

impl Default for DebugSection {
    fn default() -> Self {
        Self {
            enabled: false,
            output_dir: PathBuf::from("output"),
        }
    }
}

impl AssistConfig {
    pub fn from_json5_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = json5::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_json5_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_fps == 0 {
            return Err(ConfigError::Invalid("target_fps must be > 0".to_string()));
        }
        if self.buffer_size == 0 {
            return Err(ConfigError::Invalid("buffer_size must be > 0".to_string()));
        }
        if self.output_rate == 0 {
            return Err(ConfigError::Invalid("output_rate must be > 0".to_string()));
        }

        let a = &self.analysis;
        if a.min_width > a.max_width || a.min_height > a.max_height {
            return Err(ConfigError::Invalid(format!(
                "size window is empty: width {}..={}, height {}..={}",
                a.min_width, a.max_width, a.min_height, a.max_height
            )));
        }
        let [low, high] = a.aspect_ratio_range;
        if !(low <= high) {
            return Err(ConfigError::Invalid(format!(
                "aspect_ratio_range is empty: [{}, {}]",
                low, high
            )));
        }
        if a.lower_bound.iter().zip(&a.upper_bound).any(|(l, u)| l > u) {
            return Err(ConfigError::Invalid(format!(
                "lower_bound {:?} exceeds upper_bound {:?}",
                a.lower_bound, a.upper_bound
            )));
        }
        if !(a.epsilon_factor > 0.0) {
            return Err(ConfigError::Invalid("epsilon_factor must be > 0".to_string()));
        }
        if !(0.0..=1.0).contains(&a.min_solidity) {
            return Err(ConfigError::Invalid("min_solidity must be within [0, 1]".to_string()));
        }
        Ok(())
    }

    pub fn analysis_config(&self) -> AnalysisConfig {
        let a = &self.analysis;
        AnalysisConfig {
            color_range: ColorRange::new(a.lower_bound, a.upper_bound),
            size_window: SizeWindow {
                min_width: a.min_width,
                max_width: a.max_width,
                min_height: a.min_height,
                max_height: a.max_height,
            },
            aspect_ratio_range: (a.aspect_ratio_range[0], a.aspect_ratio_range[1]),
            epsilon_factor: a.epsilon_factor,
            min_solidity: a.min_solidity,
        }
    }

    pub fn analysis_idle(&self) -> Duration {
        Duration::from_millis(self.analysis_idle_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_analysis_defaults() {
        let config = AssistConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.analysis_config(), AnalysisConfig::default());
        assert_eq!(config.analysis_idle(), Duration::from_millis(5));
    }

    #[test]
    fn test_partial_json5_keeps_defaults() {
        let config = AssistConfig::from_json5_str(
            r#"{
                // 更高的采集帧率
                target_fps: 30,
                analysis: { min_width: 32, aspect_ratio_range: [0.9, 1.1] },
                debug: { enabled: true, output_dir: 'dumps', },
            }"#,
        )
        .unwrap();

        assert_eq!(config.target_fps, 30);
        assert_eq!(config.buffer_size, 7);
        assert_eq!(config.analysis.min_width, 32);
        assert_eq!(config.analysis.max_width, 128);
        assert_eq!(config.analysis.aspect_ratio_range, [0.9, 1.1]);
        assert!(config.debug.enabled);
        assert_eq!(config.debug.output_dir, PathBuf::from("dumps"));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let cases = [
            "{ target_fps: 0 }",
            "{ buffer_size: 0 }",
            "{ output_rate: 0 }",
            "{ analysis: { min_width: 200 } }",
            "{ analysis: { aspect_ratio_range: [1.5, 1.0] } }",
            "{ analysis: { lower_bound: [255, 0, 0], upper_bound: [100, 255, 255] } }",
            "{ analysis: { epsilon_factor: 0 } }",
            "{ analysis: { min_solidity: 1.5 } }",
        ];
        for case in cases {
            assert!(
                matches!(AssistConfig::from_json5_str(case), Err(ConfigError::Invalid(_))),
                "accepted: {}",
                case
            );
        }
    }

    #[test]
    fn test_malformed_input_is_parse_error() {
        assert!(matches!(
            AssistConfig::from_json5_str("{ target_fps: "),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("glow_assist.json5");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "{{ output_rate: 2, region_tolerance: 0 }}").unwrap();

        let config = AssistConfig::load(&path).unwrap();
        assert_eq!(config.output_rate, 2);
        assert_eq!(config.region_tolerance, 0);

        assert!(matches!(
            AssistConfig::load(dir.path().join("missing.json5")),
            Err(ConfigError::Io(_))
        ));
    }
}
