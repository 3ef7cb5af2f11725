use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration.
/// Every section has defaults, so a config file only needs the keys it overrides.

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub paths: PathConfig,
    pub files: FileConfig,
    pub marker: MarkerConfig,
    pub input: InputConfig,
}

/// Where recordings, the training config and templates live
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    pub skeleton_root: String,
    pub template_root: String,
    pub train_config_list: String,
    pub gesture_template_list: String,
}

/// File name suffixes and the initial text of the file name field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub skeleton_suffix: String,
    pub keyframe_suffix: String,
    pub template_suffix: String,
    pub default_file_name: String,
}

/// Keyframe marker settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    /// Frames moved per unit of scroll axis. The smallest wheel tick is about 0.1.
    pub wheel_speed: f32,
}

/// Terminal front end settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub command_channel_capacity: usize,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            skeleton_root: "SkeletonData".to_string(),
            template_root: "GestureTemplates".to_string(),
            train_config_list: "TrainConfigList.txt".to_string(),
            gesture_template_list: "GestureTemplateList.txt".to_string(),
        }
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            skeleton_suffix: ".skel".to_string(),
            keyframe_suffix: ".kf".to_string(),
            template_suffix: ".tmpl".to_string(),
            default_file_name: String::new(),
        }
    }
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self { wheel_speed: 10.0 }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            command_channel_capacity: 64,
        }
    }
}

impl AppConfig {
    /// Loads and validates a TOML config file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::IoError)?;

        let config: AppConfig = toml::from_str(&content).map_err(ConfigError::ParseError)?;

        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(ConfigError::SerializeError)?;

        std::fs::write(path, content).map_err(ConfigError::IoError)?;

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let suffixes = [
            &self.files.skeleton_suffix,
            &self.files.keyframe_suffix,
            &self.files.template_suffix,
        ];
        if suffixes.iter().any(|s| s.is_empty()) {
            return Err(ConfigError::ValidationError("File suffixes must not be empty".to_string()));
        }

        if self.paths.train_config_list.is_empty() {
            return Err(ConfigError::ValidationError("Train config list name must not be empty".to_string()));
        }

        if !(self.marker.wheel_speed > 0.0) {
            return Err(ConfigError::ValidationError("Wheel speed must be positive".to_string()));
        }

        if self.input.command_channel_capacity == 0 {
            return Err(ConfigError::ValidationError("Command channel capacity must be positive".to_string()));
        }

        Ok(())
    }

    pub fn skeleton_dir(&self) -> PathBuf {
        PathBuf::from(&self.paths.skeleton_root)
    }

    pub fn template_dir(&self) -> PathBuf {
        PathBuf::from(&self.paths.template_root)
    }

    pub fn skeleton_path(&self, file_name: &str) -> PathBuf {
        self.skeleton_dir().join(file_name)
    }

    pub fn template_path(&self, file_name: &str) -> PathBuf {
        self.template_dir().join(file_name)
    }

    /// The training config file shared by all gestures
    pub fn train_config_path(&self) -> PathBuf {
        self.skeleton_path(&self.paths.train_config_list)
    }

    /// List of templates a gesture recognizer loads
    pub fn gesture_template_list_path(&self) -> PathBuf {
        self.template_path(&self.paths.gesture_template_list)
    }
}

/// Config errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(toml::de::Error),
    #[error("Serialize error: {0}")]
    SerializeError(toml::ser::Error),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Holds the active config and the file it came from
pub struct ConfigManager {
    config: AppConfig,
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            config_path: None,
        }
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config,
            config_path: None,
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = AppConfig::load_from_file(&path)?;
        Ok(Self {
            config,
            config_path: Some(path.as_ref().to_path_buf()),
        })
    }

    pub fn get_config(&self) -> &AppConfig {
        &self.config
    }

    pub fn get_config_mut(&mut self) -> &mut AppConfig {
        &mut self.config
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        self.config.save_to_file(path)
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
