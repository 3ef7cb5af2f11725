pub mod config_loader;
pub mod template;
pub mod trainer;

pub use config_loader::{load_train_config, parse_joint_line, TrainConfigReport, TrainingConfigEntry};
pub use template::{KeyPostureDetector, KeyPostureTrainer, PostureTemplate};
pub use trainer::{AlgorithmMode, GestureDetector, TemplateTrainer, TrainSettings};
