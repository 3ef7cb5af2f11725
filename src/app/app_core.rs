use log::info;

use crate::config::ConfigManager;
use crate::training::{KeyPostureTrainer, TemplateTrainer};
use super::handlers::{MarkerHandler, TrainerHandler};
use super::state::{AppState, Stage};

/// Owns the session and switches between the marker and trainer pages.
pub struct TrainManager {
    pub state: AppState,

    pub config: ConfigManager,

    pub trainer: Box<dyn TemplateTrainer>,
}

impl TrainManager {
    /// Starts on the keyframe marker page with the built-in trainer.
    pub fn new(config: ConfigManager) -> Self {
        Self::with_trainer(config, Box::new(KeyPostureTrainer::new()))
    }

    pub fn with_trainer(config: ConfigManager, trainer: Box<dyn TemplateTrainer>) -> Self {
        let cfg = config.get_config();
        let state = AppState::new(&cfg.files.default_file_name, cfg.marker.wheel_speed);

        let mut app = TrainManager {
            state,
            config,
            trainer,
        };
        app.enter_stage(Stage::Mark);

        info!("Train manager started on page \"{}\"", Stage::Mark.label());
        app
    }

    pub fn stage(&self) -> Stage {
        self.state.stage
    }

    /// Switches page. Selecting the active page does nothing.
    pub fn switch_stage(&mut self, stage: Stage) {
        if self.state.stage == stage {
            return;
        }
        self.enter_stage(stage);
        info!("Switched to page \"{}\"", stage.label());
    }

    fn enter_stage(&mut self, stage: Stage) {
        self.state.stage = stage;
        self.state.session.pose.reset();
        match stage {
            Stage::Mark => MarkerHandler::init(self),
            Stage::Train => TrainerHandler::init(self),
        }
    }

    /// Text for the observer panel: (data, frame list or event log)
    pub fn observer_strings(&self) -> (String, String) {
        match self.state.stage {
            Stage::Mark => MarkerHandler::observer_strings(self),
            Stage::Train => TrainerHandler::observer_strings(self),
        }
    }
}
