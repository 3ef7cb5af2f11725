use log::{debug, info};

use crate::types::Command;
use super::app_core::TrainManager;
use super::handlers::{MarkerHandler, TrainerHandler};
use super::state::Stage;

impl TrainManager {
    /// Processes one command end to end. Returns false once the operator quits.
    ///
    /// Commands that do not belong to the active page are ignored.
    pub fn handle_command(&mut self, command: Command) -> bool {
        debug!("Command {:?} on page \"{}\"", command, self.stage().label());

        match (self.stage(), command) {
            (_, Command::Quit) => {
                info!("Quit requested");
                return false;
            }
            (_, Command::SwitchStage(stage)) => self.switch_stage(stage),
            (_, Command::Help | Command::ShowObserver) => {}

            (Stage::Mark, Command::SetFileName(name)) => self.state.marker.file_input = name,
            (Stage::Mark, Command::SetTagCount(text)) => MarkerHandler::set_tag_count(self, &text),
            (Stage::Mark, Command::Open) => MarkerHandler::open(self),
            (Stage::Mark, Command::Save) => MarkerHandler::save(self),
            (Stage::Mark, Command::Marker(input)) => MarkerHandler::handle_input(self, input),

            (Stage::Train, Command::SetFileName(name)) => self.state.trainer.gesture_input = name,
            (Stage::Train, Command::SetOverwrite(on)) => self.state.trainer.overwrite = on,
            (Stage::Train, Command::Open) => TrainerHandler::load_config(self),
            (Stage::Train, Command::Train) => TrainerHandler::train_and_save(self),

            (stage, other) => debug!("{:?} ignored on page \"{}\"", other, stage.label()),
        }
        true
    }
}
