use std::fs::{self, File};
use std::io::{BufReader, BufWriter};

use chrono::Local;
use log::{error, info, warn};

use crate::app::app_core::TrainManager;
use crate::training::load_train_config;
use crate::utils::{timestamped_file_name, with_suffix};

pub struct TrainerHandler;

impl TrainerHandler {
    pub fn init(app: &mut TrainManager) {
        let cfg = app.config.get_config();
        let state = &mut app.state;

        state.trainer.gesture_input = state.session.file_name.clone();
        state.trainer.status = format!(
            "Training config not loaded. Enter the name of the gesture you want to load (in {}) ",
            cfg.train_config_path().display()
        );
    }

    /// Loads the gesture's block from the training config into the session recording.
    pub fn load_config(app: &mut TrainManager) {
        let cfg = app.config.get_config();
        let state = &mut app.state;

        let gesture = state.trainer.gesture_input.clone();
        if gesture.is_empty() {
            state.trainer.status = "Please enter the name of the gesture".to_string();
            return;
        }

        let result = File::open(cfg.train_config_path())
            .map_err(Into::into)
            .and_then(|file| {
                load_train_config(
                    BufReader::new(file),
                    &gesture,
                    &cfg.files.keyframe_suffix,
                    &mut state.session.recording,
                    |name| cfg.skeleton_path(name),
                )
            });

        match result {
            Ok(report) => {
                state.trainer.settings.apply(&report.entry);
                state
                    .trainer
                    .events
                    .extend(report.events.iter().map(|e| e.message()));
                state.trainer.status = format!("{} key frames loaded for {}", report.total_tagged, gesture);
                info!(
                    "Training config for {} loaded: {} key frames, {} of {} files failed",
                    gesture,
                    report.total_tagged,
                    report.failed_files(),
                    report.events.len()
                );
            }
            Err(e) => {
                error!("Failed to load training config for {}: {}", gesture, e);
                state.trainer.status = format!("{}: error occurred when loading training config", gesture);
            }
        }
        state.session.file_name = gesture;
    }

    /// Trains the gesture from the loaded key frames and writes its template file.
    pub fn train_and_save(app: &mut TrainManager) {
        let cfg = app.config.get_config();
        let state = &mut app.state;
        let gesture = state.trainer.gesture_input.clone();

        if state.session.recording.tagged_frame_count() == 0 {
            state.trainer.status = "Please load skeleton data with key frames before training.".to_string();
            return;
        }

        let detector = match app.trainer.train(&gesture, &state.session.recording, &state.trainer.settings) {
            Ok(detector) => detector,
            Err(e) => {
                error!("Training {} failed: {}", gesture, e);
                state.trainer.status = format!("{}: error occurred when training: {}", gesture, e);
                return;
            }
        };

        if let Err(e) = fs::create_dir_all(cfg.template_dir()) {
            warn!("Failed to create {}: {}", cfg.paths.template_root, e);
        }

        let suffix = &cfg.files.template_suffix;
        let mut file_name = with_suffix(&gesture, suffix);
        if !state.trainer.overwrite && cfg.template_path(&file_name).exists() {
            file_name = timestamped_file_name("gesture template", suffix, Local::now());
        }
        let path = cfg.template_path(&file_name);
        let verb = if state.trainer.overwrite && path.exists() {
            "overwritten"
        } else {
            "saved"
        };

        let written = File::create(&path)
            .map_err(Into::into)
            .and_then(|file| detector.save_to_file(&mut BufWriter::new(file)));
        match written {
            Ok(()) => {
                info!("Template {} written to {}", detector.name(), path.display());
                state.trainer.status = format!(
                    "The gesture template has been trained and {} to {}",
                    verb, file_name
                );
            }
            Err(e) => {
                error!("Failed to save template {}: {}", file_name, e);
                state.trainer.status = format!("{}: error occurred when saving template", file_name);
            }
        }
        state.session.file_name = gesture;
    }

    /// How the training config and the trained templates are laid out on disk
    pub fn page_help(app: &TrainManager) -> String {
        let cfg = app.config.get_config();
        format!(
            "The training config file is {}. Check the file for configuration methods. \
             The trained gesture template is a {} file with the same file name in {}. \
             To use the template, edit {}.",
            cfg.train_config_path().display(),
            cfg.files.template_suffix,
            cfg.template_dir().display(),
            cfg.gesture_template_list_path().display()
        )
    }

    pub fn observer_strings(app: &TrainManager) -> (String, String) {
        let events = app
            .state
            .trainer
            .events
            .iter()
            .map(|line| format!("{}\n", line))
            .collect();
        (Self::page_help(app), events)
    }
}
