use std::fs;

use chrono::Local;
use log::{error, info, warn};

use crate::app::app_core::TrainManager;
use crate::app::marker::KeyframeMarker;
use crate::types::{MarkerInput, SaveResult};
use crate::utils::{timestamped_file_name, with_suffix};

pub struct MarkerHandler;

impl MarkerHandler {
    pub fn init(app: &mut TrainManager) {
        let cfg = app.config.get_config();
        let state = &mut app.state;

        state.marker.file_input = state.session.file_name.clone();
        state.marker.marker.init(&mut state.session);

        let opened = if state.session.recording.is_empty() {
            "Skeleton file not opened"
        } else {
            "Skeleton data already exist"
        };
        state.marker.status = format!(
            "{}. Enter the file name you want to open ({}/*{}) or save ({}/*{}) in the text field",
            opened,
            cfg.paths.skeleton_root,
            cfg.files.skeleton_suffix,
            cfg.paths.skeleton_root,
            cfg.files.keyframe_suffix
        );
    }

    /// Replaces the recording with the named skeleton or keyframe file.
    pub fn open(app: &mut TrainManager) {
        let cfg = app.config.get_config();
        let state = &mut app.state;

        let input = state.marker.file_input.clone();
        if input.is_empty() {
            state.marker.status = "Please enter the file name".to_string();
            return;
        }

        let file_name = if input.ends_with(&cfg.files.keyframe_suffix) {
            input.clone()
        } else {
            with_suffix(&input, &cfg.files.skeleton_suffix)
        };

        match state.session.recording.load_file_new(cfg.skeleton_path(&file_name)) {
            Ok(_) => {
                state.marker.status = format!("{}: imported", file_name);
                state.marker.marker.go_to(&mut state.session, 0);
            }
            Err(e) => {
                error!("Failed to import {}: {}", file_name, e);
                state.marker.status = format!("{}: import error", file_name);
            }
        }
        state.session.file_name = input;
    }

    /// Saves the recording, tags included, as a keyframe file. Existing files are overwritten.
    pub fn save(app: &mut TrainManager) {
        let cfg = app.config.get_config();
        let state = &mut app.state;

        if let Err(e) = fs::create_dir_all(cfg.skeleton_dir()) {
            warn!("Failed to create {}: {}", cfg.paths.skeleton_root, e);
        }

        let input = state.marker.file_input.clone();
        let file_name = if input.is_empty() {
            timestamped_file_name("key frame data", &cfg.files.keyframe_suffix, Local::now())
        } else {
            with_suffix(&input, &cfg.files.keyframe_suffix)
        };

        let recording = &state.session.recording;
        match recording.save_file(cfg.skeleton_path(&file_name)) {
            Ok(frames) => {
                let result = SaveResult::new(file_name, frames, recording.tagged_frame_count());
                info!("{}", result.message());
                state.marker.status = result.message();
            }
            Err(e) => {
                error!("Failed to save {}: {}", file_name, e);
                state.marker.status = format!("{}: error occurred when saving", file_name);
            }
        }
        state.session.file_name = input;
    }

    pub fn set_tag_count(app: &mut TrainManager, text: &str) {
        let marker = &mut app.state.marker;
        match marker.marker.set_declared_tag_count(text) {
            Ok(count) => marker.status = format!("Key posture number set to {}", count),
            Err(e) => marker.status = e.to_string(),
        }
    }

    /// Applies one marker input. Inputs are ignored while no frames are loaded.
    pub fn handle_input(app: &mut TrainManager, input: MarkerInput) {
        let state = &mut app.state;
        if state.session.recording.is_empty() {
            return;
        }

        let marker = &mut state.marker.marker;
        let session = &mut state.session;
        let result = match input {
            MarkerInput::Scroll(axis) => {
                marker.scroll(session, axis);
                Ok(())
            }
            MarkerInput::NextKeyFrame => {
                marker.step_next(session);
                Ok(())
            }
            MarkerInput::PrevKeyFrame => {
                marker.step_prev(session);
                Ok(())
            }
            MarkerInput::AssignNextTag => marker.assign_next_tag(session).map(|_| ()),
            MarkerInput::Tag(digit) => marker.assign_explicit_tag(session, digit).map(|_| ()),
            MarkerInput::ClearTag => marker.clear_current_tag(session),
        };

        if let Err(e) = result {
            warn!("Marker input {:?} rejected: {}", input, e);
            state.marker.status = e.to_string();
        }
    }

    pub fn observer_strings(app: &TrainManager) -> (String, String) {
        let state = &app.state;
        let recording = &state.session.recording;
        let data = if recording.is_empty() {
            "Joint info\n".to_string()
        } else {
            state.marker.marker.frame_info(recording)
        };
        (data, KeyframeMarker::keyframe_summary(recording))
    }
}
