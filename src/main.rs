use std::env;
use std::io::{self, BufRead};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{bounded, Receiver, Sender};
use dotenv::dotenv;
use log::{error, info, warn};

use gesture_trainer::config::ConfigManager;
use gesture_trainer::logger;
use gesture_trainer::types::{Command, HELP_TEXT};
use gesture_trainer::TrainManager;

const CONFIG_ENV: &str = "GESTURE_TRAINER_CONFIG";

fn main() {
    dotenv().ok();
    logger::init_logger();
    info!("Application starting");

    let config = load_config();
    match config.config_path() {
        Some(path) => info!("Config loaded from {}", path.display()),
        None => info!("Using default config"),
    }
    let capacity = config.get_config().input.command_channel_capacity;

    let (command_sender, command_receiver) = bounded(capacity);
    let shutdown_signal = Arc::new(AtomicBool::new(false));

    let reader_shutdown = Arc::clone(&shutdown_signal);
    let reader_handle = thread::spawn(move || read_commands(command_sender, reader_shutdown));

    let mut app = TrainManager::new(config);
    println!("{}", HELP_TEXT);
    println!("[{}] {}", app.stage().label(), app.state.status());

    run_loop(&mut app, command_receiver);

    info!("Shutting down");
    shutdown_signal.store(true, Ordering::Relaxed);

    // the reader only notices the flag after its next line, so don't wait on an idle stdin
    if reader_handle.is_finished() {
        if let Err(e) = reader_handle.join() {
            error!("Command reader panicked: {:?}", e);
        }
    }
}

fn load_config() -> ConfigManager {
    match env::var(CONFIG_ENV) {
        Ok(path) => match ConfigManager::load_from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to load config {}: {}, using defaults", path, e);
                ConfigManager::new()
            }
        },
        Err(_) => ConfigManager::new(),
    }
}

/// Turns stdin lines into commands. Stops on EOF, shutdown or a closed channel.
fn read_commands(sender: Sender<Command>, shutdown_signal: Arc<AtomicBool>) {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        if shutdown_signal.load(Ordering::Relaxed) {
            break;
        }
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!("Failed to read stdin: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<Command>() {
            Ok(command) => {
                if sender.send(command).is_err() {
                    info!("Command channel closed, reader exiting");
                    break;
                }
            }
            Err(e) => warn!("{}", e),
        }
    }
    // EOF behaves like quit
    let _ = sender.send(Command::Quit);
}

/// One command per tick, each processed to completion before the next.
fn run_loop(app: &mut TrainManager, receiver: Receiver<Command>) {
    while let Ok(command) = receiver.recv() {
        let show_help = command == Command::Help;
        let show_observer = command == Command::ShowObserver;

        if !app.handle_command(command) {
            break;
        }

        if show_help {
            println!("{}", HELP_TEXT);
        }
        if show_observer {
            let (data, list) = app.observer_strings();
            println!("{}\n{}", data, list);
        }
        println!(
            "[{}] {} | {}",
            app.stage().label(),
            app.state.status(),
            app.state.session.get_status_summary()
        );
    }
}
