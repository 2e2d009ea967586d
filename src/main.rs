#![windows_subsystem = "windows"]

use clap::Parser;
use eframe::egui;

use maskcanvas::app::MaskCanvasApp;
use maskcanvas::config::{AppConfig, CliArgs};
use maskcanvas::remote::RemoteClient;
use maskcanvas::{log_err, log_info, logger};

fn main() -> std::process::ExitCode {
    let args = CliArgs::parse();

    // Session log, truncated at each launch
    match logger::init(&args.log_dir()) {
        Ok(path) => log_info!("Logging to {}", path.display()),
        Err(e) => eprintln!("warning: session log unavailable: {}", e),
    }

    let config = match AppConfig::from_args(args) {
        Ok(config) => config,
        Err(e) => {
            log_err!("{}", e);
            eprintln!("error: {}", e);
            return std::process::ExitCode::FAILURE;
        }
    };
    let client = match RemoteClient::new(config.remote.clone()) {
        Ok(client) => client,
        Err(e) => {
            log_err!("{}", e);
            eprintln!("error: {}", e);
            return std::process::ExitCode::FAILURE;
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 1000.0])
            .with_min_inner_size([1000.0, 700.0])
            .with_title("Mask Drawing App")
            .with_drag_and_drop(true),
        ..Default::default()
    };

    let result = eframe::run_native(
        "Mask Drawing App",
        options,
        Box::new(move |cc| Box::new(MaskCanvasApp::new(cc, config, client))),
    );
    match result {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            log_err!("eframe exited with error: {}", e);
            std::process::ExitCode::FAILURE
        }
    }
}
