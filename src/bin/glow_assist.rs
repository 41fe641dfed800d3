use clap::Parser;
use glow_assist::api::{AssistError, AssistSession};
use glow_assist::core::config::AssistConfig;
use glow_assist::core::desktop::{EnigoClicker, XcapCapture};
use glow_assist::core::runtime::{FixedRegionSelector, Selection};
use log::info;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(version, about = "Clicks the glowing square marker inside a screen region", long_about = None)]
struct Cli {
    /// JSON5 config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Screen region as x,y,width,height
    #[arg(long, value_parser = parse_region)]
    region: Option<Selection>,
}

fn parse_region(value: &str) -> Result<Selection, String> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    let [x, y, w, h] = parts.as_slice() else {
        return Err(format!("expected x,y,width,height, got '{}'", value));
    };
    let parse_i = |s: &str| s.parse::<i32>().map_err(|e| format!("'{}': {}", s, e));
    let parse_u = |s: &str| s.parse::<u32>().map_err(|e| format!("'{}': {}", s, e));
    let selection = Selection::new(parse_i(x)?, parse_i(y)?, parse_u(w)?, parse_u(h)?);
    if selection.width == 0 || selection.height == 0 {
        return Err("region must not be empty".to_string());
    }
    Ok(selection)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    glow_assist::init_logging();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AssistConfig::load(path)?,
        None => AssistConfig::default(),
    };

    let mut selector = FixedRegionSelector(cli.region);
    let capture = XcapCapture::primary()?;
    let clicker = EnigoClicker::new()?;

    let mut session = match AssistSession::start(
        &config,
        &mut selector,
        Box::new(capture),
        Box::new(clicker),
    ) {
        Ok(session) => session,
        Err(AssistError::NoRegion) => {
            info!("No region selected, exiting");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let stop_flag = Arc::new(AtomicBool::new(false));
    let stop_flag_clone = stop_flag.clone();
    ctrlc::set_handler(move || {
        stop_flag_clone.store(true, Ordering::SeqCst);
    })?;

    info!("👀 Monitoring, press Ctrl+C to exit");
    while !stop_flag.load(Ordering::SeqCst) {
        std::thread::sleep(Duration::from_millis(100));
    }

    info!("Exiting...");
    session.shutdown();
    Ok(())
}
