use std::process::ExitCode;

#[cfg(target_os = "windows")]
use keep_awake::RequestCategory;

#[cfg(target_os = "windows")]
const CATEGORY: RequestCategory = RequestCategory::ExecutionRequired;
#[cfg(target_os = "windows")]
const REASON: &str = "keep-awake";

#[cfg(target_os = "windows")]
fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("Your computer keeps awake until this app is closed.");
    println!("Press any key to exit");

    let mut guard = keep_awake::acquire(CATEGORY, REASON)?;
    log::info!("Holding {CATEGORY:?} power request");

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;

    guard.release()?;
    Ok(())
}

#[cfg(target_os = "windows")]
fn main() -> ExitCode {
    simple_logging::log_to_stderr(log::LevelFilter::Info);
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(not(target_os = "windows"))]
fn main() -> ExitCode {
    eprintln!("keep-awake uses Windows power requests, please run it on Windows");
    ExitCode::FAILURE
}
