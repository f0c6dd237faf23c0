use std::process::ExitCode;

use fmtflow::cli::{self, CliError};
use fmtflow::host::{FileOutcome, HostConfig};

fn main() -> ExitCode {
    fmtflow::host::config::init_dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = cli::parse_args(&args).and_then(|inv| {
                                            let cfg = HostConfig::from_env()?;
                                            cli::run(&inv, &cfg).map(|report| (inv, report))
                                        });
    let (inv, report) = match result {
        Ok(ok) => ok,
        Err(e @ CliError::Usage(_)) => {
            eprintln!("{e}");
            return ExitCode::from(2);
        }
        Err(e) => {
            eprintln!("[fmtflow] {e}");
            return ExitCode::from(3);
        }
    };
    for (path, outcome) in &report.outcomes {
        match outcome {
            FileOutcome::Dirty => println!("needs formatting: {}", path.display()),
            FileOutcome::Formatted => println!("formatted: {}", path.display()),
            FileOutcome::Failed(msg) => eprintln!("failed: {}: {msg}", path.display()),
            _ => {}
        }
    }
    if report.is_success() {
        ExitCode::SUCCESS
    } else {
        log::info!("{:?} finished with problems", inv.mode);
        ExitCode::FAILURE
    }
}
