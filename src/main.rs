use clap::Parser;
use serial_calc::config::{Config, ConfigLoader};
use serial_calc::{logging, port, AppError, AppResult, Session};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

// Command-line arguments
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Terminal client for a serial-line calculator running on a microcontroller.",
    long_about = "Sends arithmetic expressions such as '54 * 22' to the board, waits for the numeric \
                  (or ERR / DIV0) answer while ignoring boot and debug chatter, and appends every \
                  successful exchange to a results log. Type 'exit' or 'quit' to leave."
)]
struct Args {
    /// Configuration file. Defaults to the standard search path.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Serial device, e.g. /dev/ttyACM0 or COM3.
    #[arg(short, long)]
    port: Option<String>,

    /// Baud rate (the link is always 8N1).
    #[arg(short, long)]
    baud: Option<u32>,

    /// Milliseconds to wait for a result line.
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// File that successful exchanges are appended to.
    #[arg(long)]
    results_log: Option<PathBuf>,

    /// Diagnostic log level (overridden by RUST_LOG).
    #[arg(long)]
    log_level: Option<String>,

    /// List the serial ports on this machine and exit.
    #[arg(long)]
    list_ports: bool,
}

impl Args {
    fn apply(&self, config: &mut Config) {
        if let Some(port) = &self.port {
            config.serial.port = port.clone();
        }
        if let Some(baud) = self.baud {
            config.serial.baud_rate = baud;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.protocol.response_timeout_ms = timeout_ms;
        }
        if let Some(path) = &self.results_log {
            config.session.results_log = path.clone();
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
    }
}

fn load_config(args: &Args) -> AppResult<Config> {
    let loader = match &args.config {
        Some(path) => ConfigLoader::load_from(path)?,
        None => ConfigLoader::load()?,
    };
    let mut config = loader.into_config();
    args.apply(&mut config);
    config.validate()?;
    Ok(config)
}

fn print_ports() -> ExitCode {
    match port::list_ports() {
        Ok(ports) if ports.is_empty() => {
            println!("No serial ports detected.");
            ExitCode::SUCCESS
        }
        Ok(ports) => {
            println!("Available serial ports ({}):", ports.len());
            for summary in ports {
                println!("  {summary}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Cannot list serial ports: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> AppResult<()> {
    let mut session = Session::open(config)?;

    println!("Connected to: {}", config.serial.port);
    println!("Enter one calculation per line. Type 'exit' to quit.");

    session.run(io::stdin().lock(), io::stdout(), io::stderr())?;
    Ok(())
}

// What the process was asked to do.
#[derive(Debug)]
enum Command {
    ListPorts,
    Session(Config),
}

impl Command {
    // Port listing never depends on the configuration.
    fn from_args(args: &Args) -> AppResult<Self> {
        if args.list_ports {
            return Ok(Self::ListPorts);
        }
        load_config(args).map(Self::Session)
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match Command::from_args(&args) {
        Ok(Command::ListPorts) => return print_ports(),
        Ok(Command::Session(config)) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    logging::init(&config.logging);

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "session aborted");
            eprintln!("{e}");
            if matches!(e, AppError::PortOpen { .. }) {
                eprintln!("Use --list-ports to see the devices on this machine.");
            }
            ExitCode::FAILURE
        }
    }
}
