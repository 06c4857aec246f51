use clap::Parser;
use std::{
    env, fs,
    io::{ErrorKind, Read, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

/// Records the current process ID in a PID file, then reads it back
///
/// The PID file is opened in write-create mode, the process ID is written
/// through the scoped handle, and the scope is closed. A second scope in
/// read mode then reads the recorded value back and prints it, the way a
/// management tool would inspect a running daemon.
#[derive(Debug, Parser)]
#[command(max_term_width = 80)]
struct Cli {
    /// Path to the PID file
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = Self::default_pidfile().into_os_string(),
    )]
    pidfile: PathBuf,

    /// Keep the PID file around instead of removing it on exit
    #[arg(short, long)]
    keep: bool,
}

impl Cli {
    fn default_pidfile() -> PathBuf {
        let mut path = env::temp_dir();
        path.push(concat!(env!("CARGO_PKG_NAME"), ".pid"));
        path
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let code = match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    };

    if !cli.keep {
        remove_file(&cli.pidfile);
    }

    code
}

fn run(cli: &Cli) -> Result<(), String> {
    let pid = std::process::id();

    record(&cli.pidfile, pid)?;

    let recorded = inspect(&cli.pidfile)?;
    println!("read back PID {recorded}");

    if recorded.trim() != pid.to_string() {
        return Err(format!("expected PID {pid}; found '{recorded}'"));
    }

    Ok(())
}

fn record(path: &Path, pid: u32) -> Result<(), String> {
    let mut pidfile = pidscope::pidfile(path, "write-create")
        .map_err(|err| err.to_string())?;

    let handle = pidfile.enter().map_err(|err| err.to_string())?;

    write!(handle, "{pid}")
        .map_err(|err| format!("failed to write PID: {err}"))?;

    pidfile.exit();
    println!("recorded: {pidfile}");

    Ok(())
}

fn inspect(path: &Path) -> Result<String, String> {
    let mut pidfile =
        pidscope::pidfile(path, "read").map_err(|err| err.to_string())?;

    let handle = pidfile.enter().map_err(|err| err.to_string())?;

    let mut content = String::new();
    handle
        .read_to_string(&mut content)
        .map_err(|err| format!("failed to read PID: {err}"))?;

    pidfile.exit();

    Ok(content)
}

fn remove_file(path: &Path) {
    if let Err(err) = fs::remove_file(path)
        && err.kind() != ErrorKind::NotFound
    {
        eprintln!("failed to remove file '{}': {err}", path.display());
    }
}
