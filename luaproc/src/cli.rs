use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use log::info;

use crate::backend::{HeadlessBackend, HeadlessProbe, WindowBackend};
use crate::core::error::{HostError, HostResult};
use crate::runtime::ScriptHost;

#[derive(Parser, Debug)]
#[command(name = "luaproc", version, about = "Run a Processing-style Lua sketch")]
pub struct Cli {
    /// Lua file defining `setup()` and `draw()`.
    #[arg(value_name = "SCRIPT")]
    pub scripts: Vec<PathBuf>,

    /// Run against the in-memory backend instead of opening a window.
    #[arg(long, default_value_t = false)]
    pub headless: bool,

    /// Stop after this many draw passes (required with --headless).
    #[arg(long)]
    pub frames: Option<u64>,

    /// Write the headless command log to PATH as JSON.
    #[arg(long, value_name = "PATH", requires = "headless")]
    pub trace: Option<PathBuf>,
}

impl Cli {
    /// The single script path. Zero or several are usage errors.
    pub fn script(&self) -> HostResult<&Path> {
        match self.scripts.as_slice() {
            [] => Err(HostError::Usage("no lua file provided".into())),
            [script] => Ok(script),
            _ => Err(HostError::Usage(
                "more than one lua file was provided".into(),
            )),
        }
    }
}

/// Runs the script named on the command line to completion. Returns the
/// number of draw passes.
pub fn run(cli: &Cli) -> HostResult<u64> {
    let script = cli.script()?;

    if !cli.headless {
        let backend = WindowBackend::new()?;
        let mut host =
            ScriptHost::new(Box::new(backend))?.with_frame_limit(cli.frames);
        host.load_file(script)?;
        return host.run();
    }

    let frames = cli.frames.ok_or_else(|| {
        HostError::Usage("--headless requires --frames".into())
    })?;
    let backend = HeadlessBackend::with_frame_budget(frames);
    let probe = backend.probe();

    let mut host = ScriptHost::new(Box::new(backend))?;
    let result = host.load_file(script).and_then(|_| host.run());

    if let Some(path) = cli.trace.as_deref() {
        write_trace(&probe, path)?;
    }
    result
}

fn write_trace(probe: &HeadlessProbe, path: &Path) -> HostResult<()> {
    let json = probe.to_json().map_err(HostError::backend)?;
    fs::write(path, json).map_err(|err| {
        HostError::backend(format!(
            "failed to write trace '{}': {}",
            path.display(),
            err
        ))
    })?;
    info!("trace written to {}", path.display());
    Ok(())
}
