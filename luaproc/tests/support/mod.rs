#![allow(dead_code)]

use std::cell::RefCell;
use std::env;
use std::io::{self, Write};
use std::rc::Rc;

use luaproc::prelude::*;

pub fn gpu_tests_enabled() -> bool {
    matches!(
        env::var("LUAPROC_RUN_GPU_TESTS")
            .unwrap_or_default()
            .to_ascii_lowercase()
            .as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// `print` destination that the test can read back.
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub struct Harness {
    pub host: ScriptHost,
    pub probe: HeadlessProbe,
    pub output: SharedBuffer,
}

impl Harness {
    /// Host on a headless backend with `source` already loaded.
    pub fn new(source: &str) -> HostResult<Self> {
        let backend = HeadlessBackend::new();
        let probe = backend.probe();
        let output = SharedBuffer::default();
        let host = ScriptHost::new(Box::new(backend))?
            .with_output(Box::new(output.clone()));
        host.load_source(source, "test.lua")?;

        Ok(Self {
            host,
            probe,
            output,
        })
    }

    /// Runs setup and then `frames` draw passes.
    pub fn run(&mut self, frames: u64) -> HostResult<()> {
        self.host.setup()?;
        for _ in 0..frames {
            self.host.draw_pass()?;
        }
        Ok(())
    }

    /// Commands recorded inside drawing blocks, without frame bookkeeping.
    pub fn drawn(&self) -> Vec<DrawCommand> {
        self.probe
            .commands()
            .into_iter()
            .filter(|command| {
                !matches!(
                    command,
                    DrawCommand::CreateSurface { .. }
                        | DrawCommand::BeginFrame { .. }
                        | DrawCommand::EndFrame
                        | DrawCommand::Begin2d { .. }
                        | DrawCommand::End2d
                        | DrawCommand::Begin3d { .. }
                        | DrawCommand::End3d
                )
            })
            .collect()
    }

    pub fn clears(&self) -> Vec<Color> {
        self.probe
            .commands()
            .into_iter()
            .filter_map(|command| match command {
                DrawCommand::BeginFrame { clear } => Some(clear),
                _ => None,
            })
            .collect()
    }
}

/// Setup that opens a 640x360 surface and a `draw` with the given body.
pub fn sketch(setup: &str, draw: &str) -> String {
    format!(
        "function setup()\n  size(640, 360)\n{}\nend\n\nfunction draw()\n{}\nend\n",
        setup, draw
    )
}

pub fn sketch_3d(setup: &str, draw: &str) -> String {
    format!(
        "function setup()\n  size(640, 360, P3D)\n{}\nend\n\nfunction draw()\n{}\nend\n",
        setup, draw
    )
}
