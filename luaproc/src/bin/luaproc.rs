use clap::Parser;
use clap::error::ErrorKind;
use luaproc::cli::{self, Cli};
use luaproc::prelude::*;

fn main() {
    init_logger();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err)
            if matches!(
                err.kind(),
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
            ) =>
        {
            err.exit()
        }
        Err(err) => HostError::Usage(err.to_string()).report_and_exit(),
    };

    match cli::run(&cli) {
        Ok(frames) => debug!("finished after {} frame(s)", frames),
        Err(err) => err.report_and_exit(),
    }
}
