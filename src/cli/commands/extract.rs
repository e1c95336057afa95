use anyhow::{Context, Result};

use super::super::args::{ExtractArgs, ExtractCommand};
use super::super::exit_status::ExitStatus;
use super::super::report;
use crate::config::{Config, load_config};
use crate::core::OutputSetting;
use crate::pipeline::run_build;

pub fn extract(cmd: ExtractCommand) -> Result<ExitStatus> {
    let args = &cmd.args;
    let start_dir = &args.common.path;

    let loaded = load_config(start_dir)?;
    let root = loaded.root(start_dir).to_path_buf();
    let mut config = loaded.config.clone();
    apply_overrides(&mut config, args);
    config
        .validate()
        .context("Invalid command-line options")?;

    let build = run_build(&config, &root)?;
    report::print(&build, &root, args.common.verbose);

    if build.has_diagnostics() {
        Ok(ExitStatus::Failure)
    } else {
        Ok(ExitStatus::Success)
    }
}

/// Command-line flags take precedence over the config file.
fn apply_overrides(config: &mut Config, args: &ExtractArgs) {
    if let Some(function_name) = &args.function_name {
        config.function_name = function_name.clone();
    }
    if args.mangle {
        config.mangle = true;
    }
    if args.merge {
        config.merge = true;
    }
    match args.output.as_slice() {
        [] => {}
        [path] => config.output = OutputSetting::Path(path.clone()),
        paths => config.output = OutputSetting::Paths(paths.to_vec()),
    }
    if let Some(out_dir) = &args.out_dir {
        config.out_dir = Some(out_dir.clone());
    }
}
