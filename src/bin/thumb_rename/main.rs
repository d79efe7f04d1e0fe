use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;

use thumb_rename::ThumbRename;
use thumb_rename::config::{CliOptions, Config};

#[derive(Parser)]
#[command(
    author,
    version,
    name = env!("CARGO_BIN_NAME"),
    about = "Rename episode images to match the video file name"
)]
struct Args {
    /// Optional input directory
    #[arg(value_hint = clap::ValueHint::DirPath, conflicts_with = "path_option")]
    path: Option<PathBuf>,

    /// Input directory
    #[arg(short = 'p', long = "path", name = "path_option", value_name = "PATH", value_hint = clap::ValueHint::DirPath)]
    path_option: Option<PathBuf>,

    /// Only print changes without renaming files
    #[arg(short = 'd', long = "dry-run", visible_alias = "print")]
    dryrun: bool,

    /// Overwrite existing files
    #[arg(short = 'f', long)]
    force: bool,

    /// Ignore files and directories with the given name
    #[arg(short = 'i', long, num_args = 1, action = clap::ArgAction::Append, value_name = "NAME")]
    ignore: Vec<String>,

    /// Generate shell completion
    #[arg(short = 'l', long, name = "SHELL")]
    completion: Option<Shell>,

    /// Print verbose output
    #[arg(short = 'v', long)]
    verbose: bool,
}

impl Args {
    fn options(&self) -> CliOptions {
        CliOptions {
            dryrun: self.dryrun,
            ignore: self.ignore.clone(),
            overwrite: self.force,
            verbose: self.verbose,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(ref shell) = args.completion {
        return thumb_rename::generate_shell_completion(*shell, Args::command(), true, env!("CARGO_BIN_NAME"));
    }

    let path = thumb_rename::resolve_input_path(args.path.as_deref().or(args.path_option.as_deref()))?;
    let config = Config::from_options(args.options())?;
    ThumbRename::new(path, config).run()?;
    Ok(())
}
