use crate::{
    error::{Error, Result},
    job::Job,
    options::{EqualizeOptions, NormalizeOptions},
};
use std::path::{Path, PathBuf};

use structopt::StructOpt;

#[derive(StructOpt)]
#[structopt(name = "velnorm", about = "Normalize or equalize MIDI note velocities")]
pub struct Cli {
    #[structopt(subcommand)]
    pub command: Command,
}

#[derive(StructOpt)]
pub enum Command {
    /// Scale all velocities so that the loudest note reaches the target
    Normalize {
        #[structopt(parse(from_os_str), required = true)]
        inputs: Vec<PathBuf>,
        /// Output file name, only with a single input [default: <input>_normalized.mid]
        #[structopt(short = "o", long = "output", parse(from_os_str))]
        output: Option<PathBuf>,
        #[structopt(short = "t", long = "target", default_value = "127")]
        target: u8,
        /// Let muted tracks (CC7 never above 0) set the maximum velocity too
        #[structopt(long = "include-muted")]
        include_muted: bool,
        /// Notes at or below this velocity never set the maximum
        #[structopt(long = "threshold", default_value = "0")]
        threshold: u8,
    },
    /// Scale all velocities to a percentage
    Equalize {
        #[structopt(parse(from_os_str), required = true)]
        inputs: Vec<PathBuf>,
        /// Output file name, only with a single input [default: <input>_equalized.mid]
        #[structopt(short = "o", long = "output", parse(from_os_str))]
        output: Option<PathBuf>,
        #[structopt(short = "l", long = "level", default_value = "80")]
        level: u32,
    },
}

fn check_single_output(inputs: &[PathBuf], output: Option<&Path>) -> Result<()> {
    if output.is_some() && inputs.len() > 1 {
        return Err(Error::InvalidOutputPath(
            "-o/--output can only be used with a single input file".to_string(),
        ));
    }
    Ok(())
}

impl Cli {
    /// One job per input file
    pub fn into_jobs(self) -> Result<Vec<Job>> {
        match self.command {
            Command::Normalize {
                inputs,
                output,
                target,
                include_muted,
                threshold,
            } => {
                check_single_output(&inputs, output.as_deref())?;
                let options = NormalizeOptions {
                    target_velocity: target,
                    ignore_muted: !include_muted,
                    velocity_threshold: threshold,
                };
                inputs
                    .into_iter()
                    .map(|input| Job::normalize(input, output.clone(), options))
                    .collect()
            }
            Command::Equalize {
                inputs,
                output,
                level,
            } => {
                check_single_output(&inputs, output.as_deref())?;
                let options = EqualizeOptions { level };
                inputs
                    .into_iter()
                    .map(|input| Job::equalize(input, output.clone(), options))
                    .collect()
            }
        }
    }
}

pub fn parse_args() -> Cli {
    Cli::from_args()
}
