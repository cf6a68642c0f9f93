use clap::{Args, ValueEnum};
use log::debug;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

pub type Error = Box<dyn std::error::Error + Send + Sync + 'static>;
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Which half of a day's puzzle to answer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum Part {
    #[value(name = "1")]
    One,
    #[value(name = "2")]
    Two,
}

/// Arguments shared by every day.
#[derive(Debug, Clone, Args)]
pub struct Common {
    /// Puzzle input file; reads standard input when omitted or `-`
    pub input: Option<PathBuf>,

    /// Which part of the puzzle to answer
    #[arg(long, value_enum, default_value = "2")]
    pub part: Part,
}

impl Common {
    pub fn read_input(&self) -> Result<String> {
        let input = match &self.input {
            Some(path) if path.as_os_str() != "-" => fs::read_to_string(path)
                .map_err(|e| format!("Unable to read {}: {}", path.display(), e))?,
            _ => read_from(io::stdin().lock())?,
        };

        debug!("Read {} bytes of input", input.len());
        Ok(input)
    }
}

pub fn read_from(mut reader: impl Read) -> Result<String> {
    let mut s = String::new();
    reader.read_to_string(&mut s)?;
    Ok(s)
}

/// Logging is configured through `RUST_LOG`; warnings only by default.
pub fn init_logging() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .try_init()?;
    Ok(())
}
