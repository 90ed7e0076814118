use indicatif::{ProgressBar, ProgressStyle};
use thiserror::Error;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// annotation parsing
pub const COMMENT_CHAR: char = '#';
pub const ATTR_SEPARATOR: &str = "; ";
pub const GENE_ID: &str = "gene_id";
pub const GENE_NAME: &str = "gene_name";
pub const GENE_TYPE: &str = "gene_type";

// peakmap matrix layout
pub const META_COLS: usize = 3;
pub const SIDE_COL_PREFIX: &str = "start_";
pub const REPLICATE_SUFFIX: &str = r"_\d+";

// os
#[cfg(not(windows))]
const TICK_SETTINGS: (&str, u64) = ("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ", 80);
#[cfg(windows)]
const TICK_SETTINGS: (&str, u64) = (r"+-x| ", 200);

/// return a pre-configured spinner for passes of unknown length
pub fn get_spinner(msg: &str) -> ProgressBar {
    let spinner_style = ProgressStyle::default_spinner()
        .tick_chars(TICK_SETTINGS.0)
        .template(" {spinner} {msg:<30} {pos} lines ")
        .expect("no template error");

    let spinner = ProgressBar::new_spinner();

    spinner.set_style(spinner_style);
    spinner.enable_steady_tick(Duration::from_millis(TICK_SETTINGS.1));
    spinner.set_message(msg.to_owned());

    spinner
}

/// write a collection of lines to a file as-is
pub fn write_tsv(data: &[String], fname: &Path) -> Result<(), CliError> {
    log::info!("Rows in {}: {:?}. Writing...", fname.display(), data.len());

    let f = File::create(fname)?;
    let mut writer = BufWriter::new(f);

    for line in data.iter() {
        writeln!(writer, "{}", line)?;
    }

    writer.flush()?;
    Ok(())
}

/// argument checker for all tools
pub trait ArgCheck {
    fn check(&self) -> Result<(), CliError> {
        if self.get_inputs().is_empty() {
            let err = "No input files provided".to_string();
            return Err(CliError::InvalidInput(err));
        }
        for input in self.get_inputs() {
            validate(input)?;
        }

        Ok(())
    }

    fn get_inputs(&self) -> Vec<&PathBuf>;
}

/// error handling for CLI
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// argument validation
pub fn validate(arg: &PathBuf) -> Result<(), CliError> {
    if !arg.exists() {
        return Err(CliError::InvalidInput(format!(
            "ERROR: {:?} does not exist",
            arg
        )));
    }

    if !arg.is_file() {
        return Err(CliError::InvalidInput(format!(
            "ERROR: {:?} is not a file",
            arg
        )));
    }

    match std::fs::metadata(arg) {
        Ok(metadata) if metadata.len() == 0 => Err(CliError::InvalidInput(format!(
            "ERROR: file {:?} is empty",
            arg
        ))),
        Ok(_) => Ok(()),
        Err(e) => Err(CliError::IoError(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as IoWrite;

    #[test]
    fn test_validate_rejects_missing_path() {
        let arg = PathBuf::from("does/not/exist.tsv");
        assert!(validate(&arg).is_err());
    }

    #[test]
    fn test_validate_rejects_empty_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let arg = file.path().to_path_buf();
        assert!(validate(&arg).is_err());
    }

    #[test]
    fn test_validate_accepts_regular_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "chr1\t0\t100\n").unwrap();
        let arg = file.path().to_path_buf();
        assert!(validate(&arg).is_ok());
    }
}
