use clap::Parser;
use config::ArgCheck;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "rna-peakcorr",
    version = config::VERSION,
    about = "Report the average pairwise correlation of each replicate batch in a peakmap matrix"
)]
pub struct Args {
    #[arg(
        value_name = "MATRIX",
        help = "Path to a tab-separated peakmap matrix with a header row"
    )]
    pub input: PathBuf,
}

impl ArgCheck for Args {
    fn get_inputs(&self) -> Vec<&PathBuf> {
        vec![&self.input]
    }
}
