use clap::Parser;
use config::ArgCheck;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "rna-geneinfo",
    version = config::VERSION,
    about = "Extract a gene_id -> gene_name/gene_type table from a GTF annotation"
)]
pub struct Args {
    #[arg(
        value_name = "GTF",
        help = "Path to a GTF-like annotation file (# comment lines are skipped)"
    )]
    pub input: PathBuf,

    #[arg(
        value_name = "TSV",
        help = "Path of the gene info table to write (created or overwritten)"
    )]
    pub output: PathBuf,
}

impl ArgCheck for Args {
    fn get_inputs(&self) -> Vec<&PathBuf> {
        vec![&self.input]
    }
}
