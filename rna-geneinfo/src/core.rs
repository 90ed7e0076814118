use anyhow::{bail, Context, Result};
use hashbrown::HashMap;
use indexmap::IndexMap;
use log::info;

use std::fs::File;
use std::io::{BufRead, BufReader};

use config::{write_tsv, ATTR_SEPARATOR, COMMENT_CHAR, GENE_ID, GENE_NAME, GENE_TYPE};

use crate::cli::Args;

/// Gene attributes recorded for a single gene_id
#[derive(Debug, PartialEq)]
pub struct GeneRecord {
    pub name: String,
    pub biotype: String,
}

/// Build the gene info table and write it to the output path
///
/// # Arguments
///
/// * `args` - Module arguments holding the annotation path and the output path
///
/// # Behavior
///
/// - Lines starting with `#` are skipped
/// - The last tab-separated field of each line is parsed as GTF attributes
/// - Lines missing any of gene_id, gene_name or gene_type abort the run
/// - The first line mentioning a gene_id wins; duplicates are discarded
pub fn extract_gene_info(args: Args) -> Result<()> {
    info!("Extracting gene info from {}...", args.input.display());

    let f = File::open(&args.input)
        .with_context(|| format!("could not open {}", args.input.display()))?;
    let reader = BufReader::new(f);

    let mut genes: IndexMap<String, GeneRecord> = IndexMap::new();

    for (number, line) in reader.lines().enumerate() {
        let line = line.with_context(|| {
            format!("could not read line {} of {}", number + 1, args.input.display())
        })?;

        if line.is_empty() || line.starts_with(COMMENT_CHAR) {
            continue;
        }

        let record = parse_line(&line, number + 1)?;

        // INFO: first-wins, later duplicates are silently discarded
        genes.entry(record.0).or_insert(record.1);
    }

    info!("Recorded {} unique genes", genes.len());

    let rows = genes
        .iter()
        .map(|(id, gene)| format!("{}\t{}\t{}", id, gene.name, gene.biotype))
        .collect::<Vec<String>>();

    write_tsv(&rows, &args.output)?;

    Ok(())
}

/// Parse one annotation line into a (gene_id, GeneRecord) pair
fn parse_line(line: &str, number: usize) -> Result<(String, GeneRecord)> {
    let info = line
        .split('\t')
        .last()
        .expect("ERROR: split always yields at least one field");

    let attributes = parse_attributes(info);

    let id = require_key(&attributes, GENE_ID, number)?;
    let name = require_key(&attributes, GENE_NAME, number)?;
    let biotype = require_key(&attributes, GENE_TYPE, number)?;

    Ok((
        id,
        GeneRecord {
            name,
            biotype,
        },
    ))
}

/// Split a GTF attribute field into key/value pairs
///
/// The field is a `; `-separated list of `key "value"` tokens. Each token
/// is split on its first space; the value is stripped of trailing
/// whitespace, a trailing `;` and one pair of surrounding double quotes.
pub fn parse_attributes(field: &str) -> HashMap<String, String> {
    let mut attributes = HashMap::new();

    for token in field.split(ATTR_SEPARATOR) {
        if token.len() <= 2 {
            continue;
        }

        if let Some((key, raw)) = token.split_once(' ') {
            attributes.insert(key.to_string(), unquote(raw).to_string());
        }
    }

    attributes
}

/// Strip trailing whitespace, a trailing `;` and one pair of surrounding quotes
fn unquote(raw: &str) -> &str {
    let raw = raw.trim_end().trim_end_matches(';');

    match raw.strip_prefix('"').and_then(|v| v.strip_suffix('"')) {
        Some(value) => value,
        None => raw,
    }
}

fn require_key(attributes: &HashMap<String, String>, key: &str, number: usize) -> Result<String> {
    match attributes.get(key) {
        Some(value) => Ok(value.clone()),
        None => bail!("line {} is missing required attribute {:?}", number, key),
    }
}
