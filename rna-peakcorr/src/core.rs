use anyhow::{bail, Context, Result};
use log::info;
use ndarray::Array2;
use regex::Regex;

use std::fs::File;
use std::io::{BufRead, BufReader, Write};

use config::{get_spinner, META_COLS, REPLICATE_SUFFIX, SIDE_COL_PREFIX};

use crate::cli::Args;
use crate::utils::{parse_cell, track_root};

/// A group of adjacent tracks sharing a replicate root name
///
/// # Fields
///
/// * `root` - Common root filename of the member tracks
/// * `members` - Number of tracks in the batch
/// * `rows` - One value vector per genomic bin, each of length `members`
#[derive(Debug, PartialEq)]
pub struct TrackBatch {
    pub root: String,
    pub members: usize,
    pub rows: Vec<Vec<f64>>,
}

impl TrackBatch {
    fn new(root: String, members: usize) -> Self {
        Self {
            root,
            members,
            rows: Vec::new(),
        }
    }
}

/// Correlate the tracks of each batch and print one summary line per batch
///
/// # Arguments
///
/// * `args` - Module arguments holding the matrix path
///
/// # Behavior
///
/// - Batches are discovered once from the header track names
/// - Every body row is sliced positionally into per-batch windows
/// - Each batch reports the mean pairwise Pearson correlation of its
///   tracks as `<basename>\t<root>\t<average>` on standard output
pub fn correlate_peakmap(args: Args) -> Result<()> {
    info!("Correlating peakmap tracks in {}...", args.input.display());

    let f = File::open(&args.input)
        .with_context(|| format!("could not open {}", args.input.display()))?;
    let mut reader = BufReader::new(f);

    let mut header = String::new();
    reader
        .read_line(&mut header)
        .with_context(|| format!("could not read header of {}", args.input.display()))?;
    if header.trim().is_empty() {
        bail!("{} is empty, no header to read", args.input.display());
    }

    let fields = header.trim().split('\t').collect::<Vec<&str>>();
    let (ntracks, mut batches) = collect_batches(&fields)?;

    info!("Discovered {} batches over {} tracks", batches.len(), ntracks);

    ingest_rows(reader, ntracks, &mut batches)?;

    let basename = args
        .input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.input.display().to_string());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    for batch in &batches {
        writeln!(
            out,
            "{}\t{}\t{}",
            basename,
            batch.root,
            mean_pairwise_correlation(batch)
        )?;
    }

    Ok(())
}

/// Discover replicate batches from the header track names
///
/// The track-name slice is `header[3..3 + ntracks]`, where `ntracks`
/// excludes the three leading metadata columns and any `start_`-prefixed
/// side columns. A single forward scan groups consecutive names sharing
/// a root; a root change or the end of the slice flushes the current
/// batch. Batches are returned in discovery order.
pub fn collect_batches(fields: &[&str]) -> Result<(usize, Vec<TrackBatch>)> {
    let side_cols = fields
        .iter()
        .filter(|name| name.starts_with(SIDE_COL_PREFIX))
        .count();

    let ntracks = fields.len().saturating_sub(META_COLS + side_cols);
    if ntracks == 0 {
        bail!(
            "header has no track columns ({} fields, {} side columns)",
            fields.len(),
            side_cols
        );
    }

    let names = &fields[META_COLS..META_COLS + ntracks];
    let suffix = Regex::new(REPLICATE_SUFFIX).expect("ERROR: hardcoded pattern is valid");

    let mut batches: Vec<TrackBatch> = Vec::new();

    for name in names {
        let root = track_root(name, &suffix);

        match batches.last_mut() {
            Some(batch) if batch.root == root => batch.members += 1,
            _ => batches.push(TrackBatch::new(root, 1)),
        }
    }

    Ok((ntracks, batches))
}

/// Slice every body row into per-batch windows, in header order
///
/// Row columns are assumed to be ordered identically to the header
/// track names; batch member counts sum to `ntracks` by construction.
fn ingest_rows<R: BufRead>(reader: R, ntracks: usize, batches: &mut [TrackBatch]) -> Result<()> {
    let spinner = get_spinner("Scanning rows...");

    for (number, line) in reader.lines().enumerate() {
        // INFO: the header was already consumed, body starts at line 2
        let lineno = number + 2;
        let line = line.with_context(|| format!("could not read line {}", lineno))?;

        if line.is_empty() {
            continue;
        }

        let fields = line.split('\t').collect::<Vec<&str>>();
        if fields.len() < META_COLS + ntracks {
            bail!(
                "line {} has {} columns, expected at least {}",
                lineno,
                fields.len(),
                META_COLS + ntracks
            );
        }

        let values = &fields[META_COLS..META_COLS + ntracks];

        let mut offset = 0;
        for batch in batches.iter_mut() {
            let row = values[offset..offset + batch.members]
                .iter()
                .map(|cell| parse_cell(cell, lineno))
                .collect::<Result<Vec<f64>>>()?;

            batch.rows.push(row);
            offset += batch.members;
        }

        spinner.inc(1);
    }

    spinner.finish_and_clear();
    Ok(())
}

/// Mean of the strictly-upper-triangle Pearson correlations of a batch
///
/// Bins where any member track is NaN are dropped before computing. The
/// correlation matrix across the surviving bins is symmetric, so each
/// unordered track pair is counted once. Degenerate batches (a single
/// track, fewer than two surviving bins, or a zero-variance track) yield
/// NaN rather than an error.
pub fn mean_pairwise_correlation(batch: &TrackBatch) -> f64 {
    let kept = batch
        .rows
        .iter()
        .filter(|row| !row.iter().any(|value| value.is_nan()))
        .collect::<Vec<&Vec<f64>>>();

    if batch.members < 2 || kept.len() < 2 {
        return f64::NAN;
    }

    let mut matrix = Array2::<f64>::zeros((kept.len(), batch.members));
    for (i, row) in kept.iter().enumerate() {
        for (j, value) in row.iter().enumerate() {
            matrix[[i, j]] = *value;
        }
    }

    // INFO: center each column and keep its sum of squares
    let mut squares = Vec::with_capacity(batch.members);
    for mut column in matrix.columns_mut() {
        let mean = column.mean().expect("ERROR: column is non-empty");
        column -= mean;
        squares.push(column.dot(&column));
    }

    let mut total = 0.0;
    let mut pairs = 0;

    for i in 0..batch.members {
        for j in (i + 1)..batch.members {
            let covariance = matrix.column(i).dot(&matrix.column(j));
            total += covariance / (squares[i] * squares[j]).sqrt();
            pairs += 1;
        }
    }

    total / pairs as f64
}
