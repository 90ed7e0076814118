//! Within-batch correlation of peakmap signal tracks
//!
//! This module reads a multi-track signal matrix (per-bin values across
//! replicate batches, e.g. derived from a set of bigWigs), groups the
//! track columns into batches of adjacent replicates sharing a root
//! filename, and reports the average pairwise Pearson correlation within
//! each batch. Batch membership is purely positional: two tracks with
//! the same root separated by a track of a different root end up in
//! different batches.

pub mod cli;
pub mod core;
pub mod utils;
