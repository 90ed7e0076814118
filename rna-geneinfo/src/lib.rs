//! Gene info extraction from GTF-like annotations
//!
//! This module builds a lookup table mapping each gene_id to its
//! gene_name and gene_type, reading the attribute field of a GTF-like
//! annotation file. The first line mentioning a gene_id wins; later
//! lines for the same id are ignored. The table is written out as a
//! three-column TSV in first-seen order.

pub mod cli;
pub mod core;
