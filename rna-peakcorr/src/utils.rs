use anyhow::{anyhow, Result};
use regex::Regex;

/// Batch root of a track name
///
/// The root is the final `/`-delimited component of the track name with
/// the first replicate suffix match (`_<digits>`) and everything after it
/// removed. Names without a suffix are their own root.
///
/// # Example
///
/// ```rust
/// use regex::Regex;
/// use rna_peakcorr::utils::track_root;
///
/// let suffix = Regex::new(config::REPLICATE_SUFFIX).unwrap();
/// assert_eq!(track_root("bw/H3K4me3_1.bw", &suffix), "H3K4me3");
/// ```
pub fn track_root(name: &str, suffix: &Regex) -> String {
    let base = name.rsplit('/').next().unwrap_or(name);

    match suffix.find(base) {
        Some(hit) => base[..hit.start()].to_string(),
        None => base.to_string(),
    }
}

/// Parse one track cell into a float
///
/// Missing values must be spelled as a float NaN token (`nan` in any
/// capitalization, optionally signed); those parse to NaN and are
/// filtered out downstream. Any other non-numeric token, including `NA`
/// and empty cells, is a hard conversion error.
pub fn parse_cell(token: &str, number: usize) -> Result<f64> {
    token
        .trim()
        .parse::<f64>()
        .map_err(|_| anyhow!("invalid numeric value {:?} on line {}", token, number))
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::REPLICATE_SUFFIX;

    fn suffix() -> Regex {
        Regex::new(REPLICATE_SUFFIX).unwrap()
    }

    #[test]
    fn test_track_root_strips_path_and_suffix() {
        assert_eq!(track_root("/data/bw/H3K4me3_1.bw", &suffix()), "H3K4me3");
        assert_eq!(track_root("H3K4me3_12", &suffix()), "H3K4me3");
    }

    #[test]
    fn test_track_root_uses_first_suffix_match() {
        assert_eq!(track_root("rep_1_of_3", &suffix()), "rep");
    }

    #[test]
    fn test_track_root_without_suffix_is_identity() {
        assert_eq!(track_root("bw/input", &suffix()), "input");
    }

    #[test]
    fn test_parse_cell_accepts_nan_tokens() {
        assert!(parse_cell("nan", 1).unwrap().is_nan());
        assert!(parse_cell("NaN", 1).unwrap().is_nan());
        assert!(parse_cell("-NAN", 1).unwrap().is_nan());
    }

    #[test]
    fn test_parse_cell_rejects_na() {
        assert!(parse_cell("NA", 7).is_err());
        assert!(parse_cell("", 7).is_err());
    }

    #[test]
    fn test_parse_cell_trims_whitespace() {
        assert_eq!(parse_cell(" 1.5\n", 1).unwrap(), 1.5);
    }
}
