//! Parsers for hand-written graphs and cuts on the command line.
//!
//! - edges: `"0-1,1-2,2-0"`
//! - values: `"0.5,1,0.25"`
//! - cut: cliques separated by `;`, intervals within a clique by `|`,
//!   e.g. `"0..2;2..3|5..5"` (handle `[0,2]`, one tooth `[2,3] ∪ [5,5]`).
//!   A bare number `v` is the interval `v..v`.

use anyhow::{anyhow, bail, Context, Result};
use blossom_core::Interval;

pub fn parse_edges(s: &str) -> Result<Vec<(usize, usize)>> {
    s.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| {
            let (u, v) = t
                .split_once('-')
                .ok_or_else(|| anyhow!("edge '{}' is not of the form u-v", t))?;
            let u = u.trim().parse().with_context(|| format!("bad endpoint in edge '{}'", t))?;
            let v = v.trim().parse().with_context(|| format!("bad endpoint in edge '{}'", t))?;
            Ok((u, v))
        })
        .collect()
}

pub fn parse_values(s: &str) -> Result<Vec<f64>> {
    s.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| t.parse::<f64>().with_context(|| format!("bad edge value '{}'", t)))
        .collect()
}

fn parse_interval(s: &str) -> Result<Interval> {
    let s = s.trim();
    match s.split_once("..") {
        Some((lo, hi)) => {
            let lo = lo.trim().parse().with_context(|| format!("bad lower bound in '{}'", s))?;
            let hi = hi.trim().parse().with_context(|| format!("bad upper bound in '{}'", s))?;
            Ok(Interval::new(lo, hi))
        }
        None => {
            let v = s.parse().with_context(|| format!("bad interval '{}'", s))?;
            Ok(Interval::point(v))
        }
    }
}

/// Parse a cut into its cliques, handle first.
///
/// Interval bounds are not checked here; the verifier reports malformed
/// cuts itself.
pub fn parse_cut(s: &str) -> Result<Vec<Vec<Interval>>> {
    let cliques = s
        .split(';')
        .map(|clique| {
            clique
                .split('|')
                .filter(|t| !t.trim().is_empty())
                .map(parse_interval)
                .collect::<Result<Vec<_>>>()
        })
        .collect::<Result<Vec<_>>>()?;
    if cliques.iter().all(|c| c.is_empty()) {
        bail!("cut '{}' has no intervals", s);
    }
    Ok(cliques)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_edges_and_values() {
        assert_eq!(parse_edges("0-1, 1-2,2-0").unwrap(), vec![(0, 1), (1, 2), (2, 0)]);
        assert!(parse_edges("0-1,12").is_err());
        assert!(parse_edges("0-x").is_err());

        assert_eq!(parse_values("0.5,1, 0.25").unwrap(), vec![0.5, 1.0, 0.25]);
        assert!(parse_values("0.5,half").is_err());
    }

    #[test]
    fn test_parse_cut() {
        let cut = parse_cut("0..2;2..3|5").unwrap();
        assert_eq!(
            cut,
            vec![
                vec![Interval::new(0, 2)],
                vec![Interval::new(2, 3), Interval::point(5)],
            ]
        );

        // Negative and inverted bounds survive parsing
        let cut = parse_cut("-1..2;4..3").unwrap();
        assert_eq!(cut[0][0], Interval::new(-1, 2));
        assert_eq!(cut[1][0], Interval::new(4, 3));

        // Empty tooth is kept so the verifier can reject it
        let cut = parse_cut("0..1;").unwrap();
        assert_eq!(cut.len(), 2);
        assert!(cut[1].is_empty());

        assert!(parse_cut(";").is_err());
        assert!(parse_cut("0..a").is_err());
    }
}
