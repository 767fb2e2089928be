//! CSV point input and the cluster report format.
//!
//! Input is line-oriented: each line encodes one point as comma-separated
//! components. Parsing is deliberately forgiving, so a ragged file never
//! aborts a run: malformed or missing components default to 0, and extra
//! components beyond the declared dimension are ignored.

use std::io::{BufRead, Write};

use crate::cluster::DenclueFit;
use crate::error::Result;

/// Parse one CSV line into a row of `dim` components.
///
/// Missing components stay 0; malformed components parse as 0; components
/// beyond `dim` are dropped. An empty line therefore yields the origin.
pub fn parse_row(line: &str, dim: usize) -> Vec<f64> {
    let mut row = vec![0.0; dim];
    for (slot, field) in row.iter_mut().zip(line.split(',')) {
        *slot = field.trim().parse().unwrap_or(0.0);
    }
    row
}

/// Read every line of `reader` as one point of dimension `dim`.
pub fn read_points<R: BufRead>(reader: R, dim: usize) -> Result<Vec<Vec<f64>>> {
    let mut rows = Vec::new();
    for line in reader.lines() {
        rows.push(parse_row(&line?, dim));
    }
    Ok(rows)
}

/// Write the cluster report.
///
/// Each non-empty cluster, in discovery order, prints a 1-based header with
/// its attractor's textual form, then one tab-indented line per member:
///
/// ```text
/// Cluster 1\tAttractor 0.1,0.05
/// \t(0,0) DENSITY [1.98]
/// ```
pub fn write_report<W: Write>(mut writer: W, fit: &DenclueFit) -> Result<()> {
    let mut printed = 0;
    for cluster in fit.clusters() {
        if cluster.members.is_empty() {
            continue;
        }
        printed += 1;
        writeln!(writer, "Cluster {}\tAttractor {}", printed, cluster.attractor)?;
        for member in &cluster.members {
            writeln!(writer, "\t({}) DENSITY [{}]", member, member.density())?;
        }
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::{Denclue, Point};

    #[test]
    fn parses_well_formed_lines() {
        assert_eq!(parse_row("1.5,2,-0.25", 3), vec![1.5, 2.0, -0.25]);
    }

    #[test]
    fn missing_components_default_to_zero() {
        assert_eq!(parse_row("1.5", 3), vec![1.5, 0.0, 0.0]);
        assert_eq!(parse_row("", 2), vec![0.0, 0.0]);
    }

    #[test]
    fn malformed_components_default_to_zero() {
        assert_eq!(parse_row("1.5,abc,2", 3), vec![1.5, 0.0, 2.0]);
    }

    #[test]
    fn trailing_separator_and_extras_are_tolerated() {
        assert_eq!(parse_row("1,2,", 2), vec![1.0, 2.0]);
        assert_eq!(parse_row("1,2,3,4", 2), vec![1.0, 2.0]);
    }

    #[test]
    fn point_text_round_trips() {
        let p = Point::new(vec![0.1, -5.25, 3.0000000001]);
        let parsed = parse_row(&p.to_string(), 3);
        assert_eq!(Point::new(parsed), p);
    }

    #[test]
    fn read_points_handles_blank_lines_and_crlf() {
        let input = "0,0\n\n0.1,0\r\n";
        let rows = read_points(input.as_bytes(), 2).unwrap();
        assert_eq!(
            rows,
            vec![vec![0.0, 0.0], vec![0.0, 0.0], vec![0.1, 0.0]]
        );
    }

    #[test]
    fn blank_lines_feed_a_degenerate_cluster_at_the_origin() {
        let input = "0,0\n\n0.1,0\n\n";
        let rows = read_points(input.as_bytes(), 2).unwrap();
        assert_eq!(rows.len(), 4);

        let fit = Denclue::new(1.0, 0.5).fit(&rows).unwrap();
        assert_eq!(fit.n_clusters(), 1);
        assert_eq!(fit.clusters()[0].members.len(), 4);
    }

    #[test]
    fn report_numbers_clusters_and_indents_members() {
        let data = vec![
            vec![0.0, 0.0],
            vec![0.1, 0.1],
            vec![0.2, 0.0],
            vec![5.0, 5.0],
            vec![5.1, 5.0],
            vec![5.0, 5.1],
        ];
        let fit = Denclue::new(1.0, 1.5).fit(&data).unwrap();

        let mut out = Vec::new();
        write_report(&mut out, &fit).unwrap();
        let report = String::from_utf8(out).unwrap();

        let headers: Vec<&str> = report
            .lines()
            .filter(|l| l.starts_with("Cluster"))
            .collect();
        assert_eq!(headers.len(), 2);
        assert!(headers[0].starts_with("Cluster 1\tAttractor "));
        assert!(headers[1].starts_with("Cluster 2\tAttractor "));

        let members: Vec<&str> = report.lines().filter(|l| l.starts_with('\t')).collect();
        assert_eq!(members.len(), 6);
        for line in members {
            assert!(line.starts_with("\t("));
            assert!(line.contains(") DENSITY ["));
            assert!(line.ends_with(']'));
        }
    }
}
