use anyhow::{Context, Result, bail};

/// Parsed point file: a `points clusters` header followed by one point per line.
#[derive(Clone, Debug, PartialEq)]
pub struct PointFile {
    pub clusters: usize,
    pub points: Vec<Vec<f64>>,
}

pub async fn load_points(path: &str) -> Result<PointFile> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read point file {path}"))?;
    parse_points(&contents).with_context(|| format!("malformed point file {path}"))
}

/// Parse the point file format.
///
/// Every point must have as many coordinates as the first one, and the number of
/// points must match the header.
pub fn parse_points(contents: &str) -> Result<PointFile> {
    let mut lines = contents.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty());

    let (_, header) = lines.next().context("missing header line")?;
    let mut header = header.split_whitespace();
    let expected: usize = header.next()
        .context("header is missing the point count")?
        .parse()
        .context("point count is not a number")?;
    let clusters: usize = header.next()
        .context("header is missing the cluster count")?
        .parse()
        .context("cluster count is not a number")?;

    let mut points: Vec<Vec<f64>> = Vec::with_capacity(expected);
    for (line_no, line) in lines {
        let point = line.split_whitespace()
            .map(|value| value.parse::<f64>())
            .collect::<Result<Vec<f64>, _>>()
            .with_context(|| format!("line {}: bad coordinate", line_no + 1))?;
        if let Some(first) = points.first() {
            if first.len() != point.len() {
                bail!("line {}: expected {} coordinates, found {}", line_no + 1, first.len(), point.len());
            }
        }
        points.push(point);
    }

    if points.len() != expected {
        bail!("header announces {} points, file has {}", expected, points.len());
    }
    Ok(PointFile { clusters, points })
}
