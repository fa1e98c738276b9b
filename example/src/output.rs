use anyhow::{Context, Result};
use tokio::io::{AsyncWriteExt, BufWriter};

/// Centroids as nested brackets, one centroid per line:
/// ```text
/// [[ 0 0.5 ]
///  [ 10 0.5 ]]
/// ```
pub fn format_centroids(centroids: &[Vec<f64>]) -> String {
    let mut result = String::from("[");
    for (cluster_id, centroid) in centroids.iter().enumerate() {
        result.push_str(if cluster_id == 0 { "[ " } else { " [ " });
        for value in centroid {
            result.push_str(&format!("{value} "));
        }
        result.push_str(if cluster_id + 1 == centroids.len() { "]" } else { "]\n" });
    }
    result.push_str("]\n");
    result
}

/// One cluster index per line
pub async fn write_predictions(path: &str, predictions: &[usize]) -> Result<()> {
    let body: String = predictions.iter().map(|cluster_id| format!("{cluster_id}\n")).collect();
    write_file(path, &body).await
}

/// Points in the loader's format: `points clusters` header, then one point per line
pub async fn write_points(path: &str, points: &[Vec<f64>], clusters: usize) -> Result<()> {
    let mut body = format!("{} {}\n", points.len(), clusters);
    for point in points {
        let line: Vec<String> = point.iter().map(|v| v.to_string()).collect();
        body.push_str(&line.join(" "));
        body.push('\n');
    }
    write_file(path, &body).await
}

async fn write_file(path: &str, body: &str) -> Result<()> {
    let file = tokio::fs::File::create(path)
        .await
        .with_context(|| format!("failed to create {path}"))?;
    let mut file = BufWriter::new(file);
    file.write_all(body.as_bytes()).await?;
    file.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::loading::load_points;

    use super::*;

    #[test]
    fn centroids_in_brackets() {
        let text = format_centroids(&[vec![0.0, 0.5], vec![10.0, 0.5]]);
        assert_eq!(text, "[[ 0 0.5 ]\n [ 10 0.5 ]]\n");
        assert_eq!(format_centroids(&[vec![1.0]]), "[[ 1 ]]\n");
    }

    #[tokio::test]
    async fn written_points_load_back() {
        let path = std::env::temp_dir().join(format!("kmeans-points-{}.in", std::process::id()));
        let path = path.to_string_lossy().to_string();
        let points = vec![vec![0.25, -1.0], vec![3.0, 4.5]];

        write_points(&path, &points, 2).await.unwrap();
        let loaded = load_points(&path).await.unwrap();
        tokio::fs::remove_file(&path).await.unwrap();

        assert_eq!(loaded.clusters, 2);
        assert_eq!(loaded.points, points);
    }

    #[tokio::test]
    async fn predictions_one_per_line() {
        let path = std::env::temp_dir().join(format!("kmeans-predictions-{}.out", std::process::id()));
        let path = path.to_string_lossy().to_string();

        write_predictions(&path, &[1, 0, 2]).await.unwrap();
        let text = tokio::fs::read_to_string(&path).await.unwrap();
        tokio::fs::remove_file(&path).await.unwrap();

        assert_eq!(text, "1\n0\n2\n");
    }
}
