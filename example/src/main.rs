//! Command-line driver for the parallel k-means engine
//! Loads point files, fits and scores models, writes predictions,
//! times fitting across worker counts and generates synthetic datasets.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kmeans::{KMeans, KMeansContext, SeedMode};
use tracing::info;

use bench::time_by_workers;
use generate::gaussian_blobs;
use loading::load_points;
use output::{format_centroids, write_points, write_predictions};

mod bench;
mod generate;
mod loading;
mod output;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fit a model, print centroids and score, write one prediction per point
    Fit {
        /// Point file: `points clusters` header, then one point per line
        #[arg(long)]
        data: String,
        /// Cluster count (default: taken from the file header)
        #[arg(long)]
        clusters: Option<usize>,
        /// Worker threads (default: all cores)
        #[arg(long)]
        workers: Option<usize>,
        /// Fixed random seed (default: 0)
        #[arg(long, conflicts_with = "entropy")]
        seed: Option<u64>,
        /// Seed from system entropy instead of a fixed seed
        #[arg(long)]
        entropy: bool,
        /// Stop after this many recentering passes even if not converged
        #[arg(long)]
        max_iter: Option<usize>,
        /// Output file for predictions
        #[arg(long, default_value = "predictions.out")]
        predictions: String,
    },
    /// Average fit time for every worker count from 1 to `max_workers`
    Bench {
        #[arg(long)]
        data: String,
        #[arg(long)]
        clusters: Option<usize>,
        #[arg(long, default_value_t = 8)]
        max_workers: usize,
        #[arg(long, default_value_t = 1)]
        repeats: usize,
    },
    /// Write a Gaussian-blob dataset in the point file format
    Generate {
        #[arg(long)]
        out: String,
        #[arg(long)]
        points: usize,
        #[arg(long)]
        clusters: usize,
        #[arg(long, default_value_t = 2)]
        dim: usize,
        /// Standard deviation around each blob center
        #[arg(long, default_value_t = 1.0)]
        spread: f64,
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args: Args = Args::parse();

    match args.command {
        Command::Fit { data, clusters, workers, seed, entropy, max_iter, predictions } => {
            let file = load_points(&data).await?;
            let seed = if entropy { SeedMode::Entropy } else { SeedMode::Fixed(seed.unwrap_or(kmeans::context::DEFAULT_SEED)) };
            let mut context = KMeansContext::new(clusters.unwrap_or(file.clusters))
                .with_seed(seed)
                .with_max_iterations(max_iter);
            if let Some(workers) = workers {
                context = context.with_workers(workers);
            }

            let mut model: KMeans<Vec<f64>> = KMeans::with_context(context)?;
            let report = model.fit(&file.points).context("fitting failed")?;
            info!(iterations = report.iterations, converged = report.converged, empty_clusters = report.empty_clusters, "fit finished");

            println!("Fitting time: {:?}", report.elapsed);
            print!("{}", format_centroids(model.centroids()));
            println!("Score: {}", model.score());

            let assigned = model.predict(&file.points)?;
            write_predictions(&predictions, &assigned).await?;
            info!(path = %predictions, points = assigned.len(), "predictions written");
        },
        Command::Bench { data, clusters, max_workers, repeats } => {
            let file = load_points(&data).await?;
            let timings = time_by_workers(&file.points, clusters.unwrap_or(file.clusters), max_workers, repeats)?;
            for (workers, average) in timings {
                println!("{} {}", workers, average.as_secs_f64());
            }
        },
        Command::Generate { out, points, clusters, dim, spread, seed } => {
            let dataset = gaussian_blobs(points, clusters, dim, spread, seed)?;
            write_points(&out, &dataset, clusters).await?;
            info!(path = %out, points, clusters, dim, "dataset written");
        },
    }
    Ok(())
}
