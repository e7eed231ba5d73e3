//! `dust-image [IMAGE] [--grid N] [--seed S] [--frequency F]`
//!
//! Opens a window and assembles IMAGE (PNG or JPEG) from a cloud of points.
//! Without an image a procedural gradient is used.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use dust_image::{CloudConfig, ViewerConfig};

#[derive(Parser, Debug, Clone)]
#[command(name = "dust-image", version)]
struct Args {
    /// PNG or JPEG to assemble
    image: Option<PathBuf>,

    /// Points per side of the square grid
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    grid: Option<u32>,

    /// Seed for the initial scatter
    #[arg(long)]
    seed: Option<u64>,

    /// Noise amplitude during flight
    #[arg(long)]
    frequency: Option<f32>,
}

impl Args {
    fn cloud(&self) -> CloudConfig {
        let mut cloud = CloudConfig::new();
        if let Some(n) = self.grid {
            cloud = cloud.with_grid(n, n);
        }
        if let Some(seed) = self.seed {
            cloud = cloud.with_seed(seed);
        }
        if let Some(frequency) = self.frequency {
            cloud = cloud.with_frequency(frequency);
        }
        cloud
    }

    fn viewer(&self) -> ViewerConfig {
        let config = ViewerConfig::default();
        match &self.image {
            Some(path) => config.with_image(path.clone()),
            None => config,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let cloud = args.cloud();
    cloud.validate().context("invalid cloud options")?;

    log::info!(
        "Starting with a {}x{} grid ({} points)",
        cloud.columns,
        cloud.rows,
        cloud.point_count()
    );

    dust_image::viewer::run(args.viewer().with_cloud(cloud)).context("viewer failed")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_flags() {
        let args = Args::try_parse_from(["dust-image"]).unwrap();
        assert!(args.image.is_none());
        let cloud = args.cloud();
        assert_eq!(cloud.columns, CloudConfig::new().columns);
        assert_eq!(cloud.seed, CloudConfig::new().seed);
    }

    #[test]
    fn test_flags_reach_config() {
        let args = Args::try_parse_from([
            "dust-image",
            "photo.png",
            "--grid",
            "64",
            "--seed",
            "9",
            "--frequency",
            "0.5",
        ])
        .unwrap();
        assert_eq!(args.image, Some(PathBuf::from("photo.png")));
        let cloud = args.cloud();
        assert_eq!((cloud.columns, cloud.rows), (64, 64));
        assert_eq!(cloud.seed, 9);
        assert_eq!(cloud.frequency, 0.5);
    }

    #[test]
    fn test_bad_values_rejected() {
        assert!(Args::try_parse_from(["dust-image", "--grid", "0"]).is_err());
        assert!(Args::try_parse_from(["dust-image", "--grid", "ten"]).is_err());
        assert!(Args::try_parse_from(["dust-image", "--seed"]).is_err());
        assert!(Args::try_parse_from(["dust-image", "--bogus"]).is_err());

        let args = Args::try_parse_from(["dust-image", "--frequency=-1"]).unwrap();
        assert!(args.cloud().validate().is_err());
    }
}
