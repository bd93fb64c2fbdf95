//! Road network dataset preparation for a self-hosted OSRM backend.
//!
//! Used by the integration tests to stand up a directions backend with
//! a real road network. Preparation is synchronous and runs before any
//! async runtime exists.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct GeofabrikRegion {
    /// Region path on the Geofabrik download server, for example
    /// "north-america/us/nevada".
    pub path: String,
}

impl GeofabrikRegion {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn name(&self) -> String {
        self.path.rsplit('/').next().unwrap_or("region").to_string()
    }

    pub fn url(&self) -> String {
        format!("https://download.geofabrik.de/{}-latest.osm.pbf", self.path)
    }
}

/// OSRM extraction profile. Selects which travel network the dataset
/// is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractProfile {
    Bicycle,
    Foot,
    Car,
}

impl ExtractProfile {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bicycle => "bicycle",
            Self::Foot => "foot",
            Self::Car => "car",
        }
    }

    /// Profile script path inside the osrm-backend image.
    fn lua_path(&self) -> &'static str {
        match self {
            Self::Bicycle => "/opt/bicycle.lua",
            Self::Foot => "/opt/foot.lua",
            Self::Car => "/opt/car.lua",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum OsrmPrepMode {
    Mld,
}

#[derive(Debug, Clone)]
pub struct OsrmDatasetConfig {
    pub region: GeofabrikRegion,
    pub data_root: PathBuf,
    pub profile: ExtractProfile,
    pub mode: OsrmPrepMode,
}

impl OsrmDatasetConfig {
    pub fn new(region: GeofabrikRegion, data_root: impl Into<PathBuf>) -> Self {
        Self {
            region,
            data_root: data_root.into(),
            profile: ExtractProfile::Bicycle,
            mode: OsrmPrepMode::Mld,
        }
    }

    pub fn with_profile(mut self, profile: ExtractProfile) -> Self {
        self.profile = profile;
        self
    }
}

#[derive(Debug, Clone)]
pub struct OsrmDataset {
    pub data_dir: PathBuf,
    pub osrm_base: PathBuf,
    pub pbf_path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum OsrmDataError {
    #[error("dataset io error: {0}")]
    Io(#[from] io::Error),

    #[error("dataset download failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("dataset preprocessing failed: {0}")]
    ProcessFailure(String),
}

impl OsrmDataset {
    /// Ensures a preprocessed dataset exists for the configured region
    /// and profile, downloading and extracting on first use. Each
    /// profile gets its own directory so bicycle and car extracts do
    /// not clobber each other.
    pub fn ensure(config: &OsrmDatasetConfig) -> Result<Self, OsrmDataError> {
        let data_root = if config.data_root.is_absolute() {
            config.data_root.clone()
        } else {
            std::env::current_dir()?.join(&config.data_root)
        };
        let region = config.region.name();
        let data_dir = data_root.join(format!("{}-{}", region, config.profile.name()));
        fs::create_dir_all(&data_dir)?;

        let pbf_path = data_dir.join(format!("{}-latest.osm.pbf", region));
        if !pbf_path.exists() {
            info!("downloading {} to {}", config.region.url(), pbf_path.display());
            download_pbf(&config.region.url(), &pbf_path)?;
        }

        let osrm_base = data_dir.join(format!("{}-latest.osrm", region));
        if !osrm_base.exists() {
            info!("extracting {} with the {} profile", region, config.profile.name());
            run_preprocessor(
                &[
                    "osrm-extract",
                    "-p",
                    config.profile.lua_path(),
                    &container_path(&pbf_path),
                ],
                &data_dir,
            )?;
        }

        match config.mode {
            OsrmPrepMode::Mld => {
                if !mld_ready(&osrm_base) {
                    run_preprocessor(
                        &["osrm-partition", &container_path(&osrm_base)],
                        &data_dir,
                    )?;
                    run_preprocessor(
                        &["osrm-customize", &container_path(&osrm_base)],
                        &data_dir,
                    )?;
                }
            }
        }

        debug!("dataset ready at {}", data_dir.display());
        Ok(Self {
            data_dir,
            osrm_base,
            pbf_path,
        })
    }
}

fn download_pbf(url: &str, dest: &Path) -> Result<(), OsrmDataError> {
    let bytes = reqwest::blocking::get(url)?.error_for_status()?.bytes()?;
    // Stage next to the destination so an interrupted download never
    // leaves a truncated .pbf behind.
    let staging = dest.with_extension("partial");
    fs::write(&staging, &bytes)?;
    fs::rename(staging, dest)?;
    Ok(())
}

fn mld_ready(osrm_base: &Path) -> bool {
    osrm_base.exists()
        && ["osrm.partition", "osrm.mldgr", "osrm.cells"]
            .iter()
            .all(|ext| osrm_base.with_extension(ext).exists())
}

/// Path of a host file as the osrm-backend container sees it under the
/// `/data` bind mount.
fn container_path(path: &Path) -> String {
    let name = path.file_name().and_then(|name| name.to_str()).unwrap_or_default();
    format!("/data/{}", name)
}

fn run_preprocessor(args: &[&str], data_dir: &Path) -> Result<(), OsrmDataError> {
    debug!("docker {}", args.join(" "));
    let status = Command::new("docker")
        .args(["run", "--rm", "-t", "-v"])
        .arg(format!("{}:/data", data_dir.display()))
        .arg("osrm/osrm-backend")
        .args(args)
        .status()?;

    if !status.success() {
        return Err(OsrmDataError::ProcessFailure(format!(
            "docker exited with status {}",
            status
        )));
    }
    Ok(())
}
