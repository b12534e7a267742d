// src/config.rs
//
// Run metadata written next to the outputs of each driver binary (config.json).

use serde::Serialize;
use std::fs::{File, create_dir_all};
use std::path::Path;

use crate::mesh::CuboidMesh;
use crate::minimize::MinimizeSettings;

#[derive(Serialize)]
pub struct RunConfig {
    pub mesh: MeshConfig,
    pub energy: EnergyConfig,
    pub minimizer: MinimizeSettings,
    pub run: RunInfo,
}

#[derive(Serialize)]
pub struct MeshConfig {
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
    pub periodic_x: bool,
    pub periodic_y: bool,
}

impl From<&CuboidMesh> for MeshConfig {
    fn from(m: &CuboidMesh) -> Self {
        Self {
            nx: m.nx,
            ny: m.ny,
            nz: m.nz,
            dx: m.dx,
            dy: m.dy,
            dz: m.dz,
            periodic_x: m.periodic_x,
            periodic_y: m.periodic_y,
        }
    }
}

#[derive(Serialize, Default)]
pub struct EnergyConfig {
    pub exchange_j: Option<f64>,
    pub anisotropy_k: Option<f64>,
    pub anisotropy_axis: Option<[f64; 3]>,
    pub dmi_d: Option<f64>,
    pub zeeman_h: Option<[f64; 3]>,
    pub n_pinned: usize,
    pub n_vacancies: usize,
}

#[derive(Serialize)]
pub struct RunInfo {
    pub binary: String,
    pub run_id: String,

    // Optional provenance (can be filled later)
    pub git_commit: Option<String>,
    pub timestamp_unix: Option<u64>,
}

impl RunConfig {
    pub fn write_to_dir(&self, out_dir: &Path) -> std::io::Result<()> {
        create_dir_all(out_dir)?;
        let path = out_dir.join("config.json");
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_json_contains_settings_and_mesh() {
        let mesh = CuboidMesh::new(8, 1, 1, 1.0, 1.0, 1.0).unwrap();
        let cfg = RunConfig {
            mesh: MeshConfig::from(&mesh),
            energy: EnergyConfig {
                exchange_j: Some(1.0),
                ..EnergyConfig::default()
            },
            minimizer: MinimizeSettings::default(),
            run: RunInfo {
                binary: "test".to_string(),
                run_id: "cfg".to_string(),
                git_commit: None,
                timestamp_unix: None,
            },
        };
        let dir = std::env::temp_dir().join(format!("spin_relax_cfg_{}", std::process::id()));
        cfg.write_to_dir(&dir).unwrap();
        let text = std::fs::read_to_string(dir.join("config.json")).unwrap();
        let v: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v["mesh"]["nx"], 8);
        assert_eq!(v["minimizer"]["max_iterations"], 2000);
        assert_eq!(v["energy"]["exchange_j"], 1.0);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
