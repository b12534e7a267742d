// src/bin/chain_relax.rs
//
// Open chain along x with exchange, uniaxial anisotropy (easy axis z), bulk DMI and a
// weak applied field. Both end spins are pinned (left down, right up) and one site in
// the middle of the left domain is a vacancy. Starts from a noisy domain wall.
//
// Run:
//   cargo run --release --bin chain_relax
//   cargo run --release --bin chain_relax -- settings.json    (MinimizeSettings as JSON)
//
// Output:
//   out/chain_relax/
//     ├── config.json
//     ├── progress.csv
//     ├── final_spins.csv
//     ├── convergence.png
//     └── profile.png

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use spin_relax::config::{EnergyConfig, MeshConfig, RunConfig, RunInfo};
use spin_relax::effective_field::{BulkDmi, Exchange, FieldAggregator, UniaxialAnisotropy, Zeeman};
use spin_relax::energy::compute_energy;
use spin_relax::initial_states::{init_domain_wall, init_uniform_with_noise};
use spin_relax::mesh::CuboidMesh;
use spin_relax::minimize::{MinimizeSettings, ProgressHistory, SteepestDescent};
use spin_relax::spin_state::SpinState;
use spin_relax::visualisation::{save_convergence_plot, save_spin_profile_plot};

fn write_chain(spin: &SpinState, mesh: &CuboidMesh, filename: &Path) -> std::io::Result<()> {
    let mut f = BufWriter::new(File::create(filename)?);
    writeln!(f, "x,mx,my,mz,mu_s,pinned")?;
    for (id, v) in spin.spin.iter().enumerate() {
        let x = mesh.position(id)[0];
        writeln!(
            f,
            "{:.6e},{:.6e},{:.6e},{:.6e},{},{}",
            x,
            v[0],
            v[1],
            v[2],
            spin.mu_s()[id],
            u8::from(spin.pins()[id])
        )?;
    }
    f.flush()
}

fn load_settings() -> Result<MinimizeSettings, Box<dyn std::error::Error>> {
    match std::env::args().nth(1) {
        Some(path) => {
            let file = File::open(&path)?;
            let s: MinimizeSettings = serde_json::from_reader(file)?;
            tracing::info!(path = %path, "loaded minimiser settings");
            Ok(s)
        }
        None => Ok(MinimizeSettings {
            stopping_dm: 1e-8,
            max_iterations: 20_000,
            log_every: 500,
            ..MinimizeSettings::default()
        }),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .init();

    // --- chain parameters (dimensionless, J = 1 sets the energy scale) ---
    let nx: usize = 128;
    let j_ex = 1.0;
    let k_u = 0.05;
    let easy_axis = [0.0, 0.0, 1.0];
    let d_dmi = 0.1;
    let h = [0.0, 0.0, 0.01];
    let vacancy = nx / 4;
    // ---------------------------------------------------------------------

    let settings = load_settings()?;
    settings.validate()?;

    let mesh = CuboidMesh::new(nx, 1, 1, 1.0, 1.0, 1.0)?;
    let n = mesh.n_sites();

    let mut mu_s = vec![1.0; n];
    mu_s[vacancy] = 0.0;

    let fields = FieldAggregator::new(n)?
        .with(Exchange::new(&mesh, j_ex))?
        .with(UniaxialAnisotropy::new(k_u, easy_axis))?
        .with(BulkDmi::new(&mesh, d_dmi))?
        .with(Zeeman::with_moments(h, mu_s.clone()))?;
    let sd = SteepestDescent::new(fields).with_settings(settings.clone());

    let mut spin = SpinState::new(n)?;
    spin.set_mu_s(mu_s)?;
    init_uniform_with_noise(&mut spin, [0.0, 0.0, 1.0], 0.2, 42);
    let noisy = spin.spin.clone();
    init_domain_wall(&mut spin, &mesh, 0.5 * nx as f64, 8.0);
    // blend: wall profile plus the noisy tilt, renormalised
    for (s, t) in spin.spin.iter_mut().zip(noisy.iter()) {
        s[0] += 0.2 * t[0];
        s[1] += 0.2 * t[1];
    }
    spin.normalise();

    spin.spin[0] = [0.0, 0.0, -1.0];
    spin.spin[n - 1] = [0.0, 0.0, 1.0];
    spin.pin(0);
    spin.pin(n - 1);

    let e0 = compute_energy(sd.fields(), &spin.spin);
    for (name, e) in &e0.terms {
        tracing::info!(term = %name, energy = e, "initial energy");
    }

    let mut history = ProgressHistory::new(settings.log_every);
    let report = sd.minimize_with_observer(
        &mut spin,
        settings.stopping_dm,
        settings.max_iterations,
        &mut history,
    )?;

    let e1 = compute_energy(sd.fields(), &spin.spin);
    for (name, e) in &e1.terms {
        tracing::info!(term = %name, energy = e, "final energy");
    }
    let avg = spin.average();
    tracing::info!(
        state = ?report.state,
        iterations = report.iterations,
        final_max_dm = report.final_max_dm,
        e_initial = e0.total,
        e_final = e1.total,
        avg_mz = avg[2],
        "chain relaxed"
    );

    let out_dir = Path::new("out").join("chain_relax");
    let cfg = RunConfig {
        mesh: MeshConfig::from(&mesh),
        energy: EnergyConfig {
            exchange_j: Some(j_ex),
            anisotropy_k: Some(k_u),
            anisotropy_axis: Some(easy_axis),
            dmi_d: Some(d_dmi),
            zeeman_h: Some(h),
            n_pinned: spin.pins().iter().filter(|&&p| p).count(),
            n_vacancies: n - spin.n_nonzero(),
        },
        minimizer: settings,
        run: RunInfo {
            binary: "chain_relax".to_string(),
            run_id: "chain_relax".to_string(),
            git_commit: None,
            timestamp_unix: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .ok()
                .map(|d| d.as_secs()),
        },
    };
    cfg.write_to_dir(&out_dir)?;
    history.write_csv(&out_dir.join("progress.csv"))?;
    write_chain(&spin, &mesh, &out_dir.join("final_spins.csv"))?;
    save_convergence_plot(
        &history.records,
        &out_dir.join("convergence.png").to_string_lossy(),
    )?;
    save_spin_profile_plot(&spin, &out_dir.join("profile.png").to_string_lossy())?;

    Ok(())
}
