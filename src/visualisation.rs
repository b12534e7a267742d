// src/visualisation.rs

use plotters::prelude::*;

use crate::minimize::IterationProgress;
use crate::spin_state::SpinState;

/// Plot max dm and max |tau| versus iteration on a log axis.
///
/// Zero values (e.g. a field-free run) are clamped to the smallest positive value
/// so they still show up on the log scale.
pub fn save_convergence_plot(
    history: &[IterationProgress],
    filename: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    if history.is_empty() {
        return Ok(());
    }

    let positive_min = history
        .iter()
        .flat_map(|p| [p.max_dm, p.max_tau])
        .filter(|v| *v > 0.0 && v.is_finite())
        .fold(f64::INFINITY, f64::min);
    let floor = if positive_min.is_finite() { positive_min } else { 1e-16 };
    let top = history
        .iter()
        .flat_map(|p| [p.max_dm, p.max_tau])
        .filter(|v| v.is_finite())
        .fold(floor, f64::max);

    let y_min = floor * 0.5;
    let y_max = top * 2.0;
    let x_max = history.len().max(2) as f64;

    let root = BitMapBackend::new(filename, (1024, 768)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption("Steepest descent convergence", ("sans-serif", 30))
        .set_left_and_bottom_label_area_size(60)
        .build_cartesian_2d(0f64..x_max, (y_min..y_max).log_scale())?;

    chart
        .configure_mesh()
        .x_desc("iteration")
        .y_desc("value")
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            history
                .iter()
                .map(|p| (p.iteration as f64, p.max_dm.max(floor))),
            &RED,
        ))?
        .label("max dm")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RED));

    chart
        .draw_series(LineSeries::new(
            history
                .iter()
                .map(|p| (p.iteration as f64, p.max_tau.max(floor))),
            &BLUE,
        ))?
        .label("max |tau|")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

    chart
        .configure_series_labels()
        .border_style(&BLACK)
        .background_style(&WHITE.mix(0.8))
        .draw()?;

    root.present()?;
    Ok(())
}

/// Plot (m_x, m_y, m_z) against the flat site index, e.g. across a chain.
pub fn save_spin_profile_plot(
    spin: &SpinState,
    filename: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let n = spin.n_sites();

    let root = BitMapBackend::new(filename, (1024, 768)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption("Spin components by site", ("sans-serif", 30))
        .set_left_and_bottom_label_area_size(60)
        .build_cartesian_2d(0f64..(n.max(2) - 1) as f64, -1.1f64..1.1f64)?;

    chart
        .configure_mesh()
        .x_desc("site index")
        .y_desc("m component")
        .draw()?;

    let colours = [RED, GREEN, BLUE];
    let labels = ["m_x", "m_y", "m_z"];
    for c in 0..3 {
        let colour = colours[c];
        chart
            .draw_series(LineSeries::new(
                spin.spin
                    .iter()
                    .enumerate()
                    .map(move |(i, s)| (i as f64, s[c])),
                &colour,
            ))?
            .label(labels[c])
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], ShapeStyle::from(&colour))
            });
    }

    chart
        .configure_series_labels()
        .border_style(&BLACK)
        .background_style(&WHITE.mix(0.8))
        .draw()?;

    root.present()?;
    Ok(())
}
