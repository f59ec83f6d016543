use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use portfolio::{slices::compute_slices, tables};
use sas_parser::has_conditional_effects;

pub fn slices(task: PathBuf, time_limit: u64) -> Result<()> {
    let list = tables::select(has_conditional_effects(&task)?);
    let slices = compute_slices(&list.weights(), Duration::from_secs(time_limit));

    println!(
        "{} ({}): {} configurations, {time_limit}s",
        list.name,
        list.version,
        list.len()
    );
    for (index, (entry, slice)) in list.iter().zip(slices).enumerate() {
        println!(
            "#{index}\tweight {:>4}\t{:>10.3}s\t{}",
            entry.weight,
            slice.as_secs_f64(),
            entry.configuration.search_directive().unwrap_or_default()
        );
    }

    Ok(())
}
