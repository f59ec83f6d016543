use std::path::PathBuf;

use anyhow::Result;
use sas_parser::find_conditional_effect_in_file;

pub fn classify(task: PathBuf) -> Result<()> {
    match find_conditional_effect_in_file(&task)? {
        Some(effect) => println!(
            "adl\t{}:{}: {}",
            task.display(),
            effect.line_number,
            effect.line
        ),
        None => println!("strips"),
    }

    Ok(())
}
