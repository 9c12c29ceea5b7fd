//! Legacy progress file inspection

use std::path::Path;

use anyhow::{Context, Result};
use mentor_core::{UserProgress, PROGRESS_SUFFIX};

pub fn cmd_progress(dir: &Path, name: Option<&str>) -> Result<()> {
    if let Some(name) = name {
        match UserProgress::load(dir, name)? {
            Some(progress) => print_progress(&progress),
            None => println!("Nenhum arquivo de progresso encontrado para {}.", name),
        }
        return Ok(());
    }

    if !dir.exists() {
        println!("O diretório {} não existe.", dir.display());
        return Ok(());
    }

    let mut found = 0usize;
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?;
    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .filter_map(|e| e.file_name().into_string().ok())
        .filter(|n| n.ends_with(PROGRESS_SUFFIX))
        .filter_map(|n| n.strip_suffix(PROGRESS_SUFFIX).map(str::to_string))
        .collect();
    names.sort();

    for name in names {
        if let Some(progress) = UserProgress::load(dir, &name)? {
            print_progress(&progress);
            found += 1;
        }
    }

    if found == 0 {
        println!(
            "Nenhum arquivo *{} encontrado em {}.",
            PROGRESS_SUFFIX,
            dir.display()
        );
    }

    Ok(())
}

fn print_progress(progress: &UserProgress) {
    println!(
        "{:<25} consultas: {}",
        progress.nome_usuario, progress.contador_consultas
    );
}
