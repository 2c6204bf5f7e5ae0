use quizdeck::paths::AppPaths;

/// Punto de entrada de diagnóstico: enseña dónde guarda datos la
/// aplicación y crea los directorios que falten.
fn main() {
    let paths = AppPaths::resolve();
    if let Err(e) = paths.ensure_dirs() {
        eprintln!("⚠️ Could not prepare data directories: {e}");
        std::process::exit(1);
    }

    println!("🔍 quizdeck storage locations:");
    println!("  data dir       = {}", paths.data_dir.display());
    println!("  categories dir = {}", paths.categories_dir.display());
    println!("  csv dir        = {}", paths.csv_dir.display());
    println!("  scores file    = {}", paths.scores_file.display());

    println!("\n✅ Directories created (if they were missing).");
}
