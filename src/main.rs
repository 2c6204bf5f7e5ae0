use quizdeck::paths::AppPaths;
use quizdeck::App;

fn main() {
    pretty_env_logger::init();

    // 1. Preparar el almacenamiento de la aplicación
    let paths = AppPaths::resolve();
    if let Err(e) = paths.ensure_dirs() {
        eprintln!("⚠️ Could not prepare data directories: {e}");
        std::process::exit(1);
    }
    paths.migrate_legacy();

    // 2. Arrancar el shell de menús
    let mut app = App::new(paths);
    app.run();
}
