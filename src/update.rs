use self_update::backends::github::ReleaseList;

const REPO_OWNER: &str = "quizdeck";
const REPO_NAME: &str = "quizdeck";

/// Consulta la última release publicada en GitHub.
/// Devuelve `Some(version)` si hay una versión distinta a la actual.
pub fn check_latest_release() -> Result<Option<String>, Box<dyn std::error::Error>> {
    let releases = ReleaseList::configure()
        .repo_owner(REPO_OWNER)
        .repo_name(REPO_NAME)
        .build()?
        .fetch()?;

    if let Some(release) = releases.first() {
        let latest_version = release.version.clone();
        let current_version = env!("CARGO_PKG_VERSION");
        if latest_version != current_version {
            return Ok(Some(latest_version));
        }
    }
    Ok(None)
}
