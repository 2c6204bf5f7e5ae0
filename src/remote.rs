use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(20);

/// Descarga un fichero remoto (CSV o JSON) a `dest_path`.
///
/// Con `overwrite` en false, un destino ya existente es un error; los
/// estados HTTP de error también lo son. El que llama decide qué hacer con
/// el fichero una vez en disco (validarlo, borrarlo, registrarlo).
pub fn download_remote(
    url: &str,
    dest_path: &Path,
    overwrite: bool,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if dest_path.exists() && !overwrite {
        return Err(format!("File already exists: {}", dest_path.display()).into());
    }

    let client = Client::builder().timeout(DOWNLOAD_TIMEOUT).build()?;
    let response = client
        .get(url)
        .header(USER_AGENT, concat!("quizdeck/", env!("CARGO_PKG_VERSION")))
        .send()?
        .error_for_status()?;
    let bytes = response.bytes()?;

    if let Some(dir) = dest_path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }
    fs::write(dest_path, &bytes)?;
    log::info!("downloaded {} ({} bytes)", dest_path.display(), bytes.len());
    Ok(dest_path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn existing_destination_without_overwrite_is_an_error() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let dest = dir.path().join("bank.json");
        fs::write(&dest, "[]").expect("write");

        let err = download_remote("http://localhost/ignored", &dest, false).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }
}
