use crate::model::Roster;
use anyhow::{bail, Context};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

pub trait Storage {
    /// Charge un roster depuis un support.
    fn load(&self) -> anyhow::Result<Roster>;
    /// Sauvegarde de manière atomique.
    fn save(&self, roster: &Roster) -> anyhow::Result<()>;
}

pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self {
            path: path.as_ref().to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Charge le roster, ou un roster vide si le fichier n'existe pas encore.
    pub fn load_or_default(&self) -> anyhow::Result<Roster> {
        if !self.path.exists() {
            return Ok(Roster::default());
        }
        self.load()
    }

    /// Verrou exclusif inter-processus : une seule modification à la fois.
    ///
    /// Verrou consultatif de l'OS sur `<roster>.lock` : il tombe avec le
    /// processus, même tué, et le fichier laissé sur disque ne bloque rien.
    pub fn lock(&self) -> anyhow::Result<StorageLock> {
        let path = self.path.with_extension("lock");
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .with_context(|| format!("opening lock {}", path.display()))?;
        match file.try_lock_exclusive() {
            Ok(()) => {
                debug!(lock = %path.display(), "roster locked");
                Ok(StorageLock { file, path })
            }
            Err(e) if e.raw_os_error() == fs2::lock_contended_error().raw_os_error() => {
                bail!(
                    "another run is already in progress ({} is locked)",
                    path.display()
                )
            }
            Err(e) => Err(e).with_context(|| format!("locking {}", path.display())),
        }
    }
}

impl Storage for JsonStorage {
    fn load(&self) -> anyhow::Result<Roster> {
        let data =
            fs::read(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
        let roster: Roster =
            serde_json::from_slice(&data).with_context(|| "parsing roster.json")?;
        Ok(roster)
    }

    fn save(&self, roster: &Roster) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(roster)?;
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).with_context(|| "atomic rename")?;
        Ok(())
    }
}

/// Libère le verrou à la destruction.
#[derive(Debug)]
pub struct StorageLock {
    file: File,
    path: PathBuf,
}

impl StorageLock {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StorageLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            debug!(lock = %self.path.display(), error = %e, "unlock failed");
        }
    }
}
