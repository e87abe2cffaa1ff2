//! JSON adapter: Implementation of ArtifactStore.
//!
//! Layout of the model directory:
//!
//! - `scaler_diabetes.json`: imputation medians + standardization statistics
//! - `modelo_diabetes.json`: logistic weights, intercept and provenance
//! - `manifest.json`: SHA-256 of both files, feature names, creation time
//!
//! # Integrity
//!
//! The manifest binds the two files into one pair. Loading fails closed if the
//! manifest is missing, if either digest does not match, or if the pair was
//! fitted on a different feature list than this build expects.
//!
//! # Atomicity
//!
//! Every file is written to a temporary file in the same directory and renamed
//! into place. The manifest is written last, so an interrupted save leaves the
//! previous manifest pointing at digests the new files do not match, and the
//! next load refuses the pair instead of serving a mix.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::artifacts::expected_feature_names;
use crate::domain::{ArtifactPair, ClassifierArtifact, CompatibilityError, ScalerArtifact};
use crate::ports::ArtifactStore;

pub const SCALER_FILE: &str = "scaler_diabetes.json";
pub const MODEL_FILE: &str = "modelo_diabetes.json";
pub const MANIFEST_FILE: &str = "manifest.json";

const MANIFEST_VERSION: u32 = 1;

/// Error type for artifact storage.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Artifact not found: {0:?}")]
    Missing(PathBuf),

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt artifact {path:?}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Digest mismatch for {file}: manifest has {expected}, file has {actual}")]
    DigestMismatch {
        file: String,
        expected: String,
        actual: String,
    },

    #[error("Manifest does not bind {0}")]
    Unbound(&'static str),

    #[error("Unsupported manifest version: {0}")]
    UnsupportedVersion(u32),

    #[error("Incompatible artifacts: {0}")]
    Incompatible(#[from] CompatibilityError),
}

/// Manifest binding the two artifact files.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ArtifactManifest {
    version: u32,
    created_at: chrono::DateTime<chrono::Utc>,
    feature_names: Vec<String>,
    /// File name -> lowercase hex SHA-256.
    files: BTreeMap<String, String>,
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// Directory-backed JSON artifact store.
#[derive(Debug, Clone)]
pub struct JsonArtifactStore {
    dir: PathBuf,
}

impl JsonArtifactStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn scaler_path(&self) -> PathBuf {
        self.dir.join(SCALER_FILE)
    }

    #[must_use]
    pub fn model_path(&self) -> PathBuf {
        self.dir.join(MODEL_FILE)
    }

    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.dir.join(MANIFEST_FILE)
    }

    fn read(path: &Path) -> Result<Vec<u8>, ArtifactError> {
        std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ArtifactError::Missing(path.to_path_buf()),
            _ => ArtifactError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        })
    }

    /// Write `bytes` to `path` via a temp file + rename in the same directory.
    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<(), ArtifactError> {
        let io_err = |source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir).map_err(io_err)?;
        tmp.write_all(bytes).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(path).map_err(|e| io_err(e.error))?;
        Ok(())
    }

    fn verified<'a>(
        manifest: &ArtifactManifest,
        file: &'static str,
        bytes: &'a [u8],
    ) -> Result<&'a [u8], ArtifactError> {
        let expected = manifest.files.get(file).ok_or(ArtifactError::Unbound(file))?;
        let actual = sha256_hex(bytes);
        if !expected.eq_ignore_ascii_case(&actual) {
            return Err(ArtifactError::DigestMismatch {
                file: file.to_string(),
                expected: expected.clone(),
                actual,
            });
        }
        Ok(bytes)
    }
}

impl ArtifactStore for JsonArtifactStore {
    type Error = ArtifactError;

    fn save(&self, artifacts: &ArtifactPair) -> Result<(), ArtifactError> {
        let corrupt = |path: PathBuf| move |source| ArtifactError::Corrupt { path, source };

        // Serialize everything before touching the directory.
        let scaler_bytes =
            serde_json::to_vec_pretty(&artifacts.scaler).map_err(corrupt(self.scaler_path()))?;
        let model_bytes = serde_json::to_vec_pretty(&artifacts.classifier)
            .map_err(corrupt(self.model_path()))?;

        let mut files = BTreeMap::new();
        files.insert(SCALER_FILE.to_string(), sha256_hex(&scaler_bytes));
        files.insert(MODEL_FILE.to_string(), sha256_hex(&model_bytes));
        let manifest = ArtifactManifest {
            version: MANIFEST_VERSION,
            created_at: chrono::Utc::now(),
            feature_names: artifacts.classifier.feature_names.clone(),
            files,
        };
        let manifest_bytes = serde_json::to_vec_pretty(&manifest)
            .map_err(corrupt(self.manifest_path()))?;

        std::fs::create_dir_all(&self.dir).map_err(|source| ArtifactError::Io {
            path: self.dir.clone(),
            source,
        })?;

        self.write_atomic(&self.scaler_path(), &scaler_bytes)?;
        self.write_atomic(&self.model_path(), &model_bytes)?;
        self.write_atomic(&self.manifest_path(), &manifest_bytes)?;

        tracing::info!(
            "Saved artifacts to {:?} (scaler={}, model={})",
            self.dir,
            &manifest.files[SCALER_FILE][..12],
            &manifest.files[MODEL_FILE][..12]
        );
        Ok(())
    }

    fn load(&self) -> Result<ArtifactPair, ArtifactError> {
        let manifest_path = self.manifest_path();
        let manifest: ArtifactManifest = serde_json::from_slice(&Self::read(&manifest_path)?)
            .map_err(|source| ArtifactError::Corrupt {
                path: manifest_path.clone(),
                source,
            })?;
        if manifest.version != MANIFEST_VERSION {
            return Err(ArtifactError::UnsupportedVersion(manifest.version));
        }

        let expected = expected_feature_names();
        if manifest.feature_names != expected {
            return Err(CompatibilityError::FeatureNames {
                artifact: "manifest",
                found: manifest.feature_names,
                expected,
            }
            .into());
        }

        let scaler_path = self.scaler_path();
        let scaler_raw = Self::read(&scaler_path)?;
        let scaler: ScalerArtifact =
            serde_json::from_slice(Self::verified(&manifest, SCALER_FILE, &scaler_raw)?)
                .map_err(|source| ArtifactError::Corrupt {
                    path: scaler_path,
                    source,
                })?;

        let model_path = self.model_path();
        let model_raw = Self::read(&model_path)?;
        let classifier: ClassifierArtifact =
            serde_json::from_slice(Self::verified(&manifest, MODEL_FILE, &model_raw)?)
                .map_err(|source| ArtifactError::Corrupt {
                    path: model_path,
                    source,
                })?;

        let pair = ArtifactPair { scaler, classifier };
        pair.check_compatible()?;

        tracing::info!(
            "Loaded artifacts from {:?} (created_at={}, n_features={})",
            self.dir,
            manifest.created_at,
            pair.classifier.model.n_features()
        );
        Ok(pair)
    }

    fn exists(&self) -> bool {
        self.manifest_path().is_file() && self.scaler_path().is_file() && self.model_path().is_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::artifacts::tests::unit_pair;
    use tempfile::tempdir;

    #[test]
    fn test_save_load_round_trip() {
        let temp = tempdir().expect("tempdir");
        let store = JsonArtifactStore::new(temp.path().join("modelo"));
        assert!(!store.exists());

        let pair = unit_pair();
        store.save(&pair).expect("save");
        assert!(store.exists());

        let loaded = store.load().expect("load");
        assert_eq!(loaded, pair);
    }

    #[test]
    fn test_save_overwrites_previous_pair() {
        let temp = tempdir().expect("tempdir");
        let store = JsonArtifactStore::new(temp.path());

        let first = unit_pair();
        store.save(&first).expect("save first");

        let mut second = unit_pair();
        second.classifier.model.intercept = -2.5;
        store.save(&second).expect("save second");

        assert_eq!(store.load().expect("load").classifier.model.intercept, -2.5);
        // Only the three artifact files remain; temp files were renamed away.
        let entries = std::fs::read_dir(temp.path()).expect("read dir").count();
        assert_eq!(entries, 3);
    }

    #[test]
    fn test_missing_artifact_fails() {
        let temp = tempdir().expect("tempdir");
        let store = JsonArtifactStore::new(temp.path());
        assert!(matches!(store.load(), Err(ArtifactError::Missing(_))));

        store.save(&unit_pair()).expect("save");
        std::fs::remove_file(store.model_path()).expect("remove model");
        assert!(!store.exists());
        match store.load() {
            Err(ArtifactError::Missing(path)) => assert!(path.ends_with(MODEL_FILE)),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_tampered_artifact_fails_digest_check() {
        let temp = tempdir().expect("tempdir");
        let store = JsonArtifactStore::new(temp.path());
        store.save(&unit_pair()).expect("save");

        let text = std::fs::read_to_string(store.scaler_path()).expect("read scaler");
        std::fs::write(store.scaler_path(), text.replace("100.0", "999.0")).expect("tamper");

        assert!(matches!(
            store.load(),
            Err(ArtifactError::DigestMismatch { .. })
        ));
    }

    #[test]
    fn test_mismatched_pair_fails() {
        let temp_a = tempdir().expect("tempdir");
        let temp_b = tempdir().expect("tempdir");
        let store_a = JsonArtifactStore::new(temp_a.path());
        let store_b = JsonArtifactStore::new(temp_b.path());

        store_a.save(&unit_pair()).expect("save a");
        let mut other = unit_pair();
        other.classifier.model.weights[0] = 1.0;
        store_b.save(&other).expect("save b");

        // A model file from another training run is not bound by this manifest.
        std::fs::copy(store_b.model_path(), store_a.model_path()).expect("copy");
        assert!(matches!(
            store_a.load(),
            Err(ArtifactError::DigestMismatch { .. })
        ));
    }

    #[test]
    fn test_corrupt_manifest_fails() {
        let temp = tempdir().expect("tempdir");
        let store = JsonArtifactStore::new(temp.path());
        store.save(&unit_pair()).expect("save");
        std::fs::write(store.manifest_path(), b"{not json").expect("corrupt");

        assert!(matches!(store.load(), Err(ArtifactError::Corrupt { .. })));
    }

    #[test]
    fn test_wrong_feature_count_fails() {
        let temp = tempdir().expect("tempdir");
        let store = JsonArtifactStore::new(temp.path());

        let mut pair = unit_pair();
        pair.classifier.model.weights.pop();
        store.save(&pair).expect("save");

        assert!(matches!(
            store.load(),
            Err(ArtifactError::Incompatible(CompatibilityError::Length { .. }))
        ));
    }

    #[test]
    fn test_foreign_feature_names_fail() {
        let temp = tempdir().expect("tempdir");
        let store = JsonArtifactStore::new(temp.path());

        let mut pair = unit_pair();
        pair.classifier.feature_names.reverse();
        store.save(&pair).expect("save");

        assert!(matches!(
            store.load(),
            Err(ArtifactError::Incompatible(
                CompatibilityError::FeatureNames { .. }
            ))
        ));
    }
}
