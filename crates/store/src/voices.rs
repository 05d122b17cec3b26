//! Voice asset library: reference samples uploaded by users.
//!
//! Layout on disk, one directory per voice:
//!
//! ```text
//! voices/{user_id}/{voice_id}/ref.wav
//! voices/{user_id}/{voice_id}/meta.json
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::job_store::StoreError;

/// Reference sample filename inside a voice directory.
const REF_WAV: &str = "ref.wav";

/// Metadata filename inside a voice directory.
const META_JSON: &str = "meta.json";

/// Metadata persisted next to each reference sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceMeta {
    pub voice_name: String,
    pub user_id: String,
    #[serde(default)]
    pub public: bool,
}

/// One voice as reported by listing endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct VoiceEntry {
    pub user_id: String,
    pub voice_id: String,
    pub voice_name: String,
    pub public: bool,
}

/// Aggregate counts for the admin stats endpoint.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LibraryStats {
    pub users: usize,
    pub voices: usize,
    pub public_voices: usize,
}

/// Filesystem collaborator owning the voice directory tree.
#[derive(Clone)]
pub struct VoiceLibrary {
    root: PathBuf,
}

impl VoiceLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        VoiceLibrary { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn voice_dir(&self, user_id: &str, voice_id: &str) -> PathBuf {
        self.root.join(user_id).join(voice_id)
    }

    /// Path of the reference sample for a voice. The file may or
    /// may not exist; use [`exists`](Self::exists) to check.
    pub fn ref_wav_path(&self, user_id: &str, voice_id: &str) -> PathBuf {
        self.voice_dir(user_id, voice_id).join(REF_WAV)
    }

    /// Whether a usable voice asset exists for this user/voice pair.
    pub async fn exists(&self, user_id: &str, voice_id: &str) -> bool {
        tokio::fs::try_exists(self.ref_wav_path(user_id, voice_id))
            .await
            .unwrap_or(false)
    }

    /// Store an uploaded reference sample plus its metadata.
    /// Overwrites any existing sample for the same voice id.
    pub async fn save_sample(
        &self,
        user_id: &str,
        voice_id: &str,
        voice_name: &str,
        audio: &[u8],
    ) -> Result<(), StoreError> {
        let dir = self.voice_dir(user_id, voice_id);
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(REF_WAV), audio).await?;

        let meta = VoiceMeta {
            voice_name: voice_name.to_string(),
            user_id: user_id.to_string(),
            public: false,
        };
        let bytes = serde_json::to_vec_pretty(&meta)
            .expect("voice metadata serialization cannot fail");
        tokio::fs::write(dir.join(META_JSON), bytes).await?;
        Ok(())
    }

    /// List one user's voices. An unknown user yields an empty
    /// list, not an error.
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<VoiceEntry>, StoreError> {
        let user_dir = self.root.join(user_id);
        if !tokio::fs::try_exists(&user_dir).await? {
            return Ok(Vec::new());
        }

        let mut voices = Vec::new();
        let mut entries = tokio::fs::read_dir(&user_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            let voice_id = entry.file_name().to_string_lossy().into_owned();
            voices.push(self.entry_for(user_id, &voice_id).await);
        }
        voices.sort_by(|a, b| a.voice_id.cmp(&b.voice_id));
        Ok(voices)
    }

    /// Delete a voice directory. Returns `false` if there was
    /// nothing to delete.
    pub async fn delete(&self, user_id: &str, voice_id: &str) -> Result<bool, StoreError> {
        let dir = self.voice_dir(user_id, voice_id);
        if !tokio::fs::try_exists(&dir).await? {
            return Ok(false);
        }
        tokio::fs::remove_dir_all(&dir).await?;
        Ok(true)
    }

    /// Every voice in the library, across all users (admin view).
    pub async fn list_all(&self) -> Result<Vec<VoiceEntry>, StoreError> {
        if !tokio::fs::try_exists(&self.root).await? {
            return Ok(Vec::new());
        }

        let mut voices = Vec::new();
        let mut users = tokio::fs::read_dir(&self.root).await?;
        while let Some(user_entry) = users.next_entry().await? {
            if !user_entry.file_type().await?.is_dir() {
                continue;
            }
            let user_id = user_entry.file_name().to_string_lossy().into_owned();
            voices.extend(self.list_for_user(&user_id).await?);
        }
        voices.sort_by(|a, b| (&a.user_id, &a.voice_id).cmp(&(&b.user_id, &b.voice_id)));
        Ok(voices)
    }

    /// Aggregate library counts (admin view).
    pub async fn stats(&self) -> Result<LibraryStats, StoreError> {
        let voices = self.list_all().await?;
        let mut users: Vec<&str> = voices.iter().map(|v| v.user_id.as_str()).collect();
        users.sort_unstable();
        users.dedup();

        Ok(LibraryStats {
            users: users.len(),
            voices: voices.len(),
            public_voices: voices.iter().filter(|v| v.public).count(),
        })
    }

    /// Build a listing entry, tolerating a missing or unreadable
    /// `meta.json` (the directory name stands in for the display
    /// name, matching how these assets were written historically).
    async fn entry_for(&self, user_id: &str, voice_id: &str) -> VoiceEntry {
        let meta_path = self.voice_dir(user_id, voice_id).join(META_JSON);
        let meta: Option<VoiceMeta> = match tokio::fs::read(&meta_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).ok(),
            Err(_) => None,
        };

        match meta {
            Some(meta) => VoiceEntry {
                user_id: user_id.to_string(),
                voice_id: voice_id.to_string(),
                voice_name: meta.voice_name,
                public: meta.public,
            },
            None => VoiceEntry {
                user_id: user_id.to_string(),
                voice_id: voice_id.to_string(),
                voice_name: voice_id.to_string(),
                public: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_then_exists_and_ref_path() {
        let dir = tempfile::tempdir().unwrap();
        let lib = VoiceLibrary::new(dir.path());

        assert!(!lib.exists("alice", "my_voice").await);
        lib.save_sample("alice", "my_voice", "My Voice", b"RIFFfake")
            .await
            .unwrap();
        assert!(lib.exists("alice", "my_voice").await);

        let bytes = std::fs::read(lib.ref_wav_path("alice", "my_voice")).unwrap();
        assert_eq!(bytes, b"RIFFfake");
    }

    #[tokio::test]
    async fn list_for_unknown_user_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let lib = VoiceLibrary::new(dir.path());
        assert!(lib.list_for_user("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_reads_metadata_and_tolerates_missing_meta() {
        let dir = tempfile::tempdir().unwrap();
        let lib = VoiceLibrary::new(dir.path());

        lib.save_sample("alice", "my_voice", "My Voice", b"x")
            .await
            .unwrap();

        // A voice directory without meta.json still lists.
        std::fs::create_dir_all(dir.path().join("alice/bare")).unwrap();
        std::fs::write(dir.path().join("alice/bare/ref.wav"), b"x").unwrap();

        let voices = lib.list_for_user("alice").await.unwrap();
        assert_eq!(voices.len(), 2);
        assert_eq!(voices[0].voice_id, "bare");
        assert_eq!(voices[0].voice_name, "bare");
        assert_eq!(voices[1].voice_name, "My Voice");
        assert!(!voices[1].public);
    }

    #[tokio::test]
    async fn delete_removes_the_voice() {
        let dir = tempfile::tempdir().unwrap();
        let lib = VoiceLibrary::new(dir.path());

        lib.save_sample("alice", "gone", "Gone", b"x").await.unwrap();
        assert!(lib.delete("alice", "gone").await.unwrap());
        assert!(!lib.exists("alice", "gone").await);
        assert!(!lib.delete("alice", "gone").await.unwrap());
    }

    #[tokio::test]
    async fn stats_count_users_voices_and_public() {
        let dir = tempfile::tempdir().unwrap();
        let lib = VoiceLibrary::new(dir.path());

        lib.save_sample("alice", "a", "A", b"x").await.unwrap();
        lib.save_sample("alice", "b", "B", b"x").await.unwrap();
        lib.save_sample("bob", "c", "C", b"x").await.unwrap();

        // Flip one voice public by rewriting its metadata.
        let meta = VoiceMeta {
            voice_name: "C".into(),
            user_id: "bob".into(),
            public: true,
        };
        std::fs::write(
            dir.path().join("bob/c/meta.json"),
            serde_json::to_vec(&meta).unwrap(),
        )
        .unwrap();

        let stats = lib.stats().await.unwrap();
        assert_eq!(stats.users, 2);
        assert_eq!(stats.voices, 3);
        assert_eq!(stats.public_voices, 1);
    }
}
