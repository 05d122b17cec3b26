//! Deterministic artifact locations.
//!
//! Both the submission handler (which records where the artifact
//! will live) and the worker (which announces the public URL on
//! completion) derive locations from the same job id and voice
//! namespace, so they can never disagree.

use std::path::PathBuf;

use crate::types::JobId;

/// URL prefix under which produced artifacts are served.
pub const OUTPUTS_MOUNT: &str = "/outputs";

/// Artifact path relative to the outputs root:
/// `{user_id}/{voice_id}/{job_id}.wav`.
pub fn artifact_rel_path(user_id: &str, voice_id: &str, job_id: &JobId) -> PathBuf {
    PathBuf::from(user_id)
        .join(voice_id)
        .join(format!("{job_id}.wav"))
}

/// Public URL of the artifact, as served by the static file route.
pub fn artifact_url(user_id: &str, voice_id: &str, job_id: &JobId) -> String {
    format!("{OUTPUTS_MOUNT}/{user_id}/{voice_id}/{job_id}.wav")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_and_path_agree() {
        let id = JobId::from("j-1");
        assert_eq!(
            artifact_rel_path("alice", "my_voice", &id),
            PathBuf::from("alice/my_voice/j-1.wav")
        );
        assert_eq!(
            artifact_url("alice", "my_voice", &id),
            "/outputs/alice/my_voice/j-1.wav"
        );
    }
}
