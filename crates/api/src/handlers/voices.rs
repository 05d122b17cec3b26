//! Handlers for the per-user voice asset library.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use vocalis_core::error::CoreError;
use vocalis_core::voice::{validate_user_id, voice_slug};
use vocalis_store::VoiceEntry;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Response for `POST /api/v1/voices` (201 Created).
#[derive(Debug, Serialize)]
pub struct VoiceCreated {
    pub user_id: String,
    pub voice_id: String,
    pub voice_name: String,
}

/// Response for `GET /api/v1/voices/{user_id}`.
#[derive(Debug, Serialize)]
pub struct VoiceList {
    pub user_id: String,
    pub voices: Vec<VoiceEntry>,
}

/// POST /api/v1/voices
///
/// Upload a reference sample as multipart form data with fields
/// `audio` (the WAV bytes), `user_id`, and `voice_name`. Uploading
/// the same voice name again replaces the previous sample.
pub async fn create_voice(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut audio: Option<Vec<u8>> = None;
    let mut user_id: Option<String> = None;
    let mut voice_name: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart request: {e}")))?
    {
        match field.name() {
            Some("audio") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read audio: {e}")))?;
                audio = Some(bytes.to_vec());
            }
            Some("user_id") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read user_id: {e}")))?;
                user_id = Some(value);
            }
            Some("voice_name") => {
                let value = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read voice_name: {e}"))
                })?;
                voice_name = Some(value);
            }
            _ => {}
        }
    }

    let audio = audio.ok_or_else(|| AppError::BadRequest("Missing audio field".into()))?;
    let user_id = user_id.ok_or_else(|| AppError::BadRequest("Missing user_id field".into()))?;
    let voice_name =
        voice_name.ok_or_else(|| AppError::BadRequest("Missing voice_name field".into()))?;

    validate_user_id(&user_id)?;
    let voice_id = voice_slug(&voice_name)?;

    if audio.is_empty() {
        return Err(CoreError::Validation("Audio upload is empty".into()).into());
    }

    state
        .voices
        .save_sample(&user_id, &voice_id, &voice_name, &audio)
        .await?;

    tracing::info!(
        user_id = %user_id,
        voice_id = %voice_id,
        bytes = audio.len(),
        "Voice sample stored",
    );

    Ok((
        StatusCode::CREATED,
        Json(VoiceCreated {
            user_id,
            voice_id,
            voice_name,
        }),
    ))
}

/// GET /api/v1/voices/{user_id}
///
/// List one user's voices. Unknown users get an empty list.
pub async fn list_voices(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<VoiceList>> {
    validate_user_id(&user_id)?;
    let voices = state.voices.list_for_user(&user_id).await?;
    Ok(Json(VoiceList { user_id, voices }))
}

/// DELETE /api/v1/voices/{user_id}/{voice_id}
///
/// Remove a voice and its reference sample. Jobs already queued
/// against the voice will fail at execution time when the sample is
/// gone; the records stay observable.
pub async fn delete_voice(
    State(state): State<AppState>,
    Path((user_id, voice_id)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    validate_user_id(&user_id)?;

    if !state.voices.delete(&user_id, &voice_id).await? {
        return Err(CoreError::NotFound {
            entity: "Voice",
            id: format!("{user_id}/{voice_id}"),
        }
        .into());
    }

    tracing::info!(user_id = %user_id, voice_id = %voice_id, "Voice deleted");
    Ok(StatusCode::NO_CONTENT)
}
