use super::{ApiError, AppState};
use crate::models::{BuildPromptRequest, ComposedPrompt, GenerateImageRequest, GeneratedImage};
use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};

pub const SERVICE_IDENTITY: &str = "Stadstuin Backend API";

pub async fn index_handler() -> &'static str {
    SERVICE_IDENTITY
}

pub async fn build_prompt_handler(
    State(state): State<AppState>,
    payload: Result<Json<BuildPromptRequest>, JsonRejection>,
) -> Result<Json<ComposedPrompt>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;

    let prompt = state
        .chat
        .compose_prompt(&request.wishes)
        .await
        .map_err(ApiError::compose)?;

    Ok(Json(ComposedPrompt { prompt }))
}

pub async fn generate_image_handler(
    State(state): State<AppState>,
    payload: Result<Json<GenerateImageRequest>, JsonRejection>,
) -> Result<Json<GeneratedImage>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;

    let prompt = match request.prompt {
        Some(prompt) if !prompt.is_empty() => prompt,
        _ => return Err(ApiError::InvalidRequest("Prompt is required".to_string())),
    };

    let image_url = state
        .image_gen
        .generate_image(&prompt)
        .await
        .map_err(ApiError::generate)?;

    Ok(Json(GeneratedImage { image_url }))
}
