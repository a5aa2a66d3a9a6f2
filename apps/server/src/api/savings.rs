use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use nestfund_core::errors::ValidationError;
use nestfund_core::savings::{ImageUpload, Saving, SavingDraft, SavingStatus, SavingWithOwner};

use crate::{
    auth::CurrentUser,
    error::{ApiError, ApiResult},
    main_lib::AppState,
    models::ApiResponse,
};

pub async fn list_savings(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ApiResponse<Vec<Saving>>>> {
    let savings = state.saving_service.get_savings()?;
    Ok(Json(ApiResponse::success("List of all savings", savings)))
}

pub async fn show_saving(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ApiResponse<SavingWithOwner>>> {
    let detail = state.saving_service.get_saving(&id)?;
    Ok(Json(ApiResponse::success("Saving detail", detail)))
}

pub async fn list_by_status(
    Path(status): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Json<ApiResponse<Vec<Saving>>>> {
    let status: SavingStatus = status.parse().map_err(|_| {
        ApiError::BadRequest("Invalid status. Use \"in_progress\" or \"achieved\".".to_string())
    })?;
    let savings = state
        .saving_service
        .get_savings_by_status(&current.user, status)?;
    Ok(Json(ApiResponse::success(
        format!("List of {status} savings"),
        savings,
    )))
}

#[derive(Default)]
struct SavingForm {
    name: Option<String>,
    target_amount: Option<String>,
    saving_frequency: Option<String>,
    nominal_per_frequency: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
    image: Option<ImageUpload>,
}

fn require_text(value: Option<String>, field: &str) -> Result<String, ApiError> {
    value.ok_or_else(|| ApiError::Core(ValidationError::MissingField(field.to_string()).into()))
}

fn parse_number(value: Option<String>, field: &str) -> Result<i64, ApiError> {
    let raw = require_text(value, field)?;
    raw.trim()
        .parse::<i64>()
        .map_err(|e| ApiError::Core(ValidationError::from(e).into()))
}

fn parse_date(value: Option<String>, field: &str) -> Result<NaiveDate, ApiError> {
    let raw = require_text(value, field)?;
    raw.trim()
        .parse::<NaiveDate>()
        .map_err(|e| ApiError::Core(ValidationError::from(e).into()))
}

async fn collect_form(multipart: &mut Multipart) -> Result<SavingForm, ApiError> {
    let mut form = SavingForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart request: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        if name == "image" {
            let filename = field
                .file_name()
                .map(str::to_string)
                .ok_or_else(|| ApiError::BadRequest("Invalid file upload".to_string()))?;
            let content_type = field.content_type().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Malformed multipart request: {e}")))?;
            if bytes.is_empty() {
                return Err(ApiError::BadRequest("Invalid file upload".to_string()));
            }
            form.image = Some(ImageUpload {
                filename,
                content_type,
                bytes: bytes.to_vec(),
            });
            continue;
        }
        let value = field
            .text()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Malformed multipart request: {e}")))?;
        match name.as_str() {
            "name" => form.name = Some(value),
            "target_amount" => form.target_amount = Some(value),
            "saving_frequency" => form.saving_frequency = Some(value),
            "nominal_per_frequency" => form.nominal_per_frequency = Some(value),
            "start_date" => form.start_date = Some(value),
            "end_date" => form.end_date = Some(value),
            _ => {}
        }
    }
    Ok(form)
}

pub async fn create_saving(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<ApiResponse<Saving>>)> {
    let form = collect_form(&mut multipart).await?;

    let draft = SavingDraft {
        name: require_text(form.name, "name")?,
        target_amount: parse_number(form.target_amount, "target amount")?,
        saving_frequency: require_text(form.saving_frequency, "saving frequency")?
            .parse()
            .map_err(ApiError::Core)?,
        nominal_per_frequency: parse_number(form.nominal_per_frequency, "nominal per frequency")?,
        start_date: parse_date(form.start_date, "start date")?,
        end_date: parse_date(form.end_date, "end date")?,
    };
    let upload = form
        .image
        .ok_or_else(|| ApiError::BadRequest("No file uploaded".to_string()))?;

    let saving = state
        .saving_service
        .create_saving(&current.user, draft, upload)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Saving successfully created", saving)),
    ))
}

#[derive(Deserialize)]
pub struct AddContributionRequest {
    pub amount: i64,
}

pub async fn add_contribution(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Json(body): Json<AddContributionRequest>,
) -> ApiResult<Json<ApiResponse<Saving>>> {
    let saving = state
        .saving_service
        .add_contribution(&current.user, &id, body.amount)
        .await?;
    Ok(Json(ApiResponse::success(
        "Saving balance updated successfully",
        saving,
    )))
}

pub async fn delete_saving(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Json<ApiResponse<()>>> {
    state.saving_service.delete_saving(&current.user, &id).await?;
    Ok(Json(ApiResponse::message_only("Saving successfully deleted")))
}

pub async fn update_saving(Path(_id): Path<String>) -> ApiResult<Json<ApiResponse<()>>> {
    Err(ApiError::NotImplemented(
        "Updating a saving is not supported; delete it and create a new one".to_string(),
    ))
}
