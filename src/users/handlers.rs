use std::path::Path as FilePath;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use time::OffsetDateTime;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::users::dto::{DeleteResponse, ListParams, UserList};
use crate::users::model::User;
use crate::users::validate::{is_valid_age, is_valid_email};

struct AvatarUpload {
    file_name: String,
    body: Bytes,
}

/// Multipart form fields shared by create and update. Missing and empty
/// fields are both treated as "not supplied".
#[derive(Default)]
struct UserForm {
    name: String,
    age: String,
    note: String,
    email: String,
    avatar: Option<AvatarUpload>,
}

async fn read_form(mut mp: Multipart) -> Result<UserForm> {
    let mut form = UserForm::default();
    while let Some(field) = mp
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("invalid multipart body: {}", e)))?
    {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("name") => form.name = read_text(field).await?,
            Some("age") => form.age = read_text(field).await?,
            Some("note") => form.note = read_text(field).await?,
            Some("email") => form.email = read_text(field).await?,
            Some("avatar") => {
                let file_name = field
                    .file_name()
                    .map(|s| s.to_string())
                    .ok_or_else(|| AppError::validation("avatar file name is missing"))?;
                let body = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::validation(format!("invalid avatar upload: {}", e)))?;
                form.avatar = Some(AvatarUpload { file_name, body });
            }
            _ => {}
        }
    }
    Ok(form)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::validation(format!("invalid form field: {}", e)))
}

/// Parses and range-checks an age field, returning the age together with the
/// derived year of birth.
fn parse_age(age_str: &str) -> Result<(i32, Option<i32>)> {
    if age_str.is_empty() {
        return Ok((0, None));
    }
    let age: i32 = age_str
        .parse()
        .map_err(|_| AppError::validation("invalid age"))?;
    if !is_valid_age(age) {
        return Err(AppError::validation("age must be between 1 and 100"));
    }
    let year_of_birth = OffsetDateTime::now_utc().year() - age;
    Ok((age, Some(year_of_birth)))
}

/// Only .jpg and .png uploads are accepted; the match is case-sensitive.
fn validate_avatar(avatar: &AvatarUpload) -> Result<String> {
    match FilePath::new(&avatar.file_name)
        .extension()
        .and_then(|e| e.to_str())
    {
        Some(ext @ ("jpg" | "png")) => Ok(ext.to_string()),
        _ => Err(AppError::validation(
            "invalid file type, only JPG and PNG are allowed",
        )),
    }
}

fn parse_user_id(user_id: &str) -> Result<Uuid> {
    user_id
        .parse()
        .map_err(|_| AppError::validation("invalid user id format"))
}

#[instrument(skip(state, mp))]
pub async fn create(State(state): State<AppState>, mp: Multipart) -> Result<(StatusCode, Json<User>)> {
    let form = read_form(mp).await?;

    let (age, year_of_birth) = parse_age(&form.age)?;

    if form.name.is_empty() || form.email.is_empty() || age == 0 {
        return Err(AppError::validation("fill required fields"));
    }

    if !is_valid_email(&form.email) {
        warn!(email = %form.email, "invalid email format");
        return Err(AppError::validation("invalid email format"));
    }

    if state.store.find_by_email(&form.email).await?.is_some() {
        warn!(email = %form.email, "email already exists");
        return Err(AppError::DuplicateEmail);
    }

    let avatar = form
        .avatar
        .ok_or_else(|| AppError::validation("avatar file is required"))?;
    let avatar_type = validate_avatar(&avatar)?;

    let now = OffsetDateTime::now_utc();
    let user = User {
        id: Uuid::new_v4(),
        name: form.name,
        avatar_name: avatar.file_name.clone(),
        avatar_type,
        age,
        year_of_birth,
        note: if form.note.is_empty() {
            None
        } else {
            Some(form.note)
        },
        email: form.email,
        created_at: now,
        updated_at: now,
    };

    // File first, record second: an insert failure can orphan a file, but a
    // record never points at a file that was not written.
    state.avatars.save(&avatar.file_name, avatar.body).await?;
    let user = state.store.insert(user).await?;

    info!(user_id = %user.id, email = %user.email, "user created");
    Ok((StatusCode::CREATED, Json(user)))
}

#[instrument(skip(state, mp))]
pub async fn update(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    mp: Multipart,
) -> Result<Json<User>> {
    let id = parse_user_id(&user_id)?;

    let mut user = match state.store.find_by_id(id).await? {
        Some(u) => u,
        None => {
            warn!(%user_id, "update target not found");
            return Err(AppError::validation("user not found"));
        }
    };

    let form = read_form(mp).await?;

    if !form.name.is_empty() {
        user.name = form.name;
    }

    if !form.age.is_empty() {
        let (age, year_of_birth) = parse_age(&form.age)?;
        user.age = age;
        user.year_of_birth = year_of_birth;
    }

    if !form.note.is_empty() {
        if form.note == "clean" {
            // The sentinel unsets the field right away, as its own write.
            state.store.clear_note(id).await?;
            user.note = None;
        } else {
            user.note = Some(form.note);
        }
    }

    if !form.email.is_empty() {
        if !is_valid_email(&form.email) {
            warn!(email = %form.email, "invalid email format");
            return Err(AppError::validation("invalid email format"));
        }
        // Keeping the current email is always fine; anything else must not
        // belong to another record.
        if form.email != user.email && state.store.find_by_email(&form.email).await?.is_some() {
            warn!(email = %form.email, "email already exists");
            return Err(AppError::DuplicateEmail);
        }
        user.email = form.email;
    }

    if let Some(avatar) = form.avatar {
        let avatar_type = validate_avatar(&avatar)?;
        state.avatars.save(&avatar.file_name, avatar.body).await?;
        user.avatar_name = avatar.file_name;
        user.avatar_type = avatar_type;
    }

    user.updated_at = OffsetDateTime::now_utc();
    state.store.update(&user).await?;

    info!(user_id = %user.id, "user updated");
    Ok(Json(user))
}

#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<UserList>> {
    let limit: i64 = params
        .limit
        .as_deref()
        .unwrap_or("10")
        .parse()
        .map_err(|_| AppError::validation("invalid limit value"))?;
    let page: i64 = params
        .page
        .as_deref()
        .unwrap_or("1")
        .parse()
        .map_err(|_| AppError::validation("invalid page value"))?;

    if limit <= 0 || page <= 0 {
        return Err(AppError::validation("limit and page must be positive"));
    }

    let skip = (page - 1)
        .checked_mul(limit)
        .ok_or_else(|| AppError::validation("invalid page value"))?;
    let data = state.store.list(limit, skip).await?;
    let count = state.store.count().await?;

    Ok(Json(UserList { count, data }))
}

#[instrument(skip(state))]
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<User>> {
    let id = parse_user_id(&user_id)?;

    match state.store.find_by_id(id).await? {
        Some(user) => Ok(Json(user)),
        None => Err(AppError::not_found("user not found")),
    }
}

#[instrument(skip(state))]
pub async fn delete_by_id(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let id = parse_user_id(&user_id)?;

    state.store.delete(id).await?;

    info!(%user_id, "user deleted");
    Ok(Json(DeleteResponse { success: true }))
}
