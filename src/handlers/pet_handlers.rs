//! HTTP handlers for the listing page and pet submissions.
//! Persistence goes through `PetStore`; photos and signed URLs go straight
//! to the shared `ObjectStorage`.

use crate::{
    errors::AppError,
    models::pet::{PetRecord, PetView},
    services::{
        keys,
        object_storage::{ObjectStorage, WriteCondition},
    },
    state::AppState,
    views::index::render_index,
};
use axum::{
    extract::{Multipart, State},
    response::{Html, Redirect},
};
use bytes::Bytes;
use futures::future::join_all;
use std::time::Duration;
use tracing::{error, info, warn};

/// Largest photo accepted by `POST /pets`.
pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

/// Request body limit for `POST /pets`: the photo plus room for text fields
/// and multipart framing.
pub const UPLOAD_BODY_LIMIT: usize = MAX_PHOTO_BYTES + 64 * 1024;

const SIGNED_URL_TTL: Duration = Duration::from_secs(60 * 60);

/// Image source used when a photo URL could not be signed.
const PLACEHOLDER_IMAGE_URL: &str = "#";

const DEFAULT_PHOTO_CONTENT_TYPE: &str = "application/octet-stream";

/// Raw fields as they arrived; any of them may be missing.
#[derive(Debug, Default)]
struct PetSubmission {
    name: Option<String>,
    breed: Option<String>,
    age: Option<String>,
    photo: Option<PhotoUpload>,
}

#[derive(Debug)]
struct PhotoUpload {
    file_name: String,
    content_type: String,
    data: Bytes,
}

/// A submission with every required field present and non-empty.
#[derive(Debug)]
struct NewPet {
    name: String,
    breed: String,
    age: String,
    photo: PhotoUpload,
}

impl PetSubmission {
    fn complete(self) -> Option<NewPet> {
        let present = |value: Option<String>| value.filter(|v| !v.is_empty());
        Some(NewPet {
            name: present(self.name)?,
            breed: present(self.breed)?,
            age: present(self.age)?,
            photo: self.photo?,
        })
    }
}

/// `GET /` — render every pet with a freshly signed photo URL.
pub async fn list_pets(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let records = state.pets.load_all().await.map_err(|err| {
        error!(error = %err, "failed to load pets");
        AppError::internal("Failed to load pets")
    })?;

    let views = join_all(
        records
            .into_iter()
            .map(|record| resolve_image(state.storage.as_ref(), record)),
    )
    .await;

    let html = render_index(&views).map_err(|err| {
        error!(error = %err, "failed to render listing");
        AppError::internal("Failed to render page")
    })?;

    Ok(Html(html))
}

/// Sign one photo URL. A failure only costs this pet its image.
async fn resolve_image(storage: &dyn ObjectStorage, record: PetRecord) -> PetView {
    let image_url = match storage.signed_url(&record.image_key, SIGNED_URL_TTL).await {
        Ok(url) => url,
        Err(err) => {
            warn!(key = %record.image_key, error = %err, "presign failed");
            PLACEHOLDER_IMAGE_URL.to_string()
        }
    };
    PetView { record, image_url }
}

/// `POST /pets` — store the photo, append the record, and send the browser
/// back to the listing.
///
/// A photo stored before a failed append is left in the bucket.
pub async fn create_pet(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Redirect, AppError> {
    let Some(pet) = read_submission(multipart).await?.complete() else {
        return Err(AppError::bad_request("Missing fields"));
    };

    let key = keys::image_key(&pet.photo.file_name);
    let size = pet.photo.data.len();
    state
        .storage
        .put(
            &key,
            pet.photo.data,
            &pet.photo.content_type,
            WriteCondition::Overwrite,
        )
        .await
        .map_err(|err| {
            error!(key = %key, error = %err, "photo upload failed");
            AppError::internal("Upload failed")
        })?;

    let record = PetRecord::new(pet.name, pet.breed, pet.age, key.clone());
    let id = record.id;
    state.pets.append(record).await.map_err(|err| {
        error!(key = %key, error = %err, "photo stored but pet record was not saved");
        AppError::internal("Upload failed")
    })?;

    info!(%id, key = %key, bytes = size, "pet added");
    Ok(Redirect::to("/"))
}

/// Drain the multipart body into a `PetSubmission`. Unknown fields are skipped.
async fn read_submission(mut multipart: Multipart) -> Result<PetSubmission, AppError> {
    let mut submission = PetSubmission::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_owned();
        match name.as_str() {
            "name" => submission.name = Some(field.text().await?),
            "breed" => submission.breed = Some(field.text().await?),
            "age" => submission.age = Some(field.text().await?),
            "photo" => {
                // A part without a filename is a text field, not a file.
                let file_name = field.file_name().unwrap_or_default().to_owned();
                let content_type = field
                    .content_type()
                    .unwrap_or(DEFAULT_PHOTO_CONTENT_TYPE)
                    .to_owned();
                let data = field.bytes().await?;

                if data.len() > MAX_PHOTO_BYTES {
                    return Err(AppError::payload_too_large("Photo exceeds 5 MiB"));
                }
                if !file_name.is_empty() {
                    submission.photo = Some(PhotoUpload {
                        file_name,
                        content_type,
                        data,
                    });
                }
            }
            _ => {}
        }
    }

    Ok(submission)
}
