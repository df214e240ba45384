//! Multipart patient form extraction

use axum::extract::Multipart;
use medrec_core::PatientFields;

use crate::error::ApiError;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// A parsed create/update submission: validated scalar fields plus the
/// optional image payload.
pub struct PatientForm {
    pub fields: PatientFields,
    pub image: Option<ImageUpload>,
}

pub struct ImageUpload {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Drain a `multipart/form-data` body into a [`PatientForm`].
///
/// Unknown parts are ignored; an `image` part with an empty body counts as
/// "no image", which is how browsers submit an untouched file input.
pub async fn read_patient_form(mut multipart: Multipart) -> Result<PatientForm, ApiError> {
    let mut first_name = String::new();
    let mut last_name = String::new();
    let mut birthday = String::new();
    let mut description = String::new();
    let mut primary_doctor = String::new();
    let mut image = None;

    while let Some(field) = next_field(&mut multipart).await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "firstName" => first_name = field_text(field, &name).await?,
            "lastName" => last_name = field_text(field, &name).await?,
            "birthday" => birthday = field_text(field, &name).await?,
            "description" => description = field_text(field, &name).await?,
            "primaryDoctor" => primary_doctor = field_text(field, &name).await?,
            "image" => {
                let content_type = field
                    .content_type()
                    .unwrap_or(FALLBACK_CONTENT_TYPE)
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|err| ApiError::Validation(format!("unreadable image upload: {err}")))?;
                if !bytes.is_empty() {
                    image = Some(ImageUpload {
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            _ => {}
        }
    }

    let fields = PatientFields::parse(
        &first_name,
        &last_name,
        &birthday,
        &description,
        &primary_doctor,
    )?;

    Ok(PatientForm { fields, image })
}

async fn next_field(
    multipart: &mut Multipart,
) -> Result<Option<axum::extract::multipart::Field<'_>>, ApiError> {
    multipart
        .next_field()
        .await
        .map_err(|err| ApiError::Validation(format!("malformed multipart body: {err}")))
}

async fn field_text(
    field: axum::extract::multipart::Field<'_>,
    name: &str,
) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|err| ApiError::Validation(format!("unreadable field {name}: {err}")))
}
