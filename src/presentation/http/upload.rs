use std::collections::HashMap;

use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;

use crate::application::error::ServiceError;
use crate::bootstrap::app_context::AppContext;
use crate::infrastructure::storage::image_extension;
use crate::presentation::http::error::ApiError;

pub(crate) const IMAGE_FIELD: &str = "image";

pub(crate) struct UploadedImage {
    pub bytes: Vec<u8>,
    pub extension: &'static str,
}

/// Text fields plus the single `image` file part of a multipart form.
pub(crate) struct ImageForm {
    fields: HashMap<String, String>,
    image: Option<UploadedImage>,
}

impl ImageForm {
    pub fn text(&self, name: &str) -> String {
        self.fields.get(name).cloned().unwrap_or_default()
    }

    pub fn take_image(&mut self) -> Result<UploadedImage, ApiError> {
        self.image
            .take()
            .ok_or_else(|| ApiError::unprocessable("an image is required"))
    }
}

pub(crate) async fn read_image_form(
    mut multipart: Multipart,
    max_bytes: usize,
) -> Result<ImageForm, ApiError> {
    let mut fields = HashMap::new();
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, "malformed multipart body"))?
    {
        let Some(name) = field.name().map(|s| s.to_string()) else {
            continue;
        };
        if name == IMAGE_FIELD {
            let extension = image_extension(field.content_type(), field.file_name())
                .ok_or_else(|| ApiError::unprocessable("only png and jpeg images are accepted"))?;
            let data = field
                .bytes()
                .await
                .map_err(|e| multipart_error(e, "could not read uploaded image"))?;
            // DefaultBodyLimit bounds the whole body; this bounds the image itself.
            if data.len() > max_bytes {
                return Err(ApiError::payload_too_large());
            }
            image = Some(UploadedImage {
                bytes: data.to_vec(),
                extension,
            });
        } else {
            let text = field
                .text()
                .await
                .map_err(|e| multipart_error(e, "malformed multipart field"))?;
            fields.insert(name, text);
        }
    }

    Ok(ImageForm { fields, image })
}

// A body cut off by `DefaultBodyLimit` surfaces as a multipart error.
fn multipart_error(err: MultipartError, message: &str) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::payload_too_large()
    } else {
        ApiError::bad_request(message)
    }
}

/// Persists the image and returns its stored reference.
pub(crate) async fn store_image(ctx: &AppContext, image: &UploadedImage) -> Result<String, ApiError> {
    let stored = ctx
        .images()
        .store_image(image.extension, &image.bytes)
        .await
        .map_err(ServiceError::from)?;
    tracing::debug!(image = %stored.reference, size = stored.size, "image_stored");
    Ok(stored.reference)
}

#[cfg(test)]
pub(crate) mod test_forms {
    use axum::body::Body;
    use axum::extract::{FromRequest, Multipart};
    use axum::http::Request;

    const BOUNDARY: &str = "places-form-boundary";

    pub struct FilePart<'a> {
        pub content_type: &'a str,
        pub filename: &'a str,
        pub bytes: &'a [u8],
    }

    pub fn png(bytes: &[u8]) -> FilePart<'_> {
        FilePart {
            content_type: "image/png",
            filename: "photo.png",
            bytes,
        }
    }

    /// Builds a `multipart/form-data` body with the given text fields and an
    /// optional `image` part.
    pub async fn multipart(fields: &[(&str, &str)], image: Option<FilePart<'_>>) -> Multipart {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some(file) = image {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                    file.filename, file.content_type
                )
                .as_bytes(),
            );
            body.extend_from_slice(file.bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        let req = Request::builder()
            .method("POST")
            .uri("/")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        Multipart::from_request(req, &()).await.unwrap()
    }
}
