//! Image upload for record illustrations

use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use super::HttpGateway;
use crate::error::{Error, Result};
use crate::fetch::Fetch;

/// Largest image accepted before sending
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
}

impl HttpGateway {
    /// Upload an image as multipart field `file`; returns its public URL
    pub async fn upload_image(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        mime: &str,
    ) -> Result<String> {
        if !mime.starts_with("image/") {
            return Err(Error::validation(format!("{} is not an image type", mime)));
        }
        if bytes.is_empty() {
            return Err(Error::validation("image is empty"));
        }
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(Error::validation(format!(
                "image is {} bytes, limit is {}",
                bytes.len(),
                MAX_UPLOAD_BYTES
            )));
        }

        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime)?;
        let form = Form::new().part("file", part);

        let url = self.site_url("api/upload")?;
        let response: UploadResponse = self
            .request(Fetch::post(self.client(), url))
            .multipart(form)
            .execute()
            .await?;
        Ok(response.url)
    }
}
