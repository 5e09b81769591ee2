//! Public contact-form submission

use log::info;
use serde::Deserialize;
use validator::Validate;

use super::HttpGateway;
use crate::error::Result;
use crate::fetch::Fetch;
use crate::models::ContactForm;

/// Acknowledgement returned by `/api/contact`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ContactReceipt {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub id: Option<i64>,
}

impl HttpGateway {
    /// Validate and send the public contact form.
    ///
    /// An invalid form returns `Error::Validation` without touching the
    /// network.
    pub async fn submit_contact(&self, form: &ContactForm) -> Result<ContactReceipt> {
        let form = form.normalized();
        form.validate()?;

        let url = self.site_url("api/contact")?;
        let receipt: ContactReceipt = self
            .request(Fetch::post(self.client(), url))
            .json(&form)?
            .execute()
            .await?;
        info!("contact form from {} accepted", form.email);
        Ok(receipt)
    }
}
