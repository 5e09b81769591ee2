//! Contact-form submissions and the admin inbox

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use super::{optional_text, required_id, required_text, ContentKind, Record};
use crate::error::{Error, Result};

/// Processing status of a contact message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ContactStatus {
    #[default]
    #[serde(rename = "nouveau")]
    New,
    #[serde(rename = "lu")]
    Read,
    #[serde(rename = "traité")]
    Handled,
}

impl ContactStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactStatus::New => "nouveau",
            ContactStatus::Read => "lu",
            ContactStatus::Handled => "traité",
        }
    }

    fn rank(&self) -> u8 {
        match self {
            ContactStatus::New => 0,
            ContactStatus::Read => 1,
            ContactStatus::Handled => 2,
        }
    }

    /// Statuses only move forward; skipping "lu" is allowed
    pub fn can_become(&self, next: ContactStatus) -> bool {
        next.rank() > self.rank()
    }

    pub fn transition(self, next: ContactStatus) -> Result<ContactStatus> {
        if self.can_become(next) {
            Ok(next)
        } else {
            Err(Error::InvalidTransition { from: self, to: next })
        }
    }
}

impl fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessageData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ContactStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContactMessage {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub subject: Option<String>,
    pub message: String,
    pub status: ContactStatus,
    pub created_at: Option<DateTime<Utc>>,
}

impl Record for ContactMessage {
    type Data = ContactMessageData;

    const KIND: ContentKind = ContentKind::Contact;

    fn from_wire(data: ContactMessageData) -> Result<Self> {
        let id = required_id(data.id, Self::KIND)?;

        Ok(Self {
            id,
            name: required_text(data.name, Self::KIND, id, "name")?,
            email: required_text(data.email, Self::KIND, id, "email")?,
            phone: optional_text(data.phone),
            company: optional_text(data.company),
            subject: optional_text(data.subject),
            message: optional_text(data.message).unwrap_or_default(),
            status: data.status.unwrap_or_default(),
            created_at: data.created_at,
        })
    }

    fn id(&self) -> i64 {
        self.id
    }
}

/// Public contact form, checked before anything is sent
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    #[validate(length(min = 2, max = 100))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(max = 30))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[validate(length(max = 150))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    #[validate(length(max = 200))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    #[validate(length(min = 10, max = 5000))]
    pub message: String,
}

impl ContactForm {
    /// Trim every field and drop blank optionals
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: optional_text(self.phone.clone()),
            company: optional_text(self.company.clone()),
            subject: optional_text(self.subject.clone()),
            message: self.message.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn statuses_move_forward_only() {
        assert!(ContactStatus::New.can_become(ContactStatus::Read));
        assert!(ContactStatus::New.can_become(ContactStatus::Handled));
        assert!(ContactStatus::Read.can_become(ContactStatus::Handled));
        assert!(!ContactStatus::Handled.can_become(ContactStatus::Read));
        assert!(!ContactStatus::Read.can_become(ContactStatus::Read));

        let err = ContactStatus::Handled.transition(ContactStatus::New).unwrap_err();
        assert!(matches!(err, Error::InvalidTransition { .. }));
    }

    #[test]
    fn status_uses_french_wire_names() {
        assert_eq!(serde_json::to_value(ContactStatus::Handled).unwrap(), json!("traité"));
        let parsed: ContactStatus = serde_json::from_value(json!("lu")).unwrap();
        assert_eq!(parsed, ContactStatus::Read);
    }

    #[test]
    fn message_defaults_to_new() {
        let data: ContactMessageData = serde_json::from_value(json!({
            "id": 4, "name": "Salma", "email": "salma@example.ma", "message": "Bonjour"
        }))
        .unwrap();
        assert_eq!(ContactMessage::from_wire(data).unwrap().status, ContactStatus::New);
    }

    #[test]
    fn form_rejects_bad_email_and_short_message() {
        let form = ContactForm {
            name: "Youssef".to_string(),
            email: "not-an-email".to_string(),
            message: "court".to_string(),
            ..Default::default()
        };
        let errors = form.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("message"));
        assert!(!fields.contains_key("name"));
    }

    #[test]
    fn normalized_form_drops_blank_optionals() {
        let form = ContactForm {
            name: "  Youssef ".to_string(),
            email: "y@example.ma ".to_string(),
            phone: Some("   ".to_string()),
            message: "Demande de devis pour une étude".to_string(),
            ..Default::default()
        };
        let clean = form.normalized();
        assert_eq!(clean.name, "Youssef");
        assert_eq!(clean.phone, None);
        assert!(clean.validate().is_ok());
    }
}
