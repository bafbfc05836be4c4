//! Sample domain record edited by the CLI

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tablewithaccept_core::domain::{DomainError, FnValidator, Record, Validator};
use tablewithaccept_core::port::{IdProvider, ItemFactory};
use uuid::Uuid;

/// Editable fields, in column order
pub const FIELDS: [&str; 3] = ["name", "email", "phone"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl Contact {
    pub fn new(id: Uuid, name: &str, email: &str, phone: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
        }
    }
}

impl Record for Contact {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Set one field by name
pub fn set_field(contact: &mut Contact, field: &str, value: &str) -> Result<()> {
    let value = value.trim().to_string();
    match field {
        "name" => contact.name = value,
        "email" => contact.email = value,
        "phone" => contact.phone = value,
        other => bail!("Unknown field '{}' (expected one of: {})", other, FIELDS.join(", ")),
    }
    Ok(())
}

/// Name is required, email must look like an address, phone is optional
pub fn validator() -> Arc<dyn Validator<Contact>> {
    Arc::new(FnValidator::new(|contact: &Contact| {
        if contact.name.trim().is_empty() {
            return Err(DomainError::ValidationError("name is required".to_string()));
        }
        match contact.email.split_once('@') {
            Some((user, domain)) if !user.is_empty() && domain.contains('.') => {}
            _ => {
                return Err(DomainError::ValidationError(format!(
                    "invalid email '{}'",
                    contact.email
                )))
            }
        }
        let phone_ok = contact
            .phone
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'));
        if !phone_ok {
            return Err(DomainError::ValidationError(format!(
                "invalid phone '{}'",
                contact.phone
            )));
        }
        Ok(())
    }))
}

/// Builds blank contacts with fresh ids
pub struct ContactFactory {
    ids: Arc<dyn IdProvider>,
}

impl ContactFactory {
    pub fn new(ids: Arc<dyn IdProvider>) -> Self {
        Self { ids }
    }
}

impl ItemFactory<Contact> for ContactFactory {
    fn create(&self) -> tablewithaccept_core::Result<Contact> {
        Ok(Contact::new(self.ids.generate_id(), "", "", ""))
    }
}
