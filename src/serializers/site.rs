use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, DbErr, Set};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{Represent, category_names, label, not_blank, required_text, user_names};
use crate::models::{contact, faq};

#[derive(Debug, Serialize)]
pub struct FaqOut {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub category: String,
    pub updated_by: String,
    pub is_removed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[async_trait(?Send)]
impl Represent for faq::Model {
    type Output = FaqOut;

    async fn represent_all(db: &DatabaseConnection, rows: Vec<Self>) -> Result<Vec<FaqOut>, DbErr> {
        let categories = category_names(db, rows.iter().map(|f| f.category_id)).await?;
        let editors = user_names(db, rows.iter().map(|f| f.updated_by)).await?;

        Ok(rows
            .into_iter()
            .map(|f| FaqOut {
                id: f.id,
                category: label(&categories, f.category_id),
                updated_by: label(&editors, f.updated_by),
                is_removed: f.lifecycle.is_removed(),
                title: f.title,
                description: f.description,
                created_at: f.created_at,
                updated_at: f.updated_at,
            })
            .collect())
    }
}

#[derive(Debug, Serialize)]
pub struct ContactOut {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    pub is_resolved: bool,
    pub resolved_by: Option<String>,
    pub is_removed: bool,
    pub created_at: DateTime<Utc>,
}

#[async_trait(?Send)]
impl Represent for contact::Model {
    type Output = ContactOut;

    async fn represent_all(
        db: &DatabaseConnection,
        rows: Vec<Self>,
    ) -> Result<Vec<ContactOut>, DbErr> {
        let resolvers = user_names(db, rows.iter().filter_map(|c| c.resolved_by)).await?;

        Ok(rows
            .into_iter()
            .map(|c| ContactOut {
                id: c.id,
                resolved_by: c.resolved_by.map(|id| label(&resolvers, id)),
                is_removed: c.lifecycle.is_removed(),
                name: c.name,
                email: c.email,
                subject: c.subject,
                message: c.message,
                is_resolved: c.is_resolved,
                created_at: c.created_at,
            })
            .collect())
    }
}

/// `updated_by` vient du token : une valeur envoyée par le client est ignorée
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct FaqCreate {
    #[validate(
        custom(function = "required_text"),
        length(max = 255, message = "Ensure this field has no more than 255 characters.")
    )]
    pub title: String,
    #[validate(custom(function = "required_text"))]
    pub description: String,
    pub category: i32,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct FaqUpdate {
    #[validate(
        custom(function = "not_blank"),
        length(max = 255, message = "Ensure this field has no more than 255 characters.")
    )]
    pub title: Option<String>,
    #[validate(custom(function = "not_blank"))]
    pub description: Option<String>,
    pub category: Option<i32>,
}

impl FaqUpdate {
    pub fn apply(self, faq: &mut faq::ActiveModel) {
        if let Some(title) = self.title {
            faq.title = Set(title);
        }
        if let Some(description) = self.description {
            faq.description = Set(description);
        }
        if let Some(category) = self.category {
            faq.category_id = Set(category);
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ContactCreate {
    #[validate(
        custom(function = "required_text"),
        length(max = 100, message = "Ensure this field has no more than 100 characters.")
    )]
    pub name: String,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    #[validate(length(max = 255, message = "Ensure this field has no more than 255 characters."))]
    pub subject: Option<String>,
    #[validate(custom(function = "required_text"))]
    pub message: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ContactUpdate {
    #[validate(
        custom(function = "not_blank"),
        length(max = 100, message = "Ensure this field has no more than 100 characters.")
    )]
    pub name: Option<String>,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
    #[validate(length(max = 255, message = "Ensure this field has no more than 255 characters."))]
    pub subject: Option<String>,
    #[validate(custom(function = "not_blank"))]
    pub message: Option<String>,
}

impl ContactUpdate {
    pub fn apply(self, contact: &mut contact::ActiveModel) {
        if let Some(name) = self.name {
            contact.name = Set(name);
        }
        if let Some(email) = self.email {
            contact.email = Set(email);
        }
        if let Some(subject) = self.subject {
            contact.subject = Set(Some(subject));
        }
        if let Some(message) = self.message {
            contact.message = Set(message);
        }
    }
}
