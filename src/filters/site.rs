use sea_orm::{ColumnTrait, QueryFilter, QueryTrait, Select};
use serde::Deserialize;

use super::{ResourceFilter, empty_as_none};
use crate::models::{contact, faq};

#[derive(Debug, Default, Deserialize)]
pub struct ContactFilter {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub name: Option<String>,
}

impl ResourceFilter<contact::Entity> for ContactFilter {
    fn apply(&self, select: Select<contact::Entity>) -> Select<contact::Entity> {
        select.apply_if(self.name.clone(), |q, v| q.filter(contact::Column::Name.eq(v)))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct FaqFilter {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub title: Option<String>,
}

impl ResourceFilter<faq::Entity> for FaqFilter {
    fn apply(&self, select: Select<faq::Entity>) -> Select<faq::Entity> {
        select.apply_if(self.title.clone(), |q, v| q.filter(faq::Column::Title.eq(v)))
    }
}
