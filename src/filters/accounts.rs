use sea_orm::{ColumnTrait, QueryFilter, QueryTrait, Select};
use serde::Deserialize;

use super::{ResourceFilter, empty_as_none};
use crate::models::{profile, users};

#[derive(Debug, Default, Deserialize)]
pub struct UserFilter {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub username: Option<String>,
}

impl ResourceFilter<users::Entity> for UserFilter {
    fn apply(&self, select: Select<users::Entity>) -> Select<users::Entity> {
        select.apply_if(self.username.clone(), |q, v| {
            q.filter(users::Column::Username.eq(v))
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ProfileFilter {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub user: Option<i32>,
}

impl ResourceFilter<profile::Entity> for ProfileFilter {
    fn apply(&self, select: Select<profile::Entity>) -> Select<profile::Entity> {
        select.apply_if(self.user, |q, v| q.filter(profile::Column::UserId.eq(v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::sql;
    use actix_web::web::Query;
    use sea_orm::EntityTrait;

    #[test]
    fn test_username_filter() {
        let filter = Query::<UserFilter>::from_query("username=alice&page=3").unwrap();
        let query = sql(filter.apply(users::Entity::find()));
        assert!(query.contains(r#""users"."username" = 'alice'"#));
    }

    #[test]
    fn test_empty_profile_filter_adds_nothing() {
        let filter = Query::<ProfileFilter>::from_query("user=").unwrap();
        assert_eq!(
            sql(filter.apply(profile::Entity::find())),
            sql(profile::Entity::find())
        );
    }
}
