use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, DbErr, Set};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{
    Represent, category_names, collection_names, decimal_to_f64, label, non_negative, not_blank,
    nft_names, positive, required_text, user_names,
};
use crate::models::nft::SaleType;
use crate::models::{category, collection, favourite_nft, nft, nft_price_history, reported_nft};

// ============================================================================
// SORTIE
// ============================================================================

#[derive(Debug, Serialize)]
pub struct CategoryOut {
    pub id: i32,
    pub name: String,
    pub is_active: bool,
    pub is_removed: bool,
    pub created_at: DateTime<Utc>,
}

#[async_trait(?Send)]
impl Represent for category::Model {
    type Output = CategoryOut;

    async fn represent_all(
        _db: &DatabaseConnection,
        rows: Vec<Self>,
    ) -> Result<Vec<CategoryOut>, DbErr> {
        Ok(rows
            .into_iter()
            .map(|c| CategoryOut {
                id: c.id,
                name: c.name,
                is_active: c.is_active,
                is_removed: c.lifecycle.is_removed(),
                created_at: c.created_at,
            })
            .collect())
    }
}

#[derive(Debug, Serialize)]
pub struct CollectionOut {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub user: String,
    pub is_removed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[async_trait(?Send)]
impl Represent for collection::Model {
    type Output = CollectionOut;

    async fn represent_all(
        db: &DatabaseConnection,
        rows: Vec<Self>,
    ) -> Result<Vec<CollectionOut>, DbErr> {
        let categories = category_names(db, rows.iter().map(|c| c.category_id)).await?;
        let users = user_names(db, rows.iter().map(|c| c.user_id)).await?;

        Ok(rows
            .into_iter()
            .map(|c| CollectionOut {
                id: c.id,
                category: label(&categories, c.category_id),
                user: label(&users, c.user_id),
                is_removed: c.lifecycle.is_removed(),
                name: c.name,
                description: c.description,
                created_at: c.created_at,
                updated_at: c.updated_at,
            })
            .collect())
    }
}

#[derive(Debug, Serialize)]
pub struct NftOut {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub royalty: f64,
    pub size: Option<String>,
    pub no_of_copies: i32,
    pub price: f64,
    pub sale_type: SaleType,
    pub total_views: i32,
    pub is_hidden: bool,
    pub is_put_on_sale: bool,
    pub collection: String,
    pub owner: String,
    pub is_removed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[async_trait(?Send)]
impl Represent for nft::Model {
    type Output = NftOut;

    async fn represent_all(db: &DatabaseConnection, rows: Vec<Self>) -> Result<Vec<NftOut>, DbErr> {
        let collections = collection_names(db, rows.iter().map(|n| n.collection_id)).await?;
        let owners = user_names(db, rows.iter().map(|n| n.owner_id)).await?;

        Ok(rows
            .into_iter()
            .map(|n| NftOut {
                id: n.id,
                royalty: decimal_to_f64(n.royalty),
                price: decimal_to_f64(n.price),
                collection: label(&collections, n.collection_id),
                owner: label(&owners, n.owner_id),
                is_removed: n.lifecycle.is_removed(),
                name: n.name,
                description: n.description,
                image: n.image,
                size: n.size,
                no_of_copies: n.no_of_copies,
                sale_type: n.sale_type,
                total_views: n.total_views,
                is_hidden: n.is_hidden,
                is_put_on_sale: n.is_put_on_sale,
                created_at: n.created_at,
                updated_at: n.updated_at,
            })
            .collect())
    }
}

#[derive(Debug, Serialize)]
pub struct FavouriteNftOut {
    pub id: i32,
    pub user: String,
    pub nft: String,
    pub is_favorite: bool,
    pub date: DateTime<Utc>,
    pub is_removed: bool,
}

#[async_trait(?Send)]
impl Represent for favourite_nft::Model {
    type Output = FavouriteNftOut;

    async fn represent_all(
        db: &DatabaseConnection,
        rows: Vec<Self>,
    ) -> Result<Vec<FavouriteNftOut>, DbErr> {
        let users = user_names(db, rows.iter().map(|f| f.user_id)).await?;
        let nfts = nft_names(db, rows.iter().map(|f| f.nft_id)).await?;

        Ok(rows
            .into_iter()
            .map(|f| FavouriteNftOut {
                id: f.id,
                user: label(&users, f.user_id),
                nft: label(&nfts, f.nft_id),
                is_favorite: f.is_favorite,
                date: f.date,
                is_removed: f.lifecycle.is_removed(),
            })
            .collect())
    }
}

#[derive(Debug, Serialize)]
pub struct ReportedNftOut {
    pub id: i32,
    pub nft: String,
    pub reporter: String,
    pub report_type: String,
    pub description: Option<String>,
    pub is_resolved: bool,
    pub is_removed: bool,
    pub created_at: DateTime<Utc>,
}

#[async_trait(?Send)]
impl Represent for reported_nft::Model {
    type Output = ReportedNftOut;

    async fn represent_all(
        db: &DatabaseConnection,
        rows: Vec<Self>,
    ) -> Result<Vec<ReportedNftOut>, DbErr> {
        let nfts = nft_names(db, rows.iter().map(|r| r.nft_id)).await?;
        let reporters = user_names(db, rows.iter().map(|r| r.reporter_id)).await?;

        Ok(rows
            .into_iter()
            .map(|r| ReportedNftOut {
                id: r.id,
                nft: label(&nfts, r.nft_id),
                reporter: label(&reporters, r.reporter_id),
                is_removed: r.lifecycle.is_removed(),
                report_type: r.report_type,
                description: r.description,
                is_resolved: r.is_resolved,
                created_at: r.created_at,
            })
            .collect())
    }
}

#[derive(Debug, Serialize)]
pub struct PriceHistoryOut {
    pub id: i32,
    pub nft: String,
    pub price: f64,
    pub date: DateTime<Utc>,
    pub is_removed: bool,
}

#[async_trait(?Send)]
impl Represent for nft_price_history::Model {
    type Output = PriceHistoryOut;

    async fn represent_all(
        db: &DatabaseConnection,
        rows: Vec<Self>,
    ) -> Result<Vec<PriceHistoryOut>, DbErr> {
        let nfts = nft_names(db, rows.iter().map(|h| h.nft_id)).await?;

        Ok(rows
            .into_iter()
            .map(|h| PriceHistoryOut {
                id: h.id,
                nft: label(&nfts, h.nft_id),
                price: decimal_to_f64(h.price),
                date: h.date,
                is_removed: h.lifecycle.is_removed(),
            })
            .collect())
    }
}

// ============================================================================
// ENTRÉE
// ============================================================================

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CategoryCreate {
    #[validate(
        custom(function = "required_text"),
        length(max = 100, message = "Ensure this field has no more than 100 characters.")
    )]
    pub name: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CategoryUpdate {
    #[validate(
        custom(function = "not_blank"),
        length(max = 100, message = "Ensure this field has no more than 100 characters.")
    )]
    pub name: Option<String>,
    pub is_active: Option<bool>,
}

impl CategoryUpdate {
    pub fn apply(self, category: &mut category::ActiveModel) {
        if let Some(name) = self.name {
            category.name = Set(name);
        }
        if let Some(is_active) = self.is_active {
            category.is_active = Set(is_active);
        }
    }
}

/// `user` vient du token : une valeur envoyée par le client est ignorée
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CollectionCreate {
    #[validate(
        custom(function = "required_text"),
        length(max = 255, message = "Ensure this field has no more than 255 characters.")
    )]
    pub name: String,
    pub description: Option<String>,
    pub category: i32,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CollectionUpdate {
    #[validate(
        custom(function = "not_blank"),
        length(max = 255, message = "Ensure this field has no more than 255 characters.")
    )]
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<i32>,
}

impl CollectionUpdate {
    pub fn apply(self, collection: &mut collection::ActiveModel) {
        if let Some(name) = self.name {
            collection.name = Set(name);
        }
        if let Some(description) = self.description {
            collection.description = Set(Some(description));
        }
        if let Some(category) = self.category {
            collection.category_id = Set(category);
        }
    }
}

fn one_copy() -> i32 {
    1
}

/// Création d'un NFT par l'API : sale_type et owner ne viennent pas du client
/// `owner` vient du token : une valeur envoyée par le client est ignorée
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct NftCreate {
    #[validate(
        custom(function = "required_text"),
        length(max = 255, message = "Ensure this field has no more than 255 characters.")
    )]
    pub name: String,
    pub description: Option<String>,
    #[validate(url(message = "Enter a valid URL."))]
    pub image: Option<String>,
    #[validate(custom(function = "non_negative"))]
    pub royalty: Decimal,
    pub size: Option<String>,
    #[serde(default = "one_copy")]
    #[validate(range(min = 1, message = "Ensure this value is greater than or equal to 1."))]
    pub no_of_copies: i32,
    #[validate(custom(function = "non_negative"))]
    pub price: Decimal,
    pub collection: i32,
}

/// Formulaire du panel admin : l'admin choisit le propriétaire et le type de vente
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NftForm {
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub royalty: Decimal,
    pub size: Option<String>,
    #[serde(default = "one_copy")]
    pub no_of_copies: i32,
    pub price: Decimal,
    pub collection: i32,
    pub owner: i32,
    pub sale_type: SaleType,
}

impl NftForm {
    pub fn split(self) -> (NftCreate, i32, SaleType) {
        let payload = NftCreate {
            name: self.name,
            description: self.description,
            image: self.image,
            royalty: self.royalty,
            size: self.size,
            no_of_copies: self.no_of_copies,
            price: self.price,
            collection: self.collection,
        };
        (payload, self.owner, self.sale_type)
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct NftUpdate {
    #[validate(
        custom(function = "not_blank"),
        length(max = 255, message = "Ensure this field has no more than 255 characters.")
    )]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(url(message = "Enter a valid URL."))]
    pub image: Option<String>,
    #[validate(custom(function = "non_negative"))]
    pub royalty: Option<Decimal>,
    pub size: Option<String>,
    #[validate(range(min = 1, message = "Ensure this value is greater than or equal to 1."))]
    pub no_of_copies: Option<i32>,
    #[validate(custom(function = "non_negative"))]
    pub price: Option<Decimal>,
    pub sale_type: Option<SaleType>,
    pub is_put_on_sale: Option<bool>,
    pub collection: Option<i32>,
}

impl NftUpdate {
    /// Applique les champs présents ; le prix est géré à part (historique)
    pub fn apply(self, nft: &mut nft::ActiveModel) {
        if let Some(name) = self.name {
            nft.name = Set(name);
        }
        if let Some(description) = self.description {
            nft.description = Set(Some(description));
        }
        if let Some(image) = self.image {
            nft.image = Set(Some(image));
        }
        if let Some(royalty) = self.royalty {
            nft.royalty = Set(royalty);
        }
        if let Some(size) = self.size {
            nft.size = Set(Some(size));
        }
        if let Some(copies) = self.no_of_copies {
            nft.no_of_copies = Set(copies);
        }
        if let Some(sale_type) = self.sale_type {
            nft.sale_type = Set(sale_type);
        }
        if let Some(on_sale) = self.is_put_on_sale {
            nft.is_put_on_sale = Set(on_sale);
        }
        if let Some(collection) = self.collection {
            nft.collection_id = Set(collection);
        }
    }
}

fn favourite_by_default() -> bool {
    true
}

/// `user` vient du token : une valeur envoyée par le client est ignorée
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct FavouriteCreate {
    pub nft: i32,
    #[serde(default = "favourite_by_default")]
    pub is_favorite: bool,
}

/// `reporter` vient du token : une valeur envoyée par le client est ignorée
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ReportCreate {
    pub nft: i32,
    #[validate(
        custom(function = "required_text"),
        length(max = 100, message = "Ensure this field has no more than 100 characters.")
    )]
    pub report_type: String,
    pub description: Option<String>,
}

/// Ajout manuel d'un prix depuis le panel admin
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct PriceHistoryCreate {
    pub nft: i32,
    #[validate(custom(function = "positive"))]
    pub price: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serializers::field_errors;
    use crate::test_support::{collection, nft, user};
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_nft_labels_replace_foreign_keys() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![collection(1, 7)]])
            .append_query_results([vec![user(7)]])
            .into_connection();

        let out = nft::Model::represent(&db, nft(3, 7)).await.unwrap();
        let json = serde_json::to_value(&out).unwrap();

        assert_eq!(json["collection"], "Collection 1");
        assert_eq!(json["owner"], "First7 Last7");
        assert_eq!(json["price"], 100.0);
        assert_eq!(json["sale_type"], "fixed_price");
        assert!(json.get("owner_id").is_none());
    }

    #[test]
    fn test_client_owner_is_not_part_of_nft_payload() {
        let payload: NftCreate = serde_json::from_str(
            r#"{"name": "Ape", "price": 12.5, "collection": 2, "owner": 99, "is_hidden": false}"#,
        )
        .unwrap();

        assert_eq!(payload.collection, 2);
        assert_eq!(payload.no_of_copies, 1);
        assert!(field_errors(&payload).is_empty());
    }

    #[test]
    fn test_missing_name_is_required() {
        let payload: CollectionCreate = serde_json::from_str(r#"{"category": 1}"#).unwrap();
        let errors = field_errors(&payload);
        assert_eq!(errors.get("name").unwrap()[0], "This field is required.");
    }

    #[test]
    fn test_negative_price_is_rejected() {
        let payload: NftUpdate = serde_json::from_str(r#"{"price": -4}"#).unwrap();
        assert!(field_errors(&payload).get("price").is_some());
    }

    #[test]
    fn test_admin_nft_form_from_urlencoded_body() {
        let form: NftForm = parse_form(
            "name=Ape&price=10.50&royalty=2&collection=1&owner=4&sale_type=open_for_bids",
        );
        let (payload, owner, sale_type) = form.split();

        assert_eq!(owner, 4);
        assert_eq!(sale_type, SaleType::OpenForBids);
        assert_eq!(payload.price, Decimal::new(1050, 2));
    }

    fn parse_form<T: serde::de::DeserializeOwned>(body: &str) -> T {
        actix_web::web::Query::<T>::from_query(body).unwrap().into_inner()
    }
}
