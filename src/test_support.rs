// Fixtures partagées par les tests (modèles, tokens, application de test).
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    DatabaseBackend, DatabaseConnection, MockDatabase, MockDatabaseTrait, MockExecResult,
    Transaction,
};

use crate::config::AppConfig;
use crate::models::nft::SaleType;
use crate::models::{
    Lifecycle, bidding, category, collection, contact, faq, nft, profile, reported_nft, users,
    wallet,
};
use crate::utils::jwt;

pub(crate) use crate::pagination::tests::count_row;

/// App actix complète branchée sur une connexion mock.
/// Accepte la connexion ou un `Arc` gardé par le test pour relire le journal.
macro_rules! test_app {
    ($db:expr) => {{
        let config = $crate::config::AppConfig::for_tests();
        let identity = $crate::services::identity::IdentityClient::new(&config.identity_service_url);
        let db = std::sync::Arc::<sea_orm::DatabaseConnection>::from($db);
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::from(db))
                .app_data(actix_web::web::Data::new(config))
                .app_data(actix_web::web::Data::new(identity))
                .configure($crate::routes::configure_routes),
        )
    }};
}
pub(crate) use test_app;

/// Journal des requêtes d'une connexion mock encore partagée avec l'app
pub fn transaction_log(db: &DatabaseConnection) -> Vec<Transaction> {
    db.as_mock_connection()
        .get_mocker_mutex()
        .lock()
        .unwrap()
        .drain_transaction_log()
}

/// Mock dont la première lecture est le compte de l'appelant (extracteurs d'auth)
pub fn signed_in(caller: &users::Model) -> MockDatabase {
    MockDatabase::new(DatabaseBackend::Postgres).append_query_results([vec![caller.clone()]])
}

pub fn date() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2022, 1, 15, 10, 30, 0).unwrap()
}

pub fn exec(rows_affected: u64) -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected,
    }
}

pub fn user(id: i32) -> users::Model {
    users::Model {
        id,
        email: format!("user{}@example.com", id),
        username: format!("user{}", id),
        first_name: format!("First{}", id),
        last_name: format!("Last{}", id),
        password_hash: String::new(),
        is_staff: false,
        is_superuser: false,
        lifecycle: Lifecycle::Active,
        date_joined: date(),
    }
}

pub fn staff(id: i32) -> users::Model {
    users::Model {
        is_staff: true,
        ..user(id)
    }
}

pub fn superuser(id: i32) -> users::Model {
    users::Model {
        is_staff: true,
        is_superuser: true,
        ..user(id)
    }
}

pub fn token(user: &users::Model) -> String {
    jwt::generate_token(user, &AppConfig::for_tests().jwt_secret, 1).unwrap()
}

pub fn bearer(user: &users::Model) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token(user)))
}

pub fn profile(id: i32, user_id: i32) -> profile::Model {
    profile::Model {
        id,
        user_id,
        about: Some("Digital artist".to_string()),
        profile_image: Some(format!("https://cdn.example.com/p{}.png", id)),
        banner_image: None,
        vine_link: None,
        facebook_link: None,
        twitter_link: None,
        google_plus_link: None,
        lifecycle: Lifecycle::Active,
    }
}

pub fn category(id: i32) -> category::Model {
    category::Model {
        id,
        name: format!("Category {}", id),
        is_active: true,
        lifecycle: Lifecycle::Active,
        created_at: date(),
    }
}

pub fn collection(id: i32, user_id: i32) -> collection::Model {
    collection::Model {
        id,
        name: format!("Collection {}", id),
        description: None,
        category_id: 1,
        user_id,
        lifecycle: Lifecycle::Active,
        created_at: date(),
        updated_at: date(),
    }
}

pub fn nft(id: i32, owner_id: i32) -> nft::Model {
    nft::Model {
        id,
        name: format!("NFT {}", id),
        description: None,
        image: None,
        royalty: Decimal::new(5, 0),
        size: None,
        no_of_copies: 1,
        price: Decimal::new(100, 0),
        sale_type: SaleType::FixedPrice,
        total_views: 0,
        is_hidden: true,
        is_put_on_sale: false,
        collection_id: 1,
        owner_id,
        lifecycle: Lifecycle::Active,
        created_at: date(),
        updated_at: date(),
    }
}

pub fn report(id: i32, nft_id: i32, reporter_id: i32) -> reported_nft::Model {
    reported_nft::Model {
        id,
        nft_id,
        reporter_id,
        report_type: "spam".to_string(),
        description: None,
        is_resolved: false,
        lifecycle: Lifecycle::Active,
        created_at: date(),
    }
}

pub fn bid(id: i32, nft_id: i32, offer_by: i32, price: i64) -> bidding::Model {
    bidding::Model {
        id,
        nft_id,
        offer_by,
        price: Decimal::new(price, 0),
        lifecycle: Lifecycle::Active,
        bidding_date: date(),
    }
}

pub fn wallet(id: i32, user_id: i32, balance: i64) -> wallet::Model {
    wallet::Model {
        id,
        user_id,
        current_balance: Decimal::new(balance, 0),
        wallet_address: format!("0xWALLET{}", id),
        is_verified: false,
        is_active: true,
        lifecycle: Lifecycle::Active,
    }
}

pub fn faq(id: i32, updated_by: i32) -> faq::Model {
    faq::Model {
        id,
        title: format!("Question {}", id),
        description: "Answer".to_string(),
        category_id: 1,
        updated_by,
        lifecycle: Lifecycle::Active,
        created_at: date(),
        updated_at: date(),
    }
}

pub fn contact(id: i32) -> contact::Model {
    contact::Model {
        id,
        name: "Jane".to_string(),
        email: "jane@example.com".to_string(),
        subject: None,
        message: "Hello".to_string(),
        is_resolved: false,
        resolved_by: None,
        lifecycle: Lifecycle::Active,
        created_at: date(),
    }
}
