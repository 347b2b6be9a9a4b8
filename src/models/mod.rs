// ============================================================================
// MODELS - MODULE PRINCIPAL
// ============================================================================
//
// Description:
//   Point d'entrée pour tous les modèles de données.
//   Chaque modèle correspond à une table PostgreSQL avec SeaORM.
//
// Liste des modules:
//   - lifecycle : état Active / Removed partagé + helpers de requête
//   - health : Health check API
//   - users / profile : comptes et profils publics (1-1)
//   - category / collection / nft : catalogue
//   - favourite_nft / reported_nft : actions des utilisateurs sur un NFT
//   - nft_price_history : historique des prix (ajout seulement)
//   - bidding / nft_transaction : offres et ventes
//   - wallet / wallet_transaction : solde et journal des mouvements
//   - faq / contact : contenu du site
//
// Points d'attention:
//   - Aucune suppression physique : lifecycle passe à Removed
//   - Les clés étrangères sont obligatoires (sauf contact.resolved_by)
//   - Les montants sont des Decimal (rust_decimal), jamais des f64 en BD
//
// ============================================================================

pub mod lifecycle;
pub mod health;
pub mod users;
pub mod profile;
pub mod category;
pub mod collection;
pub mod nft;
pub mod favourite_nft;
pub mod reported_nft;
pub mod nft_price_history;
pub mod bidding;
pub mod nft_transaction;
pub mod wallet;
pub mod wallet_transaction;
pub mod faq;
pub mod contact;

pub use lifecycle::{Lifecycle, Listable, SoftDeletable};
