pub mod accounts;
pub mod catalog;
pub mod identity;
pub mod lifecycle;
pub mod site;
pub mod trading;
pub mod wallet_service;
