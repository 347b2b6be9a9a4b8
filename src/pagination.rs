// Pagination fixe : 5 éléments par page, numéro de page borné (jamais d'erreur).
use sea_orm::{ConnectionTrait, DbErr, PaginatorTrait, QueryOrder, Select};
use serde::{Deserialize, Serialize};

use crate::models::Listable;

pub const PAGE_SIZE: u64 = 5;

/// Paramètre `page` brut : une valeur invalide ne doit pas faire échouer la requête
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    pub fn requested(&self) -> Option<&str> {
        self.page.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub page_size: u64,
    pub total_items: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, page: u64, total_items: u64) -> Self {
        let total_pages = total_pages(total_items);
        Page {
            items,
            page,
            page_size: PAGE_SIZE,
            total_items,
            total_pages,
            has_next: page < total_pages,
            has_previous: page > 1,
        }
    }

    /// Remplace les éléments en gardant les métadonnées
    pub fn with_items<U>(self, items: Vec<U>) -> Page<U> {
        Page {
            items,
            page: self.page,
            page_size: self.page_size,
            total_items: self.total_items,
            total_pages: self.total_pages,
            has_next: self.has_next,
            has_previous: self.has_previous,
        }
    }
}

/// Un ensemble vide a quand même une page (vide)
pub fn total_pages(total_items: u64) -> u64 {
    total_items.div_ceil(PAGE_SIZE).max(1)
}

/// Absent / non entier -> 1, < 1 -> 1, > dernière page -> dernière page
pub fn resolve_page(requested: Option<&str>, total_pages: u64) -> u64 {
    match requested.and_then(|raw| raw.trim().parse::<i64>().ok()) {
        None => 1,
        Some(n) if n < 1 => 1,
        Some(n) => (n as u64).min(total_pages.max(1)),
    }
}

/// Applique l'ordre par id croissant puis découpe la page demandée
pub async fn paginate<E, C>(
    db: &C,
    select: Select<E>,
    requested: Option<&str>,
) -> Result<Page<E::Model>, DbErr>
where
    E: Listable,
    E::Model: Sync,
    C: ConnectionTrait,
{
    let paginator = select
        .order_by_asc(E::id_column())
        .paginate(db, PAGE_SIZE);

    // 1. Compter les éléments filtrés
    let total_items = paginator.num_items().await?;

    // 2. Borner le numéro de page
    let page = resolve_page(requested, total_pages(total_items));

    // 3. Charger la fenêtre (fetch_page est 0-based)
    let items = if total_items == 0 {
        Vec::new()
    } else {
        paginator.fetch_page(page - 1).await?
    };

    Ok(Page::new(items, page, total_items))
}
