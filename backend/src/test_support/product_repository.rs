//! In-memory product repository mirroring the PostgreSQL adapter's
//! filtering and ordering rules.

use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::{Page, PageRequest, SortDirection};
use tokio::sync::RwLock;

use crate::domain::ports::{ProductRepository, ProductRepositoryError, StockReduction};
use crate::domain::{
    PriceRange, Product, ProductChanges, ProductDraft, ProductId, ProductSort, ProductSortField,
};

struct Row {
    seq: u64,
    product: Product,
}

#[derive(Default)]
struct Table {
    next_seq: u64,
    rows: Vec<Row>,
}

impl Table {
    fn find_mut(&mut self, id: &ProductId) -> Option<&mut Row> {
        self.rows.iter_mut().find(|row| row.product.id() == *id)
    }

    fn active(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(|row| row.product.is_active())
    }
}

/// Product repository backed by a vector.
///
/// Rows keep their insertion order, which stands in for the surrogate key
/// used as the final tie-breaker in every ordering.
#[derive(Default)]
pub struct InMemoryProductRepository {
    table: RwLock<Table>,
}

impl InMemoryProductRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored products, active or not.
    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    /// Whether no products are stored.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn draft_of(product: &Product) -> ProductDraft {
    ProductDraft {
        id: product.id(),
        title: product.title().to_owned(),
        description: product.description().map(str::to_owned),
        price: product.price(),
        store_id: product.store_id().to_owned(),
        category: product.category().to_owned(),
        stock: product.stock(),
        active: product.is_active(),
        created_at: product.created_at(),
        updated_at: product.updated_at(),
    }
}

fn rebuild(
    product: &Product,
    edit: impl FnOnce(&mut ProductDraft),
) -> Result<Product, ProductRepositoryError> {
    let mut draft = draft_of(product);
    edit(&mut draft);
    Product::new(draft).map_err(|err| ProductRepositoryError::query(err.to_string()))
}

fn compare(a: &Product, b: &Product, field: ProductSortField) -> Ordering {
    match field {
        ProductSortField::CreatedAt => a.created_at().cmp(&b.created_at()),
        ProductSortField::UpdatedAt => a.updated_at().cmp(&b.updated_at()),
        ProductSortField::Title => a.title().cmp(b.title()),
        ProductSortField::Price => a.price().cmp(&b.price()),
        ProductSortField::Stock => a.stock().cmp(&b.stock()),
        ProductSortField::Category => a.category().cmp(b.category()),
        ProductSortField::StoreId => a.store_id().cmp(b.store_id()),
        ProductSortField::Active => a.is_active().cmp(&b.is_active()),
        ProductSortField::ProductUuid => a.id().as_uuid().cmp(b.id().as_uuid()),
    }
}

fn directed(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

fn page_of(rows: Vec<&Row>, page: PageRequest) -> Page<Product> {
    let total = rows.len() as u64;
    let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
    let content = rows
        .into_iter()
        .skip(offset)
        .take(limit)
        .map(|row| row.product.clone())
        .collect();
    Page::new(content, page, total)
}

fn products(rows: Vec<&Row>) -> Vec<Product> {
    rows.into_iter().map(|row| row.product.clone()).collect()
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn insert(&self, product: &Product) -> Result<(), ProductRepositoryError> {
        let mut table = self.table.write().await;
        if table.find_mut(&product.id()).is_some() {
            return Err(ProductRepositoryError::query("duplicate product identifier"));
        }
        let seq = table.next_seq;
        table.next_seq += 1;
        table.rows.push(Row {
            seq,
            product: product.clone(),
        });
        Ok(())
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, ProductRepositoryError> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .iter()
            .find(|row| row.product.id() == *id)
            .map(|row| row.product.clone()))
    }

    async fn exists_active(&self, id: &ProductId) -> Result<bool, ProductRepositoryError> {
        let table = self.table.read().await;
        Ok(table.active().any(|row| row.product.id() == *id))
    }

    async fn list(
        &self,
        page: PageRequest,
        sort: ProductSort,
    ) -> Result<Page<Product>, ProductRepositoryError> {
        let table = self.table.read().await;
        let mut rows: Vec<&Row> = table.rows.iter().collect();
        rows.sort_by(|a, b| {
            directed(compare(&a.product, &b.product, sort.field), sort.direction)
                .then(a.seq.cmp(&b.seq))
        });
        Ok(page_of(rows, page))
    }

    async fn list_active_by_store(
        &self,
        store_id: &str,
    ) -> Result<Vec<Product>, ProductRepositoryError> {
        let table = self.table.read().await;
        Ok(products(
            table
                .active()
                .filter(|row| row.product.store_id() == store_id)
                .collect(),
        ))
    }

    async fn list_active_by_category(
        &self,
        category: &str,
        page: PageRequest,
    ) -> Result<Page<Product>, ProductRepositoryError> {
        let table = self.table.read().await;
        let mut rows: Vec<&Row> = table
            .active()
            .filter(|row| row.product.category() == category)
            .collect();
        rows.sort_by(|a, b| {
            b.product
                .created_at()
                .cmp(&a.product.created_at())
                .then(a.seq.cmp(&b.seq))
        });
        Ok(page_of(rows, page))
    }

    async fn search_active_by_title(
        &self,
        fragment: &str,
    ) -> Result<Vec<Product>, ProductRepositoryError> {
        let needle = fragment.to_lowercase();
        let table = self.table.read().await;
        Ok(products(
            table
                .active()
                .filter(|row| row.product.title().to_lowercase().contains(&needle))
                .collect(),
        ))
    }

    async fn list_active_in_price_range(
        &self,
        range: PriceRange,
    ) -> Result<Vec<Product>, ProductRepositoryError> {
        let table = self.table.read().await;
        let mut rows: Vec<&Row> = table
            .active()
            .filter(|row| (range.min()..=range.max()).contains(&row.product.price()))
            .collect();
        rows.sort_by(|a, b| {
            a.product
                .price()
                .cmp(&b.product.price())
                .then(a.seq.cmp(&b.seq))
        });
        Ok(products(rows))
    }

    async fn list_active_below_stock(
        &self,
        threshold: i32,
    ) -> Result<Vec<Product>, ProductRepositoryError> {
        let table = self.table.read().await;
        let mut rows: Vec<&Row> = table
            .active()
            .filter(|row| row.product.stock() < threshold)
            .collect();
        rows.sort_by(|a, b| {
            a.product
                .stock()
                .cmp(&b.product.stock())
                .then(a.seq.cmp(&b.seq))
        });
        Ok(products(rows))
    }

    async fn count_active_by_store(&self, store_id: &str) -> Result<u64, ProductRepositoryError> {
        let table = self.table.read().await;
        Ok(table
            .active()
            .filter(|row| row.product.store_id() == store_id)
            .count() as u64)
    }

    async fn update(
        &self,
        id: &ProductId,
        changes: &ProductChanges,
        at: DateTime<Utc>,
    ) -> Result<Option<Product>, ProductRepositoryError> {
        let mut table = self.table.write().await;
        let Some(row) = table.find_mut(id) else {
            return Ok(None);
        };
        let mut product = row.product.clone();
        product
            .apply(changes.clone(), at)
            .map_err(|err| ProductRepositoryError::query(err.to_string()))?;
        row.product = product.clone();
        Ok(Some(product))
    }

    async fn set_stock(
        &self,
        id: &ProductId,
        quantity: i32,
        at: DateTime<Utc>,
    ) -> Result<u64, ProductRepositoryError> {
        let mut table = self.table.write().await;
        let Some(row) = table.find_mut(id).filter(|row| row.product.is_active()) else {
            return Ok(0);
        };
        row.product = rebuild(&row.product, |draft| {
            draft.stock = quantity;
            draft.updated_at = at;
        })?;
        Ok(1)
    }

    async fn reduce_stock(
        &self,
        id: &ProductId,
        quantity: i32,
        at: DateTime<Utc>,
    ) -> Result<StockReduction, ProductRepositoryError> {
        let mut table = self.table.write().await;
        let Some(row) = table.find_mut(id) else {
            return Ok(StockReduction::Missing);
        };
        let available = row.product.stock();
        if available < quantity {
            return Ok(StockReduction::Insufficient { available });
        }
        let remaining = available - quantity;
        row.product = rebuild(&row.product, |draft| {
            draft.stock = remaining;
            draft.updated_at = at;
        })?;
        Ok(StockReduction::Reduced { remaining })
    }

    async fn deactivate(
        &self,
        id: &ProductId,
        at: DateTime<Utc>,
    ) -> Result<u64, ProductRepositoryError> {
        let mut table = self.table.write().await;
        let Some(row) = table.find_mut(id) else {
            return Ok(0);
        };
        row.product = rebuild(&row.product, |draft| {
            draft.active = false;
            draft.updated_at = at;
        })?;
        Ok(1)
    }
}
