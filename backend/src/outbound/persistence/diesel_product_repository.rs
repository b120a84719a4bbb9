//! PostgreSQL-backed `ProductRepository` implementation using Diesel ORM.
//!
//! Rows are converted back into validated domain products on every read, so
//! a row that violates product invariants surfaces as a query error instead
//! of leaking into the API.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::RunQueryDsl;
use pagination::{Page, PageRequest, SortDirection};
use tracing::debug;

use crate::domain::ports::{ProductRepository, ProductRepositoryError, StockReduction};
use crate::domain::{
    PriceRange, Product, ProductChanges, ProductDraft, ProductId, ProductSort, ProductSortField,
};

use super::models::{NewProductRow, ProductChangeset, ProductRow};
use super::pool::{DbPool, PoolError};
use super::schema::products;

/// Diesel-backed implementation of the product repository port.
#[derive(Clone)]
pub struct DieselProductRepository {
    pool: DbPool,
}

impl DieselProductRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain repository errors.
fn map_pool_error(error: PoolError) -> ProductRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            ProductRepositoryError::connection(message)
        }
    }
}

/// Map Diesel errors to domain repository errors.
///
/// Driver details are logged at debug level and kept out of the error text.
fn map_diesel_error(error: DieselError) -> ProductRepositoryError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "product query failed");
        }
        other => debug!(error = %other, "product query failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            ProductRepositoryError::connection("database connection closed")
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            ProductRepositoryError::query("duplicate product identifier")
        }
        DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, _) => {
            ProductRepositoryError::query("product row violates a table constraint")
        }
        DieselError::NotFound => ProductRepositoryError::query("product row not found"),
        _ => ProductRepositoryError::query("database error"),
    }
}

fn to_count(value: i64) -> Result<u64, ProductRepositoryError> {
    u64::try_from(value)
        .map_err(|_| ProductRepositoryError::query(format!("negative row count: {value}")))
}

fn to_affected(value: usize) -> Result<u64, ProductRepositoryError> {
    u64::try_from(value)
        .map_err(|_| ProductRepositoryError::query(format!("row count out of range: {value}")))
}

/// Escape `LIKE` metacharacters so the fragment matches literally.
fn escape_like(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len());
    for ch in fragment.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn contains_pattern(fragment: &str) -> String {
    format!("%{}%", escape_like(fragment))
}

/// Convert a database row into a validated domain product.
fn row_to_product(row: ProductRow) -> Result<Product, ProductRepositoryError> {
    let ProductRow {
        product_uuid,
        title,
        description,
        price,
        store_id,
        category,
        stock,
        active,
        created_at,
        updated_at,
    } = row;

    Product::new(ProductDraft {
        id: ProductId::from_uuid(product_uuid),
        title,
        description,
        price,
        store_id,
        category,
        stock,
        active,
        created_at,
        updated_at,
    })
    .map_err(|err| ProductRepositoryError::query(err.to_string()))
}

fn rows_to_products(rows: Vec<ProductRow>) -> Result<Vec<Product>, ProductRepositoryError> {
    rows.into_iter().map(row_to_product).collect()
}

macro_rules! order_by_direction {
    ($query:expr, $column:expr, $direction:expr) => {
        match $direction {
            SortDirection::Asc => $query.order($column.asc()),
            SortDirection::Desc => $query.order($column.desc()),
        }
    };
}

#[async_trait]
impl ProductRepository for DieselProductRepository {
    async fn insert(&self, product: &Product) -> Result<(), ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewProductRow {
            product_uuid: *product.id().as_uuid(),
            title: product.title(),
            description: product.description(),
            price: product.price(),
            store_id: product.store_id(),
            category: product.category(),
            stock: product.stock(),
            active: product.is_active(),
            created_at: product.created_at(),
            updated_at: product.updated_at(),
        };

        diesel::insert_into(products::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = products::table
            .filter(products::product_uuid.eq(id.as_uuid()))
            .select(ProductRow::as_select())
            .first::<ProductRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_product).transpose()
    }

    async fn exists_active(&self, id: &ProductId) -> Result<bool, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::select(diesel::dsl::exists(
            products::table.filter(
                products::product_uuid
                    .eq(id.as_uuid())
                    .and(products::active.eq(true)),
            ),
        ))
        .get_result::<bool>(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn list(
        &self,
        page: PageRequest,
        sort: ProductSort,
    ) -> Result<Page<Product>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total = products::table
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let query = products::table
            .select(ProductRow::as_select())
            .into_boxed();
        let query = match sort.field {
            ProductSortField::CreatedAt => {
                order_by_direction!(query, products::created_at, sort.direction)
            }
            ProductSortField::UpdatedAt => {
                order_by_direction!(query, products::updated_at, sort.direction)
            }
            ProductSortField::Title => order_by_direction!(query, products::title, sort.direction),
            ProductSortField::Price => order_by_direction!(query, products::price, sort.direction),
            ProductSortField::Stock => order_by_direction!(query, products::stock, sort.direction),
            ProductSortField::Category => {
                order_by_direction!(query, products::category, sort.direction)
            }
            ProductSortField::StoreId => {
                order_by_direction!(query, products::store_id, sort.direction)
            }
            ProductSortField::Active => {
                order_by_direction!(query, products::active, sort.direction)
            }
            ProductSortField::ProductUuid => {
                order_by_direction!(query, products::product_uuid, sort.direction)
            }
        };

        let rows: Vec<ProductRow> = query
            .then_order_by(products::id.asc())
            .limit(page.limit())
            .offset(page.offset())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(Page::new(rows_to_products(rows)?, page, to_count(total)?))
    }

    async fn list_active_by_store(
        &self,
        store_id: &str,
    ) -> Result<Vec<Product>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ProductRow> = products::table
            .filter(
                products::store_id
                    .eq(store_id)
                    .and(products::active.eq(true)),
            )
            .order(products::id.asc())
            .select(ProductRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_products(rows)
    }

    async fn list_active_by_category(
        &self,
        category: &str,
        page: PageRequest,
    ) -> Result<Page<Product>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total = products::table
            .filter(
                products::category
                    .eq(category)
                    .and(products::active.eq(true)),
            )
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let rows: Vec<ProductRow> = products::table
            .filter(
                products::category
                    .eq(category)
                    .and(products::active.eq(true)),
            )
            .order((products::created_at.desc(), products::id.asc()))
            .limit(page.limit())
            .offset(page.offset())
            .select(ProductRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(Page::new(rows_to_products(rows)?, page, to_count(total)?))
    }

    async fn search_active_by_title(
        &self,
        fragment: &str,
    ) -> Result<Vec<Product>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ProductRow> = products::table
            .filter(
                products::title
                    .ilike(contains_pattern(fragment))
                    .and(products::active.eq(true)),
            )
            .order(products::id.asc())
            .select(ProductRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_products(rows)
    }

    async fn list_active_in_price_range(
        &self,
        range: PriceRange,
    ) -> Result<Vec<Product>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ProductRow> = products::table
            .filter(
                products::price
                    .between(range.min(), range.max())
                    .and(products::active.eq(true)),
            )
            .order((products::price.asc(), products::id.asc()))
            .select(ProductRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_products(rows)
    }

    async fn list_active_below_stock(
        &self,
        threshold: i32,
    ) -> Result<Vec<Product>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ProductRow> = products::table
            .filter(
                products::stock
                    .lt(threshold)
                    .and(products::active.eq(true)),
            )
            .order((products::stock.asc(), products::id.asc()))
            .select(ProductRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_products(rows)
    }

    async fn count_active_by_store(&self, store_id: &str) -> Result<u64, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total = products::table
            .filter(
                products::store_id
                    .eq(store_id)
                    .and(products::active.eq(true)),
            )
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        to_count(total)
    }

    async fn update(
        &self,
        id: &ProductId,
        changes: &ProductChanges,
        at: DateTime<Utc>,
    ) -> Result<Option<Product>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changeset = ProductChangeset {
            title: changes.title.as_deref(),
            description: changes.description.as_deref(),
            price: changes.price,
            stock: changes.stock,
            updated_at: at,
        };

        let row = diesel::update(products::table.filter(products::product_uuid.eq(id.as_uuid())))
            .set(&changeset)
            .returning(ProductRow::as_returning())
            .get_result::<ProductRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_product).transpose()
    }

    async fn set_stock(
        &self,
        id: &ProductId,
        quantity: i32,
        at: DateTime<Utc>,
    ) -> Result<u64, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let affected = diesel::update(
            products::table.filter(
                products::product_uuid
                    .eq(id.as_uuid())
                    .and(products::active.eq(true)),
            ),
        )
        .set((products::stock.eq(quantity), products::updated_at.eq(at)))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        to_affected(affected)
    }

    async fn reduce_stock(
        &self,
        id: &ProductId,
        quantity: i32,
        at: DateTime<Utc>,
    ) -> Result<StockReduction, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let remaining = diesel::update(
            products::table.filter(
                products::product_uuid
                    .eq(id.as_uuid())
                    .and(products::stock.ge(quantity)),
            ),
        )
        .set((
            products::stock.eq(products::stock - quantity),
            products::updated_at.eq(at),
        ))
        .returning(products::stock)
        .get_result::<i32>(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        if let Some(remaining) = remaining {
            return Ok(StockReduction::Reduced { remaining });
        }

        let available = products::table
            .filter(products::product_uuid.eq(id.as_uuid()))
            .select(products::stock)
            .first::<i32>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(match available {
            Some(available) => StockReduction::Insufficient { available },
            None => StockReduction::Missing,
        })
    }

    async fn deactivate(
        &self,
        id: &ProductId,
        at: DateTime<Utc>,
    ) -> Result<u64, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let affected = diesel::update(
            products::table.filter(products::product_uuid.eq(id.as_uuid())),
        )
        .set((products::active.eq(false), products::updated_at.eq(at)))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        to_affected(affected)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for error mapping and row conversion edge cases.

    use chrono::Utc;
    use rstest::{fixture, rstest};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use super::*;

    #[fixture]
    fn valid_row() -> ProductRow {
        let created_at = Utc::now();
        ProductRow {
            product_uuid: Uuid::new_v4(),
            title: "iPhone 15 Pro".to_owned(),
            description: None,
            price: Decimal::new(99_999, 2),
            store_id: "STORE-001".to_owned(),
            category: "Electronics".to_owned(),
            stock: 50,
            active: true,
            created_at,
            updated_at: created_at,
        }
    }

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let repo_err = map_pool_error(PoolError::checkout("connection refused"));

        assert!(matches!(repo_err, ProductRepositoryError::Connection { .. }));
        assert!(repo_err.to_string().contains("connection refused"));
    }

    #[rstest]
    fn diesel_error_maps_to_query_error() {
        let repo_err = map_diesel_error(DieselError::NotFound);

        assert!(matches!(repo_err, ProductRepositoryError::Query { .. }));
    }

    #[rstest]
    #[case(DatabaseErrorKind::ClosedConnection, true)]
    #[case(DatabaseErrorKind::CheckViolation, false)]
    #[case(DatabaseErrorKind::UniqueViolation, false)]
    fn database_error_kinds_are_classified(
        #[case] kind: DatabaseErrorKind,
        #[case] is_connection: bool,
    ) {
        let repo_err = map_diesel_error(DieselError::DatabaseError(
            kind,
            Box::new("driver detail".to_owned()),
        ));

        assert_eq!(
            matches!(repo_err, ProductRepositoryError::Connection { .. }),
            is_connection
        );
        assert!(!repo_err.to_string().contains("driver detail"));
    }

    #[rstest]
    #[case("phone", "%phone%")]
    #[case("50%", "%50\\%%")]
    #[case("a_b", "%a\\_b%")]
    #[case("back\\slash", "%back\\\\slash%")]
    fn search_fragments_match_literally(#[case] fragment: &str, #[case] expected: &str) {
        assert_eq!(contains_pattern(fragment), expected);
    }

    #[rstest]
    fn row_converts_to_product(valid_row: ProductRow) {
        let uuid = valid_row.product_uuid;
        let product = row_to_product(valid_row).expect("valid row");

        assert_eq!(product.id().as_uuid(), &uuid);
        assert_eq!(product.stock(), 50);
        assert!(product.is_active());
    }

    #[rstest]
    fn row_with_invalid_stock_is_rejected(mut valid_row: ProductRow) {
        valid_row.stock = -3;

        let err = row_to_product(valid_row).expect_err("negative stock");
        assert!(matches!(err, ProductRepositoryError::Query { .. }));
    }

    #[rstest]
    fn negative_counts_are_rejected() {
        assert_eq!(to_count(7).expect("positive count"), 7);
        assert!(to_count(-1).is_err());
    }

    #[rstest]
    #[case(0, 0)]
    #[case(1, 1)]
    #[case(250, 250)]
    fn affected_row_counts_convert(#[case] affected: usize, #[case] expected: u64) {
        assert_eq!(to_affected(affected).expect("in range"), expected);
    }
}
