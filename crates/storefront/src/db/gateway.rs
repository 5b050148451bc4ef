//! Transaction gateway for the cart collection.
//!
//! Every read or write of cart persistence goes through a scoped
//! [`CartTransaction`] opened here. The access mode is part of the handle's
//! type: `insert` and `delete` only exist on `CartTransaction<ReadWrite>`.
//!
//! A handle covers exactly one logical operation. It is consumed by
//! [`CartTransaction::commit`]; dropping it uncommitted rolls everything back,
//! so either all of an operation's effects become visible or none do.
//!
//! Write handles on the same collection are serialized: a second writer waits
//! in [`TransactionGateway::open`] until the first commits or rolls back.
//! Write handles also start with `BEGIN IMMEDIATE`, so a writer in another
//! process (or on another pool over the same file) waits on the database lock
//! instead of reading a snapshot it can no longer write to.
//! Read handles never wait on either lock.

use std::collections::HashMap;
use std::marker::PhantomData;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tokio::sync::{Mutex, OwnedMutexGuard, broadcast};
use uuid::Uuid;

use corner_shop_core::{CartItem, ProductId};

use crate::error::CartError;

/// Name of the cart items collection.
pub const CART_ITEMS: &str = "cart_items";

/// Collections provisioned by the schema migrations.
const COLLECTIONS: &[&str] = &[CART_ITEMS];

const COMPLETION_CHANNEL_CAPACITY: usize = 64;

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::ReadOnly {}
    impl Sealed for super::ReadWrite {}
}

/// Runtime view of a handle's access mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    ReadOnly,
    ReadWrite,
}

impl Mode {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ReadOnly => "readonly",
            Self::ReadWrite => "readwrite",
        }
    }
}

/// Access mode marker for [`CartTransaction`].
pub trait AccessMode: sealed::Sealed + Send + Sync + 'static {
    const MODE: Mode;
}

/// Read-only access: `get`, `count`, `get_all`.
#[derive(Debug)]
pub struct ReadOnly;

/// Read-write access: everything `ReadOnly` allows plus `insert` and `delete`.
#[derive(Debug)]
pub struct ReadWrite;

impl AccessMode for ReadOnly {
    const MODE: Mode = Mode::ReadOnly;
}

impl AccessMode for ReadWrite {
    const MODE: Mode = Mode::ReadWrite;
}

/// Signal emitted after a write-mode handle commits.
///
/// Diagnostic only; nothing in the cart contract consumes it.
#[derive(Debug, Clone)]
pub struct TransactionCompleted {
    pub transaction_id: Uuid,
    pub collection: &'static str,
    pub elapsed: Duration,
    pub completed_at: DateTime<Utc>,
}

/// Opens scoped transactions against the cart database.
///
/// Cheaply cloneable; clones share the pool, the writer locks and the
/// completion channel.
#[derive(Clone)]
pub struct TransactionGateway {
    inner: Arc<GatewayInner>,
}

struct GatewayInner {
    pool: SqlitePool,
    write_locks: HashMap<&'static str, Arc<Mutex<()>>>,
    completions: broadcast::Sender<TransactionCompleted>,
}

impl TransactionGateway {
    /// Create a gateway over an already provisioned pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        let write_locks = COLLECTIONS
            .iter()
            .map(|&name| (name, Arc::new(Mutex::new(()))))
            .collect();
        let (completions, _) = broadcast::channel(COMPLETION_CHANNEL_CAPACITY);

        Self {
            inner: Arc::new(GatewayInner {
                pool,
                write_locks,
                completions,
            }),
        }
    }

    /// Open a transaction on `collection` with access mode `M`.
    ///
    /// # Errors
    ///
    /// Returns `CartError::StoreUnavailable` if the collection was never
    /// provisioned, the pool is closed, or the database cannot start a
    /// transaction.
    pub async fn open<M: AccessMode>(
        &self,
        collection: &str,
    ) -> Result<CartTransaction<M>, CartError> {
        let (&name, lock) = self
            .inner
            .write_locks
            .get_key_value(collection)
            .ok_or_else(|| {
                CartError::StoreUnavailable(format!("unknown collection: {collection}"))
            })?;

        let write_guard = match M::MODE {
            Mode::ReadWrite => Some(Arc::clone(lock).lock_owned().await),
            Mode::ReadOnly => None,
        };

        let tx = match M::MODE {
            Mode::ReadWrite => self.inner.pool.begin_with("BEGIN IMMEDIATE").await?,
            Mode::ReadOnly => self.inner.pool.begin().await?,
        };

        tracing::trace!(collection = name, mode = M::MODE.as_str(), "Transaction opened");

        Ok(CartTransaction {
            id: Uuid::new_v4(),
            collection: name,
            tx,
            started: Instant::now(),
            write_guard,
            completions: self.inner.completions.clone(),
            mode: PhantomData,
        })
    }

    /// Subscribe to write completion signals.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<TransactionCompleted> {
        self.inner.completions.subscribe()
    }

    /// Get a reference to the underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    /// Close the pool. Every later `open` fails with `StoreUnavailable`.
    pub async fn close(&self) {
        self.inner.pool.close().await;
    }
}

/// A scoped handle on the cart collection for one logical operation.
///
/// Dropping the handle without calling [`commit`](Self::commit) rolls back.
#[must_use = "a transaction rolls back unless committed"]
pub struct CartTransaction<M: AccessMode> {
    id: Uuid,
    collection: &'static str,
    tx: Transaction<'static, Sqlite>,
    started: Instant,
    write_guard: Option<OwnedMutexGuard<()>>,
    completions: broadcast::Sender<TransactionCompleted>,
    mode: PhantomData<M>,
}

#[derive(sqlx::FromRow)]
struct CartItemRow {
    id_kind: String,
    id_value: String,
    name: String,
    price: String,
    image_src: String,
}

impl CartItemRow {
    fn into_item(self) -> Result<CartItem, CartError> {
        let id = ProductId::from_storage(&self.id_kind, &self.id_value)?;
        let price = Decimal::from_str(&self.price).map_err(|e| {
            CartError::MalformedResult(format!("invalid price {:?} for {id}: {e}", self.price))
        })?;
        Ok(CartItem::new(id, self.name, price, self.image_src)?)
    }
}

impl<M: AccessMode> CartTransaction<M> {
    /// Identifier used in completion signals and logs.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// The collection this handle is scoped to.
    #[must_use]
    pub const fn collection(&self) -> &'static str {
        self.collection
    }

    /// Fetch the item stored under `id`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the query fails and `MalformedResult` if
    /// the stored row does not decode.
    pub async fn get(&mut self, id: &ProductId) -> Result<Option<CartItem>, CartError> {
        let row = sqlx::query_as::<_, CartItemRow>(
            r"
            SELECT id_kind, id_value, name, price, image_src
            FROM cart_items
            WHERE id_kind = ? AND id_value = ?
            ",
        )
        .bind(id.kind().as_str())
        .bind(id.storage_value())
        .fetch_optional(&mut *self.tx)
        .await?;

        row.map(CartItemRow::into_item).transpose()
    }

    /// Number of stored items.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the query fails.
    pub async fn count(&mut self) -> Result<usize, CartError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM cart_items")
            .fetch_one(&mut *self.tx)
            .await?;

        usize::try_from(count)
            .map_err(|_| CartError::MalformedResult(format!("invalid item count: {count}")))
    }

    /// Every stored item, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the query fails and `MalformedResult` if
    /// any stored row does not decode.
    pub async fn get_all(&mut self) -> Result<Vec<CartItem>, CartError> {
        let rows = sqlx::query_as::<_, CartItemRow>(
            "SELECT id_kind, id_value, name, price, image_src FROM cart_items",
        )
        .fetch_all(&mut *self.tx)
        .await?;

        rows.into_iter().map(CartItemRow::into_item).collect()
    }

    /// Commit the transaction, making its effects visible.
    ///
    /// Write-mode commits emit a [`TransactionCompleted`] signal.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the commit fails; nothing is applied.
    pub async fn commit(self) -> Result<(), CartError> {
        let Self {
            id,
            collection,
            tx,
            started,
            write_guard,
            completions,
            ..
        } = self;

        tx.commit().await?;

        if M::MODE == Mode::ReadWrite {
            let event = TransactionCompleted {
                transaction_id: id,
                collection,
                elapsed: started.elapsed(),
                completed_at: Utc::now(),
            };
            tracing::debug!(
                transaction_id = %id,
                collection,
                elapsed_ms = event.elapsed.as_secs_f64() * 1000.0,
                "Transaction completed"
            );
            // No subscribers is not an error.
            let _ = completions.send(event);
        }

        drop(write_guard);
        Ok(())
    }

    /// Discard every effect of this transaction.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the database reports a failure while
    /// rolling back.
    pub async fn rollback(self) -> Result<(), CartError> {
        self.tx.rollback().await?;
        Ok(())
    }
}

impl CartTransaction<ReadWrite> {
    /// Insert a new item.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateItem` if the key already exists and
    /// `StoreUnavailable` for any other failure.
    pub async fn insert(&mut self, item: &CartItem) -> Result<(), CartError> {
        sqlx::query(
            r"
            INSERT INTO cart_items (id_kind, id_value, name, price, image_src)
            VALUES (?, ?, ?, ?, ?)
            ",
        )
        .bind(item.id().kind().as_str())
        .bind(item.id().storage_value())
        .bind(item.name())
        .bind(item.price().to_string())
        .bind(item.image_src())
        .execute(&mut *self.tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return CartError::DuplicateItem(item.id().clone());
            }
            CartError::from(e)
        })?;

        Ok(())
    }

    /// Delete the item stored under `id`.
    ///
    /// Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the statement fails.
    pub async fn delete(&mut self, id: &ProductId) -> Result<bool, CartError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE id_kind = ? AND id_value = ?")
            .bind(id.kind().as_str())
            .bind(id.storage_value())
            .execute(&mut *self.tx)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
