use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use super::domain::{ImportRow, Order, OrderKind, OrderSubmission, PaymentUpdate};
use crate::config::LedgerConfig;
use crate::store::{
    Document, DocumentId, ListQuery, Page, PageRequest, Repository, RepositoryError,
};
use crate::workflows::errors::{LedgerError, ValidationError};

/// Create/edit/payment/delete operations over the order collection.
pub struct OrderService<R> {
    repository: Arc<R>,
    config: LedgerConfig,
}

/// Outcome of a bulk import; valid rows are persisted even when others are rejected.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportSummary {
    pub created: Vec<Order>,
    pub rejected: Vec<RejectedRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedRow {
    pub line: usize,
    pub reason: String,
}

impl<R> OrderService<R>
where
    R: Repository<Order> + 'static,
{
    pub fn new(repository: Arc<R>, config: LedgerConfig) -> Self {
        Self { repository, config }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Default page for listings that do not ask for one.
    pub fn default_page(&self) -> PageRequest {
        PageRequest::new(1, self.config.records_per_page)
    }

    pub fn create(
        &self,
        kind: OrderKind,
        submission: OrderSubmission,
    ) -> Result<Order, LedgerError> {
        let fields = submission.validate(kind)?;
        let order = Order::new(
            DocumentId::generate(Order::ID_PREFIX),
            kind,
            fields,
            Utc::now(),
        );

        let stored = self.repository.insert(order)?;
        tracing::info!(
            collection = Order::COLLECTION,
            order_id = %stored.id,
            kind = stored.kind.label(),
            budget = stored.budget,
            "order created"
        );
        Ok(stored)
    }

    /// Full overwrite of an order's editable fields. Kind and recorded payments are kept.
    pub fn update(
        &self,
        id: &DocumentId,
        submission: OrderSubmission,
    ) -> Result<Order, LedgerError> {
        let mut order = self.require(id)?;
        let fields = submission.validate(order.kind)?;
        order.overwrite(fields, Utc::now());

        self.repository.update(order.clone())?;
        tracing::info!(
            collection = Order::COLLECTION,
            order_id = %order.id,
            status = order.details.status.label(),
            budget = order.budget,
            "order updated"
        );
        Ok(order)
    }

    /// Replaces the paid amounts on a dissertation and recomputes its balance.
    pub fn record_payment(
        &self,
        id: &DocumentId,
        payment: PaymentUpdate,
    ) -> Result<Order, LedgerError> {
        let mut order = self.require(id)?;
        let validated = payment.validate()?;
        let budget = order.budget;
        let ledger = order
            .payment
            .as_mut()
            .ok_or(ValidationError::PaymentsNotTracked { kind: order.kind })?;
        ledger.apply(&validated, budget);
        order.updated_at = Utc::now();

        self.repository.update(order.clone())?;
        tracing::info!(
            collection = Order::COLLECTION,
            order_id = %order.id,
            total_paid = validated.total_paid,
            fully_paid = validated.is_fully_paid,
            "payment recorded"
        );
        Ok(order)
    }

    pub fn delete(&self, id: &DocumentId) -> Result<(), LedgerError> {
        self.repository.delete(id)?;
        tracing::info!(collection = Order::COLLECTION, order_id = %id, "order deleted");
        Ok(())
    }

    pub fn get(&self, id: &DocumentId) -> Result<Order, LedgerError> {
        self.require(id)
    }

    pub fn list(&self, query: &ListQuery<Order>) -> Result<Page<Order>, LedgerError> {
        Ok(self.repository.list(query)?)
    }

    /// Every order in default order; used by reporting.
    pub fn all(&self) -> Result<Vec<Order>, LedgerError> {
        Ok(self.repository.list(&ListQuery::all())?.items)
    }

    pub fn import(
        &self,
        kind: OrderKind,
        rows: Vec<ImportRow>,
    ) -> Result<ImportSummary, LedgerError> {
        let mut summary = ImportSummary::default();

        for row in rows {
            let row_kind = row.kind.unwrap_or(kind);
            let result = row
                .submission
                .map_err(LedgerError::from)
                .and_then(|submission| self.create(row_kind, submission));

            match result {
                Ok(order) => summary.created.push(order),
                Err(LedgerError::Persistence(RepositoryError::Unavailable(reason))) => {
                    return Err(RepositoryError::Unavailable(reason).into());
                }
                Err(error) => {
                    tracing::warn!(line = row.line, error = %error, "import row rejected");
                    summary.rejected.push(RejectedRow {
                        line: row.line,
                        reason: error.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            kind = kind.label(),
            created = summary.created.len(),
            rejected = summary.rejected.len(),
            "order import finished"
        );
        Ok(summary)
    }

    fn require(&self, id: &DocumentId) -> Result<Order, LedgerError> {
        self.repository
            .fetch(id)?
            .ok_or(LedgerError::Persistence(RepositoryError::NotFound))
    }
}
