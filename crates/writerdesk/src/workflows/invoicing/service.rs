use std::sync::Arc;

use chrono::Utc;

use super::domain::{Invoice, InvoiceCohort, InvoiceRequest};
use crate::store::{Document, DocumentId, ListQuery, Page, Repository, RepositoryError};
use crate::workflows::errors::LedgerError;
use crate::workflows::orders::{Order, OrderFilter, OrderKind};

/// Assembles invoices from order cohorts. Orders and invoices live in separate collections and
/// are never written together.
pub struct InvoiceService<O, I> {
    orders: Arc<O>,
    invoices: Arc<I>,
}

impl<O, I> InvoiceService<O, I>
where
    O: Repository<Order> + 'static,
    I: Repository<Invoice> + 'static,
{
    pub fn new(orders: Arc<O>, invoices: Arc<I>) -> Self {
        Self { orders, invoices }
    }

    /// Orders billed to `supervisor_name` for `season`, optionally narrowed to one kind.
    pub fn cohort(
        &self,
        supervisor_name: &str,
        season: &str,
        project_type: Option<OrderKind>,
    ) -> Result<InvoiceCohort, LedgerError> {
        let query = ListQuery::new(OrderFilter::cohort(supervisor_name, season, project_type));
        let orders = self.orders.list(&query)?.items;

        Ok(InvoiceCohort {
            supervisor_name: supervisor_name.trim().to_string(),
            season: season.trim().to_string(),
            project_type,
            orders,
        })
    }

    pub fn generate(&self, request: &InvoiceRequest) -> Result<Invoice, LedgerError> {
        let (supervisor_name, season) = request.validate()?;
        let cohort = self.cohort(&supervisor_name, &season, request.project_type)?;

        if cohort.is_empty() {
            tracing::info!(
                supervisor = %supervisor_name,
                season = %season,
                "no orders to invoice"
            );
            return Err(LedgerError::EmptyCohort {
                supervisor_name,
                season,
                kind: request.project_type,
            });
        }

        let invoice = Invoice {
            id: DocumentId::generate(Invoice::ID_PREFIX),
            total_amount: cohort.total_amount(),
            project_count: cohort.project_count(),
            supervisor_name: cohort.supervisor_name,
            season: cohort.season,
            project_type: cohort.project_type,
            is_paid: false,
            created_at: Utc::now(),
        };

        let stored = self.invoices.insert(invoice)?;
        tracing::info!(
            collection = Invoice::COLLECTION,
            invoice_id = %stored.id,
            total_amount = stored.total_amount,
            project_count = stored.project_count,
            "invoice generated"
        );
        Ok(stored)
    }

    /// Sets the paid flag only; the snapshot totals stay as generated.
    pub fn set_paid(&self, id: &DocumentId, is_paid: bool) -> Result<Invoice, LedgerError> {
        let mut invoice = self.get(id)?;
        invoice.is_paid = is_paid;
        self.invoices.update(invoice.clone())?;
        tracing::info!(
            collection = Invoice::COLLECTION,
            invoice_id = %id,
            is_paid,
            "invoice payment status changed"
        );
        Ok(invoice)
    }

    pub fn toggle_paid(&self, id: &DocumentId) -> Result<Invoice, LedgerError> {
        let current = self.get(id)?;
        self.set_paid(id, !current.is_paid)
    }

    /// Removes the invoice record only; the orders it covered are untouched.
    pub fn delete(&self, id: &DocumentId) -> Result<(), LedgerError> {
        self.invoices.delete(id)?;
        tracing::info!(collection = Invoice::COLLECTION, invoice_id = %id, "invoice deleted");
        Ok(())
    }

    pub fn get(&self, id: &DocumentId) -> Result<Invoice, LedgerError> {
        self.invoices
            .fetch(id)?
            .ok_or(LedgerError::Persistence(RepositoryError::NotFound))
    }

    pub fn list(&self, query: &ListQuery<Invoice>) -> Result<Page<Invoice>, LedgerError> {
        Ok(self.invoices.list(query)?)
    }
}
