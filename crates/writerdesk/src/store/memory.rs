use super::{apply_query, Document, DocumentId, ListQuery, Page, Repository, RepositoryError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Process-local collection; clones share the same underlying map.
pub struct InMemoryCollection<D: Document> {
    documents: Arc<Mutex<HashMap<DocumentId, D>>>,
}

impl<D: Document> Default for InMemoryCollection<D> {
    fn default() -> Self {
        Self {
            documents: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<D: Document> Clone for InMemoryCollection<D> {
    fn clone(&self) -> Self {
        Self {
            documents: Arc::clone(&self.documents),
        }
    }
}

impl<D: Document> InMemoryCollection<D> {
    pub fn len(&self) -> usize {
        self.lock().map(|guard| guard.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<DocumentId, D>>, RepositoryError> {
        self.documents.lock().map_err(|_| {
            RepositoryError::Unavailable(format!("{} collection lock poisoned", D::COLLECTION))
        })
    }
}

impl<D: Document> Repository<D> for InMemoryCollection<D> {
    fn insert(&self, document: D) -> Result<D, RepositoryError> {
        let mut guard = self.lock()?;
        if guard.contains_key(document.id()) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(document.id().clone(), document.clone());
        Ok(document)
    }

    fn update(&self, document: D) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        match guard.get_mut(document.id()) {
            Some(existing) => {
                *existing = document;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn delete(&self, id: &DocumentId) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        guard
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn fetch(&self, id: &DocumentId) -> Result<Option<D>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.get(id).cloned())
    }

    fn list(&self, query: &ListQuery<D>) -> Result<Page<D>, RepositoryError> {
        let snapshot: Vec<D> = self.lock()?.values().cloned().collect();
        Ok(apply_query(snapshot, query))
    }
}
