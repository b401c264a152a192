//! In-memory implementation of the directory ports

use super::{
    EngagementDirectory, EngagementInfo, ProfessionalDirectory, ProfessionalSummary,
    TransactionDirectory, TransactionInfo,
};
use crate::error::DirectoryError;
use crate::types::{EngagementId, TransactionId};
use async_trait::async_trait;
use landpath_catalog::ProfessionalRole;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Directory backed by process memory
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    transactions: RwLock<HashMap<TransactionId, TransactionInfo>>,
    engagements: RwLock<HashMap<EngagementId, EngagementInfo>>,
    professionals: RwLock<Vec<ProfessionalSummary>>,
}

impl InMemoryDirectory {
    /// Create empty directory
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a transaction
    pub fn insert_transaction(&self, transaction: TransactionInfo) {
        self.transactions.write().insert(transaction.id, transaction);
    }

    /// Add or replace an engagement
    pub fn insert_engagement(&self, engagement: EngagementInfo) {
        self.engagements.write().insert(engagement.id, engagement);
    }

    /// Add a professional
    pub fn insert_professional(&self, professional: ProfessionalSummary) {
        self.professionals.write().push(professional);
    }
}

#[async_trait]
impl TransactionDirectory for InMemoryDirectory {
    async fn transaction(&self, id: TransactionId) -> Result<Option<TransactionInfo>, DirectoryError> {
        Ok(self.transactions.read().get(&id).cloned())
    }
}

#[async_trait]
impl EngagementDirectory for InMemoryDirectory {
    async fn engagement(&self, id: EngagementId) -> Result<Option<EngagementInfo>, DirectoryError> {
        Ok(self.engagements.read().get(&id).cloned())
    }
}

#[async_trait]
impl ProfessionalDirectory for InMemoryDirectory {
    async fn professionals_by_role(
        &self,
        role: ProfessionalRole,
        limit: usize,
    ) -> Result<Vec<ProfessionalSummary>, DirectoryError> {
        let mut matches: Vec<_> = self
            .professionals
            .read()
            .iter()
            .filter(|p| p.role == role)
            .cloned()
            .collect();

        // Verified first, then best rated
        matches.sort_by(|a, b| {
            b.verified.cmp(&a.verified).then_with(|| {
                b.rating
                    .unwrap_or(0.0)
                    .total_cmp(&a.rating.unwrap_or(0.0))
            })
        });
        matches.truncate(limit);
        Ok(matches)
    }
}
