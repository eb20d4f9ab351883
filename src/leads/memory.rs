use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::leads::repo::LeadStore;
use crate::leads::repo_types::{Lead, LeadFilter, LeadPatch, NewLead};

fn matches(filter: &LeadFilter, lead: &Lead) -> bool {
    match &filter.search {
        None => true,
        Some(q) => {
            let q = q.to_lowercase();
            lead.full_name.to_lowercase().contains(&q) || lead.email.to_lowercase().contains(&q)
        }
    }
}

fn apply(patch: LeadPatch, lead: &mut Lead) {
    if let Some(v) = patch.full_name {
        lead.full_name = v;
    }
    if let Some(v) = patch.email {
        lead.email = v;
    }
    if let Some(v) = patch.phone {
        lead.phone = v;
    }
    if let Some(v) = patch.role {
        lead.role = v;
    }
    if let Some(v) = patch.birth_date {
        lead.birth_date = v;
    }
    if let Some(v) = patch.message {
        lead.message = v;
    }
}

/// Vec-backed store used by handler tests. Keeps insertion order.
#[derive(Default)]
pub struct MemoryLeadStore {
    leads: RwLock<Vec<Lead>>,
}

#[async_trait]
impl LeadStore for MemoryLeadStore {
    async fn list_all(&self, filter: &LeadFilter) -> StoreResult<Vec<Lead>> {
        let leads = self.leads.read().await;
        let matching = leads.iter().filter(|l| matches(filter, l)).cloned();
        let skipped = matching.skip(usize::try_from(filter.offset).unwrap_or(0));
        Ok(match filter.limit {
            Some(limit) => skipped.take(usize::try_from(limit).unwrap_or(0)).collect(),
            None => skipped.collect(),
        })
    }

    async fn get_by_id(&self, id: Uuid) -> StoreResult<Lead> {
        self.leads
            .read()
            .await
            .iter()
            .find(|l| l.id == id)
            .cloned()
            .ok_or(StoreError::NotFound("lead"))
    }

    async fn create(&self, lead: NewLead) -> StoreResult<Lead> {
        let a = lead.attribution;
        let row = Lead {
            id: Uuid::new_v4(),
            full_name: lead.full_name,
            email: lead.email,
            phone: lead.phone,
            role: lead.role,
            birth_date: lead.birth_date,
            message: lead.message,
            utm_source: a.utm_source,
            utm_medium: a.utm_medium,
            utm_campaign: a.utm_campaign,
            utm_term: a.utm_term,
            utm_content: a.utm_content,
            gclid: a.gclid,
            fbclid: a.fbclid,
            created_at: OffsetDateTime::now_utc(),
            updated_at: None,
        };
        self.leads.write().await.push(row.clone());
        Ok(row)
    }

    async fn update(&self, id: Uuid, patch: LeadPatch) -> StoreResult<Lead> {
        let mut leads = self.leads.write().await;
        let lead = leads
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or(StoreError::NotFound("lead"))?;
        apply(patch, lead);
        lead.updated_at = Some(OffsetDateTime::now_utc().max(lead.created_at));
        Ok(lead.clone())
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let mut leads = self.leads.write().await;
        let before = leads.len();
        leads.retain(|l| l.id != id);
        if leads.len() == before {
            return Err(StoreError::NotFound("lead"));
        }
        Ok(())
    }
}
