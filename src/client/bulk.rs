// src/client/bulk.rs
//
// Barra flutuante de ações em massa da tabela de leads.
// Cada ação faz exatamente uma requisição.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    client::{
        api::{ClientError, LeadsApi},
        csv::{export_filename, leads_to_csv, CsvExport},
        selection::SelectionSet,
        store::AppStore,
    },
    common::response::BulkResult,
    models::lead::{Lead, LeadPatch, LeadStatus},
};

#[derive(Debug, Default)]
pub struct BulkLeadActions {
    selection: SelectionSet<Uuid>,
}

impl BulkLeadActions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &SelectionSet<Uuid> {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionSet<Uuid> {
        &mut self.selection
    }

    /// A barra só aparece com alguma linha marcada
    pub fn is_visible(&self) -> bool {
        !self.selection.is_empty()
    }

    pub fn clear(&mut self) {
        self.selection.clear();
    }

    /// `PUT /api/leads` com `{ids, data: {status}}`
    pub async fn update_status<A>(&mut self, api: &A, store: &mut AppStore, status: LeadStatus) -> Result<u64, ClientError>
    where
        A: LeadsApi + ?Sized,
    {
        if self.selection.is_empty() {
            return Ok(0);
        }
        let ids = self.selection.ids();

        store.begin_loading();
        let result = api.bulk_update_leads(&ids, &LeadPatch::status(status)).await;
        store.end_loading();

        self.finish(store, result, |n| format!("{n} lead(s) moved to {}", status.as_str()))
    }

    /// `DELETE /api/leads` com `{ids}`. Remoção de uma linha usa o mesmo contrato.
    pub async fn delete<A>(&mut self, api: &A, store: &mut AppStore) -> Result<u64, ClientError>
    where
        A: LeadsApi + ?Sized,
    {
        if self.selection.is_empty() {
            return Ok(0);
        }
        let ids = self.selection.ids();

        store.begin_loading();
        let result = api.bulk_delete_leads(&ids).await;
        store.end_loading();

        self.finish(store, result, |n| format!("{n} lead(s) deleted"))
    }

    /// Remoção pelo menu da linha: mesmo `DELETE /api/leads`, com um id só.
    /// Só essa linha sai da seleção; as outras continuam marcadas.
    pub async fn delete_one<A>(&mut self, api: &A, store: &mut AppStore, id: Uuid) -> Result<u64, ClientError>
    where
        A: LeadsApi + ?Sized,
    {
        store.begin_loading();
        let result = api.bulk_delete_leads(&[id]).await;
        store.end_loading();

        match result {
            Ok(done) => {
                self.selection.remove(&id);
                store.success("Lead deleted");
                store.request_revalidation();
                Ok(done.affected)
            }
            Err(e) => {
                tracing::warn!(lead_id = %id, "Lead delete failed: {}", e);
                store.error(e.to_string());
                Err(e)
            }
        }
    }

    /// CSV das linhas marcadas, ou de todas quando nada está marcado.
    pub fn export_csv(&self, rows: &[Lead], today: NaiveDate) -> CsvExport {
        let body = if self.selection.is_empty() {
            leads_to_csv(rows)
        } else {
            leads_to_csv(rows.iter().filter(|lead| self.selection.contains(&lead.id)))
        };

        CsvExport {
            filename: export_filename(today),
            body,
        }
    }

    // Sucesso: limpa, avisa e revalida uma vez. Falha: avisa e mantém a seleção.
    fn finish(
        &mut self,
        store: &mut AppStore,
        result: Result<BulkResult, ClientError>,
        message: impl FnOnce(u64) -> String,
    ) -> Result<u64, ClientError> {
        match result {
            Ok(done) => {
                self.selection.clear();
                store.success(message(done.affected));
                store.request_revalidation();
                Ok(done.affected)
            }
            Err(e) => {
                tracing::warn!(selected = self.selection.len(), "Bulk lead action failed: {}", e);
                store.error(e.to_string());
                Err(e)
            }
        }
    }
}
