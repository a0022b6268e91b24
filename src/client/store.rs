// src/client/store.rs
//
// Estado transitório do shell do dashboard. Nunca é persistido.

use chrono::{DateTime, Duration, Utc};

/// Quanto tempo um toast fica na tela
pub const TOAST_TTL_SECS: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub severity: Severity,
    pub expires_at: DateTime<Utc>,
}

/// Arquivo já enviado ao storage, aguardando o salvar do formulário
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub name: String,
    pub url: String,
    pub size: u64,
}

#[derive(Debug, Default)]
pub struct AppStore {
    toasts: Vec<Toast>,
    next_toast_id: u64,
    loading: u32,
    revalidation_epoch: u64,
    staged_files: Vec<StagedFile>,
}

impl AppStore {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    //  TOASTS
    // =========================================================================

    pub fn push_toast(&mut self, severity: Severity, message: impl Into<String>) -> u64 {
        self.push_toast_at(severity, message, Utc::now())
    }

    pub fn push_toast_at(&mut self, severity: Severity, message: impl Into<String>, now: DateTime<Utc>) -> u64 {
        self.next_toast_id += 1;
        let id = self.next_toast_id;
        self.toasts.push(Toast {
            id,
            message: message.into(),
            severity,
            expires_at: now + Duration::seconds(TOAST_TTL_SECS),
        });
        id
    }

    pub fn success(&mut self, message: impl Into<String>) -> u64 {
        self.push_toast(Severity::Success, message)
    }

    pub fn error(&mut self, message: impl Into<String>) -> u64 {
        self.push_toast(Severity::Error, message)
    }

    pub fn dismiss(&mut self, id: u64) {
        self.toasts.retain(|t| t.id != id);
    }

    /// Remove os toasts vencidos
    pub fn prune_expired(&mut self, now: DateTime<Utc>) {
        self.toasts.retain(|t| t.expires_at > now);
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    // =========================================================================
    //  LOADING GLOBAL (contador: requisições sobrepostas)
    // =========================================================================

    pub fn begin_loading(&mut self) {
        self.loading += 1;
    }

    pub fn end_loading(&mut self) {
        self.loading = self.loading.saturating_sub(1);
    }

    pub fn is_loading(&self) -> bool {
        self.loading > 0
    }

    // =========================================================================
    //  REVALIDAÇÃO
    // =========================================================================

    /// Pede para o loader da rota buscar tudo de novo.
    pub fn request_revalidation(&mut self) {
        self.revalidation_epoch += 1;
        tracing::debug!(epoch = self.revalidation_epoch, "Revalidation requested");
    }

    pub fn revalidation_epoch(&self) -> u64 {
        self.revalidation_epoch
    }

    // =========================================================================
    //  UPLOAD DE IMAGENS
    // =========================================================================

    pub fn stage_file(&mut self, file: StagedFile) {
        self.staged_files.push(file);
    }

    pub fn unstage_file(&mut self, index: usize) -> Option<StagedFile> {
        (index < self.staged_files.len()).then(|| self.staged_files.remove(index))
    }

    /// Reordena (a primeira imagem é a capa). Índice inválido não faz nada.
    pub fn move_staged_file(&mut self, from: usize, to: usize) {
        let len = self.staged_files.len();
        if from >= len || to >= len || from == to {
            return;
        }
        let file = self.staged_files.remove(from);
        self.staged_files.insert(to, file);
    }

    pub fn staged_files(&self) -> &[StagedFile] {
        &self.staged_files
    }

    /// Esvazia a fila, acrescentando as URLs às imagens do imóvel.
    pub fn drain_staged_into(&mut self, images: &mut Vec<String>) {
        images.extend(self.staged_files.drain(..).map(|f| f.url));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> StagedFile {
        StagedFile {
            name: name.to_string(),
            url: format!("https://cdn.example.com/{name}"),
            size: 1024,
        }
    }

    #[test]
    fn toasts_expire_after_ttl() {
        let mut store = AppStore::new();
        let now = Utc::now();
        let first = store.push_toast_at(Severity::Success, "Saved", now);
        let second = store.push_toast_at(Severity::Error, "Failed", now + Duration::seconds(3));
        assert_ne!(first, second);

        store.prune_expired(now + Duration::seconds(TOAST_TTL_SECS));
        assert_eq!(store.toasts().len(), 1);
        assert_eq!(store.toasts()[0].message, "Failed");

        store.dismiss(second);
        assert!(store.toasts().is_empty());
    }

    #[test]
    fn loading_counter_never_underflows() {
        let mut store = AppStore::new();
        store.begin_loading();
        store.begin_loading();
        store.end_loading();
        assert!(store.is_loading());
        store.end_loading();
        store.end_loading();
        assert!(!store.is_loading());
    }

    #[test]
    fn staged_files_reorder_and_drain() {
        let mut store = AppStore::new();
        store.stage_file(file("a.jpg"));
        store.stage_file(file("b.jpg"));
        store.stage_file(file("c.jpg"));

        store.move_staged_file(2, 0);
        assert_eq!(store.unstage_file(1).map(|f| f.name), Some("a.jpg".to_string()));
        assert!(store.unstage_file(7).is_none());

        let mut images = vec!["https://cdn.example.com/existing.jpg".to_string()];
        store.drain_staged_into(&mut images);

        assert_eq!(
            images,
            vec![
                "https://cdn.example.com/existing.jpg",
                "https://cdn.example.com/c.jpg",
                "https://cdn.example.com/b.jpg",
            ]
        );
        assert!(store.staged_files().is_empty());
    }
}
