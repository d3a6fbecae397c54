// src/services/directory_service.rs
//
// Cadastros simples por empresa: clientes, fornecedores e produtos.

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{Entity, Repository, Scope},
};

pub struct DirectoryService<E: Entity> {
    repo: Arc<dyn Repository<E>>,
}

impl<E: Entity> Clone for DirectoryService<E> {
    fn clone(&self) -> Self {
        Self { repo: Arc::clone(&self.repo) }
    }
}

impl<E: Entity> DirectoryService<E> {
    pub fn new(repo: Arc<dyn Repository<E>>) -> Self {
        Self { repo }
    }

    pub async fn list(&self, scope: Scope) -> Result<Vec<E>, AppError> {
        self.repo.list(scope).await
    }

    pub async fn get(&self, scope: Scope, id: Uuid) -> Result<E, AppError> {
        self.repo.get_in(scope, id).await
    }

    /// Grava na empresa do recorte; `Scope::All` sem empresa escolhida falha.
    pub async fn create(&self, scope: Scope, input: E::Create) -> Result<E, AppError> {
        let company_id = scope.target_company()?;
        let created = self.repo.create(Some(company_id), input).await?;
        tracing::info!("✅ {} {} criado na empresa {}", E::KIND, created.id(), company_id);
        Ok(created)
    }

    // Por id, mas só dentro do recorte
    pub async fn update(&self, scope: Scope, id: Uuid, input: E::Update) -> Result<E, AppError> {
        self.repo.get_in(scope, id).await?;
        self.repo.update(id, input).await
    }

    pub async fn delete(&self, scope: Scope, id: Uuid) -> Result<E, AppError> {
        self.repo.get_in(scope, id).await?;
        let removed = self.repo.delete(id).await?;
        tracing::info!("🗑️ {} {} removido", E::KIND, id);
        Ok(removed)
    }
}
