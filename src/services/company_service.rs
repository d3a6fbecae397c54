// src/services/company_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{Repository, Scope},
    models::company::{Company, CompanyUpdate, NewCompany},
};

#[derive(Clone)]
pub struct CompanyService {
    repo: Arc<dyn Repository<Company>>,
}

impl CompanyService {
    pub fn new(repo: Arc<dyn Repository<Company>>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<Company>, AppError> {
        self.repo.list(Scope::All).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Company, AppError> {
        self.repo.get(id).await
    }

    pub async fn create(&self, input: NewCompany) -> Result<Company, AppError> {
        let company = self.repo.create(None, input).await?;
        tracing::info!("🏢 Empresa '{}' criada", company.name);
        Ok(company)
    }

    pub async fn update(&self, id: Uuid, input: CompanyUpdate) -> Result<Company, AppError> {
        self.repo.update(id, input).await
    }

    // Perfis, clientes e faturas da empresa ficam onde estão
    pub async fn delete(&self, id: Uuid) -> Result<Company, AppError> {
        let company = self.repo.delete(id).await?;
        tracing::info!("🗑️ Empresa '{}' removida", company.name);
        Ok(company)
    }
}
