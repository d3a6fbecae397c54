// src/config.rs

use std::{env, net::SocketAddr, path::PathBuf, str::FromStr, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::{
    common::i18n::I18nStore,
    db::Store,
    models::{
        crm::{Client, Supplier},
        inventory::Product,
        invoice::{Invoice, SupplierInvoice},
    },
    services::{
        auth::AuthService, company_service::CompanyService, dashboard_service::DashboardService,
        directory_service::DirectoryService, document_service::DocumentService,
        inventory_service::InventoryService, invoice_service::InvoiceService, team_service::TeamService,
    },
};

/// Configuração lida do ambiente (e do `.env`, se existir).
#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_addr: SocketAddr,
    // Sem DATABASE_URL: armazenamento em memória
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub token_ttl_days: i64,
    pub bcrypt_cost: u32,
    pub fonts_dir: PathBuf,
    pub low_stock_threshold: i32,
    pub super_admin: Option<(String, String)>,
}

fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{} inválida ({}): {}", name, raw, e)),
        _ => Ok(default),
    }
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let jwt_secret = optional_var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let super_admin = match (optional_var("SUPER_ADMIN_EMAIL"), optional_var("SUPER_ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some((email, password)),
            (None, None) => None,
            _ => anyhow::bail!("SUPER_ADMIN_EMAIL e SUPER_ADMIN_PASSWORD devem ser definidos juntos"),
        };

        let settings = Self {
            bind_addr: parse_var("BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 3000)))?,
            database_url: optional_var("DATABASE_URL"),
            jwt_secret,
            token_ttl_days: parse_var("TOKEN_TTL_DAYS", 7)?,
            bcrypt_cost: parse_var("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            fonts_dir: parse_var("FONTS_DIR", PathBuf::from("./fonts"))?,
            low_stock_threshold: parse_var("LOW_STOCK_THRESHOLD", 10)?,
            super_admin,
        };

        if settings.token_ttl_days <= 0 {
            anyhow::bail!("TOKEN_TTL_DAYS deve ser positivo");
        }
        if !(4..=31).contains(&settings.bcrypt_cost) {
            anyhow::bail!("BCRYPT_COST deve estar entre 4 e 31");
        }

        Ok(settings)
    }

    /// Padrões com o segredo informado (testes e ferramentas).
    pub fn with_secret(jwt_secret: impl Into<String>) -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            database_url: None,
            jwt_secret: jwt_secret.into(),
            token_ttl_days: 7,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            fonts_dir: PathBuf::from("./fonts"),
            low_stock_threshold: 10,
            super_admin: None,
        }
    }
}

/// Postgres se houver DATABASE_URL, memória caso contrário.
pub async fn connect_store(settings: &Settings) -> anyhow::Result<Store> {
    let Some(database_url) = &settings.database_url else {
        tracing::warn!("⚠️ DATABASE_URL não definida: usando armazenamento em memória");
        return Ok(Store::memory());
    };

    // Conecta ao banco de dados, usando '?' para propagar erros
    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .connect(database_url)
        .await
        .context("Falha ao conectar ao banco de dados")?;

    tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

    // Faz o app rodar as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&db_pool)
        .await
        .context("Falha ao rodar as migrações do banco de dados")?;

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    Ok(Store::postgres(db_pool))
}

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub store: Store,
    pub i18n_store: Arc<I18nStore>,

    pub auth_service: AuthService,
    pub company_service: CompanyService,
    pub team_service: TeamService,
    pub client_service: DirectoryService<Client>,
    pub supplier_service: DirectoryService<Supplier>,
    pub product_service: DirectoryService<Product>,
    pub inventory_service: InventoryService,
    pub dashboard_service: DashboardService,
    pub invoice_service: InvoiceService<Invoice>,
    pub supplier_invoice_service: InvoiceService<SupplierInvoice>,
    pub document_service: DocumentService,
}

impl AppState {
    // --- Monta o gráfico de dependências ---
    pub fn new(settings: Settings, store: Store) -> anyhow::Result<Self> {
        let i18n_store = Arc::new(I18nStore::load()?);

        let auth_service = AuthService::new(
            store.accounts.clone(),
            store.profiles.clone(),
            settings.jwt_secret.clone(),
            chrono::Duration::days(settings.token_ttl_days),
            settings.bcrypt_cost,
        );

        Ok(Self {
            auth_service,
            company_service: CompanyService::new(store.companies.clone()),
            team_service: TeamService::new(store.profiles.clone()),
            client_service: DirectoryService::new(store.clients.clone()),
            supplier_service: DirectoryService::new(store.suppliers.clone()),
            product_service: DirectoryService::new(store.products.clone()),
            inventory_service: InventoryService::new(
                store.products.clone(),
                store.supplier_invoices.clone(),
                settings.low_stock_threshold,
            ),
            dashboard_service: DashboardService::new(
                store.clients.clone(),
                store.suppliers.clone(),
                store.products.clone(),
                store.invoices.clone(),
                store.supplier_invoices.clone(),
                settings.low_stock_threshold,
            ),
            invoice_service: InvoiceService::new(store.invoices.clone(), store.clients.clone()),
            supplier_invoice_service: InvoiceService::new(store.supplier_invoices.clone(), store.suppliers.clone()),
            document_service: DocumentService::new(
                store.companies.clone(),
                store.clients.clone(),
                store.suppliers.clone(),
                settings.fonts_dir.clone(),
            ),
            settings: Arc::new(settings),
            store,
            i18n_store,
        })
    }
}
