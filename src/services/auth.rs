// src/services/auth.rs

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use bcrypt::{hash, verify};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{AccountRepository, Repository, Scope},
    models::{
        auth::{AuthResponse, Claims, NewAccount, SessionResponse, SessionView, SignUpPayload, UserAccount},
        profile::{Profile, ProfileUpdate, Role},
    },
};

#[derive(Debug, Clone, Copy)]
struct SessionRecord {
    user_id: Uuid,
    expires_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct AuthService {
    accounts: Arc<dyn AccountRepository>,
    profiles: Arc<dyn Repository<Profile>>,
    jwt_secret: String,
    token_ttl: Duration,
    bcrypt_cost: u32,
    // Sessões abertas, por id. Reiniciar o processo desloga todo mundo.
    sessions: Arc<RwLock<HashMap<Uuid, SessionRecord>>>,
}

impl AuthService {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        profiles: Arc<dyn Repository<Profile>>,
        jwt_secret: String,
        token_ttl: Duration,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            accounts,
            profiles,
            jwt_secret,
            token_ttl,
            bcrypt_cost,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn sign_up(&self, payload: SignUpPayload) -> Result<AuthResponse, AppError> {
        let email = normalize_email(&payload.email);
        if self.accounts.find_by_email(&email).await?.is_some() {
            return Err(AppError::EmailAlreadyExists);
        }

        let password_hash = self.hash_password(payload.password).await?;

        // Quem cria a empresa vira admin dela
        let role = if payload.company_name.is_some() { Role::Admin } else { Role::Staff };

        let registered = self
            .accounts
            .register(NewAccount {
                email,
                password_hash,
                username: payload.username.trim().to_string(),
                full_name: payload.full_name.trim().to_string(),
                company_name: payload.company_name.map(|name| name.trim().to_string()),
                role,
            })
            .await?;

        if let Some(company) = &registered.company {
            tracing::info!("🏢 Empresa '{}' criada no cadastro de {}", company.name, registered.user.email);
        }

        self.open_session(registered.user, registered.profile).await
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthResponse, AppError> {
        let user = self
            .accounts
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        let profile = self.profiles.find_by_id(user.id).await?.ok_or(AppError::UserNotFound)?;
        self.open_session(user, profile).await
    }

    pub async fn sign_out(&self, session_id: Uuid) {
        self.sessions.write().await.remove(&session_id);
    }

    /// Sessão dona do token. Token revogado ou expirado -> `InvalidToken`.
    pub async fn validate_token(&self, token: &str) -> Result<SessionView, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;
        let claims = token_data.claims;

        let record = self
            .sessions
            .read()
            .await
            .get(&claims.sid)
            .copied()
            .filter(|record| record.user_id == claims.sub)
            .ok_or(AppError::InvalidToken)?;

        // Expirada: sai do registro na hora
        if record.expires_at <= Utc::now() {
            self.sessions.write().await.remove(&claims.sid);
            return Err(AppError::InvalidToken);
        }

        let user = self.accounts.find_by_id(record.user_id).await?.ok_or(AppError::UserNotFound)?;
        // Perfil sempre fresco: cargo e empresa podem ter mudado desde o login
        let profile = self.profiles.find_by_id(user.id).await?.ok_or(AppError::UserNotFound)?;

        Ok(SessionView {
            session_id: claims.sid,
            user,
            profile,
            expires_at: record.expires_at,
        })
    }

    pub async fn get_session(&self, token: Option<&str>) -> Result<SessionResponse, AppError> {
        let Some(token) = token else {
            return Ok(SessionResponse { session: None });
        };

        match self.validate_token(token).await {
            Ok(session) => Ok(SessionResponse { session: Some(session) }),
            Err(AppError::InvalidToken | AppError::UserNotFound) => Ok(SessionResponse { session: None }),
            Err(e) => Err(e),
        }
    }

    /// Garante a conta super_admin configurada (promove se já existir).
    pub async fn ensure_super_admin(&self, email: &str, password: &str) -> Result<Profile, AppError> {
        let email = normalize_email(email);

        if let Some(user) = self.accounts.find_by_email(&email).await? {
            let profile = self.profiles.get(user.id).await?;
            if profile.role == Role::SuperAdmin {
                return Ok(profile);
            }
            tracing::info!("⬆️ Promovendo {} a super_admin", email);
            return self
                .profiles
                .update(user.id, ProfileUpdate { role: Some(Role::SuperAdmin), ..Default::default() })
                .await;
        }

        let password_hash = self.hash_password(password.to_owned()).await?;
        let username = self.free_username(email.split('@').next().unwrap_or("admin")).await?;

        let registered = self
            .accounts
            .register(NewAccount {
                email: email.clone(),
                password_hash,
                username,
                full_name: "Super Admin".to_string(),
                company_name: None,
                role: Role::SuperAdmin,
            })
            .await?;

        tracing::info!("✅ Conta super_admin {} criada", email);
        Ok(registered.profile)
    }

    // "root", "root2", "root3"... o primeiro que ninguém usa
    async fn free_username(&self, base: &str) -> Result<String, AppError> {
        let base = if base.is_empty() { "admin" } else { base };
        let taken: HashSet<String> = self.profiles.list(Scope::All).await?.into_iter().map(|p| p.username).collect();

        let mut username = base.to_string();
        let mut suffix = 1;
        while taken.contains(&username) {
            suffix += 1;
            username = format!("{}{}", base, suffix);
        }
        if username != base {
            tracing::warn!("⚠️ Usuário '{}' já existe; super_admin criado como '{}'", base, username);
        }
        Ok(username)
    }

    async fn hash_password(&self, password: String) -> Result<String, AppError> {
        let cost = self.bcrypt_cost;
        let hashed = tokio::task::spawn_blocking(move || hash(&password, cost))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
        Ok(hashed)
    }

    async fn open_session(&self, user: UserAccount, profile: Profile) -> Result<AuthResponse, AppError> {
        let now = Utc::now();
        let expires_at = now + self.token_ttl;
        let session_id = Uuid::new_v4();

        let claims = Claims {
            sub: user.id,
            sid: session_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?;

        let mut sessions = self.sessions.write().await;
        // Limpa as vencidas a cada login: o registro não cresce sem limite
        sessions.retain(|_, record| record.expires_at > now);
        sessions.insert(session_id, SessionRecord { user_id: user.id, expires_at });
        drop(sessions);

        Ok(AuthResponse {
            token,
            session: SessionView { session_id, user, profile, expires_at },
        })
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
