// src/services/team_service.rs
//
// Equipe da empresa e edição do próprio perfil. Perfis nunca são apagados:
// sair da equipe = company_id nulo.

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{Repository, Scope},
    models::{
        access::Capability,
        profile::{Profile, ProfileUpdate, Role},
    },
    services::access::has_capability,
};

#[derive(Clone)]
pub struct TeamService {
    profiles: Arc<dyn Repository<Profile>>,
}

impl TeamService {
    pub fn new(profiles: Arc<dyn Repository<Profile>>) -> Self {
        Self { profiles }
    }

    pub async fn list(&self, scope: Scope) -> Result<Vec<Profile>, AppError> {
        self.profiles.list(scope).await
    }

    // --- Perfil próprio ---

    pub async fn get_own(&self, user_id: Uuid) -> Result<Profile, AppError> {
        self.profiles.get(user_id).await
    }

    pub async fn update_own(&self, user_id: Uuid, update: ProfileUpdate) -> Result<Profile, AppError> {
        // Cargo e empresa só mudam por ação da equipe
        let update = ProfileUpdate { role: None, company_id: None, ..update };
        self.profiles.update(user_id, update).await
    }

    // --- Ações de equipe ---

    /// Vincula um perfil sem empresa à empresa do recorte.
    pub async fn add_member(
        &self,
        actor: &Profile,
        scope: Scope,
        username: &str,
        role: Option<Role>,
    ) -> Result<Profile, AppError> {
        ensure_can_manage(actor)?;
        let company_id = scope.target_company()?;
        let role = role.unwrap_or(Role::Staff);
        ensure_can_grant(actor, role)?;

        let target = self
            .profiles
            .list(Scope::All)
            .await?
            .into_iter()
            .find(|p| p.username == username)
            .ok_or(AppError::NotFound("profile"))?;

        ensure_can_touch(actor, &target)?;
        match target.company_id {
            Some(current) if current != company_id => return Err(AppError::Forbidden),
            _ => {}
        }

        let member = self
            .profiles
            .update(
                target.id,
                ProfileUpdate { role: Some(role), company_id: Some(Some(company_id)), ..Default::default() },
            )
            .await?;

        tracing::info!("👥 {} entrou na empresa {} como {:?}", member.username, company_id, role);
        Ok(member)
    }

    pub async fn change_role(&self, actor: &Profile, scope: Scope, profile_id: Uuid, role: Role) -> Result<Profile, AppError> {
        ensure_can_manage(actor)?;
        ensure_can_grant(actor, role)?;
        let target = self.member_in_scope(actor, scope, profile_id).await?;

        self.profiles
            .update(target.id, ProfileUpdate { role: Some(role), ..Default::default() })
            .await
    }

    pub async fn remove_member(&self, actor: &Profile, scope: Scope, profile_id: Uuid) -> Result<Profile, AppError> {
        ensure_can_manage(actor)?;
        let target = self.member_in_scope(actor, scope, profile_id).await?;

        let detached = self
            .profiles
            .update(target.id, ProfileUpdate { company_id: Some(None), ..Default::default() })
            .await?;

        tracing::info!("👋 {} saiu da equipe", detached.username);
        Ok(detached)
    }

    async fn member_in_scope(&self, actor: &Profile, scope: Scope, profile_id: Uuid) -> Result<Profile, AppError> {
        let target = self.profiles.get(profile_id).await?;
        if !scope.includes(target.company_id) {
            return Err(AppError::NotFound("profile"));
        }
        ensure_can_touch(actor, &target)?;
        Ok(target)
    }
}

fn ensure_can_manage(actor: &Profile) -> Result<(), AppError> {
    if has_capability(actor.role, Capability::ManageTeam) {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

// Só super_admin mexe em outro super_admin
fn ensure_can_touch(actor: &Profile, target: &Profile) -> Result<(), AppError> {
    if target.role == Role::SuperAdmin && actor.role != Role::SuperAdmin {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

fn ensure_can_grant(actor: &Profile, role: Role) -> Result<(), AppError> {
    if role == Role::SuperAdmin && actor.role != Role::SuperAdmin {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryRepository;
    use crate::models::profile::NewProfile;

    async fn seed(repo: &MemoryRepository<Profile>, username: &str, role: Role, company_id: Option<Uuid>) -> Profile {
        let new = NewProfile { user_id: Uuid::new_v4(), username: username.into(), full_name: username.into(), role };
        repo.create(company_id, new).await.unwrap()
    }

    #[tokio::test]
    async fn admin_attaches_and_detaches_members() {
        let repo = MemoryRepository::<Profile>::new();
        let company = Uuid::new_v4();
        let admin = seed(&repo, "admin", Role::Admin, Some(company)).await;
        seed(&repo, "joao", Role::Staff, None).await;
        let team = TeamService::new(Arc::new(repo));

        let member = team.add_member(&admin, Scope::Company(company), "joao", Some(Role::Manager)).await.unwrap();
        assert_eq!(member.company_id, Some(company));
        assert_eq!(member.role, Role::Manager);
        assert_eq!(team.list(Scope::Company(company)).await.unwrap().len(), 2);

        let detached = team.remove_member(&admin, Scope::Company(company), member.id).await.unwrap();
        assert_eq!(detached.company_id, None);
        // O perfil continua existindo
        assert!(team.get_own(member.id).await.is_ok());
    }

    #[tokio::test]
    async fn staff_cannot_manage_the_team() {
        let repo = MemoryRepository::<Profile>::new();
        let company = Uuid::new_v4();
        let staff = seed(&repo, "staff", Role::Staff, Some(company)).await;
        seed(&repo, "joao", Role::Staff, None).await;
        let team = TeamService::new(Arc::new(repo));

        let result = team.add_member(&staff, Scope::Company(company), "joao", None).await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn only_super_admin_grants_super_admin() {
        let repo = MemoryRepository::<Profile>::new();
        let company = Uuid::new_v4();
        let admin = seed(&repo, "admin", Role::Admin, Some(company)).await;
        let colleague = seed(&repo, "ana", Role::Staff, Some(company)).await;
        let root = seed(&repo, "root", Role::SuperAdmin, None).await;
        let team = TeamService::new(Arc::new(repo));

        let denied = team.change_role(&admin, Scope::Company(company), colleague.id, Role::SuperAdmin).await;
        assert!(matches!(denied, Err(AppError::Forbidden)));

        let granted = team.change_role(&root, Scope::All, colleague.id, Role::SuperAdmin).await.unwrap();
        assert_eq!(granted.role, Role::SuperAdmin);
    }

    #[tokio::test]
    async fn members_of_other_companies_are_out_of_reach() {
        let repo = MemoryRepository::<Profile>::new();
        let company = Uuid::new_v4();
        let admin = seed(&repo, "admin", Role::Admin, Some(company)).await;
        let outsider = seed(&repo, "fora", Role::Staff, Some(Uuid::new_v4())).await;
        let team = TeamService::new(Arc::new(repo));

        let result = team.remove_member(&admin, Scope::Company(company), outsider.id).await;
        assert!(matches!(result, Err(AppError::NotFound("profile"))));

        let poached = team.add_member(&admin, Scope::Company(company), "fora", None).await;
        assert!(matches!(poached, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn admin_cannot_enlist_a_super_admin() {
        let repo = MemoryRepository::<Profile>::new();
        let company = Uuid::new_v4();
        let admin = seed(&repo, "admin", Role::Admin, Some(company)).await;
        let root = seed(&repo, "root", Role::SuperAdmin, None).await;
        let team = TeamService::new(Arc::new(repo));

        let result = team.add_member(&admin, Scope::Company(company), "root", Some(Role::Staff)).await;
        assert!(matches!(result, Err(AppError::Forbidden)));

        // Continua super_admin e sem empresa
        let untouched = team.get_own(root.id).await.unwrap();
        assert_eq!(untouched.role, Role::SuperAdmin);
        assert_eq!(untouched.company_id, None);
    }

    #[tokio::test]
    async fn self_service_cannot_change_role() {
        let repo = MemoryRepository::<Profile>::new();
        let me = seed(&repo, "maria", Role::Staff, None).await;
        let team = TeamService::new(Arc::new(repo));

        let update = ProfileUpdate {
            full_name: Some("Maria S.".into()),
            role: Some(Role::SuperAdmin),
            ..Default::default()
        };
        let updated = team.update_own(me.id, update).await.unwrap();

        assert_eq!(updated.full_name, "Maria S.");
        assert_eq!(updated.role, Role::Staff);
    }
}
