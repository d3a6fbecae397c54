// src/services/access.rs
//
// Portão de autorização. Recusa é um resultado (`RouteDecision::Denied`), nunca um erro,
// e não é logada.

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::Scope,
    models::{
        access::{Capability, NavigationEntry, Page, PageRule, RouteDecision},
        profile::{Profile, Role},
    },
};

pub const COMPANIES_DENIED: &str = "Access denied. Only super administrators can manage companies.";
pub const NO_COMPANY_DENIED: &str = "Access denied. You must belong to a company to view this page.";

/// Estado da identidade no ciclo de vida da sessão.
#[derive(Debug, Clone, PartialEq)]
pub enum Identity {
    // Sessão ainda sendo carregada
    Unknown,
    Anonymous,
    Authenticated(Profile),
}

// =========================================================================
//  TABELA DE POLÍTICAS
// =========================================================================

pub fn capabilities(role: Role) -> &'static [Capability] {
    match role {
        Role::SuperAdmin => &[
            Capability::ManageCompanies,
            Capability::AccessCompanyData,
            Capability::BypassCompanyScope,
            Capability::ManageTeam,
        ],
        Role::Admin => &[Capability::AccessCompanyData, Capability::ManageTeam],
        Role::Manager | Role::Staff => &[Capability::AccessCompanyData],
    }
}

pub fn has_capability(role: Role, capability: Capability) -> bool {
    capabilities(role).contains(&capability)
}

pub fn decide(identity: &Identity, page: Page) -> RouteDecision {
    let profile = match identity {
        Identity::Unknown => return RouteDecision::Loading,
        Identity::Anonymous => {
            return match page.rule() {
                PageRule::AnonymousOnly => RouteDecision::Render,
                _ => RouteDecision::Redirect { to: Page::SignIn },
            };
        }
        Identity::Authenticated(profile) => profile,
    };

    match page.rule() {
        PageRule::AnonymousOnly => RouteDecision::Redirect { to: Page::Home },
        PageRule::Authenticated => RouteDecision::Render,
        PageRule::SuperAdminOnly => {
            if has_capability(profile.role, Capability::ManageCompanies) {
                RouteDecision::Render
            } else {
                RouteDecision::Denied { message: COMPANIES_DENIED.to_string() }
            }
        }
        PageRule::CompanyScoped => {
            let in_company = profile.company_id.is_some()
                && has_capability(profile.role, Capability::AccessCompanyData);
            if in_company || has_capability(profile.role, Capability::BypassCompanyScope) {
                RouteDecision::Render
            } else {
                RouteDecision::Denied { message: NO_COMPANY_DENIED.to_string() }
            }
        }
    }
}

pub fn navigation(identity: &Identity) -> Vec<NavigationEntry> {
    Page::ALL
        .iter()
        .map(|&page| NavigationEntry { page, decision: decide(identity, page) })
        .collect()
}

/// Recorte de empresa das listagens.
///
/// super_admin escolhe a empresa (ou vê todas); os demais ficam na própria.
/// `Ok(None)` = perfil sem empresa.
pub fn resolve_scope(profile: &Profile, requested_company: Option<Uuid>) -> Result<Option<Scope>, AppError> {
    if has_capability(profile.role, Capability::BypassCompanyScope) {
        return Ok(Some(requested_company.map(Scope::Company).unwrap_or(Scope::All)));
    }

    match (profile.company_id, requested_company) {
        (Some(own), Some(requested)) if own != requested => Err(AppError::Forbidden),
        (Some(own), _) => Ok(Some(Scope::Company(own))),
        (None, Some(_)) => Err(AppError::Forbidden),
        (None, None) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn profile(role: Role, company_id: Option<Uuid>) -> Profile {
        Profile {
            id: Uuid::new_v4(),
            username: "maria".into(),
            full_name: "Maria".into(),
            company_id,
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    const SCOPED: [Page; 7] = [
        Page::Team,
        Page::Clients,
        Page::Suppliers,
        Page::Invoices,
        Page::SupplierInvoices,
        Page::Products,
        Page::Inventory,
    ];

    #[test]
    fn unknown_identity_is_always_loading() {
        for page in Page::ALL {
            assert_eq!(decide(&Identity::Unknown, page), RouteDecision::Loading);
        }
    }

    #[test]
    fn anonymous_is_sent_to_sign_in() {
        assert_eq!(decide(&Identity::Anonymous, Page::SignIn), RouteDecision::Render);
        for page in Page::ALL.into_iter().filter(|p| *p != Page::SignIn) {
            assert_eq!(decide(&Identity::Anonymous, page), RouteDecision::Redirect { to: Page::SignIn });
        }
    }

    #[test]
    fn signed_in_users_leave_the_sign_in_page() {
        let identity = Identity::Authenticated(profile(Role::Staff, None));
        assert_eq!(decide(&identity, Page::SignIn), RouteDecision::Redirect { to: Page::Home });
        assert_eq!(decide(&identity, Page::Home), RouteDecision::Render);
        assert_eq!(decide(&identity, Page::Profile), RouteDecision::Render);
    }

    #[test]
    fn super_admin_without_company_bypasses_scoping() {
        let identity = Identity::Authenticated(profile(Role::SuperAdmin, None));
        for page in SCOPED {
            assert_eq!(decide(&identity, page), RouteDecision::Render);
        }
        assert_eq!(decide(&identity, Page::Companies), RouteDecision::Render);
    }

    #[test]
    fn staff_without_company_is_denied_scoped_pages() {
        let identity = Identity::Authenticated(profile(Role::Staff, None));
        for page in SCOPED {
            assert_eq!(
                decide(&identity, page),
                RouteDecision::Denied { message: NO_COMPANY_DENIED.to_string() }
            );
        }
    }

    #[test]
    fn only_super_admin_manages_companies() {
        for role in [Role::Admin, Role::Manager, Role::Staff] {
            let identity = Identity::Authenticated(profile(role, Some(Uuid::new_v4())));
            assert_eq!(
                decide(&identity, Page::Companies),
                RouteDecision::Denied { message: COMPANIES_DENIED.to_string() }
            );
            assert_eq!(decide(&identity, Page::Clients), RouteDecision::Render);
        }
    }

    #[test]
    fn policy_table() {
        assert!(has_capability(Role::Admin, Capability::ManageTeam));
        assert!(!has_capability(Role::Manager, Capability::ManageTeam));
        assert!(!has_capability(Role::Admin, Capability::BypassCompanyScope));
        assert_eq!(capabilities(Role::SuperAdmin).len(), 4);
    }

    #[test]
    fn navigation_covers_every_page() {
        let entries = navigation(&Identity::Anonymous);
        assert_eq!(entries.len(), Page::ALL.len());
        assert_eq!(entries[0].page, Page::SignIn);
    }

    #[test]
    fn scope_resolution() {
        let company = Uuid::new_v4();
        let other = Uuid::new_v4();

        let root = profile(Role::SuperAdmin, None);
        assert_eq!(resolve_scope(&root, None).unwrap(), Some(Scope::All));
        assert_eq!(resolve_scope(&root, Some(other)).unwrap(), Some(Scope::Company(other)));

        let admin = profile(Role::Admin, Some(company));
        assert_eq!(resolve_scope(&admin, None).unwrap(), Some(Scope::Company(company)));
        assert_eq!(resolve_scope(&admin, Some(company)).unwrap(), Some(Scope::Company(company)));
        assert!(matches!(resolve_scope(&admin, Some(other)), Err(AppError::Forbidden)));

        let loose = profile(Role::Staff, None);
        assert_eq!(resolve_scope(&loose, None).unwrap(), None);
    }
}
