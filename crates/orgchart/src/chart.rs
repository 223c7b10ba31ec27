//! The `Chart` aggregate: the
//! dynamic engine, its `StaticChart` restriction, and the trait hierarchy
//! both implement.

use crate::admin::{self, RoleDef};
use crate::approval::{verify_approval, Approval, Domain, RequestKind};
use crate::block_oracle::BlockOracle;
use crate::config::EngineConfig;
use crate::error::{ChartError, Result};
use crate::events::Event;
use crate::fulfillment::check_fulfillment;
use crate::oracle::{has_role, strictly_has_role};
use crate::registry::RoleRegistry;
use crate::types::{Action, Mask, RoleId};
use crate::user_management;
use orgchart_primitives::{Address, B256};
use std::collections::HashMap;

/// Read-only capability shared by every chart variant.
pub trait ChartQuery {
    fn has_role(&self, user: Address, role_id: RoleId) -> Result<bool>;
    fn strictly_has_role(&self, user: Address, role_id: RoleId) -> Result<bool>;
}

/// Grant/revoke capability, layered on top of [`ChartQuery`].
pub trait ChartUserManagement: ChartQuery {
    fn grant_role(&mut self, approval: &Approval, nominee: Address, role_id: RoleId) -> Result<Event>;
    fn revoke_role(&mut self, approval: &Approval, nominee: Address, role_id: RoleId) -> Result<Event>;
}

/// Add/remove capability, layered on top of [`ChartUserManagement`]. Only
/// [`Chart`] implements this — [`StaticChart`] deliberately does not.
pub trait ChartAdmin: ChartUserManagement {
    fn add_role(&mut self, approval: &Approval, role_def: RoleDef) -> Result<Event>;
    fn remove_role(&mut self, approval: &Approval, role_id: RoleId) -> Result<Event>;
}

/// The full dynamic engine: role registry, user→roles map, signed-request
/// domain, block oracle, and tunable limits, all behind one owning value
/// in one owning value.
pub struct Chart<O: BlockOracle> {
    registry: RoleRegistry,
    user_roles: HashMap<Address, Mask>,
    domain: Domain,
    oracle: O,
    config: EngineConfig,
}

impl<O: BlockOracle> Chart<O> {
    /// Build an empty chart with no roles and no admin rule bound yet. Use
    /// [`Chart::new_with_admin_rules`] to bootstrap a chart whose
    /// `add_role`/`remove_role` should be reachable from the start.
    pub fn new(domain: Domain, oracle: O, config: EngineConfig) -> Self {
        Self {
            registry: RoleRegistry::new(),
            user_roles: HashMap::new(),
            domain,
            oracle,
            config,
        }
    }

    /// Build a chart and immediately bind `admin_rule_hashes` to the
    /// all-bits-set admin sentinel. Admin rules are stored with the
    /// sentinel all-ones value"). A dynamic chart needs at least one such
    /// binding before any `add_role`/`remove_role` approval can ever match
    /// a registered rule.
    pub fn new_with_admin_rules(domain: Domain, oracle: O, config: EngineConfig, admin_rule_hashes: &[B256]) -> Self {
        let mut chart = Self::new(domain, oracle, config);
        for hash in admin_rule_hashes {
            chart.registry.bind_admin_rule_hash(*hash);
        }
        chart
    }

    pub fn registry(&self) -> &RoleRegistry {
        &self.registry
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn oracle_mut(&mut self) -> &mut O {
        &mut self.oracle
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn user_roles_of(&self, user: Address) -> Mask {
        self.user_roles.get(&user).copied().unwrap_or(Mask::ZERO)
    }
}

impl<O: BlockOracle> ChartQuery for Chart<O> {
    fn has_role(&self, user: Address, role_id: RoleId) -> Result<bool> {
        has_role(&self.registry, self.user_roles_of(user), role_id)
    }

    fn strictly_has_role(&self, user: Address, role_id: RoleId) -> Result<bool> {
        strictly_has_role(&self.registry, self.user_roles_of(user), role_id)
    }
}

impl<O: BlockOracle> ChartUserManagement for Chart<O> {
    fn grant_role(&mut self, approval: &Approval, nominee: Address, role_id: RoleId) -> Result<Event> {
        let request = RequestKind::UserManagement {
            nominee,
            action: Action::Grant,
            role_id,
        };
        let verified = verify_approval(
            &self.registry,
            &self.oracle,
            &self.domain,
            &request,
            Action::Grant,
            approval,
            &self.config,
        )?;
        check_fulfillment(
            &self.registry,
            Some(nominee),
            &verified.signers,
            &approval.atoms,
            &approval.assignment,
            |u| self.user_roles_of(u),
            self.config.max_num_signers,
        )?;
        user_management::grant(&mut self.registry, &mut self.user_roles, nominee, role_id)?;
        Ok(Event::RoleGranted { user: nominee, role_id })
    }

    fn revoke_role(&mut self, approval: &Approval, nominee: Address, role_id: RoleId) -> Result<Event> {
        let request = RequestKind::UserManagement {
            nominee,
            action: Action::Revoke,
            role_id,
        };
        let verified = verify_approval(
            &self.registry,
            &self.oracle,
            &self.domain,
            &request,
            Action::Revoke,
            approval,
            &self.config,
        )?;
        check_fulfillment(
            &self.registry,
            Some(nominee),
            &verified.signers,
            &approval.atoms,
            &approval.assignment,
            |u| self.user_roles_of(u),
            self.config.max_num_signers,
        )?;
        user_management::revoke(&mut self.registry, &mut self.user_roles, nominee, role_id)?;
        Ok(Event::RoleRevoked { user: nominee, role_id })
    }
}

impl<O: BlockOracle> ChartAdmin for Chart<O> {
    fn add_role(&mut self, approval: &Approval, role_def: RoleDef) -> Result<Event> {
        admin::validate_add_role(&self.registry, &role_def, &self.config)?;
        if approval.self_sign_required {
            return Err(ChartError::UnexpectedSelfSign);
        }

        let request = RequestKind::AddRole {
            role_id: role_def.role_id,
            role_flag: role_def.flag,
            senior_flags: role_def.senior_flags,
            junior_flags: role_def.junior_flags,
            rule_hashes: role_def.rule_hashes.clone(),
        };
        verify_approval(
            &self.registry,
            &self.oracle,
            &self.domain,
            &request,
            Action::Admin,
            approval,
            &self.config,
        )?;
        admin::apply_add_role(&mut self.registry, &role_def)?;
        Ok(Event::RoleAdded {
            role_id: role_def.role_id,
            senior_flags: role_def.senior_flags,
            junior_flags: role_def.junior_flags,
        })
    }

    fn remove_role(&mut self, approval: &Approval, role_id: RoleId) -> Result<Event> {
        // Surfaces `UnknownRole` up front.
        self.registry.lookup_flag(role_id)?;

        let request = RequestKind::RemoveRole { role_id };
        verify_approval(
            &self.registry,
            &self.oracle,
            &self.domain,
            &request,
            Action::Admin,
            approval,
            &self.config,
        )?;
        admin::apply_remove_role(&mut self.registry, role_id)?;
        Ok(Event::RoleRemoved { role_id })
    }
}

/// One role in a [`ChartSpec`] (ADDED): the construction-time input a
/// surface-language code generator would emit, one entry per role.
#[derive(Debug, Clone)]
pub struct RoleSpec {
    pub role_id: RoleId,
    pub name: String,
    pub flag: Mask,
    pub senior_flags: Mask,
    pub junior_flags: Mask,
    pub rule_hashes: Vec<B256>,
}

/// The full construction-time description of a static chart (ADDED).
#[derive(Debug, Clone)]
pub struct ChartSpec {
    pub roles: Vec<RoleSpec>,
    pub domain_salt: B256,
    pub chain_id: u64,
    pub verifying_contract: Address,
}

/// The static restriction of [`Chart`]: every role is fixed at
/// construction, so only [`ChartQuery`] and [`ChartUserManagement`] are
/// implemented — there is no `add_role`/`remove_role`.
pub struct StaticChart<O: BlockOracle> {
    inner: Chart<O>,
}

impl<O: BlockOracle> StaticChart<O> {
    /// Build a chart directly from a [`ChartSpec`], running the same
    /// mask-derivation arithmetic `add_role` runs once per
    /// role, in the caller-supplied order.
    pub fn build(spec: ChartSpec, oracle: O, config: EngineConfig) -> Result<Self> {
        let domain = Domain::new(spec.chain_id, spec.verifying_contract, spec.domain_salt);
        let mut inner = Chart::new(domain, oracle, config);
        for role in spec.roles {
            let role_def = RoleDef {
                role_id: role.role_id,
                flag: role.flag,
                senior_flags: role.senior_flags,
                junior_flags: role.junior_flags,
                rule_hashes: role.rule_hashes,
            };
            admin::apply_add_role(&mut inner.registry, &role_def)?;
        }
        Ok(Self { inner })
    }

    pub fn registry(&self) -> &RoleRegistry {
        self.inner.registry()
    }

    pub fn oracle(&self) -> &O {
        self.inner.oracle()
    }

    pub fn oracle_mut(&mut self) -> &mut O {
        self.inner.oracle_mut()
    }
}

impl<O: BlockOracle> ChartQuery for StaticChart<O> {
    fn has_role(&self, user: Address, role_id: RoleId) -> Result<bool> {
        self.inner.has_role(user, role_id)
    }

    fn strictly_has_role(&self, user: Address, role_id: RoleId) -> Result<bool> {
        self.inner.strictly_has_role(user, role_id)
    }
}

impl<O: BlockOracle> ChartUserManagement for StaticChart<O> {
    fn grant_role(&mut self, approval: &Approval, nominee: Address, role_id: RoleId) -> Result<Event> {
        self.inner.grant_role(approval, nominee, role_id)
    }

    fn revoke_role(&mut self, approval: &Approval, nominee: Address, role_id: RoleId) -> Result<Event> {
        self.inner.revoke_role(approval, nominee, role_id)
    }
}

/// Host-facing locking wrapper (ADDED): gives a standalone-service
/// host the single-writer/many-reader discipline a chart needs without the
/// blockchain host's transaction-level serialization.
pub struct SharedChart<C> {
    inner: parking_lot::RwLock<C>,
}

impl<C> SharedChart<C> {
    pub fn new(chart: C) -> Self {
        Self {
            inner: parking_lot::RwLock::new(chart),
        }
    }

    /// A read guard usable concurrently with other readers for
    /// `has_role`/`strictly_has_role`.
    pub fn read(&self) -> parking_lot::RwLockReadGuard<'_, C> {
        self.inner.read()
    }

    /// The single exclusive guard required for every mutating operation.
    pub fn write(&self) -> parking_lot::RwLockWriteGuard<'_, C> {
        self.inner.write()
    }
}
