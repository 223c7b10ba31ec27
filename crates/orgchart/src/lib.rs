//! # OrgChart Core
//!
//! An organizational-chart access-control engine: a bit-vector-labeled DAG
//! of roles, canonically-hashed grant/revoke/admin rules, and a signed
//! multi-party approval pipeline that verifies a request against those
//! rules before any role is granted, revoked, added, or removed.
//!
//! The engine never touches a transport or a signer's private key — it
//! takes a fully-formed [`approval::Approval`] (signatures the caller
//! already collected) and either accepts or rejects it. See
//! [`chart::Chart`] and [`chart::StaticChart`] for the two entry points.

pub mod admin;
pub mod approval;
pub mod atom;
pub mod block_oracle;
pub mod chart;
pub mod config;
pub mod error;
pub mod events;
pub mod fulfillment;
pub mod oracle;
pub mod registry;
pub mod rule;
pub mod types;
pub mod user_management;

pub use admin::RoleDef;
pub use approval::{signing_digest, Approval, Domain, RequestKind, VerifiedApproval};
pub use atom::Atom;
pub use block_oracle::{BlockOracle, InMemoryBlockOracle};
pub use chart::{Chart, ChartAdmin, ChartQuery, ChartSpec, ChartUserManagement, RoleSpec, SharedChart, StaticChart};
pub use config::EngineConfig;
pub use error::{ChartError, Result};
pub use events::Event;
pub use rule::{rule_hash, Rule};
pub use types::{Action, Flag, Mask, RoleId, LOOK_BACK_LENGTH, MAX_NUM_RULES, MAX_NUM_SIGNERS, MAX_ROLE_SLOTS};
