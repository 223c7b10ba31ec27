//! Error types for the organizational-chart engine

use orgchart_primitives::PrimitivesError;
use thiserror::Error;

/// Errors the engine can return from any public operation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChartError {
    /// A `role_id` lookup found no active role
    #[error("unknown role")]
    UnknownRole,

    /// A rule hash is not registered as a grant/revoke rule for the target role
    #[error("rule is not registered for this role")]
    InvalidRule,

    /// A rule hash is not the admin sentinel
    #[error("rule is not a registered admin rule")]
    InvalidAdminRule,

    /// `base_block_hash` fell outside the freshness window
    #[error("base block is not within the freshness window")]
    StaleBaseBlock,

    /// More signatures were supplied than `MAX_NUM_SIGNERS` allows
    #[error("too many signers")]
    TooManySigners,

    /// Recovered signers were not in strictly ascending order
    #[error("signers must be strictly ascending")]
    UnorderedSigners,

    /// A grant required a self-sign that was not present
    #[error("rule requires the nominee's self-sign")]
    MissingSelfSign,

    /// A self-sign was present but the rule does not call for one
    #[error("rule does not allow a self-sign")]
    UnexpectedSelfSign,

    /// An assignment index pointed outside the rule's atom list
    #[error("assignment index out of range")]
    InvalidAssignment,

    /// A signer did not hold the role their assignment required
    #[error("signer lacks the assigned role")]
    PermissionDenied,

    /// An atom's quota of qualifying signers was not met
    #[error("not enough signers to satisfy the rule")]
    NotEnoughSigners,

    /// Adding the proposed role would introduce a cycle
    #[error("adding this role would introduce a cycle")]
    CycleDetected,

    /// `add_role` was given a `role_id` that is already registered
    #[error("role id is already taken")]
    RoleIdTaken,

    /// `add_role` was given a `flag` that is already active
    #[error("role flag is already taken")]
    RoleFlagTaken,

    /// `flag` was zero or had more than one bit set
    #[error("role flag must have exactly one bit set")]
    MalformedRoleFlag,

    /// The top two bytes of `role_id` were nonzero
    #[error("role id must fit in the low 30 bytes")]
    MalformedRoleId,

    /// A bit in `senior_flags` did not correspond to an active role
    #[error("one or more senior roles are not active")]
    SeniorsMissing,

    /// A bit in `junior_flags` did not correspond to an active role
    #[error("one or more junior roles are not active")]
    JuniorsMissing,

    /// `rule_hashes` for a new role exceeded `MAX_NUM_RULES`
    #[error("too many rule hashes for a single role")]
    TooManyRules,

    /// An atom's `quantity`/`role_id` failed encoding validation
    #[error("invalid atom: {0}")]
    InvalidAtom(String),

    /// Underlying cryptographic primitive failure (malformed signature,
    /// recovery failure, ...)
    #[error("primitive error: {0}")]
    Primitive(#[from] PrimitivesError),
}

/// Result type for chart operations
pub type Result<T> = std::result::Result<T, ChartError>;
