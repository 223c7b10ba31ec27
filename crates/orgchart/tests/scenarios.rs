//! Concrete scenario tests mirroring canonical use cases for the
//! inheritance, fulfillment, cycle-detection, and ordering checks.

mod common;

use common::{current_base_block, oracle_at_height, sign, signer};
use orgchart_core::{
    rule_hash, Action, Approval, ChartAdmin, ChartQuery, ChartUserManagement, Domain, EngineConfig, RoleDef,
    RoleId,
};
use orgchart_core::chart::Chart;
use orgchart_primitives::{Address, Atom as _, B256};
use orgchart_core::Atom;

fn new_chart() -> (Chart<orgchart_core::InMemoryBlockOracle>, B256, B256) {
    let (oracle, _) = oracle_at_height(4);
    let base_block = current_base_block(&oracle);
    let admin_rule = rule_hash(Action::Admin, false, &[]);
    let domain = Domain::new(1, Address::ZERO, B256::ZERO);
    let chart = Chart::new_with_admin_rules(domain, oracle, EngineConfig::default(), &[admin_rule]);
    (chart, base_block, admin_rule)
}

fn admin_approval(atoms: Vec<Atom>, self_sign_required: bool, base_block: B256) -> Approval {
    Approval {
        signatures: vec![],
        atoms,
        assignment: vec![],
        self_sign_required,
        base_block_hash: base_block,
    }
}

fn flag(bit: u32) -> orgchart_core::Mask {
    orgchart_core::Mask::from(1u64) << bit
}

#[test]
fn static_chart_inherits_through_ancestor_chain() {
    let (mut chart, base_block, _admin_rule) = new_chart();

    let root_id = RoleId::from_name("root");
    chart
        .add_role(
            &admin_approval(vec![], false, base_block),
            RoleDef {
                role_id: root_id,
                flag: flag(0),
                senior_flags: orgchart_core::Mask::ZERO,
                junior_flags: orgchart_core::Mask::ZERO,
                rule_hashes: vec![rule_hash(Action::Grant, false, &[])],
            },
        )
        .unwrap();

    let a_id = RoleId::from_name("a");
    chart
        .add_role(
            &admin_approval(vec![], false, base_block),
            RoleDef {
                role_id: a_id,
                flag: flag(1),
                senior_flags: flag(0),
                junior_flags: orgchart_core::Mask::ZERO,
                rule_hashes: vec![rule_hash(Action::Grant, false, &[])],
            },
        )
        .unwrap();

    let aa_id = RoleId::from_name("aa");
    chart
        .add_role(
            &admin_approval(vec![], false, base_block),
            RoleDef {
                role_id: aa_id,
                flag: flag(2),
                senior_flags: flag(1),
                junior_flags: orgchart_core::Mask::ZERO,
                rule_hashes: vec![],
            },
        )
        .unwrap();

    let ab_id = RoleId::from_name("ab");
    chart
        .add_role(
            &admin_approval(vec![], false, base_block),
            RoleDef {
                role_id: ab_id,
                flag: flag(3),
                senior_flags: flag(1),
                junior_flags: orgchart_core::Mask::ZERO,
                rule_hashes: vec![],
            },
        )
        .unwrap();

    let (_, alice) = signer(1);
    chart
        .grant_role(&admin_approval(vec![], false, base_block), alice, a_id)
        .unwrap();

    assert!(chart.has_role(alice, aa_id).unwrap());
    assert!(chart.has_role(alice, ab_id).unwrap());
    assert!(!chart.strictly_has_role(alice, aa_id).unwrap());
}

#[test]
fn add_role_rejects_a_cycle() {
    let (mut chart, base_block, _admin_rule) = new_chart();

    let a_id = RoleId::from_name("a");
    chart
        .add_role(
            &admin_approval(vec![], false, base_block),
            RoleDef {
                role_id: a_id,
                flag: flag(0),
                senior_flags: orgchart_core::Mask::ZERO,
                junior_flags: orgchart_core::Mask::ZERO,
                rule_hashes: vec![],
            },
        )
        .unwrap();

    let aa_id = RoleId::from_name("aa");
    chart
        .add_role(
            &admin_approval(vec![], false, base_block),
            RoleDef {
                role_id: aa_id,
                flag: flag(1),
                senior_flags: flag(0),
                junior_flags: orgchart_core::Mask::ZERO,
                rule_hashes: vec![],
            },
        )
        .unwrap();

    // R: seniors={AA}, juniors={A}. A is senior of AA, so making A a junior
    // of R while R is junior of AA would close a loop A -> AA -> R -> A.
    let r_id = RoleId::from_name("r");
    let err = chart
        .add_role(
            &admin_approval(vec![], false, base_block),
            RoleDef {
                role_id: r_id,
                flag: flag(2),
                senior_flags: flag(1),
                junior_flags: flag(0),
                rule_hashes: vec![],
            },
        )
        .unwrap_err();
    assert_eq!(err, orgchart_core::ChartError::CycleDetected);
}

#[test]
fn removed_flag_is_never_reused() {
    let (mut chart, base_block, _admin_rule) = new_chart();

    let x_id = RoleId::from_name("x");
    chart
        .add_role(
            &admin_approval(vec![], false, base_block),
            RoleDef {
                role_id: x_id,
                flag: flag(8),
                senior_flags: orgchart_core::Mask::ZERO,
                junior_flags: orgchart_core::Mask::ZERO,
                rule_hashes: vec![],
            },
        )
        .unwrap();

    chart
        .remove_role(&admin_approval(vec![], false, base_block), x_id)
        .unwrap();

    let x2_id = RoleId::from_name("x2");
    let err = chart
        .add_role(
            &admin_approval(vec![], false, base_block),
            RoleDef {
                role_id: x2_id,
                flag: flag(8),
                senior_flags: orgchart_core::Mask::ZERO,
                junior_flags: orgchart_core::Mask::ZERO,
                rule_hashes: vec![],
            },
        )
        .unwrap_err();
    assert_eq!(err, orgchart_core::ChartError::RoleFlagTaken);

    chart
        .add_role(
            &admin_approval(vec![], false, base_block),
            RoleDef {
                role_id: x2_id,
                flag: flag(9),
                senior_flags: orgchart_core::Mask::ZERO,
                junior_flags: orgchart_core::Mask::ZERO,
                rule_hashes: vec![],
            },
        )
        .unwrap();
}

/// A quorum-plus-self-sign grant rule exercised through the full
/// `grant_role` approval pipeline with real ECDSA signatures, including
/// the unordered-signer rejection case.
#[test]
fn quorum_grant_requires_self_sign_and_ascending_signers() {
    let (mut chart, base_block, _admin_rule) = new_chart();

    let dso_id = RoleId::from_name("dso");
    let dso_grant_rule = rule_hash(Action::Grant, false, &[]);
    chart
        .add_role(
            &admin_approval(vec![], false, base_block),
            RoleDef {
                role_id: dso_id,
                flag: flag(0),
                senior_flags: orgchart_core::Mask::ZERO,
                junior_flags: orgchart_core::Mask::ZERO,
                rule_hashes: vec![dso_grant_rule],
            },
        )
        .unwrap();

    let treasurer_atoms = vec![Atom::new(dso_id, 2, true, false).unwrap()];
    let treasurer_rule = rule_hash(Action::Grant, true, &treasurer_atoms);
    let treasurer_id = RoleId::from_name("treasurer");
    chart
        .add_role(
            &admin_approval(vec![], false, base_block),
            RoleDef {
                role_id: treasurer_id,
                flag: flag(1),
                senior_flags: orgchart_core::Mask::ZERO,
                junior_flags: orgchart_core::Mask::ZERO,
                rule_hashes: vec![treasurer_rule],
            },
        )
        .unwrap();

    let (_, dso_a) = signer(10);
    let (_, dso_b) = signer(11);
    let (_, dso_c) = signer(12);
    let (_, nominee) = signer(20);
    for holder in [dso_a, dso_b, dso_c] {
        chart
            .grant_role(&admin_approval(vec![], false, base_block), holder, dso_id)
            .unwrap();
    }

    let domain = Domain::new(1, Address::ZERO, B256::ZERO);
    let request = orgchart_core::RequestKind::UserManagement {
        nominee,
        action: Action::Grant,
        role_id: treasurer_id,
    };
    let digest = orgchart_core::signing_digest(&domain, &request, base_block);

    let keyed = [(10u8, dso_a), (11, dso_b), (20, nominee)];
    let mut entries: Vec<(Address, orgchart_primitives::EcdsaSignature, usize)> = keyed
        .iter()
        .map(|(seed, addr)| {
            let (key, _) = signer(*seed);
            let assignment = if *addr == nominee { treasurer_atoms.len() } else { 0 };
            (*addr, sign(&key, digest), assignment)
        })
        .collect();
    entries.sort_by_key(|(addr, _, _)| *addr);

    let approval = Approval {
        signatures: entries.iter().map(|(_, sig, _)| *sig).collect(),
        atoms: treasurer_atoms.clone(),
        assignment: entries.iter().map(|(_, _, a)| *a).collect(),
        self_sign_required: true,
        base_block_hash: base_block,
    };

    chart.grant_role(&approval, nominee, treasurer_id).unwrap();
    assert!(chart.strictly_has_role(nominee, treasurer_id).unwrap());

    // The same signer set presented in descending address order must
    // fail, even though every individual signature and role assignment
    // is valid.
    let (_, other_nominee) = signer(21);
    let mut reversed = entries.clone();
    reversed.sort_by_key(|(addr, _, _)| std::cmp::Reverse(*addr));
    let descending_approval = Approval {
        signatures: reversed.iter().map(|(_, sig, _)| *sig).collect(),
        atoms: treasurer_atoms,
        assignment: reversed.iter().map(|(_, _, a)| *a).collect(),
        self_sign_required: true,
        base_block_hash: base_block,
    };
    let err = chart
        .grant_role(&descending_approval, other_nominee, treasurer_id)
        .unwrap_err();
    assert_eq!(err, orgchart_core::ChartError::UnorderedSigners);
}
