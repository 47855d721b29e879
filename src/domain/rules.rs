//! Structural rules over milestones
//!
//! Pure checks evaluated by the mutation services before anything is
//! persisted. Each rule is independent; the first failing rule aborts the
//! mutation with no partial write.

use thiserror::Error;

use super::milestone::Milestone;

#[derive(Debug, Error, PartialEq)]
pub enum RuleViolation {
    #[error("end_date must be greater than or equal to start_date")]
    DateOrder,

    #[error(
        "a Certify milestone cannot exist without a Tested Successfully milestone \
         for the same product (and version)"
    )]
    CertifyPrerequisite,
}

/// When both dates are present, the end may not precede the start.
pub fn check_date_order(milestone: &Milestone) -> Result<(), RuleViolation> {
    if let Some(end) = milestone.end_date {
        if end < milestone.start_date {
            return Err(RuleViolation::DateOrder);
        }
    }
    Ok(())
}

/// A "Certify" milestone requires a "Tested Successfully" milestone in the
/// exact same product+version scope: unscoped certify needs unscoped tested,
/// version-scoped certify needs tested scoped to that same version.
///
/// `product_milestones` is the candidate's product's full milestone set. The
/// candidate never satisfies its own prerequisite, so a stored copy of it
/// (the pre-update row during an update) is skipped by id.
pub fn check_certify_prerequisite(
    candidate: &Milestone,
    product_milestones: &[Milestone],
) -> Result<(), RuleViolation> {
    if !candidate.is_certify() {
        return Ok(());
    }

    let satisfied = product_milestones.iter().any(|m| {
        m.id != candidate.id && m.is_tested_successfully() && m.same_version_scope(candidate)
    });

    if satisfied {
        Ok(())
    } else {
        Err(RuleViolation::CertifyPrerequisite)
    }
}

/// A product may only go active once some milestone of it carries the
/// "Pricing Committee Approval" label, in any version scope.
pub fn has_pricing_committee_approval(product_milestones: &[Milestone]) -> bool {
    product_milestones
        .iter()
        .any(|m| m.is_pricing_committee_approval())
}
