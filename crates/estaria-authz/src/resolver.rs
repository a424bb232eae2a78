//! Pure rule-merge resolution.
//!
//! Given the already-fetched rule rows for a principal and a requested
//! (action, subject[, resource instance]), [`resolve`] produces an
//! ALLOW/DENY decision and [`resolve_filter`] produces a composable
//! filter for collection queries. Merge semantics:
//!
//! - a rule matches when its action and subject match the request
//!   (stored rules may use the wildcard `*`), it applies in the
//!   principal's role/tenant context, and — when the request carries a
//!   resource instance — its conditions hold
//! - among matching rules the strictly highest priority wins
//! - at equal priority an inverted (deny) rule beats a non-inverted one
//! - no matching rule means DENY
//!
//! A conditioned rule with no resource instance to test still matches
//! for the boolean decision: it grants potential access, and its
//! conditions resurface through [`resolve_filter`] to restrict list
//! queries. Insertion order never affects the outcome.

use serde_json::Value;
use uuid::Uuid;

use crate::conditions;
use crate::error::AuthzError;
use crate::rule::{PermissionRule, WILDCARD};

/// The outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Filter outcome for collection queries.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterDecision {
    /// No access at all; the query should return nothing.
    Deny,
    /// Unconditional access; no filter needs to be applied.
    Unrestricted,
    /// Access restricted to rows satisfying any one of these condition
    /// objects (OR semantics).
    Conditions(Vec<Value>),
}

/// A single authorization question.
#[derive(Debug, Clone)]
pub struct AccessRequest<'a> {
    /// Concrete action, e.g. `read`. The wildcard is rejected here.
    pub action: &'a str,
    /// Concrete subject type, e.g. `Listing`.
    pub subject: &'a str,
    /// Field values of the resource instance under test, if any.
    pub resource: Option<&'a Value>,
    /// The role the principal is currently exercising.
    pub active_role_id: Option<Uuid>,
    /// The tenant the request executes in.
    pub tenant_id: Option<Uuid>,
}

fn applies_in_context(rule: &PermissionRule, request: &AccessRequest<'_>) -> bool {
    if let Some(role_context) = rule.role_context_id
        && request.active_role_id != Some(role_context)
    {
        return false;
    }
    if let Some(rule_tenant) = rule.tenant_id
        && request.tenant_id != Some(rule_tenant)
    {
        return false;
    }
    true
}

fn validate_request(request: &AccessRequest<'_>) -> Result<(), AuthzError> {
    if request.action == WILDCARD || request.subject == WILDCARD {
        return Err(AuthzError::InvalidRequest(
            "requested action and subject must be concrete, not the wildcard".into(),
        ));
    }
    if request.action.is_empty() || request.subject.is_empty() {
        return Err(AuthzError::InvalidRequest(
            "requested action and subject must be non-empty".into(),
        ));
    }
    Ok(())
}

/// Does `rule` match `request`, taking conditions into account?
fn rule_matches(rule: &PermissionRule, request: &AccessRequest<'_>) -> Result<bool, AuthzError> {
    if !applies_in_context(rule, request)
        || !rule.matches_action(request.action)
        || !rule.matches_subject(request.subject)
    {
        return Ok(false);
    }
    match (&rule.conditions, request.resource) {
        (Some(conds), Some(resource)) => conditions::conditions_match(conds, resource),
        (Some(conds), None) => {
            // Malformed conditions are an error even when there is no
            // instance to test them against.
            conditions::validate(conds)?;
            Ok(true)
        }
        (None, _) => Ok(true),
    }
}

/// Decide ALLOW or DENY for a single request.
///
/// Pure: inspects the given rules only, mutates nothing. Any evaluation
/// fault is an explicit error; callers must treat errors as DENY.
pub fn resolve(
    rules: &[PermissionRule],
    request: &AccessRequest<'_>,
) -> Result<Decision, AuthzError> {
    validate_request(request)?;

    // (priority, inverted) of the best-ranked matching rule so far.
    let mut winner: Option<(i32, bool)> = None;

    for rule in rules {
        if !rule_matches(rule, request)? {
            continue;
        }
        winner = Some(match winner {
            None => (rule.priority, rule.inverted),
            Some((priority, _)) if rule.priority > priority => (rule.priority, rule.inverted),
            Some((priority, inverted)) if rule.priority == priority => {
                (priority, inverted || rule.inverted)
            }
            Some(current) => current,
        });
    }

    Ok(match winner {
        Some((_, false)) => Decision::Allow,
        _ => Decision::Deny,
    })
}

/// Produce the filter for a collection query of `subject`.
///
/// The winning priority tier is determined exactly as in [`resolve`]
/// with no resource instance; if an allow wins, the tier's
/// unconditioned allow (if any) grants unrestricted access, otherwise
/// the tier's condition objects OR together.
pub fn resolve_filter(
    rules: &[PermissionRule],
    request: &AccessRequest<'_>,
) -> Result<FilterDecision, AuthzError> {
    validate_request(request)?;

    let mut matching: Vec<&PermissionRule> = Vec::new();
    for rule in rules {
        if rule_matches(rule, request)? {
            matching.push(rule);
        }
    }

    let Some(top) = matching.iter().map(|r| r.priority).max() else {
        return Ok(FilterDecision::Deny);
    };
    let tier: Vec<&PermissionRule> = matching
        .into_iter()
        .filter(|r| r.priority == top)
        .collect();

    if tier.iter().any(|r| r.inverted) {
        return Ok(FilterDecision::Deny);
    }
    if tier.iter().any(|r| r.conditions.is_none()) {
        return Ok(FilterDecision::Unrestricted);
    }

    let conditions = tier
        .into_iter()
        .filter_map(|r| r.conditions.clone())
        .collect();
    Ok(FilterDecision::Conditions(conditions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn allow(action: &str, subject: &str, priority: i32) -> PermissionRule {
        PermissionRule {
            action: action.into(),
            subject: subject.into(),
            conditions: None,
            inverted: false,
            priority,
            role_context_id: None,
            tenant_id: None,
        }
    }

    fn deny(action: &str, subject: &str, priority: i32) -> PermissionRule {
        PermissionRule {
            inverted: true,
            ..allow(action, subject, priority)
        }
    }

    fn request<'a>(action: &'a str, subject: &'a str) -> AccessRequest<'a> {
        AccessRequest {
            action,
            subject,
            resource: None,
            active_role_id: None,
            tenant_id: None,
        }
    }

    #[test]
    fn no_matching_rule_denies() {
        let rules = [allow("read", "Listing", 1)];
        let decision = resolve(&rules, &request("delete", "Listing")).unwrap();
        assert_eq!(decision, Decision::Deny);

        let decision = resolve(&[], &request("read", "Listing")).unwrap();
        assert_eq!(decision, Decision::Deny);
    }

    #[test]
    fn matching_allow_allows() {
        let rules = [allow("read", "Listing", 1)];
        let decision = resolve(&rules, &request("read", "Listing")).unwrap();
        assert_eq!(decision, Decision::Allow);
    }

    #[test]
    fn higher_priority_wins_regardless_of_order() {
        let low_allow = allow("read", "Listing", 1);
        let high_deny = deny("read", "Listing", 5);

        for rules in [
            [low_allow.clone(), high_deny.clone()],
            [high_deny.clone(), low_allow.clone()],
        ] {
            let decision = resolve(&rules, &request("read", "Listing")).unwrap();
            assert_eq!(decision, Decision::Deny);
        }

        let low_deny = deny("read", "Listing", 1);
        let high_allow = allow("read", "Listing", 5);
        for rules in [
            [low_deny.clone(), high_allow.clone()],
            [high_allow.clone(), low_deny.clone()],
        ] {
            let decision = resolve(&rules, &request("read", "Listing")).unwrap();
            assert_eq!(decision, Decision::Allow);
        }
    }

    #[test]
    fn inverted_wins_priority_tie() {
        for rules in [
            [allow("read", "Listing", 3), deny("read", "Listing", 3)],
            [deny("read", "Listing", 3), allow("read", "Listing", 3)],
        ] {
            let decision = resolve(&rules, &request("read", "Listing")).unwrap();
            assert_eq!(decision, Decision::Deny);
        }
    }

    #[test]
    fn wildcard_subject_and_action_match() {
        let rules = [allow("*", "*", 1)];
        assert_eq!(
            resolve(&rules, &request("publish", "Listing")).unwrap(),
            Decision::Allow
        );
    }

    #[test]
    fn wildcard_request_is_rejected() {
        let rules = [allow("*", "*", 1)];
        assert!(matches!(
            resolve(&rules, &request("*", "Listing")),
            Err(AuthzError::InvalidRequest(_))
        ));
        assert!(matches!(
            resolve(&rules, &request("read", "*")),
            Err(AuthzError::InvalidRequest(_))
        ));
    }

    #[test]
    fn conditions_gate_on_resource_instance() {
        let rule = PermissionRule {
            conditions: Some(json!({"status": "published"})),
            ..allow("read", "Listing", 1)
        };

        let published = json!({"status": "published"});
        let req = AccessRequest {
            resource: Some(&published),
            ..request("read", "Listing")
        };
        assert_eq!(resolve(&[rule.clone()], &req).unwrap(), Decision::Allow);

        let draft = json!({"status": "draft"});
        let req = AccessRequest {
            resource: Some(&draft),
            ..request("read", "Listing")
        };
        assert_eq!(resolve(&[rule], &req).unwrap(), Decision::Deny);
    }

    #[test]
    fn conditioned_rule_matches_without_instance() {
        let rule = PermissionRule {
            conditions: Some(json!({"status": "published"})),
            ..allow("read", "Listing", 1)
        };
        assert_eq!(
            resolve(&[rule], &request("read", "Listing")).unwrap(),
            Decision::Allow
        );
    }

    #[test]
    fn malformed_conditions_error_not_allow() {
        let rule = PermissionRule {
            conditions: Some(json!("published")),
            ..allow("read", "Listing", 1)
        };
        assert!(matches!(
            resolve(&[rule], &request("read", "Listing")),
            Err(AuthzError::MalformedRule(_))
        ));
    }

    #[test]
    fn role_context_scopes_user_override() {
        let agent_role = Uuid::new_v4();
        let other_role = Uuid::new_v4();
        let override_deny = PermissionRule {
            role_context_id: Some(agent_role),
            ..deny("read", "Listing", 5)
        };
        let base = allow("read", "Listing", 1);
        let rules = [base, override_deny];

        // Acting under the contexted role: the override applies.
        let req = AccessRequest {
            active_role_id: Some(agent_role),
            ..request("read", "Listing")
        };
        assert_eq!(resolve(&rules, &req).unwrap(), Decision::Deny);

        // Acting under a different role: it must not.
        let req = AccessRequest {
            active_role_id: Some(other_role),
            ..request("read", "Listing")
        };
        assert_eq!(resolve(&rules, &req).unwrap(), Decision::Allow);

        // No active role context at all: it must not.
        assert_eq!(
            resolve(&rules, &request("read", "Listing")).unwrap(),
            Decision::Allow
        );
    }

    #[test]
    fn tenant_scope_limits_user_override() {
        let tenant_a = Uuid::new_v4();
        let tenant_b = Uuid::new_v4();
        let override_deny = PermissionRule {
            tenant_id: Some(tenant_a),
            ..deny("read", "Listing", 5)
        };
        let rules = [allow("read", "Listing", 1), override_deny];

        let req = AccessRequest {
            tenant_id: Some(tenant_a),
            ..request("read", "Listing")
        };
        assert_eq!(resolve(&rules, &req).unwrap(), Decision::Deny);

        let req = AccessRequest {
            tenant_id: Some(tenant_b),
            ..request("read", "Listing")
        };
        assert_eq!(resolve(&rules, &req).unwrap(), Decision::Allow);
    }

    /// The worked example: a role-derived allow at priority 1 loses to
    /// a user-level inverted override at priority 5.
    #[test]
    fn user_override_outranks_role_ability() {
        let rules = [allow("read", "Listing", 1), deny("read", "Listing", 5)];
        assert_eq!(
            resolve(&rules, &request("read", "Listing")).unwrap(),
            Decision::Deny
        );
    }

    #[test]
    fn filter_denies_without_rules() {
        assert_eq!(
            resolve_filter(&[], &request("read", "Listing")).unwrap(),
            FilterDecision::Deny
        );
    }

    #[test]
    fn filter_unrestricted_for_unconditioned_allow() {
        let rules = [allow("read", "Listing", 1)];
        assert_eq!(
            resolve_filter(&rules, &request("read", "Listing")).unwrap(),
            FilterDecision::Unrestricted
        );
    }

    #[test]
    fn filter_collects_winning_conditions() {
        let own = PermissionRule {
            conditions: Some(json!({"agency_id": "a-1"})),
            ..allow("read", "Listing", 2)
        };
        let published = PermissionRule {
            conditions: Some(json!({"status": "published"})),
            ..allow("read", "Listing", 2)
        };
        // A lower-priority unconditioned allow must not widen the filter.
        let stale = allow("read", "Listing", 1);

        let result = resolve_filter(
            &[own.clone(), published.clone(), stale],
            &request("read", "Listing"),
        )
        .unwrap();
        match result {
            FilterDecision::Conditions(conds) => {
                assert_eq!(conds.len(), 2);
                assert!(conds.contains(&json!({"agency_id": "a-1"})));
                assert!(conds.contains(&json!({"status": "published"})));
            }
            other => panic!("expected Conditions, got {other:?}"),
        }
    }

    #[test]
    fn filter_denied_by_top_priority_invert() {
        let rules = [
            PermissionRule {
                conditions: Some(json!({"status": "published"})),
                ..allow("read", "Listing", 1)
            },
            deny("read", "Listing", 5),
        ];
        assert_eq!(
            resolve_filter(&rules, &request("read", "Listing")).unwrap(),
            FilterDecision::Deny
        );
    }
}
