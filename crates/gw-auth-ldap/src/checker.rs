//! Group-lookup parameter completeness checker.
//!
//! Pure inspection of a provider parameter map against the fixed
//! checklist of keys group lookup needs. Every key is checked
//! independently; a missing key is informative, never fatal.

use std::collections::HashMap;

use crate::descriptor::{
    P_AUTHENTICATION_MECHANISM, P_AUTHORIZATION_ENABLED, P_GROUP_CONTEXT_FACTORY,
    P_GROUP_OBJECT_CLASS, P_MEMBER_ATTRIBUTE, P_MEMBER_ATTRIBUTE_VALUE_TEMPLATE, P_REALM,
    P_SEARCH_BASE, P_SYSTEM_PASSWORD, P_SYSTEM_USERNAME, P_URL, P_USER_DN_TEMPLATE,
};

/// The fixed, ordered checklist of parameters group lookup requires.
///
/// The authorization-enabled key appears twice; the duplicate check is
/// harmless and kept for compatibility with existing tooling output.
pub const GROUP_LOOKUP_PARAMS: [&str; 13] = [
    P_REALM,
    P_GROUP_CONTEXT_FACTORY,
    P_SEARCH_BASE,
    P_GROUP_OBJECT_CLASS,
    P_MEMBER_ATTRIBUTE_VALUE_TEMPLATE,
    P_MEMBER_ATTRIBUTE,
    P_AUTHORIZATION_ENABLED,
    P_AUTHORIZATION_ENABLED,
    P_SYSTEM_USERNAME,
    P_SYSTEM_PASSWORD,
    P_USER_DN_TEMPLATE,
    P_URL,
    P_AUTHENTICATION_MECHANISM,
];

/// Returns the checklist keys absent from the parameter map, in
/// checklist order. A key listed twice in the checklist and absent
/// from the map is reported twice.
#[must_use]
pub fn missing_group_params(params: &HashMap<String, String>) -> Vec<&'static str> {
    GROUP_LOOKUP_PARAMS
        .iter()
        .filter(|key| !params.contains_key(**key))
        .copied()
        .collect()
}

/// Whether any checklist key is absent from the parameter map.
#[must_use]
pub fn has_group_lookup_errors(params: &HashMap<String, String>) -> bool {
    !missing_group_params(params).is_empty()
}
