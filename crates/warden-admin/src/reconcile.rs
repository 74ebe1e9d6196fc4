//! Scope reconciliation.
//!
//! When a resource server loses scopes, every client granted one of the
//! lost scopes must lose it too. Growing or reordering the scope list never
//! touches a client.

use std::collections::HashSet;

use warden_core::models::client::Client;

/// Scopes present in `old` but absent from `new`, in `old` order, each at
/// most once.
pub fn removed_scopes(new: &[String], old: &[String]) -> Vec<String> {
    let kept: HashSet<&str> = new.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();
    old.iter()
        .filter(|scope| !kept.contains(scope.as_str()) && seen.insert(scope.as_str()))
        .cloned()
        .collect()
}

/// Strips removed scopes from `clients` and returns only the clients that
/// changed. Remaining scopes keep their relative order.
pub fn reconcile(new: &[String], old: &[String], clients: Vec<Client>) -> Vec<Client> {
    let removed = removed_scopes(new, old);
    prune(&removed, clients)
}

/// Same as [`reconcile`] for an already computed removal set.
pub fn prune(removed: &[String], clients: Vec<Client>) -> Vec<Client> {
    if removed.is_empty() {
        return Vec::new();
    }
    let removed: HashSet<&str> = removed.iter().map(String::as_str).collect();

    clients
        .into_iter()
        .filter_map(|mut client| {
            let before = client.scopes.len();
            client.scopes.retain(|scope| !removed.contains(scope.as_str()));
            (client.scopes.len() != before).then_some(client)
        })
        .collect()
}
