//! Hypermedia links for response payloads.
//!
//! Payloads are wrapped in [`Linked`] (composition, no inheritance): the
//! entity's fields serialize flat next to a `links` array. The base URL is
//! always passed in explicitly from the request; nothing here reads ambient
//! state.

use serde::Serialize;
use uuid::Uuid;

/// A hypermedia reference: relation name plus target URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub rel: &'static str,
    pub href: String,
}

/// A payload carrying derived links. Never stored.
#[derive(Debug, Serialize)]
pub struct Linked<T> {
    #[serde(flatten)]
    pub item: T,
    pub links: Vec<Link>,
}

/// Anything addressable by its UUID.
pub trait HasId {
    fn id(&self) -> Uuid;
}

impl HasId for models::genre::Model {
    fn id(&self) -> Uuid { self.id }
}

impl HasId for models::developer::Model {
    fn id(&self) -> Uuid { self.id }
}

impl HasId for models::game::Model {
    fn id(&self) -> Uuid { self.id }
}

impl HasId for models::user::Model {
    fn id(&self) -> Uuid { self.id }
}

/// Base URL used for links, derived from the request's Host header.
pub fn request_base(host: &str) -> String {
    format!("http://{host}/api/v1")
}

/// The `self` link for one resource instance: `{base}/{resource}/{id}`.
pub fn self_link(base: &str, resource: &str, id: Uuid) -> Link {
    Link { rel: "self", href: format!("{}/{}/{}", base.trim_end_matches('/'), resource, id) }
}

/// Attach a `self` link to a single entity.
pub fn link_entity<T: HasId>(base: &str, resource: &str, item: T) -> Linked<T> {
    let link = self_link(base, resource, item.id());
    Linked { item, links: vec![link] }
}

/// Attach a `self` link to every element of a listing.
///
/// Each member gets its own link built from its own id, so every returned
/// record is independently addressable.
pub fn link_collection<T: HasId>(base: &str, resource: &str, items: Vec<T>) -> Vec<Linked<T>> {
    items.into_iter().map(|item| link_entity(base, resource, item)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Thing {
        id: Uuid,
        name: &'static str,
    }

    impl HasId for Thing {
        fn id(&self) -> Uuid { self.id }
    }

    #[test]
    fn self_link_targets_the_resource_instance() {
        let id = Uuid::new_v4();
        let link = self_link("http://localhost:8080/api/v1", "genres", id);
        assert_eq!(link.rel, "self");
        assert_eq!(link.href, format!("http://localhost:8080/api/v1/genres/{id}"));
    }

    #[test]
    fn trailing_slash_in_base_is_tolerated() {
        let id = Uuid::new_v4();
        let link = self_link("http://localhost:8080/api/v1/", "genres", id);
        assert!(link.href.ends_with(&format!("/genres/{id}")));
        assert!(!link.href.contains("//genres"));
    }

    #[test]
    fn linked_entity_serializes_flat_with_links() {
        let id = Uuid::new_v4();
        let linked = link_entity("http://h/api/v1", "things", Thing { id, name: "RPG" });
        let json = serde_json::to_value(&linked).unwrap();
        assert_eq!(json["name"], "RPG");
        assert_eq!(json["links"].as_array().unwrap().len(), 1);
        assert_eq!(json["links"][0]["rel"], "self");
    }

    #[test]
    fn every_collection_member_gets_its_own_link() {
        let things = vec![
            Thing { id: Uuid::new_v4(), name: "a" },
            Thing { id: Uuid::new_v4(), name: "b" },
        ];
        let ids: Vec<Uuid> = things.iter().map(|t| t.id).collect();
        let linked = link_collection("http://h/api/v1", "things", things);
        assert_eq!(linked.len(), 2);
        for (l, id) in linked.iter().zip(ids) {
            assert_eq!(l.links.len(), 1);
            assert!(l.links[0].href.ends_with(&format!("/things/{id}")));
        }
    }
}
