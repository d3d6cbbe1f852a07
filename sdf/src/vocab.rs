//! KAIROS SDF vocabulary constants.

/// JSON-LD context every library document references.
pub const SDF_CONTEXT: &str = "https://kairos-sdf.s3.amazonaws.com/context/kairos-v0.9.jsonld";

/// SDF version tag written into library documents.
pub const SDF_VERSION: &str = "0.9";

/// Supertype of every complex event schema.
pub const SUPER_EVENT: &str = "kairos:Event";

/// Prefix of primitive event type IRIs.
pub const EVENTS_PREFIX: &str = "kairos:Primitives/Events/";

/// Prefix of entity type IRIs.
pub const ENTITIES_PREFIX: &str = "kairos:Primitives/Entities/";

/// Coreference predicate used in entity relations.
pub const SAME_AS: &str = "kairos:Relations/sameAs";

/// Segment used to pad primitive types to `Type.Subtype.Sub-subtype`.
pub const UNSPECIFIED: &str = "Unspecified";

/// Number of dot-separated segments in a fully qualified event type.
pub const QUALIFIED_TYPE_SEGMENTS: usize = 3;

/// Builds the IRI of a primitive event type from its qualified name.
#[must_use]
pub fn event_iri(qualified: &str) -> String {
    format!("{EVENTS_PREFIX}{qualified}")
}

/// Builds the IRI of an entity type from its name.
#[must_use]
pub fn entity_iri(name: &str) -> String {
    format!("{ENTITIES_PREFIX}{name}")
}

/// Builds a slot role IRI below a step type or schema id.
#[must_use]
pub fn role_iri(owner: &str, role: &str) -> String {
    format!("{owner}/Slots/{role}")
}

/// Ontology key of a type IRI: its last `/` segment.
///
/// A primitive that itself contains `/` is therefore looked up by the part
/// after its last slash, not by its full qualified name.
#[must_use]
pub fn qualified_type(iri: &str) -> &str {
    iri.rsplit('/').next().unwrap_or(iri)
}
