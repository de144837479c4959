//! Per-resource configuration tables.
//!
//! All six catalog resources share one pipeline; everything that differs
//! between them - upstream path, filter field, sortable fields, expandable
//! relations - lives in these static tables instead of duplicated code.

use serde_json::{json, Value};

/// The six upstream catalog resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    People,
    Films,
    Planets,
    Species,
    Starships,
    Vehicles,
}

impl Resource {
    /// Every resource, in route-registration order.
    pub const ALL: [Resource; 6] = [
        Resource::People,
        Resource::Films,
        Resource::Planets,
        Resource::Species,
        Resource::Starships,
        Resource::Vehicles,
    ];

    /// Resolve a path segment like `"people"` to a resource.
    pub fn parse(name: &str) -> Option<Resource> {
        match name {
            "people" => Some(Resource::People),
            "films" => Some(Resource::Films),
            "planets" => Some(Resource::Planets),
            "species" => Some(Resource::Species),
            "starships" => Some(Resource::Starships),
            "vehicles" => Some(Resource::Vehicles),
            _ => None,
        }
    }

    /// The static configuration table for this resource.
    pub fn config(&self) -> &'static ResourceConfig {
        match self {
            Resource::People => &PEOPLE,
            Resource::Films => &FILMS,
            Resource::Planets => &PLANETS,
            Resource::Species => &SPECIES,
            Resource::Starships => &STARSHIPS,
            Resource::Vehicles => &VEHICLES,
        }
    }

    /// Canonical resource name, which doubles as the upstream path segment.
    pub fn name(&self) -> &'static str {
        self.config().name
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether a relation field holds one URL or a list of URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    Single,
    Many,
}

/// Which summary projection applies to a resolved related entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryKind {
    Person,
    Film,
    Planet,
    Species,
    Starship,
    Vehicle,
}

/// One expandable relation of a resource.
pub struct RelationDescriptor {
    /// Name accepted in the `expand` parameter.
    pub name: &'static str,
    /// Record field holding the related URL(s).
    pub field: &'static str,
    /// Singular or list-valued.
    pub kind: RelationKind,
    /// Projection applied to each resolved entity.
    pub target: SummaryKind,
    /// Synthetic value rendered when a list-valued relation is empty.
    pub empty_default: Option<fn() -> Value>,
}

/// Static per-resource configuration consumed by the pipeline.
pub struct ResourceConfig {
    /// Canonical name, echoed in envelopes.
    pub name: &'static str,
    /// Upstream collection path segment.
    pub path: &'static str,
    /// Field the free-text filter matches against.
    pub filter_field: &'static str,
    /// Sort allow-list; anything else is rejected.
    pub sort_fields: &'static [&'static str],
    /// Expandable relations.
    pub relations: &'static [RelationDescriptor],
}

impl ResourceConfig {
    /// Look up a relation by its `expand` name.
    pub fn relation(&self, name: &str) -> Option<&'static RelationDescriptor> {
        self.relations.iter().find(|r| r.name == name)
    }
}

/// Upstream convention: an empty species list on a person means Human.
fn default_species() -> Value {
    json!([{ "name": "Human" }])
}

static PEOPLE: ResourceConfig = ResourceConfig {
    name: "people",
    path: "people",
    filter_field: "name",
    sort_fields: &["name", "height", "mass", "birth_year"],
    relations: &[
        RelationDescriptor {
            name: "homeworld",
            field: "homeworld",
            kind: RelationKind::Single,
            target: SummaryKind::Planet,
            empty_default: None,
        },
        RelationDescriptor {
            name: "films",
            field: "films",
            kind: RelationKind::Many,
            target: SummaryKind::Film,
            empty_default: None,
        },
        RelationDescriptor {
            name: "starships",
            field: "starships",
            kind: RelationKind::Many,
            target: SummaryKind::Starship,
            empty_default: None,
        },
        RelationDescriptor {
            name: "vehicles",
            field: "vehicles",
            kind: RelationKind::Many,
            target: SummaryKind::Vehicle,
            empty_default: None,
        },
        RelationDescriptor {
            name: "species",
            field: "species",
            kind: RelationKind::Many,
            target: SummaryKind::Species,
            empty_default: Some(default_species),
        },
    ],
};

static FILMS: ResourceConfig = ResourceConfig {
    name: "films",
    path: "films",
    filter_field: "title",
    sort_fields: &["title", "episode_id", "release_date"],
    relations: &[
        RelationDescriptor {
            name: "characters",
            field: "characters",
            kind: RelationKind::Many,
            target: SummaryKind::Person,
            empty_default: None,
        },
        RelationDescriptor {
            name: "planets",
            field: "planets",
            kind: RelationKind::Many,
            target: SummaryKind::Planet,
            empty_default: None,
        },
        RelationDescriptor {
            name: "starships",
            field: "starships",
            kind: RelationKind::Many,
            target: SummaryKind::Starship,
            empty_default: None,
        },
        RelationDescriptor {
            name: "vehicles",
            field: "vehicles",
            kind: RelationKind::Many,
            target: SummaryKind::Vehicle,
            empty_default: None,
        },
        RelationDescriptor {
            name: "species",
            field: "species",
            kind: RelationKind::Many,
            target: SummaryKind::Species,
            empty_default: None,
        },
    ],
};

static PLANETS: ResourceConfig = ResourceConfig {
    name: "planets",
    path: "planets",
    filter_field: "name",
    sort_fields: &["name", "population", "diameter", "rotation_period"],
    relations: &[
        RelationDescriptor {
            name: "residents",
            field: "residents",
            kind: RelationKind::Many,
            target: SummaryKind::Person,
            empty_default: None,
        },
        RelationDescriptor {
            name: "films",
            field: "films",
            kind: RelationKind::Many,
            target: SummaryKind::Film,
            empty_default: None,
        },
    ],
};

static SPECIES: ResourceConfig = ResourceConfig {
    name: "species",
    path: "species",
    filter_field: "name",
    sort_fields: &["name", "classification", "average_lifespan"],
    relations: &[
        RelationDescriptor {
            name: "people",
            field: "people",
            kind: RelationKind::Many,
            target: SummaryKind::Person,
            empty_default: None,
        },
        RelationDescriptor {
            name: "films",
            field: "films",
            kind: RelationKind::Many,
            target: SummaryKind::Film,
            empty_default: None,
        },
        RelationDescriptor {
            name: "homeworld",
            field: "homeworld",
            kind: RelationKind::Single,
            target: SummaryKind::Planet,
            empty_default: None,
        },
    ],
};

static STARSHIPS: ResourceConfig = ResourceConfig {
    name: "starships",
    path: "starships",
    filter_field: "name",
    sort_fields: &["name", "model", "cost_in_credits", "crew"],
    relations: &[
        RelationDescriptor {
            name: "pilots",
            field: "pilots",
            kind: RelationKind::Many,
            target: SummaryKind::Person,
            empty_default: None,
        },
        RelationDescriptor {
            name: "films",
            field: "films",
            kind: RelationKind::Many,
            target: SummaryKind::Film,
            empty_default: None,
        },
    ],
};

static VEHICLES: ResourceConfig = ResourceConfig {
    name: "vehicles",
    path: "vehicles",
    filter_field: "name",
    sort_fields: &["name", "model", "cost_in_credits", "crew"],
    relations: &[
        RelationDescriptor {
            name: "pilots",
            field: "pilots",
            kind: RelationKind::Many,
            target: SummaryKind::Person,
            empty_default: None,
        },
        RelationDescriptor {
            name: "films",
            field: "films",
            kind: RelationKind::Many,
            target: SummaryKind::Film,
            empty_default: None,
        },
    ],
};
