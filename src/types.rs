use serde::{Deserialize, Serialize};

/// Name + URL pair used all over PokéAPI to reference another resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
    pub name: String,
    pub url: String,
}

impl NamedResource {
    pub fn id(&self) -> Option<u32> {
        id_from_url(&self.url)
    }
}

/// Extract the numeric id from the trailing path segment of a resource URL,
/// e.g. `https://pokeapi.co/api/v2/pokemon/25/` -> 25.
pub fn id_from_url(url: &str) -> Option<u32> {
    url.split('/')
        .filter(|segment| !segment.is_empty())
        .next_back()?
        .parse()
        .ok()
}

/// Raw `GET /pokemon?limit=&offset=` response
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse {
    pub count: u32,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<NamedResource>,
}

/// Pokémon summary for the list view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    pub id: u32,
    pub name: String,
    pub image_url: String,
}

/// One page of the catalog plus the offsets of its neighbours
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListResult {
    pub items: Vec<ListItem>,
    pub total: u32,
    pub next: Option<u32>,
    pub previous: Option<u32>,
}

/// Full Pokémon record (detail view)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pokemon {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    #[serde(default)]
    pub sprites: Sprites,
    /// Decimetres
    #[serde(default)]
    pub height: u32,
    /// Hectograms
    #[serde(default)]
    pub weight: u32,
    #[serde(default)]
    pub abilities: Vec<AbilitySlot>,
    #[serde(default)]
    pub stats: Vec<StatSlot>,
    #[serde(default)]
    pub species: Option<NamedResource>,
    #[serde(default)]
    pub forms: Vec<NamedResource>,
    /// Filled in from the species endpoint, absent on a plain fetch
    #[serde(default)]
    pub varieties: Option<Vec<Variety>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSlot {
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprites {
    pub front_default: Option<String>,
    pub front_shiny: Option<String>,
    #[serde(default)]
    pub other: OtherSprites,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtherSprites {
    #[serde(rename = "official-artwork", default)]
    pub official_artwork: Artwork,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artwork {
    pub front_default: Option<String>,
    pub front_shiny: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilitySlot {
    pub ability: NamedResource,
    #[serde(default)]
    pub is_hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatSlot {
    pub base_stat: u32,
    pub stat: NamedResource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variety {
    pub is_default: bool,
    pub pokemon: NamedResource,
}

/// `GET /pokemon-species/{id}`, only the parts the viewer needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Species {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub varieties: Vec<Variety>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Variety,
    Form,
}

/// A link from a detail record to another catalog entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedLink {
    pub kind: LinkKind,
    pub name: String,
    pub id: u32,
}

impl Pokemon {
    pub fn has_shiny_artwork(&self) -> bool {
        self.sprites.other.official_artwork.front_shiny.is_some()
    }

    /// Official artwork, shiny when asked for and available.
    pub fn artwork(&self, shiny: bool) -> Option<&str> {
        let artwork = &self.sprites.other.official_artwork;
        match (&artwork.front_shiny, shiny) {
            (Some(url), true) => Some(url),
            _ => artwork.front_default.as_deref(),
        }
    }

    /// Links to other varieties and forms of this Pokémon.
    ///
    /// Varieties are listed only when the species has more than one; the
    /// default variety named like this record is skipped. Forms follow the
    /// same rule keyed on name alone. Entries whose URL carries no numeric
    /// id are dropped.
    pub fn related_links(&self) -> Vec<RelatedLink> {
        let mut links = Vec::new();

        if let Some(varieties) = self.varieties.as_ref().filter(|v| v.len() > 1) {
            for variety in varieties {
                if variety.is_default && variety.pokemon.name == self.name {
                    continue;
                }
                if let Some(id) = variety.pokemon.id() {
                    links.push(RelatedLink {
                        kind: LinkKind::Variety,
                        name: variety.pokemon.name.clone(),
                        id,
                    });
                }
            }
        }

        if self.forms.len() > 1 {
            for form in self.forms.iter().filter(|f| f.name != self.name) {
                if let Some(id) = form.id() {
                    links.push(RelatedLink {
                        kind: LinkKind::Form,
                        name: form.name.clone(),
                        id,
                    });
                }
            }
        }

        links
    }
}
