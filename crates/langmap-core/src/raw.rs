// crates/langmap-core/src/raw.rs

//! Raw metadata records exactly as the REST Countries v3.1 API returns them.
//!
//! Every field is optional: the API omits fields that were not requested and
//! some territories simply lack a capital, currency or population.
//! NOTE: This type mirrors the external API and is converted into
//! [`MetadataRecord`](crate::model::MetadataRecord) before anything else
//! touches it.

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::marker::PhantomData;

/// Object entries in document order, e.g. `[("USD", ..), ("EUR", ..)]`.
pub type Entries<T> = Vec<(String, T)>;

/// `"name": { "common": "France", "official": "French Republic", ... }`
#[derive(Debug, Default, Deserialize)]
pub struct NameRaw {
    #[serde(default)]
    pub common: Option<String>,
    #[serde(default)]
    pub official: Option<String>,
}

/// `"EUR": { "name": "Euro", "symbol": "€" }`
#[derive(Debug, Default, Deserialize)]
pub struct CurrencyRaw {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
}

/// `"flags": { "png": "...", "svg": "...", "alt": "..." }`
#[derive(Debug, Default, Deserialize)]
pub struct FlagsRaw {
    #[serde(default)]
    pub png: Option<String>,
    #[serde(default)]
    pub svg: Option<String>,
}

/// Raw country structure from JSON.
#[derive(Debug, Default, Deserialize)]
pub struct CountryRaw {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: NameRaw,
    #[serde(default)]
    pub cca3: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub capital: Vec<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub subregion: Option<String>,
    #[serde(default)]
    pub population: Option<u64>,
    #[serde(default, deserialize_with = "ordered_entries")]
    pub currencies: Entries<CurrencyRaw>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub timezones: Vec<String>,
    #[serde(default, deserialize_with = "ordered_entries")]
    pub languages: Entries<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub flags: FlagsRaw,
    /// `[lat, lng]`
    #[serde(default, deserialize_with = "null_as_default")]
    pub latlng: Vec<f64>,
}

/// Treats an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Reads a JSON object (or `null`) into its entries, keeping key order.
fn ordered_entries<'de, D, T>(deserializer: D) -> Result<Entries<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    struct EntriesVisitor<T>(PhantomData<T>);

    impl<'de, T: Deserialize<'de>> Visitor<'de> for EntriesVisitor<T> {
        type Value = Entries<T>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a JSON object or null")
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry::<String, T>()? {
                entries.push(entry);
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_any(EntriesVisitor(PhantomData))
}
