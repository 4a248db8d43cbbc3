use serde::{
    Deserialize, Deserializer, Serialize,
    de::{self, IgnoredAny, MapAccess, Visitor},
};
use std::{fmt, marker::PhantomData};

/// City lookup submitted by a client, either as `?name=` or as a JSON body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CityRequest {
    pub name: String,
}

/// Weather summary returned by the upstream and re-emitted to clients.
///
/// Field order is the serialization order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WeatherInfo {
    pub temperature: String,
    pub wind: String,
    pub description: String,
}

/// Records decoded leniently from a JSON object of string fields.
///
/// Keys match ASCII-case-insensitively and the last occurrence wins. A `null`
/// value (or a `null` document) leaves the default in place. Unknown keys are
/// skipped. Anything other than an object or `null` is rejected, as is a
/// non-string value for a known key.
trait StringFields: Default {
    const EXPECTING: &'static str;

    fn field_mut(&mut self, key: &str) -> Option<&mut String>;
}

impl StringFields for CityRequest {
    const EXPECTING: &'static str = "a city request object";

    fn field_mut(&mut self, key: &str) -> Option<&mut String> {
        key.eq_ignore_ascii_case("name").then_some(&mut self.name)
    }
}

impl StringFields for WeatherInfo {
    const EXPECTING: &'static str = "a weather info object";

    fn field_mut(&mut self, key: &str) -> Option<&mut String> {
        if key.eq_ignore_ascii_case("temperature") {
            Some(&mut self.temperature)
        } else if key.eq_ignore_ascii_case("wind") {
            Some(&mut self.wind)
        } else if key.eq_ignore_ascii_case("description") {
            Some(&mut self.description)
        } else {
            None
        }
    }
}

struct StringFieldsVisitor<T>(PhantomData<T>);

impl<'de, T: StringFields> Visitor<'de> for StringFieldsVisitor<T> {
    type Value = T;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(T::EXPECTING)
    }

    fn visit_unit<E: de::Error>(self) -> Result<T, E> {
        Ok(T::default())
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<T, A::Error> {
        let mut record = T::default();
        while let Some(key) = map.next_key::<String>()? {
            match record.field_mut(&key) {
                Some(slot) => {
                    if let Some(value) = map.next_value::<Option<String>>()? {
                        *slot = value;
                    }
                }
                None => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }
        Ok(record)
    }
}

impl<'de> Deserialize<'de> for CityRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(StringFieldsVisitor(PhantomData))
    }
}

impl<'de> Deserialize<'de> for WeatherInfo {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(StringFieldsVisitor(PhantomData))
    }
}
