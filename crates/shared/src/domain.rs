use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(AuthorId);
id_newtype!(BookId);
id_newtype!(PrizeId);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: AuthorId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub birth_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub books: Vec<Book>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub prizes: Vec<Prize>,
}

impl Author {
    pub fn birth_date_display(&self) -> &str {
        format_birth_date(&self.birth_date)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    #[serde(deserialize_with = "lenient_book_id")]
    pub id: BookId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// A prize reference as held by an author.
///
/// The backend has been seen to send ids as numbers, numeric strings, or not
/// at all, so the id is kept optional and resolved leniently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prize {
    #[serde(default, deserialize_with = "lenient_prize_id")]
    pub id: Option<PrizeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Prize {
    /// Id usable for requests. Zero is treated as unresolvable.
    pub fn resolved_id(&self) -> Option<PrizeId> {
        self.id.filter(|id| id.0 != 0)
    }
}

/// Date portion of a birth date, dropping any `T...` time component.
pub fn format_birth_date(raw: &str) -> &str {
    match raw.split_once('T') {
        Some((date, _)) => date,
        None => raw,
    }
}

/// Treats an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Integer ids, also accepted as integral floats or numeric strings.
fn numeric_id(raw: &Value) -> Option<i64> {
    match raw {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|v| v.fract() == 0.0).map(|v| v as i64)),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn lenient_prize_id<'de, D>(deserializer: D) -> Result<Option<PrizeId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(numeric_id(&raw).map(PrizeId))
}

fn lenient_book_id<'de, D>(deserializer: D) -> Result<BookId, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    numeric_id(&raw)
        .map(BookId)
        .ok_or_else(|| serde::de::Error::custom(format!("book id {raw} is not numeric")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn birth_date_strips_time_component() {
        assert_eq!(format_birth_date("1892-01-03T00:00:00Z"), "1892-01-03");
        assert_eq!(format_birth_date("1892-01-03"), "1892-01-03");
        assert_eq!(format_birth_date(""), "");
    }

    #[test]
    fn author_tolerates_missing_and_null_relationships() {
        let author: Author = serde_json::from_str(
            r#"{"id":1,"name":"Borges","description":"d","image":"i","birthDate":"1899-08-24","books":null}"#,
        )
        .expect("author");
        assert!(author.books.is_empty());
        assert!(author.prizes.is_empty());
    }

    #[test]
    fn null_text_fields_read_as_empty() {
        let author: Author = serde_json::from_str(
            r#"{"id":2,"name":"Mistral","description":null,"image":null,"birthDate":null}"#,
        )
        .expect("author");
        assert_eq!(author.description, "");
        assert_eq!(author.image, "");
        assert_eq!(author.birth_date_display(), "");
    }

    #[test]
    fn book_ids_accept_numeric_strings() {
        let books: Vec<Book> =
            serde_json::from_str(r#"[{"id":5},{"id":"6"},{"id":7.0}]"#).expect("books");
        let ids = books.iter().map(|book| book.id).collect::<Vec<_>>();
        assert_eq!(ids, vec![BookId(5), BookId(6), BookId(7)]);
        assert!(serde_json::from_str::<Book>(r#"{"id":"five"}"#).is_err());
    }

    #[test]
    fn prize_ids_resolve_leniently() {
        let prizes: Vec<Prize> = serde_json::from_str(
            r#"[{"id":4},{"id":"9"},{"id":null},{"name":"orphan"},{"id":0},{"id":"abc"}]"#,
        )
        .expect("prizes");
        let resolved = prizes.iter().map(Prize::resolved_id).collect::<Vec<_>>();
        assert_eq!(
            resolved,
            vec![Some(PrizeId(4)), Some(PrizeId(9)), None, None, None, None]
        );
    }

    #[test]
    fn ids_serialize_as_plain_numbers() {
        let book = Book {
            id: BookId(12),
            title: None,
        };
        assert_eq!(serde_json::to_string(&book).expect("json"), r#"{"id":12}"#);
    }
}
