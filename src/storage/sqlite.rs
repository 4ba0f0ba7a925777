use anyhow::Result;
use rusqlite::{params, params_from_iter, types::Type, types::Value, Connection, OptionalExtension};
use std::path::Path;

use super::traits::CatalogueStore;
use crate::catalogue::item::{CatalogueItem, ItemPatch};
use crate::catalogue::query::{Clause, Facet, Predicate};

const DB_SCHEMA_VERSION: i64 = 1;

const ITEM_COLUMNS: &str =
    "sku, name, type, price, upc, category, shipping, description, manufacturer, model, url, image";

// SQLite's IN-list parameter limit is 999 by default; stay under it.
const IN_CHUNK: usize = 900;

/// Path-based handle; a connection is opened per call with WAL and a busy
/// timeout so the store can be shared freely across request tasks.
#[derive(Clone)]
pub struct SqliteStorage {
    path: String,
}

impl SqliteStorage {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_string_lossy().to_string(),
        }
    }

    pub fn reset_all(&self) -> Result<()> {
        if !Path::new(&self.path).exists() {
            return Ok(());
        }
        std::fs::remove_file(&self.path)?;
        Ok(())
    }

    pub fn init(&self) -> Result<()> {
        self.with_conn(|_conn| Ok(()))?;
        Ok(())
    }

    fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = Connection::open(&self.path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.busy_timeout(std::time::Duration::from_millis(500))?;

        Self::migrate(&conn)?;
        f(&conn)
    }

    fn migrate(conn: &Connection) -> rusqlite::Result<()> {
        let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

        if version == DB_SCHEMA_VERSION {
            return Ok(());
        }

        log::info!(
            "SQLite schema migration: {} -> {}",
            version,
            DB_SCHEMA_VERSION
        );

        if version == 0 {
            conn.execute_batch(
                r#"
            CREATE TABLE catalogue_items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                sku INTEGER NOT NULL UNIQUE,
                name TEXT NOT NULL,
                type TEXT NOT NULL,
                price INTEGER NOT NULL CHECK (price >= 0),
                upc TEXT NOT NULL,
                category TEXT NOT NULL DEFAULT '[]',
                shipping INTEGER NOT NULL CHECK (shipping >= 0),
                description TEXT NOT NULL,
                manufacturer TEXT NOT NULL,
                model TEXT NOT NULL,
                url TEXT NOT NULL,
                image TEXT NOT NULL
            );
            CREATE INDEX catalogue_items_type_idx ON catalogue_items(type);
            CREATE INDEX catalogue_items_manufacturer_idx ON catalogue_items(manufacturer);
        "#,
            )?;
            conn.pragma_update(None, "user_version", DB_SCHEMA_VERSION)?;
            return Ok(());
        }

        Err(rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::ErrorCode::SchemaChanged as i32),
            Some("database schema version mismatch; please run with --reset option".to_string()),
        ))
    }
}

/// Query-side values (price bounds, limit, offset) are caller-controlled
/// `u64`s. Stored amounts never exceed `i64::MAX`, so clamping keeps the
/// comparison semantics instead of wrapping negative.
fn clamp_to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Lowers a predicate into one `WHERE` fragment plus its positional
/// parameters, shared verbatim between the page query and the count query.
fn lower_predicate(predicate: &Predicate) -> (String, Vec<Value>) {
    let mut fragments = Vec::new();
    let mut params: Vec<Value> = Vec::new();

    for clause in &predicate.clauses {
        match clause {
            Clause::Text(needle) => {
                // LIKE is case-insensitive for ASCII in SQLite. The numeric
                // sku participates through its decimal text form.
                let pattern = like_pattern(needle);
                fragments.push(
                    "(name LIKE ? ESCAPE '\\' OR model LIKE ? ESCAPE '\\' \
                     OR description LIKE ? ESCAPE '\\' OR CAST(sku AS TEXT) LIKE ? ESCAPE '\\')"
                        .to_string(),
                );
                for _ in 0..4 {
                    params.push(Value::Text(pattern.clone()));
                }
            }
            Clause::AnyOf(facet, values) => {
                let placeholders = vec!["?"; values.len()].join(", ");
                let sql = match facet {
                    Facet::Category => format!(
                        "EXISTS (SELECT 1 FROM json_each(catalogue_items.category) \
                         WHERE json_extract(json_each.value, '$.name') IN ({placeholders}))"
                    ),
                    Facet::Type => format!("type IN ({placeholders})"),
                    Facet::Manufacturer => format!("manufacturer IN ({placeholders})"),
                };
                fragments.push(sql);
                params.extend(values.iter().map(|v| Value::Text(v.clone())));
            }
            Clause::Price { min, max } => {
                if let Some(min) = min {
                    fragments.push("price >= ?".to_string());
                    params.push(Value::Integer(clamp_to_i64(*min)));
                }
                if let Some(max) = max {
                    fragments.push("price <= ?".to_string());
                    params.push(Value::Integer(clamp_to_i64(*max)));
                }
            }
        }
    }

    if fragments.is_empty() {
        (String::new(), params)
    } else {
        (format!(" WHERE {}", fragments.join(" AND ")), params)
    }
}

fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    format!("%{escaped}%")
}

fn map_item_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<CatalogueItem> {
    let price_int: i64 = row.get(3)?;
    let price: u64 = price_int.try_into().map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(3, Type::Integer, Box::new(err))
    })?;

    let category_json: String = row.get(5)?;
    let category = serde_json::from_str(&category_json)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(err)))?;

    let shipping_int: i64 = row.get(6)?;
    let shipping: u64 = shipping_int.try_into().map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(6, Type::Integer, Box::new(err))
    })?;

    Ok(CatalogueItem {
        sku: row.get(0)?,
        name: row.get(1)?,
        type_: row.get(2)?,
        price,
        upc: row.get(4)?,
        category,
        shipping,
        description: row.get(7)?,
        manufacturer: row.get(8)?,
        model: row.get(9)?,
        url: row.get(10)?,
        image: row.get(11)?,
    })
}

fn db_find_page(
    conn: &Connection,
    predicate: &Predicate,
    offset: u64,
    limit: u64,
) -> Result<Vec<CatalogueItem>> {
    let (where_sql, mut params) = lower_predicate(predicate);
    let sql = format!(
        "SELECT {ITEM_COLUMNS} FROM catalogue_items{where_sql} ORDER BY id LIMIT ? OFFSET ?"
    );
    params.push(Value::Integer(clamp_to_i64(limit)));
    params.push(Value::Integer(clamp_to_i64(offset)));

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(params.iter()), map_item_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

fn db_count(conn: &Connection, predicate: &Predicate) -> Result<u64> {
    let (where_sql, params) = lower_predicate(predicate);
    let sql = format!("SELECT COUNT(*) FROM catalogue_items{where_sql}");
    let count: i64 = conn.query_row(&sql, params_from_iter(params.iter()), |row| row.get(0))?;
    Ok(count as u64)
}

fn db_find_one(conn: &Connection, key_column: &str, key: i64) -> Result<Option<CatalogueItem>> {
    let sql = format!("SELECT {ITEM_COLUMNS} FROM catalogue_items WHERE {key_column} = ?1");
    let row = conn
        .query_row(&sql, params![key], map_item_row)
        .optional()?;
    Ok(row)
}

fn db_find_by_skus(conn: &Connection, skus: &[i64]) -> Result<Vec<CatalogueItem>> {
    if skus.is_empty() {
        return Ok(Vec::new());
    }

    let mut out = Vec::new();
    for chunk in skus.chunks(IN_CHUNK) {
        let placeholders = vec!["?"; chunk.len()].join(", ");
        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM catalogue_items WHERE sku IN ({placeholders}) ORDER BY id"
        );
        let mut stmt = conn.prepare(&sql)?;
        let mapped = stmt
            .query_map(params_from_iter(chunk.iter()), map_item_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        out.extend(mapped);
    }
    Ok(out)
}

fn db_insert(conn: &Connection, item: &CatalogueItem) -> Result<i64> {
    let category_json = serde_json::to_string(&item.category)?;
    conn.execute(
        "INSERT INTO catalogue_items \
         (sku, name, type, price, upc, category, shipping, description, manufacturer, model, url, image) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            item.sku,
            item.name,
            item.type_,
            i64::try_from(item.price)?,
            item.upc,
            category_json,
            i64::try_from(item.shipping)?,
            item.description,
            item.manufacturer,
            item.model,
            item.url,
            item.image
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn db_update_fields(conn: &Connection, id: i64, patch: &ItemPatch) -> Result<u64> {
    let mut sets: Vec<&'static str> = Vec::new();
    let mut params: Vec<Value> = Vec::new();

    if let Some(sku) = patch.sku {
        sets.push("sku = ?");
        params.push(Value::Integer(sku));
    }
    if let Some(name) = &patch.name {
        sets.push("name = ?");
        params.push(Value::Text(name.clone()));
    }
    if let Some(type_) = &patch.type_ {
        sets.push("type = ?");
        params.push(Value::Text(type_.clone()));
    }
    if let Some(price) = patch.price {
        sets.push("price = ?");
        params.push(Value::Integer(i64::try_from(price)?));
    }
    if let Some(upc) = &patch.upc {
        sets.push("upc = ?");
        params.push(Value::Text(upc.clone()));
    }
    if let Some(category) = &patch.category {
        sets.push("category = ?");
        params.push(Value::Text(serde_json::to_string(category)?));
    }
    if let Some(shipping) = patch.shipping {
        sets.push("shipping = ?");
        params.push(Value::Integer(i64::try_from(shipping)?));
    }
    if let Some(description) = &patch.description {
        sets.push("description = ?");
        params.push(Value::Text(description.clone()));
    }
    if let Some(manufacturer) = &patch.manufacturer {
        sets.push("manufacturer = ?");
        params.push(Value::Text(manufacturer.clone()));
    }
    if let Some(model) = &patch.model {
        sets.push("model = ?");
        params.push(Value::Text(model.clone()));
    }
    if let Some(url) = &patch.url {
        sets.push("url = ?");
        params.push(Value::Text(url.clone()));
    }
    if let Some(image) = &patch.image {
        sets.push("image = ?");
        params.push(Value::Text(image.clone()));
    }

    if sets.is_empty() {
        anyhow::bail!("empty field patch");
    }

    params.push(Value::Integer(id));
    let sql = format!(
        "UPDATE catalogue_items SET {} WHERE id = ?",
        sets.join(", ")
    );
    let rows = conn.execute(&sql, params_from_iter(params.iter()))?;
    Ok(rows as u64)
}

fn db_delete_by_sku(conn: &Connection, sku: i64) -> Result<u64> {
    let rows = conn.execute("DELETE FROM catalogue_items WHERE sku = ?1", params![sku])?;
    Ok(rows as u64)
}

fn db_distinct_facet(conn: &Connection, facet: Facet) -> Result<Vec<String>> {
    // Empty and NULL values are excluded from every facet set.
    let sql = match facet {
        Facet::Category => {
            "SELECT DISTINCT json_extract(entry.value, '$.name') \
             FROM catalogue_items, json_each(catalogue_items.category) AS entry \
             WHERE json_extract(entry.value, '$.name') IS NOT NULL \
               AND json_extract(entry.value, '$.name') <> '' \
             ORDER BY 1"
        }
        Facet::Type => {
            "SELECT DISTINCT type FROM catalogue_items WHERE type <> '' ORDER BY type"
        }
        Facet::Manufacturer => {
            "SELECT DISTINCT manufacturer FROM catalogue_items \
             WHERE manufacturer <> '' ORDER BY manufacturer"
        }
    };

    let mut stmt = conn.prepare(sql)?;
    let values = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(values)
}

impl CatalogueStore for SqliteStorage {
    fn find_page(
        &self,
        predicate: &Predicate,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<CatalogueItem>> {
        self.with_conn(|conn| db_find_page(conn, predicate, offset, limit))
    }

    fn count(&self, predicate: &Predicate) -> Result<u64> {
        self.with_conn(|conn| db_count(conn, predicate))
    }

    fn find_by_sku(&self, sku: i64) -> Result<Option<CatalogueItem>> {
        self.with_conn(|conn| db_find_one(conn, "sku", sku))
    }

    fn find_by_id(&self, id: i64) -> Result<Option<CatalogueItem>> {
        self.with_conn(|conn| db_find_one(conn, "id", id))
    }

    fn find_by_skus(&self, skus: &[i64]) -> Result<Vec<CatalogueItem>> {
        self.with_conn(|conn| db_find_by_skus(conn, skus))
    }

    fn insert(&self, item: &CatalogueItem) -> Result<i64> {
        self.with_conn(|conn| db_insert(conn, item))
    }

    fn update_fields(&self, id: i64, patch: &ItemPatch) -> Result<u64> {
        self.with_conn(|conn| db_update_fields(conn, id, patch))
    }

    fn delete_by_sku(&self, sku: i64) -> Result<u64> {
        self.with_conn(|conn| db_delete_by_sku(conn, sku))
    }

    fn distinct_facet(&self, facet: Facet) -> Result<Vec<String>> {
        self.with_conn(|conn| db_distinct_facet(conn, facet))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::item::Category;
    use tempfile::TempDir;

    fn open_store(dir: &TempDir) -> SqliteStorage {
        let storage = SqliteStorage::new(dir.path().join("catalogue.sqlite"));
        storage.init().unwrap();
        storage
    }

    fn item(sku: i64, name: &str, price: u64) -> CatalogueItem {
        CatalogueItem {
            sku,
            name: name.to_string(),
            type_: "HardGood".to_string(),
            price,
            upc: format!("0001{sku:08}"),
            category: vec![Category {
                id: "abcat0100000".to_string(),
                name: "Electronics".to_string(),
            }],
            shipping: 499,
            description: "A very useful widget".to_string(),
            manufacturer: "Acme".to_string(),
            model: format!("W-{sku}"),
            url: "https://example.com/widget".to_string(),
            image: "https://example.com/widget.jpg".to_string(),
        }
    }

    fn category(name: &str) -> Category {
        Category {
            id: format!("cat-{name}"),
            name: name.to_string(),
        }
    }

    fn text(needle: &str) -> Predicate {
        Predicate {
            clauses: vec![Clause::Text(needle.to_string())],
        }
    }

    #[test]
    fn reset_all_ok_when_database_missing() {
        let dir = TempDir::new().unwrap();
        let storage = SqliteStorage::new(dir.path().join("missing.sqlite"));
        storage.reset_all().unwrap();
    }

    #[test]
    fn insert_and_find_roundtrip_omits_identity() {
        let dir = TempDir::new().unwrap();
        let storage = open_store(&dir);

        let original = item(1001, "Widget", 1099);
        let id = storage.insert(&original).unwrap();

        assert_eq!(storage.find_by_id(id).unwrap(), Some(original.clone()));
        assert_eq!(storage.find_by_sku(1001).unwrap(), Some(original));
        assert_eq!(storage.find_by_sku(9999).unwrap(), None);
    }

    #[test]
    fn duplicate_sku_violates_unique_index() {
        let dir = TempDir::new().unwrap();
        let storage = open_store(&dir);

        storage.insert(&item(1, "Widget", 10)).unwrap();
        assert!(storage.insert(&item(1, "Other", 20)).is_err());
        assert_eq!(storage.count(&Predicate::match_all()).unwrap(), 1);
    }

    #[test]
    fn oversized_query_values_clamp_instead_of_wrapping() {
        let dir = TempDir::new().unwrap();
        let storage = open_store(&dir);

        storage.insert(&item(1, "Widget", 10)).unwrap();
        storage.insert(&item(2, "Other", 20)).unwrap();

        // An offset past i64::MAX must mean "past the end", never page one.
        let page = storage.find_page(&Predicate::match_all(), u64::MAX, 48).unwrap();
        assert!(page.is_empty());

        let min_huge = Predicate {
            clauses: vec![Clause::Price {
                min: Some(u64::MAX),
                max: None,
            }],
        };
        assert_eq!(storage.count(&min_huge).unwrap(), 0);

        let max_huge = Predicate {
            clauses: vec![Clause::Price {
                min: None,
                max: Some(u64::MAX),
            }],
        };
        assert_eq!(storage.count(&max_huge).unwrap(), 2);
    }

    #[test]
    fn amounts_beyond_i64_range_error_instead_of_wrapping() {
        let dir = TempDir::new().unwrap();
        let storage = open_store(&dir);

        assert!(storage.insert(&item(1, "Widget", u64::MAX)).is_err());

        let id = storage.insert(&item(2, "Other", 10)).unwrap();
        let patch = ItemPatch {
            price: Some(u64::MAX),
            ..ItemPatch::default()
        };
        assert!(storage.update_fields(id, &patch).is_err());
    }

    #[test]
    fn find_page_preserves_insertion_order() {
        let dir = TempDir::new().unwrap();
        let storage = open_store(&dir);

        for sku in 1..=5 {
            storage.insert(&item(sku, &format!("Item {sku}"), 10)).unwrap();
        }

        let page = storage.find_page(&Predicate::match_all(), 1, 2).unwrap();
        let skus: Vec<i64> = page.iter().map(|i| i.sku).collect();
        assert_eq!(skus, vec![2, 3]);
        assert_eq!(storage.count(&Predicate::match_all()).unwrap(), 5);
    }

    #[test]
    fn text_search_is_case_insensitive_across_fields() {
        let dir = TempDir::new().unwrap();
        let storage = open_store(&dir);

        let mut by_name = item(1, "Coca-Cola 330ml", 10);
        by_name.model = "X".to_string();
        by_name.description = "soda".to_string();
        storage.insert(&by_name).unwrap();

        let mut by_model = item(2, "Soft drink", 10);
        by_model.model = "COLA-500".to_string();
        by_model.description = "soda".to_string();
        storage.insert(&by_model).unwrap();

        let mut by_description = item(3, "Mystery drink", 10);
        by_description.model = "X".to_string();
        by_description.description = "tastes like cola".to_string();
        storage.insert(&by_description).unwrap();

        let mut unrelated = item(4, "Orange juice", 10);
        unrelated.model = "OJ".to_string();
        unrelated.description = "juice".to_string();
        storage.insert(&unrelated).unwrap();

        let matched = storage.find_page(&text("cOLa"), 0, 48).unwrap();
        let skus: Vec<i64> = matched.iter().map(|i| i.sku).collect();
        assert_eq!(skus, vec![1, 2, 3]);
        assert_eq!(storage.count(&text("cOLa")).unwrap(), 3);
    }

    #[test]
    fn text_search_matches_sku_as_decimal_text() {
        let dir = TempDir::new().unwrap();
        let storage = open_store(&dir);

        storage.insert(&item(50123, "Widget", 10)).unwrap();
        storage.insert(&item(77, "Other", 10)).unwrap();

        let matched = storage.find_page(&text("012"), 0, 48).unwrap();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].sku, 50123);
    }

    #[test]
    fn text_search_escapes_like_wildcards() {
        let dir = TempDir::new().unwrap();
        let storage = open_store(&dir);

        storage.insert(&item(1, "100% cotton", 10)).unwrap();
        storage.insert(&item(2, "100x cotton", 10)).unwrap();

        let matched = storage.find_page(&text("100%"), 0, 48).unwrap();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].sku, 1);
    }

    #[test]
    fn category_membership_matches_any_entry_name() {
        let dir = TempDir::new().unwrap();
        let storage = open_store(&dir);

        let mut electronics = item(1, "TV", 10);
        electronics.category = vec![category("Electronics"), category("Home")];
        storage.insert(&electronics).unwrap();

        let mut books = item(2, "Novel", 10);
        books.category = vec![category("Books")];
        storage.insert(&books).unwrap();

        let mut garden = item(3, "Hose", 10);
        garden.category = vec![category("Garden")];
        storage.insert(&garden).unwrap();

        let mut uncategorized = item(4, "Thing", 10);
        uncategorized.category = Vec::new();
        storage.insert(&uncategorized).unwrap();

        let predicate = Predicate {
            clauses: vec![Clause::AnyOf(
                Facet::Category,
                vec!["Electronics".to_string(), "Books".to_string()],
            )],
        };
        let skus: Vec<i64> = storage
            .find_page(&predicate, 0, 48)
            .unwrap()
            .iter()
            .map(|i| i.sku)
            .collect();
        assert_eq!(skus, vec![1, 2]);
    }

    #[test]
    fn price_range_bounds_are_inclusive_and_independent() {
        let dir = TempDir::new().unwrap();
        let storage = open_store(&dir);

        for (sku, price) in [(1, 5), (2, 10), (3, 30), (4, 50), (5, 51)] {
            storage.insert(&item(sku, "Widget", price)).unwrap();
        }

        let both = Predicate {
            clauses: vec![Clause::Price {
                min: Some(10),
                max: Some(50),
            }],
        };
        let skus: Vec<i64> = storage
            .find_page(&both, 0, 48)
            .unwrap()
            .iter()
            .map(|i| i.sku)
            .collect();
        assert_eq!(skus, vec![2, 3, 4]);

        let min_only = Predicate {
            clauses: vec![Clause::Price {
                min: Some(10),
                max: None,
            }],
        };
        assert_eq!(storage.count(&min_only).unwrap(), 4);
    }

    #[test]
    fn clauses_combine_with_logical_and() {
        let dir = TempDir::new().unwrap();
        let storage = open_store(&dir);

        let mut cheap_acme = item(1, "Widget small", 10);
        cheap_acme.manufacturer = "Acme".to_string();
        storage.insert(&cheap_acme).unwrap();

        let mut pricey_acme = item(2, "Widget large", 90);
        pricey_acme.manufacturer = "Acme".to_string();
        storage.insert(&pricey_acme).unwrap();

        let mut cheap_globex = item(3, "Widget tiny", 10);
        cheap_globex.manufacturer = "Globex".to_string();
        storage.insert(&cheap_globex).unwrap();

        let predicate = Predicate {
            clauses: vec![
                Clause::Text("widget".to_string()),
                Clause::AnyOf(Facet::Manufacturer, vec!["Acme".to_string()]),
                Clause::Price {
                    min: None,
                    max: Some(50),
                },
            ],
        };
        let matched = storage.find_page(&predicate, 0, 48).unwrap();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].sku, 1);
    }

    #[test]
    fn update_fields_touches_only_present_fields() {
        let dir = TempDir::new().unwrap();
        let storage = open_store(&dir);

        let original = item(1, "Widget", 10);
        let id = storage.insert(&original).unwrap();

        let patch = ItemPatch {
            name: Some("Renamed".to_string()),
            price: Some(25),
            ..ItemPatch::default()
        };
        assert_eq!(storage.update_fields(id, &patch).unwrap(), 1);

        let updated = storage.find_by_id(id).unwrap().unwrap();
        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.price, 25);
        assert_eq!(updated.sku, original.sku);
        assert_eq!(updated.description, original.description);
        assert_eq!(updated.category, original.category);
    }

    #[test]
    fn update_fields_replaces_category_list_atomically() {
        let dir = TempDir::new().unwrap();
        let storage = open_store(&dir);

        let id = storage.insert(&item(1, "Widget", 10)).unwrap();
        let replacement = vec![category("Books"), category("Garden")];
        let patch = ItemPatch {
            category: Some(replacement.clone()),
            ..ItemPatch::default()
        };
        storage.update_fields(id, &patch).unwrap();

        let updated = storage.find_by_id(id).unwrap().unwrap();
        assert_eq!(updated.category, replacement);
    }

    #[test]
    fn update_fields_reports_zero_matches_for_unknown_id() {
        let dir = TempDir::new().unwrap();
        let storage = open_store(&dir);

        let patch = ItemPatch {
            name: Some("Ghost".to_string()),
            ..ItemPatch::default()
        };
        assert_eq!(storage.update_fields(42, &patch).unwrap(), 0);
    }

    #[test]
    fn delete_by_sku_removes_exactly_one_and_reports_zero_otherwise() {
        let dir = TempDir::new().unwrap();
        let storage = open_store(&dir);

        storage.insert(&item(1, "Widget", 10)).unwrap();
        assert_eq!(storage.delete_by_sku(1).unwrap(), 1);
        assert_eq!(storage.delete_by_sku(1).unwrap(), 0);
        assert_eq!(storage.count(&Predicate::match_all()).unwrap(), 0);
    }

    #[test]
    fn distinct_facet_excludes_empty_values() {
        let dir = TempDir::new().unwrap();
        let storage = open_store(&dir);

        let mut first = item(1, "TV", 10);
        first.type_ = "HardGood".to_string();
        first.manufacturer = "Acme".to_string();
        first.category = vec![category("Electronics"), category("")];
        storage.insert(&first).unwrap();

        let mut second = item(2, "Novel", 10);
        second.type_ = String::new();
        second.manufacturer = "Globex".to_string();
        second.category = vec![category("Books"), category("Electronics")];
        storage.insert(&second).unwrap();

        assert_eq!(
            storage.distinct_facet(Facet::Category).unwrap(),
            vec!["Books".to_string(), "Electronics".to_string()]
        );
        assert_eq!(
            storage.distinct_facet(Facet::Type).unwrap(),
            vec!["HardGood".to_string()]
        );
        assert_eq!(
            storage.distinct_facet(Facet::Manufacturer).unwrap(),
            vec!["Acme".to_string(), "Globex".to_string()]
        );
    }

    #[test]
    fn find_by_skus_returns_requested_items_in_insertion_order() {
        let dir = TempDir::new().unwrap();
        let storage = open_store(&dir);

        for sku in [10, 20, 30] {
            storage.insert(&item(sku, "Widget", 10)).unwrap();
        }

        let exported = storage.find_by_skus(&[30, 10, 999]).unwrap();
        let skus: Vec<i64> = exported.iter().map(|i| i.sku).collect();
        assert_eq!(skus, vec![10, 30]);

        assert!(storage.find_by_skus(&[]).unwrap().is_empty());
    }
}
