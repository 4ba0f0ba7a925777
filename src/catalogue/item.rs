use serde::{Deserialize, Serialize};

/// A single entry of an item's ordered category list. Entries are stored
/// verbatim; each update replaces the whole list, never merges it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

/// The catalogue entity as it crosses the wire. The storage row id is
/// deliberately absent: `sku` is the business key, and the row id is only
/// ever handed around as a path parameter for update addressing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogueItem {
    pub sku: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub price: u64,
    pub upc: String,
    pub category: Vec<Category>,
    pub shipping: u64,
    pub description: String,
    pub manufacturer: String,
    pub model: String,
    pub url: String,
    pub image: String,
}

impl CatalogueItem {
    /// Presence checks on top of what typed deserialization already
    /// guarantees. Reports the first violation only.
    pub fn validate(&self) -> Result<(), String> {
        for (field, value) in [
            ("name", &self.name),
            ("type", &self.type_),
            ("upc", &self.upc),
            ("description", &self.description),
            ("manufacturer", &self.manufacturer),
            ("model", &self.model),
            ("url", &self.url),
            ("image", &self.image),
        ] {
            required_string(field, value)?;
        }
        bounded_amount("price", self.price)?;
        bounded_amount("shipping", self.shipping)?;
        Ok(())
    }
}

/// Partial update body: every field is optional, present fields overwrite
/// the stored value, absent fields are left untouched. Unknown keys in the
/// body (including any client-supplied identity field) are dropped by
/// deserialization.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ItemPatch {
    pub sku: Option<i64>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub type_: Option<String>,
    pub price: Option<u64>,
    pub upc: Option<String>,
    pub category: Option<Vec<Category>>,
    pub shipping: Option<u64>,
    pub description: Option<String>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub url: Option<String>,
    pub image: Option<String>,
}

impl ItemPatch {
    pub fn validate(&self) -> Result<(), String> {
        for (field, value) in [
            ("name", &self.name),
            ("type", &self.type_),
            ("upc", &self.upc),
            ("description", &self.description),
            ("manufacturer", &self.manufacturer),
            ("model", &self.model),
            ("url", &self.url),
            ("image", &self.image),
        ] {
            if let Some(value) = value {
                required_string(field, value)?;
            }
        }
        if let Some(price) = self.price {
            bounded_amount("price", price)?;
        }
        if let Some(shipping) = self.shipping {
            bounded_amount("shipping", shipping)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.sku.is_none()
            && self.name.is_none()
            && self.type_.is_none()
            && self.price.is_none()
            && self.upc.is_none()
            && self.category.is_none()
            && self.shipping.is_none()
            && self.description.is_none()
            && self.manufacturer.is_none()
            && self.model.is_none()
            && self.url.is_none()
            && self.image.is_none()
    }
}

fn required_string(field: &'static str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} is required"));
    }
    Ok(())
}

// Amounts land in a signed storage column; anything above i64::MAX is a
// malformed body rather than a storage problem.
fn bounded_amount(field: &'static str, value: u64) -> Result<(), String> {
    if value > i64::MAX as u64 {
        return Err(format!("{field} is out of range"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    pub fn sample_item(sku: i64) -> CatalogueItem {
        CatalogueItem {
            sku,
            name: format!("Widget {sku}"),
            type_: "HardGood".to_string(),
            price: 1099,
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

    #[test]
    fn validate_accepts_complete_item() {
        assert_eq!(sample_item(1).validate(), Ok(()));
    }

    #[test]
    fn validate_reports_first_empty_field() {
        let mut item = sample_item(1);
        item.name = "  ".to_string();
        item.model = String::new();
        assert_eq!(item.validate(), Err("name is required".to_string()));
    }

    #[test]
    fn deserialize_rejects_missing_required_field() {
        let body = json!({ "sku": 1, "name": "Widget" });
        let err = serde_json::from_value::<CatalogueItem>(body).unwrap_err();
        assert!(err.to_string().contains("missing field"));
    }

    #[test]
    fn deserialize_rejects_negative_price() {
        let mut body = serde_json::to_value(sample_item(1)).unwrap();
        body["price"] = json!(-5);
        assert!(serde_json::from_value::<CatalogueItem>(body).is_err());
    }

    #[test]
    fn validate_rejects_amount_beyond_storage_range() {
        let mut item = sample_item(1);
        item.price = u64::MAX;
        assert_eq!(item.validate(), Err("price is out of range".to_string()));
    }

    #[test]
    fn patch_rejects_amount_beyond_storage_range() {
        let patch: ItemPatch = serde_json::from_value(json!({ "shipping": u64::MAX })).unwrap();
        assert_eq!(patch.validate(), Err("shipping is out of range".to_string()));
    }

    #[test]
    fn patch_ignores_identity_field() {
        let patch: ItemPatch =
            serde_json::from_value(json!({ "id": 17, "name": "Renamed" })).unwrap();
        assert_eq!(patch.name.as_deref(), Some("Renamed"));
        assert!(patch.sku.is_none());
    }

    #[test]
    fn patch_with_no_fields_is_empty() {
        let patch: ItemPatch = serde_json::from_value(json!({})).unwrap();
        assert!(patch.is_empty());
        assert_eq!(patch.validate(), Ok(()));
    }

    #[test]
    fn patch_rejects_present_empty_string() {
        let patch: ItemPatch = serde_json::from_value(json!({ "upc": "" })).unwrap();
        assert_eq!(patch.validate(), Err("upc is required".to_string()));
    }
}
