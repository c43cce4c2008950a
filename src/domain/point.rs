//! Collection point submission record

use crate::domain::types::ItemId;
use serde::{Deserialize, Serialize};

/// Write-once aggregate assembled at submit time and POSTed to the backend
///
/// `uf` is the two-letter Brazilian state code; `items` keeps the order in
/// which catalog items were toggled on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPoint {
    pub name: String,
    pub email: String,
    pub whatsapp: String,
    pub uf: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    pub items: Vec<ItemId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_point_wire_shape() {
        let point = NewPoint {
            name: "Test".to_string(),
            email: String::new(),
            whatsapp: String::new(),
            uf: "SP".to_string(),
            city: "Sorocaba".to_string(),
            latitude: -23.5,
            longitude: -47.4,
            items: vec![ItemId(3)],
        };

        let json = serde_json::to_value(&point).unwrap();
        assert_eq!(json["uf"], "SP");
        assert_eq!(json["city"], "Sorocaba");
        assert_eq!(json["latitude"], -23.5);
        assert_eq!(json["items"], serde_json::json!([3]));

        let back: NewPoint = serde_json::from_value(json).unwrap();
        assert_eq!(back, point);
    }
}
