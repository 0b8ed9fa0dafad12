// Catalog of sellable items and its load-time validation

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ExchangeError, ExchangeResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub base_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
}

impl Item {
    pub fn new(name: impl Into<String>, base_price: f64) -> Self {
        Self {
            name: name.into(),
            base_price,
            min_price: None,
            max_price: None,
        }
    }

    pub fn bounded(name: impl Into<String>, base_price: f64, min_price: f64, max_price: f64) -> Self {
        Self {
            name: name.into(),
            base_price,
            min_price: Some(min_price),
            max_price: Some(max_price),
        }
    }

    /// Bounds are only enforced when both ends are declared
    pub fn bounds(&self) -> Option<(f64, f64)> {
        match (self.min_price, self.max_price) {
            (Some(min), Some(max)) => Some((min, max)),
            _ => None,
        }
    }

    pub fn clamp(&self, price: f64) -> f64 {
        match self.bounds() {
            Some((min, max)) => price.clamp(min, max),
            None => price,
        }
    }

    fn validate(&self) -> ExchangeResult<()> {
        if self.name.trim().is_empty() {
            return Err(ExchangeError::InvalidCatalogConfig(
                "item name must not be empty".to_string(),
            ));
        }

        let prices = [Some(self.base_price), self.min_price, self.max_price];
        if prices.iter().flatten().any(|p| !p.is_finite()) {
            return Err(ExchangeError::InvalidCatalogConfig(format!(
                "'{}' has a non-finite price",
                self.name
            )));
        }

        if let Some((min, max)) = self.bounds() {
            if min > max {
                return Err(ExchangeError::InvalidCatalogConfig(format!(
                    "'{}' has min_price {} greater than max_price {}",
                    self.name, min, max
                )));
            }
            if self.base_price < min || self.base_price > max {
                warn!(
                    "⚠️  '{}' starts at {} outside its bounds [{}, {}]; it will be clamped on the first tick",
                    self.name, self.base_price, min, max
                );
            }
        }

        Ok(())
    }
}

/// Immutable, validated list of items
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    items: Vec<Item>,
}

impl Catalog {
    pub fn new(items: Vec<Item>) -> ExchangeResult<Self> {
        if items.is_empty() {
            return Err(ExchangeError::InvalidCatalogConfig(
                "catalog must contain at least one item".to_string(),
            ));
        }
        for item in &items {
            item.validate()?;
        }
        Ok(Self { items })
    }

    /// The five items served at the original stall
    pub fn reference() -> Self {
        Self {
            items: reference_items(),
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, index: usize) -> ExchangeResult<&Item> {
        self.items.get(index).ok_or(ExchangeError::InvalidIndex {
            index,
            len: self.items.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

pub(crate) fn reference_items() -> Vec<Item> {
    vec![
        Item::bounded("Mocktail A", 50.0, 40.0, 80.0),
        Item::new("Mocktail B", 60.0),
        Item::new("Mocktail C", 70.0),
        Item::new("Food Item 1", 40.0),
        Item::new("Food Item 2", 30.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_catalog() {
        let catalog = Catalog::reference();
        assert_eq!(catalog.len(), 5);
        assert_eq!(catalog.items()[0].bounds(), Some((40.0, 80.0)));
        assert_eq!(catalog.items()[1].bounds(), None);
    }

    #[test]
    fn test_half_bounds_are_not_enforced() {
        let item = Item {
            name: "Half".to_string(),
            base_price: 10.0,
            min_price: Some(5.0),
            max_price: None,
        };
        assert_eq!(item.bounds(), None);
        assert_eq!(item.clamp(-100.0), -100.0);
    }

    #[test]
    fn test_clamp() {
        let item = Item::bounded("A", 50.0, 40.0, 80.0);
        assert_eq!(item.clamp(85.0), 80.0);
        assert_eq!(item.clamp(35.0), 40.0);
        assert_eq!(item.clamp(60.0), 60.0);
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        let result = Catalog::new(vec![Item::bounded("Broken", 50.0, 90.0, 10.0)]);
        assert!(matches!(result, Err(ExchangeError::InvalidCatalogConfig(_))));
    }

    #[test]
    fn test_rejects_empty_catalog() {
        assert!(matches!(
            Catalog::new(Vec::new()),
            Err(ExchangeError::InvalidCatalogConfig(_))
        ));
    }

    #[test]
    fn test_rejects_non_finite_price() {
        let result = Catalog::new(vec![Item::new("Nan", f64::NAN)]);
        assert!(matches!(result, Err(ExchangeError::InvalidCatalogConfig(_))));
    }

    #[test]
    fn test_equal_bounds_accepted() {
        assert!(Catalog::new(vec![Item::bounded("Fixed", 25.0, 25.0, 25.0)]).is_ok());
    }

    #[test]
    fn test_get_out_of_range() {
        let catalog = Catalog::reference();
        assert_eq!(
            catalog.get(5),
            Err(ExchangeError::InvalidIndex { index: 5, len: 5 })
        );
    }
}
