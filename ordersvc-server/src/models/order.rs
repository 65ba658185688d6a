//! Order draft types, validated at construction.
//!
//! A draft never carries caller-supplied amounts beyond the unit price:
//! line totals and the order total are computed here, so a mismatched
//! total cannot reach the store.

use rust_decimal::Decimal;

use super::{CustomerEmail, CustomerName, OrderStatus, ValidationError};

/// Maximum length for product names
const MAX_PRODUCT_NAME_LEN: usize = 255;

/// Validated product name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductName(String);

impl ProductName {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: "product name",
            });
        }

        if s.len() > MAX_PRODUCT_NAME_LEN {
            return Err(ValidationError::TooLong {
                field: "product name",
                max: MAX_PRODUCT_NAME_LEN,
            });
        }

        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One line of a draft order.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    product_name: ProductName,
    quantity: i32,
    unit_price: Decimal,
    total_price: Decimal,
}

impl NewOrderItem {
    /// Build a draft line, computing its total price.
    pub fn new(product_name: &str, quantity: i32, unit_price: Decimal) -> Result<Self, ValidationError> {
        let product_name = ProductName::new(product_name)?;

        if quantity <= 0 {
            return Err(ValidationError::NotPositive {
                field: "quantity",
                value: i64::from(quantity),
            });
        }

        if unit_price < Decimal::ZERO {
            return Err(ValidationError::Negative {
                field: "unit price",
                value: unit_price.to_string(),
            });
        }

        let total_price = unit_price * Decimal::from(quantity);

        Ok(Self {
            product_name,
            quantity,
            unit_price,
            total_price,
        })
    }

    pub fn product_name(&self) -> &str {
        self.product_name.as_str()
    }

    pub fn quantity(&self) -> i32 {
        self.quantity
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    pub fn total_price(&self) -> Decimal {
        self.total_price
    }
}

/// A draft order ready for persistence.
///
/// Always starts out `pending`; the total is the sum of the line totals.
#[derive(Debug, Clone)]
pub struct NewOrder {
    customer_name: CustomerName,
    customer_email: Option<CustomerEmail>,
    status: OrderStatus,
    total_amount: Decimal,
    items: Vec<NewOrderItem>,
}

impl NewOrder {
    pub fn new(
        customer_name: &str,
        customer_email: Option<&str>,
        items: Vec<NewOrderItem>,
    ) -> Result<Self, ValidationError> {
        let customer_name = CustomerName::new(customer_name)?;
        let customer_email = customer_email.map(CustomerEmail::new).transpose()?;

        if items.is_empty() {
            return Err(ValidationError::Empty { field: "items" });
        }

        let total_amount = items.iter().map(NewOrderItem::total_price).sum();

        Ok(Self {
            customer_name,
            customer_email,
            status: OrderStatus::Pending,
            total_amount,
            items,
        })
    }

    pub fn customer_name(&self) -> &str {
        self.customer_name.as_str()
    }

    pub fn customer_email(&self) -> Option<&str> {
        self.customer_email.as_ref().map(CustomerEmail::as_str)
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    pub fn items(&self) -> &[NewOrderItem] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn computes_line_and_order_totals() {
        let items = vec![
            NewOrderItem::new("Laptop", 1, price("999.99")).unwrap(),
            NewOrderItem::new("Mouse", 2, price("25.50")).unwrap(),
        ];
        let order = NewOrder::new("John Doe", None, items).unwrap();

        assert_eq!(order.total_amount(), price("1050.99"));
        assert_eq!(order.items()[0].total_price(), price("999.99"));
        assert_eq!(order.items()[1].total_price(), price("51.00"));
        assert_eq!(order.status(), OrderStatus::Pending);
    }

    #[test]
    fn accepts_zero_priced_items() {
        let item = NewOrderItem::new("Sticker", 3, Decimal::ZERO).unwrap();
        assert_eq!(item.total_price(), Decimal::ZERO);
    }

    #[test]
    fn rejects_empty_item_list() {
        let err = NewOrder::new("John Doe", None, vec![]).unwrap_err();
        assert!(matches!(err, ValidationError::Empty { field: "items" }));
    }

    #[test]
    fn rejects_non_positive_quantity() {
        for quantity in [0, -1] {
            let err = NewOrderItem::new("Laptop", quantity, price("1.00")).unwrap_err();
            assert!(matches!(err, ValidationError::NotPositive { .. }));
        }
    }

    #[test]
    fn rejects_negative_unit_price() {
        let err = NewOrderItem::new("Laptop", 1, price("-0.01")).unwrap_err();
        assert!(matches!(err, ValidationError::Negative { .. }));
    }

    #[test]
    fn rejects_empty_product_name() {
        let err = NewOrderItem::new("", 1, price("1.00")).unwrap_err();
        assert!(matches!(err, ValidationError::Empty { .. }));
    }

    #[test]
    fn validates_optional_email() {
        let items = vec![NewOrderItem::new("Laptop", 1, price("1.00")).unwrap()];
        let err = NewOrder::new("John Doe", Some("not-an-address"), items).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { .. }));
    }
}
